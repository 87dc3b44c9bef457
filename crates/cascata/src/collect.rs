/*
 * collect.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The maker collector: stable keys for compiled-unit identities.
//!
//! Callers identify a unit by an opaque [`UnitHandle`] they mint
//! themselves (an arena index, a widget id — anything unique on their
//! side). The collector maps each handle to a stable generated key and
//! owns the registered config tree, so a unit can be remade (config
//! replaced) or altered (a delta deep-merged in) without its key — and
//! therefore its emitted names and hydrated markup — ever changing.

use cascata_tree::{deep_merge, StyleNode};
use indexmap::IndexMap;

use crate::scope::short_code;

/// Opaque caller-supplied identity of a compiled unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitHandle(pub u64);

/// A registered unit: its stable key and its current config tree.
#[derive(Debug, Clone)]
pub struct MadeUnit {
    pub key: String,
    pub node: StyleNode,
}

/// Handle → key/config registry. Keys are assigned once per handle and
/// survive remake/alter.
#[derive(Debug, Default)]
pub struct MakerCollector {
    units: IndexMap<u64, MadeUnit>,
    seq: u64,
}

impl MakerCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit. A handle seen before keeps its key and has its
    /// config replaced (remake). A requested key already owned by a
    /// different handle is not stolen — the first registrant keeps it and
    /// the new unit gets a generated key instead.
    pub fn register(
        &mut self,
        handle: UnitHandle,
        requested: Option<&str>,
        node: StyleNode,
    ) -> &str {
        let key = match self.units.get(&handle.0) {
            Some(unit) => unit.key.clone(),
            None => match requested {
                Some(want) if !self.key_taken(want) => want.to_string(),
                _ => self.fresh_key(),
            },
        };
        let unit = self.units.entry(handle.0).or_insert_with(|| MadeUnit {
            key,
            node: StyleNode::Null,
        });
        unit.node = node;
        &unit.key
    }

    /// Replace a registered unit's config, keeping its key.
    pub fn remake(&mut self, handle: UnitHandle, node: StyleNode) -> Option<&str> {
        let unit = self.units.get_mut(&handle.0)?;
        unit.node = node;
        Some(&unit.key)
    }

    /// Deep-merge a delta into a registered unit's config — the one
    /// sanctioned in-place mutation of a unit tree.
    pub fn alter(&mut self, handle: UnitHandle, delta: &StyleNode) -> bool {
        match self.units.get_mut(&handle.0) {
            Some(unit) => {
                deep_merge(&mut unit.node, delta);
                true
            }
            None => false,
        }
    }

    /// The stable key for a handle, if registered.
    pub fn key_of(&self, handle: UnitHandle) -> Option<&str> {
        self.units.get(&handle.0).map(|u| u.key.as_str())
    }

    /// The registered unit for a handle.
    pub fn get(&self, handle: UnitHandle) -> Option<&MadeUnit> {
        self.units.get(&handle.0)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Iterate registered units in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (UnitHandle, &MadeUnit)> {
        self.units.iter().map(|(h, u)| (UnitHandle(*h), u))
    }

    fn key_taken(&self, key: &str) -> bool {
        self.units.values().any(|u| u.key == key)
    }

    fn fresh_key(&mut self) -> String {
        loop {
            let key = format!("u{}", short_code(self.seq));
            self.seq += 1;
            if !self.key_taken(&key) {
                return key;
            }
        }
    }
}
