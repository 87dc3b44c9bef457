/*
 * merge.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Deep merge over style trees.
//!
//! Merge semantics, in layer order (base first, delta last):
//!
//! - maps merge recursively, field-wise; new keys append at the end so
//!   cascade order stays stable for existing keys
//! - lists concatenate (base items first)
//! - scalars are last-writer-wins, including `Null`
//! - mismatched kinds are last-writer-wins
//!
//! The compiler uses this both for array-valued nodes (a union of
//! transform alternatives merged into one rule body) and for the `alter`
//! operation, which folds a delta into a previously registered unit.

use crate::{StyleNode, StyleMap};

/// Merge `delta` into `base` in place.
pub fn deep_merge(base: &mut StyleNode, delta: &StyleNode) {
    match (base, delta) {
        (StyleNode::Map(base_map), StyleNode::Map(delta_map)) => {
            merge_maps(base_map, delta_map);
        }
        (StyleNode::List(base_items), StyleNode::List(delta_items)) => {
            base_items.extend(delta_items.iter().cloned());
        }
        (base, delta) => {
            *base = delta.clone();
        }
    }
}

/// Merge two nodes into a new one, leaving both inputs untouched.
pub fn merged(base: &StyleNode, delta: &StyleNode) -> StyleNode {
    let mut out = base.clone();
    deep_merge(&mut out, delta);
    out
}

fn merge_maps(base: &mut StyleMap, delta: &StyleMap) {
    for (key, value) in delta {
        match base.get_mut(key) {
            Some(existing) => deep_merge(existing, value),
            None => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}
