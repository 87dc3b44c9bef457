/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Per-unit configuration: the reserved top-level keys of a compiled unit.
//!
//! A unit configuration is a plain map with up to five reserved keys:
//!
//! - `"vars"` — registered custom properties (`@property` declarations)
//! - `"frames"` — keyframe blocks
//! - `"keys"` — unit-local key aliases
//! - `"sets"` — unit-local token sets
//! - `"content"` — the main content tree
//!
//! A map with none of the reserved keys is taken to be the content tree
//! itself, which keeps small units terse. Ingestion is best-effort and
//! never fails past the JSON boundary: wrong-shaped entries are skipped.

use cascata_tree::{StyleNode, StyleMap};
use indexmap::IndexMap;

use crate::dict::TokenSet;
use crate::error::CompileResult;

const RESERVED: [&str; 5] = ["vars", "frames", "keys", "sets", "content"];

/// A registered custom property declaration.
///
/// `full` is the full-control flag: when set, the declared name is
/// emitted verbatim (a global custom property), bypassing per-unit
/// scoping and minification.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub syntax: String,
    pub inherits: bool,
    pub initial: String,
    pub full: bool,
}

impl Default for VarDecl {
    fn default() -> Self {
        Self {
            syntax: "*".to_string(),
            inherits: false,
            initial: String::new(),
            full: false,
        }
    }
}

impl VarDecl {
    fn from_node(node: &StyleNode) -> VarDecl {
        let mut decl = VarDecl::default();
        let Some(map) = node.as_map() else {
            return decl;
        };
        if let Some(syntax) = map.get("syntax").and_then(StyleNode::as_str) {
            decl.syntax = syntax.to_string();
        }
        if let Some(inherits) = map.get("inherits").and_then(StyleNode::as_str) {
            decl.inherits = inherits == "true";
        }
        if let Some(initial) = map.get("initial") {
            decl.initial = match initial {
                StyleNode::Str(s) => s.clone(),
                StyleNode::Num(n) => crate::dict::fmt_num(*n),
                _ => String::new(),
            };
        }
        if let Some(full) = map.get("full").and_then(StyleNode::as_str) {
            decl.full = full == "true";
        }
        decl
    }
}

/// Everything one compiled unit declares.
#[derive(Debug, Clone, Default)]
pub struct UnitConfig {
    pub vars: IndexMap<String, VarDecl>,
    pub frames: IndexMap<String, StyleNode>,
    pub keys: IndexMap<String, String>,
    pub sets: IndexMap<String, TokenSet>,
    pub content: StyleNode,
}

impl UnitConfig {
    /// Build from a style tree. Duplicate var/frame names collapse with
    /// last-declaration-wins (they are plain map keys).
    pub fn from_node(node: &StyleNode) -> UnitConfig {
        let Some(map) = node.as_map() else {
            return UnitConfig::default();
        };
        if !map.keys().any(|k| RESERVED.contains(&k.as_str())) {
            return UnitConfig {
                content: node.clone(),
                ..UnitConfig::default()
            };
        }

        let mut cfg = UnitConfig::default();
        if let Some(vars) = map.get("vars").and_then(StyleNode::as_map) {
            for (name, decl) in vars {
                cfg.vars.insert(name.clone(), VarDecl::from_node(decl));
            }
        }
        if let Some(frames) = map.get("frames").and_then(StyleNode::as_map) {
            for (name, body) in frames {
                cfg.frames.insert(name.clone(), body.clone());
            }
        }
        if let Some(keys) = map.get("keys").and_then(StyleNode::as_map) {
            for (alias, long) in keys {
                if let Some(long) = long.as_str() {
                    cfg.keys.insert(alias.clone(), long.to_string());
                }
            }
        }
        if let Some(sets) = map.get("sets").and_then(StyleNode::as_map) {
            for (name, set) in sets {
                cfg.sets.insert(name.clone(), TokenSet::from_node(set));
            }
        }
        if let Some(content) = map.get("content") {
            cfg.content = content.clone();
        }
        cfg
    }

    /// Parse a unit configuration from JSON text.
    pub fn from_json(text: &str) -> CompileResult<UnitConfig> {
        let node = StyleNode::from_json(text)?;
        Ok(UnitConfig::from_node(&node))
    }

    /// The content tree as a map, when present.
    pub(crate) fn content_map(&self) -> Option<&StyleMap> {
        self.content.as_map()
    }
}
