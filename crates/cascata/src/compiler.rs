/*
 * compiler.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The compiler facade: dictionary + per-identifier naming state +
//! registered units, behind one entry point.
//!
//! All mutable state sits behind `&mut self`, which makes the exclusive
//! ownership discipline for minification counters a compile-time
//! guarantee: two units with the same identifier cannot race on code
//! assignment. The type is `Send`; callers who want cross-thread sharing
//! wrap the compiler in a mutex and thereby serialize per-identifier
//! compilation.

use cascata_tree::StyleNode;
use indexmap::IndexMap;

use crate::collect::{MakerCollector, UnitHandle};
use crate::compile::{compile_unit, EvalState};
use crate::config::UnitConfig;
use crate::diag::{Diagnostic, DiagnosticCollector};
use crate::dict::Dictionary;
use crate::error::CompileResult;
use crate::scope::{Resolver, ScopeState, SelectorMode};

/// Options for one compile call.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// Record degrade events as errors instead of warnings. Output text
    /// is still produced either way.
    pub strict: bool,
}

/// Compiled CSS text plus the degrade events observed on the way.
#[derive(Debug)]
pub struct CompileOutput {
    pub css: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// The style compiler.
pub struct Compiler {
    dict: Dictionary,
    mode: SelectorMode,
    minify: bool,
    states: IndexMap<String, ScopeState>,
    collector: MakerCollector,
}

impl Compiler {
    /// A compiler over the given dictionary, attribute selectors, no
    /// minification.
    pub fn new(dict: Dictionary) -> Self {
        Self {
            dict,
            mode: SelectorMode::default(),
            minify: false,
            states: IndexMap::new(),
            collector: MakerCollector::new(),
        }
    }

    /// Choose the selector mode.
    pub fn with_mode(mut self, mode: SelectorMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable minification for identifiers whose state is created from
    /// now on. Existing states are untouched.
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// The shared dictionary.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// The naming state for an identifier, created lazily on first
    /// access and kept for the lifetime of the compiler.
    pub fn state(&mut self, id: &str) -> &mut ScopeState {
        let minify = self.minify;
        self.states.entry(id.to_string()).or_insert_with(|| {
            if minify {
                ScopeState::minifying()
            } else {
                ScopeState::new()
            }
        })
    }

    /// Borrow a resolver for an identifier, e.g. to feed token builders
    /// outside of a compile call.
    pub fn resolver<'a>(&'a mut self, id: &'a str) -> Resolver<'a> {
        let mode = self.mode;
        let state = self.state(id);
        Resolver::new(id, mode, state)
    }

    /// Compile one unit. Deterministic: the same identifier and config
    /// yield byte-identical output on every call.
    pub fn compile(&mut self, id: &str, cfg: &UnitConfig) -> String {
        self.compile_with(id, cfg, &CompileOptions::default()).css
    }

    /// Compile one unit and report degrade diagnostics.
    pub fn compile_with(
        &mut self,
        id: &str,
        cfg: &UnitConfig,
        options: &CompileOptions,
    ) -> CompileOutput {
        tracing::debug!(identifier = id, "compiling unit");
        let mode = self.mode;
        let minify = self.minify;
        let state = self.states.entry(id.to_string()).or_insert_with(|| {
            if minify {
                ScopeState::minifying()
            } else {
                ScopeState::new()
            }
        });
        let mut resolver = Resolver::new(id, mode, state);
        let mut st = EvalState {
            dict: &self.dict,
            keys: cfg.keys.clone(),
            sets: &cfg.sets,
            diag: if options.strict {
                DiagnosticCollector::strict()
            } else {
                DiagnosticCollector::new()
            },
        };
        let css = compile_unit(cfg, &mut st, &mut resolver);
        tracing::debug!(identifier = id, bytes = css.len(), "unit compiled");
        CompileOutput {
            css,
            diagnostics: st.diag.into_diagnostics(),
        }
    }

    /// Parse a unit configuration from JSON and compile it.
    pub fn compile_json(&mut self, id: &str, text: &str) -> CompileResult<String> {
        let cfg = UnitConfig::from_json(text)?;
        Ok(self.compile(id, &cfg))
    }

    /// Snapshot every identifier's minification table, for persistence
    /// across processes (server-render → hydration).
    pub fn export_tables(&self) -> IndexMap<String, IndexMap<String, String>> {
        self.states
            .iter()
            .filter_map(|(id, state)| {
                state
                    .export_table()
                    .map(|table| (id.clone(), table.clone()))
            })
            .collect()
    }

    /// Union persisted minification tables into live state. Live entries
    /// always win, preserving the append-only invariant.
    pub fn import_tables(&mut self, tables: &IndexMap<String, IndexMap<String, String>>) {
        for (id, table) in tables {
            self.state(id).import_table(table);
        }
    }

    // --- Registered units ---------------------------------------------

    /// Register (or remake) a unit under a caller-owned handle; returns
    /// its stable key, which doubles as the stylesheet identifier.
    pub fn register(
        &mut self,
        handle: UnitHandle,
        requested: Option<&str>,
        node: StyleNode,
    ) -> String {
        self.collector.register(handle, requested, node).to_string()
    }

    /// Deep-merge a delta into a registered unit's config.
    pub fn alter(&mut self, handle: UnitHandle, delta: &StyleNode) -> bool {
        self.collector.alter(handle, delta)
    }

    /// Compile a registered unit; returns its key and CSS text.
    pub fn compile_registered(&mut self, handle: UnitHandle) -> Option<(String, String)> {
        let (key, node) = {
            let unit = self.collector.get(handle)?;
            (unit.key.clone(), unit.node.clone())
        };
        let cfg = UnitConfig::from_node(&node);
        let css = self.compile(&key, &cfg);
        Some((key, css))
    }

    /// The unit registry.
    pub fn collector(&self) -> &MakerCollector {
        &self.collector
    }
}
