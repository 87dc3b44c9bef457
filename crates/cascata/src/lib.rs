/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Declarative style-tree to CSS compiler.
//!
//! Cascata compiles a schema-free configuration tree — string keys
//! encoding selectors, BEM groups, and custom-property declarations;
//! leaf values encoding literals, `{token}` templates, and
//! `&expr=>template` transforms — into CSS stylesheet text.
//!
//! # Architecture
//!
//! - [`Dictionary`]: the immutable layered token store (sets + key
//!   aliases) everything resolves against.
//! - [`Resolver`] / [`ScopeState`]: deterministic name, selector, and
//!   `var()` generation per stylesheet identifier, with optional stable
//!   minification.
//! - [`interpolate`] / [`transform`]: the `{..}` reference and
//!   `&expr=>template` micro-language.
//! - [`Compiler`]: the tree-walking stringifier plus the registry of
//!   compiled units ([`MakerCollector`]).
//! - [`atrule`]: condition algebra for `@media`/`@container` and
//!   builders for `@property`, `@keyframes`, `@layer`, `@scope`,
//!   `@supports`.
//! - [`tokens`]: palette, coefficient, color, pseudo, and unit builders.
//!
//! The compiler core is synchronous and pure: no I/O, no DOM. The host
//! environment is treated as a sink that accepts `(identifier, cssText)`
//! pairs.
//!
//! # Example
//!
//! ```
//! use cascata::{Compiler, Dictionary, TokenSet, UnitConfig};
//!
//! let dict = Dictionary::builder()
//!     .set("sp", TokenSet::from_pairs([("s", 4), ("m", 8)]).with_unit("px"))
//!     .key("w", "width")
//!     .build();
//!
//! let cfg = UnitConfig::from_json(r#"{"color": "tomato", "width": "{sp.m}"}"#).unwrap();
//! let css = Compiler::new(dict).compile("card", &cfg);
//! assert_eq!(css, "[data-card]{color:tomato;width:8px;}");
//! ```

pub mod atrule;
mod collect;
mod compile;
mod compiler;
mod config;
mod diag;
mod dict;
mod error;
mod interp;
mod scope;
pub mod tokens;

pub use collect::{MadeUnit, MakerCollector, UnitHandle};
pub use compiler::{CompileOptions, CompileOutput, Compiler};
pub use config::{UnitConfig, VarDecl};
pub use diag::{Diagnostic, DiagnosticCollector, DiagnosticKind};
pub use dict::{Dictionary, DictionaryBuilder, TokenSet, TokenValue};
pub use error::{CompileError, CompileResult};
pub use interp::{interpolate, transform, Locals};
pub use scope::{BemPath, Resolver, ScopeState, SelectorMode};

// Re-export the tree crate's value type; every public API speaks it.
pub use cascata_tree::{deep_merge, merged, StyleMap, StyleNode, TreeError};
