/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Ordered style-configuration tree for the cascata compiler.
//!
//! A style configuration is schema-free nested data: string keys encode
//! selectors and property names, leaf values encode declaration values or
//! transform expressions. This crate provides the one value type the rest
//! of the compiler walks:
//!
//! - [`StyleNode`] — a closed sum over scalar / list / ordered map. Maps
//!   preserve insertion order because CSS cascade order is significant.
//! - [`merge`] — deep merge used both for array-valued nodes during
//!   compilation and for the `alter` operation on registered units.
//!
//! # Example
//!
//! ```
//! use cascata_tree::StyleNode;
//!
//! let node = StyleNode::from_json(r#"{"color": "red", "width": 4}"#).unwrap();
//! assert_eq!(node.get("color").and_then(StyleNode::as_str), Some("red"));
//! ```

mod merge;
mod node;

pub use merge::{deep_merge, merged};
pub use node::{StyleMap, StyleNode};

use thiserror::Error;

/// Errors produced while ingesting configuration data.
///
/// The compiler core itself never fails; errors exist only at the JSON
/// ingestion boundary.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The supplied text is not valid JSON.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for tree ingestion.
pub type TreeResult<T> = Result<T, TreeError>;
