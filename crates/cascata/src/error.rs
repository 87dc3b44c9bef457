/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for configuration ingestion.
//!
//! Compilation itself never fails (see [`crate::diag`]); errors exist only
//! at the boundary where JSON text becomes a unit configuration.

use thiserror::Error;

/// Errors that can occur while loading unit configurations.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The unit configuration text is not valid JSON.
    #[error(transparent)]
    Tree(#[from] cascata_tree::TreeError),
}

/// Result type for configuration ingestion.
pub type CompileResult<T> = Result<T, CompileError>;
