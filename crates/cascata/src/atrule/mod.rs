/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Builders for conditional and named at-rules.

mod cond;
mod named;

pub use cond::{container, media, Cond, Container, Media};
pub use named::{KeyframesRule, LayerRule, PropertyRule, ScopeRule, SupportsRule};
