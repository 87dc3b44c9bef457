/*
 * coefficient.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Numeric coefficient builder: nine fixed offsets around a configurable
//! center, with range snapshots and recentering.

use indexmap::IndexMap;

/// The nine offset names, low to high. `mid` is the center itself.
const OFFSETS: [(&str, f64); 9] = [
    ("min", -4.0),
    ("xxs", -3.0),
    ("xs", -2.0),
    ("sm", -1.0),
    ("mid", 0.0),
    ("lg", 1.0),
    ("xl", 2.0),
    ("xxl", 3.0),
    ("max", 4.0),
];

/// An immutable coefficient builder. Recentering accessors return a new
/// builder; nothing is shared or mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficient {
    center: f64,
}

impl Coefficient {
    pub fn new(center: f64) -> Self {
        Self { center }
    }

    pub fn center(&self) -> f64 {
        self.center
    }

    // --- The nine fixed offsets ---------------------------------------

    pub fn min(&self) -> f64 {
        self.center - 4.0
    }

    pub fn xxs(&self) -> f64 {
        self.center - 3.0
    }

    pub fn xs(&self) -> f64 {
        self.center - 2.0
    }

    pub fn sm(&self) -> f64 {
        self.center - 1.0
    }

    pub fn mid(&self) -> f64 {
        self.center
    }

    pub fn lg(&self) -> f64 {
        self.center + 1.0
    }

    pub fn xl(&self) -> f64 {
        self.center + 2.0
    }

    pub fn xxl(&self) -> f64 {
        self.center + 3.0
    }

    pub fn max(&self) -> f64 {
        self.center + 4.0
    }

    // --- Range snapshots ----------------------------------------------

    fn range(&self, names: &[&'static str]) -> IndexMap<&'static str, f64> {
        OFFSETS
            .iter()
            .filter(|(name, _)| names.contains(name))
            .map(|(name, offset)| (*name, self.center + offset))
            .collect()
    }

    /// `sm`..`lg` (±1).
    pub fn short(&self) -> IndexMap<&'static str, f64> {
        self.range(&["sm", "mid", "lg"])
    }

    /// `xs`..`xl` (±2).
    pub fn base(&self) -> IndexMap<&'static str, f64> {
        self.range(&["xs", "sm", "mid", "lg", "xl"])
    }

    /// `xxs`..`xxl` (±3).
    pub fn long(&self) -> IndexMap<&'static str, f64> {
        self.range(&["xxs", "xs", "sm", "mid", "lg", "xl", "xxl"])
    }

    /// All nine offsets.
    pub fn full(&self) -> IndexMap<&'static str, f64> {
        self.range(&["min", "xxs", "xs", "sm", "mid", "lg", "xl", "xxl", "max"])
    }

    /// `mid`..`xl`: the upward working range.
    pub fn main(&self) -> IndexMap<&'static str, f64> {
        self.range(&["mid", "lg", "xl"])
    }

    /// The extremes plus the center.
    pub fn sparse(&self) -> IndexMap<&'static str, f64> {
        self.range(&["min", "mid", "max"])
    }

    // --- Recentering --------------------------------------------------

    pub fn quarter(&self) -> Coefficient {
        Coefficient::new(25.0)
    }

    pub fn half(&self) -> Coefficient {
        Coefficient::new(50.0)
    }

    pub fn threequarter(&self) -> Coefficient {
        Coefficient::new(75.0)
    }

    pub fn whole(&self) -> Coefficient {
        Coefficient::new(100.0)
    }

    pub fn around(&self, center: f64) -> Coefficient {
        Coefficient::new(center)
    }
}
