/*
 * color.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Relative `oklch()` color adjustments.
//!
//! These are pure string builders over CSS relative color syntax
//! (`oklch(from <expr> …)`); they work on any color expression, including
//! palette output and plain keywords.

use crate::dict::fmt_num;

/// Default lightness delta for [`lighten`]/[`darken`].
pub const LIGHTNESS_DELTA: f64 = 0.1;

/// Default chroma delta for [`saturate`]/[`desaturate`].
pub const CHROMA_DELTA: f64 = 0.04;

/// Default alpha delta for [`fade`].
pub const ALPHA_DELTA: f64 = 0.2;

/// Default hue rotation in degrees for [`rotate`].
pub const HUE_DELTA: f64 = 30.0;

/// Raise lightness by `delta` (default [`LIGHTNESS_DELTA`]).
pub fn lighten_by(expr: &str, delta: f64) -> String {
    format!("oklch(from {expr} calc(l + {}) c h)", fmt_num(delta))
}

pub fn lighten(expr: &str) -> String {
    lighten_by(expr, LIGHTNESS_DELTA)
}

/// Lower lightness by `delta` (default [`LIGHTNESS_DELTA`]).
pub fn darken_by(expr: &str, delta: f64) -> String {
    format!("oklch(from {expr} calc(l - {}) c h)", fmt_num(delta))
}

pub fn darken(expr: &str) -> String {
    darken_by(expr, LIGHTNESS_DELTA)
}

/// Raise chroma by `delta` (default [`CHROMA_DELTA`]).
pub fn saturate_by(expr: &str, delta: f64) -> String {
    format!("oklch(from {expr} l calc(c + {}) h)", fmt_num(delta))
}

pub fn saturate(expr: &str) -> String {
    saturate_by(expr, CHROMA_DELTA)
}

/// Lower chroma by `delta` (default [`CHROMA_DELTA`]).
pub fn desaturate_by(expr: &str, delta: f64) -> String {
    format!("oklch(from {expr} l calc(c - {}) h)", fmt_num(delta))
}

pub fn desaturate(expr: &str) -> String {
    desaturate_by(expr, CHROMA_DELTA)
}

/// Lower alpha by `delta` (default [`ALPHA_DELTA`]).
pub fn fade_by(expr: &str, delta: f64) -> String {
    format!("oklch(from {expr} l c h / calc(alpha - {}))", fmt_num(delta))
}

pub fn fade(expr: &str) -> String {
    fade_by(expr, ALPHA_DELTA)
}

/// Rotate hue by `degrees` (default [`HUE_DELTA`]).
pub fn rotate_by(expr: &str, degrees: f64) -> String {
    format!("oklch(from {expr} l c calc(h + {}deg))", fmt_num(degrees))
}

pub fn rotate(expr: &str) -> String {
    rotate_by(expr, HUE_DELTA)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn adjustments_render_relative_oklch() {
        assert_eq!(
            lighten("var(--x-accent)"),
            "oklch(from var(--x-accent) calc(l + 0.1) c h)"
        );
        assert_eq!(darken_by("tomato", 0.25), "oklch(from tomato calc(l - 0.25) c h)");
        assert_eq!(
            saturate("tomato"),
            "oklch(from tomato l calc(c + 0.04) h)"
        );
        assert_eq!(
            fade("tomato"),
            "oklch(from tomato l c h / calc(alpha - 0.2))"
        );
        assert_eq!(rotate("tomato"), "oklch(from tomato l c calc(h + 30deg))");
        assert_eq!(
            rotate_by("tomato", -15.0),
            "oklch(from tomato l c calc(h + -15deg))"
        );
    }
}
