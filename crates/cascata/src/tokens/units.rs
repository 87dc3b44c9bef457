/*
 * units.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Unit-suffix helpers for numeric values.

use crate::dict::fmt_num;

macro_rules! unit_fns {
    ($($(#[$doc:meta])* $name:ident => $suffix:literal),+ $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(value: f64) -> String {
                format!(concat!("{}", $suffix), fmt_num(value))
            }
        )+
    };
}

unit_fns! {
    /// `1` → `1rem`.
    rem => "rem",
    /// `1` → `1em`.
    em => "em",
    /// `4` → `4px`.
    px => "px",
    /// `50` → `50%`.
    pct => "%",
    /// `10` → `10vw`.
    vw => "vw",
    /// `10` → `10vh`.
    vh => "vh",
    /// `200` → `200ms`.
    ms => "ms",
    /// `2` → `2s`.
    sec => "s",
    /// `45` → `45deg`.
    deg => "deg",
    /// `1` → `1fr`.
    fr => "fr",
}
