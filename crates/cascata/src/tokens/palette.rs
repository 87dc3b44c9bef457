/*
 * palette.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Palette builder: five independent axes composed into an `oklch()`
//! expression whose channels are scoped custom-property references.

use crate::dict::fmt_num;
use crate::scope::Resolver;

/// Whether the palette addresses background or foreground channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ground {
    #[default]
    Bg,
    Fg,
}

impl Ground {
    fn as_str(self) -> &'static str {
        match self {
            Ground::Bg => "bg",
            Ground::Fg => "fg",
        }
    }
}

/// An immutable palette builder. Each axis accessor returns a new
/// builder with that one axis changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    lightness: String,
    chroma: String,
    hue: String,
    alpha: f64,
    ground: Ground,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            lightness: "base".to_string(),
            chroma: "base".to_string(),
            hue: "base".to_string(),
            alpha: 1.0,
            ground: Ground::Bg,
        }
    }
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lightness(&self, token: impl Into<String>) -> Palette {
        let mut next = self.clone();
        next.lightness = token.into();
        next
    }

    pub fn chroma(&self, token: impl Into<String>) -> Palette {
        let mut next = self.clone();
        next.chroma = token.into();
        next
    }

    pub fn hue(&self, token: impl Into<String>) -> Palette {
        let mut next = self.clone();
        next.hue = token.into();
        next
    }

    pub fn alpha(&self, alpha: f64) -> Palette {
        let mut next = self.clone();
        next.alpha = alpha;
        next
    }

    pub fn bg(&self) -> Palette {
        let mut next = self.clone();
        next.ground = Ground::Bg;
        next
    }

    pub fn fg(&self) -> Palette {
        let mut next = self.clone();
        next.ground = Ground::Fg;
        next
    }

    /// Render the `oklch()` expression. Each channel resolves through the
    /// resolver as `var_exp([ground, axis, token])`.
    pub fn render(&self, r: &mut Resolver) -> String {
        let ground = self.ground.as_str();
        let l = r.var_exp(&[ground, "l", &self.lightness]);
        let c = r.var_exp(&[ground, "c", &self.chroma]);
        let h = r.var_exp(&[ground, "h", &self.hue]);
        format!("oklch({l} {c} {h} / {})", fmt_num(self.alpha))
    }
}
