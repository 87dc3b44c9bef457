/*
 * pseudo.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Pseudo-class and pseudo-element helpers.
//!
//! A fixed table maps short codes to pseudo selectors. Every entry — and
//! the parametrized forms `nth_child`/`not_selector`/`state` — follows
//! one dual-call convention through [`Pseudo::apply`]: a string argument
//! yields a combined selector string, a node argument wraps the rule
//! under `&<pseudo>` for direct insertion into a content tree.

use cascata_tree::{StyleMap, StyleNode};
use std::borrow::Cow;

/// A resolved pseudo selector fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pseudo {
    css: Cow<'static, str>,
}

/// Either argument form accepted by [`Pseudo::apply`].
pub enum PseudoArg {
    Selector(String),
    Rule(StyleNode),
}

impl From<&str> for PseudoArg {
    fn from(selector: &str) -> Self {
        PseudoArg::Selector(selector.to_string())
    }
}

impl From<String> for PseudoArg {
    fn from(selector: String) -> Self {
        PseudoArg::Selector(selector)
    }
}

impl From<StyleNode> for PseudoArg {
    fn from(node: StyleNode) -> Self {
        PseudoArg::Rule(node)
    }
}

impl Pseudo {
    fn fixed(css: &'static str) -> Self {
        Self {
            css: Cow::Borrowed(css),
        }
    }

    fn owned(css: String) -> Self {
        Self {
            css: Cow::Owned(css),
        }
    }

    /// The raw pseudo text (`:hover`, `::before`, …).
    pub fn css(&self) -> &str {
        &self.css
    }

    /// Dual-call application: `apply("button")` returns the combined
    /// selector node `button:hover`; `apply(rule_map)` returns
    /// `{"&:hover": rule_map}` ready for a content tree.
    pub fn apply(&self, arg: impl Into<PseudoArg>) -> StyleNode {
        match arg.into() {
            PseudoArg::Selector(base) => StyleNode::Str(format!("{base}{}", self.css)),
            PseudoArg::Rule(node) => {
                let mut map = StyleMap::new();
                map.insert(format!("&{}", self.css), node);
                StyleNode::Map(map)
            }
        }
    }
}

/// Look up a pseudo by its short code.
pub fn pseudo(code: &str) -> Option<Pseudo> {
    let css = match code {
        "h" => ":hover",
        "f" => ":focus",
        "fw" => ":focus-within",
        "fv" => ":focus-visible",
        "a" => ":active",
        "d" => ":disabled",
        "ch" => ":checked",
        "emp" => ":empty",
        "fst" => ":first-child",
        "lst" => ":last-child",
        "bef" => "::before",
        "aft" => "::after",
        "ph" => "::placeholder",
        "sel" => "::selection",
        _ => return None,
    };
    Some(Pseudo::fixed(css))
}

/// `:nth-child(<expr>)`.
pub fn nth_child(expr: &str) -> Pseudo {
    Pseudo::owned(format!(":nth-child({expr})"))
}

/// `:not(<selector>)`.
pub fn not_selector(selector: &str) -> Pseudo {
    Pseudo::owned(format!(":not({selector})"))
}

/// `:state(<name>)` (custom element states).
pub fn state(name: &str) -> Pseudo {
    Pseudo::owned(format!(":state({name})"))
}
