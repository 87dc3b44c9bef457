/*
 * cond.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Logical condition algebra for `@media` and `@container`.
//!
//! Builders are immutable values: every combinator returns a new builder,
//! so `.and(..).or(..)` chains compose left-to-right in call order and
//! never mutate the caller's copy.
//!
//! Rendering rules: leaves are always parenthesized; `and` flattens
//! nested `and`s; an `or` is parenthesized as a whole when it appears in
//! an `and` context (including the implicit `and` that joins the type
//! list to the condition); `not` always parenthesizes its operand.

use std::fmt;

/// A media/container condition tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cond {
    /// A raw feature test, rendered inside parentheses.
    Leaf(String),
    /// Conjunction; nested `All`s flatten on render.
    All(Vec<Cond>),
    /// Disjunction.
    Any(Vec<Cond>),
    /// Negation; always parenthesizes its operand.
    Not(Box<Cond>),
}

impl Cond {
    /// Negate a condition.
    pub fn not(cond: impl Into<Cond>) -> Cond {
        Cond::Not(Box::new(cond.into()))
    }

    pub(crate) fn render(&self, under_and: bool) -> String {
        match self {
            Cond::Leaf(feature) => format!("({feature})"),
            Cond::All(items) => {
                let mut parts = Vec::new();
                flatten_all(items, &mut parts);
                parts
                    .iter()
                    .map(|c| c.render(true))
                    .collect::<Vec<_>>()
                    .join(" and ")
            }
            Cond::Any(items) => {
                let joined = items
                    .iter()
                    .map(|c| c.render_operand())
                    .collect::<Vec<_>>()
                    .join(" or ");
                if under_and {
                    format!("({joined})")
                } else {
                    joined
                }
            }
            Cond::Not(inner) => {
                let negated = format!("not {}", inner.render_operand());
                // `not` must sit in its own group inside an `and` chain.
                if under_and {
                    format!("({negated})")
                } else {
                    negated
                }
            }
        }
    }

    /// Render as an operand of `or`/`not`: leaves carry their own
    /// parentheses, composites get wrapped.
    fn render_operand(&self) -> String {
        match self {
            Cond::Leaf(_) => self.render(false),
            _ => format!("({})", self.render(false)),
        }
    }
}

fn flatten_all<'a>(items: &'a [Cond], out: &mut Vec<&'a Cond>) {
    for item in items {
        match item {
            Cond::All(nested) => flatten_all(nested, out),
            other => out.push(other),
        }
    }
}

impl From<&str> for Cond {
    fn from(feature: &str) -> Self {
        Cond::Leaf(feature.to_string())
    }
}

impl From<String> for Cond {
    fn from(feature: String) -> Self {
        Cond::Leaf(feature)
    }
}

fn combine_and(existing: Option<Cond>, next: Cond) -> Cond {
    match existing {
        None => next,
        Some(Cond::All(mut items)) => {
            items.push(next);
            Cond::All(items)
        }
        Some(prior) => Cond::All(vec![prior, next]),
    }
}

fn combine_or(existing: Option<Cond>, next: Cond) -> Cond {
    match existing {
        None => Cond::Any(vec![next]),
        Some(Cond::Any(mut items)) => {
            items.push(next);
            Cond::Any(items)
        }
        Some(prior) => Cond::Any(vec![prior, next]),
    }
}

/// `@media` query builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Media {
    types: Vec<String>,
    cond: Option<Cond>,
}

/// Start an empty media query.
pub fn media() -> Media {
    Media::default()
}

impl Media {
    pub fn screen(&self) -> Media {
        self.with_type("screen")
    }

    pub fn print(&self) -> Media {
        self.with_type("print")
    }

    pub fn all(&self) -> Media {
        self.with_type("all")
    }

    fn with_type(&self, ty: &str) -> Media {
        let mut next = self.clone();
        next.types.push(ty.to_string());
        next
    }

    /// Conjoin a condition.
    pub fn and(&self, cond: impl Into<Cond>) -> Media {
        let mut next = self.clone();
        next.cond = Some(combine_and(next.cond.take(), cond.into()));
        next
    }

    /// Disjoin a condition with everything accumulated so far.
    pub fn or(&self, cond: impl Into<Cond>) -> Media {
        let mut next = self.clone();
        next.cond = Some(combine_or(next.cond.take(), cond.into()));
        next
    }

    /// Conjoin a negated condition.
    pub fn not(&self, cond: impl Into<Cond>) -> Media {
        self.and(Cond::not(cond))
    }

    /// Render the full at-rule header.
    pub fn render(&self) -> String {
        let mut out = String::from("@media");
        if !self.types.is_empty() {
            out.push(' ');
            out.push_str(&self.types.join(", "));
        }
        if let Some(cond) = &self.cond {
            if self.types.is_empty() {
                out.push(' ');
                out.push_str(&cond.render(false));
            } else {
                out.push_str(" and ");
                out.push_str(&cond.render(true));
            }
        }
        out
    }
}

impl fmt::Display for Media {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// `@container` query builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    name: Option<String>,
    cond: Option<Cond>,
}

/// Start an empty container query.
pub fn container() -> Container {
    Container::default()
}

impl Container {
    /// Target a named container.
    pub fn named(&self, name: impl Into<String>) -> Container {
        let mut next = self.clone();
        next.name = Some(name.into());
        next
    }

    pub fn and(&self, cond: impl Into<Cond>) -> Container {
        let mut next = self.clone();
        next.cond = Some(combine_and(next.cond.take(), cond.into()));
        next
    }

    pub fn or(&self, cond: impl Into<Cond>) -> Container {
        let mut next = self.clone();
        next.cond = Some(combine_or(next.cond.take(), cond.into()));
        next
    }

    pub fn not(&self, cond: impl Into<Cond>) -> Container {
        self.and(Cond::not(cond))
    }

    pub fn render(&self) -> String {
        let mut out = String::from("@container");
        if let Some(name) = &self.name {
            out.push(' ');
            out.push_str(name);
        }
        if let Some(cond) = &self.cond {
            out.push(' ');
            // The container name acts as an `and` context for grouping.
            out.push_str(&cond.render(self.name.is_some()));
        }
        out
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
