/*
 * named.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Builders for named at-rules: `@property`, `@keyframes`, `@layer`,
//! `@scope`, `@supports`.
//!
//! Each builder produces two things that must stay consistent: the
//! at-rule declaration itself (as a `(key, body)` fragment ready to be
//! inserted into a unit's content tree) and the inline reference value
//! used inside rule bodies (`var(--name)` for properties, the bare name
//! for keyframes and layers). `@property`/`@keyframes`/`@layer` names are
//! auto-generated from the identifier's naming counter unless supplied
//! explicitly, so a builder used in several rules always references one
//! at-rule.

use cascata_tree::{StyleMap, StyleNode};

use crate::atrule::cond::Cond;
use crate::compile::normalize_frame_label;
use crate::dict::fmt_num;
use crate::scope::{short_code, Resolver};

/// `@property` builder: a registered custom property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRule {
    name: String,
    syntax: String,
    inherits: bool,
    initial: Option<String>,
}

impl PropertyRule {
    /// Auto-named from the identifier's counter.
    pub fn new(r: &mut Resolver) -> Self {
        let auto = format!("p{}", short_code(r.auto_index()));
        Self::with_name(r, &auto)
    }

    /// Explicitly named (still scoped to the identifier).
    pub fn with_name(r: &mut Resolver, name: &str) -> Self {
        Self {
            name: r.var_name(&[name]),
            syntax: "*".to_string(),
            inherits: false,
            initial: None,
        }
    }

    pub fn syntax(mut self, syntax: impl Into<String>) -> Self {
        self.syntax = syntax.into();
        self
    }

    pub fn inherits(mut self, inherits: bool) -> Self {
        self.inherits = inherits;
        self
    }

    pub fn initial(mut self, value: impl Into<String>) -> Self {
        self.initial = Some(value.into());
        self
    }

    /// The resolved custom-property name (`--id-…`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The at-rule fragment for the content tree.
    pub fn declaration(&self) -> (String, StyleNode) {
        let mut body = StyleMap::new();
        body.insert(
            "syntax".to_string(),
            StyleNode::Str(format!("\"{}\"", self.syntax)),
        );
        body.insert(
            "inherits".to_string(),
            StyleNode::Str(self.inherits.to_string()),
        );
        if let Some(initial) = &self.initial {
            body.insert("initial-value".to_string(), StyleNode::Str(initial.clone()));
        }
        (format!("@property {}", self.name), StyleNode::Map(body))
    }

    /// The inline reference: `var(--id-…)`.
    pub fn reference(&self) -> String {
        format!("var({})", self.name)
    }

    /// A one-off assignment fragment: `{ [name]: value }`.
    pub fn assign(&self, value: impl Into<StyleNode>) -> (String, StyleNode) {
        (self.name.clone(), value.into())
    }
}

/// `@keyframes` builder.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframesRule {
    name: String,
    frames: StyleMap,
}

impl KeyframesRule {
    /// Auto-named from the identifier's counter.
    pub fn new(r: &mut Resolver) -> Self {
        let auto = format!("k{}", short_code(r.auto_index()));
        Self::with_name(r, &auto)
    }

    /// Explicitly named (still scoped to the identifier).
    pub fn with_name(r: &mut Resolver, name: &str) -> Self {
        Self {
            name: r.name(&[name]),
            frames: StyleMap::new(),
        }
    }

    /// Add one frame. Bare integer labels render as `N%`, keywords pass
    /// through.
    pub fn frame(mut self, label: impl Into<String>, body: impl Into<StyleNode>) -> Self {
        self.frames
            .insert(normalize_frame_label(&label.into()), body.into());
        self
    }

    /// Add a frame at a numeric offset.
    pub fn at(self, percent: f64, body: impl Into<StyleNode>) -> Self {
        self.frame(fmt_num(percent), body)
    }

    /// The generated animation name; also the inline reference value.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The at-rule fragment for the content tree.
    pub fn declaration(&self) -> (String, StyleNode) {
        (
            format!("@keyframes {}", self.name),
            StyleNode::Map(self.frames.clone()),
        )
    }

    /// The inline reference (for `animation-name`).
    pub fn reference(&self) -> &str {
        &self.name
    }
}

/// `@layer` builder.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRule {
    name: String,
}

impl LayerRule {
    /// Auto-named from the identifier's counter.
    pub fn new(r: &mut Resolver) -> Self {
        let auto = format!("l{}", short_code(r.auto_index()));
        Self::with_name(r, &auto)
    }

    /// Explicitly named (still scoped to the identifier).
    pub fn with_name(r: &mut Resolver, name: &str) -> Self {
        Self {
            name: r.name(&[name]),
        }
    }

    /// The layer name; also the inline reference value.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A block fragment: `@layer name { … }`.
    pub fn declaration(&self, body: impl Into<StyleNode>) -> (String, StyleNode) {
        (format!("@layer {}", self.name), body.into())
    }

    /// The bare ordering statement: `@layer name;`.
    pub fn statement(&self) -> String {
        format!("@layer {};", self.name)
    }

    /// The inline reference (for nested `@layer` headers or
    /// `revert-layer` bookkeeping).
    pub fn reference(&self) -> &str {
        &self.name
    }
}

/// `@scope` builder: a root selector, an optional limit, and the four
/// inclusivity combinations expressed with a `> *` qualifier on the
/// relevant bound.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeRule {
    root: String,
    limit: Option<String>,
    include_root: bool,
    include_limit: bool,
}

impl ScopeRule {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            limit: None,
            include_root: true,
            include_limit: false,
        }
    }

    /// Bound the scope below `limit`.
    pub fn to(mut self, limit: impl Into<String>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// Whether the root element itself is in scope (default `true`).
    pub fn include_root(mut self, include: bool) -> Self {
        self.include_root = include;
        self
    }

    /// Whether the limit element itself is in scope (default `false`).
    pub fn include_limit(mut self, include: bool) -> Self {
        self.include_limit = include;
        self
    }

    /// The at-rule header.
    pub fn header(&self) -> String {
        let root = if self.include_root {
            format!("({})", self.root)
        } else {
            format!("({} > *)", self.root)
        };
        match &self.limit {
            None => format!("@scope {root}"),
            Some(limit) => {
                let limit = if self.include_limit {
                    format!("({limit} > *)")
                } else {
                    format!("({limit})")
                };
                format!("@scope {root} to {limit}")
            }
        }
    }

    /// The at-rule fragment for the content tree.
    pub fn declaration(&self, body: impl Into<StyleNode>) -> (String, StyleNode) {
        (self.header(), body.into())
    }
}

/// `@supports` builder, reusing the condition algebra.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportsRule {
    cond: Cond,
}

impl SupportsRule {
    pub fn new(cond: impl Into<Cond>) -> Self {
        Self { cond: cond.into() }
    }

    pub fn and(&self, cond: impl Into<Cond>) -> Self {
        let next = match self.cond.clone() {
            Cond::All(mut items) => {
                items.push(cond.into());
                Cond::All(items)
            }
            prior => Cond::All(vec![prior, cond.into()]),
        };
        Self { cond: next }
    }

    pub fn or(&self, cond: impl Into<Cond>) -> Self {
        let next = match self.cond.clone() {
            Cond::Any(mut items) => {
                items.push(cond.into());
                Cond::Any(items)
            }
            prior => Cond::Any(vec![prior, cond.into()]),
        };
        Self { cond: next }
    }

    pub fn not(&self, cond: impl Into<Cond>) -> Self {
        self.and(Cond::not(cond))
    }

    /// The at-rule header.
    pub fn header(&self) -> String {
        format!("@supports {}", self.cond.render(true))
    }

    /// The at-rule fragment for the content tree.
    pub fn declaration(&self, body: impl Into<StyleNode>) -> (String, StyleNode) {
        (self.header(), body.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::{ScopeState, SelectorMode};
    use pretty_assertions::assert_eq;

    fn with_resolver<T>(f: impl FnOnce(&mut Resolver) -> T) -> T {
        let mut state = ScopeState::new();
        let mut r = Resolver::new("x", SelectorMode::Attribute, &mut state);
        f(&mut r)
    }

    #[test]
    fn property_declaration_and_reference_agree() {
        with_resolver(|r| {
            let prop = PropertyRule::new(r).syntax("<length>").inherits(true).initial("4px");
            assert_eq!(prop.name(), "--x-pa");
            assert_eq!(prop.reference(), "var(--x-pa)");

            let (key, body) = prop.declaration();
            assert_eq!(key, "@property --x-pa");
            assert_eq!(
                body.get("syntax").and_then(StyleNode::as_str),
                Some("\"<length>\"")
            );
            assert_eq!(body.get("inherits").and_then(StyleNode::as_str), Some("true"));
            assert_eq!(
                body.get("initial-value").and_then(StyleNode::as_str),
                Some("4px")
            );

            let (name, value) = prop.assign("8px");
            assert_eq!(name, "--x-pa");
            assert_eq!(value.as_str(), Some("8px"));
        });
    }

    #[test]
    fn auto_names_are_unique_within_a_unit() {
        with_resolver(|r| {
            let a = PropertyRule::new(r);
            let b = PropertyRule::new(r);
            let k = KeyframesRule::new(r);
            assert_ne!(a.name(), b.name());
            assert_ne!(b.name(), k.name());
        });
    }

    #[test]
    fn keyframes_frames_normalize_labels() {
        with_resolver(|r| {
            let kf = KeyframesRule::new(r)
                .frame("from", StyleNode::map([("opacity", 0)]))
                .at(50.0, StyleNode::map([("opacity", "0.5")]))
                .frame("to", StyleNode::map([("opacity", 1)]));
            let (key, body) = kf.declaration();
            assert_eq!(key, format!("@keyframes {}", kf.reference()));
            let labels: Vec<&str> = body.as_map().unwrap().keys().map(String::as_str).collect();
            assert_eq!(labels, vec!["from", "50%", "to"]);
        });
    }

    #[test]
    fn scope_inclusivity_combinations() {
        let base = ScopeRule::new(".card").to(".footer");
        assert_eq!(base.header(), "@scope (.card) to (.footer)");
        assert_eq!(
            base.clone().include_root(false).header(),
            "@scope (.card > *) to (.footer)"
        );
        assert_eq!(
            base.clone().include_limit(true).header(),
            "@scope (.card) to (.footer > *)"
        );
        assert_eq!(
            base.include_root(false).include_limit(true).header(),
            "@scope (.card > *) to (.footer > *)"
        );
        assert_eq!(ScopeRule::new(".card").header(), "@scope (.card)");
    }

    #[test]
    fn supports_composes_conditions() {
        let rule = SupportsRule::new("display:grid").or("display:flex");
        assert_eq!(
            rule.header(),
            "@supports ((display:grid) or (display:flex))"
        );

        let rule = SupportsRule::new("display:grid").not("display:inline-grid");
        assert_eq!(
            rule.header(),
            "@supports (display:grid) and (not (display:inline-grid))"
        );
    }
}
