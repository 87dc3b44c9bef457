/*
 * dict.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The layered token dictionary.
//!
//! A dictionary carries two layers of semantic tokens:
//!
//! - **sets**: grouped variants (`sp` → `{s: 4, m: 8, l: 16}`) used by
//!   `{token.variant}` references and transform expressions;
//! - **keys**: flat aliases (`w` → `width`) used by `{token}` references
//!   and `$`-prefixed property keys.
//!
//! Dictionaries are built once at configuration time from a root layer
//! plus zero or more theme override layers, and are read-only afterwards.
//! Two variant names inside a set are reserved: `def` is the fallback
//! variant consulted when a requested variant is missing, and `unit` is a
//! suffix applied to numeric variant values when they are substituted into
//! a `{1}` template slot.

use cascata_tree::StyleNode;
use indexmap::IndexMap;

/// Format a numeric token value the way CSS wants it: integral values
/// render without a fractional part.
pub(crate) fn fmt_num(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// A single token value inside a set.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Str(String),
    Num(f64),
}

impl TokenValue {
    /// Render the value for substitution, applying `unit` to numbers.
    pub fn render(&self, unit: Option<&str>) -> String {
        match self {
            TokenValue::Str(s) => s.clone(),
            TokenValue::Num(n) => match unit {
                Some(unit) => format!("{}{}", fmt_num(*n), unit),
                None => fmt_num(*n),
            },
        }
    }

    /// Convert into a style-tree node, without applying any unit.
    pub fn to_node(&self) -> StyleNode {
        match self {
            TokenValue::Str(s) => StyleNode::Str(s.clone()),
            TokenValue::Num(n) => StyleNode::Num(*n),
        }
    }
}

impl From<&str> for TokenValue {
    fn from(value: &str) -> Self {
        TokenValue::Str(value.to_string())
    }
}

impl From<String> for TokenValue {
    fn from(value: String) -> Self {
        TokenValue::Str(value)
    }
}

impl From<f64> for TokenValue {
    fn from(value: f64) -> Self {
        TokenValue::Num(value)
    }
}

impl From<i32> for TokenValue {
    fn from(value: i32) -> Self {
        TokenValue::Num(value as f64)
    }
}

/// An ordered set of token variants, with an optional unit suffix.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenSet {
    values: IndexMap<String, TokenValue>,
    unit: Option<String>,
}

impl TokenSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from variant/value pairs, preserving order.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<TokenValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            unit: None,
        }
    }

    /// Build a set from a map node. String and number leaves become
    /// variants; the reserved `unit` entry becomes the set's unit suffix;
    /// anything else is ignored.
    pub fn from_node(node: &StyleNode) -> Self {
        let mut set = TokenSet::new();
        if let Some(map) = node.as_map() {
            for (variant, value) in map {
                match (variant.as_str(), value) {
                    ("unit", StyleNode::Str(unit)) => set.unit = Some(unit.clone()),
                    (_, StyleNode::Str(s)) => {
                        set.values
                            .insert(variant.clone(), TokenValue::Str(s.clone()));
                    }
                    (_, StyleNode::Num(n)) => {
                        set.values.insert(variant.clone(), TokenValue::Num(*n));
                    }
                    _ => {}
                }
            }
        }
        set
    }

    /// Attach a unit suffix for numeric variant values.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Insert or overwrite one variant.
    pub fn insert(&mut self, variant: impl Into<String>, value: impl Into<TokenValue>) {
        self.values.insert(variant.into(), value.into());
    }

    /// Look up a variant by exact name.
    pub fn get(&self, variant: &str) -> Option<&TokenValue> {
        self.values.get(variant)
    }

    /// Look up a variant, falling back to the reserved `def` entry.
    pub fn get_or_def(&self, variant: &str) -> Option<&TokenValue> {
        self.values.get(variant).or_else(|| self.values.get("def"))
    }

    /// The unit suffix, if any.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Keep only the listed variants, in the listed order. Unknown names
    /// are skipped; the unit carries over.
    pub fn filtered(&self, variants: &[&str]) -> TokenSet {
        let mut out = TokenSet {
            values: IndexMap::new(),
            unit: self.unit.clone(),
        };
        for variant in variants {
            if let Some(value) = self.values.get(*variant) {
                out.values.insert((*variant).to_string(), value.clone());
            }
        }
        out
    }

    /// Iterate variants in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge another set over this one: variants overwrite per name, a
    /// unit on the overlay wins.
    fn overlay(&mut self, other: &TokenSet) {
        for (variant, value) in &other.values {
            self.values.insert(variant.clone(), value.clone());
        }
        if other.unit.is_some() {
            self.unit = other.unit.clone();
        }
    }
}

/// The immutable layered token dictionary.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    sets: IndexMap<String, TokenSet>,
    keys: IndexMap<String, String>,
}

impl Dictionary {
    /// Start building a dictionary.
    pub fn builder() -> DictionaryBuilder {
        DictionaryBuilder::default()
    }

    /// Look up a token set.
    pub fn set(&self, name: &str) -> Option<&TokenSet> {
        self.sets.get(name)
    }

    /// Look up a key alias.
    pub fn key(&self, alias: &str) -> Option<&str> {
        self.keys.get(alias).map(String::as_str)
    }
}

/// Builder merging a root layer and any number of override layers.
#[derive(Debug, Clone, Default)]
pub struct DictionaryBuilder {
    sets: IndexMap<String, TokenSet>,
    keys: IndexMap<String, String>,
}

impl DictionaryBuilder {
    /// Add or overlay one set.
    pub fn set(mut self, name: impl Into<String>, set: TokenSet) -> Self {
        let name = name.into();
        match self.sets.get_mut(&name) {
            Some(existing) => existing.overlay(&set),
            None => {
                self.sets.insert(name, set);
            }
        }
        self
    }

    /// Add or overwrite one key alias.
    pub fn key(mut self, alias: impl Into<String>, long: impl Into<String>) -> Self {
        self.keys.insert(alias.into(), long.into());
        self
    }

    /// Add every set found in a map node (name → set map).
    pub fn sets_from(mut self, node: &StyleNode) -> Self {
        if let Some(map) = node.as_map() {
            for (name, set_node) in map {
                self = self.set(name.clone(), TokenSet::from_node(set_node));
            }
        }
        self
    }

    /// Add every key alias found in a map node (alias → long-name map).
    pub fn keys_from(mut self, node: &StyleNode) -> Self {
        if let Some(map) = node.as_map() {
            for (alias, long) in map {
                if let Some(long) = long.as_str() {
                    self.keys.insert(alias.clone(), long.to_string());
                }
            }
        }
        self
    }

    /// Overlay a whole theme layer: its sets merge per-variant, its keys
    /// overwrite per-alias.
    pub fn layer(mut self, layer: &Dictionary) -> Self {
        for (name, set) in &layer.sets {
            self = self.set(name.clone(), set.clone());
        }
        for (alias, long) in &layer.keys {
            self.keys.insert(alias.clone(), long.clone());
        }
        self
    }

    /// Finish building; the result is read-only.
    pub fn build(self) -> Dictionary {
        Dictionary {
            sets: self.sets,
            keys: self.keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numeric_values_render_with_unit() {
        let set = TokenSet::from_pairs([("m", 1.0), ("half", 0.5)]).with_unit("rem");
        assert_eq!(set.get("m").unwrap().render(set.unit()), "1rem");
        assert_eq!(set.get("half").unwrap().render(set.unit()), "0.5rem");
    }

    #[test]
    fn string_values_ignore_unit() {
        let set = TokenSet::from_pairs([("m", "1rem")]).with_unit("px");
        assert_eq!(set.get("m").unwrap().render(set.unit()), "1rem");
    }

    #[test]
    fn def_fallback() {
        let set = TokenSet::from_pairs([("def", "4px"), ("m", "8px")]);
        assert_eq!(set.get_or_def("m").unwrap().render(None), "8px");
        assert_eq!(set.get_or_def("missing").unwrap().render(None), "4px");
    }

    #[test]
    fn filtered_keeps_listed_order_and_unit() {
        let set = TokenSet::from_pairs([("s", 4), ("m", 8), ("l", 16)]).with_unit("px");
        let out = set.filtered(&["m", "s", "nope"]);
        let names: Vec<&str> = out.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["m", "s"]);
        assert_eq!(out.unit(), Some("px"));
    }

    #[test]
    fn layers_merge_per_variant() {
        let root = Dictionary::builder()
            .set("sp", TokenSet::from_pairs([("s", 4), ("m", 8)]))
            .key("w", "width")
            .build();
        let theme = Dictionary::builder()
            .set("sp", TokenSet::from_pairs([("m", 10)]))
            .key("h", "height")
            .build();

        let merged = Dictionary::builder().layer(&root).layer(&theme).build();
        let sp = merged.set("sp").unwrap();
        assert_eq!(sp.get("s"), Some(&TokenValue::Num(4.0)));
        assert_eq!(sp.get("m"), Some(&TokenValue::Num(10.0)));
        assert_eq!(merged.key("w"), Some("width"));
        assert_eq!(merged.key("h"), Some("height"));
    }

    #[test]
    fn builder_loads_sets_and_keys_from_nodes() {
        let sets = StyleNode::from_json(r#"{"sp": {"unit": "px", "s": 4}}"#).unwrap();
        let keys = StyleNode::from_json(r#"{"w": "width", "bad": 4}"#).unwrap();
        let dict = Dictionary::builder().sets_from(&sets).keys_from(&keys).build();

        assert_eq!(dict.set("sp").unwrap().get("s"), Some(&TokenValue::Num(4.0)));
        assert_eq!(dict.key("w"), Some("width"));
        // Non-string aliases are skipped.
        assert_eq!(dict.key("bad"), None);
    }

    #[test]
    fn set_from_node_extracts_unit() {
        let node = StyleNode::from_json(r#"{"unit": "rem", "m": 1}"#).unwrap();
        let set = TokenSet::from_node(&node);
        assert_eq!(set.unit(), Some("rem"));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("m").unwrap().render(set.unit()), "1rem");
    }
}
