/*
 * node.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The style-configuration value type.

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

use crate::TreeResult;

/// Ordered map from selector/property keys to child nodes.
pub type StyleMap = IndexMap<String, StyleNode>;

/// A node in a style-configuration tree.
///
/// This is a closed sum type: the compiler never reflects on arbitrary
/// host objects, it walks exactly these five shapes. Map entries keep
/// insertion order (cascade order is semantically significant).
///
/// JSON booleans deserialize as the strings `"true"`/`"false"` — CSS has
/// no boolean values, and keeping them as strings lets flags like
/// `inherits` round-trip through the same tree as everything else.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StyleNode {
    /// Absent value; compiles to nothing.
    #[default]
    Null,
    /// A literal, a `{token}` template, or a `&expr` transform expression.
    Str(String),
    /// A numeric value, emitted without a unit.
    Num(f64),
    /// A union of alternatives, merged during compilation.
    List(Vec<StyleNode>),
    /// Nested rules and declarations.
    Map(StyleMap),
}

impl StyleNode {
    /// Parse a node from JSON text.
    pub fn from_json(text: &str) -> TreeResult<StyleNode> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build a string node.
    pub fn str(value: impl Into<String>) -> StyleNode {
        StyleNode::Str(value.into())
    }

    /// Build a number node.
    pub fn num(value: f64) -> StyleNode {
        StyleNode::Num(value)
    }

    /// Build a map node from key/value pairs, preserving order.
    pub fn map<K, V, I>(entries: I) -> StyleNode
    where
        K: Into<String>,
        V: Into<StyleNode>,
        I: IntoIterator<Item = (K, V)>,
    {
        StyleNode::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a list node.
    pub fn list<V: Into<StyleNode>, I: IntoIterator<Item = V>>(items: I) -> StyleNode {
        StyleNode::List(items.into_iter().map(Into::into).collect())
    }

    /// True for [`StyleNode::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, StyleNode::Null)
    }

    /// The string payload, if this is a string node.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleNode::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric payload, if this is a number node.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            StyleNode::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// The map payload, if this is a map node.
    pub fn as_map(&self) -> Option<&StyleMap> {
        match self {
            StyleNode::Map(m) => Some(m),
            _ => None,
        }
    }

    /// The list payload, if this is a list node.
    pub fn as_list(&self) -> Option<&[StyleNode]> {
        match self {
            StyleNode::List(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a direct child of a map node.
    pub fn get(&self, key: &str) -> Option<&StyleNode> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// True when every direct child of a map node is itself a map.
    ///
    /// Used by the compiler to detect BEM modifier-value expansion.
    pub fn all_children_maps(&self) -> bool {
        match self {
            StyleNode::Map(m) => !m.is_empty() && m.values().all(|v| v.as_map().is_some()),
            _ => false,
        }
    }
}

impl From<&str> for StyleNode {
    fn from(value: &str) -> Self {
        StyleNode::Str(value.to_string())
    }
}

impl From<String> for StyleNode {
    fn from(value: String) -> Self {
        StyleNode::Str(value)
    }
}

impl From<f64> for StyleNode {
    fn from(value: f64) -> Self {
        StyleNode::Num(value)
    }
}

impl From<i32> for StyleNode {
    fn from(value: i32) -> Self {
        StyleNode::Num(value as f64)
    }
}

impl From<StyleMap> for StyleNode {
    fn from(value: StyleMap) -> Self {
        StyleNode::Map(value)
    }
}

impl From<serde_json::Value> for StyleNode {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => StyleNode::Null,
            Value::Bool(b) => StyleNode::Str(if b { "true" } else { "false" }.to_string()),
            Value::Number(n) => StyleNode::Num(n.as_f64().unwrap_or(0.0)),
            Value::String(s) => StyleNode::Str(s),
            Value::Array(items) => {
                StyleNode::List(items.into_iter().map(StyleNode::from).collect())
            }
            Value::Object(entries) => StyleNode::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, StyleNode::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for StyleNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StyleNode::Null => serializer.serialize_none(),
            StyleNode::Str(s) => serializer.serialize_str(s),
            StyleNode::Num(n) => serializer.serialize_f64(*n),
            StyleNode::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            StyleNode::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for StyleNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = StyleNode;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a style-configuration value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<StyleNode, E> {
        Ok(StyleNode::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<StyleNode, E> {
        Ok(StyleNode::Null)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<StyleNode, E> {
        Ok(StyleNode::Str(
            if value { "true" } else { "false" }.to_string(),
        ))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<StyleNode, E> {
        Ok(StyleNode::Num(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<StyleNode, E> {
        Ok(StyleNode::Num(value as f64))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<StyleNode, E> {
        Ok(StyleNode::Num(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<StyleNode, E> {
        Ok(StyleNode::Str(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<StyleNode, E> {
        Ok(StyleNode::Str(value))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<StyleNode, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(StyleNode::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<StyleNode, A::Error> {
        let mut entries = StyleMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, StyleNode>()? {
            entries.insert(key, value);
        }
        Ok(StyleNode::Map(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_round_trip_preserves_order() {
        let node = StyleNode::from_json(r#"{"z": 1, "a": "x", "m": {"k": null}}"#).unwrap();
        let map = node.as_map().unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(map.get("m").unwrap().get("k"), Some(&StyleNode::Null));
    }

    #[test]
    fn booleans_become_strings() {
        let node = StyleNode::from_json(r#"{"inherits": true}"#).unwrap();
        assert_eq!(node.get("inherits").and_then(StyleNode::as_str), Some("true"));
    }

    #[test]
    fn from_json_value_matches_deserialize() {
        let text = r#"{"w": 4, "list": ["a", 2], "flag": false}"#;
        let direct = StyleNode::from_json(text).unwrap();
        let via_value: StyleNode = serde_json::from_str::<serde_json::Value>(text)
            .unwrap()
            .into();
        assert_eq!(direct, via_value);
    }

    #[test]
    fn all_children_maps_detects_expansion_shape() {
        let expansion = StyleNode::from_json(r#"{"m": {"width": "1rem"}, "l": {"width": "2rem"}}"#)
            .unwrap();
        assert!(expansion.all_children_maps());

        let declarations = StyleNode::from_json(r#"{"width": "1rem"}"#).unwrap();
        assert!(!declarations.all_children_maps());

        assert!(!StyleNode::Map(StyleMap::new()).all_children_maps());
    }
}
