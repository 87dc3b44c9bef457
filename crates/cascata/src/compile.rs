/*
 * compile.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The tree-walking stringifier.
//!
//! Compilation walks a unit's content tree and emits nested CSS text.
//! Per node, the key's prefix decides its meaning (in priority order):
//! `_`/`__` a BEM group, `$` a key-dictionary property alias, `@` an
//! at-rule passthrough, `&` an explicit parent-relative selector;
//! otherwise an object value is a literal selector and a scalar value a
//! literal property.
//!
//! Within one rule body, declarations are emitted before nested rules;
//! rule order otherwise follows tree order exactly — cascade order is
//! semantically significant. The implicit `&` prefix is added only when a
//! plain selector nests inside another plain selector: first-level
//! content inside an at-rule is independent, and top-level keys are
//! already absolute.
//!
//! Top-level output order is fixed: `@property` declarations, then
//! `@keyframes` blocks, then the walked content tree, concatenated with
//! no separators.

use cascata_tree::{deep_merge, StyleMap, StyleNode};
use indexmap::IndexMap;

use crate::config::UnitConfig;
use crate::diag::DiagnosticCollector;
use crate::dict::{fmt_num, Dictionary, TokenSet};
use crate::interp::{interpolate, transform, Locals};
use crate::scope::{BemPath, Resolver};

/// Shared walk state for one compile call.
pub(crate) struct EvalState<'a> {
    pub dict: &'a Dictionary,
    /// Unit-local key aliases, extended with injected var/frame names.
    pub keys: IndexMap<String, String>,
    pub sets: &'a IndexMap<String, TokenSet>,
    pub diag: DiagnosticCollector,
}

fn interp_in(st: &mut EvalState, input: &str) -> String {
    interpolate(input, &Locals::new(&st.keys, st.sets), st.dict, &mut st.diag)
}

fn transform_in(st: &mut EvalState, expr: &str) -> Option<StyleMap> {
    transform(expr, &Locals::new(&st.keys, st.sets), st.dict, &mut st.diag)
}

/// What the current map nests inside; decides the implicit `&` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parent {
    Top,
    Selector,
    AtRule,
}

/// One rule body under construction: declarations first, nested rules
/// after.
#[derive(Default)]
struct Sink {
    decls: String,
    rules: String,
}

impl Sink {
    fn is_empty(&self) -> bool {
        self.decls.is_empty() && self.rules.is_empty()
    }

    fn assemble(self) -> String {
        let mut out = self.decls;
        out.push_str(&self.rules);
        out
    }
}

/// Compile one unit against the resolver for its identifier.
pub(crate) fn compile_unit(cfg: &UnitConfig, st: &mut EvalState, r: &mut Resolver) -> String {
    let mut out = String::new();

    // Resolve var/frame names first and inject them as local key aliases,
    // so content (and var initial values) can reference them as `{name}`.
    let mut vars = Vec::with_capacity(cfg.vars.len());
    for (name, decl) in &cfg.vars {
        let resolved = if decl.full {
            format!("--{name}")
        } else {
            r.var_name(&[name])
        };
        st.keys.insert(name.clone(), format!("var({resolved})"));
        vars.push((resolved, decl));
    }
    let mut frames = Vec::with_capacity(cfg.frames.len());
    for (name, body) in &cfg.frames {
        let resolved = r.name(&[name]);
        st.keys.insert(name.clone(), resolved.clone());
        frames.push((resolved, body));
    }

    for (name, decl) in &vars {
        out.push_str("@property ");
        out.push_str(name);
        out.push('{');
        out.push_str(&format!("syntax:\"{}\";inherits:{};", decl.syntax, decl.inherits));
        if !decl.initial.is_empty() {
            let initial = interp_in(st, &decl.initial);
            out.push_str(&format!("initial-value:{initial};"));
        }
        out.push('}');
    }

    for (name, body) in &frames {
        out.push_str("@keyframes ");
        out.push_str(name);
        out.push('{');
        if let Some(map) = body.as_map() {
            for (label, frame) in map {
                let Some(frame_map) = frame.as_map() else {
                    continue;
                };
                let mut inner = Sink::default();
                walk_map(frame_map, Parent::AtRule, &mut inner, st, r);
                out.push_str(&normalize_frame_label(label));
                out.push('{');
                out.push_str(&inner.assemble());
                out.push('}');
            }
        }
        out.push('}');
    }

    if let Some(content) = cfg.content_map() {
        let mut sink = Sink::default();
        walk_map(content, Parent::Top, &mut sink, st, r);
        if !sink.decls.is_empty() {
            out.push_str(&r.selector(&BemPath::root()));
            out.push('{');
            out.push_str(&sink.decls);
            out.push('}');
        }
        out.push_str(&sink.rules);
    }

    out
}

/// `0` → `0%`; `from`/`to` and anything non-numeric pass through; comma
/// lists normalize element-wise.
pub(crate) fn normalize_frame_label(label: &str) -> String {
    label
        .split(',')
        .map(|part| {
            let part = part.trim();
            if !part.is_empty()
                && part.chars().all(|c| c.is_ascii_digit() || c == '.')
            {
                format!("{part}%")
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn walk_map(map: &StyleMap, parent: Parent, sink: &mut Sink, st: &mut EvalState, r: &mut Resolver) {
    for (key, value) in map {
        walk_entry(key, value, parent, sink, st, r);
    }
}

fn walk_entry(
    key: &str,
    value: &StyleNode,
    parent: Parent,
    sink: &mut Sink,
    st: &mut EvalState,
    r: &mut Resolver,
) {
    // `$` keys resolve through the key dictionary before anything else;
    // an empty lookup drops the whole node.
    let resolved_key;
    let key = if let Some(alias) = key.strip_prefix('$') {
        let looked_up = st
            .keys
            .get(alias)
            .map(String::as_str)
            .or_else(|| st.dict.key(alias))
            .unwrap_or("");
        if looked_up.is_empty() {
            st.diag
                .dropped("C-KEY-1", format!("no key entry for '${alias}'"));
            return;
        }
        resolved_key = looked_up.to_string();
        resolved_key.as_str()
    } else {
        key
    };

    match value {
        StyleNode::Null => {}
        StyleNode::List(items) => {
            let merged = merge_list(items, st);
            if !merged.is_empty() {
                consume_map(key, &merged, parent, sink, st, r);
            }
        }
        StyleNode::Map(map) => walk_entry_map(key, map, parent, sink, st, r),
        StyleNode::Str(s) if s.starts_with('&') => {
            if let Some(result) = transform_in(st, s) {
                consume_map(key, &result, parent, sink, st, r);
            }
        }
        StyleNode::Str(s) => {
            let value = if s.contains('{') {
                interp_in(st, s)
            } else {
                s.clone()
            };
            push_decl(key, &value, sink, st);
        }
        StyleNode::Num(n) => push_decl(key, &fmt_num(*n), sink, st),
    }
}

/// Consume a transform- or array-produced mapping at `key`. A flat
/// all-scalar result under a plain key merges into the sibling
/// declarations (one-property-to-many expansion); anything else recurses
/// as if it were an object value at the same key.
fn consume_map(
    key: &str,
    map: &StyleMap,
    parent: Parent,
    sink: &mut Sink,
    st: &mut EvalState,
    r: &mut Resolver,
) {
    let flat = map
        .values()
        .all(|v| matches!(v, StyleNode::Str(_) | StyleNode::Num(_)));
    let structural = key.starts_with('_') || key.starts_with('@') || key.starts_with('&');
    if flat && !structural {
        for (prop, value) in map {
            match value {
                StyleNode::Str(s) => push_decl(prop, s, sink, st),
                StyleNode::Num(n) => push_decl(prop, &fmt_num(*n), sink, st),
                _ => {}
            }
        }
    } else {
        walk_entry_map(key, map, parent, sink, st, r);
    }
}

fn walk_entry_map(
    key: &str,
    map: &StyleMap,
    parent: Parent,
    sink: &mut Sink,
    st: &mut EvalState,
    r: &mut Resolver,
) {
    let prefix = if parent == Parent::Selector && !key.starts_with('&') && !key.starts_with('@') {
        "&"
    } else {
        ""
    };

    if key.starts_with('@') {
        let header = if key.contains('{') {
            interp_in(st, key)
        } else {
            key.to_string()
        };
        let mut inner = Sink::default();
        walk_map(map, Parent::AtRule, &mut inner, st, r);
        if !inner.is_empty() {
            sink.rules.push_str(&header);
            sink.rules.push('{');
            sink.rules.push_str(&inner.assemble());
            sink.rules.push('}');
        }
        return;
    }

    if key.starts_with('_') {
        walk_bem(key, map, prefix, sink, st, r);
        return;
    }

    let sel = if key.contains('{') {
        interp_in(st, key)
    } else {
        key.to_string()
    };
    let mut inner = Sink::default();
    walk_map(map, Parent::Selector, &mut inner, st, r);
    if !inner.is_empty() {
        sink.rules.push_str(prefix);
        sink.rules.push_str(&sel);
        sink.rules.push('{');
        sink.rules.push_str(&inner.assemble());
        sink.rules.push('}');
    }
}

fn walk_bem(
    key: &str,
    map: &StyleMap,
    prefix: &str,
    sink: &mut Sink,
    st: &mut EvalState,
    r: &mut Resolver,
) {
    // A `:`-suffixed state rides along verbatim (`_tab:hover`).
    let (bem_key, state) = match key.find(':') {
        Some(i) => (&key[..i], &key[i..]),
        None => (key, ""),
    };
    let path = parse_bem_key(bem_key);

    // Modifier-value expansion: a group with no explicit value whose
    // children are all bare-keyed maps emits one rule per value.
    let expandable = path.modifiers().last().is_none_or(|(_, v)| v.is_none());
    let all_maps = !map.is_empty() && map.values().all(|v| v.as_map().is_some());
    let bare_keys = map.keys().all(|k| is_bare_token(k));

    if expandable && all_maps && bare_keys {
        for (value, child) in map {
            let Some(child_map) = child.as_map() else {
                continue;
            };
            let sel = r.selector(&path.clone().with_value(value));
            emit_rule(&sel, state, prefix, child_map, sink, st, r);
        }
    } else {
        let sel = r.selector(&path);
        emit_rule(&sel, state, prefix, map, sink, st, r);
    }
}

fn emit_rule(
    sel: &str,
    state: &str,
    prefix: &str,
    body: &StyleMap,
    sink: &mut Sink,
    st: &mut EvalState,
    r: &mut Resolver,
) {
    let mut inner = Sink::default();
    walk_map(body, Parent::Selector, &mut inner, st, r);
    if inner.is_empty() {
        return;
    }
    sink.rules.push_str(prefix);
    sink.rules.push_str(sel);
    sink.rules.push_str(state);
    sink.rules.push('{');
    sink.rules.push_str(&inner.assemble());
    sink.rules.push('}');
}

/// Best-effort BEM key parse; undefined components default to empty and
/// never fail. `_elem`, `_elem_mod`, `__elem_mod_value`, `__mod_value`.
fn parse_bem_key(key: &str) -> BemPath {
    let doubled = key.starts_with("__");
    let trimmed = key.trim_start_matches('_');
    let comps: Vec<&str> = trimmed.split('_').filter(|c| !c.is_empty()).collect();

    if doubled {
        match comps.as_slice() {
            [] => BemPath::root(),
            [value] => BemPath::root().modifier_value("", *value),
            [modifier, value] => BemPath::root().modifier_value(*modifier, *value),
            [element, modifier, value, ..] => {
                BemPath::element(*element).modifier_value(*modifier, *value)
            }
        }
    } else {
        match comps.as_slice() {
            [] => BemPath::root(),
            [element] => BemPath::element(*element),
            [element, modifier, ..] => BemPath::element(*element).modifier(*modifier),
        }
    }
}

fn is_bare_token(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn push_decl(key: &str, value: &str, sink: &mut Sink, st: &mut EvalState) {
    if value.is_empty() {
        st.diag
            .dropped("C-DECL-1", format!("empty value for '{key}' dropped"));
        return;
    }
    sink.decls.push_str(&hyphen_case(key));
    sink.decls.push(':');
    sink.decls.push_str(value);
    sink.decls.push(';');
}

/// `paddingLeft` → `padding-left`; custom properties pass through.
fn hyphen_case(key: &str) -> String {
    if key.starts_with("--") {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn merge_list(items: &[StyleNode], st: &mut EvalState) -> StyleMap {
    let mut acc = StyleNode::Map(StyleMap::new());
    for item in items {
        match item {
            StyleNode::Str(expr) => {
                if let Some(map) = transform_in(st, expr) {
                    deep_merge(&mut acc, &StyleNode::Map(map));
                }
            }
            StyleNode::Map(_) => deep_merge(&mut acc, item),
            _ => {}
        }
    }
    match acc {
        StyleNode::Map(map) => map,
        _ => StyleMap::new(),
    }
}
