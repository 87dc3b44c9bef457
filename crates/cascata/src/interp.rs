/*
 * interp.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The `{token}` interpolation and `&expr=>template` transform language.
//!
//! Interpolation replaces every `{token}` or `{token.variant}` occurrence
//! in a string. Bare tokens resolve through the unit-local key dictionary
//! first, then the global one; dotted tokens resolve the set (local
//! first), then the variant, then the set's `def` entry. Anything
//! unresolved substitutes the empty string — a missing theme token must
//! not break an entire stylesheet.
//!
//! A transform expression is `clause?clause?...`, each clause being
//! `pattern=>template` (or a bare template as the last fallback). The
//! pattern names a set, optionally restricted to a variant subset with
//! `name[v1,v2]`. The first clause whose set exists wins:
//!
//! - no template: the filtered set passes through unchanged;
//! - a template containing `{0}` splits at the first `:` into a key part
//!   and a value part, and re-keys each variant (`{0}` → variant name,
//!   `{1}` → variant value with the set's unit applied to numbers);
//! - a template without `{0}` keeps variant names as keys and renders the
//!   whole template as each variant's value; a `prop:value` result becomes
//!   a one-declaration map, which is the shape BEM modifier-value
//!   expansion consumes.
//!
//! Both key and value parts are interpolated after substitution, so
//! templates can mix positional slots with dictionary references
//! (`{w}:{1}` → `width:1rem`).

use cascata_tree::{StyleMap, StyleNode};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::diag::DiagnosticCollector;
use crate::dict::{Dictionary, TokenSet};

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    // `{0}`/`{1}` positional slots start with a digit and deliberately
    // don't match here.
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_-]*)(?:\.([A-Za-z0-9_-]+))?\}").unwrap()
});

/// Unit-local dictionaries declared on a compiled unit.
pub struct Locals<'a> {
    pub keys: &'a IndexMap<String, String>,
    pub sets: &'a IndexMap<String, TokenSet>,
}

static EMPTY_KEYS: Lazy<IndexMap<String, String>> = Lazy::new(IndexMap::new);
static EMPTY_SETS: Lazy<IndexMap<String, TokenSet>> = Lazy::new(IndexMap::new);

impl<'a> Locals<'a> {
    pub fn new(
        keys: &'a IndexMap<String, String>,
        sets: &'a IndexMap<String, TokenSet>,
    ) -> Self {
        Self { keys, sets }
    }

    /// No local overrides; everything resolves through the dictionary.
    pub fn empty() -> Locals<'static> {
        Locals {
            keys: &EMPTY_KEYS,
            sets: &EMPTY_SETS,
        }
    }

    fn key<'b>(&'b self, alias: &str, dict: &'b Dictionary) -> Option<&'b str> {
        self.keys.get(alias).map(String::as_str).or_else(|| dict.key(alias))
    }

    fn set<'b>(&'b self, name: &str, dict: &'b Dictionary) -> Option<&'b TokenSet> {
        self.sets.get(name).or_else(|| dict.set(name))
    }
}

/// Replace every `{token}` / `{token.variant}` reference in `input`.
pub fn interpolate(
    input: &str,
    locals: &Locals,
    dict: &Dictionary,
    diag: &mut DiagnosticCollector,
) -> String {
    TOKEN_RE
        .replace_all(input, |caps: &Captures| -> String {
            let token = &caps[1];
            match caps.get(2) {
                None => match locals.key(token, dict) {
                    Some(long) => long.to_string(),
                    None => {
                        diag.dropped("C-INTERP-1", format!("unknown key token '{token}'"));
                        String::new()
                    }
                },
                Some(variant) => {
                    let variant = variant.as_str();
                    match locals.set(token, dict) {
                        Some(set) => match set.get_or_def(variant) {
                            Some(value) => value.render(set.unit()),
                            None => {
                                diag.dropped(
                                    "C-INTERP-2",
                                    format!("set '{token}' has no variant '{variant}' and no def"),
                                );
                                String::new()
                            }
                        },
                        None => {
                            diag.dropped("C-INTERP-2", format!("unknown set '{token}'"));
                            String::new()
                        }
                    }
                }
            }
        })
        .into_owned()
}

/// Evaluate a transform expression to an ordered mapping, or `None` when
/// no clause matches. A leading `&` sigil is accepted and ignored.
pub fn transform(
    expr: &str,
    locals: &Locals,
    dict: &Dictionary,
    diag: &mut DiagnosticCollector,
) -> Option<StyleMap> {
    let expr = expr.strip_prefix('&').unwrap_or(expr);
    for clause in expr.split('?') {
        let clause = clause.trim();
        if clause.is_empty() {
            continue;
        }
        match clause.split_once("=>") {
            Some((pattern, template)) => {
                let (name, filters) = parse_pattern(pattern.trim());
                let Some(set) = locals.set(name, dict) else {
                    diag.dropped("C-XFORM-1", format!("transform set '{name}' not found"));
                    continue;
                };
                let set = match &filters {
                    Some(list) => {
                        set.filtered(&list.iter().map(String::as_str).collect::<Vec<_>>())
                    }
                    None => set.clone(),
                };
                return Some(apply_template(&set, template.trim(), locals, dict, diag));
            }
            None => {
                // Bare fallback template: a single `prop:value` entry.
                if let Some((prop, value)) = clause.split_once(':') {
                    let mut out = StyleMap::new();
                    out.insert(
                        interpolate(prop, locals, dict, diag),
                        StyleNode::Str(interpolate(value, locals, dict, diag)),
                    );
                    return Some(out);
                }
                diag.dropped("C-XFORM-1", format!("fallback clause '{clause}' is not a declaration"));
            }
        }
    }
    diag.dropped("C-XFORM-2", format!("no clause matched in '{expr}'"));
    None
}

/// Split `name[v1,v2,...]` into the set name and the optional filter.
fn parse_pattern(pattern: &str) -> (&str, Option<Vec<String>>) {
    let Some(open) = pattern.find('[') else {
        return (pattern, None);
    };
    let Some(rest) = pattern[open..].strip_prefix('[').and_then(|r| r.strip_suffix(']')) else {
        return (pattern, None);
    };
    let filters = rest
        .split(',')
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    (&pattern[..open], Some(filters))
}

fn apply_template(
    set: &TokenSet,
    template: &str,
    locals: &Locals,
    dict: &Dictionary,
    diag: &mut DiagnosticCollector,
) -> StyleMap {
    let mut out = StyleMap::new();
    if template.is_empty() {
        // No template: the filtered set passes through unchanged.
        for (variant, value) in set.iter() {
            out.insert(variant.to_string(), value.to_node());
        }
        return out;
    }

    if template.contains("{0}") {
        // Re-keying form: `{0}:{1}px` over {s:4, m:8} → {s: "4px", m: "8px"}.
        let (key_part, value_part) = template.split_once(':').unwrap_or((template, ""));
        for (variant, value) in set.iter() {
            let key = interpolate(&key_part.replace("{0}", variant), locals, dict, diag);
            let rendered = value_part.replace("{1}", &value.render(set.unit()));
            out.insert(key, StyleNode::Str(interpolate(&rendered, locals, dict, diag)));
        }
        return out;
    }

    // Variant-keyed form: `{w}:{1}` over {m: 1 (unit rem)} →
    // {m: {width: "1rem"}}.
    for (variant, value) in set.iter() {
        let rendered = template.replace("{1}", &value.render(set.unit()));
        let body = interpolate(&rendered, locals, dict, diag);
        let node = match body.split_once(':') {
            Some((prop, val)) => {
                let mut decl = StyleMap::new();
                decl.insert(prop.to_string(), StyleNode::Str(val.to_string()));
                StyleNode::Map(decl)
            }
            None => StyleNode::Str(body),
        };
        out.insert(variant.to_string(), node);
    }
    out
}
