/*
 * scope.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Name and selector resolution, scoped per stylesheet identifier.
//!
//! Everything the compiler emits that carries a name goes through this
//! module: BEM selectors, custom-property names, `var()` expressions, and
//! the runtime attribute/class pairs a host hands to its render roots.
//!
//! # Minification
//!
//! A [`ScopeState`] optionally carries an append-only table from long
//! tokens to short base-36 codes. Codes are assigned on first sight and
//! never reassigned, so repeated compilations of the same logical unit
//! produce byte-identical output — the server/client consistency
//! requirement. A persisted table can be re-imported; import is a union
//! that never overwrites live entries.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const ALPHANUM: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Encode a counter as a short identifier-safe code: the first character
/// is always a letter, so codes are valid CSS ident starts.
pub(crate) fn short_code(mut n: u64) -> String {
    let mut out = String::new();
    out.push(LETTERS[(n % 26) as usize] as char);
    n /= 26;
    while n > 0 {
        out.push(ALPHANUM[(n % 36) as usize] as char);
        n /= 36;
    }
    out
}

/// How generated selectors address elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorMode {
    /// `[data-id-elem-mod~="value"]` attribute selectors.
    #[default]
    Attribute,
    /// `.id-elem-mod_value` class selectors.
    Class,
}

/// Mutable per-identifier naming state.
///
/// One instance per stylesheet identifier, exclusively owned by the
/// caller (the [`crate::Compiler`] keeps one per identifier). Entries are
/// only ever added.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeState {
    /// Counter for auto-generated at-rule names.
    auto: u64,
    /// Minification table; `None` disables minification.
    codes: Option<IndexMap<String, String>>,
    /// Next candidate index for code assignment.
    code_seq: u64,
}

impl ScopeState {
    /// State with minification disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// State with an empty minification table.
    pub fn minifying() -> Self {
        Self {
            auto: 0,
            codes: Some(IndexMap::new()),
            code_seq: 0,
        }
    }

    /// Whether minification is enabled.
    pub fn is_minifying(&self) -> bool {
        self.codes.is_some()
    }

    /// Next auto-name index (for `@property`/`@keyframes`/`@layer`).
    pub fn next_index(&mut self) -> u64 {
        let n = self.auto;
        self.auto += 1;
        n
    }

    /// Resolve a long token to its short code, assigning one on first
    /// sight. With minification disabled the token passes through.
    pub fn code_for(&mut self, token: &str) -> String {
        let Some(codes) = &mut self.codes else {
            return token.to_string();
        };
        if let Some(code) = codes.get(token) {
            return code.clone();
        }
        // Imported tables may already hold arbitrary codes; skip candidates
        // until one is unused.
        loop {
            let candidate = short_code(self.code_seq);
            self.code_seq += 1;
            if !codes.values().any(|c| c == &candidate) {
                codes.insert(token.to_string(), candidate.clone());
                return candidate;
            }
        }
    }

    /// The minification table, if enabled.
    pub fn export_table(&self) -> Option<&IndexMap<String, String>> {
        self.codes.as_ref()
    }

    /// Union a persisted table into live state. Live entries win; an
    /// imported entry whose code is already in use is skipped, keeping
    /// the table injective.
    pub fn import_table(&mut self, table: &IndexMap<String, String>) {
        let codes = self.codes.get_or_insert_with(IndexMap::new);
        for (token, code) in table {
            if codes.contains_key(token) || codes.values().any(|c| c == code) {
                continue;
            }
            codes.insert(token.clone(), code.clone());
        }
    }
}

/// A structured BEM descriptor: an element plus a set of modifiers.
///
/// The block itself is the stylesheet identifier held by the
/// [`Resolver`]; an empty element addresses the block root. Modifier
/// order is first-seen order and is preserved, so a given input set
/// always renders the same way.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BemPath {
    element: String,
    modifiers: Vec<(String, Option<String>)>,
}

impl BemPath {
    /// The block root: no element, no modifiers.
    pub fn root() -> Self {
        Self::default()
    }

    /// A named element of the block.
    pub fn element(name: impl Into<String>) -> Self {
        Self {
            element: name.into(),
            modifiers: Vec::new(),
        }
    }

    /// Add a modifier without a value.
    pub fn modifier(mut self, name: impl Into<String>) -> Self {
        self.modifiers.push((name.into(), None));
        self
    }

    /// Add a modifier with a value.
    pub fn modifier_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.modifiers.push((name.into(), Some(value.into())));
        self
    }

    /// Attach a value to the last modifier, or to an anonymous modifier
    /// when none exists. Used by modifier-value expansion.
    pub(crate) fn with_value(mut self, value: &str) -> Self {
        match self.modifiers.last_mut() {
            Some((_, v @ None)) => *v = Some(value.to_string()),
            _ => self.modifiers.push((String::new(), Some(value.to_string()))),
        }
        self
    }

    pub fn element_name(&self) -> &str {
        &self.element
    }

    pub fn modifiers(&self) -> &[(String, Option<String>)] {
        &self.modifiers
    }

    /// Parse dotted-path strings (`"elem.mod.value"`, `"elem.mod"`,
    /// `"elem"`; a leading dot means the block root). All paths must
    /// address the same element — the first one wins; modifiers collect
    /// in first-seen order. This input form is equivalent to building the
    /// same path with the structured methods.
    pub fn from_dotted<S: AsRef<str>>(paths: &[S]) -> Self {
        let mut out = BemPath::root();
        let mut element_seen = false;
        for path in paths {
            let mut segments = path.as_ref().split('.');
            let element = segments.next().unwrap_or("");
            if !element_seen {
                out.element = element.to_string();
                element_seen = true;
            }
            if let Some(modifier) = segments.next() {
                let value = segments.next().map(str::to_string);
                out.modifiers.push((modifier.to_string(), value));
            }
        }
        out
    }
}

/// Name/selector resolver bound to one stylesheet identifier and its
/// [`ScopeState`]. Resolution never fails; unknown tokens are minified on
/// first sight.
#[derive(Debug)]
pub struct Resolver<'a> {
    id: &'a str,
    mode: SelectorMode,
    state: &'a mut ScopeState,
}

impl<'a> Resolver<'a> {
    pub fn new(id: &'a str, mode: SelectorMode, state: &'a mut ScopeState) -> Self {
        Self { id, mode, state }
    }

    pub fn mode(&self) -> SelectorMode {
        self.mode
    }

    pub fn identifier(&self) -> &str {
        self.id
    }

    /// Next auto-name index from the underlying state.
    pub fn auto_index(&mut self) -> u64 {
        self.state.next_index()
    }

    /// Join the identifier and the given parts with `-`, skipping empty
    /// parts. Parts (not the identifier) go through the minification
    /// table when enabled.
    pub fn name(&mut self, parts: &[&str]) -> String {
        let mut out = String::from(self.id);
        for part in parts {
            if part.is_empty() {
                continue;
            }
            out.push('-');
            out.push_str(&self.state.code_for(part));
        }
        out
    }

    /// `--` + [`Resolver::name`].
    pub fn var_name(&mut self, parts: &[&str]) -> String {
        format!("--{}", self.name(parts))
    }

    /// `var(` + [`Resolver::var_name`] + `)`.
    pub fn var_exp(&mut self, parts: &[&str]) -> String {
        format!("var({})", self.var_name(parts))
    }

    /// Render the canonical selector for a BEM path in the configured
    /// mode. Deterministic for a given modifier set.
    pub fn selector(&mut self, path: &BemPath) -> String {
        let element = path.element_name().to_string();
        if path.modifiers().is_empty() {
            return match self.mode {
                SelectorMode::Attribute => format!("[data-{}]", self.name(&[&element])),
                SelectorMode::Class => format!(".{}", self.name(&[&element])),
            };
        }
        let mut out = String::new();
        for (modifier, value) in path.modifiers() {
            let base = self.name(&[&element, modifier]);
            match (self.mode, value) {
                (SelectorMode::Attribute, Some(v)) => {
                    out.push_str(&format!("[data-{base}~=\"{v}\"]"));
                }
                (SelectorMode::Attribute, None) => out.push_str(&format!("[data-{base}]")),
                (SelectorMode::Class, Some(v)) => out.push_str(&format!(".{base}_{v}")),
                (SelectorMode::Class, None) => out.push_str(&format!(".{base}")),
            }
        }
        out
    }

    /// The runtime key/value pairs for a BEM path: one
    /// `("data-…", "values")` pair per distinct element+modifier in
    /// attribute mode, a single `("class", names)` pair in class mode.
    pub fn attr(&mut self, path: &BemPath) -> Vec<(String, String)> {
        let element = path.element_name().to_string();
        match self.mode {
            SelectorMode::Attribute => {
                if path.modifiers().is_empty() {
                    return vec![(format!("data-{}", self.name(&[&element])), String::new())];
                }
                // Group values by attribute name so repeated modifiers
                // word-join into one attribute.
                let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();
                for (modifier, value) in path.modifiers() {
                    let key = format!("data-{}", self.name(&[&element, modifier]));
                    let entry = grouped.entry(key).or_default();
                    if let Some(v) = value {
                        entry.push(v.clone());
                    }
                }
                grouped
                    .into_iter()
                    .map(|(k, vs)| (k, vs.join(" ")))
                    .collect()
            }
            SelectorMode::Class => {
                let mut names = Vec::new();
                if path.modifiers().is_empty() {
                    names.push(self.name(&[&element]));
                } else {
                    for (modifier, value) in path.modifiers() {
                        let base = self.name(&[&element, modifier]);
                        names.push(match value {
                            Some(v) => format!("{base}_{v}"),
                            None => base,
                        });
                    }
                }
                vec![("class".to_string(), names.join(" "))]
            }
        }
    }

    /// [`Resolver::attr`] over the dotted-path input form. Produces
    /// byte-identical output for an equivalent structured path.
    pub fn attr_from_dotted<S: AsRef<str>>(&mut self, paths: &[S]) -> Vec<(String, String)> {
        let path = BemPath::from_dotted(paths);
        self.attr(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolver<'a>(state: &'a mut ScopeState, mode: SelectorMode) -> Resolver<'a> {
        Resolver::new("card", mode, state)
    }

    #[test]
    fn short_codes_start_with_letters() {
        assert_eq!(short_code(0), "a");
        assert_eq!(short_code(25), "z");
        assert_ne!(short_code(26), short_code(0));
        // Injective over a generous range.
        let mut seen = std::collections::HashSet::new();
        for n in 0..2000 {
            assert!(seen.insert(short_code(n)));
        }
    }

    #[test]
    fn name_skips_empty_parts() {
        let mut state = ScopeState::new();
        let mut r = resolver(&mut state, SelectorMode::Attribute);
        assert_eq!(r.name(&["", "title", ""]), "card-title");
        assert_eq!(r.var_name(&["size"]), "--card-size");
        assert_eq!(r.var_exp(&["size"]), "var(--card-size)");
    }

    #[test]
    fn selector_modes_are_canonical() {
        let path = BemPath::element("title").modifier_value("size", "lg");

        let mut state = ScopeState::new();
        let mut r = resolver(&mut state, SelectorMode::Attribute);
        assert_eq!(r.selector(&path), "[data-card-title-size~=\"lg\"]");

        let mut state = ScopeState::new();
        let mut r = resolver(&mut state, SelectorMode::Class);
        assert_eq!(r.selector(&path), ".card-title-size_lg");
    }

    #[test]
    fn both_selector_modes_decode_to_the_same_tuple() {
        let path = BemPath::element("title").modifier_value("size", "lg");

        let mut state = ScopeState::new();
        let attr_sel = resolver(&mut state, SelectorMode::Attribute).selector(&path);
        let body = attr_sel
            .strip_prefix("[data-")
            .and_then(|s| s.strip_suffix("\"]"))
            .unwrap();
        let (name, value) = body.split_once("~=\"").unwrap();
        let parts: Vec<&str> = name.split('-').collect();
        assert_eq!((parts[0], parts[1], parts[2], value), ("card", "title", "size", "lg"));

        let mut state = ScopeState::new();
        let class_sel = resolver(&mut state, SelectorMode::Class).selector(&path);
        let body = class_sel.strip_prefix('.').unwrap();
        let (name, value) = body.split_once('_').unwrap();
        let parts: Vec<&str> = name.split('-').collect();
        assert_eq!((parts[0], parts[1], parts[2], value), ("card", "title", "size", "lg"));
    }

    #[test]
    fn dotted_and_structured_inputs_are_equivalent() {
        let structured = BemPath::element("title")
            .modifier_value("size", "lg")
            .modifier("raised");
        let dotted = BemPath::from_dotted(&["title.size.lg", "title.raised"]);
        assert_eq!(structured, dotted);

        let mut state = ScopeState::new();
        let mut r = resolver(&mut state, SelectorMode::Attribute);
        let from_structured = r.attr(&structured);
        let from_dotted = r.attr_from_dotted(&["title.size.lg", "title.raised"]);
        assert_eq!(from_structured, from_dotted);
        assert_eq!(
            from_structured,
            vec![
                ("data-card-title-size".to_string(), "lg".to_string()),
                ("data-card-title-raised".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn minified_codes_are_stable_and_never_reused() {
        let mut state = ScopeState::minifying();
        let first = state.code_for("title");
        let again = state.code_for("title");
        assert_eq!(first, again);

        let mut codes = std::collections::HashSet::new();
        codes.insert(first);
        for token in ["size", "raised", "color", "width"] {
            assert!(codes.insert(state.code_for(token)), "code reused for {token}");
        }
    }

    #[test]
    fn import_is_a_union_that_keeps_live_entries() {
        let mut state = ScopeState::minifying();
        let live = state.code_for("title");

        let mut persisted = IndexMap::new();
        persisted.insert("title".to_string(), "zz".to_string());
        persisted.insert("size".to_string(), "b9".to_string());
        state.import_table(&persisted);

        assert_eq!(state.code_for("title"), live);
        assert_eq!(state.code_for("size"), "b9");
        // New assignments avoid imported codes.
        let fresh = state.code_for("color");
        assert_ne!(fresh, "b9");
        assert_ne!(fresh, live);
    }

    #[test]
    fn root_path_renders_bare_block() {
        let mut state = ScopeState::new();
        let mut r = resolver(&mut state, SelectorMode::Attribute);
        assert_eq!(r.selector(&BemPath::root()), "[data-card]");

        let mut state = ScopeState::new();
        let mut r = resolver(&mut state, SelectorMode::Class);
        assert_eq!(r.selector(&BemPath::root()), ".card");
    }
}
