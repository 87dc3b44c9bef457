/*
 * compile_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end compile tests over the public API.
 */

use cascata::{
    CompileOptions, Compiler, DiagnosticKind, Dictionary, SelectorMode, StyleNode, TokenSet,
    UnitConfig, UnitHandle,
};
use pretty_assertions::assert_eq;

fn dict() -> Dictionary {
    Dictionary::builder()
        .set("sp", TokenSet::from_pairs([("s", 4), ("m", 8), ("l", 16)]).with_unit("px"))
        .set("sz", TokenSet::from_pairs([("m", "1rem")]))
        .key("w", "width")
        .key("h", "height")
        .build()
}

fn cfg(text: &str) -> UnitConfig {
    UnitConfig::from_json(text).unwrap()
}

#[test]
fn compile_is_deterministic() {
    let unit = cfg(r#"{
        "sets": {"sp": {"unit": "rem", "m": 1}},
        "content": {
            "color": "red",
            "_w": "&sp=>{w}:{1}",
            "@media (min-width:40rem)": {"_title": {"color": "blue"}}
        }
    }"#);

    let mut compiler = Compiler::new(dict()).with_minify(true);
    let first = compiler.compile("x", &unit);
    let second = compiler.compile("x", &unit);
    assert_eq!(first, second);
}

#[test]
fn scenario_modifier_value_expansion_through_a_transform() {
    // One BEM group key, one transform referencing a unit-local set with
    // a rem unit: each variant becomes its own modifier-value rule.
    let unit = cfg(r#"{
        "sets": {"sp": {"unit": "rem", "m": 1}},
        "content": {"_w": "&sp=>{w}:{1}"}
    }"#);

    let css = Compiler::new(dict()).compile("x", &unit);
    assert_eq!(css, "[data-x-w~=\"m\"]{width:1rem;}");

    let css = Compiler::new(dict())
        .with_mode(SelectorMode::Class)
        .compile("x", &unit);
    assert_eq!(css, ".x-w_m{width:1rem;}");
}

#[test]
fn scenario_array_union_takes_the_first_matching_clause() {
    // `sz`-the-transform-set doesn't exist as a set usable by the first
    // alternative; only the second alternative's set resolves, so exactly
    // one declaration comes out.
    let dict = Dictionary::builder()
        .set("vw", TokenSet::from_pairs([("m", 50)]))
        .key("w", "width")
        .build();
    let unit = cfg(r#"{"content": {"_w": ["&ghost=>{w}:{1}", "&vw=>{w}:{1}vw"]}}"#);

    let mut compiler = Compiler::new(dict);
    let out = compiler.compile_with("x", &unit, &CompileOptions::default());
    assert_eq!(out.css, "[data-x-w~=\"m\"]{width:50vw;}");
    assert_eq!(out.css.matches("width").count(), 1);
    assert!(out.diagnostics.iter().any(|d| d.code == "C-XFORM-1"));
}

#[test]
fn top_level_declarations_collect_into_the_root_rule() {
    let unit = cfg(r#"{
        "color": "red",
        "p": {"margin": 0, "a": {"color": "blue"}},
        "@media (min-width:40rem)": {"p": {"margin": "1rem"}},
        "&:hover": {"opacity": 0.5}
    }"#);

    let css = Compiler::new(dict()).compile("x", &unit);
    insta::assert_snapshot!(css, @"[data-x]{color:red;}p{margin:0;&a{color:blue;}}@media (min-width:40rem){p{margin:1rem;}}&:hover{opacity:0.5;}");
}

#[test]
fn at_rule_children_do_not_get_the_implicit_prefix() {
    let unit = cfg(r#"{
        "nav": {
            "@media (min-width:40rem)": {
                "a": {"color": "blue"}
            },
            "a": {"color": "red"}
        }
    }"#);

    let css = Compiler::new(dict()).compile("x", &unit);
    // Inside the nested @media the selector is independent (no `&`);
    // directly under `nav` it is parent-relative.
    assert_eq!(
        css,
        "nav{@media (min-width:40rem){a{color:blue;}}&a{color:red;}}"
    );
}

#[test]
fn vars_emit_property_rules_first_and_alias_their_references() {
    let unit = cfg(r#"{
        "vars": {
            "size": {"syntax": "<length>", "inherits": true, "initial": "4px"},
            "theme": {"full": true}
        },
        "content": {"width": "{size}"}
    }"#);

    let css = Compiler::new(dict()).compile("x", &unit);
    insta::assert_snapshot!(css, @r#"@property --x-size{syntax:"<length>";inherits:true;initial-value:4px;}@property --theme{syntax:"*";inherits:false;}[data-x]{width:var(--x-size);}"#);
}

#[test]
fn frames_emit_after_vars_and_before_content() {
    let unit = cfg(r#"{
        "vars": {"size": {"initial": "4px"}},
        "frames": {"spin": {"0": {"opacity": 0}, "100": {"opacity": 1}}},
        "content": {"_card": {"animationName": "{spin}"}}
    }"#);

    let css = Compiler::new(dict()).compile("x", &unit);
    let property = css.find("@property").unwrap();
    let keyframes = css.find("@keyframes").unwrap();
    let card = css.find("[data-x-card]").unwrap();
    assert!(property < keyframes && keyframes < card);

    assert!(css.contains("@keyframes x-spin{0%{opacity:0;}100%{opacity:1;}}"));
    assert!(css.contains("[data-x-card]{animation-name:x-spin;}"));
}

#[test]
fn empty_key_lookup_drops_the_node_with_a_diagnostic() {
    let unit = cfg(r#"{"content": {"$w": "4px", "$ghost": "4px"}}"#);

    let mut compiler = Compiler::new(dict());
    let out = compiler.compile_with("x", &unit, &CompileOptions::default());
    assert_eq!(out.css, "[data-x]{width:4px;}");

    let dropped: Vec<_> = out.diagnostics.iter().filter(|d| d.code == "C-KEY-1").collect();
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].kind, DiagnosticKind::Warning);
}

#[test]
fn strict_mode_reports_errors_but_still_compiles() {
    let unit = cfg(r#"{"content": {"width": "{ghost}"}}"#);

    let mut compiler = Compiler::new(dict());
    let out = compiler.compile_with("x", &unit, &CompileOptions { strict: true });
    // The reference degraded to empty, so the declaration dropped too —
    // but compilation completed.
    assert_eq!(out.css, "");
    assert!(out.diagnostics.iter().any(|d| d.kind == DiagnosticKind::Error));
}

#[test]
fn bem_state_suffix_rides_on_the_selector() {
    let unit = cfg(r#"{"content": {"_tab:hover": {"color": "blue"}}}"#);
    let css = Compiler::new(dict()).compile("x", &unit);
    assert_eq!(css, "[data-x-tab]:hover{color:blue;}");
}

#[test]
fn bem_modifier_groups_without_expansion_emit_one_rule() {
    let unit = cfg(r#"{"content": {"__title_size_lg": {"color": "blue"}}}"#);
    let css = Compiler::new(dict()).compile("x", &unit);
    assert_eq!(css, "[data-x-title-size~=\"lg\"]{color:blue;}");
}

#[test]
fn one_property_expands_to_many_through_a_keyed_transform() {
    // A `{0}`-template at a plain key merges its result into the sibling
    // declarations of the enclosing rule.
    let dict = Dictionary::builder()
        .set(
            "edges",
            TokenSet::from_pairs([("margin-left", 8), ("margin-right", 8)]).with_unit("px"),
        )
        .build();
    let unit = cfg(r#"{"content": {"color": "red", "pad": "&edges=>{0}:{1}"}}"#);

    let css = Compiler::new(dict).compile("x", &unit);
    assert_eq!(css, "[data-x]{color:red;margin-left:8px;margin-right:8px;}");
}

#[test]
fn minified_output_is_stable_across_recompiles_and_units() {
    let unit_a = cfg(r#"{"content": {"_title": {"color": "red"}}}"#);
    let unit_b = cfg(r#"{"content": {"_title": {"color": "blue"}, "_badge": {"color": "green"}}}"#);

    let mut compiler = Compiler::new(dict()).with_minify(true);
    let first = compiler.compile("x", &unit_a);
    // Another unit under the same identifier reuses the code for "title".
    let second = compiler.compile("x", &unit_b);
    let third = compiler.compile("x", &unit_a);

    assert_eq!(first, third);
    let title_sel = first
        .split('{')
        .next()
        .unwrap()
        .to_string();
    assert!(second.contains(&title_sel));
}

#[test]
fn registered_units_keep_keys_across_alter() {
    let node = StyleNode::from_json(r#"{"content": {"color": "red"}}"#).unwrap();
    let mut compiler = Compiler::new(dict());

    let handle = UnitHandle(42);
    let key = compiler.register(handle, Some("card"), node);
    assert_eq!(key, "card");

    let (key, css) = compiler.compile_registered(handle).unwrap();
    assert_eq!(key, "card");
    assert_eq!(css, "[data-card]{color:red;}");

    let delta = StyleNode::from_json(r#"{"content": {"width": "4px"}}"#).unwrap();
    assert!(compiler.alter(handle, &delta));
    let (key, css) = compiler.compile_registered(handle).unwrap();
    assert_eq!(key, "card");
    assert_eq!(css, "[data-card]{color:red;width:4px;}");
}

#[test]
fn compile_json_is_the_one_fallible_entry_point() {
    let mut compiler = Compiler::new(dict());
    let css = compiler
        .compile_json("x", r#"{"content": {"color": "red"}}"#)
        .unwrap();
    assert_eq!(css, "[data-x]{color:red;}");

    assert!(compiler.compile_json("x", "{not json").is_err());
}

#[test]
fn persisted_minification_tables_union_into_live_state() {
    let unit = cfg(r#"{"content": {"_title": {"color": "red"}}}"#);

    // First process: compile, persist the tables.
    let mut first = Compiler::new(dict()).with_minify(true);
    let css = first.compile("x", &unit);
    let tables = first.export_tables();
    assert!(tables.contains_key("x"));

    // Second process: import before compiling; output matches byte for
    // byte, so hydrated markup stays valid.
    let mut second = Compiler::new(dict()).with_minify(true);
    second.import_tables(&tables);
    assert_eq!(second.compile("x", &unit), css);
}

#[test]
fn null_nodes_and_unmatched_transforms_emit_nothing() {
    let unit = cfg(r#"{"content": {"width": null, "_w": "&ghost=>{w}:{1}"}}"#);
    let css = Compiler::new(dict()).compile("x", &unit);
    assert_eq!(css, "");
}

#[test]
fn numbers_render_without_trailing_zeros() {
    let unit = cfg(r#"{"content": {"opacity": 0.5, "zIndex": 10, "flexGrow": 1}}"#);
    let css = Compiler::new(dict()).compile("x", &unit);
    assert_eq!(css, "[data-x]{opacity:0.5;z-index:10;flex-grow:1;}");
}
