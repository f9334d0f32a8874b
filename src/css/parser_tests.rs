use super::*;
use crate::language::part::{Part, PartCategory, PartMode};

fn selector(parts: &[Part], text: &str) -> Option<Part> {
    parts
        .iter()
        .find(|p| p.category == PartCategory::Selector && p.text == text)
        .cloned()
}

fn texts(parts: &[Part]) -> Vec<&str> {
    parts.iter().map(|p| p.text.as_str()).collect()
}

#[test]
fn test_class_selector_with_range() {
    let css = ".btn { color: red; }";
    let parts = parse(css);
    assert_eq!(parts.len(), 1);
    let part = &parts[0];
    assert_eq!(part.category, PartCategory::Selector);
    assert_eq!(part.mode, PartMode::Definition);
    assert_eq!(part.text, ".btn");
    assert_eq!(&css[part.start..part.end], ".btn");
}

#[test]
fn test_compound_selector_yields_each_piece() {
    let css = "a.btn#top { }";
    let parts = parse(css);
    assert_eq!(texts(&parts), vec!["a", ".btn", "#top"]);
    assert_eq!(&css[parts[1].start..parts[1].end], ".btn");
    assert_eq!(&css[parts[2].start..parts[2].end], "#top");
}

#[test]
fn test_selector_list_with_combinators() {
    let css = "div > .item, #list li { }";
    let parts = parse(css);
    assert_eq!(texts(&parts), vec!["div", ".item", "#list", "li"]);
}

#[test]
fn test_pseudo_classes_and_elements_are_skipped() {
    let css = ":root { }\na:hover::after { }\n.x:not(.y) { }";
    let parts = parse(css);
    assert_eq!(texts(&parts), vec!["a", ".x"]);
}

#[test]
fn test_attribute_selectors_are_skipped() {
    let parts = parse("input[type=\"text\"] { }");
    assert_eq!(texts(&parts), vec!["input"]);
}

#[test]
fn test_at_rule_prelude_skipped_but_body_parsed() {
    let css = "@media (min-width: 600px) { .responsive { } }";
    let parts = parse(css);
    assert_eq!(texts(&parts), vec![".responsive"]);
}

#[test]
fn test_top_level_at_statements_have_no_parts() {
    let parts = parse("@import \"theme.css\";\n@use \"sass:math\";");
    assert!(parts.is_empty());
}

#[test]
fn test_custom_property_definition() {
    let css = ":root { --primary-color: #333; }";
    let parts = parse(css);
    assert_eq!(parts.len(), 1);
    let part = &parts[0];
    assert_eq!(part.category, PartCategory::CssVariable);
    assert_eq!(part.mode, PartMode::Definition);
    // text has no dashes prefix, the range still covers the raw token
    assert_eq!(part.text, "primary-color");
    assert_eq!(&css[part.start..part.end], "--primary-color");
}

#[test]
fn test_variable_reference_and_nested_fallback() {
    let css = ".a { color: var(--main, var(--fallback)); }";
    let parts = parse(css);
    let variables: Vec<&Part> = parts
        .iter()
        .filter(|p| p.category == PartCategory::CssVariable)
        .collect();
    assert_eq!(variables.len(), 2);
    assert_eq!(variables[0].text, "main");
    assert_eq!(variables[0].mode, PartMode::Reference);
    assert_eq!(variables[1].text, "fallback");
    assert_eq!(&css[variables[0].start..variables[0].end], "--main");
}

#[test]
fn test_variable_definition_reading_another_variable() {
    let css = ".a { --derived: var(--base); }";
    let parts = parse(css);
    let variables: Vec<&Part> = parts
        .iter()
        .filter(|p| p.category == PartCategory::CssVariable)
        .collect();
    assert_eq!(variables.len(), 2);
    assert_eq!(variables[0].text, "derived");
    assert_eq!(variables[0].mode, PartMode::Definition);
    assert_eq!(variables[1].text, "base");
    assert_eq!(variables[1].mode, PartMode::Reference);
}

#[test]
fn test_var_with_space_after_paren() {
    let parts = parse(".a { color: var( --spaced ); }");
    let variable = parts
        .iter()
        .find(|p| p.category == PartCategory::CssVariable)
        .unwrap();
    assert_eq!(variable.text, "spaced");
}

#[test]
fn test_strings_and_comments_produce_nothing() {
    let css = "/* .fake { } */\n.real { content: \".quoted\"; background: url('#nope'); }";
    let parts = parse(css);
    assert_eq!(texts(&parts), vec![".real"]);
}

#[test]
fn test_var_inside_string_is_not_a_reference() {
    let parts = parse(".a { content: \"var(--fake)\"; }");
    assert!(parts
        .iter()
        .all(|p| p.category != PartCategory::CssVariable));
}

#[test]
fn test_comment_inside_selector_list() {
    let css = ".a /* note */ .b { }";
    let parts = parse(css);
    assert_eq!(texts(&parts), vec![".a", ".b"]);
}

#[test]
fn test_line_comments_in_scss() {
    let css = "// .commented { }\n.kept { }";
    let parts = parse(css);
    assert_eq!(texts(&parts), vec![".kept"]);
}

#[test]
fn test_url_scheme_is_not_a_line_comment() {
    let css = ".a { background: url(https://cdn.example.com/i.png); color: var(--tint); }";
    let parts = parse(css);
    assert!(parts.iter().any(|p| p.text == "tint"));
}

#[test]
fn test_line_comment_before_declaration() {
    let css = ".a { // note\n  --x: 1; color: red; // var(--fake)\n}";
    let parts = parse(css);
    let variables: Vec<&Part> = parts
        .iter()
        .filter(|p| p.category == PartCategory::CssVariable)
        .collect();
    assert_eq!(variables.len(), 1);
    assert_eq!(variables[0].text, "x");
    assert_eq!(variables[0].mode, PartMode::Definition);
}

#[test]
fn test_scss_nesting_emits_nested_selectors() {
    let css = ".btn { color: red; .icon { width: 1em; } }";
    let parts = parse(css);
    assert_eq!(texts(&parts), vec![".btn", ".icon"]);
}

#[test]
fn test_scss_parent_references_are_skipped() {
    let css = ".btn { &:hover { } &-large { } &.active { } }";
    let parts = parse(css);
    // "&-large" joins onto the parent name and can't be resolved textually;
    // "&.active" still exposes the plain class
    assert_eq!(texts(&parts), vec![".btn", ".active"]);
}

#[test]
fn test_scss_interpolation_in_selector() {
    let css = ".btn-#{$kind} { }";
    let parts = parse(css);
    // the partial literal half survives, the interpolated half yields nothing
    assert_eq!(texts(&parts), vec![".btn-"]);
}

#[test]
fn test_less_interpolation_in_selector() {
    let parts = parse("@{prefix}-box { }");
    assert!(selector(&parts, "prefix").is_none());
}

#[test]
fn test_scss_placeholder_selectors_are_skipped() {
    let parts = parse("%placeholder { }\n.uses { }");
    assert_eq!(texts(&parts), vec![".uses"]);
}

#[test]
fn test_escaped_selector_is_unescaped() {
    let css = r".xl\:w-1\/2 { width: 50%; }";
    let parts = parse(css);
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].text, ".xl:w-1/2");
    assert_eq!(&css[parts[0].start..parts[0].end], r".xl\:w-1\/2");
}

#[test]
fn test_hex_escape_with_terminating_space() {
    // "\31 23" is the digit '1' followed by the literal "23"
    let css = ".\\31 23 { }";
    let parts = parse(css);
    assert_eq!(parts[0].text, ".123");
}

#[test]
fn test_unterminated_rule_still_yields_parts() {
    let css = ".typing { color: var(--accent)";
    let parts = parse(css);
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].text, ".typing");
    assert_eq!(parts[1].text, "accent");
}

#[test]
fn test_selector_only_no_brace_yet() {
    // nothing after the selector has been typed yet
    let parts = parse(".half-typed");
    // without a brace the segment never becomes a selector list
    assert!(parts.is_empty());
}

#[test]
fn test_parts_are_in_document_order() {
    let css = ".a { --x: 1; }\n.b { color: var(--x); }\n#c { }";
    let parts = parse(css);
    let starts: Vec<usize> = parts.iter().map(|p| p.start).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
}

#[test]
fn test_parse_embedded_shifts_ranges() {
    let css = ".inner { }";
    let parts = parse_embedded(css, 100);
    assert_eq!(parts[0].start, 100);
    assert_eq!(parts[0].end, 106);
}

#[test]
fn test_deeply_nested_media_and_rules() {
    let css = "@media screen {\n  @supports (display: grid) {\n    .grid-item { --gap: 4px; }\n  }\n}";
    let parts = parse(css);
    assert_eq!(texts(&parts), vec![".grid-item", "gap"]);
}

#[test]
fn test_keyframes_percentages_yield_nothing() {
    let css = "@keyframes spin { 0% { } 100% { } }";
    let parts = parse(css);
    assert!(parts.is_empty());
}

#[test]
fn test_completion_context_right_after_var_open() {
    let css = ".a { color: var(";
    let context = completion_context(css, css.len());
    assert_eq!(
        context,
        Some(CssCompletionContext::VariableName {
            start: css.len(),
            end: css.len()
        })
    );
}

#[test]
fn test_completion_context_with_partial_name() {
    let css = ".a { color: var(--pri) }";
    // cursor after "--pri"
    let offset = css.find("--pri").unwrap() + 5;
    let context = completion_context(css, offset);
    assert_eq!(
        context,
        Some(CssCompletionContext::VariableName {
            start: css.find("--pri").unwrap(),
            end: css.find("--pri").unwrap() + 5,
        })
    );
}

#[test]
fn test_completion_context_outside_var_is_none() {
    let css = ".a { color: red }";
    assert_eq!(completion_context(css, 14), None);
    // inside a different function
    let other = ".a { width: calc(";
    assert_eq!(completion_context(other, other.len()), None);
}
