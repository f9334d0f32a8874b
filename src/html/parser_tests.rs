use super::*;

fn parse_default(text: &str) -> Vec<Part> {
    parse(text, HtmlParseOptions::default())
}

fn texts(parts: &[Part]) -> Vec<&str> {
    parts.iter().map(|p| p.text.as_str()).collect()
}

#[test]
fn test_class_attribute_tokens() {
    let text = r#"<div class="btn primary">"#;
    let parts = parse_default(text);
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].category, PartCategory::ClassName);
    assert_eq!(parts[0].mode, PartMode::Reference);
    assert_eq!(parts[0].text, "btn");
    assert_eq!((parts[0].start, parts[0].end), (12, 15));
    assert_eq!(parts[1].text, "primary");
    assert_eq!((parts[1].start, parts[1].end), (16, 23));
}

#[test]
fn test_single_quoted_value() {
    let parts = parse_default("<div class='one two'>");
    assert_eq!(texts(&parts), vec!["one", "two"]);
}

#[test]
fn test_bare_value() {
    let parts = parse_default("<div class=btn>");
    assert_eq!(texts(&parts), vec!["btn"]);
    assert_eq!(parts[0].category, PartCategory::ClassName);
}

#[test]
fn test_id_attribute() {
    let text = r#"<section id="top">"#;
    let parts = parse_default(text);
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].category, PartCategory::Id);
    assert_eq!(parts[0].mode, PartMode::Reference);
    assert_eq!(parts[0].text, "top");
    let start = text.find("top").unwrap();
    assert_eq!((parts[0].start, parts[0].end), (start, start + 3));
}

#[test]
fn test_other_attributes_ignored() {
    let parts = parse_default(r#"<a href="btn.png" title="btn" data-kind="btn">"#);
    assert!(parts.is_empty());
}

#[test]
fn test_boolean_attribute_before_class() {
    let parts = parse_default(r#"<input disabled class="field">"#);
    assert_eq!(texts(&parts), vec!["field"]);
}

#[test]
fn test_jsx_class_name_string() {
    let parts = parse_default(r#"<div className="btn">"#);
    assert_eq!(texts(&parts), vec!["btn"]);
    assert_eq!(parts[0].category, PartCategory::ClassName);
}

#[test]
fn test_style_name_attribute() {
    let parts = parse_default(r#"<div styleName="card">"#);
    assert_eq!(texts(&parts), vec!["card"]);
}

#[test]
fn test_jsx_expression_string_literals() {
    let parts = parse_default(r#"<div className={isOn ? "btn on" : "btn"}>"#);
    assert_eq!(texts(&parts), vec!["btn", "on", "btn"]);
    assert!(parts.iter().all(|p| p.category == PartCategory::ClassName));
}

#[test]
fn test_expression_object_keys() {
    let text = r#"<div :class="{ active: isOn, 'is-open': open }">"#;
    let parts = parse_default(text);
    assert_eq!(texts(&parts), vec!["active", "is-open"]);
    let start = text.find("active").unwrap();
    assert_eq!((parts[0].start, parts[0].end), (start, start + 6));
}

#[test]
fn test_vue_bound_array() {
    let parts = parse_default(r#"<div :class="['btn', extra]">"#);
    assert_eq!(texts(&parts), vec!["btn"]);
}

#[test]
fn test_vue_bind_longhand() {
    let parts = parse_default(r#"<div v-bind:class="{ wide: true }">"#);
    assert_eq!(texts(&parts), vec!["wide"]);
}

#[test]
fn test_style_module_property_access() {
    let parts = parse_default(r#"<div className={styles.button}>"#);
    assert_eq!(texts(&parts), vec!["button"]);
    let parts = parse_default(r#"<div className={appStyles.navBar}>"#);
    assert_eq!(texts(&parts), vec!["navBar"]);
}

#[test]
fn test_plain_property_access_ignored() {
    let parts = parse_default(r#"<div className={data.button}>"#);
    assert!(parts.is_empty());
}

#[test]
fn test_template_literal_chunks_and_insertions() {
    let text = r#"<div className={`btn ${size ? "btn-large" : ""} active`}>"#;
    let parts = parse_default(text);
    assert_eq!(texts(&parts), vec!["btn", "btn-large", "active"]);
}

#[test]
fn test_line_comment_in_expression() {
    let text = "<div className={\n  // \"ghost\"\n  \"real\"\n}>";
    let parts = parse_default(text);
    assert_eq!(texts(&parts), vec!["real"]);
}

#[test]
fn test_custom_element_tag() {
    let text = r#"<my-widget class="x"></my-widget>"#;
    let parts = parse_default(text);
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].category, PartCategory::Selector);
    assert_eq!(parts[0].mode, PartMode::Reference);
    assert_eq!(parts[0].text, "my-widget");
    assert_eq!((parts[0].start, parts[0].end), (1, 10));
    assert_eq!(parts[1].text, "x");
}

#[test]
fn test_custom_element_ignored_when_configured() {
    let options = HtmlParseOptions {
        ignore_custom_element: true,
    };
    let parts = parse(r#"<my-widget class="x">"#, options);
    assert_eq!(texts(&parts), vec!["x"]);
}

#[test]
fn test_plain_tag_names_not_emitted() {
    let parts = parse_default("<div><span>text</span></div>");
    assert!(parts.is_empty());
}

#[test]
fn test_style_block_content() {
    let text = r#"<style>.btn { color: red; }</style><div class="btn">"#;
    let parts = parse_default(text);
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].category, PartCategory::Selector);
    assert_eq!(parts[0].mode, PartMode::Definition);
    assert_eq!(parts[0].text, ".btn");
    let selector_start = text.find(".btn").unwrap();
    assert_eq!((parts[0].start, parts[0].end), (selector_start, selector_start + 4));
    assert_eq!(parts[1].category, PartCategory::ClassName);
    assert_eq!(parts[1].text, "btn");
}

#[test]
fn test_style_block_with_attributes() {
    let text = r#"<style lang="scss">.a { &:hover {} }</style>"#;
    let parts = parse_default(text);
    assert_eq!(texts(&parts), vec![".a"]);
}

#[test]
fn test_style_block_variable_definition() {
    let text = "<style>:root { --gap: 4px; }</style>";
    let parts = parse_default(text);
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].category, PartCategory::CssVariable);
    assert_eq!(parts[0].mode, PartMode::Definition);
    assert_eq!(parts[0].text, "gap");
}

#[test]
fn test_comment_hides_markup() {
    let text = r#"<!-- <div class="ghost"> --><div class="real">"#;
    let parts = parse_default(text);
    assert_eq!(texts(&parts), vec!["real"]);
}

#[test]
fn test_doctype_and_closing_tags_skipped() {
    let text = "<!DOCTYPE html><html><body class=\"page\"></body></html>";
    let parts = parse_default(text);
    assert_eq!(texts(&parts), vec!["page"]);
}

#[test]
fn test_unclosed_tag_resyncs_on_next() {
    let text = r#"<div class="a" <div class="b">"#;
    let parts = parse_default(text);
    assert_eq!(texts(&parts), vec!["a", "b"]);
}

#[test]
fn test_parts_in_document_order() {
    let text = r#"<style>.x {}</style><div class="x y" id="z">"#;
    let parts = parse_default(text);
    let starts: Vec<usize> = parts.iter().map(|p| p.start).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
}

#[test]
fn test_multibyte_text_between_tags() {
    let text = "<p>日本語テキスト</p><div class=\"btn\">";
    let parts = parse_default(text);
    assert_eq!(texts(&parts), vec!["btn"]);
}

#[test]
fn test_completion_context_in_class_value() {
    let text = r#"<div class="btn pri">"#;
    let start = text.find("pri").unwrap();
    let context = completion_context(text, start + 1);
    assert_eq!(
        context,
        Some(HtmlCompletionContext::ClassValue {
            start,
            end: start + 3
        })
    );
}

#[test]
fn test_completion_context_empty_value() {
    let text = r#"<div class="">"#;
    let offset = text.find('"').unwrap() + 1;
    let context = completion_context(text, offset);
    assert_eq!(
        context,
        Some(HtmlCompletionContext::ClassValue {
            start: offset,
            end: offset
        })
    );
}

#[test]
fn test_completion_context_id_value() {
    let text = r#"<div id="to">"#;
    let start = text.find("to").unwrap();
    let context = completion_context(text, start + 2);
    assert_eq!(
        context,
        Some(HtmlCompletionContext::IdValue {
            start,
            end: start + 2
        })
    );
}

#[test]
fn test_completion_context_jsx_expression_literal() {
    let text = r#"<div className={"bt"}>"#;
    let start = text.find("bt").unwrap();
    let context = completion_context(text, start + 2);
    assert_eq!(
        context,
        Some(HtmlCompletionContext::ClassValue {
            start,
            end: start + 2
        })
    );
}

#[test]
fn test_completion_context_bound_class() {
    let text = r#"<div :class="ac">"#;
    let start = text.find("ac").unwrap();
    let context = completion_context(text, start + 1);
    assert_eq!(
        context,
        Some(HtmlCompletionContext::ClassValue {
            start,
            end: start + 2
        })
    );
}

#[test]
fn test_completion_context_outside_values() {
    let text = r#"<div class="btn" title="x">body"#;
    assert_eq!(completion_context(text, 2), None);
    let title = text.find('x').unwrap();
    assert_eq!(completion_context(text, title), None);
    let body = text.find("body").unwrap() + 2;
    assert_eq!(completion_context(text, body), None);
}
