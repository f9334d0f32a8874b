//! Parsed state of one markup document
//!
//! Same shape as the stylesheet side: a pure snapshot of the part list for
//! one document revision, tagged with the version it was built from. Markup
//! snapshots additionally depend on parse options, so the owning map rebuilds
//! them when configuration changes.

use tower_lsp::lsp_types::Location;

use crate::html::parser::{self, HtmlParseOptions};
use crate::language::document::{Document, DocumentVersion};
use crate::language::part::{Part, PartMode};

#[derive(Debug)]
pub struct HtmlService {
    version: DocumentVersion,
    parts: Vec<Part>,
}

impl HtmlService {
    /// Parse `document` into a fresh service snapshot.
    pub fn build(document: &Document, options: HtmlParseOptions) -> Self {
        HtmlService {
            version: document.version(),
            parts: parser::parse(document.text(), options),
        }
    }

    /// The document version this snapshot was built from.
    pub fn version(&self) -> DocumentVersion {
        self.version
    }

    /// All parts in document order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// The part under `offset`, preferring the most specific (shortest)
    /// range when parts touch.
    pub fn part_at(&self, offset: usize) -> Option<&Part> {
        self.parts
            .iter()
            .filter(|part| part.contains(offset))
            .min_by_key(|part| part.end - part.start)
    }

    /// Append locations of all parts matching `from`, in document order.
    /// `exclude_range` drops the query's own occurrence when the search runs
    /// over the originating document.
    pub fn collect_references(
        &self,
        document: &Document,
        from: &Part,
        exclude_range: Option<(usize, usize)>,
        results: &mut Vec<Location>,
    ) {
        self.collect_matching(document, from, exclude_range, None, results);
    }

    /// Like [`collect_references`](Self::collect_references), restricted to
    /// definition-mode parts. Markup only has these inside `<style>` blocks.
    pub fn collect_definitions(
        &self,
        document: &Document,
        from: &Part,
        exclude_range: Option<(usize, usize)>,
        results: &mut Vec<Location>,
    ) {
        self.collect_matching(document, from, exclude_range, Some(PartMode::Definition), results);
    }

    fn collect_matching(
        &self,
        document: &Document,
        from: &Part,
        exclude_range: Option<(usize, usize)>,
        mode: Option<PartMode>,
        results: &mut Vec<Location>,
    ) {
        for part in &self.parts {
            if let Some(mode) = mode {
                if part.mode != mode {
                    continue;
                }
            }
            if exclude_range == Some((part.start, part.end)) {
                continue;
            }
            if !part.matches(from) {
                continue;
            }
            results.push(Location {
                uri: document.uri().clone(),
                range: document.range(part.start, part.end),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::part::PartCategory;
    use tower_lsp::lsp_types::Url;

    fn build(text: &str) -> (Document, HtmlService) {
        let document = Document::new(
            Url::parse("file:///page.html").unwrap(),
            text.to_string(),
            DocumentVersion::initial(),
        );
        let service = HtmlService::build(&document, HtmlParseOptions::default());
        (document, service)
    }

    #[test]
    fn test_part_at_finds_class_token() {
        let html = r#"<div class="btn primary">"#;
        let (_, service) = build(html);
        let offset = html.find("primary").unwrap();
        let part = service.part_at(offset).unwrap();
        assert_eq!(part.category, PartCategory::ClassName);
        assert_eq!(part.text, "primary");
    }

    #[test]
    fn test_class_token_matches_selector_query() {
        let html = r#"<div class="btn">"#;
        let (document, service) = build(html);
        let selector = Part::new(PartCategory::Selector, PartMode::Definition, ".btn", 0, 0);
        let mut results = Vec::new();
        service.collect_references(&document, &selector, None, &mut results);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].uri.as_str(), "file:///page.html");
    }

    #[test]
    fn test_style_block_definitions_found() {
        let html = "<style>.btn {}</style><div class=\"btn\">";
        let (document, service) = build(html);
        let key = Part::new(PartCategory::Selector, PartMode::Definition, ".btn", 0, 0);
        let mut results = Vec::new();
        service.collect_definitions(&document, &key, None, &mut results);
        assert_eq!(results.len(), 1);
        let offset = html.find(".btn").unwrap();
        assert_eq!(results[0].range, document.range(offset, offset + 4));
    }

    #[test]
    fn test_rebuild_reflects_new_version() {
        let html_before = r#"<div class="a">"#;
        let html_after = r#"<div class="b">"#;
        let (document, service) = build(html_before);
        assert_eq!(service.version(), document.version());
        let mut later = DocumentVersion::initial();
        later.minor += 1;
        let changed = Document::new(
            Url::parse("file:///page.html").unwrap(),
            html_after.to_string(),
            later,
        );
        let rebuilt = HtmlService::build(&changed, HtmlParseOptions::default());
        assert_ne!(rebuilt.version(), service.version());
        assert_eq!(rebuilt.parts()[0].text, "b");
    }
}
