//! Parsed state of one stylesheet document
//!
//! A service is a pure snapshot: the part list extracted from one document
//! revision, tagged with the version it was built from. It holds no document
//! text and no links to other services; everything cross-document goes
//! through the owning service map.

use tower_lsp::lsp_types::Location;

use crate::css::parser;
use crate::language::document::{Document, DocumentVersion};
use crate::language::part::{Part, PartMode};

#[derive(Debug)]
pub struct CssService {
    version: DocumentVersion,
    parts: Vec<Part>,
}

impl CssService {
    /// Parse `document` into a fresh service snapshot.
    pub fn build(document: &Document) -> Self {
        CssService {
            version: document.version(),
            parts: parser::parse(document.text()),
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
    /// range when parts touch. Read-only; calling this repeatedly on an
    /// unchanged document gives identical answers.
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
    /// definition-mode parts.
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
