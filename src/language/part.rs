//! The part model shared by both language families
//!
//! Every symbol occurrence a parser recognizes, whether it comes from a
//! stylesheet or from markup, is normalized into a [`Part`]. Cross-family
//! navigation then reduces to comparing parts, so the two sides never need
//! to know how the other one parses.

use tower_lsp::lsp_types::Url;

/// What kind of symbol an occurrence stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartCategory {
    /// A class, id or tag selector in a rule's selector list, or a
    /// hyphenated custom element tag in markup
    Selector,
    /// An `id` attribute value
    Id,
    /// One token of a class-like attribute value
    ClassName,
    /// A CSS custom property, declared or read through `var()`
    CssVariable,
}

/// Whether an occurrence declares a symbol or consumes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartMode {
    /// Declares the symbol: a rule's selector, a `--name:` declaration
    Definition,
    /// Consumes the symbol: an attribute token, a `var()` read, a custom
    /// element tag
    Reference,
}

/// One classified symbol occurrence.
///
/// Parts are immutable snapshots. A document edit replaces the owning
/// service's whole part list, so a part handed out earlier stays safe to
/// read but may describe an outdated revision; callers re-query rather than
/// hold on to parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub category: PartCategory,
    pub mode: PartMode,
    /// Unescaped symbol text. Selector parts keep their `.`/`#` sigil so
    /// class, id and tag selectors with the same name stay distinct;
    /// variable parts store the bare name without the `--` prefix.
    pub text: String,
    /// Byte offset of the raw token in the owning document
    pub start: usize,
    /// Byte offset one past the raw token
    pub end: usize,
}

impl Part {
    pub fn new(
        category: PartCategory,
        mode: PartMode,
        text: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        Part {
            category,
            mode,
            text: text.into(),
            start,
            end,
        }
    }

    /// Whether `offset` falls on this part. Both edges count as hits, so a
    /// cursor sitting at either end of a token still finds it.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Whether two occurrences name the same symbol.
    ///
    /// Within one category the full text is compared, so `.btn`, `#btn` and
    /// a `btn` tag selector never collide. Across categories exactly two
    /// pairs correspond: class selectors with class attribute tokens, and id
    /// selectors with id attribute values. Every other combination is a
    /// mismatch. The relation is symmetric and ignores mode; queries filter
    /// by mode themselves.
    pub fn matches(&self, other: &Part) -> bool {
        if self.category == other.category {
            return self.text == other.text;
        }
        match (self.category, other.category) {
            (PartCategory::Selector, PartCategory::ClassName) => {
                selector_names_plain(self, '.', other)
            }
            (PartCategory::ClassName, PartCategory::Selector) => {
                selector_names_plain(other, '.', self)
            }
            (PartCategory::Selector, PartCategory::Id) => selector_names_plain(self, '#', other),
            (PartCategory::Id, PartCategory::Selector) => selector_names_plain(other, '#', self),
            _ => false,
        }
    }
}

fn selector_names_plain(selector: &Part, sigil: char, plain: &Part) -> bool {
    selector
        .text
        .strip_prefix(sigil)
        .is_some_and(|name| name == plain.text)
}

/// Pure reshaping of parts into the form another lookup expects. Convertors
/// never search; they only produce the key a search is run with.
pub struct PartConvertor;

impl PartConvertor {
    /// A definition-shaped copy of `part`: same category, text and range,
    /// definition mode. Used to turn a usage into the key that definition
    /// sites are collected under.
    pub fn to_definition_mode(part: &Part) -> Part {
        Part {
            mode: PartMode::Definition,
            ..part.clone()
        }
    }
}

/// The occurrence a query started from. Result collection leaves it out so
/// a symbol never lists its own cursor position among its references.
#[derive(Debug, Clone, Copy)]
pub struct QueryOrigin<'a> {
    pub uri: &'a Url,
    pub start: usize,
    pub end: usize,
}

impl<'a> QueryOrigin<'a> {
    pub fn new(uri: &'a Url, part: &Part) -> Self {
        QueryOrigin {
            uri,
            start: part.start,
            end: part.end,
        }
    }

    /// The byte range to exclude when collecting from `uri`, or `None` when
    /// the origin lies in a different document.
    pub fn range_in(&self, uri: &Url) -> Option<(usize, usize)> {
        (self.uri == uri).then_some((self.start, self.end))
    }
}
