//! Lenient markup parsing
//!
//! Extracts class, id and custom element parts from HTML, JSX/TSX and Vue
//! text in one forward pass. Like the stylesheet side, there is no grammar:
//! the pass hops from `<` to `<`, reads tags and attributes leniently, and
//! anything that is not a recognizable tag is plain text. Script content
//! needs no special casing because only class-like attributes inside tags
//! produce parts.
//!
//! `<style>` block content is handed to the stylesheet parser in place, so
//! embedded selectors carry their real document offsets.

use crate::css::parser as css_parser;
use crate::language::part::{Part, PartCategory, PartMode};
use crate::language::scanner::BackwardScanner;

/// Parsing switches that come from configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParseOptions {
    /// Do not emit parts for hyphenated tag names
    pub ignore_custom_element: bool,
}

/// Extract all parts of a markup document.
pub fn parse(text: &str, options: HtmlParseOptions) -> Vec<Part> {
    HtmlParser {
        text,
        bytes: text.as_bytes(),
        ignore_custom_element: options.ignore_custom_element,
        parts: Vec::new(),
    }
    .run()
}

/// What the cursor is placed to complete inside markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlCompletionContext {
    /// Inside a class-like attribute value: replace `start..end` with a
    /// class name
    ClassValue { start: usize, end: usize },
    /// Inside an id attribute value
    IdValue { start: usize, end: usize },
}

/// How far back an attribute shape probe may walk before giving up. Keeps
/// completion cheap inside huge attribute values or malformed markup.
const COMPLETION_SCAN_LIMIT: usize = 512;

/// Detect whether `offset` sits inside a class or id attribute value.
pub fn completion_context(text: &str, offset: usize) -> Option<HtmlCompletionContext> {
    let mut scanner = BackwardScanner::new(text, offset);
    let word = scanner.read_whole_word_around_cursor();
    let start = scanner.position();
    let end = start + word.len();
    let (delimiter, _) = scanner.read_until_any_of(
        &['"', '\'', '`', '<', '>', '{', '}'],
        COMPLETION_SCAN_LIMIT,
    );
    if !matches!(delimiter, Some('"') | Some('\'') | Some('`')) {
        return None;
    }
    scanner.skip_whitespace();
    if scanner.peek(0) == Some('{') {
        // jsx wraps the literal in an expression container
        scanner.read();
        scanner.skip_whitespace();
    }
    if scanner.peek(0) != Some('=') {
        return None;
    }
    scanner.read();
    scanner.skip_whitespace();
    // binding prefixes like ":class" end at a non-word character, so this
    // reads the base attribute name directly
    let attribute = scanner.read_word_before_cursor();
    if is_class_attribute(attribute) {
        Some(HtmlCompletionContext::ClassValue { start, end })
    } else if attribute.eq_ignore_ascii_case("id") {
        Some(HtmlCompletionContext::IdValue { start, end })
    } else {
        None
    }
}

/// The shapes a class-like attribute value can take. Every value falls into
/// exactly one shape; unknown syntax inside a shape degrades to yielding no
/// tokens rather than guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrValueShape {
    /// `class="btn primary"`: whitespace separated tokens
    TokenList,
    /// `className={...}` or a bound `:class="..."`: a script expression.
    /// String literals, template chunks, object keys and style module
    /// property reads yield tokens.
    Expression,
}

/// How the raw attribute value was delimited in the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    Quoted,
    Braced,
    Bare,
}

struct HtmlParser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    ignore_custom_element: bool,
    parts: Vec<Part>,
}

impl<'a> HtmlParser<'a> {
    fn run(mut self) -> Vec<Part> {
        let mut pos = 0;
        while pos < self.bytes.len() {
            if self.bytes[pos] != b'<' {
                pos += 1;
                continue;
            }
            if self.text[pos..].starts_with("<!--") {
                pos = match self.text[pos + 4..].find("-->") {
                    Some(found) => pos + 4 + found + 3,
                    None => self.bytes.len(),
                };
                continue;
            }
            match self.bytes.get(pos + 1) {
                Some(b'!') | Some(b'?') | Some(b'/') => {
                    pos = self.skip_to_tag_end(pos + 1);
                }
                Some(next) if next.is_ascii_alphabetic() => {
                    pos = self.scan_open_tag(pos);
                }
                _ => pos += 1,
            }
        }
        self.parts
    }

    fn skip_to_tag_end(&self, start: usize) -> usize {
        let mut pos = start;
        while pos < self.bytes.len() && self.bytes[pos] != b'>' {
            pos += 1;
        }
        (pos + 1).min(self.bytes.len())
    }

    fn scan_open_tag(&mut self, open: usize) -> usize {
        let text = self.text;
        let name_start = open + 1;
        let mut pos = name_start;
        while pos < self.bytes.len() && is_tag_name_byte(self.bytes[pos]) {
            pos += 1;
        }
        let tag_name = &text[name_start..pos];
        if tag_name.contains('-') && !self.ignore_custom_element {
            self.parts.push(Part::new(
                PartCategory::Selector,
                PartMode::Reference,
                tag_name,
                name_start,
                pos,
            ));
        }
        let (after_tag, self_closing) = self.scan_attributes(pos);
        // only a tag that actually closed with '>' has content
        let closed = after_tag > 0 && self.bytes.get(after_tag - 1) == Some(&b'>');
        if closed && !self_closing && tag_name.eq_ignore_ascii_case("style") {
            let content_end =
                find_case_insensitive(text, after_tag, "</style").unwrap_or(self.bytes.len());
            let embedded = css_parser::parse_embedded(&text[after_tag..content_end], after_tag);
            self.parts.extend(embedded);
            return content_end;
        }
        after_tag
    }

    fn scan_attributes(&mut self, mut pos: usize) -> (usize, bool) {
        let mut self_closing = false;
        while pos < self.bytes.len() {
            let b = self.bytes[pos];
            if b.is_ascii_whitespace() {
                pos += 1;
                continue;
            }
            match b {
                b'>' => return (pos + 1, self_closing),
                b'/' => {
                    self_closing = true;
                    pos += 1;
                }
                // a fresh '<' means this tag never closed; resync on it
                b'<' => return (pos, self_closing),
                _ => {
                    let name_start = pos;
                    while pos < self.bytes.len() && !is_attr_name_end(self.bytes[pos]) {
                        pos += 1;
                    }
                    if pos == name_start {
                        pos += 1;
                        continue;
                    }
                    let name_end = pos;
                    while pos < self.bytes.len() && self.bytes[pos].is_ascii_whitespace() {
                        pos += 1;
                    }
                    if self.bytes.get(pos) != Some(&b'=') {
                        continue; // boolean attribute
                    }
                    pos += 1;
                    while pos < self.bytes.len() && self.bytes[pos].is_ascii_whitespace() {
                        pos += 1;
                    }
                    pos = self.scan_attribute_value(name_start, name_end, pos);
                }
            }
        }
        (pos, self_closing)
    }

    fn scan_attribute_value(&mut self, name_start: usize, name_end: usize, pos: usize) -> usize {
        match self.bytes.get(pos).copied() {
            Some(quote) if quote == b'"' || quote == b'\'' => {
                let value_start = pos + 1;
                let value_end = self.find_quote_end(value_start, quote);
                self.classify_attribute(name_start, name_end, value_start, value_end, ContainerKind::Quoted);
                (value_end + 1).min(self.bytes.len())
            }
            Some(b'{') => {
                let expression_end = self.find_expression_end(pos, self.bytes.len());
                self.classify_attribute(name_start, name_end, pos + 1, expression_end, ContainerKind::Braced);
                (expression_end + 1).min(self.bytes.len())
            }
            _ => {
                let value_start = pos;
                let mut value_end = pos;
                while value_end < self.bytes.len() && !is_bare_value_end(self.bytes[value_end]) {
                    value_end += 1;
                }
                self.classify_attribute(name_start, name_end, value_start, value_end, ContainerKind::Bare);
                value_end
            }
        }
    }

    fn classify_attribute(
        &mut self,
        name_start: usize,
        name_end: usize,
        value_start: usize,
        value_end: usize,
        container: ContainerKind,
    ) {
        let text = self.text;
        let (base_name, bound) = strip_binding_prefix(&text[name_start..name_end]);
        let category = if is_class_attribute(base_name) {
            PartCategory::ClassName
        } else if base_name.eq_ignore_ascii_case("id") {
            PartCategory::Id
        } else {
            return;
        };
        let shape = match container {
            ContainerKind::Braced => AttrValueShape::Expression,
            ContainerKind::Quoted | ContainerKind::Bare => {
                if bound {
                    AttrValueShape::Expression
                } else {
                    AttrValueShape::TokenList
                }
            }
        };
        match shape {
            AttrValueShape::TokenList => self.collect_value_tokens(value_start, value_end, category),
            AttrValueShape::Expression => self.scan_expression(value_start, value_end, category),
        }
    }

    /// Emit one part per whitespace separated token of `start..end`.
    fn collect_value_tokens(&mut self, start: usize, end: usize, category: PartCategory) {
        let text = self.text;
        let Some(value) = text.get(start..end) else {
            return;
        };
        let mut token_start: Option<usize> = None;
        for (i, ch) in value.char_indices() {
            if ch.is_whitespace() {
                if let Some(from) = token_start.take() {
                    self.push_token(start + from, start + i, category);
                }
            } else if token_start.is_none() {
                token_start = Some(i);
            }
        }
        if let Some(from) = token_start {
            self.push_token(start + from, start + value.len(), category);
        }
    }

    fn push_token(&mut self, start: usize, end: usize, category: PartCategory) {
        let text = self.text;
        self.parts.push(Part::new(
            category,
            PartMode::Reference,
            &text[start..end],
            start,
            end,
        ));
    }

    /// Walk a script expression and emit the tokens it contributes: string
    /// literal contents, template literal chunks, object keys and style
    /// module property reads. Everything else is control flow around them.
    fn scan_expression(&mut self, start: usize, end: usize, category: PartCategory) {
        let limit = end.min(self.bytes.len());
        let mut pos = start;
        while pos < limit {
            let b = self.bytes[pos];
            match b {
                b'"' | b'\'' => {
                    let content_start = pos + 1;
                    let content_end = self.find_script_string_end(content_start, b, limit);
                    self.collect_value_tokens(content_start, content_end, category);
                    pos = (content_end + 1).min(limit);
                }
                b'`' => {
                    pos = self.scan_template_literal(pos, limit, category);
                }
                b'/' if self.bytes.get(pos + 1) == Some(&b'*') => {
                    pos = self.skip_block_comment(pos, limit);
                }
                b'/' if self.bytes.get(pos + 1) == Some(&b'/') => {
                    while pos < limit && self.bytes[pos] != b'\n' {
                        pos += 1;
                    }
                }
                _ if is_script_identifier_start(b) => {
                    pos = self.scan_expression_identifier(pos, limit, category);
                }
                _ => pos += 1,
            }
        }
    }

    fn scan_expression_identifier(
        &mut self,
        start: usize,
        end: usize,
        category: PartCategory,
    ) -> usize {
        let mut pos = start;
        while pos < end && is_script_identifier_byte(self.bytes[pos]) {
            pos += 1;
        }
        // only class values have the object key and module access shapes
        if category != PartCategory::ClassName {
            return pos;
        }
        let text = self.text;
        let identifier = &text[start..pos];
        if self.bytes.get(pos) == Some(&b'.') {
            // styles.button: a property read off a style-like binding
            let property_start = pos + 1;
            let mut property_end = property_start;
            while property_end < end && is_script_identifier_byte(self.bytes[property_end]) {
                property_end += 1;
            }
            if property_end > property_start && identifier.to_ascii_lowercase().contains("style") {
                self.push_token(property_start, property_end, PartCategory::ClassName);
            }
            return property_end.max(pos + 1);
        }
        // { active: flag }: an object key right after '{' or ',' names a class
        let mut lookahead = pos;
        while lookahead < end && self.bytes[lookahead].is_ascii_whitespace() {
            lookahead += 1;
        }
        if self.bytes.get(lookahead) == Some(&b':') {
            let scanner = BackwardScanner::new(text, start);
            if matches!(scanner.peek_skipping_whitespace(0), Some('{') | Some(',')) {
                self.push_token(start, pos, PartCategory::ClassName);
            }
        }
        pos
    }

    /// Template literal: plain chunks are token lists, `${...}` insertions
    /// are scanned as nested expressions.
    fn scan_template_literal(&mut self, open: usize, end: usize, category: PartCategory) -> usize {
        let limit = end.min(self.bytes.len());
        let mut pos = open + 1;
        let mut chunk_start = pos;
        while pos < limit {
            match self.bytes[pos] {
                b'`' => {
                    self.collect_value_tokens(chunk_start, pos, category);
                    return pos + 1;
                }
                b'\\' => pos += 2,
                b'$' if self.bytes.get(pos + 1) == Some(&b'{') => {
                    self.collect_value_tokens(chunk_start, pos, category);
                    let insertion_end = self.find_expression_end(pos + 1, limit);
                    self.scan_expression(pos + 2, insertion_end, category);
                    pos = (insertion_end + 1).min(limit);
                    chunk_start = pos;
                }
                _ => pos += 1,
            }
        }
        self.collect_value_tokens(chunk_start, limit, category);
        limit
    }

    /// Position of the `}` matching the `{` at `open`, with strings and
    /// template literals stepped over so their braces don't count.
    fn find_expression_end(&self, open: usize, limit: usize) -> usize {
        let limit = limit.min(self.bytes.len());
        let mut depth = 0i32;
        let mut pos = open;
        while pos < limit {
            match self.bytes[pos] {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return pos;
                    }
                }
                quote @ (b'"' | b'\'' | b'`') => {
                    pos = self.find_script_string_end(pos + 1, quote, limit);
                }
                _ => {}
            }
            pos += 1;
        }
        limit
    }

    fn find_quote_end(&self, start: usize, quote: u8) -> usize {
        let mut pos = start;
        while pos < self.bytes.len() && self.bytes[pos] != quote {
            pos += 1;
        }
        pos
    }

    fn find_script_string_end(&self, start: usize, quote: u8, limit: usize) -> usize {
        let mut pos = start;
        let limit = limit.min(self.bytes.len());
        while pos < limit {
            match self.bytes[pos] {
                b'\\' => pos += 2,
                b if b == quote => return pos,
                _ => pos += 1,
            }
        }
        limit
    }

    fn skip_block_comment(&self, start: usize, limit: usize) -> usize {
        let mut pos = start + 2;
        while pos + 1 < limit {
            if self.bytes[pos] == b'*' && self.bytes[pos + 1] == b'/' {
                return pos + 2;
            }
            pos += 1;
        }
        limit
    }
}

fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn is_attr_name_end(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'=' | b'>' | b'/' | b'<')
}

fn is_bare_value_end(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'>' | b'<')
}

fn is_script_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_script_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn strip_binding_prefix(attribute: &str) -> (&str, bool) {
    if let Some(rest) = attribute.strip_prefix("v-bind:") {
        (rest, true)
    } else if let Some(rest) = attribute.strip_prefix(':') {
        (rest, true)
    } else {
        (attribute, false)
    }
}

fn is_class_attribute(name: &str) -> bool {
    name.eq_ignore_ascii_case("class") || name == "className" || name == "styleName"
}

fn find_case_insensitive(text: &str, from: usize, needle: &str) -> Option<usize> {
    let haystack = text.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (from..=haystack.len() - needle.len())
        .find(|&i| haystack[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod parser_tests;
