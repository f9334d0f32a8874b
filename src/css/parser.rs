//! Lenient stylesheet parsing
//!
//! Extracts selector and custom property parts from CSS, SCSS and Less text
//! in a single forward pass. Editing-time text is routinely incomplete, so
//! there is no grammar here: the pass tracks only the structure it needs
//! (comments, strings, braces) and silently steps over anything it cannot
//! make sense of. A rule missing its closing brace still yields every part
//! written so far.

use crate::language::part::{Part, PartCategory, PartMode};
use crate::language::scanner::BackwardScanner;

/// Extract all parts of a stylesheet document.
pub fn parse(text: &str) -> Vec<Part> {
    parse_embedded(text, 0)
}

/// Extract parts of stylesheet text embedded at byte offset `base` of a
/// larger document, shifting every emitted range accordingly. Markup
/// documents use this for `<style>` block content.
pub fn parse_embedded(text: &str, base: usize) -> Vec<Part> {
    CssPartParser {
        text,
        bytes: text.as_bytes(),
        base,
        parts: Vec::new(),
    }
    .run()
}

/// What the cursor is placed to complete inside a stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssCompletionContext {
    /// Inside `var(...)`: replace `start..end` (the partial name, leading
    /// dashes included) with a custom property reference
    VariableName { start: usize, end: usize },
}

/// Detect whether `offset` sits where a custom property name belongs.
pub fn completion_context(text: &str, offset: usize) -> Option<CssCompletionContext> {
    let mut scanner = BackwardScanner::new(text, offset);
    let word = scanner.read_whole_word_around_cursor();
    let start = scanner.position();
    let end = start + word.len();
    let mut probe = scanner;
    if probe.read() != Some('(') {
        return None;
    }
    if !probe.read_word_before_cursor().eq_ignore_ascii_case("var") {
        return None;
    }
    Some(CssCompletionContext::VariableName { start, end })
}

struct CssPartParser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    base: usize,
    parts: Vec<Part>,
}

impl<'a> CssPartParser<'a> {
    fn run(mut self) -> Vec<Part> {
        let mut pos = 0;
        let mut segment_start = 0;
        let mut depth = 0usize;
        while pos < self.bytes.len() {
            match self.bytes[pos] {
                b'/' if self.bytes.get(pos + 1) == Some(&b'*') => {
                    pos = skip_block_comment(self.bytes, pos);
                }
                // not a comment directly after ':' so url() schemes survive
                b'/' if self.bytes.get(pos + 1) == Some(&b'/')
                    && (pos == 0 || self.bytes[pos - 1] != b':') =>
                {
                    pos = skip_line_comment(self.bytes, pos);
                }
                b'"' | b'\'' => {
                    pos = skip_string(self.bytes, pos);
                }
                b'{' if pos > 0 && matches!(self.bytes[pos - 1], b'#' | b'@') => {
                    // scss/less interpolation, stays inside the current segment
                    pos = skip_interpolation(self.bytes, pos);
                }
                b'{' => {
                    self.handle_rule_open(segment_start, pos);
                    depth += 1;
                    pos += 1;
                    segment_start = pos;
                }
                b'}' => {
                    self.handle_declaration(segment_start, pos, depth);
                    depth = depth.saturating_sub(1);
                    pos += 1;
                    segment_start = pos;
                }
                b';' => {
                    self.handle_declaration(segment_start, pos, depth);
                    pos += 1;
                    segment_start = pos;
                }
                _ => pos += 1,
            }
        }
        // trailing unterminated declaration, common while typing
        self.handle_declaration(segment_start, self.bytes.len(), depth);
        self.parts
    }

    /// A `{` was reached: the pending segment is a selector list unless it
    /// is an at-rule prelude.
    fn handle_rule_open(&mut self, start: usize, end: usize) {
        if self.first_significant_byte(start, end) == Some(b'@') {
            return;
        }
        self.extract_selectors(start, end);
    }

    fn first_significant_byte(&self, start: usize, end: usize) -> Option<u8> {
        let mut pos = start;
        while pos < end {
            let b = self.bytes[pos];
            if b.is_ascii_whitespace() {
                pos += 1;
            } else if b == b'/' && self.bytes.get(pos + 1) == Some(&b'*') {
                pos = skip_block_comment(self.bytes, pos);
            } else {
                return Some(b);
            }
        }
        None
    }

    /// Emit selector parts for one selector list segment. Pseudo classes,
    /// attribute selectors, placeholder selectors and nesting references all
    /// pass through without producing parts.
    fn extract_selectors(&mut self, start: usize, end: usize) {
        let mut pos = start;
        while pos < end {
            let b = self.bytes[pos];
            match b {
                b'/' if self.bytes.get(pos + 1) == Some(&b'*') => {
                    pos = skip_block_comment(self.bytes, pos).min(end);
                }
                b'/' if self.bytes.get(pos + 1) == Some(&b'/') => {
                    pos = skip_line_comment(self.bytes, pos).min(end);
                }
                b'"' | b'\'' => {
                    pos = skip_string(self.bytes, pos).min(end);
                }
                b'[' => {
                    pos += 1;
                    while pos < end && self.bytes[pos] != b']' {
                        pos += 1;
                    }
                    pos = (pos + 1).min(end);
                }
                b'(' => {
                    // functional pseudo class arguments are not navigable
                    let mut nesting = 1u32;
                    pos += 1;
                    while pos < end && nesting > 0 {
                        match self.bytes[pos] {
                            b'(' => nesting += 1,
                            b')' => nesting -= 1,
                            _ => {}
                        }
                        pos += 1;
                    }
                }
                b'.' | b'#' => {
                    if b == b'#' && self.bytes.get(pos + 1) == Some(&b'{') {
                        pos = skip_interpolation(self.bytes, pos + 1).min(end);
                        continue;
                    }
                    let sigil_start = pos;
                    let (name, name_end) = self.read_identifier(pos + 1, end, true);
                    if name.is_empty() {
                        pos += 1;
                        continue;
                    }
                    let sigil = b as char;
                    self.push_part(
                        PartCategory::Selector,
                        PartMode::Definition,
                        format!("{sigil}{name}"),
                        sigil_start,
                        name_end,
                    );
                    pos = name_end;
                }
                b'&' => {
                    // parent reference; a joined suffix can't be resolved here
                    pos += 1;
                    let (_, skipped) = self.read_identifier(pos, end, true);
                    pos = skipped.max(pos);
                }
                b':' => {
                    while pos < end && self.bytes[pos] == b':' {
                        pos += 1;
                    }
                    let (_, skipped) = self.read_identifier(pos, end, true);
                    pos = skipped.max(pos);
                }
                b'%' => {
                    // scss placeholder selectors are compile-time only
                    pos += 1;
                    let (_, skipped) = self.read_identifier(pos, end, true);
                    pos = skipped.max(pos);
                }
                b'@' => {
                    if self.bytes.get(pos + 1) == Some(&b'{') {
                        pos = skip_interpolation(self.bytes, pos + 1).min(end);
                    } else {
                        pos += 1;
                        let (_, skipped) = self.read_identifier(pos, end, true);
                        pos = skipped.max(pos);
                    }
                }
                _ if is_identifier_start(b) => {
                    let tag_start = pos;
                    let (name, name_end) = self.read_identifier(pos, end, false);
                    if !name.is_empty() {
                        self.push_part(
                            PartCategory::Selector,
                            PartMode::Definition,
                            name,
                            tag_start,
                            name_end,
                        );
                    }
                    pos = name_end.max(tag_start + 1);
                }
                _ => pos += 1,
            }
        }
    }

    /// A `;` or `}` was reached: the pending segment is a declaration.
    /// Custom property declarations define a variable; every declaration
    /// value may read variables through `var()`.
    fn handle_declaration(&mut self, start: usize, end: usize, depth: usize) {
        if depth == 0 {
            // top level statements (@import and friends) carry no parts
            return;
        }
        let mut pos = start;
        while pos < end {
            let b = self.bytes[pos];
            if b.is_ascii_whitespace() {
                pos += 1;
            } else if b == b'/' && self.bytes.get(pos + 1) == Some(&b'*') {
                pos = skip_block_comment(self.bytes, pos).min(end);
            } else if b == b'/' && self.bytes.get(pos + 1) == Some(&b'/') {
                pos = skip_line_comment(self.bytes, pos).min(end);
            } else {
                break;
            }
        }
        if pos >= end {
            return;
        }
        if self.bytes[pos] == b'-' && self.bytes.get(pos + 1) == Some(&b'-') {
            let token_start = pos;
            let (name, name_end) = self.read_identifier(pos + 2, end, true);
            if !name.is_empty() {
                self.push_part(
                    PartCategory::CssVariable,
                    PartMode::Definition,
                    name,
                    token_start,
                    name_end,
                );
            }
            pos = name_end;
        }
        self.scan_variable_references(pos, end);
    }

    /// Find `var(--name)` reads between `start` and `end`, skipping strings
    /// and comments. Nested fallbacks like `var(--a, var(--b))` yield one
    /// part per read.
    fn scan_variable_references(&mut self, start: usize, end: usize) {
        let mut pos = start;
        while pos < end {
            match self.bytes[pos] {
                b'/' if self.bytes.get(pos + 1) == Some(&b'*') => {
                    pos = skip_block_comment(self.bytes, pos).min(end);
                }
                b'/' if self.bytes.get(pos + 1) == Some(&b'/')
                    && (pos == 0 || self.bytes[pos - 1] != b':') =>
                {
                    pos = skip_line_comment(self.bytes, pos).min(end);
                }
                b'"' | b'\'' => {
                    pos = skip_string(self.bytes, pos).min(end);
                }
                b'v' | b'V' => {
                    let boundary = pos == 0 || !is_identifier_byte(self.bytes[pos - 1]);
                    if boundary
                        && end - pos >= 4
                        && self.bytes[pos..pos + 4].eq_ignore_ascii_case(b"var(")
                    {
                        let after_open = pos + 4;
                        pos = self
                            .read_variable_argument(after_open, end)
                            .unwrap_or(after_open);
                    } else {
                        pos += 1;
                    }
                }
                _ => pos += 1,
            }
        }
    }

    fn read_variable_argument(&mut self, start: usize, end: usize) -> Option<usize> {
        let mut pos = start;
        while pos < end && self.bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos + 1 >= end || self.bytes[pos] != b'-' || self.bytes[pos + 1] != b'-' {
            return None;
        }
        let token_start = pos;
        let (name, name_end) = self.read_identifier(pos + 2, end, true);
        if name.is_empty() {
            return None;
        }
        self.push_part(
            PartCategory::CssVariable,
            PartMode::Reference,
            name,
            token_start,
            name_end,
        );
        Some(name_end)
    }

    /// Lex one identifier starting at `start`, decoding CSS escapes into the
    /// returned text. The second value is the offset one past the raw
    /// identifier, escape sequences included.
    fn read_identifier(&self, start: usize, end: usize, allow_digit_start: bool) -> (String, usize) {
        let mut name = String::new();
        let mut pos = start;
        let mut first = true;
        while pos < end {
            let Some(ch) = self.char_at(pos) else { break };
            if ch == '\\' {
                let (decoded, next) = self.read_escape(pos + 1, end);
                match decoded {
                    Some(decoded) => name.push(decoded),
                    None => break,
                }
                pos = next;
                first = false;
                continue;
            }
            let is_identifier =
                ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii();
            if !is_identifier {
                break;
            }
            if first && ch.is_ascii_digit() && !allow_digit_start {
                break;
            }
            name.push(ch);
            pos += ch.len_utf8();
            first = false;
        }
        (name, pos)
    }

    /// Decode one CSS escape following a backslash: up to six hex digits
    /// with an optional trailing whitespace terminator, or a literal
    /// character.
    fn read_escape(&self, start: usize, end: usize) -> (Option<char>, usize) {
        if start >= end {
            return (None, start);
        }
        let Some(first) = self.char_at(start) else {
            return (None, start);
        };
        if !first.is_ascii_hexdigit() {
            return (Some(first), start + first.len_utf8());
        }
        let mut value = 0u32;
        let mut pos = start;
        let mut digits = 0;
        while pos < end && digits < 6 {
            let Some(digit) = self.char_at(pos).and_then(|c| c.to_digit(16)) else {
                break;
            };
            value = value * 16 + digit;
            pos += 1;
            digits += 1;
        }
        if pos < end && matches!(self.bytes[pos], b' ' | b'\t' | b'\r' | b'\n') {
            pos += 1;
        }
        (char::from_u32(value), pos)
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.text.get(pos..)?.chars().next()
    }

    fn push_part(
        &mut self,
        category: PartCategory,
        mode: PartMode,
        text: impl Into<String>,
        start: usize,
        end: usize,
    ) {
        self.parts.push(Part::new(
            category,
            mode,
            text,
            self.base + start,
            self.base + end,
        ));
    }
}

fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'\\' || b >= 0x80
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b >= 0x80
}

fn skip_block_comment(bytes: &[u8], start: usize) -> usize {
    let mut pos = start + 2;
    while pos + 1 < bytes.len() {
        if bytes[pos] == b'*' && bytes[pos + 1] == b'/' {
            return pos + 2;
        }
        pos += 1;
    }
    bytes.len()
}

fn skip_line_comment(bytes: &[u8], start: usize) -> usize {
    let mut pos = start;
    while pos < bytes.len() && bytes[pos] != b'\n' {
        pos += 1;
    }
    pos
}

fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut pos = start + 1;
    while pos < bytes.len() {
        if bytes[pos] == b'\\' {
            pos += 2;
        } else if bytes[pos] == quote {
            return pos + 1;
        } else {
            pos += 1;
        }
    }
    bytes.len()
}

fn skip_interpolation(bytes: &[u8], open: usize) -> usize {
    let mut pos = open + 1;
    while pos < bytes.len() && bytes[pos] != b'}' {
        pos += 1;
    }
    (pos + 1).min(bytes.len())
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod parser_tests;
