//! Document text snapshots and version tracking
//!
//! The store keeps one [`Document`] per tracked file. While a file is open
//! in the editor the buffer text is authoritative; once it closes, the
//! filesystem is. [`DocumentVersion`] encodes that hand-off so cached parse
//! results can tell reliably whether they are still current.

use tower_lsp::lsp_types::{Position, Range, TextDocumentContentChangeEvent, Url};

/// A version that moves whenever the content may have changed.
///
/// Equal versions guarantee identical content; unequal versions only mean
/// the content may differ. The major number increments on every editor
/// open/close transition, so a minor from the editor's numbering never
/// compares equal to a minor from filesystem change counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentVersion {
    /// Bumped each time the document is opened or closed in the editor
    pub major: i32,
    /// While open: the version number the editor reports for the buffer.
    /// While closed: a counter bumped on each detected filesystem change
    /// (detection is best effort).
    pub minor: i32,
}

impl DocumentVersion {
    /// Version assigned when a file is first tracked from disk.
    pub fn initial() -> Self {
        DocumentVersion { major: 1, minor: 0 }
    }
}

/// One document's text with offset/position conversion.
#[derive(Debug, Clone)]
pub struct Document {
    uri: Url,
    text: String,
    version: DocumentVersion,
    /// Byte offset of every line start, kept in sync with `text`
    line_starts: Vec<usize>,
}

impl Document {
    pub fn new(uri: Url, text: String, version: DocumentVersion) -> Self {
        let line_starts = calculate_line_starts(&text);
        Document {
            uri,
            text,
            version,
            line_starts,
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn version(&self) -> DocumentVersion {
        self.version
    }

    pub fn set_version(&mut self, version: DocumentVersion) {
        self.version = version;
    }

    /// Apply editor content changes in order. Ranged changes splice into the
    /// current text; a change without a range replaces the whole document.
    pub fn apply_changes(&mut self, changes: &[TextDocumentContentChangeEvent]) {
        for change in changes {
            match change.range {
                Some(range) => {
                    let start = self.position_to_offset(range.start);
                    let end = self.position_to_offset(range.end);
                    let mut updated =
                        String::with_capacity(self.text.len() + change.text.len());
                    updated.push_str(&self.text[..start]);
                    updated.push_str(&change.text);
                    updated.push_str(&self.text[end..]);
                    self.text = updated;
                }
                None => {
                    self.text = change.text.clone();
                }
            }
            self.line_starts = calculate_line_starts(&self.text);
        }
    }

    /// Convert an editor position to a byte offset, clamping positions past
    /// the end of a line or of the document.
    pub fn position_to_offset(&self, position: Position) -> usize {
        let line = position.line as usize;
        if line >= self.line_starts.len() {
            return self.text.len();
        }
        let line_start = self.line_starts[line];
        let line_end = self.line_end(line);
        let line_text = &self.text[line_start..line_end];
        let mut remaining = position.character as usize;
        for (i, _) in line_text.char_indices() {
            if remaining == 0 {
                return line_start + i;
            }
            remaining -= 1;
        }
        line_end
    }

    /// Convert a byte offset back to an editor position. Offsets must lie on
    /// character boundaries; anything past the end of the text is clamped.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let character = self.text[line_start..offset].chars().count() as u32;
        Position {
            line: line as u32,
            character,
        }
    }

    /// The range covering bytes `start..end`.
    pub fn range(&self, start: usize, end: usize) -> Range {
        Range {
            start: self.offset_to_position(start),
            end: self.offset_to_position(end),
        }
    }

    /// The full text of the line containing `offset`, without the line
    /// terminator. Used for hover excerpts.
    pub fn line_text_at(&self, offset: usize) -> &str {
        let offset = offset.min(self.text.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let line_end = self.line_end(line);
        self.text[line_start..line_end].trim_end_matches('\r')
    }

    /// End of `line` excluding the newline character.
    fn line_end(&self, line: usize) -> usize {
        if line + 1 < self.line_starts.len() {
            self.line_starts[line + 1] - 1
        } else {
            self.text.len()
        }
    }
}

fn calculate_line_starts(text: &str) -> Vec<usize> {
    let mut line_starts = vec![0];
    for (i, ch) in text.char_indices() {
        if ch == '\n' {
            line_starts.push(i + 1);
        }
    }
    line_starts
}
