//! Backward scanning over document text
//!
//! Cursor-relative features (completion context, token under cursor) need to
//! look a short distance behind the cursor without re-parsing the document.
//! [`BackwardScanner`] walks characters from a byte offset toward the start
//! of the text, which keeps every probe local and cheap no matter how large
//! the document is.

/// Characters that can form a symbol word: ASCII letters, digits,
/// underscore and hyphen. Hyphens are included so `foo-bar` and `--variable`
/// read as single words.
pub fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

/// A cursor that reads characters leftward from a byte offset.
///
/// The cursor always sits on a character boundary; constructing one from an
/// offset inside a multi-byte character snaps it back to the nearest
/// boundary. Reads past the start of the text return `None`.
#[derive(Debug, Clone, Copy)]
pub struct BackwardScanner<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> BackwardScanner<'a> {
    /// Create a scanner with its cursor at `offset` (clamped into `text`).
    pub fn new(text: &'a str, offset: usize) -> Self {
        let mut position = offset.min(text.len());
        while position > 0 && !text.is_char_boundary(position) {
            position -= 1;
        }
        BackwardScanner { text, position }
    }

    /// Current cursor position as a byte offset into the text.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Consume and return the character immediately before the cursor.
    pub fn read(&mut self) -> Option<char> {
        let ch = self.text[..self.position].chars().next_back()?;
        self.position -= ch.len_utf8();
        Some(ch)
    }

    /// Look at the character `distance` positions before the cursor without
    /// moving it. `peek(0)` is the character `read` would return.
    pub fn peek(&self, distance: usize) -> Option<char> {
        self.text[..self.position].chars().rev().nth(distance)
    }

    /// Like [`peek`](Self::peek), but whitespace runs count as zero width,
    /// so `peek_skipping_whitespace(0)` is the nearest non-whitespace
    /// character behind the cursor.
    pub fn peek_skipping_whitespace(&self, distance: usize) -> Option<char> {
        self.text[..self.position]
            .chars()
            .rev()
            .filter(|ch| !ch.is_whitespace())
            .nth(distance)
    }

    /// Move the cursor back over any whitespace directly before it.
    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek(0) {
            if !ch.is_whitespace() {
                break;
            }
            self.position -= ch.len_utf8();
        }
    }

    /// Consume the word ending at the cursor and return it in document
    /// order. The cursor is left at the word's first character. Returns an
    /// empty slice when no word character precedes the cursor.
    pub fn read_word_before_cursor(&mut self) -> &'a str {
        let end = self.position;
        while let Some(ch) = self.peek(0) {
            if !is_word_char(ch) {
                break;
            }
            self.position -= ch.len_utf8();
        }
        &self.text[self.position..end]
    }

    /// Read the whole word the cursor sits inside, extending across word
    /// characters on both sides. The cursor is left at the word's first
    /// character; the part ahead of the cursor is not consumed, only
    /// included in the returned slice.
    pub fn read_whole_word_around_cursor(&mut self) -> &'a str {
        let mut end = self.position;
        for ch in self.text[self.position..].chars() {
            if !is_word_char(ch) {
                break;
            }
            end += ch.len_utf8();
        }
        self.read_word_before_cursor();
        &self.text[self.position..end]
    }

    /// Consume backward until a character from `delimiters` is read or
    /// `max_count` characters have been consumed, whichever comes first.
    /// The bound keeps scans over malformed text from walking the whole
    /// document.
    ///
    /// Returns the delimiter that stopped the scan (`None` when the bound or
    /// the start of the text was hit) and the consumed span in document
    /// order, delimiter included.
    pub fn read_until_any_of(
        &mut self,
        delimiters: &[char],
        max_count: usize,
    ) -> (Option<char>, &'a str) {
        let end = self.position;
        let mut consumed = 0;
        while consumed < max_count {
            let Some(ch) = self.read() else {
                break;
            };
            consumed += 1;
            if delimiters.contains(&ch) {
                return (Some(ch), &self.text[self.position..end]);
            }
        }
        (None, &self.text[self.position..end])
    }
}
