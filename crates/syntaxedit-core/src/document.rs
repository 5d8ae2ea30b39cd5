//! Document model.
//!
//! The document is an ordered sequence of logical lines separated by `'\n'`, stored in a
//! [`ropey::Rope`] for `O(log N)` line access and editing. Every modification is recorded as a
//! [`TextDeltaEdit`]; edits are grouped into atomic transactions with [`Document::transaction`].
//!
//! Read-only consumers (the brace matcher, line classifiers) see the text through the
//! [`LineSource`] trait, which plain strings implement as well.

use crate::commands::CommandError;
use crate::cursor::Position;
use crate::delta::{TextDelta, TextDeltaEdit};
use ropey::Rope;
use std::borrow::Cow;

/// Read-only access to a line-structured text.
pub trait LineSource {
    /// Number of logical lines (an empty text has one empty line).
    fn line_count(&self) -> usize;

    /// Text of `line` without its line break, or `None` when out of range.
    fn line_text(&self, line: usize) -> Option<Cow<'_, str>>;
}

impl LineSource for str {
    fn line_count(&self) -> usize {
        self.split('\n').count()
    }

    fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        self.split('\n').nth(line).map(Cow::Borrowed)
    }
}

impl LineSource for [&str] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        self.get(line).map(|s| Cow::Borrowed(*s))
    }
}

/// A rope-backed document with edit transactions.
#[derive(Debug, Clone)]
pub struct Document {
    rope: Rope,
    pending: Vec<TextDeltaEdit>,
    pending_before_chars: usize,
    depth: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl Document {
    /// Build a document from text.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            pending: Vec::new(),
            pending_before_chars: 0,
            depth: 0,
        }
    }

    /// Full text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Number of logical lines.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Text of `line` without its trailing line break.
    pub fn line(&self, line: usize) -> Option<String> {
        self.line_slice(line).map(|s| s.to_string())
    }

    fn line_slice(&self, line: usize) -> Option<ropey::RopeSlice<'_>> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let slice = self.rope.line(line);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            Some(slice.slice(..len - 1))
        } else {
            Some(slice)
        }
    }

    /// Length of `line` in characters, excluding its line break. Zero when out of range.
    pub fn line_len(&self, line: usize) -> usize {
        self.line_slice(line).map_or(0, |s| s.len_chars())
    }

    /// Character offset of the start of `line` (clamped to the document end).
    pub fn line_to_char(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    /// Convert a (clamped) character offset to a position.
    pub fn char_offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        Position::new(line, offset - self.rope.line_to_char(line))
    }

    /// Convert a position to a character offset, clamping line and column.
    pub fn position_to_char_offset(&self, position: Position) -> usize {
        let position = self.clamp_position(position);
        self.rope.line_to_char(position.line) + position.column
    }

    /// Clamp a position into the current document bounds.
    pub fn clamp_position(&self, position: Position) -> Position {
        let last_line = self.line_count().saturating_sub(1);
        let line = position.line.min(last_line);
        Position::new(line, position.column.min(self.line_len(line)))
    }

    /// Position just past the last character.
    pub fn end_position(&self) -> Position {
        self.char_offset_to_position(self.char_count())
    }

    /// Character at `offset`.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        (offset < self.rope.len_chars()).then(|| self.rope.char(offset))
    }

    /// Text in the half-open character range `start..end` (clamped).
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.rope.len_chars());
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// Insert `text` at a character offset.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), CommandError> {
        if offset > self.char_count() {
            return Err(CommandError::InvalidOffset(offset));
        }
        if text.is_empty() {
            return Ok(());
        }
        self.record(offset, String::new(), text.to_string());
        self.rope.insert(offset, text);
        Ok(())
    }

    /// Delete `length` characters starting at `start`.
    pub fn delete(&mut self, start: usize, length: usize) -> Result<(), CommandError> {
        self.replace(start, length, "")
    }

    /// Replace `length` characters starting at `start` with `text`.
    pub fn replace(&mut self, start: usize, length: usize, text: &str) -> Result<(), CommandError> {
        let end = start.saturating_add(length);
        if end > self.char_count() {
            return Err(CommandError::InvalidRange { start, end });
        }
        if length == 0 && text.is_empty() {
            return Ok(());
        }
        let deleted = self.slice(start, end);
        self.record(start, deleted, text.to_string());
        if length > 0 {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
        Ok(())
    }

    /// Replace the text of `line` (without its line break).
    pub fn replace_line(&mut self, line: usize, text: &str) -> Result<(), CommandError> {
        if line >= self.line_count() {
            return Err(CommandError::InvalidPosition { line, column: 0 });
        }
        let start = self.line_to_char(line);
        self.replace(start, self.line_len(line), text)
    }

    fn record(&mut self, start: usize, deleted_text: String, inserted_text: String) {
        if self.pending.is_empty() {
            self.pending_before_chars = self.char_count();
        }
        let start_line = self.rope.char_to_line(start);
        self.pending.push(TextDeltaEdit {
            start,
            start_line,
            deleted_text,
            inserted_text,
        });
    }

    /// Run `f` as one atomic edit transaction.
    ///
    /// Transactions nest; the delta is returned only when the outermost transaction ends,
    /// whatever path `f` returns through. `None` means nothing changed.
    pub fn transaction<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> (R, Option<TextDelta>) {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        if self.depth > 0 {
            return (result, None);
        }
        (result, self.take_delta())
    }

    /// Returns `true` while a transaction is open.
    pub fn in_transaction(&self) -> bool {
        self.depth > 0
    }

    /// Drain edits applied outside any transaction.
    pub fn take_delta(&mut self) -> Option<TextDelta> {
        if self.depth > 0 || self.pending.is_empty() {
            return None;
        }
        let edits = std::mem::take(&mut self.pending);
        tracing::debug!(edits = edits.len(), "edit transaction closed");
        Some(TextDelta {
            before_char_count: self.pending_before_chars,
            after_char_count: self.char_count(),
            edits,
        })
    }
}

impl LineSource for Document {
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        let slice = self.line_slice(line)?;
        Some(match slice.as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(slice.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_and_positions() {
        let doc = Document::new("ab\ncde\n");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line(1).as_deref(), Some("cde"));
        assert_eq!(doc.line(2).as_deref(), Some(""));
        assert_eq!(doc.line_len(1), 3);
        assert_eq!(doc.char_offset_to_position(4), Position::new(1, 1));
        assert_eq!(doc.position_to_char_offset(Position::new(1, 99)), 6);
        assert_eq!(doc.position_to_char_offset(Position::new(9, 0)), 7);
    }

    #[test]
    fn transaction_yields_one_delta() {
        let mut doc = Document::new("one\ntwo");
        let (result, delta) = doc.transaction(|doc| {
            doc.insert(0, "  ")?;
            doc.transaction(|doc| doc.insert(6, "  ")).0?;
            Ok::<_, CommandError>(())
        });
        assert!(result.is_ok());
        let delta = delta.expect("delta");
        assert_eq!(delta.edits.len(), 2);
        assert_eq!(delta.before_char_count, 7);
        assert_eq!(delta.after_char_count, 11);
        assert_eq!(doc.text(), "  one\n  two");
        assert!(!doc.in_transaction());
    }

    #[test]
    fn transaction_closes_on_early_error() {
        let mut doc = Document::new("x");
        let (result, delta) = doc.transaction(|doc| {
            doc.insert(1, "y")?;
            doc.insert(100, "z")?;
            Ok::<_, CommandError>(())
        });
        assert_eq!(result, Err(CommandError::InvalidOffset(100)));
        assert!(!doc.in_transaction());
        assert_eq!(delta.map(|d| d.edits.len()), Some(1));
    }

    #[test]
    fn edits_record_start_line() {
        let mut doc = Document::new("a\nb\nc");
        doc.replace(2, 3, "B").unwrap();
        let delta = doc.take_delta().unwrap();
        assert_eq!(delta.edits[0].start_line, 1);
        assert_eq!(delta.edits[0].deleted_text, "b\nc");
        assert_eq!(doc.text(), "a\nB");
    }

    #[test]
    fn out_of_range_edits_fail() {
        let mut doc = Document::new("abc");
        assert_eq!(
            doc.delete(2, 5),
            Err(CommandError::InvalidRange { start: 2, end: 7 })
        );
        assert_eq!(doc.text(), "abc");
    }

    #[test]
    fn str_line_source() {
        let text = "a\n\nb";
        assert_eq!(LineSource::line_count(text), 3);
        assert_eq!(text.line_text(2).as_deref(), Some("b"));
        assert!(text.line_text(3).is_none());
    }
}
