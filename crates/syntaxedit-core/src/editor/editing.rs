//! Text editing operations.
//!
//! Each operation runs as one edit transaction, so it produces exactly one
//! `DocumentModified` notification and one cursor/decoration refresh.

use super::Editor;
use crate::commands::CommandError;
use crate::cursor::{Cursor, Position};
use crate::metrics::{char_len, leading_whitespace_len};

impl Editor {
    fn selection_offsets(&self) -> (usize, usize) {
        (
            self.document.position_to_char_offset(self.cursor.start()),
            self.document.position_to_char_offset(self.cursor.end()),
        )
    }

    /// Character range of the cursor lines including the trailing line break, or of the
    /// selection when there is one.
    fn line_or_selection_range(&self) -> (usize, usize) {
        if self.cursor.has_selection() {
            return self.selection_offsets();
        }
        let line = self.cursor.active.line;
        let start = self.document.line_to_char(line);
        let end = if line + 1 < self.document.line_count() {
            self.document.line_to_char(line + 1)
        } else {
            self.document.char_count()
        };
        (start, end)
    }

    fn lines_text(&self, first: usize, last: usize) -> String {
        let start = self.document.line_to_char(first);
        let end = self.document.line_to_char(last) + self.document.line_len(last);
        self.document.slice(start, end)
    }

    /// Insert `text` at a character offset.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), CommandError> {
        self.edit(|doc| doc.insert(offset, text))
    }

    /// Delete `length` characters at `start`.
    pub fn delete(&mut self, start: usize, length: usize) -> Result<(), CommandError> {
        self.edit(|doc| doc.delete(start, length))
    }

    /// Replace `length` characters at `start` with `text`.
    pub fn replace(&mut self, start: usize, length: usize, text: &str) -> Result<(), CommandError> {
        self.edit(|doc| doc.replace(start, length, text))
    }

    /// Replace the selection with typed text; the caret ends up after it.
    pub fn insert_text(&mut self, text: &str) -> Result<(), CommandError> {
        let (start, end) = self.selection_offsets();
        self.edit(|doc| doc.replace(start, end - start, text))
    }

    /// Replace the selection with a line break.
    ///
    /// With auto-indent on, the new line gets the leading whitespace of the nearest line above
    /// that has any, looking past empty lines but not past unindented text. When that source is
    /// the whitespace-only line right above, it is cleared.
    pub fn insert_newline(&mut self) -> Result<(), CommandError> {
        let (start, end) = self.selection_offsets();
        let auto_indent = self.config.auto_indent;
        self.edit(|doc| {
            doc.replace(start, end - start, "\n")?;
            if !auto_indent {
                return Ok(());
            }

            let caret = start + 1;
            let new_line = doc.char_offset_to_position(caret).line;
            let mut source = None;
            for line in (0..new_line).rev() {
                let text = doc.line(line).unwrap_or_default();
                let len = leading_whitespace_len(&text);
                if len > 0 {
                    source = Some((line, text, len));
                    break;
                }
                if !text.is_empty() {
                    break;
                }
            }
            let Some((line, text, len)) = source else {
                return Ok(());
            };

            let indent: String = text.chars().take(len).collect();
            doc.insert(caret, &indent)?;
            if len == char_len(&text) && line + 1 == new_line {
                doc.replace_line(line, "")?;
            }
            Ok(())
        })
    }

    /// Tab: indent the selected lines, or insert indentation at the caret.
    pub fn tab(&mut self) -> Result<(), CommandError> {
        if self.cursor.has_selection() {
            return self.indent_lines();
        }
        let caret = self.cursor.active;
        let text = self.document.line(caret.line).unwrap_or_default();
        let edit = self.indent_style().tab_edit(&text, caret.column);
        let line_start = self.document.line_to_char(caret.line);
        self.edit(|doc| doc.replace(line_start + edit.start, edit.len, &edit.text))
    }

    /// Indent the cursor or selected lines by one step. Empty lines are skipped.
    pub fn indent_lines(&mut self) -> Result<(), CommandError> {
        self.reindent_lines(false)
    }

    /// Outdent the cursor or selected lines by one step.
    pub fn outdent_lines(&mut self) -> Result<(), CommandError> {
        self.reindent_lines(true)
    }

    fn reindent_lines(&mut self, outdent: bool) -> Result<(), CommandError> {
        let style = self.indent_style();
        let (first, last) = self.cursor.line_span();
        self.edit(|doc| {
            for line in first..=last {
                let text = doc.line(line).unwrap_or_default();
                let edit = if outdent {
                    Some(style.outdent_edit(&text))
                } else {
                    style.indent_edit(&text)
                };
                if let Some(edit) = edit.filter(|e| !e.is_noop(&text)) {
                    let start = doc.line_to_char(line);
                    doc.replace(start + edit.start, edit.len, &edit.text)?;
                }
            }
            Ok(())
        })
    }

    fn shift_cursor_lines(&mut self, up: bool) {
        let shift = |p: Position| {
            let line = if up { p.line - 1 } else { p.line + 1 };
            Position::new(line, p.column)
        };
        self.cursor = Cursor::selection(shift(self.cursor.anchor), shift(self.cursor.active));
    }

    /// Swap the cursor or selected lines with the line above. No-op on the first line.
    pub fn move_lines_up(&mut self) -> Result<(), CommandError> {
        let (first, last) = self.cursor.line_span();
        if first == 0 {
            return Ok(());
        }
        let block = self.lines_text(first, last);
        let above = self.lines_text(first - 1, first - 1);
        let start = self.document.line_to_char(first - 1);
        let end = self.document.line_to_char(last) + self.document.line_len(last);

        let cursor = self.cursor;
        let result = self.apply_edit(|doc| doc.replace(start, end - start, &format!("{block}\n{above}")));
        self.cursor = cursor;
        if result.is_ok() {
            self.shift_cursor_lines(true);
        }
        self.update_cursor();
        result
    }

    /// Swap the cursor or selected lines with the line below. No-op on the last line.
    pub fn move_lines_down(&mut self) -> Result<(), CommandError> {
        let (first, last) = self.cursor.line_span();
        if last + 1 >= self.document.line_count() {
            return Ok(());
        }
        let block = self.lines_text(first, last);
        let below = self.lines_text(last + 1, last + 1);
        let start = self.document.line_to_char(first);
        let end = self.document.line_to_char(last + 1) + self.document.line_len(last + 1);

        let cursor = self.cursor;
        let result = self.apply_edit(|doc| doc.replace(start, end - start, &format!("{below}\n{block}")));
        self.cursor = cursor;
        if result.is_ok() {
            self.shift_cursor_lines(false);
        }
        self.update_cursor();
        result
    }

    /// Delete the cursor or selected lines with their line breaks.
    ///
    /// The last line takes the preceding line break with it. The caret lands at the start of
    /// the line that took the place of the first deleted one.
    pub fn delete_lines(&mut self) -> Result<(), CommandError> {
        let (first, last) = self.cursor.line_span();
        let line_count = self.document.line_count();
        let (start, end) = if last + 1 < line_count {
            (
                self.document.line_to_char(first),
                self.document.line_to_char(last + 1),
            )
        } else if first > 0 {
            (
                self.document.line_to_char(first) - 1,
                self.document.char_count(),
            )
        } else {
            (0, self.document.char_count())
        };

        let result = self.apply_edit(|doc| doc.delete(start, end - start));
        let line = first.min(self.document.line_count() - 1);
        self.cursor = Cursor::at(Position::new(line, 0));
        self.update_cursor();
        result
    }

    /// Delete the selected text.
    pub fn delete_selection(&mut self) -> Result<(), CommandError> {
        if !self.cursor.has_selection() {
            return Ok(());
        }
        let (start, end) = self.selection_offsets();
        self.edit(|doc| doc.delete(start, end - start))
    }

    /// Copy the selection, or the caret line with its line break.
    pub fn copy_lines(&self) -> String {
        let (start, end) = self.line_or_selection_range();
        self.document.slice(start, end)
    }

    /// Cut the selection, or the caret line with its line break. Returns the removed text.
    pub fn cut_lines(&mut self) -> Result<String, CommandError> {
        let (start, end) = self.line_or_selection_range();
        let text = self.document.slice(start, end);
        self.edit(|doc| doc.delete(start, end - start))?;
        Ok(text)
    }

    /// Delete the selection, or the character before the caret.
    pub fn backspace(&mut self) -> Result<(), CommandError> {
        if self.cursor.has_selection() {
            return self.delete_selection();
        }
        let caret = self.document.position_to_char_offset(self.cursor.active);
        if caret == 0 {
            return Ok(());
        }
        self.edit(|doc| doc.delete(caret - 1, 1))
    }

    /// Delete the selection, or the character after the caret.
    pub fn delete_forward(&mut self) -> Result<(), CommandError> {
        if self.cursor.has_selection() {
            return self.delete_selection();
        }
        let caret = self.document.position_to_char_offset(self.cursor.active);
        if caret >= self.document.char_count() {
            return Ok(());
        }
        self.edit(|doc| doc.delete(caret, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditorConfig;
    use crate::indent::IndentationMode;
    use pretty_assertions::assert_eq;

    fn editor(text: &str, config: EditorConfig) -> Editor {
        Editor::with_config(text, config).unwrap()
    }

    #[test]
    fn auto_indent_copies_previous_indentation() {
        let config = EditorConfig {
            auto_indent: true,
            ..EditorConfig::default()
        };
        let mut ed = editor("    let x = 1;", config);
        ed.move_to(Position::new(0, 14), false);
        ed.insert_newline().unwrap();
        assert_eq!(ed.text(), "    let x = 1;\n    ");
        assert_eq!(ed.cursor().active, Position::new(1, 4));
    }

    #[test]
    fn auto_indent_clears_whitespace_only_line() {
        let config = EditorConfig {
            auto_indent: true,
            ..EditorConfig::default()
        };
        let mut ed = editor("  a\n  ", config);
        ed.move_to(Position::new(1, 2), false);
        ed.insert_newline().unwrap();
        assert_eq!(ed.text(), "  a\n\n  ");
        assert_eq!(ed.cursor().active, Position::new(2, 2));
    }

    #[test]
    fn auto_indent_stops_at_unindented_text() {
        let config = EditorConfig {
            auto_indent: true,
            ..EditorConfig::default()
        };
        let mut ed = editor("    a\nb", config);
        ed.move_to(Position::new(1, 1), false);
        ed.insert_newline().unwrap();
        assert_eq!(ed.text(), "    a\nb\n");
    }

    #[test]
    fn move_lines_carries_selection() {
        let mut ed = Editor::new("a\nb\nc");
        ed.set_selection(Position::new(1, 0), Position::new(2, 1));
        ed.move_lines_up().unwrap();
        assert_eq!(ed.text(), "b\nc\na");
        assert_eq!(
            ed.cursor(),
            Cursor::selection(Position::new(0, 0), Position::new(1, 1))
        );
        ed.move_lines_up().unwrap();
        assert_eq!(ed.text(), "b\nc\na");
    }

    #[test]
    fn move_line_down_to_end() {
        let mut ed = Editor::new("a\nb\nc");
        ed.move_to(Position::new(1, 1), false);
        ed.move_lines_down().unwrap();
        assert_eq!(ed.text(), "a\nc\nb");
        assert_eq!(ed.cursor().active, Position::new(2, 1));
        ed.move_lines_down().unwrap();
        assert_eq!(ed.text(), "a\nc\nb");
    }

    #[test]
    fn delete_lines_variants() {
        let mut ed = Editor::new("a\nb\nc");
        ed.move_to(Position::new(1, 0), false);
        ed.delete_lines().unwrap();
        assert_eq!(ed.text(), "a\nc");
        ed.move_to(Position::new(1, 1), false);
        ed.delete_lines().unwrap();
        assert_eq!(ed.text(), "a");
        assert_eq!(ed.cursor().active, Position::new(0, 0));
    }

    #[test]
    fn cut_and_copy_whole_line_without_selection() {
        let mut ed = Editor::new("one\ntwo\n");
        ed.move_to(Position::new(0, 2), false);
        assert_eq!(ed.copy_lines(), "one\n");
        assert_eq!(ed.cut_lines().unwrap(), "one\n");
        assert_eq!(ed.text(), "two\n");
    }

    #[test]
    fn tab_in_mixed_mode_rebuilds_whitespace() {
        let config = EditorConfig {
            indentation_mode: IndentationMode::Mixed,
            tab_width: 8,
            indent_width: 4,
            ..EditorConfig::default()
        };
        let mut ed = editor("    x", config);
        ed.move_to(Position::new(0, 4), false);
        ed.tab().unwrap();
        assert_eq!(ed.text(), "\tx");
        assert_eq!(ed.cursor().active, Position::new(0, 1));
    }

    #[test]
    fn indent_selection_skips_excluded_last_line() {
        let mut ed = Editor::new("a\n\nb\nc");
        ed.set_selection(Position::new(0, 0), Position::new(3, 0));
        ed.tab().unwrap();
        assert_eq!(ed.text(), "    a\n\n    b\nc");
        ed.outdent_lines().unwrap();
        assert_eq!(ed.text(), "a\n\nb\nc");
    }

    #[test]
    fn backspace_joins_lines() {
        let mut ed = Editor::new("ab\ncd");
        ed.move_to(Position::new(1, 0), false);
        ed.backspace().unwrap();
        assert_eq!(ed.text(), "abcd");
        assert_eq!(ed.cursor().active, Position::new(0, 2));
    }
}
