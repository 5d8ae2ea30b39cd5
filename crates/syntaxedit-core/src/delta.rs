//! Structured text change deltas.
//!
//! Every modification applied through a [`crate::Document`] is recorded as a
//! [`TextDeltaEdit`]. The edits of one outermost transaction are published together as a
//! [`TextDelta`], which is what the orchestrator uses to remap the cursor, re-index per-line
//! state and trigger recomputation of folds, brace matches and search highlights.
//!
//! Offsets are **character offsets** (Unicode scalar values).

/// A single text edit expressed in character offsets.
///
/// Semantics:
/// - `start` is a character offset in the document **at the time this edit is applied**.
/// - `start_line` is the line containing `start` at that time.
/// - The deleted range is defined by the length (in `char`s) of `deleted_text`.
/// - Edits inside a [`TextDelta`] must be applied **in order**.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDeltaEdit {
    /// Start character offset of the edit.
    pub start: usize,
    /// Logical line containing `start` before the edit.
    pub start_line: usize,
    /// Exact deleted text (may be empty).
    pub deleted_text: String,
    /// Exact inserted text (may be empty).
    pub inserted_text: String,
}

impl TextDeltaEdit {
    /// Length of `deleted_text` in characters.
    pub fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    /// Length of `inserted_text` in characters.
    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }

    /// Exclusive end character offset in the pre-edit document.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.deleted_len())
    }

    /// Number of line breaks removed by this edit.
    pub fn removed_lines(&self) -> usize {
        self.deleted_text.matches('\n').count()
    }

    /// Number of line breaks inserted by this edit.
    pub fn added_lines(&self) -> usize {
        self.inserted_text.matches('\n').count()
    }

    /// Map a pre-edit character offset to the post-edit document.
    ///
    /// Offsets before the edit are unchanged. Offsets inside the replaced range (including
    /// its start) move to the end of the inserted text. Offsets after the range shift by the
    /// length difference.
    pub fn map_offset(&self, offset: usize) -> usize {
        let end = self.end();
        if offset < self.start {
            offset
        } else if offset <= end {
            self.start + self.inserted_len()
        } else {
            offset - self.deleted_len() + self.inserted_len()
        }
    }
}

/// A structured description of a document text change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDelta {
    /// Character count before applying `edits`.
    pub before_char_count: usize,
    /// Character count after applying `edits`.
    pub after_char_count: usize,
    /// Ordered list of edits that transforms the "before" document into the "after" document.
    pub edits: Vec<TextDeltaEdit>,
}

impl TextDelta {
    /// Returns `true` if this delta contains no edits.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Map a pre-change offset through every edit, in order.
    pub fn map_offset(&self, offset: usize) -> usize {
        self.edits.iter().fold(offset, |acc, edit| edit.map_offset(acc))
    }

    /// Half-open character range touched by the change, expressed in the final document.
    pub fn affected_range(&self) -> Option<std::ops::Range<usize>> {
        let mut range: Option<std::ops::Range<usize>> = None;
        for edit in &self.edits {
            let mapped = range.map(|r| {
                let start = edit.map_offset(r.start).min(edit.start);
                let end = edit.map_offset(r.end).max(edit.start + edit.inserted_len());
                start..end
            });
            range = Some(mapped.unwrap_or(edit.start..edit.start + edit.inserted_len()));
        }
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(start: usize, deleted: &str, inserted: &str) -> TextDeltaEdit {
        TextDeltaEdit {
            start,
            start_line: 0,
            deleted_text: deleted.to_string(),
            inserted_text: inserted.to_string(),
        }
    }

    #[test]
    fn map_offset_before_inside_after() {
        let e = edit(4, "abc", "xy");
        assert_eq!(e.map_offset(2), 2);
        assert_eq!(e.map_offset(4), 6);
        assert_eq!(e.map_offset(6), 6);
        assert_eq!(e.map_offset(7), 6);
        assert_eq!(e.map_offset(10), 9);
    }

    #[test]
    fn pure_insert_pushes_offsets_at_start() {
        let e = edit(3, "", "\n  ");
        assert_eq!(e.map_offset(2), 2);
        assert_eq!(e.map_offset(3), 6);
        assert_eq!(e.map_offset(5), 8);
        assert_eq!(e.added_lines(), 1);
    }

    #[test]
    fn affected_range_spans_all_edits() {
        let delta = TextDelta {
            before_char_count: 10,
            after_char_count: 12,
            edits: vec![edit(0, "", "  "), edit(6, "", "  ")],
        };
        assert_eq!(delta.affected_range(), Some(0..8));
        assert_eq!(delta.map_offset(5), 9);
    }
}
