//! Positions and the edit cursor.

use std::cmp::Ordering;

/// Position coordinates (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the logical line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The edit cursor: an anchor and an active end.
///
/// `anchor == active` means there is no selection. The active end is where the caret is
/// drawn and what cursor movement acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Fixed end of the selection.
    pub anchor: Position,
    /// Moving end of the selection (the caret).
    pub active: Position,
}

impl Cursor {
    /// A caret without selection.
    pub fn at(position: Position) -> Self {
        Self {
            anchor: position,
            active: position,
        }
    }

    /// A selection from `anchor` to `active`.
    pub fn selection(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// Returns `true` if the cursor spans a non-empty selection.
    pub fn has_selection(&self) -> bool {
        self.anchor != self.active
    }

    /// Smaller of the two ends.
    pub fn start(&self) -> Position {
        self.anchor.min(self.active)
    }

    /// Larger of the two ends.
    pub fn end(&self) -> Position {
        self.anchor.max(self.active)
    }

    /// Move the caret to `position`; keeps the anchor when `extend` is set.
    pub fn move_to(&mut self, position: Position, extend: bool) {
        self.active = position;
        if !extend {
            self.anchor = position;
        }
    }

    /// Drop the selection, keeping the caret where it is.
    pub fn clear_selection(&mut self) {
        self.anchor = self.active;
    }

    /// Range of lines touched by the cursor, inclusive on both ends.
    ///
    /// A selection that ends at column 0 of a later line does not include that line.
    pub fn line_span(&self) -> (usize, usize) {
        let start = self.start();
        let end = self.end();
        let last = if self.has_selection() && end.column == 0 && end.line > start.line {
            end.line - 1
        } else {
            end.line
        };
        (start.line, last)
    }
}
