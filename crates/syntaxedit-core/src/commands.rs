//! Command Interface Layer
//!
//! Every editor operation is reachable as a [`Command`] value executed with
//! [`crate::Editor::execute`], which makes scripted frontends and tests independent of key
//! bindings.
//!
//! # Example
//!
//! ```rust
//! use syntaxedit_core::{Command, CursorCommand, EditCommand, Editor, Position};
//!
//! let mut editor = Editor::new("");
//!
//! editor.execute(Command::Edit(EditCommand::Insert {
//!     offset: 0,
//!     text: "fn main() {\n}".to_string(),
//! })).unwrap();
//!
//! editor.execute(Command::Cursor(CursorCommand::GoToLine { line: 2, column: 0 })).unwrap();
//! assert_eq!(editor.cursor().active, Position::new(1, 0));
//! ```

use crate::indent::IndentationMode;
use crate::search::{SearchError, SearchOptions};
use crate::snapshot::ViewSnapshot;
use thiserror::Error;

pub use crate::cursor::Position;

/// Text editing commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Insert text at the specified position
    Insert {
        /// Character offset to insert at.
        offset: usize,
        /// Text to insert.
        text: String,
    },
    /// Delete text in specified range
    Delete {
        /// Character offset of the deletion start.
        start: usize,
        /// Length of the deletion in characters.
        length: usize,
    },
    /// Replace text in specified range
    Replace {
        /// Character offset of the replacement start.
        start: usize,
        /// Length of the replaced range in characters.
        length: usize,
        /// Replacement text.
        text: String,
    },
    /// Replace the selection (or insert at the caret) with typed text.
    InsertText {
        /// Text to insert.
        text: String,
    },
    /// Enter: replace the selection with a line break, auto-indenting when enabled.
    InsertNewline,
    /// Tab: indent the selected lines, or smart-tab at the caret.
    Tab,
    /// Shift+Tab: outdent the cursor or selected lines.
    Backtab,
    /// Indent the cursor or selected lines by one step.
    IndentLines,
    /// Outdent the cursor or selected lines by one step.
    OutdentLines,
    /// Move the cursor or selected lines one line up.
    MoveLinesUp,
    /// Move the cursor or selected lines one line down.
    MoveLinesDown,
    /// Delete the cursor or selected lines, line breaks included.
    DeleteLines,
    /// Delete the selected text.
    DeleteSelection,
    /// Cut the selection, or the current line; returns the removed text.
    CutLines,
    /// Copy the selection, or the current line; returns the text.
    CopyLines,
    /// Delete the selection, or the character before the caret.
    Backspace,
    /// Delete the selection, or the character after the caret.
    DeleteForward,
}

/// Cursor & selection commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorCommand {
    /// Move cursor to the specified position
    MoveTo {
        /// Target logical line index.
        line: usize,
        /// Target column in characters (will be clamped to line length).
        column: usize,
    },
    /// Move cursor relatively
    MoveBy {
        /// Delta in visible lines.
        delta_line: isize,
        /// Delta in columns (characters).
        delta_column: isize,
        /// Keep the anchor and extend the selection.
        extend: bool,
    },
    /// Jump to a 1-based line and visual column.
    GoToLine {
        /// 1-based line number; beyond the document jumps to its end.
        line: usize,
        /// 1-based visual (tab-expanded) column; `0` is the line start.
        column: usize,
    },
    /// Set selection range
    SetSelection {
        /// Fixed end.
        anchor: Position,
        /// Moving end (caret).
        active: Position,
    },
    /// Extend selection range
    ExtendSelection {
        /// New active end position.
        to: Position,
    },
    /// Clear selection
    ClearSelection,
    /// Select whole lines, as when clicking or dragging in the line margin.
    SelectLines {
        /// Line where the click started.
        from: usize,
        /// Line under the pointer.
        to: usize,
    },
    /// Smart Home.
    SmartHome {
        /// Extend the selection.
        extend: bool,
    },
    /// Smart End.
    SmartEnd {
        /// Extend the selection.
        extend: bool,
    },
    /// Find the next occurrence of `query` after the caret and select it.
    FindNext {
        /// Search query.
        query: String,
        /// Search options (case sensitivity, whole-word, regex).
        options: SearchOptions,
    },
    /// Find the previous occurrence of `query` before the selection and select it.
    FindPrev {
        /// Search query.
        query: String,
        /// Search options (case sensitivity, whole-word, regex).
        options: SearchOptions,
    },
}

/// Folding commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldCommand {
    /// Fold the region starting at `line`.
    FoldLine {
        /// Region start line.
        line: usize,
    },
    /// Unfold the region starting at `line`.
    UnfoldLine {
        /// Region start line.
        line: usize,
    },
    /// Toggle the region starting at `line` (folding margin click).
    ToggleFold {
        /// Region start line.
        line: usize,
    },
    /// Fold the innermost region around the caret.
    FoldCurrentLine,
    /// Unfold the region starting at the caret line.
    UnfoldCurrentLine,
    /// Fold every region.
    FoldAll,
    /// Unfold every region.
    UnfoldAll,
}

/// Live search commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCommand {
    /// Highlight every match of `query`; an empty query clears the highlights.
    SetLiveSearch {
        /// Search query.
        query: String,
        /// Search options.
        options: SearchOptions,
    },
    /// Remove the live search highlights.
    ClearLiveSearch,
}

/// Boolean editor options toggled by [`ViewCommand::SetOption`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorOption {
    /// Line number margin.
    ShowLineNumbers,
    /// Folding margin.
    ShowFolding,
    /// Whitespace rendering.
    ShowWhitespace,
    /// Auto-indent on Enter.
    AutoIndent,
    /// Brace match highlighting.
    MatchBraces,
    /// Current line highlighting.
    HighlightCurrentLine,
    /// Long line edge.
    ShowLongLineEdge,
    /// Indent guides.
    ShowIndentGuides,
    /// Forward undo/redo to the host.
    ExternalUndoRedo,
}

/// View commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    /// Set tab width (in columns) used for measuring `'\t'` and tab stops.
    SetTabWidth {
        /// Tab width in columns (must be greater than 0).
        width: usize,
    },
    /// Set the indent step used in `Spaces` and `Mixed` modes.
    SetIndentWidth {
        /// Indent width in columns (must be greater than 0).
        width: usize,
    },
    /// Set the indentation policy.
    SetIndentationMode {
        /// New mode.
        mode: IndentationMode,
    },
    /// Set the long line edge column.
    SetLongLineWidth {
        /// Edge column.
        width: usize,
    },
    /// Toggle a boolean option.
    SetOption {
        /// Option to change.
        option: EditorOption,
        /// New value.
        enabled: bool,
    },
    /// Build a view snapshot.
    GetSnapshot {
        /// First visible row.
        first_row: usize,
        /// Maximum number of rows.
        count: usize,
    },
}

/// Unified command enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text editing commands
    Edit(EditCommand),
    /// Cursor command
    Cursor(CursorCommand),
    /// Folding command
    Fold(FoldCommand),
    /// Live search command
    Search(SearchCommand),
    /// View commands
    View(ViewCommand),
}

/// Command execution result
#[derive(Debug, Clone)]
pub enum CommandResult {
    /// Success, no return value
    Success,
    /// Success, returns text
    Text(String),
    /// Success, returns position
    Position(Position),
    /// Find/search result: a match in char offsets (half-open).
    SearchMatch {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
    },
    /// Find/search result: no match found.
    SearchNotFound,
    /// View snapshot
    Snapshot(ViewSnapshot),
}

/// Command error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Invalid offset
    #[error("invalid offset: {0}")]
    InvalidOffset(usize),
    /// Invalid position
    #[error("invalid position: line {line}, column {column}")]
    InvalidPosition {
        /// Logical line index.
        line: usize,
        /// Column in characters.
        column: usize,
    },
    /// Invalid range
    #[error("invalid range: {start}..{end}")]
    InvalidRange {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
    },
    /// Tab width of zero
    #[error("tab width must be greater than 0")]
    InvalidTabWidth,
    /// Indent width of zero
    #[error("indent width must be greater than 0")]
    InvalidIndentWidth,
    /// No syntax definition with this name
    #[error("unknown syntax definition: {0}")]
    UnknownSyntax(String),
    /// Search query rejected
    #[error(transparent)]
    Search(#[from] SearchError),
}
