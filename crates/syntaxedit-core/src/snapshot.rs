//! Headless view snapshot.
//!
//! The core does not paint. Instead, [`crate::Editor::snapshot`] describes the visible rows of
//! the view: which logical line each row shows, its margin contents (line number, fold
//! marker), whether a folded-region separator follows it, and where indentation guides go.
//! Decorations overlapping the rows are included so a renderer needs nothing else from the
//! editor to draw a frame.

use crate::decorations::Decoration;
use crate::folding::FoldMarker;
use crate::indent::IndentationMode;
use crate::metrics::cell_width_at;

/// One visible row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLine {
    /// Logical line index.
    pub line: usize,
    /// 1-based line number shown in the margin.
    pub number: usize,
    /// Line text without its line break.
    pub text: String,
    /// The caret is on this line.
    pub is_current: bool,
    /// Marker for the folding margin.
    pub fold_marker: FoldMarker,
    /// The line starts a folded region; a separator is drawn below it.
    pub folded_separator: bool,
    /// Visual columns of the indentation guides.
    pub indent_guides: Vec<usize>,
}

/// Everything needed to render one frame of the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    /// First visible row requested.
    pub first_row: usize,
    /// Total number of visible rows in the document.
    pub visible_rows: usize,
    /// Rows, top to bottom.
    pub lines: Vec<ViewLine>,
    /// Width of the line number margin in columns, when line numbers are shown.
    pub line_number_width: Option<usize>,
    /// Column of the long line edge, when shown.
    pub long_line_edge: Option<usize>,
    /// Highlight the current line.
    pub highlight_current_line: bool,
    /// Draw the folding margin.
    pub show_folding: bool,
    /// Render whitespace characters.
    pub show_whitespace: bool,
    /// Decorations overlapping the rows, in publication order.
    pub decorations: Vec<Decoration>,
}

impl ViewSnapshot {
    /// Row showing logical `line`, if it is part of this snapshot.
    pub fn row_of(&self, line: usize) -> Option<&ViewLine> {
        self.lines.iter().find(|l| l.line == line)
    }
}

/// Width of the line number margin: enough digits for the last line plus one spare column.
pub fn line_number_width(line_count: usize) -> usize {
    let mut max_line = line_count.max(1);
    let mut digits = 1;
    while max_line >= 10 {
        max_line /= 10;
        digits += 1;
    }
    digits + 1
}

/// Distance between two indentation guides.
pub fn guide_width(mode: IndentationMode, tab_width: usize, indent_width: usize) -> usize {
    match mode {
        IndentationMode::Tabs => tab_width.max(1),
        IndentationMode::Spaces | IndentationMode::Mixed => indent_width.max(1),
    }
}

/// Visual columns of the guides drawn on a line.
///
/// Guides sit at every multiple of `guide` inside the leading whitespace, rounded up.
/// Whitespace-only lines count one extra column so blank lines inside an indented block keep
/// their guides. On the caret line, a guide at the caret's column is left out.
pub fn indent_guides(
    line_text: &str,
    tab_width: usize,
    guide: usize,
    caret_column: Option<usize>,
) -> Vec<usize> {
    let guide = guide.max(1);
    let mut ws_column = 0;
    let mut only_spaces = true;
    for ch in line_text.chars() {
        if !ch.is_whitespace() {
            only_spaces = false;
            break;
        }
        ws_column += cell_width_at(ch, ws_column, tab_width);
    }
    if only_spaces {
        ws_column += 1;
    }

    let count = ws_column.div_ceil(guide);
    (1..count)
        .map(|i| guide * i)
        .filter(|&column| caret_column != Some(column))
        .collect()
}
