//! Line/column metrics.
//!
//! All functions in this module work on a single logical line (no `\n`) and use **character
//! offsets** within that line. A *visual column* counts every character as one cell except
//! `'\t'`, which advances to the next multiple of the tab width.

/// Visual width contributed by `ch` when it starts at visual column `column`.
///
/// A zero tab width is treated as 1.
pub fn cell_width_at(ch: char, column: usize, tab_width: usize) -> usize {
    if ch == '\t' {
        let tab_width = tab_width.max(1);
        tab_width - column % tab_width
    } else {
        1
    }
}

/// Visual column of the character at `offset` in `line_text`.
///
/// Offsets past the end of the line are clamped to the line length.
pub fn column_of(line_text: &str, offset: usize, tab_width: usize) -> usize {
    let mut column = 0usize;
    for ch in line_text.chars().take(offset) {
        column += cell_width_at(ch, column, tab_width);
    }
    column
}

/// Character offset whose visual column is the largest one not greater than `column`.
///
/// This is the left inverse of [`column_of`]: a column that lands inside a tab's span rounds
/// down to the tab itself, and a column beyond the end of the line returns the line length.
pub fn offset_for_column(line_text: &str, column: usize, tab_width: usize) -> usize {
    let mut current = 0usize;
    for (offset, ch) in line_text.chars().enumerate() {
        let next = current + cell_width_at(ch, current, tab_width);
        if next > column {
            return offset;
        }
        current = next;
    }
    line_text.chars().count()
}

/// Total visual width of `text`.
pub fn str_width(text: &str, tab_width: usize) -> usize {
    text.chars()
        .fold(0usize, |column, ch| column + cell_width_at(ch, column, tab_width))
}

/// Leading indentation of a line.
///
/// Returns `(visual_width, first_non_whitespace_offset)`. Only spaces and tabs count as
/// indentation.
pub fn leading_indentation(line_text: &str, tab_width: usize) -> (usize, usize) {
    let mut width = 0usize;
    let mut offset = 0usize;
    for ch in line_text.chars() {
        match ch {
            ' ' | '\t' => width += cell_width_at(ch, width, tab_width),
            _ => break,
        }
        offset += 1;
    }
    (width, offset)
}

/// Number of leading whitespace characters.
pub fn leading_whitespace_len(line_text: &str) -> usize {
    line_text.chars().take_while(|c| c.is_whitespace()).count()
}

/// Number of trailing whitespace characters.
pub fn trailing_whitespace_len(line_text: &str) -> usize {
    line_text.chars().rev().take_while(|c| c.is_whitespace()).count()
}

/// Returns `true` if the line is empty or whitespace-only.
pub fn is_blank(line_text: &str) -> bool {
    line_text.chars().all(char::is_whitespace)
}

/// Character length of `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Character at `offset` in `text`.
pub fn char_at(text: &str, offset: usize) -> Option<char> {
    text.chars().nth(offset)
}
