//! Brace/quote matching.
//!
//! The matcher scans line by line from a bracket towards its partner, keeping a stack of
//! unmatched bracket and quote characters:
//!
//! - a quote pops the stack when the top is the same quote, is ignored when the top is a
//!   different quote, and is pushed otherwise (only one quote context is active at a time)
//! - while a quote is on top of the stack, brackets are literal text
//! - brackets facing the scan direction push; the others pop, and the one that empties the
//!   stack is the partner
//!
//! A close arriving on an empty stack, or reaching the document start/end, means no match.

use crate::cursor::Position;
use crate::document::LineSource;
use syntaxedit_lang::BracketConfig;

/// Result of a successful brace scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BraceMatch {
    /// Position of the partner bracket.
    pub position: Position,
    /// `false` when the partner is located but of a different kind, e.g. `(` and `]`.
    pub is_valid: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

fn scan<L: LineSource + ?Sized>(
    lines: &L,
    from: Position,
    direction: Direction,
    brackets: &BracketConfig,
) -> Option<BraceMatch> {
    let mut stack: Vec<char> = Vec::new();
    let line_count = lines.line_count();
    let mut line = from.line;

    loop {
        let text = lines.line_text(line)?;
        let chars: Vec<char> = text.chars().collect();

        let columns: Box<dyn Iterator<Item = usize>> = match direction {
            Direction::Forward => {
                let first = if line == from.line { from.column } else { 0 };
                Box::new(first.min(chars.len())..chars.len())
            }
            Direction::Backward => {
                let end = if line == from.line {
                    from.column.min(chars.len())
                } else {
                    chars.len()
                };
                Box::new((0..end).rev())
            }
        };

        for column in columns {
            let ch = chars[column];
            let top = stack.last().copied();

            if brackets.is_quote(ch) {
                match top {
                    Some(q) if brackets.is_quote(q) => {
                        if q == ch {
                            stack.pop();
                        }
                    }
                    _ => stack.push(ch),
                }
                continue;
            }
            if top.is_some_and(|q| brackets.is_quote(q)) {
                continue;
            }

            let (pushes, pops) = match direction {
                Direction::Forward => (brackets.is_open(ch), brackets.is_close(ch)),
                Direction::Backward => (brackets.is_close(ch), brackets.is_open(ch)),
            };
            if pushes {
                stack.push(ch);
            } else if pops {
                let popped = stack.pop()?;
                if stack.is_empty() {
                    let is_valid = match direction {
                        Direction::Forward => brackets.pair_matches(popped, ch),
                        Direction::Backward => brackets.pair_matches(ch, popped),
                    };
                    tracing::trace!(line, column, is_valid, "brace partner found");
                    return Some(BraceMatch {
                        position: Position::new(line, column),
                        is_valid,
                    });
                }
            }
        }

        match direction {
            Direction::Forward => {
                line += 1;
                if line >= line_count {
                    return None;
                }
            }
            Direction::Backward => {
                line = line.checked_sub(1)?;
            }
        }
    }
}

/// Scan forward for the partner of the open bracket at `position`.
///
/// The scan starts with the character at `position` itself.
pub fn find_next_brace<L: LineSource + ?Sized>(
    lines: &L,
    position: Position,
    brackets: &BracketConfig,
) -> Option<BraceMatch> {
    scan(lines, position, Direction::Forward, brackets)
}

/// Scan backward for the partner of the close bracket just before `position`.
///
/// The scan starts with the character at `position.column - 1`.
pub fn find_prev_brace<L: LineSource + ?Sized>(
    lines: &L,
    position: Position,
    brackets: &BracketConfig,
) -> Option<BraceMatch> {
    scan(lines, position, Direction::Backward, brackets)
}

/// Match the bracket adjacent to a caret.
///
/// An open bracket right after the caret wins over a close bracket right before it. Returns
/// the adjacent bracket's position together with its partner.
pub fn match_at_cursor<L: LineSource + ?Sized>(
    lines: &L,
    caret: Position,
    brackets: &BracketConfig,
) -> Option<(Position, BraceMatch)> {
    let text = lines.line_text(caret.line)?;
    let after = text.chars().nth(caret.column);
    if after.is_some_and(|c| brackets.is_open(c)) {
        return find_next_brace(lines, caret, brackets).map(|m| (caret, m));
    }

    let before = caret
        .column
        .checked_sub(1)
        .and_then(|column| text.chars().nth(column));
    if before.is_some_and(|c| brackets.is_close(c)) {
        let bracket = Position::new(caret.line, caret.column - 1);
        return find_prev_brace(lines, caret, brackets).map(|m| (bracket, m));
    }
    None
}
