//! Indentation engine.
//!
//! Pure, line-level computations used by the editor's indent/outdent, smart Tab and
//! auto-indent operations. Widths are visual columns (see [`crate::metrics`]).

use crate::metrics::{cell_width_at, column_of, leading_indentation};
use serde::{Deserialize, Serialize};

/// Policy for representing indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndentationMode {
    /// Indent with spaces only.
    #[default]
    Spaces,
    /// Indent with tabs; one indent step is one tab.
    Tabs,
    /// Indent steps of `indent_width`, written as tabs followed by spaces.
    Mixed,
}

/// Indentation settings bundled for the line computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentStyle {
    /// Representation policy.
    pub mode: IndentationMode,
    /// Tab stop distance in columns.
    pub tab_width: usize,
    /// Indent step in columns (`Spaces` and `Mixed`).
    pub indent_width: usize,
}

/// A replacement inside one line: `len` characters at `start` become `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEdit {
    /// Character offset within the line.
    pub start: usize,
    /// Number of characters replaced.
    pub len: usize,
    /// Replacement text.
    pub text: String,
}

impl LineEdit {
    /// Returns `true` if applying the edit leaves `line_text` unchanged.
    pub fn is_noop(&self, line_text: &str) -> bool {
        line_text
            .chars()
            .skip(self.start)
            .take(self.len)
            .eq(self.text.chars())
            && self.len == self.text.chars().count()
    }

    /// `line_text` with the edit applied.
    pub fn apply(&self, line_text: &str) -> String {
        let mut out: String = line_text.chars().take(self.start).collect();
        out.push_str(&self.text);
        out.extend(line_text.chars().skip(self.start + self.len));
        out
    }
}

impl Default for IndentStyle {
    fn default() -> Self {
        Self {
            mode: IndentationMode::Spaces,
            tab_width: 4,
            indent_width: 4,
        }
    }
}

impl IndentStyle {
    fn tab(&self) -> usize {
        self.tab_width.max(1)
    }

    fn indent(&self) -> usize {
        self.indent_width.max(1)
    }

    /// Width of one indent step.
    pub fn step(&self) -> usize {
        match self.mode {
            IndentationMode::Tabs => self.tab(),
            IndentationMode::Spaces | IndentationMode::Mixed => self.indent(),
        }
    }

    /// Whitespace reaching visual column `width` from column 0.
    pub fn render(&self, width: usize) -> String {
        match self.mode {
            IndentationMode::Spaces => " ".repeat(width),
            IndentationMode::Tabs | IndentationMode::Mixed => {
                let tab = self.tab();
                let mut out = "\t".repeat(width / tab);
                out.push_str(&" ".repeat(width % tab));
                out
            }
        }
    }

    fn reindent(&self, line_text: &str, width: usize) -> LineEdit {
        let (_, first) = leading_indentation(line_text, self.tab());
        LineEdit {
            start: 0,
            len: first,
            text: self.render(width),
        }
    }

    /// Edit replacing the leading whitespace of a line with one more step.
    ///
    /// Empty lines are left alone (`None`).
    pub fn indent_edit(&self, line_text: &str) -> Option<LineEdit> {
        if line_text.is_empty() {
            return None;
        }
        let (width, _) = leading_indentation(line_text, self.tab());
        Some(self.reindent(line_text, width + self.step()))
    }

    /// Edit replacing the leading whitespace of a line with one step less.
    ///
    /// Indentation that would go negative is removed.
    pub fn outdent_edit(&self, line_text: &str) -> LineEdit {
        let (width, _) = leading_indentation(line_text, self.tab());
        self.reindent(line_text, width.saturating_sub(self.step()))
    }

    /// Line text indented by one step. Empty lines are left alone (`None`).
    pub fn indent_line(&self, line_text: &str) -> Option<String> {
        self.indent_edit(line_text).map(|edit| edit.apply(line_text))
    }

    /// Line text outdented by one step.
    pub fn outdent_line(&self, line_text: &str) -> String {
        self.outdent_edit(line_text).apply(line_text)
    }

    /// Edit performed by the Tab key on a caret at character `column` of `line_text`.
    ///
    /// - `Tabs` inserts a tab character.
    /// - `Spaces` inserts spaces up to the next multiple of the indent width.
    /// - `Mixed` rewrites the whitespace run before the caret so that it ends on the next
    ///   indent stop, using a tab whenever the next tab stop does not overshoot it.
    pub fn tab_edit(&self, line_text: &str, column: usize) -> LineEdit {
        let tab = self.tab();
        let indent = self.indent();
        let column = column.min(line_text.chars().count());
        let vpos = column_of(line_text, column, tab);

        match self.mode {
            IndentationMode::Tabs => LineEdit {
                start: column,
                len: 0,
                text: "\t".to_string(),
            },
            IndentationMode::Spaces => LineEdit {
                start: column,
                len: 0,
                text: " ".repeat(indent - vpos % indent),
            },
            IndentationMode::Mixed => {
                let chars: Vec<char> = line_text.chars().collect();
                let mut ws_start = column;
                while ws_start > 0 && matches!(chars[ws_start - 1], ' ' | '\t') {
                    ws_start -= 1;
                }
                let indent_to = vpos + indent - vpos % indent;

                let mut v = column_of(line_text, ws_start, tab);
                let mut text = String::new();
                let align_to = cell_width_at('\t', v, tab);
                if v + align_to <= indent_to {
                    text.push('\t');
                    v += align_to;
                }
                let rest = indent_to - v;
                text.push_str(&"\t".repeat(rest / tab));
                text.push_str(&" ".repeat(rest % tab));

                LineEdit {
                    start: ws_start,
                    len: column - ws_start,
                    text,
                }
            }
        }
    }
}

/// Leading whitespace (spaces and tabs) of a line, as text.
pub fn leading_whitespace(line_text: &str) -> &str {
    let end = line_text
        .char_indices()
        .find(|(_, c)| !matches!(c, ' ' | '\t'))
        .map_or(line_text.len(), |(i, _)| i);
    &line_text[..end]
}
