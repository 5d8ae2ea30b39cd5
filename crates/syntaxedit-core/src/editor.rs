//! The editor orchestrator.
//!
//! [`Editor`] owns the document, the cursor, the per-line fold state, the line classifier, the
//! live search and the decoration layers, and keeps them consistent:
//!
//! - every text change remaps the cursor, re-indexes the line states, refreshes the classifier
//!   and recomputes the live search, then publishes a `DocumentModified` change with the
//!   [`TextDelta`] of the transaction
//! - every cursor change republishes the brace-match decorations, repairs fold state around the
//!   caret (a hidden caret line is revealed, stale fold marks are healed) and requests a redraw
//!
//! # Example
//!
//! ```rust
//! use syntaxedit_core::{Editor, EditorConfig, Position};
//!
//! let config = EditorConfig { match_braces: true, ..EditorConfig::default() };
//! let mut editor = Editor::with_config("f(a[0])", config).unwrap();
//!
//! editor.move_to(Position::new(0, 1), false);
//! let decorations = editor.decorations();
//! assert_eq!(decorations.len(), 2);
//! assert_eq!(decorations[1].range.start, 6);
//! ```

mod editing;

use crate::brace::match_at_cursor;
use crate::commands::{
    Command, CommandError, CommandResult, CursorCommand, EditCommand, EditorOption, FoldCommand,
    SearchCommand, ViewCommand,
};
use crate::config::{ConfigError, EditorConfig};
use crate::cursor::{Cursor, Position};
use crate::decorations::{
    Decoration, DecorationKind, DecorationLayerId, DecorationRange, DecorationSet,
};
use crate::delta::TextDelta;
use crate::document::Document;
use crate::folding::{FoldMarker, LineClassifier, LineStates, NoFolding};
use crate::indent::{IndentStyle, IndentationMode};
use crate::keymap::{Key, KeyAction, KeyBindings, KeyPress};
use crate::metrics::{leading_whitespace_len, offset_for_column, trailing_whitespace_len};
use crate::search::{LiveSearch, SearchMatch, SearchOptions};
use crate::snapshot::{ViewLine, ViewSnapshot, guide_width, indent_guides, line_number_width};
use crate::state::{ChangeNotifier, RedrawRequest, StateChange, StateChangeType};
use crate::syntax::{PLAIN_TEXT, SyntaxDefinition, SyntaxRepository};
use std::ops::RangeInclusive;
use syntaxedit_lang::BracketConfig;

/// Request the editor cannot fulfil itself and hands to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    /// Undo the last edit transaction.
    Undo,
    /// Redo the last undone transaction.
    Redo,
    /// Scroll the view one line up without moving the caret.
    ScrollLineUp,
    /// Scroll the view one line down without moving the caret.
    ScrollLineDown,
}

/// Result of [`Editor::handle_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key press was consumed.
    Handled,
    /// Text to put on the clipboard (cut or copy).
    Clipboard(String),
    /// The host should act.
    Host(HostRequest),
    /// The key press is not an editor command.
    Unhandled,
}

/// Headless source editor.
pub struct Editor {
    document: Document,
    cursor: Cursor,
    reported_cursor: Cursor,
    line_states: LineStates,
    classifier: Box<dyn LineClassifier>,
    brackets: BracketConfig,
    syntax_name: String,
    config: EditorConfig,
    key_bindings: KeyBindings,
    live_search: LiveSearch,
    decorations: DecorationSet,
    notifier: ChangeNotifier,
    redraw: RedrawRequest,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("document", &self.document)
            .field("cursor", &self.cursor)
            .field("syntax_name", &self.syntax_name)
            .field("config", &self.config)
            .field("version", &self.notifier.version())
            .finish_non_exhaustive()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new("")
    }
}

impl Editor {
    /// Create an editor over `text` with the default configuration and plain-text syntax.
    pub fn new(text: &str) -> Self {
        let document = Document::new(text);
        let line_states = LineStates::new(document.line_count());
        Self {
            document,
            cursor: Cursor::default(),
            reported_cursor: Cursor::default(),
            line_states,
            classifier: Box::new(NoFolding),
            brackets: BracketConfig::default(),
            syntax_name: PLAIN_TEXT.to_string(),
            config: EditorConfig::default(),
            key_bindings: KeyBindings::new(),
            live_search: LiveSearch::new(),
            decorations: DecorationSet::new(),
            notifier: ChangeNotifier::default(),
            redraw: RedrawRequest::default(),
        }
    }

    /// Create an editor with a validated configuration.
    pub fn with_config(text: &str, config: EditorConfig) -> Result<Self, ConfigError> {
        let mut editor = Self::new(text);
        editor.set_config(config)?;
        Ok(editor)
    }

    // ----- queries -----

    /// The document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Full text.
    pub fn text(&self) -> String {
        self.document.text()
    }

    /// Text of `line`, without its line break.
    pub fn line_text(&self, line: usize) -> Option<String> {
        self.document.line(line)
    }

    /// Number of logical lines.
    pub fn line_count(&self) -> usize {
        self.document.line_count()
    }

    /// The cursor.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Text covered by the selection (empty without one).
    pub fn selected_text(&self) -> String {
        let start = self.document.position_to_char_offset(self.cursor.start());
        let end = self.document.position_to_char_offset(self.cursor.end());
        self.document.slice(start, end)
    }

    /// Per-line fold and visibility state.
    pub fn line_states(&self) -> &LineStates {
        &self.line_states
    }

    /// The active line classifier.
    pub fn classifier(&self) -> &dyn LineClassifier {
        self.classifier.as_ref()
    }

    /// Bracket configuration used for brace matching.
    pub fn brackets(&self) -> &BracketConfig {
        &self.brackets
    }

    /// Name of the active syntax definition.
    pub fn syntax_name(&self) -> &str {
        &self.syntax_name
    }

    /// Current configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Active key bindings.
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Version counter, bumped by every published change.
    pub fn version(&self) -> u64 {
        self.notifier.version()
    }

    /// The live search state.
    pub fn live_search(&self) -> &LiveSearch {
        &self.live_search
    }

    /// Published decorations: brace-match entries first, then live search entries.
    pub fn decorations(&self) -> Vec<Decoration> {
        self.decorations.published()
    }

    /// Number of lines not hidden by folds.
    pub fn visible_line_count(&self) -> usize {
        self.line_states.visible_line_count()
    }

    /// Lines highlighted while hovering the fold marker of `line`.
    pub fn fold_extent(&self, line: usize) -> Option<RangeInclusive<usize>> {
        self.line_states.fold_extent(line, self.classifier.as_ref())
    }

    /// Register a change callback.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&StateChange) + 'static,
    {
        self.notifier.subscribe(Box::new(callback));
    }

    /// Take the accumulated redraw request.
    pub fn take_redraw_request(&mut self) -> RedrawRequest {
        std::mem::take(&mut self.redraw)
    }

    fn indent_style(&self) -> IndentStyle {
        self.config.indent_style()
    }

    // ----- command dispatch -----

    /// Execute a command.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        match command {
            Command::Edit(edit) => self.execute_edit(edit),
            Command::Cursor(cursor) => self.execute_cursor(cursor),
            Command::Fold(fold) => {
                self.execute_fold(fold);
                Ok(CommandResult::Success)
            }
            Command::Search(search) => self.execute_search(search),
            Command::View(view) => self.execute_view(view),
        }
    }

    /// Execute commands in order, stopping at the first error.
    pub fn execute_batch(
        &mut self,
        commands: impl IntoIterator<Item = Command>,
    ) -> Result<Vec<CommandResult>, CommandError> {
        commands
            .into_iter()
            .map(|command| self.execute(command))
            .collect()
    }

    fn execute_edit(&mut self, command: EditCommand) -> Result<CommandResult, CommandError> {
        match command {
            EditCommand::Insert { offset, text } => self.insert(offset, &text)?,
            EditCommand::Delete { start, length } => self.delete(start, length)?,
            EditCommand::Replace {
                start,
                length,
                text,
            } => self.replace(start, length, &text)?,
            EditCommand::InsertText { text } => self.insert_text(&text)?,
            EditCommand::InsertNewline => self.insert_newline()?,
            EditCommand::Tab => self.tab()?,
            EditCommand::Backtab | EditCommand::OutdentLines => self.outdent_lines()?,
            EditCommand::IndentLines => self.indent_lines()?,
            EditCommand::MoveLinesUp => self.move_lines_up()?,
            EditCommand::MoveLinesDown => self.move_lines_down()?,
            EditCommand::DeleteLines => self.delete_lines()?,
            EditCommand::DeleteSelection => self.delete_selection()?,
            EditCommand::CutLines => return self.cut_lines().map(CommandResult::Text),
            EditCommand::CopyLines => return Ok(CommandResult::Text(self.copy_lines())),
            EditCommand::Backspace => self.backspace()?,
            EditCommand::DeleteForward => self.delete_forward()?,
        }
        Ok(CommandResult::Success)
    }

    fn execute_cursor(&mut self, command: CursorCommand) -> Result<CommandResult, CommandError> {
        match command {
            CursorCommand::MoveTo { line, column } => {
                self.move_to(Position::new(line, column), false)
            }
            CursorCommand::MoveBy {
                delta_line,
                delta_column,
                extend,
            } => self.move_by(delta_line, delta_column, extend),
            CursorCommand::GoToLine { line, column } => self.go_to_line(line, column),
            CursorCommand::SetSelection { anchor, active } => self.set_selection(anchor, active),
            CursorCommand::ExtendSelection { to } => self.move_to(to, true),
            CursorCommand::ClearSelection => {
                self.cursor.clear_selection();
                self.update_cursor();
            }
            CursorCommand::SelectLines { from, to } => self.select_lines(from, to),
            CursorCommand::SmartHome { extend } => self.smart_home(extend),
            CursorCommand::SmartEnd { extend } => self.smart_end(extend),
            CursorCommand::FindNext { query, options } => {
                return Ok(search_result(self.find_next(&query, options)?));
            }
            CursorCommand::FindPrev { query, options } => {
                return Ok(search_result(self.find_prev(&query, options)?));
            }
        }
        Ok(CommandResult::Position(self.cursor.active))
    }

    fn execute_fold(&mut self, command: FoldCommand) {
        match command {
            FoldCommand::FoldLine { line } => self.fold_line(line),
            FoldCommand::UnfoldLine { line } => self.unfold_line(line),
            FoldCommand::ToggleFold { line } => self.toggle_fold(line),
            FoldCommand::FoldCurrentLine => self.fold_current_line(),
            FoldCommand::UnfoldCurrentLine => self.unfold_current_line(),
            FoldCommand::FoldAll => self.fold_all(),
            FoldCommand::UnfoldAll => self.unfold_all(),
        }
    }

    fn execute_search(&mut self, command: SearchCommand) -> Result<CommandResult, CommandError> {
        match command {
            SearchCommand::SetLiveSearch { query, options } => {
                self.set_live_search(&query, options)?
            }
            SearchCommand::ClearLiveSearch => self.clear_live_search(),
        }
        Ok(CommandResult::Success)
    }

    fn execute_view(&mut self, command: ViewCommand) -> Result<CommandResult, CommandError> {
        match command {
            ViewCommand::SetTabWidth { width } => self.set_tab_width(width)?,
            ViewCommand::SetIndentWidth { width } => self.set_indent_width(width)?,
            ViewCommand::SetIndentationMode { mode } => self.set_indentation_mode(mode),
            ViewCommand::SetLongLineWidth { width } => self.set_long_line_width(width),
            ViewCommand::SetOption { option, enabled } => self.set_option(option, enabled),
            ViewCommand::GetSnapshot { first_row, count } => {
                return Ok(CommandResult::Snapshot(self.snapshot(first_row, count)));
            }
        }
        Ok(CommandResult::Success)
    }

    // ----- key dispatch -----

    /// Resolve a key press through the binding table and run the bound action.
    pub fn handle_key(&mut self, press: KeyPress) -> Result<KeyOutcome, CommandError> {
        let action = self.key_bindings.lookup(press, self.cursor.has_selection());
        tracing::trace!(?press, ?action, "key press");

        match action {
            KeyAction::IndentSelection => self.indent_lines()?,
            KeyAction::OutdentSelection => self.outdent_lines()?,
            KeyAction::SmartTab => self.tab()?,
            KeyAction::SmartHome => self.smart_home(false),
            KeyAction::SmartHomeExtend => self.smart_home(true),
            KeyAction::SmartEnd => self.smart_end(false),
            KeyAction::SmartEndExtend => self.smart_end(true),
            KeyAction::Newline => self.insert_newline()?,
            KeyAction::CutLines => return self.cut_lines().map(KeyOutcome::Clipboard),
            KeyAction::CopyLines => return Ok(KeyOutcome::Clipboard(self.copy_lines())),
            KeyAction::DeleteLines => self.delete_lines()?,
            KeyAction::DeleteSelection => self.delete_selection()?,
            KeyAction::MoveLinesUp => self.move_lines_up()?,
            KeyAction::MoveLinesDown => self.move_lines_down()?,
            KeyAction::ScrollLineUp => return Ok(KeyOutcome::Host(HostRequest::ScrollLineUp)),
            KeyAction::ScrollLineDown => {
                return Ok(KeyOutcome::Host(HostRequest::ScrollLineDown));
            }
            KeyAction::Undo | KeyAction::Redo if !self.config.external_undo_redo => {
                return Ok(KeyOutcome::Unhandled);
            }
            KeyAction::Undo => return Ok(KeyOutcome::Host(HostRequest::Undo)),
            KeyAction::Redo => return Ok(KeyOutcome::Host(HostRequest::Redo)),
            KeyAction::FoldCurrentLine => self.fold_current_line(),
            KeyAction::UnfoldCurrentLine => self.unfold_current_line(),
            KeyAction::FoldAll => self.fold_all(),
            KeyAction::UnfoldAll => self.unfold_all(),
            KeyAction::Backspace => self.backspace()?,
            KeyAction::DeleteForward => self.delete_forward()?,
            KeyAction::DefaultEdit => return self.default_edit(press),
        }
        Ok(KeyOutcome::Handled)
    }

    fn default_edit(&mut self, press: KeyPress) -> Result<KeyOutcome, CommandError> {
        let modifiers = press.modifiers;
        if modifiers.ctrl || modifiers.alt {
            return Ok(KeyOutcome::Unhandled);
        }
        let extend = modifiers.shift;
        match press.key {
            Key::Char(ch) => {
                let mut buf = [0u8; 4];
                self.insert_text(ch.encode_utf8(&mut buf))?;
            }
            Key::Left => self.move_by(0, -1, extend),
            Key::Right => self.move_by(0, 1, extend),
            Key::Up => self.move_by(-1, 0, extend),
            Key::Down => self.move_by(1, 0, extend),
            _ => return Ok(KeyOutcome::Unhandled),
        }
        Ok(KeyOutcome::Handled)
    }

    // ----- configuration -----

    /// Replace the configuration.
    pub fn set_config(&mut self, config: EditorConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.key_bindings = config.key_bindings()?;
        self.config = config;
        self.config_changed();
        self.update_cursor();
        Ok(())
    }

    /// Set the tab width.
    pub fn set_tab_width(&mut self, width: usize) -> Result<(), CommandError> {
        if width == 0 {
            return Err(CommandError::InvalidTabWidth);
        }
        self.config.tab_width = width;
        self.config_changed();
        Ok(())
    }

    /// Set the indent width.
    pub fn set_indent_width(&mut self, width: usize) -> Result<(), CommandError> {
        if width == 0 {
            return Err(CommandError::InvalidIndentWidth);
        }
        self.config.indent_width = width;
        self.config_changed();
        Ok(())
    }

    /// Set the indentation mode.
    pub fn set_indentation_mode(&mut self, mode: IndentationMode) {
        self.config.indentation_mode = mode;
        self.config_changed();
    }

    /// Set the long line edge column.
    pub fn set_long_line_width(&mut self, width: usize) {
        self.config.long_line_width = width;
        self.config_changed();
    }

    /// Toggle a boolean option.
    pub fn set_option(&mut self, option: EditorOption, enabled: bool) {
        let slot = match option {
            EditorOption::ShowLineNumbers => &mut self.config.show_line_numbers,
            EditorOption::ShowFolding => &mut self.config.show_folding,
            EditorOption::ShowWhitespace => &mut self.config.show_whitespace,
            EditorOption::AutoIndent => &mut self.config.auto_indent,
            EditorOption::MatchBraces => &mut self.config.match_braces,
            EditorOption::HighlightCurrentLine => &mut self.config.highlight_current_line,
            EditorOption::ShowLongLineEdge => &mut self.config.show_long_line_edge,
            EditorOption::ShowIndentGuides => &mut self.config.show_indent_guides,
            EditorOption::ExternalUndoRedo => &mut self.config.external_undo_redo,
        };
        if *slot == enabled {
            return;
        }
        *slot = enabled;
        self.config_changed();
        if option == EditorOption::MatchBraces {
            self.update_cursor();
        }
    }

    fn config_changed(&mut self) {
        self.notifier.notify(StateChangeType::ConfigChanged);
        self.redraw.merge(RedrawRequest {
            viewport: true,
            line_margin: true,
            layout: true,
        });
    }

    // ----- syntax -----

    /// Install the definition named `name` from `repository`.
    pub fn set_syntax(
        &mut self,
        repository: &SyntaxRepository,
        name: &str,
    ) -> Result<(), CommandError> {
        let definition = repository
            .get(name)
            .ok_or_else(|| CommandError::UnknownSyntax(name.to_string()))?;
        self.set_syntax_definition(definition);
        Ok(())
    }

    /// Install a syntax definition: its brackets and a fresh classifier.
    pub fn set_syntax_definition(&mut self, definition: &SyntaxDefinition) {
        self.syntax_name = definition.name().to_string();
        self.brackets = definition.brackets().clone();
        self.set_classifier(definition.create_classifier());
    }

    /// Replace the line classifier. All folds are dropped.
    pub fn set_classifier(&mut self, mut classifier: Box<dyn LineClassifier>) {
        classifier.update(&self.document, None);
        self.classifier = classifier;
        self.line_states = LineStates::new(self.document.line_count());
        tracing::debug!(syntax = %self.syntax_name, "line classifier installed");
        self.notifier.notify(StateChangeType::SyntaxChanged);
        self.folding_changed();
        self.update_cursor();
    }

    // ----- text change pipeline -----

    /// Run `f` as one edit transaction and process the resulting change.
    ///
    /// The cursor is remapped through the change; an error returned by `f` is passed through
    /// after the edits that did happen were processed.
    pub fn edit<R>(
        &mut self,
        f: impl FnOnce(&mut Document) -> Result<R, CommandError>,
    ) -> Result<R, CommandError> {
        let result = self.apply_edit(f);
        self.update_cursor();
        result
    }

    fn apply_edit<R>(
        &mut self,
        f: impl FnOnce(&mut Document) -> Result<R, CommandError>,
    ) -> Result<R, CommandError> {
        let anchor = self.document.position_to_char_offset(self.cursor.anchor);
        let active = self.document.position_to_char_offset(self.cursor.active);
        let (result, delta) = self.document.transaction(f);
        if let Some(delta) = delta {
            self.cursor = Cursor::selection(
                self.document.char_offset_to_position(delta.map_offset(anchor)),
                self.document.char_offset_to_position(delta.map_offset(active)),
            );
            self.text_changed(delta);
        }
        result
    }

    fn text_changed(&mut self, delta: TextDelta) {
        let line_count = self.document.line_count();
        let lines_changed = self.line_states.len() != line_count;
        self.line_states.apply_delta(&delta, line_count);
        self.classifier.update(&self.document, Some(&delta));
        if self.live_search.is_active() {
            self.live_search.recompute(&self.document.text());
            self.publish_search_results();
        }
        self.notifier.notify_text(delta);
        self.redraw.merge(RedrawRequest {
            viewport: true,
            line_margin: true,
            layout: lines_changed,
        });
    }

    /// Replace the whole text. Folds are dropped and the caret returns to the start.
    pub fn set_text(&mut self, text: &str) -> Result<(), CommandError> {
        let len = self.document.char_count();
        self.apply_edit(|doc| doc.replace(0, len, text))?;
        self.line_states = LineStates::new(self.document.line_count());
        self.cursor = Cursor::default();
        self.folding_changed();
        self.update_cursor();
        Ok(())
    }

    // ----- cursor -----

    /// Move the caret; `extend` keeps the anchor.
    pub fn move_to(&mut self, position: Position, extend: bool) {
        let position = self.document.clamp_position(position);
        self.cursor.move_to(position, extend);
        self.update_cursor();
    }

    /// Set the selection.
    pub fn set_selection(&mut self, anchor: Position, active: Position) {
        self.cursor = Cursor::selection(
            self.document.clamp_position(anchor),
            self.document.clamp_position(active),
        );
        self.update_cursor();
    }

    /// Move by characters and then by visible lines.
    ///
    /// Column moves cross line breaks. Line moves skip lines hidden by folds and keep the
    /// column where the target line is long enough. A caret with a selection and no `extend`
    /// collapses to the selection edge in the direction of the move.
    pub fn move_by(&mut self, delta_line: isize, delta_column: isize, extend: bool) {
        let mut position = self.cursor.active;
        if !extend && self.cursor.has_selection() && delta_line == 0 && delta_column != 0 {
            position = if delta_column < 0 {
                self.cursor.start()
            } else {
                self.cursor.end()
            };
            self.cursor.move_to(position, false);
            self.update_cursor();
            return;
        }

        if delta_column != 0 {
            let offset = self.document.position_to_char_offset(position);
            let target = offset
                .saturating_add_signed(delta_column)
                .min(self.document.char_count());
            position = self.document.char_offset_to_position(target);
        }

        let mut line = position.line;
        for _ in 0..delta_line.unsigned_abs() {
            let next = if delta_line < 0 {
                line.checked_sub(1)
                    .and_then(|l| self.line_states.previous_visible_line(l))
            } else {
                self.line_states.next_visible_line(line + 1)
            };
            match next {
                Some(next) => line = next,
                None => break,
            }
        }
        position = self
            .document
            .clamp_position(Position::new(line, position.column));

        self.cursor.move_to(position, extend);
        self.update_cursor();
    }

    /// Jump to a 1-based line number and 1-based visual column.
    ///
    /// Line numbers past the document move to its end. A column of `0` is the line start;
    /// other columns are tab-expanded and rounded down to a character boundary.
    pub fn go_to_line(&mut self, line: usize, column: usize) {
        let Some(index) = line.checked_sub(1) else {
            self.move_to(Position::new(0, 0), false);
            return;
        };
        if index >= self.document.line_count() {
            self.move_to(self.document.end_position(), false);
            return;
        }
        let text = self.document.line(index).unwrap_or_default();
        let offset = match column {
            0 => 0,
            column => offset_for_column(&text, column - 1, self.config.tab_width),
        };
        self.move_to(Position::new(index, offset), false);
    }

    /// Select whole lines from `from` through `to`, as a line margin click and drag does.
    pub fn select_lines(&mut self, from: usize, to: usize) {
        let line_start = |editor: &Self, line: usize| {
            if line >= editor.document.line_count() {
                editor.document.end_position()
            } else {
                Position::new(line, 0)
            }
        };
        let (anchor, active) = if to >= from {
            (line_start(self, from), line_start(self, to + 1))
        } else {
            (line_start(self, from + 1), line_start(self, to))
        };
        self.set_selection(anchor, active);
    }

    /// Smart Home: first non-whitespace character, or column 0 when already there.
    pub fn smart_home(&mut self, extend: bool) {
        let caret = self.cursor.active;
        let text = self.document.line(caret.line).unwrap_or_default();
        let leading = leading_whitespace_len(&text);
        let column = if caret.column == leading { 0 } else { leading };
        self.move_to(Position::new(caret.line, column), extend);
    }

    /// Smart End: end of line, or the start of trailing whitespace when already there.
    pub fn smart_end(&mut self, extend: bool) {
        let caret = self.cursor.active;
        let text = self.document.line(caret.line).unwrap_or_default();
        let len = self.document.line_len(caret.line);
        let column = if caret.column == len {
            len - trailing_whitespace_len(&text)
        } else {
            len
        };
        self.move_to(Position::new(caret.line, column), extend);
    }

    /// Select the next match of `query` after the selection.
    pub fn find_next(
        &mut self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Option<SearchMatch>, CommandError> {
        let from = self.document.position_to_char_offset(self.cursor.end());
        let found = crate::search::find_next(&self.document.text(), query, options, from)?;
        if let Some(m) = found {
            self.select_match(m);
        }
        Ok(found)
    }

    /// Select the previous match of `query` before the selection.
    pub fn find_prev(
        &mut self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Option<SearchMatch>, CommandError> {
        let from = self.document.position_to_char_offset(self.cursor.start());
        let found = crate::search::find_prev(&self.document.text(), query, options, from)?;
        if let Some(m) = found {
            self.select_match(m);
        }
        Ok(found)
    }

    fn select_match(&mut self, m: SearchMatch) {
        let anchor = self.document.char_offset_to_position(m.start);
        let active = self.document.char_offset_to_position(m.end);
        self.set_selection(anchor, active);
    }

    /// Refresh decorations and fold state after the cursor or the text changed.
    fn update_cursor(&mut self) {
        self.cursor = Cursor::selection(
            self.document.clamp_position(self.cursor.anchor),
            self.document.clamp_position(self.cursor.active),
        );

        let braces = self.brace_decorations();
        if self
            .decorations
            .set_layer(DecorationLayerId::BRACE_MATCH, braces)
        {
            self.notifier.notify(StateChangeType::DecorationsChanged);
        }

        if self.repair_folds_at_cursor() {
            self.folding_changed();
        }

        if self.cursor.active != self.reported_cursor.active {
            self.notifier.notify(StateChangeType::CursorMoved);
        }
        if (self.cursor.has_selection() || self.reported_cursor.has_selection())
            && self.cursor != self.reported_cursor
        {
            self.notifier.notify(StateChangeType::SelectionChanged);
        }
        self.reported_cursor = self.cursor;

        self.redraw.merge(RedrawRequest {
            viewport: true,
            line_margin: true,
            layout: false,
        });
    }

    fn brace_decorations(&self) -> Vec<Decoration> {
        if !self.config.match_braces {
            return Vec::new();
        }
        let Some((bracket, found)) =
            match_at_cursor(&self.document, self.cursor.active, &self.brackets)
        else {
            return Vec::new();
        };
        let kind = if found.is_valid {
            DecorationKind::BraceMatch
        } else {
            DecorationKind::BraceMismatch
        };
        [bracket, found.position]
            .into_iter()
            .map(|position| {
                let start = self.document.position_to_char_offset(position);
                Decoration::new(DecorationRange::new(start, start + 1), kind)
            })
            .collect()
    }

    /// Keep the caret line visible and its neighbours' fold marks truthful.
    fn repair_folds_at_cursor(&mut self) -> bool {
        let line = self.cursor.active.line;
        let classifier = self.classifier.as_ref();
        let mut changed = false;

        if !self.line_states.is_visible(line) {
            let ancestors: Vec<usize> = (0..line)
                .rev()
                .filter(|&start| {
                    self.line_states.is_folded(start) && classifier.fold_contains(start, line)
                })
                .collect();
            for start in ancestors.into_iter().rev() {
                self.line_states.unfold_block(start, classifier);
            }
            self.line_states.set_visible(line, true);
            changed = true;
        }

        if let Some(previous) = line.checked_sub(1) {
            if self.line_states.is_folded(previous) {
                if classifier.is_foldable(previous) {
                    self.line_states.unfold_block(previous, classifier);
                } else {
                    self.line_states.set_folded(previous, false);
                }
                changed = true;
            }
        }

        let next_hidden = line + 1 < self.line_states.len() && !self.line_states.is_visible(line + 1);
        if self.line_states.is_folded(line) != next_hidden {
            self.line_states.set_folded(line, next_hidden);
            changed = true;
        }
        changed
    }

    // ----- folding -----

    fn folding_changed(&mut self) {
        self.notifier.notify(StateChangeType::FoldingChanged);
        self.redraw.merge(RedrawRequest {
            viewport: true,
            line_margin: true,
            layout: true,
        });
    }

    fn caret_to_line_start_if_hidden(&mut self, line: usize) {
        if !self.line_states.is_visible(self.cursor.active.line) {
            self.cursor = Cursor::at(Position::new(line, 0));
        }
    }

    /// Fold the region starting at `line`.
    pub fn fold_line(&mut self, line: usize) {
        if self.line_states.fold_block(line, self.classifier.as_ref()) {
            self.caret_to_line_start_if_hidden(line);
            self.folding_changed();
            self.update_cursor();
        }
    }

    /// Unfold the region starting at `line`.
    pub fn unfold_line(&mut self, line: usize) {
        if self.line_states.is_folded(line) {
            self.line_states.unfold_block(line, self.classifier.as_ref());
            self.folding_changed();
            self.update_cursor();
        }
    }

    /// Toggle the region starting at `line`; the caret moves to `line` if it became hidden.
    pub fn toggle_fold(&mut self, line: usize) {
        if !self.classifier.is_foldable(line) {
            return;
        }
        if self.line_states.is_folded(line) {
            self.unfold_line(line);
        } else {
            self.fold_line(line);
        }
    }

    /// Fold the innermost region containing the caret line.
    pub fn fold_current_line(&mut self) {
        let line = self.cursor.active.line;
        let Some(start) = (0..=line)
            .rev()
            .find(|&start| self.classifier.fold_contains(start, line))
        else {
            return;
        };
        if self.line_states.is_folded(start) {
            return;
        }
        self.line_states.fold_block(start, self.classifier.as_ref());
        if start != line {
            self.cursor = Cursor::at(Position::new(start, 0));
        }
        self.folding_changed();
        self.update_cursor();
    }

    /// Unfold the caret line when it starts a folded region.
    pub fn unfold_current_line(&mut self) {
        let line = self.cursor.active.line;
        if self.classifier.is_foldable(line) && self.line_states.is_folded(line) {
            self.line_states.unfold_block(line, self.classifier.as_ref());
            self.folding_changed();
            self.update_cursor();
        }
    }

    /// Fold every region; the caret moves to the start of the nearest visible line above.
    pub fn fold_all(&mut self) {
        self.line_states.fold_all(self.classifier.as_ref());
        if let Some(line) = self
            .line_states
            .previous_visible_line(self.cursor.active.line)
        {
            self.cursor = Cursor::at(Position::new(line, 0));
        }
        self.folding_changed();
        self.update_cursor();
    }

    /// Clear every fold.
    pub fn unfold_all(&mut self) {
        self.line_states.unfold_all();
        self.folding_changed();
        self.update_cursor();
    }

    // ----- live search -----

    /// Highlight every match of `query`. An empty query clears the highlights.
    pub fn set_live_search(
        &mut self,
        query: &str,
        options: SearchOptions,
    ) -> Result<(), CommandError> {
        self.live_search
            .set_query(&self.document.text(), query, options)?;
        self.publish_search_results();
        Ok(())
    }

    /// Remove the live search highlights.
    pub fn clear_live_search(&mut self) {
        self.live_search.clear();
        self.publish_search_results();
    }

    fn publish_search_results(&mut self) {
        let decorations = self
            .live_search
            .results()
            .iter()
            .map(|m| {
                Decoration::new(
                    DecorationRange::new(m.start, m.end),
                    DecorationKind::SearchMatch,
                )
            })
            .collect();
        if self
            .decorations
            .set_layer(DecorationLayerId::SEARCH_RESULTS, decorations)
        {
            self.notifier.notify(StateChangeType::DecorationsChanged);
            self.redraw.viewport = true;
        }
    }

    // ----- view -----

    /// Describe up to `count` visible rows starting at visible row `first_row`.
    pub fn snapshot(&self, first_row: usize, count: usize) -> ViewSnapshot {
        let config = &self.config;
        let classifier = self.classifier.as_ref();
        let caret = self.cursor.active;
        let guide = guide_width(config.indentation_mode, config.tab_width, config.indent_width);

        let lines: Vec<ViewLine> = self
            .line_states
            .visible_lines()
            .skip(first_row)
            .take(count)
            .map(|line| {
                let text = self.document.line(line).unwrap_or_default();
                let is_current = line == caret.line;
                let fold_marker = self.line_states.fold_marker(line, classifier);
                let guides = if config.show_indent_guides {
                    indent_guides(
                        &text,
                        config.tab_width,
                        guide,
                        is_current.then_some(caret.column),
                    )
                } else {
                    Vec::new()
                };
                ViewLine {
                    line,
                    number: line + 1,
                    text,
                    is_current,
                    fold_marker,
                    folded_separator: fold_marker == FoldMarker::Folded,
                    indent_guides: guides,
                }
            })
            .collect();

        let decorations = match (lines.first(), lines.last()) {
            (Some(first), Some(last)) => {
                let start = self.document.line_to_char(first.line);
                let end = self.document.line_to_char(last.line) + self.document.line_len(last.line);
                self.decorations
                    .published()
                    .into_iter()
                    .filter(|d| d.range.start <= end && d.range.end >= start)
                    .collect()
            }
            _ => Vec::new(),
        };

        ViewSnapshot {
            first_row,
            visible_rows: self.line_states.visible_line_count(),
            lines,
            line_number_width: config
                .show_line_numbers
                .then(|| line_number_width(self.document.line_count())),
            long_line_edge: (config.show_long_line_edge && config.long_line_width > 0)
                .then_some(config.long_line_width),
            highlight_current_line: config.highlight_current_line,
            show_folding: config.show_folding,
            show_whitespace: config.show_whitespace,
            decorations,
        }
    }
}

fn search_result(found: Option<SearchMatch>) -> CommandResult {
    match found {
        Some(m) => CommandResult::SearchMatch {
            start: m.start,
            end: m.end,
        },
        None => CommandResult::SearchNotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folding::{FoldRegion, StaticFoldClassifier};
    use std::cell::RefCell;
    use std::rc::Rc;

    const SOURCE: &str = "fn a() {\n    one();\n    if x {\n        two();\n    }\n}\ntail";

    fn folding_editor() -> Editor {
        let mut editor = Editor::new(SOURCE);
        editor.set_classifier(Box::new(StaticFoldClassifier::new([
            FoldRegion::new(0, 5),
            FoldRegion::new(2, 4),
        ])));
        editor
    }

    #[test]
    fn caret_inside_folded_region_unfolds_it() {
        let mut editor = folding_editor();
        editor.fold_line(0);
        assert!(!editor.line_states().is_visible(3));
        editor.move_to(Position::new(3, 2), false);
        assert!(editor.line_states().is_visible(3));
        assert!(!editor.line_states().is_folded(0));
    }

    #[test]
    fn nested_folds_unfold_outermost_first() {
        let mut editor = folding_editor();
        editor.fold_line(2);
        editor.fold_line(0);
        editor.move_to(Position::new(3, 0), false);
        assert_eq!(editor.visible_line_count(), 7);
        assert!(!editor.line_states().is_folded(2));
    }

    #[test]
    fn fold_current_line_moves_caret_to_region_start() {
        let mut editor = folding_editor();
        editor.move_to(Position::new(3, 4), false);
        editor.fold_current_line();
        assert_eq!(editor.cursor().active, Position::new(2, 0));
        assert!(editor.line_states().is_folded(2));
        assert!(!editor.line_states().is_visible(3));
    }

    #[test]
    fn fold_marks_are_healed_when_region_disappears() {
        let mut editor = folding_editor();
        editor.fold_line(2);
        editor.set_classifier(Box::new(NoFolding));
        assert_eq!(editor.visible_line_count(), 7);
        assert!(!editor.line_states().is_folded(2));
    }

    #[test]
    fn brace_decorations_follow_caret() {
        let mut editor = Editor::new("a(b]");
        editor.set_option(EditorOption::MatchBraces, true);
        editor.move_to(Position::new(0, 1), false);
        let decorations = editor.decorations();
        assert_eq!(decorations.len(), 2);
        assert!(decorations.iter().all(|d| d.kind == DecorationKind::BraceMismatch));
        editor.move_to(Position::new(0, 0), false);
        assert!(editor.decorations().is_empty());
    }

    #[test]
    fn text_change_notifies_with_delta() {
        let mut editor = Editor::new("abc");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        editor.subscribe(move |change| {
            if change.change_type == StateChangeType::DocumentModified {
                sink.borrow_mut().push(change.text_delta.clone());
            }
        });
        editor.insert(1, "XY").unwrap();
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        let delta = seen[0].as_ref().unwrap();
        assert_eq!(delta.edits[0].inserted_text, "XY");
    }

    #[test]
    fn redraw_request_is_taken_once() {
        let mut editor = Editor::new("one\ntwo");
        editor.insert(0, "\n").unwrap();
        let request = editor.take_redraw_request();
        assert!(request.viewport && request.layout);
        assert!(editor.take_redraw_request().is_empty());
    }
}
