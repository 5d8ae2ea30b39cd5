//! Change notifications and redraw requests.
//!
//! The editor publishes every observable change as a [`StateChange`] record to subscribed
//! callbacks, tagged with the version numbers before and after the change. Document changes
//! carry the structured [`TextDelta`] of the transaction that produced them.
//!
//! Independently, the editor accumulates a [`RedrawRequest`] that the host takes once per
//! event-loop turn to decide what to repaint.
//!
//! # Example
//!
//! ```rust
//! use syntaxedit_core::{Editor, StateChangeType};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let mut editor = Editor::new("fn main() {}");
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//! editor.subscribe(move |change| sink.borrow_mut().push(change.change_type));
//!
//! editor.insert_text("// ").unwrap();
//! assert!(seen.borrow().contains(&StateChangeType::DocumentModified));
//! ```

use crate::delta::TextDelta;
use std::ops::Range;
use std::sync::Arc;

/// State change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeType {
    /// Document content modified
    DocumentModified,
    /// Cursor moved
    CursorMoved,
    /// Selection changed
    SelectionChanged,
    /// Folding state changed; the visible line extent must be recomputed
    FoldingChanged,
    /// Published decorations changed
    DecorationsChanged,
    /// Configuration changed
    ConfigChanged,
    /// Syntax definition changed
    SyntaxChanged,
}

/// State change record
#[derive(Debug, Clone)]
pub struct StateChange {
    /// Change type
    pub change_type: StateChangeType,
    /// Old version number
    pub old_version: u64,
    /// New version number
    pub new_version: u64,
    /// Affected region (character offset range)
    pub affected_region: Option<Range<usize>>,
    /// Structured text delta for document changes (if available).
    pub text_delta: Option<Arc<TextDelta>>,
}

impl StateChange {
    /// Create a new state change record without an affected region.
    pub fn new(change_type: StateChangeType, old_version: u64, new_version: u64) -> Self {
        Self {
            change_type,
            old_version,
            new_version,
            affected_region: None,
            text_delta: None,
        }
    }

    /// Attach the affected character range to this change record.
    pub fn with_region(mut self, region: Range<usize>) -> Self {
        self.affected_region = Some(region);
        self
    }

    /// Attach a structured text delta to this change record.
    pub fn with_text_delta(mut self, delta: Arc<TextDelta>) -> Self {
        self.text_delta = Some(delta);
        self
    }
}

/// State change callback function type
pub type StateChangeCallback = Box<dyn FnMut(&StateChange)>;

/// What the host should repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RedrawRequest {
    /// Repaint the whole text viewport.
    pub viewport: bool,
    /// Repaint the line number / folding margin.
    pub line_margin: bool,
    /// Recompute scroll ranges: the number of visible lines changed.
    pub layout: bool,
}

impl RedrawRequest {
    /// Returns `true` if nothing needs repainting.
    pub fn is_empty(&self) -> bool {
        !(self.viewport || self.line_margin || self.layout)
    }

    /// Merge another request into this one.
    pub fn merge(&mut self, other: RedrawRequest) {
        self.viewport |= other.viewport;
        self.line_margin |= other.line_margin;
        self.layout |= other.layout;
    }
}

/// Version counter plus subscribers.
#[derive(Default)]
pub(crate) struct ChangeNotifier {
    version: u64,
    callbacks: Vec<StateChangeCallback>,
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("version", &self.version)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl ChangeNotifier {
    pub(crate) fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn subscribe(&mut self, callback: StateChangeCallback) {
        self.callbacks.push(callback);
    }

    pub(crate) fn notify(&mut self, change_type: StateChangeType) {
        let change = self.next(change_type);
        self.dispatch(&change);
    }

    pub(crate) fn notify_text(&mut self, delta: TextDelta) {
        let mut change = self.next(StateChangeType::DocumentModified);
        if let Some(region) = delta.affected_range() {
            change = change.with_region(region);
        }
        let change = change.with_text_delta(Arc::new(delta));
        self.dispatch(&change);
    }

    fn next(&mut self, change_type: StateChangeType) -> StateChange {
        let old_version = self.version;
        self.version += 1;
        StateChange::new(change_type, old_version, self.version)
    }

    fn dispatch(&mut self, change: &StateChange) {
        for callback in &mut self.callbacks {
            callback(change);
        }
    }
}
