#![warn(missing_docs)]
//! SyntaxEdit Core - a headless source-editor kernel
//!
//! # Overview
//!
//! `syntaxedit-core` holds the editing state behind a source-code view and keeps it consistent
//! while the text changes. It does not paint: a host toolkit renders the [`ViewSnapshot`]s
//! and decorations it produces and feeds key presses and commands back in.
//!
//! # Core Features
//!
//! - **Line/column metric**: visual columns with tab expansion and smart Home/End
//! - **Brace matching**: bracket and quote pairing around the caret, with mismatch reporting
//! - **Indentation**: indent/outdent, smart Tab and auto-indent for spaces, tabs and mixed mode
//! - **Code folding**: per-line fold state driven by an external [`LineClassifier`], healed
//!   around the caret after every move and edit
//! - **Live search**: every match of a query highlighted while the text changes
//! - **State Tracking**: version numbers, change notifications and redraw requests
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Commands, Key Bindings & Notifications     │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Editor (cursor / fold / decoration sync)   │  ← Orchestration
//! ├─────────────────────────────────────────────┤
//! │  Braces · Indentation · Folding · Search    │  ← Engines
//! ├─────────────────────────────────────────────┤
//! │  Line Metrics                               │  ← Columns
//! ├─────────────────────────────────────────────┤
//! │  Document (Rope) + Text Deltas              │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Using Command Interface
//!
//! ```rust
//! use syntaxedit_core::{Command, CursorCommand, EditCommand, Editor, Position};
//!
//! let mut editor = Editor::new("");
//!
//! // Insert text
//! editor.execute(Command::Edit(EditCommand::Insert {
//!     offset: 0,
//!     text: "fn main() {\n    println!(\"Hello\");\n}\n".to_string(),
//! })).unwrap();
//!
//! // Move cursor
//! editor.execute(Command::Cursor(CursorCommand::MoveTo {
//!     line: 1,
//!     column: 4,
//! })).unwrap();
//!
//! assert_eq!(editor.cursor().active, Position::new(1, 4));
//! ```
//!
//! ## Subscribing to Changes
//!
//! ```rust
//! use syntaxedit_core::{Editor, StateChangeType};
//!
//! let mut editor = Editor::new("Initial text");
//!
//! editor.subscribe(|change| {
//!     if change.change_type == StateChangeType::DocumentModified {
//!         println!("version {} -> {}", change.old_version, change.new_version);
//!     }
//! });
//!
//! editor.insert_text("// ").unwrap();
//! assert_eq!(editor.text(), "// Initial text");
//! ```
//!
//! # Module Description
//!
//! - [`metrics`] - visual columns and whitespace measurements
//! - [`document`] - rope-backed text with edit transactions
//! - [`brace`] - bracket and quote matching
//! - [`indent`] - indentation policies and line edits
//! - [`folding`] - line classifiers and per-line fold state
//! - [`search`] - regex/literal search and the live search highlighter
//! - [`editor`] - the orchestrator tying everything together
//! - [`commands`] - unified command interface
//! - [`snapshot`] - headless view snapshots
//! - [`state`] - change notifications and redraw requests
//!
//! # Unicode Support
//!
//! - Offsets and columns count Unicode scalar values
//! - Tabs expand to the next tab stop; CJK wide characters count as one column

pub mod brace;
pub mod commands;
pub mod config;
pub mod cursor;
pub mod decorations;
pub mod delta;
pub mod document;
pub mod editor;
pub mod folding;
pub mod indent;
pub mod keymap;
pub mod metrics;
pub mod search;
pub mod snapshot;
pub mod state;
pub mod syntax;

pub use brace::{BraceMatch, find_next_brace, find_prev_brace, match_at_cursor};
pub use commands::{
    Command, CommandError, CommandResult, CursorCommand, EditCommand, EditorOption, FoldCommand,
    SearchCommand, ViewCommand,
};
pub use config::{ConfigError, EditorConfig, KeyBindingConfig};
pub use cursor::{Cursor, Position};
pub use decorations::{
    BRACE_MATCH_STYLE_ID, BRACE_MISMATCH_STYLE_ID, Decoration, DecorationKind, DecorationLayerId,
    DecorationRange, DecorationSet, SEARCH_MATCH_STYLE_ID, StyleId,
};
pub use delta::{TextDelta, TextDeltaEdit};
pub use document::{Document, LineSource};
pub use editor::{Editor, HostRequest, KeyOutcome};
pub use folding::{
    FoldMarker, FoldRegion, FoldRegionTable, LineClassifier, LineState, LineStates, NoFolding,
    StaticFoldClassifier,
};
pub use indent::{IndentStyle, IndentationMode, LineEdit};
pub use keymap::{
    Key, KeyAction, KeyBinding, KeyBindings, KeyPress, KeymapError, Modifiers, SelectionState,
};
pub use search::{LiveSearch, SearchError, SearchMatch, SearchMatcher, SearchOptions};
pub use snapshot::{ViewLine, ViewSnapshot};
pub use state::{RedrawRequest, StateChange, StateChangeCallback, StateChangeType};
pub use syntax::{PLAIN_TEXT, SyntaxDefinition, SyntaxRepository};

pub use syntaxedit_lang::BracketConfig;
