//! Editor configuration.
//!
//! A flat set of named options, loadable from TOML:
//!
//! ```toml
//! show-line-numbers = true
//! match-braces = true
//! tab-width = 8
//! indent-width = 4
//! indentation-mode = "mixed"
//!
//! [[keymap]]
//! key = "<C-S-Up>"
//! action = "move-lines-up"
//! ```

use crate::indent::{IndentStyle, IndentationMode};
use crate::keymap::{KeyAction, KeyBindings, KeymapError, SelectionState};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML text could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Tab width must be at least 1.
    #[error("tab width must be greater than 0")]
    InvalidTabWidth,
    /// Indent width must be at least 1.
    #[error("indent width must be greater than 0")]
    InvalidIndentWidth,
    /// A custom key binding is invalid.
    #[error(transparent)]
    Keymap(#[from] KeymapError),
}

/// A custom key binding entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindingConfig {
    /// Key notation, e.g. `"<C-S-Up>"`.
    pub key: String,
    /// Action to run.
    pub action: KeyAction,
    /// Selection condition (default: any).
    #[serde(default)]
    pub selection: SelectionState,
}

/// Editor options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EditorConfig {
    /// Show the line number margin (default: false)
    pub show_line_numbers: bool,
    /// Show the folding margin (default: false)
    pub show_folding: bool,
    /// Render whitespace characters (default: false)
    pub show_whitespace: bool,
    /// Copy indentation onto new lines (default: false)
    pub auto_indent: bool,
    /// Highlight the bracket pair at the caret (default: false)
    pub match_braces: bool,
    /// Highlight the caret line (default: false)
    pub highlight_current_line: bool,
    /// Draw the long line edge (default: false)
    pub show_long_line_edge: bool,
    /// Column of the long line edge (default: 80)
    pub long_line_width: usize,
    /// Draw indentation guides (default: false)
    pub show_indent_guides: bool,
    /// Forward undo/redo key presses to the host (default: false)
    pub external_undo_redo: bool,
    /// Tab stop distance (default: 4)
    pub tab_width: usize,
    /// Indent step (default: 4)
    pub indent_width: usize,
    /// Indentation policy (default: spaces)
    pub indentation_mode: IndentationMode,
    /// Custom key bindings, checked before the defaults
    pub keymap: Vec<KeyBindingConfig>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            show_line_numbers: false,
            show_folding: false,
            show_whitespace: false,
            auto_indent: false,
            match_braces: false,
            highlight_current_line: false,
            show_long_line_edge: false,
            long_line_width: 80,
            show_indent_guides: false,
            external_undo_redo: false,
            tab_width: 4,
            indent_width: 4,
            indentation_mode: IndentationMode::Spaces,
            keymap: Vec::new(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Check value ranges and key notations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tab_width == 0 {
            return Err(ConfigError::InvalidTabWidth);
        }
        if self.indent_width == 0 {
            return Err(ConfigError::InvalidIndentWidth);
        }
        self.key_bindings()?;
        Ok(())
    }

    /// Indentation settings.
    pub fn indent_style(&self) -> IndentStyle {
        IndentStyle {
            mode: self.indentation_mode,
            tab_width: self.tab_width,
            indent_width: self.indent_width,
        }
    }

    /// Default bindings plus the custom entries of this configuration.
    pub fn key_bindings(&self) -> Result<KeyBindings, KeymapError> {
        let mut bindings = KeyBindings::new();
        for entry in &self.keymap {
            bindings.bind_notation(&entry.key, entry.selection, entry.action)?;
        }
        Ok(bindings)
    }
}
