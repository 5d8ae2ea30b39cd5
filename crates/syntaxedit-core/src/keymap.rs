//! Key bindings.
//!
//! Key dispatch is a lookup table mapping `(key, modifiers, selection state)` to a named
//! [`KeyAction`]. Custom bindings (usually from [`crate::EditorConfig`]) are checked before the
//! built-in defaults; a key press that matches nothing resolves to
//! [`KeyAction::DefaultEdit`], which inserts typed text or moves the caret.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A key, independent of modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Tab.
    Tab,
    /// Shift+Tab as reported by most toolkits.
    Backtab,
    /// Return/Enter.
    Enter,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// Escape.
    Escape,
    /// Home.
    Home,
    /// End.
    End,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    /// Control (Command on macOS hosts).
    pub ctrl: bool,
    /// Alt/Option.
    pub alt: bool,
    /// Shift.
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
    };
    /// Control only.
    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
    };
    /// Shift only.
    pub const SHIFT: Self = Self {
        ctrl: false,
        alt: false,
        shift: true,
    };
    /// Control and Shift.
    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        alt: false,
        shift: true,
    };
}

/// A key together with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    /// The key.
    pub key: Key,
    /// Held modifiers.
    pub modifiers: Modifiers,
}

impl KeyPress {
    /// Create a key press.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A key press without modifiers.
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

/// Selection condition of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionState {
    /// Applies whether or not there is a selection.
    #[default]
    Any,
    /// Applies only without a selection.
    Empty,
    /// Applies only with a selection.
    NonEmpty,
}

impl SelectionState {
    fn accepts(self, has_selection: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Empty => !has_selection,
            Self::NonEmpty => has_selection,
        }
    }
}

/// Named editor commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyAction {
    /// Indent the selected lines.
    IndentSelection,
    /// Outdent the cursor or selected lines.
    OutdentSelection,
    /// Insert indentation at the caret.
    SmartTab,
    /// Smart Home.
    SmartHome,
    /// Smart Home, extending the selection.
    SmartHomeExtend,
    /// Smart End.
    SmartEnd,
    /// Smart End, extending the selection.
    SmartEndExtend,
    /// Insert a line break, auto-indenting when enabled.
    Newline,
    /// Cut the selection, or the current line.
    CutLines,
    /// Copy the selection, or the current line.
    CopyLines,
    /// Delete the current or selected lines.
    DeleteLines,
    /// Delete the selection.
    DeleteSelection,
    /// Move the current or selected lines up.
    MoveLinesUp,
    /// Move the current or selected lines down.
    MoveLinesDown,
    /// Ask the host to scroll one line up.
    ScrollLineUp,
    /// Ask the host to scroll one line down.
    ScrollLineDown,
    /// Ask the host to undo.
    Undo,
    /// Ask the host to redo.
    Redo,
    /// Fold the region around the caret.
    FoldCurrentLine,
    /// Unfold the region at the caret.
    UnfoldCurrentLine,
    /// Fold every region.
    FoldAll,
    /// Unfold every region.
    UnfoldAll,
    /// Delete backwards.
    Backspace,
    /// Delete forwards.
    DeleteForward,
    /// Default editing: insert typed text or move the caret.
    DefaultEdit,
}

/// One entry of the binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    /// Key press that triggers the binding.
    pub press: KeyPress,
    /// Selection condition.
    pub selection: SelectionState,
    /// Action to run.
    pub action: KeyAction,
}

impl KeyBinding {
    /// Create a binding.
    pub fn new(press: KeyPress, selection: SelectionState, action: KeyAction) -> Self {
        Self {
            press,
            selection,
            action,
        }
    }

    fn matches(&self, press: KeyPress, has_selection: bool) -> bool {
        self.press == press && self.selection.accepts(has_selection)
    }
}

/// Key binding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeymapError {
    /// The notation could not be parsed.
    #[error("invalid key notation `{0}`")]
    InvalidNotation(String),
}

/// The binding table: custom bindings first, then the defaults.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    custom: Vec<KeyBinding>,
    defaults: Vec<KeyBinding>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            custom: Vec::new(),
            defaults: default_bindings(),
        }
    }
}

impl KeyBindings {
    /// Default bindings only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a custom binding; later custom bindings take precedence over earlier ones.
    pub fn bind(&mut self, binding: KeyBinding) {
        self.custom.insert(0, binding);
    }

    /// Parse and add a custom binding.
    pub fn bind_notation(
        &mut self,
        notation: &str,
        selection: SelectionState,
        action: KeyAction,
    ) -> Result<(), KeymapError> {
        let press = parse_key_notation(notation)
            .ok_or_else(|| KeymapError::InvalidNotation(notation.to_string()))?;
        self.bind(KeyBinding::new(press, selection, action));
        Ok(())
    }

    /// Drop every custom binding.
    pub fn clear_custom(&mut self) {
        self.custom.clear();
    }

    /// Custom bindings, most recent first.
    pub fn custom(&self) -> &[KeyBinding] {
        &self.custom
    }

    /// Resolve a key press.
    pub fn lookup(&self, press: KeyPress, has_selection: bool) -> KeyAction {
        self.custom
            .iter()
            .chain(self.defaults.iter())
            .find(|b| b.matches(press, has_selection))
            .map_or(KeyAction::DefaultEdit, |b| b.action)
    }
}

fn default_bindings() -> Vec<KeyBinding> {
    use KeyAction as A;
    use SelectionState as S;

    let bind = |key, modifiers, selection, action| {
        KeyBinding::new(KeyPress::new(key, modifiers), selection, action)
    };

    vec![
        bind(Key::Tab, Modifiers::NONE, S::NonEmpty, A::IndentSelection),
        bind(Key::Tab, Modifiers::NONE, S::Empty, A::SmartTab),
        bind(Key::Backtab, Modifiers::NONE, S::Any, A::OutdentSelection),
        bind(Key::Backtab, Modifiers::SHIFT, S::Any, A::OutdentSelection),
        bind(Key::Tab, Modifiers::SHIFT, S::Any, A::OutdentSelection),
        bind(Key::Home, Modifiers::NONE, S::Any, A::SmartHome),
        bind(Key::Home, Modifiers::SHIFT, S::Any, A::SmartHomeExtend),
        bind(Key::End, Modifiers::NONE, S::Any, A::SmartEnd),
        bind(Key::End, Modifiers::SHIFT, S::Any, A::SmartEndExtend),
        bind(Key::Enter, Modifiers::NONE, S::Any, A::Newline),
        bind(Key::Char('x'), Modifiers::CTRL, S::Any, A::CutLines),
        bind(Key::Char('c'), Modifiers::CTRL, S::Any, A::CopyLines),
        bind(Key::Char('k'), Modifiers::CTRL_SHIFT, S::Any, A::DeleteLines),
        bind(Key::Delete, Modifiers::NONE, S::NonEmpty, A::DeleteSelection),
        bind(Key::Backspace, Modifiers::NONE, S::NonEmpty, A::DeleteSelection),
        bind(Key::Delete, Modifiers::NONE, S::Empty, A::DeleteForward),
        bind(Key::Backspace, Modifiers::NONE, S::Empty, A::Backspace),
        bind(Key::Up, Modifiers::CTRL_SHIFT, S::Any, A::MoveLinesUp),
        bind(Key::Down, Modifiers::CTRL_SHIFT, S::Any, A::MoveLinesDown),
        bind(Key::Up, Modifiers::CTRL, S::Any, A::ScrollLineUp),
        bind(Key::Down, Modifiers::CTRL, S::Any, A::ScrollLineDown),
        bind(Key::Char('z'), Modifiers::CTRL, S::Any, A::Undo),
        bind(Key::Char('y'), Modifiers::CTRL, S::Any, A::Redo),
        bind(Key::Char('z'), Modifiers::CTRL_SHIFT, S::Any, A::Redo),
    ]
}

/// Parse a key notation string into a [`KeyPress`].
///
/// Supported formats:
/// - Single characters: `"a"`, `";"` (uppercase letters imply Shift)
/// - Bracketed notation with modifier prefixes: `"<C-x>"`, `"<C-S-Up>"`, `"<A-Left>"`
/// - Named keys: `"<Tab>"`, `"<S-Tab>"`, `"<CR>"`, `"<BS>"`, `"<Del>"`, `"<Home>"`, ...
pub fn parse_key_notation(s: &str) -> Option<KeyPress> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if s.starts_with('<') && s.ends_with('>') && s.len() > 2 {
        return parse_special_notation(&s[1..s.len() - 1]);
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(char_to_key_press(c))
}

fn parse_special_notation(inner: &str) -> Option<KeyPress> {
    let mut modifiers = Modifiers::NONE;
    let mut rest = inner;

    while rest.len() > 2 && rest.as_bytes()[1] == b'-' {
        match rest.as_bytes()[0].to_ascii_lowercase() {
            b'c' => modifiers.ctrl = true,
            b'a' | b'm' => modifiers.alt = true,
            b's' => modifiers.shift = true,
            _ => return None,
        }
        rest = &rest[2..];
    }

    let key = match rest.to_lowercase().as_str() {
        "cr" | "enter" | "return" => Key::Enter,
        "esc" | "escape" => Key::Escape,
        "tab" => Key::Tab,
        "backtab" => Key::Backtab,
        "bs" | "backspace" => Key::Backspace,
        "del" | "delete" => Key::Delete,
        "space" => Key::Char(' '),
        "up" => Key::Up,
        "down" => Key::Down,
        "left" => Key::Left,
        "right" => Key::Right,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" => Key::PageUp,
        "pagedown" => Key::PageDown,
        _ => {
            let mut chars = rest.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            if modifiers.ctrl || modifiers.alt {
                Key::Char(c.to_ascii_lowercase())
            } else {
                return Some(KeyPress::new(
                    Key::Char(c),
                    Modifiers {
                        shift: modifiers.shift || c.is_ascii_uppercase(),
                        ..modifiers
                    },
                ));
            }
        }
    };
    Some(KeyPress::new(key, modifiers))
}

fn char_to_key_press(c: char) -> KeyPress {
    if c.is_ascii_uppercase() {
        KeyPress::new(Key::Char(c), Modifiers::SHIFT)
    } else {
        KeyPress::new(Key::Char(c), Modifiers::NONE)
    }
}
