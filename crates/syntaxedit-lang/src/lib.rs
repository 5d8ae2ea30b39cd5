#![warn(missing_docs)]
//! `syntaxedit-lang` - data-driven language configuration helpers for `syntaxedit`.
//!
//! This crate intentionally stays lightweight and does **not** depend on any parsing or
//! highlighting system. It provides small structs that hosts can use to configure
//! editor-kernel features (brace matching, brace-based folding) in a language-aware way.

/// A single open/close bracket pair, e.g. `(` and `)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BracketPair {
    /// Opening delimiter.
    pub open: char,
    /// Closing delimiter.
    pub close: char,
}

impl BracketPair {
    /// Create a new bracket pair.
    pub const fn new(open: char, close: char) -> Self {
        Self { open, close }
    }
}

/// Bracket and quote characters for a given language.
///
/// The brace matcher treats `pairs` as structural delimiters and `quotes` as string
/// delimiters: brackets between two identical quote characters are literal content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketConfig {
    /// Structural bracket pairs.
    pub pairs: Vec<BracketPair>,
    /// Quote characters that open and close string literals.
    pub quotes: Vec<char>,
}

impl Default for BracketConfig {
    /// `{}`, `()` and `[]` with `"` and `'` quotes.
    fn default() -> Self {
        Self {
            pairs: vec![
                BracketPair::new('{', '}'),
                BracketPair::new('(', ')'),
                BracketPair::new('[', ']'),
            ],
            quotes: vec!['"', '\''],
        }
    }
}

impl BracketConfig {
    /// Create a config from explicit pairs and quote characters.
    pub fn new(pairs: impl IntoIterator<Item = BracketPair>, quotes: impl Into<Vec<char>>) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
            quotes: quotes.into(),
        }
    }

    /// A config without any brackets or quotes (plain text).
    pub fn none() -> Self {
        Self {
            pairs: Vec::new(),
            quotes: Vec::new(),
        }
    }

    /// Returns `true` if `ch` opens one of the configured pairs.
    pub fn is_open(&self, ch: char) -> bool {
        self.pairs.iter().any(|p| p.open == ch)
    }

    /// Returns `true` if `ch` closes one of the configured pairs.
    pub fn is_close(&self, ch: char) -> bool {
        self.pairs.iter().any(|p| p.close == ch)
    }

    /// Returns `true` if `ch` is a configured quote character.
    pub fn is_quote(&self, ch: char) -> bool {
        self.quotes.contains(&ch)
    }

    /// Returns `true` if `open` and `close` form one of the configured pairs.
    pub fn pair_matches(&self, open: char, close: char) -> bool {
        self.pairs.iter().any(|p| p.open == open && p.close == close)
    }

    /// Closing partner of an opening bracket.
    pub fn close_for(&self, open: char) -> Option<char> {
        self.pairs.iter().find(|p| p.open == open).map(|p| p.close)
    }

    /// Returns `true` if no brackets are configured.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_knows_common_pairs() {
        let config = BracketConfig::default();
        assert!(config.is_open('{'));
        assert!(config.is_close(']'));
        assert!(config.is_quote('"'));
        assert!(config.pair_matches('(', ')'));
        assert!(!config.pair_matches('(', ']'));
        assert_eq!(config.close_for('['), Some(']'));
    }

    #[test]
    fn none_config_is_empty() {
        let config = BracketConfig::none();
        assert!(config.is_empty());
        assert!(!config.is_open('('));
        assert!(!config.is_quote('\''));
    }

    #[test]
    fn custom_pairs() {
        let config = BracketConfig::new([BracketPair::new('<', '>')], vec!['`']);
        assert!(config.pair_matches('<', '>'));
        assert!(config.is_quote('`'));
        assert!(!config.is_quote('"'));
    }
}
