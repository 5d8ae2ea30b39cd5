//! Syntax definitions.
//!
//! A [`SyntaxRepository`] is an explicitly constructed service owned by the host and passed by
//! reference to every editor that needs it. Each [`SyntaxDefinition`] bundles the bracket
//! configuration used by the brace matcher with a factory for the line classifier that drives
//! folding. The plain-text definition is always present.

use crate::folding::{LineClassifier, NoFolding};
use std::collections::BTreeMap;
use std::fmt;
use syntaxedit_lang::BracketConfig;

/// Name of the always-available plain-text definition.
pub const PLAIN_TEXT: &str = "Plain Text";

type ClassifierFactory = Box<dyn Fn() -> Box<dyn LineClassifier>>;

/// A named language definition.
pub struct SyntaxDefinition {
    name: String,
    extensions: Vec<String>,
    brackets: BracketConfig,
    factory: ClassifierFactory,
}

impl fmt::Debug for SyntaxDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxDefinition")
            .field("name", &self.name)
            .field("extensions", &self.extensions)
            .field("brackets", &self.brackets)
            .finish_non_exhaustive()
    }
}

impl SyntaxDefinition {
    /// Create a definition; `factory` builds a fresh classifier for each editor.
    pub fn new<F, C>(name: impl Into<String>, brackets: BracketConfig, factory: F) -> Self
    where
        F: Fn() -> C + 'static,
        C: LineClassifier + 'static,
    {
        Self {
            name: name.into(),
            extensions: Vec::new(),
            brackets,
            factory: Box::new(move || Box::new(factory())),
        }
    }

    /// The plain-text definition: default brackets, no folding.
    pub fn plain_text() -> Self {
        Self::new(PLAIN_TEXT, BracketConfig::default(), || NoFolding).with_extensions(["txt"])
    }

    /// Associate file extensions (without the dot).
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Definition name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Associated file extensions.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Bracket and quote characters.
    pub fn brackets(&self) -> &BracketConfig {
        &self.brackets
    }

    /// Build a fresh classifier.
    pub fn create_classifier(&self) -> Box<dyn LineClassifier> {
        (self.factory)()
    }
}

/// Registry of syntax definitions, keyed by name.
#[derive(Debug)]
pub struct SyntaxRepository {
    plain_text: SyntaxDefinition,
    definitions: BTreeMap<String, SyntaxDefinition>,
}

impl Default for SyntaxRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxRepository {
    /// A repository holding only the plain-text definition.
    pub fn new() -> Self {
        Self {
            plain_text: SyntaxDefinition::plain_text(),
            definitions: BTreeMap::new(),
        }
    }

    /// Add or replace a definition. Returns the replaced one.
    pub fn register(&mut self, definition: SyntaxDefinition) -> Option<SyntaxDefinition> {
        tracing::debug!(name = definition.name(), "registered syntax definition");
        if definition.name() == PLAIN_TEXT {
            return Some(std::mem::replace(&mut self.plain_text, definition));
        }
        self.definitions
            .insert(definition.name().to_string(), definition)
    }

    /// Definition by name.
    pub fn get(&self, name: &str) -> Option<&SyntaxDefinition> {
        if name == PLAIN_TEXT {
            return Some(&self.plain_text);
        }
        self.definitions.get(name)
    }

    /// The plain-text definition.
    pub fn plain_text(&self) -> &SyntaxDefinition {
        &self.plain_text
    }

    /// Definition for a file name, by extension; plain text when nothing matches.
    pub fn definition_for_file(&self, file_name: &str) -> &SyntaxDefinition {
        let Some((_, extension)) = file_name.rsplit_once('.') else {
            return &self.plain_text;
        };
        self.definitions
            .values()
            .chain(std::iter::once(&self.plain_text))
            .find(|d| d.extensions.iter().any(|e| e.eq_ignore_ascii_case(extension)))
            .unwrap_or(&self.plain_text)
    }

    /// Registered names: plain text first, then the others sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(PLAIN_TEXT).chain(self.definitions.keys().map(String::as_str))
    }

    /// Number of definitions, plain text included.
    pub fn len(&self) -> usize {
        self.definitions.len() + 1
    }

    /// Always `false`: plain text is always registered.
    pub fn is_empty(&self) -> bool {
        false
    }
}
