#![warn(missing_docs)]
//! `syntaxedit-fold` - line classifiers that drive `syntaxedit` code folding.
//!
//! The editor core only consumes the [`LineClassifier`](syntaxedit_core::LineClassifier)
//! trait. This crate provides three lightweight, parser-free implementations:
//!
//! - [`BraceFoldClassifier`]: a region per multi-line bracket pair, ignoring brackets inside
//!   quoted strings
//! - [`IndentFoldClassifier`]: the off-side rule, a region per indented block
//! - [`MarkerFoldClassifier`]: explicit start/end comment markers such as `#region`
//!
//! Every classifier re-derives its regions from the whole document on
//! [`update`](syntaxedit_core::LineClassifier::update). [`register_defaults`] installs syntax
//! definitions for a handful of common languages into a [`SyntaxRepository`].
//!
//! ```rust
//! use syntaxedit_core::{Editor, SyntaxRepository};
//!
//! let mut repo = SyntaxRepository::new();
//! syntaxedit_fold::register_defaults(&mut repo);
//!
//! let mut editor = Editor::new("fn main() {\n    body();\n}\n");
//! editor.set_syntax(&repo, "Rust").unwrap();
//! editor.fold_line(0);
//! assert_eq!(editor.visible_line_count(), 3);
//! ```

mod brace;
mod indent;
mod marker;

pub use brace::BraceFoldClassifier;
pub use indent::IndentFoldClassifier;
pub use marker::MarkerFoldClassifier;

use syntaxedit_core::{FoldRegion, FoldRegionTable, SyntaxDefinition, SyntaxRepository};
use syntaxedit_lang::{BracketConfig, BracketPair};

/// Fold regions derived from a full scan of the document.
///
/// A region whose end line equals `line_count` is open to the end of the document.
#[derive(Debug, Clone, Default)]
struct ScannedRegions {
    table: FoldRegionTable,
    line_count: usize,
}

impl ScannedRegions {
    fn new(regions: Vec<FoldRegion>, line_count: usize) -> Self {
        Self {
            table: FoldRegionTable::from_regions(regions),
            line_count,
        }
    }

    fn is_foldable(&self, line: usize) -> bool {
        self.table.region_at(line).is_some()
    }

    fn find_fold_end(&self, line: usize) -> Option<usize> {
        self.table
            .region_at(line)
            .map(|r| r.end_line)
            .filter(|&end| end < self.line_count)
    }

    fn regions(&self) -> &[FoldRegion] {
        self.table.regions()
    }
}

/// Register brace-folded C-like languages and indentation-folded Python and YAML.
///
/// Existing definitions with the same names are replaced.
pub fn register_defaults(repo: &mut SyntaxRepository) {
    let c_like = BracketConfig::default();
    let rust = BracketConfig::new(
        [
            BracketPair::new('{', '}'),
            BracketPair::new('(', ')'),
            BracketPair::new('[', ']'),
        ],
        vec!['"'],
    );

    let definitions = [
        brace_definition("C", &c_like, &["c", "h"]),
        brace_definition("C++", &c_like, &["cpp", "cc", "cxx", "hpp", "hh"]),
        brace_definition("Java", &c_like, &["java"]),
        brace_definition("JavaScript", &c_like, &["js", "mjs", "ts"]),
        brace_definition("JSON", &c_like, &["json"]),
        brace_definition("Rust", &rust, &["rs"]),
        SyntaxDefinition::new("Python", c_like.clone(), IndentFoldClassifier::new)
            .with_extensions(["py", "pyw"]),
        SyntaxDefinition::new("YAML", BracketConfig::default(), IndentFoldClassifier::new)
            .with_extensions(["yaml", "yml"]),
    ];

    let count = definitions.len();
    for definition in definitions {
        repo.register(definition);
    }
    tracing::debug!(count, "registered default syntax definitions");
}

fn brace_definition(name: &str, brackets: &BracketConfig, extensions: &[&str]) -> SyntaxDefinition {
    let classifier_brackets = brackets.clone();
    SyntaxDefinition::new(name, brackets.clone(), move || {
        BraceFoldClassifier::new(classifier_brackets.clone())
    })
    .with_extensions(extensions.iter().copied())
}
