use crate::ScannedRegions;
use syntaxedit_core::{FoldRegion, LineClassifier, LineSource, TextDelta};
use syntaxedit_lang::BracketConfig;

/// Folds every bracket pair that spans more than one line.
///
/// A region starts on the line of the opening bracket and ends on the line of its closing
/// bracket, which stays visible when the region is folded. Brackets inside quoted strings are
/// ignored; a string never continues past the end of its line. A backslash escapes the next
/// character inside a string. An opening bracket that is never closed starts a region running
/// to the end of the document.
#[derive(Debug, Clone)]
pub struct BraceFoldClassifier {
    brackets: BracketConfig,
    regions: ScannedRegions,
}

impl Default for BraceFoldClassifier {
    fn default() -> Self {
        Self::new(BracketConfig::default())
    }
}

impl BraceFoldClassifier {
    /// Create a classifier for the given brackets and quotes.
    pub fn new(brackets: BracketConfig) -> Self {
        Self {
            brackets,
            regions: ScannedRegions::default(),
        }
    }

    /// Regions found by the last update.
    pub fn regions(&self) -> &[FoldRegion] {
        self.regions.regions()
    }

    fn scan(&self, lines: &dyn LineSource) -> Vec<FoldRegion> {
        let line_count = lines.line_count();
        let mut open: Vec<(char, usize)> = Vec::new();
        let mut regions = Vec::new();

        for line in 0..line_count {
            let Some(text) = lines.line_text(line) else {
                continue;
            };
            let mut quote: Option<char> = None;
            let mut escaped = false;
            for ch in text.chars() {
                if let Some(q) = quote {
                    if escaped {
                        escaped = false;
                    } else if ch == '\\' {
                        escaped = true;
                    } else if ch == q {
                        quote = None;
                    }
                    continue;
                }

                if self.brackets.is_quote(ch) {
                    quote = Some(ch);
                } else if self.brackets.is_open(ch) {
                    open.push((ch, line));
                } else if self.brackets.is_close(ch) {
                    // Unmatched closers are ignored; openers skipped over are dropped.
                    let Some(pos) = open
                        .iter()
                        .rposition(|&(o, _)| self.brackets.pair_matches(o, ch))
                    else {
                        continue;
                    };
                    let (_, start) = open[pos];
                    open.truncate(pos);
                    if line > start {
                        regions.push(FoldRegion::new(start, line));
                    }
                }
            }
        }

        for (_, start) in open {
            if start + 1 < line_count {
                regions.push(FoldRegion::new(start, line_count));
            }
        }
        regions
    }
}

impl LineClassifier for BraceFoldClassifier {
    fn update(&mut self, lines: &dyn LineSource, _delta: Option<&TextDelta>) {
        let regions = self.scan(lines);
        tracing::trace!(regions = regions.len(), "brace fold regions rescanned");
        self.regions = ScannedRegions::new(regions, lines.line_count());
    }

    fn is_foldable(&self, line: usize) -> bool {
        self.regions.is_foldable(line)
    }

    fn find_fold_end(&self, line: usize) -> Option<usize> {
        self.regions.find_fold_end(line)
    }
}
