use crate::ScannedRegions;
use regex::Regex;
use syntaxedit_core::{FoldRegion, LineClassifier, LineSource, TextDelta};

/// Folds regions delimited by explicit marker lines.
///
/// A line matching the start pattern opens a region that the next unmatched line matching
/// the end pattern closes. Markers nest. A line matching both patterns is treated as an end
/// marker. Unclosed markers run to the end of the document.
#[derive(Debug, Clone)]
pub struct MarkerFoldClassifier {
    start: Regex,
    end: Regex,
    regions: ScannedRegions,
}

impl MarkerFoldClassifier {
    /// Create a classifier from start and end marker patterns.
    pub fn new(start: &str, end: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            start: Regex::new(start)?,
            end: Regex::new(end)?,
            regions: ScannedRegions::default(),
        })
    }

    /// `#region` / `#endregion` markers, optionally after a `//` comment leader.
    pub fn region_markers() -> Result<Self, regex::Error> {
        Self::new(
            r"^\s*(?://\s*)?#region\b",
            r"^\s*(?://\s*)?#endregion\b",
        )
    }

    /// Vim-style `{{{` / `}}}` markers anywhere on the line.
    pub fn brace_triple_markers() -> Result<Self, regex::Error> {
        Self::new(r"\{\{\{", r"\}\}\}")
    }

    /// Regions found by the last update.
    pub fn regions(&self) -> &[FoldRegion] {
        self.regions.regions()
    }

    fn scan(&self, lines: &dyn LineSource) -> Vec<FoldRegion> {
        let line_count = lines.line_count();
        let mut open = Vec::new();
        let mut regions = Vec::new();

        for line in 0..line_count {
            let Some(text) = lines.line_text(line) else {
                continue;
            };
            if self.end.is_match(&text) {
                if let Some(start) = open.pop() {
                    regions.push(FoldRegion::new(start, line));
                }
            } else if self.start.is_match(&text) {
                open.push(line);
            }
        }

        for start in open {
            if start + 1 < line_count {
                regions.push(FoldRegion::new(start, line_count));
            }
        }
        regions
    }
}

impl LineClassifier for MarkerFoldClassifier {
    fn update(&mut self, lines: &dyn LineSource, _delta: Option<&TextDelta>) {
        let regions = self.scan(lines);
        tracing::trace!(regions = regions.len(), "marker fold regions rescanned");
        self.regions = ScannedRegions::new(regions, lines.line_count());
    }

    fn is_foldable(&self, line: usize) -> bool {
        self.regions.is_foldable(line)
    }

    fn find_fold_end(&self, line: usize) -> Option<usize> {
        self.regions.find_fold_end(line)
    }
}
