use crate::ScannedRegions;
use syntaxedit_core::metrics::{is_blank, leading_indentation};
use syntaxedit_core::{FoldRegion, LineClassifier, LineSource, TextDelta};

/// Folds indented blocks (the off-side rule).
///
/// A non-blank line starts a region when the next non-blank line is indented deeper. The
/// region covers every following line indented deeper than the start line, blank lines in
/// between included; it ends on the line after the last non-blank line of the block, so
/// trailing blank lines stay visible when folded.
#[derive(Debug, Clone)]
pub struct IndentFoldClassifier {
    tab_width: usize,
    regions: ScannedRegions,
}

impl Default for IndentFoldClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IndentFoldClassifier {
    /// A classifier expanding tabs to 4 columns.
    pub fn new() -> Self {
        Self::with_tab_width(4)
    }

    /// A classifier expanding tabs to `tab_width` columns.
    pub fn with_tab_width(tab_width: usize) -> Self {
        Self {
            tab_width: tab_width.max(1),
            regions: ScannedRegions::default(),
        }
    }

    /// Regions found by the last update.
    pub fn regions(&self) -> &[FoldRegion] {
        self.regions.regions()
    }

    fn scan(&self, lines: &dyn LineSource) -> Vec<FoldRegion> {
        let line_count = lines.line_count();
        // (indent width, start line) of the blocks enclosing the current line
        let mut open: Vec<(usize, usize)> = Vec::new();
        let mut last_content = 0;
        let mut regions = Vec::new();

        for line in 0..line_count {
            let Some(text) = lines.line_text(line) else {
                continue;
            };
            if is_blank(&text) {
                continue;
            }
            let (width, _) = leading_indentation(&text, self.tab_width);
            while let Some(&(open_width, start)) = open.last() {
                if width > open_width {
                    break;
                }
                open.pop();
                close_block(start, last_content, &mut regions);
            }
            open.push((width, line));
            last_content = line;
        }

        for (_, start) in open.into_iter().rev() {
            close_block(start, last_content, &mut regions);
        }
        regions
    }
}

fn close_block(start: usize, last_content: usize, regions: &mut Vec<FoldRegion>) {
    if last_content > start {
        regions.push(FoldRegion::new(start, last_content + 1));
    }
}

impl LineClassifier for IndentFoldClassifier {
    fn update(&mut self, lines: &dyn LineSource, _delta: Option<&TextDelta>) {
        let regions = self.scan(lines);
        tracing::trace!(regions = regions.len(), "indent fold regions rescanned");
        self.regions = ScannedRegions::new(regions, lines.line_count());
    }

    fn is_foldable(&self, line: usize) -> bool {
        self.regions.is_foldable(line)
    }

    fn find_fold_end(&self, line: usize) -> Option<usize> {
        self.regions.find_fold_end(line)
    }
}
