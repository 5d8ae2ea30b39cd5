//! Code folding.
//!
//! Folding is driven by an external [`LineClassifier`] that decides which lines start a
//! foldable region and where that region ends. The editor keeps the fold state itself in a
//! [`LineStates`] side table with one entry per logical line:
//!
//! - `visible`: `false` for lines hidden inside a folded region
//! - `folded`: the persisted fold mark of a region start line
//!
//! The table is re-indexed on every edit (entries for removed line breaks are dropped, new
//! lines get a default entry), so fold marks follow their lines. Marks that no longer agree
//! with the classifier are healed by the editor's cursor consistency checks, never reported.
//!
//! Regions nest and never overlap. Folding a region hides the lines strictly between its
//! start and end line; unfolding reveals them again, except for the interiors of nested
//! regions that are folded on their own.

use crate::delta::TextDelta;
use crate::document::LineSource;

/// Oracle that reports foldable regions of a document.
pub trait LineClassifier {
    /// Re-read the document after a text change.
    ///
    /// `delta` is `None` when the classifier is first attached or the whole text was replaced.
    fn update(&mut self, lines: &dyn LineSource, delta: Option<&TextDelta>) {
        let _ = (lines, delta);
    }

    /// Returns `true` if `line` starts a foldable region.
    fn is_foldable(&self, line: usize) -> bool;

    /// Last line of the region starting at `line`.
    ///
    /// `None` means the region is open to the end of the document (or `line` is not foldable;
    /// callers check [`LineClassifier::is_foldable`] first).
    fn find_fold_end(&self, line: usize) -> Option<usize>;

    /// Returns `true` if `candidate` lies inside the region starting at `start`, both ends
    /// inclusive. Always `false` when `start` is not foldable.
    fn fold_contains(&self, start: usize, candidate: usize) -> bool {
        self.is_foldable(start)
            && candidate >= start
            && self.find_fold_end(start).is_none_or(|end| candidate <= end)
    }
}

/// Classifier for text without any folding structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFolding;

impl LineClassifier for NoFolding {
    fn is_foldable(&self, _line: usize) -> bool {
        false
    }

    fn find_fold_end(&self, _line: usize) -> Option<usize> {
        None
    }
}

/// Fold region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldRegion {
    /// Start line number
    pub start_line: usize,
    /// End line number (inclusive)
    pub end_line: usize,
}

impl FoldRegion {
    /// Create a folding region for an inclusive line range.
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    /// Check if line number is within fold region
    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    fn nests_with(&self, other: &FoldRegion) -> bool {
        // Regions may share a boundary line, as in `} else {`.
        let disjoint = self.end_line <= other.start_line || other.end_line <= self.start_line;
        let self_in_other = other.start_line <= self.start_line && self.end_line <= other.end_line;
        let other_in_self = self.start_line <= other.start_line && other.end_line <= self.end_line;
        disjoint || self_in_other || other_in_self
    }
}

/// A sorted set of properly nested fold regions.
///
/// Regions are keyed by their start line: at most one region starts on any line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldRegionTable {
    regions: Vec<FoldRegion>,
}

impl FoldRegionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table, dropping empty regions, duplicates of a start line and regions that
    /// partially overlap an earlier one.
    pub fn from_regions(regions: impl IntoIterator<Item = FoldRegion>) -> Self {
        let mut table = Self::new();
        for region in regions {
            table.add_region(region);
        }
        table
    }

    /// Add a region. Returns `false` when it is empty, starts on an occupied line or would
    /// overlap an existing region without nesting.
    pub fn add_region(&mut self, region: FoldRegion) -> bool {
        if region.end_line <= region.start_line {
            return false;
        }
        if self.regions.iter().any(|r| !r.nests_with(&region)) {
            return false;
        }
        match self
            .regions
            .binary_search_by_key(&region.start_line, |r| r.start_line)
        {
            Ok(_) => false,
            Err(pos) => {
                self.regions.insert(pos, region);
                true
            }
        }
    }

    /// Remove the region starting at `start_line`.
    pub fn remove_region(&mut self, start_line: usize) -> bool {
        match self
            .regions
            .binary_search_by_key(&start_line, |r| r.start_line)
        {
            Ok(pos) => {
                self.regions.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Region starting at `line`.
    pub fn region_at(&self, line: usize) -> Option<&FoldRegion> {
        self.regions
            .binary_search_by_key(&line, |r| r.start_line)
            .ok()
            .map(|pos| &self.regions[pos])
    }

    /// Innermost region containing `line`.
    pub fn innermost_containing(&self, line: usize) -> Option<&FoldRegion> {
        self.regions
            .iter()
            .filter(|r| r.contains_line(line))
            .min_by_key(|r| r.end_line - r.start_line)
    }

    /// All regions, sorted by start line.
    pub fn regions(&self) -> &[FoldRegion] {
        &self.regions
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` if there are no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Update regions for an edit on `edit_line` that changes the line count by `line_delta`.
    ///
    /// Regions starting after the edit line move; regions containing it grow or shrink.
    pub fn apply_line_delta(&mut self, edit_line: usize, line_delta: isize) {
        if line_delta == 0 {
            return;
        }
        for region in self.regions.iter_mut() {
            if edit_line < region.start_line {
                let start = region.start_line as isize + line_delta;
                let end = region.end_line as isize + line_delta;
                region.start_line = start.max(edit_line as isize) as usize;
                region.end_line = end.max(edit_line as isize) as usize;
            } else if edit_line <= region.end_line {
                let end = region.end_line as isize + line_delta;
                region.end_line = end.max(region.start_line as isize) as usize;
            }
        }
        self.normalize();
    }

    /// Clamp regions to `line_count` lines, dropping regions that become empty.
    pub fn clamp_to_line_count(&mut self, line_count: usize) {
        let max_line = line_count.saturating_sub(1);
        for region in self.regions.iter_mut() {
            region.start_line = region.start_line.min(max_line);
            region.end_line = region.end_line.min(max_line);
        }
        self.normalize();
    }

    fn normalize(&mut self) {
        let regions = std::mem::take(&mut self.regions);
        let mut sorted = regions;
        sorted.sort_by_key(|r| (r.start_line, std::cmp::Reverse(r.end_line)));
        for region in sorted {
            self.add_region(region);
        }
    }
}

/// A classifier over regions supplied by the host (e.g. from a language server).
///
/// Regions are kept stable across edits by shifting them with the line delta of each edit.
#[derive(Debug, Clone, Default)]
pub struct StaticFoldClassifier {
    table: FoldRegionTable,
}

impl StaticFoldClassifier {
    /// Create a classifier over `regions`.
    pub fn new(regions: impl IntoIterator<Item = FoldRegion>) -> Self {
        Self {
            table: FoldRegionTable::from_regions(regions),
        }
    }

    /// Replace every region.
    pub fn replace_regions(&mut self, regions: impl IntoIterator<Item = FoldRegion>) {
        self.table = FoldRegionTable::from_regions(regions);
    }

    /// Current regions.
    pub fn table(&self) -> &FoldRegionTable {
        &self.table
    }
}

impl LineClassifier for StaticFoldClassifier {
    fn update(&mut self, lines: &dyn LineSource, delta: Option<&TextDelta>) {
        if let Some(delta) = delta {
            for edit in &delta.edits {
                let line_delta = edit.added_lines() as isize - edit.removed_lines() as isize;
                self.table.apply_line_delta(edit.start_line, line_delta);
            }
        }
        self.table.clamp_to_line_count(lines.line_count());
    }

    fn is_foldable(&self, line: usize) -> bool {
        self.table.region_at(line).is_some()
    }

    fn find_fold_end(&self, line: usize) -> Option<usize> {
        self.table.region_at(line).map(|r| r.end_line)
    }
}

/// Fold marker shown in the folding margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldMarker {
    /// The line does not start a region.
    None,
    /// The line starts an expanded region.
    Open,
    /// The line starts a collapsed region.
    Folded,
}

/// Per-line fold and visibility state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineState {
    /// `false` when the line is hidden inside a folded region.
    pub visible: bool,
    /// Fold mark of a region start line.
    pub folded: bool,
}

impl Default for LineState {
    fn default() -> Self {
        Self {
            visible: true,
            folded: false,
        }
    }
}

/// Side table of [`LineState`]s, one per logical line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineStates {
    states: Vec<LineState>,
}

impl LineStates {
    /// All lines visible and unfolded.
    pub fn new(line_count: usize) -> Self {
        Self {
            states: vec![LineState::default(); line_count.max(1)],
        }
    }

    /// Number of tracked lines.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if no lines are tracked.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// State of `line`.
    pub fn get(&self, line: usize) -> Option<LineState> {
        self.states.get(line).copied()
    }

    /// Returns `true` if `line` exists and is visible.
    pub fn is_visible(&self, line: usize) -> bool {
        self.states.get(line).is_some_and(|s| s.visible)
    }

    /// Returns `true` if `line` carries a fold mark.
    pub fn is_folded(&self, line: usize) -> bool {
        self.states.get(line).is_some_and(|s| s.folded)
    }

    /// Show or hide `line`.
    pub fn set_visible(&mut self, line: usize, visible: bool) {
        if let Some(state) = self.states.get_mut(line) {
            state.visible = visible;
        }
    }

    /// Set or clear the fold mark of `line`.
    pub fn set_folded(&mut self, line: usize, folded: bool) {
        if let Some(state) = self.states.get_mut(line) {
            state.folded = folded;
        }
    }

    /// Re-index the table after a text change.
    ///
    /// Each edit drops the entries of the lines whose line breaks it removed and inserts
    /// default entries for the line breaks it added, right after its start line. The table is
    /// then resized to `line_count` in case it drifted.
    pub fn apply_delta(&mut self, delta: &TextDelta, line_count: usize) {
        for edit in &delta.edits {
            let first = (edit.start_line + 1).min(self.states.len());
            let removed = edit.removed_lines().min(self.states.len() - first);
            self.states.drain(first..first + removed);
            let added = edit.added_lines();
            self.states.splice(
                first..first,
                std::iter::repeat_n(LineState::default(), added),
            );
        }
        self.states
            .resize(line_count.max(1), LineState::default());
    }

    /// Number of visible lines.
    pub fn visible_line_count(&self) -> usize {
        self.states.iter().filter(|s| s.visible).count()
    }

    /// Visible logical lines, top to bottom.
    pub fn visible_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.visible)
            .map(|(line, _)| line)
    }

    /// Logical line of the `row`-th visible line.
    pub fn visible_to_logical(&self, row: usize) -> Option<usize> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.visible)
            .nth(row)
            .map(|(line, _)| line)
    }

    /// Visible row of `line`, counting only visible lines before it.
    pub fn logical_to_visible(&self, line: usize) -> Option<usize> {
        if !self.is_visible(line) {
            return None;
        }
        Some(self.states[..line].iter().filter(|s| s.visible).count())
    }

    /// First visible line at or after `line`.
    pub fn next_visible_line(&self, line: usize) -> Option<usize> {
        (line..self.states.len()).find(|&l| self.states[l].visible)
    }

    /// First visible line at or before `line`.
    pub fn previous_visible_line(&self, line: usize) -> Option<usize> {
        let line = line.min(self.states.len().checked_sub(1)?);
        (0..=line).rev().find(|&l| self.states[l].visible)
    }

    /// Marker to draw for `line`.
    pub fn fold_marker(&self, line: usize, classifier: &dyn LineClassifier) -> FoldMarker {
        if !classifier.is_foldable(line) {
            FoldMarker::None
        } else if self.is_folded(line) {
            FoldMarker::Folded
        } else {
            FoldMarker::Open
        }
    }

    fn region_end(&self, line: usize, classifier: &dyn LineClassifier) -> usize {
        classifier
            .find_fold_end(line)
            .map_or(self.states.len(), |end| end.min(self.states.len()))
    }

    /// Fold the region starting at `line`: mark it and hide the lines strictly inside.
    ///
    /// Returns `false` when `line` is not foldable.
    pub fn fold_block(&mut self, line: usize, classifier: &dyn LineClassifier) -> bool {
        if line >= self.states.len() || !classifier.is_foldable(line) {
            return false;
        }
        let end = self.region_end(line, classifier);
        self.states[line].folded = true;
        for state in self.states.iter_mut().take(end).skip(line + 1) {
            state.visible = false;
        }
        tracing::debug!(line, end, "folded block");
        true
    }

    /// Unfold the region starting at `line`.
    ///
    /// Nested regions that are folded themselves keep their interiors hidden.
    pub fn unfold_block(&mut self, line: usize, classifier: &dyn LineClassifier) {
        if line >= self.states.len() {
            return;
        }
        self.states[line].folded = false;
        if !classifier.is_foldable(line) {
            return;
        }
        let end = self.region_end(line, classifier);
        let mut current = line + 1;
        while current < end {
            self.states[current].visible = true;
            if self.states[current].folded && classifier.is_foldable(current) {
                current = self.region_end(current, classifier).max(current + 1);
            } else {
                current += 1;
            }
        }
        tracing::debug!(line, end, "unfolded block");
    }

    /// Fold every foldable line.
    pub fn fold_all(&mut self, classifier: &dyn LineClassifier) {
        for line in 0..self.states.len() {
            if classifier.is_foldable(line) {
                self.fold_block(line, classifier);
            }
        }
    }

    /// Clear every fold mark and show every line.
    pub fn unfold_all(&mut self) {
        self.states.fill(LineState::default());
    }

    /// Lines covered by the region starting at `line`, as shown while hovering its marker.
    ///
    /// A folded region highlights only its start line.
    pub fn fold_extent(
        &self,
        line: usize,
        classifier: &dyn LineClassifier,
    ) -> Option<std::ops::RangeInclusive<usize>> {
        if line >= self.states.len() || !classifier.is_foldable(line) {
            return None;
        }
        if self.is_folded(line) {
            return Some(line..=line);
        }
        let last = self.states.len() - 1;
        let end = classifier.find_fold_end(line).map_or(last, |e| e.min(last));
        Some(line..=end.max(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn visible(states: &LineStates) -> Vec<usize> {
        (0..states.len()).filter(|&l| states.is_visible(l)).collect()
    }

    // 0 a {
    // 1   b {
    // 2     c
    // 3   }
    // 4   d
    // 5 }
    // 6 e
    fn nested() -> StaticFoldClassifier {
        StaticFoldClassifier::new([FoldRegion::new(0, 5), FoldRegion::new(1, 3)])
    }

    #[test]
    fn fold_hides_lines_strictly_inside() {
        let classifier = nested();
        let mut states = LineStates::new(7);
        assert!(states.fold_block(1, &classifier));
        assert_eq!(visible(&states), vec![0, 1, 3, 4, 5, 6]);
        assert_eq!(states.fold_marker(1, &classifier), FoldMarker::Folded);
        assert_eq!(states.fold_marker(0, &classifier), FoldMarker::Open);
        assert_eq!(states.fold_marker(2, &classifier), FoldMarker::None);
    }

    #[test]
    fn unfold_keeps_nested_folds() {
        let classifier = nested();
        let mut states = LineStates::new(7);
        states.fold_block(1, &classifier);
        states.fold_block(0, &classifier);
        assert_eq!(visible(&states), vec![0, 5, 6]);

        states.unfold_block(0, &classifier);
        assert_eq!(visible(&states), vec![0, 1, 3, 4, 5, 6]);
        assert!(states.is_folded(1));

        states.unfold_block(1, &classifier);
        assert_eq!(visible(&states), (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn fold_all_and_unfold_all() {
        let classifier = nested();
        let mut states = LineStates::new(7);
        states.fold_all(&classifier);
        assert_eq!(visible(&states), vec![0, 5, 6]);
        assert!(states.is_folded(0) && states.is_folded(1));

        states.unfold_all();
        assert_eq!(visible(&states).len(), 7);
        assert!(!states.is_folded(1));
    }

    #[test]
    fn open_ended_region_hides_to_document_end() {
        struct Open;
        impl LineClassifier for Open {
            fn is_foldable(&self, line: usize) -> bool {
                line == 1
            }
            fn find_fold_end(&self, _line: usize) -> Option<usize> {
                None
            }
        }
        let mut states = LineStates::new(4);
        states.fold_block(1, &Open);
        assert_eq!(visible(&states), vec![0, 1]);
        assert!(Open.fold_contains(1, 3));
        assert!(!Open.fold_contains(0, 3));
    }

    #[test]
    fn fold_of_non_foldable_line_is_rejected() {
        let mut states = LineStates::new(3);
        assert!(!states.fold_block(1, &NoFolding));
        assert_eq!(visible(&states).len(), 3);
    }

    #[test]
    fn apply_delta_reindexes_states() {
        use crate::delta::TextDeltaEdit;
        let mut states = LineStates::new(4);
        states.set_folded(2, true);

        // a line break inserted on line 0 shifts the mark down
        let delta = TextDelta {
            before_char_count: 0,
            after_char_count: 0,
            edits: vec![TextDeltaEdit {
                start: 0,
                start_line: 0,
                deleted_text: String::new(),
                inserted_text: "x\n".into(),
            }],
        };
        states.apply_delta(&delta, 5);
        assert!(states.is_folded(3));

        // removing lines 1..=2 pulls it back up
        let delta = TextDelta {
            before_char_count: 0,
            after_char_count: 0,
            edits: vec![TextDeltaEdit {
                start: 0,
                start_line: 0,
                deleted_text: "\n\n".into(),
                inserted_text: String::new(),
            }],
        };
        states.apply_delta(&delta, 3);
        assert!(states.is_folded(1));
        assert_eq!(states.len(), 3);
    }

    #[test]
    fn visible_row_mapping() {
        let classifier = nested();
        let mut states = LineStates::new(7);
        states.fold_block(1, &classifier);
        assert_eq!(states.visible_line_count(), 6);
        assert_eq!(states.visible_to_logical(2), Some(3));
        assert_eq!(states.logical_to_visible(4), Some(3));
        assert_eq!(states.logical_to_visible(2), None);
        assert_eq!(states.next_visible_line(2), Some(3));
        assert_eq!(states.previous_visible_line(2), Some(1));
    }

    #[test]
    fn fold_extent_for_hover() {
        let classifier = nested();
        let mut states = LineStates::new(7);
        assert_eq!(states.fold_extent(1, &classifier), Some(1..=3));
        states.fold_block(1, &classifier);
        assert_eq!(states.fold_extent(1, &classifier), Some(1..=1));
        assert_eq!(states.fold_extent(2, &classifier), None);
    }

    #[test]
    fn region_table_rejects_overlap() {
        let mut table = FoldRegionTable::new();
        assert!(table.add_region(FoldRegion::new(0, 5)));
        assert!(table.add_region(FoldRegion::new(1, 3)));
        assert!(!table.add_region(FoldRegion::new(4, 8)));
        assert!(!table.add_region(FoldRegion::new(0, 2)));
        assert!(!table.add_region(FoldRegion::new(6, 6)));
        assert_eq!(table.len(), 2);
        assert_eq!(table.innermost_containing(2), Some(&FoldRegion::new(1, 3)));
        assert!(table.remove_region(1));
        assert_eq!(table.innermost_containing(2), Some(&FoldRegion::new(0, 5)));
    }

    #[test]
    fn regions_may_share_a_boundary_line() {
        let table = FoldRegionTable::from_regions([FoldRegion::new(0, 3), FoldRegion::new(3, 6)]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn region_table_follows_line_delta() {
        let mut table = FoldRegionTable::from_regions([FoldRegion::new(2, 4), FoldRegion::new(6, 9)]);
        table.apply_line_delta(3, 2);
        assert_eq!(table.regions(), &[FoldRegion::new(2, 6), FoldRegion::new(8, 11)]);
        table.apply_line_delta(0, -1);
        assert_eq!(table.regions(), &[FoldRegion::new(1, 5), FoldRegion::new(7, 10)]);
        table.clamp_to_line_count(8);
        assert_eq!(table.regions(), &[FoldRegion::new(1, 5)]);
    }
}
