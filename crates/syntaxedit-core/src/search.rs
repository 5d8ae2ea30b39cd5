//! Text search and live search highlighting.
//!
//! This module provides search APIs over a UTF-8 `&str`, using **character offsets** (not byte
//! offsets) for all public inputs/outputs. It supports:
//!
//! - plain substring search (escaped and compiled into a regex)
//! - regex search
//! - optional whole-word matching
//!
//! [`LiveSearch`] keeps the set of all matches of the current query. The set is recomputed
//! wholesale on every text change by scanning forward from the document start; the
//! [`SearchMatcher::safe_find_next`] progress rule guarantees the scan terminates even for
//! patterns that match the empty string.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Options that control how search is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchOptions {
    /// If `true`, performs a case-sensitive search.
    pub case_sensitive: bool,
    /// If `true`, matches only whole words (alphanumeric and `_`).
    pub whole_word: bool,
    /// If `true`, treats the query as a regex pattern.
    pub regex: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
            regex: false,
        }
    }
}

/// A match returned by the search APIs, expressed as a half-open character range.
///
/// Also used as the read-only scan position of a search loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchMatch {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl SearchMatch {
    /// Create a match.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of the match in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Search errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The provided regex pattern failed to compile.
    #[error("invalid regex `{pattern}`: {message}")]
    InvalidRegex {
        /// The rejected pattern.
        pattern: String,
        /// Compiler diagnostic.
        message: String,
    },
}

#[derive(Debug)]
pub(crate) struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    pub(crate) fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    pub(crate) fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.char_count());
        self.char_to_byte
            .get(clamped)
            .cloned()
            .unwrap_or(self.text_len)
    }

    pub(crate) fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) => idx,
            Err(idx) => idx,
        }
    }

    pub(crate) fn char_at(&self, text: &str, char_offset: usize) -> Option<char> {
        if char_offset >= self.char_count() {
            return None;
        }
        let start = self.char_to_byte[char_offset];
        let end = self.char_to_byte[char_offset + 1];
        text.get(start..end)?.chars().next()
    }
}

fn compile_search_regex(query: &str, options: SearchOptions) -> Result<Regex, SearchError> {
    let pattern = if options.regex {
        query.to_string()
    } else {
        regex::escape(query)
    };

    RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .multi_line(true)
        .build()
        .map_err(|err| SearchError::InvalidRegex {
            pattern: query.to_string(),
            message: err.to_string(),
        })
}

fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn is_whole_word(text: &str, index: &CharIndex, m: SearchMatch) -> bool {
    if m.is_empty() {
        return false;
    }

    let before = if m.start == 0 {
        None
    } else {
        index.char_at(text, m.start.saturating_sub(1))
    };
    let after = index.char_at(text, m.end);

    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// A compiled query.
#[derive(Debug, Clone)]
pub struct SearchMatcher {
    query: String,
    options: SearchOptions,
    regex: Regex,
}

impl SearchMatcher {
    /// Compile `query`.
    pub fn new(query: &str, options: SearchOptions) -> Result<Self, SearchError> {
        Ok(Self {
            query: query.to_string(),
            options,
            regex: compile_search_regex(query, options)?,
        })
    }

    /// The query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The search options.
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    fn find_from(&self, text: &str, index: &CharIndex, from_char: usize) -> Option<SearchMatch> {
        let mut start_char = from_char;
        loop {
            if start_char > index.char_count() {
                return None;
            }
            let m = self.regex.find_at(text, index.char_to_byte(start_char))?;
            let candidate = SearchMatch {
                start: index.byte_to_char(m.start()),
                end: index.byte_to_char(m.end()),
            };
            if self.options.whole_word && !is_whole_word(text, index, candidate) {
                start_char = candidate.start + 1;
                continue;
            }
            return Some(candidate);
        }
    }

    /// First match starting at or after `from_char`. The match may be empty.
    pub fn find_at(&self, text: &str, from_char: usize) -> Option<SearchMatch> {
        let index = CharIndex::new(text);
        self.find_from(text, &index, from_char)
    }

    fn safe_find_next_indexed(
        &self,
        text: &str,
        index: &CharIndex,
        scan: SearchMatch,
        match_first: bool,
    ) -> Option<SearchMatch> {
        let found = self.find_from(text, index, scan.end)?;
        if found == scan && !match_first {
            if scan.end >= index.char_count() {
                return None;
            }
            return self.find_from(text, index, scan.end + 1);
        }
        Some(found)
    }

    /// Next match after the scan position `scan`.
    ///
    /// Searching starts at `scan.end`. When the result is `scan` itself and this is not the
    /// first search of a scan (`match_first`), the search advances one character and retries,
    /// so a scan loop always makes progress.
    pub fn safe_find_next(&self, text: &str, scan: SearchMatch, match_first: bool) -> Option<SearchMatch> {
        let index = CharIndex::new(text);
        self.safe_find_next_indexed(text, &index, scan, match_first)
    }

    /// All non-empty matches, scanning forward from the start of `text`.
    pub fn find_all(&self, text: &str) -> Vec<SearchMatch> {
        let index = CharIndex::new(text);
        let mut matches = Vec::new();
        let mut scan = SearchMatch::default();
        let mut match_first = true;
        while let Some(found) = self.safe_find_next_indexed(text, &index, scan, match_first) {
            match_first = false;
            if !found.is_empty() {
                matches.push(found);
            }
            scan = found;
        }
        matches
    }
}

/// Live search highlighter: the query and the matches it currently has in the document.
#[derive(Debug, Clone, Default)]
pub struct LiveSearch {
    matcher: Option<SearchMatcher>,
    results: Vec<SearchMatch>,
}

impl LiveSearch {
    /// Create an inactive live search.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the query and recompute the matches over `text`.
    ///
    /// An empty query clears the search. An invalid regex is rejected and the previous query
    /// and matches stay in place.
    pub fn set_query(
        &mut self,
        text: &str,
        query: &str,
        options: SearchOptions,
    ) -> Result<(), SearchError> {
        if query.is_empty() {
            self.clear();
            return Ok(());
        }
        let matcher = SearchMatcher::new(query, options)?;
        self.matcher = Some(matcher);
        self.recompute(text);
        Ok(())
    }

    /// Drop the query and all matches.
    pub fn clear(&mut self) {
        self.matcher = None;
        self.results.clear();
    }

    /// Rescan `text` with the current query.
    pub fn recompute(&mut self, text: &str) {
        self.results = match &self.matcher {
            Some(matcher) => matcher.find_all(text),
            None => Vec::new(),
        };
        tracing::debug!(matches = self.results.len(), "live search recomputed");
    }

    /// Returns `true` while a query is set.
    pub fn is_active(&self) -> bool {
        self.matcher.is_some()
    }

    /// The current query and its options.
    pub fn query(&self) -> Option<(&str, SearchOptions)> {
        self.matcher.as_ref().map(|m| (m.query(), m.options()))
    }

    /// Current matches, ordered and disjoint.
    pub fn results(&self) -> &[SearchMatch] {
        &self.results
    }
}

/// Find the next occurrence of `query` in `text`, searching forward from `from_char`.
///
/// - Returns `Ok(None)` if no match is found (or if `query` is empty).
/// - Empty matches are skipped.
pub fn find_next(
    text: &str,
    query: &str,
    options: SearchOptions,
    from_char: usize,
) -> Result<Option<SearchMatch>, SearchError> {
    if query.is_empty() {
        return Ok(None);
    }

    let matcher = SearchMatcher::new(query, options)?;
    let index = CharIndex::new(text);

    let mut start_char = from_char.min(index.char_count());
    loop {
        let Some(candidate) = matcher.find_from(text, &index, start_char) else {
            return Ok(None);
        };
        if candidate.is_empty() {
            if candidate.end >= index.char_count() {
                return Ok(None);
            }
            start_char = candidate.end + 1;
            continue;
        }
        return Ok(Some(candidate));
    }
}

/// Find the previous occurrence of `query` in `text`, ending at or before `from_char`.
///
/// - Returns `Ok(None)` if no match is found (or if `query` is empty).
pub fn find_prev(
    text: &str,
    query: &str,
    options: SearchOptions,
    from_char: usize,
) -> Result<Option<SearchMatch>, SearchError> {
    if query.is_empty() {
        return Ok(None);
    }

    let matcher = SearchMatcher::new(query, options)?;
    let limit = from_char.min(text.chars().count());
    Ok(matcher
        .find_all(text)
        .into_iter()
        .take_while(|m| m.end <= limit)
        .last())
}

/// Find all non-empty occurrences of `query` in `text`.
pub fn find_all(
    text: &str,
    query: &str,
    options: SearchOptions,
) -> Result<Vec<SearchMatch>, SearchError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }
    Ok(SearchMatcher::new(query, options)?.find_all(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn opts(case_sensitive: bool, whole_word: bool, regex: bool) -> SearchOptions {
        SearchOptions {
            case_sensitive,
            whole_word,
            regex,
        }
    }

    #[test]
    fn live_search_finds_every_literal_match() {
        let mut live = LiveSearch::new();
        live.set_query("cat cat cat", "cat", opts(true, false, false))
            .unwrap();
        assert_eq!(
            live.results(),
            &[
                SearchMatch::new(0, 3),
                SearchMatch::new(4, 7),
                SearchMatch::new(8, 11)
            ]
        );
    }

    #[test]
    fn empty_matching_regex_terminates() {
        let mut live = LiveSearch::new();
        live.set_query("aaa", "x*", opts(true, false, true)).unwrap();
        assert!(live.results().is_empty());

        live.set_query("aaxa", "x*", opts(true, false, true)).unwrap();
        assert_eq!(live.results(), &[SearchMatch::new(2, 3)]);
    }

    #[test]
    fn safe_find_next_advances_past_scan_position() {
        let matcher = SearchMatcher::new("^", opts(true, false, true)).unwrap();
        let first = matcher.safe_find_next("ab\ncd", SearchMatch::default(), true);
        assert_eq!(first, Some(SearchMatch::new(0, 0)));
        let next = matcher.safe_find_next("ab\ncd", SearchMatch::new(0, 0), false);
        assert_eq!(next, Some(SearchMatch::new(3, 3)));
        let last = matcher.safe_find_next("ab\ncd", SearchMatch::new(5, 5), false);
        assert_eq!(last, None);
    }

    #[test]
    fn invalid_regex_keeps_previous_state() {
        let mut live = LiveSearch::new();
        live.set_query("abc abc", "abc", SearchOptions::default())
            .unwrap();
        let err = live
            .set_query("abc abc", "(", opts(true, false, true))
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidRegex { .. }));
        assert_eq!(live.results().len(), 2);
        assert_eq!(live.query().map(|(q, _)| q), Some("abc"));
    }

    #[test]
    fn whole_word_and_case() {
        let text = "cat Cat concat cat_";
        assert_eq!(
            find_all(text, "cat", opts(false, true, false)).unwrap(),
            vec![SearchMatch::new(0, 3), SearchMatch::new(4, 7)]
        );
        assert_eq!(find_all(text, "cat", opts(true, false, false)).unwrap().len(), 3);
    }

    #[test]
    fn find_next_and_prev() {
        let text = "Hello hello HELLO";
        assert_eq!(
            find_next(text, "hello", opts(true, false, false), 1).unwrap(),
            Some(SearchMatch::new(6, 11))
        );
        assert_eq!(
            find_prev(text, "hello", opts(false, false, false), 6).unwrap(),
            Some(SearchMatch::new(0, 5))
        );
        assert_eq!(find_next(text, "", SearchOptions::default(), 0).unwrap(), None);
    }

    #[test]
    fn multibyte_offsets_are_chars() {
        let text = "héllo wörld wörld";
        assert_eq!(
            find_all(text, "wörld", SearchOptions::default()).unwrap(),
            vec![SearchMatch::new(6, 11), SearchMatch::new(12, 17)]
        );
    }

    #[test]
    fn clear_empties_results() {
        let mut live = LiveSearch::new();
        live.set_query("a a", "a", SearchOptions::default()).unwrap();
        live.clear();
        assert!(!live.is_active());
        assert!(live.results().is_empty());
    }
}
