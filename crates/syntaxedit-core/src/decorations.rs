//! Highlight decorations.
//!
//! Decorations are background highlights anchored to document character offsets, published to
//! the rendering layer without modifying the text. They carry a semantic [`StyleId`]; the host
//! maps style ids to colors from its theme.
//!
//! Decorations live in layers. The published list is the concatenation of all layers in
//! ascending [`DecorationLayerId`] order, so brace-match entries come before (and take
//! precedence over) search entries.

use std::collections::BTreeMap;

/// Style identifier resolved to a color by the host.
pub type StyleId = u32;

/// Background of a matched bracket pair.
pub const BRACE_MATCH_STYLE_ID: StyleId = 0x0400_0001;
/// Background of a located but mismatched bracket pair.
pub const BRACE_MISMATCH_STYLE_ID: StyleId = 0x0400_0002;
/// Background of a live search match.
pub const SEARCH_MATCH_STYLE_ID: StyleId = 0x0400_0003;

/// A source/layer identifier for decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecorationLayerId(pub u32);

impl DecorationLayerId {
    /// Brace-match highlights (drawn on top).
    pub const BRACE_MATCH: Self = Self(1);
    /// Live search highlights.
    pub const SEARCH_RESULTS: Self = Self(2);

    /// Create a new layer id.
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// A half-open character-offset range (`start..end`) in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorationRange {
    /// Range start offset (inclusive), in Unicode scalar values (`char`) from the start of the document.
    pub start: usize,
    /// Range end offset (exclusive), in Unicode scalar values (`char`) from the start of the document.
    pub end: usize,
}

impl DecorationRange {
    /// Create a new decoration range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A coarse decoration kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DecorationKind {
    /// One bracket of a correctly matched pair.
    BraceMatch,
    /// One bracket of a mismatched pair.
    BraceMismatch,
    /// A live search match.
    SearchMatch,
}

impl DecorationKind {
    /// Built-in style of this kind.
    pub fn style_id(self) -> StyleId {
        match self {
            Self::BraceMatch => BRACE_MATCH_STYLE_ID,
            Self::BraceMismatch => BRACE_MISMATCH_STYLE_ID,
            Self::SearchMatch => SEARCH_MATCH_STYLE_ID,
        }
    }
}

/// A single decoration item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoration {
    /// Anchor range in character offsets.
    pub range: DecorationRange,
    /// A coarse decoration kind.
    pub kind: DecorationKind,
    /// Style to render the background with.
    pub style_id: StyleId,
}

impl Decoration {
    /// Decoration of `kind` with its built-in style.
    pub fn new(range: DecorationRange, kind: DecorationKind) -> Self {
        Self {
            range,
            kind,
            style_id: kind.style_id(),
        }
    }
}

/// Layered decoration storage.
#[derive(Debug, Clone, Default)]
pub struct DecorationSet {
    layers: BTreeMap<DecorationLayerId, Vec<Decoration>>,
}

impl DecorationSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of `layer`. Returns `true` if the layer changed.
    pub fn set_layer(&mut self, layer: DecorationLayerId, decorations: Vec<Decoration>) -> bool {
        let current = self.layers.get(&layer).map_or(&[][..], Vec::as_slice);
        if current == decorations.as_slice() {
            return false;
        }
        if decorations.is_empty() {
            self.layers.remove(&layer);
        } else {
            self.layers.insert(layer, decorations);
        }
        true
    }

    /// Clear `layer`. Returns `true` if it had entries.
    pub fn clear_layer(&mut self, layer: DecorationLayerId) -> bool {
        self.layers.remove(&layer).is_some()
    }

    /// Entries of `layer`.
    pub fn layer(&self, layer: DecorationLayerId) -> &[Decoration] {
        self.layers.get(&layer).map_or(&[][..], Vec::as_slice)
    }

    /// All entries in publication order.
    pub fn published(&self) -> Vec<Decoration> {
        self.layers.values().flatten().copied().collect()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
