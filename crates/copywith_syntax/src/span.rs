//! Source location tracking.
//!
//! Every token and declaration carries a `Span`. The expansion harness cuts
//! attributes out by byte range and reports diagnostics at the line and
//! column where the attribute starts.

use std::ops::Range;

/// A span of source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset where this span starts.
    pub start: usize,
    /// Byte offset where this span ends (exclusive).
    pub end: usize,
    /// 1-based line number where this span starts.
    pub line: u32,
    /// 1-based column number where this span starts.
    pub column: u32,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// An empty span at line 1, column 1, used for synthesized nodes.
    #[must_use]
    pub const fn at_start() -> Self {
        Self::new(0, 0, 1, 1)
    }

    /// Extends this span to the end of `other`, keeping this start position.
    #[must_use]
    pub const fn to(self, other: Self) -> Self {
        Self::new(self.start, other.end, self.line, self.column)
    }

    /// Byte range for slicing or splicing the source.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns the text this span covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range()]
    }
}
