//! Source positions for parsed SFC nodes.

use text_size::{TextRange, TextSize};

/// A span representing a range in the `.vue` source.
///
/// Spans are half-open intervals `[start, end)` represented as byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// The start byte offset (inclusive).
    pub start: TextSize,
    /// The end byte offset (exclusive).
    pub end: TextSize,
}

impl Span {
    /// Creates a new span from start and end byte offsets.
    #[inline]
    pub fn new(start: impl Into<TextSize>, end: impl Into<TextSize>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Creates an empty span at the given offset.
    #[inline]
    pub fn empty(offset: impl Into<TextSize>) -> Self {
        let offset = offset.into();
        Self {
            start: offset,
            end: offset,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the slice of `source` covered by this span.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        let range: TextRange = (*self).into();
        source.get(std::ops::Range::<usize>::from(range)).unwrap_or("")
    }
}

impl From<Span> for TextRange {
    fn from(span: Span) -> Self {
        TextRange::new(span.start, span.end)
    }
}

/// A 0-indexed line and column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Maps byte offsets to line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// `line_starts[i]` is the offset where line `i` begins.
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    /// Creates a new line index from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        for (offset, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(TextSize::from((offset + 1) as u32));
            }
        }
        Self { line_starts }
    }

    /// Converts a byte offset to a line/column position.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        let line_start = self.line_starts[line];
        LineCol {
            line: line as u32,
            col: u32::from(offset) - u32::from(line_start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_slice() {
        let source = "<template><div/></template>";
        let span = Span::new(10u32, 16u32);
        assert_eq!(span.slice(source), "<div/>");
        assert_eq!(Span::new(40u32, 50u32).slice(source), "");
    }

    #[test]
    fn test_line_col() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.line_col(TextSize::from(0)), LineCol { line: 0, col: 0 });
        assert_eq!(index.line_col(TextSize::from(4)), LineCol { line: 1, col: 1 });
        assert_eq!(index.line_col(TextSize::from(6)), LineCol { line: 2, col: 0 });
        assert_eq!(index.line_col(TextSize::from(8)), LineCol { line: 3, col: 1 });
    }
}
