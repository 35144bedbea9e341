//! Source positions and a byte-offset-to-line/column index.
//!
//! Scanner, parser and semantic diagnostics all report 1-based line/column
//! pairs. Rather than track line/column incrementally through every stage,
//! each stage works in byte offsets (cheap, `Copy`, comparable) and resolves
//! them to a [`Position`] only when a diagnostic is about to be rendered.

use std::ops::Range;

/// A 1-based line and column pair, as presented to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Maps byte offsets into a source string to 1-based (line, column) pairs.
///
/// Built once per source text; newline offsets are the only state kept, so
/// resolving a position is a binary search rather than a rescan.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line after the first. `newlines[i]`
    /// is the offset immediately following the i-th `\n`.
    newlines: Vec<u32>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut newlines = Vec::new();
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                newlines.push(i as u32 + 1);
            }
        }
        Self { newlines }
    }

    /// Resolve a byte offset to a 1-based line/column. Columns count UTF-8
    /// bytes between the start of the line and `offset`; this matches the
    /// scanner's own line/column tracking, which advances one column per
    /// byte consumed (CRLF's `\r` counts as its own column, same as the
    /// scanner sees it before folding the following `\n`).
    pub fn position(&self, offset: u32) -> Position {
        match self.newlines.binary_search(&offset) {
            Ok(i) | Err(i) => {
                let line = i as u32 + 1;
                let line_start = if i == 0 { 0 } else { self.newlines[i - 1] };
                Position::new(line, offset - line_start + 1)
            }
        }
    }

    pub fn range(&self, range: Range<u32>) -> (Position, Position) {
        (self.position(range.start), self.position(range.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_first_column() {
        let index = LineIndex::new("select 1;");
        assert_eq!(index.position(0), Position::new(1, 1));
    }

    #[test]
    fn advances_after_newline() {
        let index = LineIndex::new("a\nbc\ndef");
        assert_eq!(index.position(0), Position::new(1, 1));
        assert_eq!(index.position(2), Position::new(2, 1));
        assert_eq!(index.position(3), Position::new(2, 2));
        assert_eq!(index.position(5), Position::new(3, 1));
    }

    #[test]
    fn crlf_counts_cr_as_its_own_column() {
        let index = LineIndex::new("a\r\nb");
        assert_eq!(index.position(1), Position::new(1, 2)); // the \r
        assert_eq!(index.position(3), Position::new(2, 1)); // b
    }
}
