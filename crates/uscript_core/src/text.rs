//! Source positions and line helpers.
//!
//! Every position in the toolchain is a zero-based `(line, column)` pair where
//! the column is a byte offset into the line. There is no separate offset
//! table: span arithmetic is always `column + text.len()` on a single line.

use std::fmt;

/// A zero-based position in source text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
pub struct Position {
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based byte column within the line.
    pub column: u32,
}

impl Position {
    #[inline]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for Position {
    /// One-based, the way editors and compilers print locations.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A range between two positions, end exclusive.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct LineSpan {
    pub start: Position,
    pub end: Position,
}

impl LineSpan {
    #[inline]
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// A span that covers `length` bytes of a single line.
    #[inline]
    pub fn on_line(line: u32, column: u32, length: u32) -> Self {
        Self {
            start: Position::new(line, column),
            end: Position::new(line, column + length),
        }
    }

    /// Whether the span starts and ends on the same line.
    #[inline]
    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// Whether this span contains the given position.
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Whether the given line falls within this span, inclusive at both ends.
    #[inline]
    pub fn contains_line(&self, line: u32) -> bool {
        line >= self.start.line && line <= self.end.line
    }

    /// Return a new span covering both this span and the other.
    pub fn union(&self, other: &LineSpan) -> LineSpan {
        LineSpan {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Debug for LineSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

/// Split source text into lines without their terminators.
///
/// Both `\n` and `\r\n` end a line. A trailing terminator does not produce an
/// extra empty line, so `"a\n"` and `"a"` both yield `["a"]`.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if text.ends_with('\n') {
        lines.pop();
    }
    lines
}

/// The leading run of spaces and tabs of a line.
#[inline]
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .bytes()
        .position(|b| b != b' ' && b != b'\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// Whether a line holds nothing but whitespace.
#[inline]
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lines_handles_crlf_and_trailing_newline() {
        assert_eq!(split_lines("a\r\nb\n"), vec!["a", "b"]);
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn leading_whitespace_stops_at_first_glyph() {
        assert_eq!(leading_whitespace("\t  foo  "), "\t  ");
        assert_eq!(leading_whitespace("   "), "   ");
        assert_eq!(leading_whitespace("x"), "");
    }

    #[test]
    fn display_is_one_based() {
        assert_eq!(Position::new(0, 4).to_string(), "1:5");
    }

    #[test]
    fn span_line_queries() {
        let span = LineSpan::new(Position::new(2, 0), Position::new(5, 1));
        assert!(span.contains_line(2));
        assert!(span.contains_line(5));
        assert!(!span.contains_line(6));
        assert!(!span.is_single_line());
        assert!(LineSpan::on_line(3, 1, 4).is_single_line());
    }
}
