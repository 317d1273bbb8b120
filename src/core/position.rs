/*!
# Source position types (Position, Span, LineIndex)

Location types shared by the lexer, the syntax tree and the indent engine.
Lines are 1-based, columns are 0-based and counted in characters, offsets
are byte offsets into the source text.
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Position in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }

    pub fn start() -> Self {
        Self::new(1, 0, 0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column + 1)
    }
}

/// Span in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

/// Line index for fast offset->(line,column) mapping.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offsets where each line starts.
    line_starts: Arc<Vec<usize>>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = Vec::with_capacity(text.len() / 32 + 1);
        starts.push(0usize);
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        Self { line_starts: Arc::new(starts) }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset of the first character of a 1-based line.
    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts[line - 1]
    }

    pub fn to_position(&self, text: &str, offset: usize) -> Position {
        // Binary search for the last line start <= offset
        let starts = &self.line_starts;
        let mut lo = 0usize;
        let mut hi = starts.len();
        while lo + 1 < hi {
            let mid = (lo + hi) / 2;
            if starts[mid] <= offset {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let line_start = starts[lo];
        let column = text[line_start..offset].chars().count();
        Position::new(lo + 1, column, offset)
    }

    pub fn span(&self, text: &str, range: Range<usize>) -> Span {
        Span::new(self.to_position(text, range.start), self.to_position(text, range.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index_basic() {
        let text = "line1\nline2\nlast";
        let idx = LineIndex::new(text);
        assert_eq!(idx.line_count(), 3);
        let p = idx.to_position(text, 7); // 'i' in line2
        assert_eq!(p.line, 2);
        assert_eq!(p.column, 1);
    }

    #[test]
    fn test_columns_count_characters() {
        let text = "é = 1;\n\tb";
        let idx = LineIndex::new(text);
        let eq = text.find('=').unwrap();
        assert_eq!(idx.to_position(text, eq).column, 2);
        let b = text.find('b').unwrap();
        assert_eq!(idx.to_position(text, b), Position::new(2, 1, b));
    }

    #[test]
    fn test_span_to_lines() {
        let text = "ab\ncd"; // offsets: a=0 b=1 \n=2 c=3 d=4
        let idx = LineIndex::new(text);
        let span = idx.span(text, 1..4);
        assert_eq!(span.start.line, 1);
        assert_eq!(span.end.line, 2);
        assert!(!span.is_single_line());
    }
}
