//! Source positions, spans and line tables.
//!
//! All offsets and lengths are measured in characters (Unicode scalar
//! values), lines are 1-based and columns are 0-based.

use serde::{Deserialize, Serialize};

/// Represents a position in source code.
///
/// # Examples
///
/// ```
/// use core_types::SourcePosition;
///
/// let pos = SourcePosition {
///     line: 10,
///     column: 5,
///     offset: 150,
/// };
///
/// assert_eq!(pos.line, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourcePosition {
    /// Line number, 1-based
    pub line: u32,
    /// Column number, 0-based
    pub column: u32,
    /// Character offset from the start of the source
    pub offset: usize,
}

impl SourcePosition {
    /// Creates a position.
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        SourcePosition {
            line,
            column,
            offset,
        }
    }
}

/// A contiguous region of source text.
///
/// `line`/`column` locate the first character; `length` counts characters
/// up to the end of the region.
///
/// # Examples
///
/// ```
/// use core_types::{SourcePosition, Span};
///
/// let a = Span::new(SourcePosition::new(1, 0, 0), 3);
/// let b = Span::new(SourcePosition::new(1, 6, 6), 2);
/// let joined = a.to(b);
/// assert_eq!(joined.column, 0);
/// assert_eq!(joined.length, 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// Line of the first character, 1-based
    pub line: u32,
    /// Column of the first character, 0-based
    pub column: u32,
    /// Character offset of the first character
    pub offset: usize,
    /// Length in characters
    pub length: usize,
}

impl Span {
    /// Creates a span starting at `start` covering `length` characters.
    pub fn new(start: SourcePosition, length: usize) -> Self {
        Span {
            line: start.line,
            column: start.column,
            offset: start.offset,
            length,
        }
    }

    /// Creates a span from a start position up to (excluding) an end offset.
    pub fn between(start: SourcePosition, end_offset: usize) -> Self {
        Span::new(start, end_offset.saturating_sub(start.offset))
    }

    /// A zero-length span at `start`.
    pub fn empty_at(start: SourcePosition) -> Self {
        Span::new(start, 0)
    }

    /// Position of the first character.
    pub fn start(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column, self.offset)
    }

    /// Offset one past the last character.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// The smallest span starting at `self` and reaching the end of `other`.
    pub fn to(self, other: Span) -> Span {
        let end = self.end().max(other.end());
        Span::between(self.start(), end)
    }

    /// Returns a copy whose end is moved to `end_offset`.
    pub fn with_end(self, end_offset: usize) -> Span {
        Span::between(self.start(), end_offset)
    }
}

/// Maps character offsets to line/column positions.
#[derive(Debug, Clone)]
pub struct LineMap {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineMap {
    /// Builds the table for `source`. `\r\n`, `\r`, `\n`, U+2028 and U+2029
    /// all terminate a line.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        let mut chars = source.chars().peekable();
        let mut offset = 0;
        while let Some(c) = chars.next() {
            offset += 1;
            match c {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                        offset += 1;
                    }
                    line_starts.push(offset);
                }
                '\n' | '\u{2028}' | '\u{2029}' => line_starts.push(offset),
                _ => {}
            }
        }
        LineMap {
            line_starts,
            len: offset,
        }
    }

    /// Position of the character at `offset`. Offsets past the end clamp to
    /// the end of the source.
    pub fn position(&self, offset: usize) -> SourcePosition {
        let offset = offset.min(self.len);
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        SourcePosition {
            line: line_index as u32 + 1,
            column: (offset - self.line_starts[line_index]) as u32,
            offset,
        }
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
