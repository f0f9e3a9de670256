//! Comment body with per-character source positions.

use core_types::SourcePosition;

/// The content of a `/** ... */` comment with the delimiters and the
/// leading `*` of each line removed. Every kept character remembers where
/// it came from so diagnostics point into the original file.
#[derive(Debug, Clone)]
pub(crate) struct CommentText {
    pub chars: Vec<char>,
    pub positions: Vec<SourcePosition>,
    pub end: SourcePosition,
}

impl CommentText {
    /// Strips `/**` (or `/*`) and `*/` from `comment`, which starts at
    /// `start` in the source.
    pub fn new(comment: &str, start: SourcePosition) -> Self {
        let raw: Vec<char> = comment.chars().collect();
        let mut line = start.line;
        let mut column = start.column;
        let mut offset = start.offset;

        let mut body_start = 0;
        while body_start < raw.len() && body_start < 3 && (raw[body_start] == '/' || raw[body_start] == '*') {
            body_start += 1;
        }
        let mut body_end = raw.len();
        if body_end >= body_start + 2 && raw[body_end - 2] == '*' && raw[body_end - 1] == '/' {
            body_end -= 2;
        }

        let mut chars = Vec::new();
        let mut positions = Vec::new();
        let mut at_line_start = false;
        let mut i = 0;
        while i < raw.len() {
            let c = raw[i];
            let here = SourcePosition::new(line, column, offset);
            let is_newline = matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}');
            if i >= body_start && i < body_end {
                if is_newline {
                    if !(c == '\r' && raw.get(i + 1) == Some(&'\n')) {
                        chars.push('\n');
                        positions.push(here);
                    }
                    at_line_start = true;
                } else if at_line_start && (c == ' ' || c == '\t') {
                    // indentation before the leading star
                } else if at_line_start && c == '*' {
                    at_line_start = false;
                } else {
                    at_line_start = false;
                    chars.push(c);
                    positions.push(here);
                }
            }
            offset += 1;
            if is_newline && !(c == '\r' && raw.get(i + 1) == Some(&'\n')) {
                line += 1;
                column = 0;
            } else if !is_newline {
                column += 1;
            }
            i += 1;
        }

        CommentText {
            chars,
            positions,
            end: SourcePosition::new(line, column, offset),
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn position(&self, index: usize) -> SourcePosition {
        self.positions.get(index).copied().unwrap_or(self.end)
    }

    /// Text of `[from, to)` with surrounding whitespace trimmed.
    pub fn slice_trimmed(&self, from: usize, to: usize) -> String {
        let to = to.min(self.chars.len());
        if from >= to {
            return String::new();
        }
        self.chars[from..to].iter().collect::<String>().trim().to_string()
    }

    pub fn is_blank(&self) -> bool {
        self.chars.iter().all(|c| c.is_whitespace())
    }
}
