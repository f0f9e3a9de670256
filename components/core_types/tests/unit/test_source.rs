//! Unit tests for SourcePosition, Span and LineMap

use core_types::{LineMap, SourcePosition, Span};

#[cfg(test)]
mod span_tests {
    use super::*;

    #[test]
    fn test_between_measures_to_end_offset() {
        let span = Span::between(SourcePosition::new(1, 2, 2), 9);
        assert_eq!(span.length, 7);
        assert_eq!(span.end(), 9);
    }

    #[test]
    fn test_between_never_underflows() {
        let span = Span::between(SourcePosition::new(1, 5, 5), 3);
        assert_eq!(span.length, 0);
    }

    #[test]
    fn test_to_keeps_start_of_receiver() {
        let left = Span::new(SourcePosition::new(4, 8, 40), 1);
        let right = Span::new(SourcePosition::new(5, 1, 50), 4);
        let joined = left.to(right);
        assert_eq!(joined.start(), SourcePosition::new(4, 8, 40));
        assert_eq!(joined.end(), 54);
    }

    #[test]
    fn test_empty_at() {
        let span = Span::empty_at(SourcePosition::new(1, 5, 5));
        assert_eq!(span.length, 0);
        assert_eq!(span.column, 5);
    }

    #[test]
    fn test_span_serializes() {
        let span = Span::new(SourcePosition::new(1, 0, 0), 2);
        let json = serde_json::to_string(&span).unwrap();
        assert_eq!(json, r#"{"line":1,"column":0,"offset":0,"length":2}"#);
    }
}

#[cfg(test)]
mod line_map_tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let map = LineMap::new("var x = 1;");
        assert_eq!(map.line_count(), 1);
        assert_eq!(map.position(4), SourcePosition::new(1, 4, 4));
    }

    #[test]
    fn test_crlf_is_one_terminator() {
        let map = LineMap::new("a\r\nb");
        assert_eq!(map.line_count(), 2);
        assert_eq!(map.position(3), SourcePosition::new(2, 0, 3));
    }

    #[test]
    fn test_paragraph_separator_breaks_lines() {
        let map = LineMap::new("a\u{2029}b");
        assert_eq!(map.position(2).line, 2);
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let map = LineMap::new("ab\ncd");
        assert_eq!(map.position(100), SourcePosition::new(2, 2, 5));
    }
}
