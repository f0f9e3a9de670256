//! Unit tests for diagnostics and reporting

use core_types::{CollectingReporter, Diagnostic, DiagnosticSink, ErrorReporter, Severity, SourcePosition};

#[cfg(test)]
mod diagnostic_tests {
    use super::*;

    #[test]
    fn test_display_includes_severity() {
        let d = Diagnostic::warning("lib.js", 3, 1, "Semi-colon expected");
        assert_eq!(d.to_string(), "lib.js:3:1: WARNING - Semi-colon expected");
        assert!(!d.is_error());
    }

    #[test]
    fn test_round_trips_through_json() {
        let d = Diagnostic::error("lib.js", 1, 0, "x");
        let json = serde_json::to_string(&d).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}

#[cfg(test)]
mod sink_tests {
    use super::*;

    struct CountingReporter {
        calls: usize,
    }

    impl ErrorReporter for CountingReporter {
        fn report(&mut self, _: &str, _: u32, _: u32, _: &str, _: bool) {
            self.calls += 1;
        }
    }

    #[test]
    fn test_custom_reporter_sees_each_key_once() {
        let mut reporter = CountingReporter { calls: 0 };
        {
            let mut sink = DiagnosticSink::new("a.js", &mut reporter);
            for _ in 0..3 {
                sink.error(SourcePosition::new(1, 0, 0), "same");
            }
        }
        assert_eq!(reporter.calls, 1);
    }

    #[test]
    fn test_same_message_different_severity_is_same_key() {
        let mut reporter = CollectingReporter::new();
        {
            let mut sink = DiagnosticSink::new("a.js", &mut reporter);
            let pos = SourcePosition::new(1, 0, 0);
            sink.warning(pos, "m");
            sink.error(pos, "m");
        }
        assert_eq!(reporter.diagnostics.len(), 1);
        assert_eq!(reporter.diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn test_source_name_is_forwarded() {
        let mut reporter = CollectingReporter::new();
        {
            let mut sink = DiagnosticSink::new("dir/file.js", &mut reporter);
            assert_eq!(sink.source_name(), "dir/file.js");
            sink.error(SourcePosition::new(7, 2, 30), "boom");
        }
        assert_eq!(reporter.diagnostics[0].source_name, "dir/file.js");
        assert_eq!(reporter.diagnostics[0].line, 7);
    }
}
