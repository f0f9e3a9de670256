//! Tag-level parsing of documentation comments.
//!
//! Problems are reported as warnings through the diagnostic sink; a bad
//! tag never prevents the rest of the comment from being read.

use core_types::{DiagnosticSink, SourcePosition};
use tracing::trace;

use crate::info::{JsDocInfo, ParamDoc, Visibility};
use crate::text::CommentText;
use crate::type_parser::{TypeParser, TypeSyntaxError, BAD_TYPE_WIKI_LINK};
use crate::TypeExpr;

/// Knobs that change what the parser keeps or reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsDocOptions {
    /// Keep descriptions and report documentation-only problems
    pub parse_documentation: bool,
    /// Whether `@closureUnaware` is permitted
    pub closure_unaware_code_allowed: bool,
}

/// Tags that are accepted but carry nothing this parser records.
const IGNORED_TAGS: &[&str] = &[
    "abstract",
    "alternateMessageId",
    "consistentIdGenerator",
    "dict",
    "example",
    "expose",
    "hidden",
    "idGenerator",
    "implicitCast",
    "inheritDoc",
    "lends",
    "meaning",
    "modifies",
    "mods",
    "ngInject",
    "noalias",
    "nocompile",
    "noinline",
    "pureOrBreakMyCode",
    "polymer",
    "polymerBehavior",
    "provideGoog",
    "since",
    "struct",
    "throws",
    "unrestricted",
    "version",
];

struct Tag {
    name: String,
    at: usize,
    body_start: usize,
    body_end: usize,
}

fn find_tags(text: &CommentText) -> (usize, Vec<Tag>) {
    let chars = &text.chars;
    let mut starts = Vec::new();
    for i in 0..chars.len() {
        let boundary = i == 0 || chars[i - 1].is_whitespace();
        let named = chars.get(i + 1).map_or(false, |c| c.is_ascii_alphabetic());
        if chars[i] == '@' && boundary && named {
            starts.push(i);
        }
    }
    let preamble_end = starts.first().copied().unwrap_or(chars.len());
    let mut tags = Vec::with_capacity(starts.len());
    for (n, &at) in starts.iter().enumerate() {
        let mut name_end = at + 1;
        while name_end < chars.len() && chars[name_end].is_ascii_alphanumeric() {
            name_end += 1;
        }
        let body_end = starts.get(n + 1).copied().unwrap_or(chars.len());
        tags.push(Tag {
            name: chars[at + 1..name_end].iter().collect(),
            at,
            body_start: name_end,
            body_end,
        });
    }
    (preamble_end, tags)
}

/// Parses a `/** ... */` comment that starts at `start` in the source.
///
/// Returns `None` for comments with no content beyond whitespace.
pub fn parse_jsdoc(
    comment: &str,
    start: SourcePosition,
    options: &JsDocOptions,
    sink: &mut DiagnosticSink<'_>,
) -> Option<JsDocInfo> {
    let text = CommentText::new(comment, start);
    if text.is_blank() {
        return None;
    }
    let (preamble_end, tags) = find_tags(&text);
    let mut info = JsDocInfo::default();
    let description = text.slice_trimmed(0, preamble_end);
    if !description.is_empty() {
        info.description = Some(description);
    }
    let mut tag_parser = TagParser {
        text: &text,
        options,
        sink,
    };
    for tag in &tags {
        tag_parser.apply(tag, &mut info);
    }
    Some(info)
}

/// Parses a tagless inline annotation such as `/** string */` as a bare
/// type. Returns `None` when the comment is blank or contains tags, in
/// which case it should be read with [`parse_jsdoc`] instead.
pub fn parse_inline_type(
    comment: &str,
    start: SourcePosition,
    sink: &mut DiagnosticSink<'_>,
) -> Option<JsDocInfo> {
    let text = CommentText::new(comment, start);
    if text.is_blank() {
        return None;
    }
    let (_, tags) = find_tags(&text);
    if !tags.is_empty() {
        return None;
    }
    let mut parser = TypeParser::new(&text, 0, text.len());
    let parsed = parser.parse_param_type().and_then(|t| {
        if parser.at_end() {
            Ok(t)
        } else {
            Err(TypeSyntaxError {
                reason: "type not recognized due to syntax error.".to_string(),
                position: text.position(parser.pos),
            })
        }
    });
    match parsed {
        Ok(t) => Some(JsDocInfo {
            type_expr: Some(t),
            inline_type: true,
            ..JsDocInfo::default()
        }),
        Err(err) => {
            sink.warning(err.position, err.message());
            Some(JsDocInfo::default())
        }
    }
}

struct TagParser<'a, 'r> {
    text: &'a CommentText,
    options: &'a JsDocOptions,
    sink: &'a mut DiagnosticSink<'r>,
}

impl<'a, 'r> TagParser<'a, 'r> {
    fn warn(&mut self, at: usize, message: impl Into<String>) {
        let pos = self.text.position(at);
        self.sink.warning(pos, message);
    }

    fn bad_type(&mut self, at: usize, reason: &str) {
        self.warn(at, format!("Bad type annotation. {}{}", reason, BAD_TYPE_WIKI_LINK));
    }

    fn starts_with_brace(&self, from: usize, to: usize) -> bool {
        self.text.chars[from..to.min(self.text.len())]
            .iter()
            .find(|c| !c.is_whitespace())
            == Some(&'{')
    }

    /// Parses `{T}` at the start of the tag body. Returns the type (if it
    /// parsed) and the index just past the braces.
    fn braced_type(&mut self, tag: &Tag) -> (Option<TypeExpr>, usize) {
        let mut parser = TypeParser::new(self.text, tag.body_start, tag.body_end);
        parser.peek();
        let open = parser.pos;
        match parser.parse_braced() {
            Ok(t) => (Some(t), parser.pos),
            Err(err) => {
                self.sink.warning(err.position, err.message());
                (None, parser.skip_braced(open))
            }
        }
    }

    /// A type that may be written with or without braces.
    fn any_type(&mut self, tag: &Tag) -> (Option<TypeExpr>, usize) {
        if self.starts_with_brace(tag.body_start, tag.body_end) {
            return self.braced_type(tag);
        }
        let mut parser = TypeParser::new(self.text, tag.body_start, tag.body_end);
        if parser.peek().is_none() {
            self.bad_type(tag.at, "type not recognized due to syntax error.");
            return (None, tag.body_end);
        }
        match parser.parse_top_level() {
            Ok(t) => (Some(t), parser.pos),
            Err(err) => {
                self.sink.warning(err.position, err.message());
                (None, tag.body_end)
            }
        }
    }

    fn optional_braced_type(&mut self, tag: &Tag) -> Option<TypeExpr> {
        if self.starts_with_brace(tag.body_start, tag.body_end) {
            self.braced_type(tag).0
        } else {
            None
        }
    }

    fn rest_text(&self, from: usize, tag: &Tag) -> Option<String> {
        let text = self.text.slice_trimmed(from, tag.body_end);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn check_type_conflict(&mut self, tag: &Tag, info: &JsDocInfo) {
        let has_signature = !info.params.is_empty() || info.return_type.is_some();
        let conflict = match tag.name.as_str() {
            "type" => has_signature,
            _ => info.type_expr.is_some() && !info.inline_type,
        };
        if conflict {
            self.warn(tag.at, "type annotation incompatible with other annotations");
        }
    }

    fn apply(&mut self, tag: &Tag, info: &mut JsDocInfo) {
        trace!(tag = %tag.name, "jsdoc tag");
        match tag.name.as_str() {
            "type" => {
                if info.type_expr.is_some() {
                    self.warn(tag.at, "extra @type tag");
                    return;
                }
                self.check_type_conflict(tag, info);
                info.type_expr = self.any_type(tag).0;
            }
            "param" => self.param(tag, info),
            "return" | "returns" => {
                self.check_type_conflict(tag, info);
                info.return_type = self.optional_braced_type(tag);
            }
            "define" => {
                info.define_type = self.any_type(tag).0;
                info.is_const = true;
            }
            "enum" => {
                info.enum_type = Some(
                    self.optional_braced_type(tag)
                        .unwrap_or_else(|| TypeExpr::named("number")),
                );
            }
            "typedef" => info.typedef_type = self.any_type(tag).0,
            "this" => info.this_type = self.any_type(tag).0,
            "extends" | "augments" => info.base_type = self.any_type(tag).0,
            "implements" => {
                if let Some(t) = self.any_type(tag).0 {
                    info.implemented_interfaces.push(t);
                }
            }
            "template" => {
                let mut from = tag.body_start;
                if self.starts_with_brace(tag.body_start, tag.body_end) {
                    from = self.braced_type(tag).1;
                }
                let names = self.text.slice_trimmed(from, tag.body_end);
                let first_line = names.lines().next().unwrap_or_default();
                for name in first_line.split(',') {
                    let name = name.trim();
                    if !name.is_empty() {
                        info.template_names.push(name.to_string());
                    }
                }
            }
            "const" | "final" => {
                info.is_const = true;
                if let Some(t) = self.optional_braced_type(tag) {
                    info.type_expr.get_or_insert(t);
                }
            }
            "constructor" => info.is_constructor = true,
            "interface" => info.is_interface = true,
            "record" => info.is_record = true,
            "export" => {
                info.is_export = true;
                if let Some(t) = self.optional_braced_type(tag) {
                    info.type_expr.get_or_insert(t);
                }
            }
            "private" | "protected" | "public" | "package" => {
                info.visibility = match tag.name.as_str() {
                    "private" => Visibility::Private,
                    "protected" => Visibility::Protected,
                    "public" => Visibility::Public,
                    _ => Visibility::Package,
                };
                if let Some(t) = self.optional_braced_type(tag) {
                    info.type_expr.get_or_insert(t);
                }
            }
            "deprecated" => {
                info.deprecated = Some(self.rest_text(tag.body_start, tag).unwrap_or_default());
            }
            "override" => info.is_override = true,
            "nosideeffects" => info.no_side_effects = true,
            "nocollapse" => info.no_collapse = true,
            "closureUnaware" => {
                if !self.options.closure_unaware_code_allowed {
                    self.warn(
                        tag.at,
                        "@closureUnaware annotation is not allowed in this compilation",
                    );
                }
                info.closure_unaware = true;
            }
            "suppress" => self.suppress(tag, info),
            "fileoverview" => {
                info.has_file_overview = true;
                info.file_overview = self.rest_text(tag.body_start, tag);
            }
            "externs" => info.is_externs = true,
            "typeSummary" => info.is_type_summary = true,
            "license" | "preserve" => {
                let body: String = self.text.chars[tag.body_start..tag.body_end].iter().collect();
                info.add_license(&body);
            }
            "see" => match self.rest_text(tag.body_start, tag) {
                Some(reference) => info.see_references.push(reference),
                None if self.options.parse_documentation => {
                    self.warn(tag.at, "@see tag missing description")
                }
                None => {}
            },
            "author" => match self.rest_text(tag.body_start, tag) {
                Some(author) => info.authors.push(author),
                None if self.options.parse_documentation => {
                    self.warn(tag.at, "@author tag missing author")
                }
                None => {}
            },
            "desc" => info.message_description = self.rest_text(tag.body_start, tag),
            name if IGNORED_TAGS.contains(&name) => {}
            name => self.warn(
                tag.at,
                format!(
                    "illegal use of unknown JSDoc tag \"{}\"; ignoring it. Place another character before the @ to stop JSCompiler from parsing it as an annotation.",
                    name
                ),
            ),
        }
    }

    fn param(&mut self, tag: &Tag, info: &mut JsDocInfo) {
        self.check_type_conflict(tag, info);
        let (type_expr, mut pos) = if self.starts_with_brace(tag.body_start, tag.body_end) {
            self.braced_type(tag)
        } else {
            (None, tag.body_start)
        };
        let text = self.text;
        let chars = &text.chars;
        while pos < tag.body_end && chars[pos].is_whitespace() {
            pos += 1;
        }
        // `[name]` and `[name=default]` mark optional parameters
        let bracketed = pos < tag.body_end && chars[pos] == '[';
        if bracketed {
            pos += 1;
        }
        let name_start = pos;
        while pos < tag.body_end
            && (chars[pos].is_alphanumeric() || matches!(chars[pos], '_' | '$' | '.'))
        {
            pos += 1;
        }
        let name: String = chars[name_start..pos].iter().collect();
        if bracketed {
            while pos < tag.body_end && chars[pos] != ']' {
                pos += 1;
            }
            pos = (pos + 1).min(tag.body_end);
        }
        if name.is_empty() {
            self.bad_type(tag.at, "expecting a variable name in a @param tag.");
            return;
        }
        let type_expr = match (type_expr, bracketed) {
            (Some(t), true) if !t.is_optional_arg() => Some(TypeExpr::Optional(Box::new(t))),
            (t, _) => t,
        };
        let description = if self.options.parse_documentation {
            self.rest_text(pos, tag)
        } else {
            None
        };
        info.params.push(ParamDoc {
            name,
            type_expr,
            description,
        });
    }

    fn suppress(&mut self, tag: &Tag, info: &mut JsDocInfo) {
        if !self.starts_with_brace(tag.body_start, tag.body_end) {
            self.warn(tag.at, "malformed @suppress tag");
            return;
        }
        let text = self.text;
        let chars = &text.chars;
        let mut pos = tag.body_start;
        while chars[pos] != '{' {
            pos += 1;
        }
        let start = pos + 1;
        let mut end = start;
        while end < tag.body_end && chars[end] != '}' {
            end += 1;
        }
        if end >= tag.body_end {
            self.warn(tag.at, "malformed @suppress tag");
            return;
        }
        let list: String = chars[start..end].iter().collect();
        for name in list.split(|c| c == ',' || c == '|') {
            let name = name.trim();
            if !name.is_empty() {
                info.add_suppression(name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::CollectingReporter;

    fn parse_with(src: &str, options: JsDocOptions) -> (Option<JsDocInfo>, CollectingReporter) {
        let mut reporter = CollectingReporter::new();
        let info = {
            let mut sink = DiagnosticSink::new("test.js", &mut reporter);
            parse_jsdoc(src, SourcePosition::new(1, 0, 0), &options, &mut sink)
        };
        (info, reporter)
    }

    fn parse(src: &str) -> (Option<JsDocInfo>, CollectingReporter) {
        parse_with(src, JsDocOptions::default())
    }

    #[test]
    fn test_blank_comment_yields_nothing() {
        assert!(parse("/** */").0.is_none());
        assert!(parse("/**\n *\n */").0.is_none());
    }

    #[test]
    fn test_description_only() {
        let (info, _) = parse("/** foo */");
        let info = info.unwrap();
        assert_eq!(info.description.as_deref(), Some("foo"));
        assert!(!info.has_type());
    }

    #[test]
    fn test_type_tag() {
        let (info, reporter) = parse("/** @type {string} */");
        assert_eq!(info.unwrap().type_expr, Some(TypeExpr::named("string")));
        assert!(reporter.diagnostics.is_empty());
    }

    #[test]
    fn test_missing_closing_angle_omits_type() {
        let (info, reporter) = parse("/** @type {Array<number} */");
        assert!(info.unwrap().type_expr.is_none());
        assert_eq!(
            reporter.warnings(),
            vec![format!("Bad type annotation. missing closing >{}", BAD_TYPE_WIKI_LINK)]
        );
    }

    #[test]
    fn test_bad_param_reports_both_problems() {
        let (_, reporter) = parse("/** @param {bool!*%E$} */");
        assert_eq!(
            reporter.warnings(),
            vec![
                format!("Bad type annotation. expected closing }}{}", BAD_TYPE_WIKI_LINK),
                format!(
                    "Bad type annotation. expecting a variable name in a @param tag.{}",
                    BAD_TYPE_WIKI_LINK
                ),
            ]
        );
    }

    #[test]
    fn test_param_with_description() {
        let options = JsDocOptions {
            parse_documentation: true,
            ..JsDocOptions::default()
        };
        let (info, _) = parse_with("/** @param {number} x the count */", options);
        let info = info.unwrap();
        assert_eq!(info.params[0].name, "x");
        assert_eq!(info.params[0].description.as_deref(), Some("the count"));
    }

    #[test]
    fn test_unknown_tag_warns() {
        let (info, reporter) = parse("/** @someillegaltag */");
        assert!(info.is_some());
        assert_eq!(
            reporter.warnings(),
            vec!["illegal use of unknown JSDoc tag \"someillegaltag\"; ignoring it. Place another character before the @ to stop JSCompiler from parsing it as an annotation."]
        );
    }

    #[test]
    fn test_fileoverview_and_suppress_on_one_line() {
        let (info, _) = parse("/** @fileoverview @suppress {const} */");
        let info = info.unwrap();
        assert!(info.has_file_overview);
        assert_eq!(info.file_overview, None);
        assert_eq!(info.suppressions, vec!["const"]);
    }

    #[test]
    fn test_fileoverview_text_is_trimmed() {
        let (info, _) = parse("/** @fileoverview Hi mom! \n */");
        assert_eq!(info.unwrap().file_overview.as_deref(), Some("Hi mom!"));
    }

    #[test]
    fn test_see_and_author_need_content_in_documentation_mode() {
        let options = JsDocOptions {
            parse_documentation: true,
            ..JsDocOptions::default()
        };
        let (_, reporter) = parse_with("/** @see */", options);
        assert_eq!(reporter.warnings(), vec!["@see tag missing description"]);
        let (_, reporter) = parse_with("/** @author */", options);
        assert_eq!(reporter.warnings(), vec!["@author tag missing author"]);
    }

    #[test]
    fn test_closure_unaware_gate() {
        let (_, reporter) = parse("/** @closureUnaware */");
        assert_eq!(
            reporter.warnings(),
            vec!["@closureUnaware annotation is not allowed in this compilation"]
        );
        let allowed = JsDocOptions {
            closure_unaware_code_allowed: true,
            ..JsDocOptions::default()
        };
        assert!(parse_with("/** @closureUnaware */", allowed).1.diagnostics.is_empty());
    }

    #[test]
    fn test_email_is_not_a_tag() {
        let (info, reporter) = parse("/** contact foo@bar.com */");
        assert!(reporter.diagnostics.is_empty());
        assert_eq!(info.unwrap().description.as_deref(), Some("contact foo@bar.com"));
    }

    #[test]
    fn test_inline_type() {
        let mut reporter = CollectingReporter::new();
        let mut sink = DiagnosticSink::new("t.js", &mut reporter);
        let start = SourcePosition::new(1, 0, 0);
        let info = parse_inline_type("/** string= */", start, &mut sink).unwrap();
        assert!(info.inline_type);
        assert!(info.type_expr.unwrap().is_optional_arg());
        assert!(parse_inline_type("/** @type {x} */", start, &mut sink).is_none());
        assert!(parse_inline_type("/**   */", start, &mut sink).is_none());
    }

    #[test]
    fn test_warning_points_into_comment() {
        let (_, reporter) = parse("/**\n * @bogus\n */");
        assert_eq!(reporter.diagnostics[0].line, 2);
        assert_eq!(reporter.diagnostics[0].column, 3);
    }
}
