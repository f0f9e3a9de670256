//! Comment attachment
//!
//! Runs once over the finished tree. Comments are consumed in source order
//! by a pre-order walk: each node claims the comments that end before it
//! starts. Documentation comments become [`JsDocInfo`] records; in
//! [`CommentParsing::All`] mode plain comments are kept as leading and
//! trailing [`NonJsDocComment`]s.
//!
//! The walk is iterative and runs in two phases, deciding every attachment
//! on a shared borrow first and then writing the results in a single
//! mutable pass, so arbitrarily deep trees are handled.

use crate::config::{CommentParsing, Config};
use crate::lexer::{Comment, CommentKind};
use crate::node::{Node, NodeKind, NonJsDocComment};
use core_types::{DiagnosticSink, SourcePosition, Span};
use jsdoc::{merge_file_overview, parse_inline_type, parse_jsdoc, JsDocInfo, JsDocOptions};
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

/// Extracts the URL of a trailing `//# sourceMappingURL=` comment.
///
/// Only the last comment counts, and only when no code follows it.
pub(crate) fn source_map_url(comments: &[Comment], code_end: usize) -> Option<String> {
    let last = comments.last()?;
    if last.kind != CommentKind::Line || last.span.offset < code_end {
        return None;
    }
    let re = Regex::new(r"^//# sourceMappingURL=(\S+)\s*$").ok()?;
    re.captures(&last.text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Attaches comments to `root` according to the configured mode.
pub(crate) fn attach(
    root: &mut Node,
    comments: &[Comment],
    source: &str,
    config: &Config,
    sink: &mut DiagnosticSink<'_>,
) {
    if config.comment_parsing == CommentParsing::None {
        return;
    }
    let options = JsDocOptions {
        parse_documentation: config.comment_parsing == CommentParsing::All,
        closure_unaware_code_allowed: config.closure_unaware_code_allowed,
    };

    let mut queue = Vec::new();
    let mut file_doc: Option<JsDocInfo> = None;
    for comment in comments {
        match comment.kind {
            CommentKind::JsDoc => {
                let Some(info) = parse_jsdoc(&comment.text, comment.span.start(), &options, sink) else {
                    continue;
                };
                if info.is_file_level() {
                    file_doc = Some(merge_file_overview(file_doc, info));
                } else {
                    queue.push(Pending {
                        comment,
                        jsdoc: Some(info),
                    });
                }
            }
            CommentKind::Important => {
                let license = important_comment_body(&comment.text);
                let info = JsDocInfo {
                    license: Some(license),
                    ..JsDocInfo::default()
                };
                file_doc = Some(merge_file_overview(file_doc, info));
            }
            CommentKind::Line | CommentKind::Block if options.parse_documentation => {
                queue.push(Pending { comment, jsdoc: None });
            }
            _ => {}
        }
    }

    let mut walker = Walker {
        queue,
        next: 0,
        source: source.chars().collect(),
        sink,
        attachments: HashMap::new(),
        last_child: HashMap::new(),
    };
    walker.walk(root);
    let Walker { attachments, .. } = walker;
    debug!(attached = attachments.len(), "comments attached");

    let mut index = 0;
    root.visit_mut(&mut |node| {
        if let Some(attachment) = attachments.get(&index) {
            if let Some(info) = &attachment.jsdoc {
                node.jsdoc = Some(Box::new(info.clone()));
            }
            node.comment = attachment.leading.as_ref().map(CommentRun::finish);
            node.trailing_comment = attachment.trailing.as_ref().map(CommentRun::finish);
        }
        index += 1;
    });
    if let Some(info) = file_doc {
        root.jsdoc = Some(Box::new(info));
    }
}

/// Text of a `/*! ... */` comment without its delimiters.
fn important_comment_body(text: &str) -> String {
    let body = text.strip_prefix("/*!").unwrap_or(text);
    body.strip_suffix("*/").unwrap_or(body).to_string()
}

struct Pending<'c> {
    comment: &'c Comment,
    /// Parsed documentation; `None` for plain comments
    jsdoc: Option<JsDocInfo>,
}

/// Plain comments merged into one string.
#[derive(Debug, Clone)]
struct CommentRun {
    text: String,
    start: SourcePosition,
    end_offset: usize,
    end_line: u32,
    is_inline: bool,
    ends_as_line_comment: bool,
}

impl CommentRun {
    fn new(comment: &Comment) -> Self {
        CommentRun {
            text: comment.text.trim_end().to_string(),
            start: comment.span.start(),
            end_offset: comment.span.end(),
            end_line: end_line(comment),
            is_inline: false,
            ends_as_line_comment: comment.kind == CommentKind::Line,
        }
    }

    /// Appends with one newline per line crossed, or directly on the same line.
    fn push_lines(&mut self, comment: &Comment) {
        let gap = comment.span.line.saturating_sub(self.end_line);
        for _ in 0..gap {
            self.text.push('\n');
        }
        self.append(comment);
    }

    /// Appends on a new line, collapsing blank lines.
    fn push_line(&mut self, comment: &Comment) {
        self.text.push('\n');
        self.append(comment);
    }

    fn append(&mut self, comment: &Comment) {
        self.text.push_str(comment.text.trim_end());
        self.end_offset = comment.span.end();
        self.end_line = end_line(comment);
        self.ends_as_line_comment = comment.kind == CommentKind::Line;
    }

    fn finish(&self) -> NonJsDocComment {
        NonJsDocComment {
            text: self.text.clone(),
            is_inline: self.is_inline,
            ends_as_line_comment: self.ends_as_line_comment,
            span: Span::between(self.start, self.end_offset),
        }
    }
}

fn end_line(comment: &Comment) -> u32 {
    let mut line = comment.span.line;
    let mut chars = comment.text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                line += 1;
            }
            '\n' | '\u{2028}' | '\u{2029}' => line += 1,
            _ => {}
        }
    }
    line
}

#[derive(Debug, Default)]
struct Attachment {
    jsdoc: Option<JsDocInfo>,
    leading: Option<CommentRun>,
    trailing: Option<CommentRun>,
}

/// What a node does with a documentation comment that precedes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocPolicy {
    Accept,
    /// Leave it for the first child
    Defer,
    Discard,
}

/// Where a node sits in its parent.
#[derive(Debug, Clone, Copy)]
struct Context {
    parent: Option<NodeKind>,
    index: usize,
    /// Inline annotations here are bare types
    inline: bool,
}

enum Event<'n> {
    Enter(&'n Node, Context),
    Exit(&'n Node, Context, usize),
}

struct Walker<'c, 's, 'r> {
    queue: Vec<Pending<'c>>,
    next: usize,
    source: Vec<char>,
    sink: &'s mut DiagnosticSink<'r>,
    /// Decisions keyed by pre-order index
    attachments: HashMap<usize, Attachment>,
    last_child: HashMap<usize, usize>,
}

impl<'c, 's, 'r> Walker<'c, 's, 'r> {
    fn walk(&mut self, root: &Node) {
        let root_context = Context {
            parent: None,
            index: 0,
            inline: false,
        };
        let mut counter = 0usize;
        let mut parents: Vec<usize> = Vec::new();
        let mut stack = vec![Event::Enter(root, root_context)];
        while let Some(event) = stack.pop() {
            match event {
                Event::Enter(node, context) => {
                    let index = counter;
                    counter += 1;
                    if let Some(&parent) = parents.last() {
                        self.last_child.insert(parent, index);
                    }
                    if !claims_after_children(node) {
                        self.claim(node, node.span.offset, context, index);
                    }
                    parents.push(index);
                    stack.push(Event::Exit(node, context, index));
                    for (i, child) in node.children.iter().enumerate().rev() {
                        let child_context = Context {
                            parent: Some(node.kind),
                            index: i,
                            inline: child_is_inline(node.kind, context, i),
                        };
                        stack.push(Event::Enter(child, child_context));
                    }
                }
                Event::Exit(node, context, index) => {
                    parents.pop();
                    if claims_after_children(node) {
                        self.claim(node, node.span.offset, context, index);
                    }
                    self.exit(node, context, index);
                }
            }
        }
    }

    fn front(&self) -> Option<&Pending<'c>> {
        self.queue.get(self.next)
    }

    /// Takes the comments that end at or before `anchor`.
    fn claim(&mut self, node: &Node, anchor: usize, context: Context, index: usize) {
        let doc_policy = doc_policy(node, context);
        let takes_plain = takes_plain_comments(node, context);
        while let Some(pending) = self.front() {
            if pending.comment.span.end() > anchor {
                break;
            }
            let comment = pending.comment;
            if pending.jsdoc.is_some() {
                match doc_policy {
                    DocPolicy::Defer => break,
                    DocPolicy::Discard => self.next += 1,
                    DocPolicy::Accept => {
                        let parsed = self.queue[self.next].jsdoc.take();
                        self.next += 1;
                        let inline = if context.inline {
                            parse_inline_type(&comment.text, comment.span.start(), self.sink)
                        } else {
                            None
                        };
                        self.attachments.entry(index).or_default().jsdoc = inline.or(parsed);
                    }
                }
            } else {
                if !takes_plain {
                    break;
                }
                self.next += 1;
                let is_inline = !self.has_line_break(comment.span.end(), anchor);
                let attachment = self.attachments.entry(index).or_default();
                match &mut attachment.leading {
                    Some(run) => run.push_lines(comment),
                    None => attachment.leading = Some(CommentRun::new(comment)),
                }
                if let Some(run) = &mut attachment.leading {
                    run.is_inline = is_inline;
                }
            }
        }
    }

    fn exit(&mut self, node: &Node, context: Context, index: usize) {
        let end = node.span.end();
        let statement = node.kind != NodeKind::ModuleBody
            && matches!(
                context.parent,
                Some(NodeKind::Script | NodeKind::ModuleBody | NodeKind::Block | NodeKind::ClassMembers)
            );
        let list_item = matches!(context.parent, Some(NodeKind::ParamList))
            || matches!(
                context.parent,
                Some(NodeKind::Call | NodeKind::New | NodeKind::OptChainCall)
            ) && context.index > 0;

        match node.kind {
            NodeKind::Block => self.end_of_block(end, index),
            NodeKind::Script => self.end_of_file(index),
            _ => {}
        }
        if statement {
            // Plain comments left inside the statement.
            while let Some(pending) = self.front() {
                if pending.jsdoc.is_some() || pending.comment.span.end() > end {
                    break;
                }
                let comment = pending.comment;
                self.next += 1;
                self.push_trailing(index, comment, true);
            }
        }
        self.drop_docs_inside(end);
        if statement || list_item {
            self.same_line_trailing(end, index);
        }
    }

    fn end_of_block(&mut self, end: usize, index: usize) {
        let Some(&last) = self.last_child.get(&index) else {
            return;
        };
        while let Some(pending) = self.front() {
            if pending.comment.span.end() > end {
                break;
            }
            let comment = pending.comment;
            let plain = pending.jsdoc.is_none();
            self.next += 1;
            if plain {
                let attachment = self.attachments.entry(last).or_default();
                match &mut attachment.trailing {
                    Some(run) => run.push_line(comment),
                    None => {
                        let mut run = CommentRun::new(comment);
                        run.text.insert(0, '\n');
                        attachment.trailing = Some(run);
                    }
                }
            }
        }
    }

    fn end_of_file(&mut self, index: usize) {
        while let Some(pending) = self.front() {
            let comment = pending.comment;
            let plain = pending.jsdoc.is_none();
            self.next += 1;
            if plain {
                self.push_trailing(index, comment, false);
            }
        }
    }

    /// Unclaimed documentation inside a finished node never moves on.
    fn drop_docs_inside(&mut self, end: usize) {
        while let Some(pending) = self.front() {
            if pending.jsdoc.is_none() || pending.comment.span.end() > end {
                break;
            }
            self.next += 1;
        }
    }

    /// The first plain comment on the same line after `end`, separated only
    /// by whitespace, commas and semicolons.
    fn same_line_trailing(&mut self, end: usize, index: usize) {
        let Some(pending) = self.front() else {
            return;
        };
        if pending.jsdoc.is_some() || pending.comment.span.offset < end {
            return;
        }
        let comment = pending.comment;
        let gap_is_separator = self
            .source
            .get(end..comment.span.offset)
            .map_or(false, |gap| {
                gap.iter()
                    .all(|&c| c == ',' || c == ';' || (c.is_whitespace() && !is_line_break(c)))
            });
        if gap_is_separator {
            self.next += 1;
            self.push_trailing(index, comment, true);
        }
    }

    fn push_trailing(&mut self, index: usize, comment: &Comment, is_inline: bool) {
        let attachment = self.attachments.entry(index).or_default();
        match &mut attachment.trailing {
            Some(run) => run.push_lines(comment),
            None => {
                let mut run = CommentRun::new(comment);
                run.is_inline = is_inline;
                attachment.trailing = Some(run);
            }
        }
    }

    fn has_line_break(&self, from: usize, to: usize) -> bool {
        self.source
            .get(from..to)
            .map_or(false, |text| text.iter().any(|&c| is_line_break(c)))
    }
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Property accesses are positioned at the name, after their receiver.
fn claims_after_children(node: &Node) -> bool {
    matches!(node.kind, NodeKind::GetProp | NodeKind::OptChainGetProp) && !node.flags.parenthesized
}

fn doc_policy(node: &Node, context: Context) -> DocPolicy {
    if node.span.length == 0 {
        return DocPolicy::Defer;
    }
    match node.kind {
        NodeKind::Script
        | NodeKind::ModuleBody
        | NodeKind::ExprResult
        | NodeKind::Label
        | NodeKind::LabelName
        | NodeKind::Export
        | NodeKind::DefaultValue => DocPolicy::Defer,
        NodeKind::StringKey if context.parent == Some(NodeKind::ObjectPattern) => {
            if node.flags.shorthand {
                DocPolicy::Defer
            } else {
                DocPolicy::Discard
            }
        }
        _ => DocPolicy::Accept,
    }
}

fn takes_plain_comments(node: &Node, context: Context) -> bool {
    if node.span.length == 0 {
        return false;
    }
    match node.kind {
        NodeKind::Script | NodeKind::ModuleBody | NodeKind::DefaultValue => false,
        NodeKind::StringKey if context.parent == Some(NodeKind::ObjectPattern) => {
            !(node.flags.shorthand && node.first_child().map_or(false, |c| c.is(NodeKind::DefaultValue)))
        }
        _ => true,
    }
}

/// Positions where a tagless `/** T */` is a type annotation.
fn child_is_inline(parent: NodeKind, parent_context: Context, index: usize) -> bool {
    match parent {
        NodeKind::Var
        | NodeKind::Let
        | NodeKind::Const
        | NodeKind::ParamList
        | NodeKind::ArrayPattern
        | NodeKind::ObjectPattern => true,
        NodeKind::Function | NodeKind::DestructuringLhs => index == 0,
        NodeKind::DefaultValue => index == 0 && parent_context.inline,
        NodeKind::IterRest | NodeKind::ObjectRest => parent_context.inline,
        NodeKind::StringKey => parent_context.parent == Some(NodeKind::ObjectPattern),
        NodeKind::ComputedProp => index == 1 && parent_context.parent == Some(NodeKind::ObjectPattern),
        _ => false,
    }
}
