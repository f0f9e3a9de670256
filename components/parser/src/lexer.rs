//! JavaScript Lexer - tokenizes source code into tokens
//!
//! Comments never reach the token stream; they are recorded on the side in
//! source order. Lexical problems are recorded as diagnostics and scanning
//! continues with a best-effort token.

use crate::features::Feature;
use core_types::{Severity, SourcePosition, Span};
use num_bigint::BigInt;
use num_traits::{Num, ToPrimitive};

/// Reserved words of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// break
    Break,
    /// case
    Case,
    /// catch
    Catch,
    /// class
    Class,
    /// const
    Const,
    /// continue
    Continue,
    /// debugger
    Debugger,
    /// default
    Default,
    /// delete
    Delete,
    /// do
    Do,
    /// else
    Else,
    /// enum
    Enum,
    /// export
    Export,
    /// extends
    Extends,
    /// false
    False,
    /// finally
    Finally,
    /// for
    For,
    /// function
    Function,
    /// if
    If,
    /// import
    Import,
    /// in
    In,
    /// instanceof
    Instanceof,
    /// new
    New,
    /// null
    Null,
    /// return
    Return,
    /// super
    Super,
    /// switch
    Switch,
    /// this
    This,
    /// throw
    Throw,
    /// true
    True,
    /// try
    Try,
    /// typeof
    Typeof,
    /// var
    Var,
    /// void
    Void,
    /// while
    While,
    /// with
    With,
}

impl Keyword {
    /// Looks up a reserved word.
    pub fn from_name(name: &str) -> Option<Keyword> {
        let keyword = match name {
            "break" => Keyword::Break,
            "case" => Keyword::Case,
            "catch" => Keyword::Catch,
            "class" => Keyword::Class,
            "const" => Keyword::Const,
            "continue" => Keyword::Continue,
            "debugger" => Keyword::Debugger,
            "default" => Keyword::Default,
            "delete" => Keyword::Delete,
            "do" => Keyword::Do,
            "else" => Keyword::Else,
            "enum" => Keyword::Enum,
            "export" => Keyword::Export,
            "extends" => Keyword::Extends,
            "false" => Keyword::False,
            "finally" => Keyword::Finally,
            "for" => Keyword::For,
            "function" => Keyword::Function,
            "if" => Keyword::If,
            "import" => Keyword::Import,
            "in" => Keyword::In,
            "instanceof" => Keyword::Instanceof,
            "new" => Keyword::New,
            "null" => Keyword::Null,
            "return" => Keyword::Return,
            "super" => Keyword::Super,
            "switch" => Keyword::Switch,
            "this" => Keyword::This,
            "throw" => Keyword::Throw,
            "true" => Keyword::True,
            "try" => Keyword::Try,
            "typeof" => Keyword::Typeof,
            "var" => Keyword::Var,
            "void" => Keyword::Void,
            "while" => Keyword::While,
            "with" => Keyword::With,
            _ => return None,
        };
        Some(keyword)
    }

    /// Source spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Break => "break",
            Keyword::Case => "case",
            Keyword::Catch => "catch",
            Keyword::Class => "class",
            Keyword::Const => "const",
            Keyword::Continue => "continue",
            Keyword::Debugger => "debugger",
            Keyword::Default => "default",
            Keyword::Delete => "delete",
            Keyword::Do => "do",
            Keyword::Else => "else",
            Keyword::Enum => "enum",
            Keyword::Export => "export",
            Keyword::Extends => "extends",
            Keyword::False => "false",
            Keyword::Finally => "finally",
            Keyword::For => "for",
            Keyword::Function => "function",
            Keyword::If => "if",
            Keyword::Import => "import",
            Keyword::In => "in",
            Keyword::Instanceof => "instanceof",
            Keyword::New => "new",
            Keyword::Null => "null",
            Keyword::Return => "return",
            Keyword::Super => "super",
            Keyword::Switch => "switch",
            Keyword::This => "this",
            Keyword::Throw => "throw",
            Keyword::True => "true",
            Keyword::Try => "try",
            Keyword::Typeof => "typeof",
            Keyword::Var => "var",
            Keyword::Void => "void",
            Keyword::While => "while",
            Keyword::With => "with",
        }
    }
}

/// Words reserved only in strict code.
pub const STRICT_RESERVED_WORDS: [&str; 9] = [
    "implements",
    "interface",
    "let",
    "package",
    "private",
    "protected",
    "public",
    "static",
    "yield",
];

/// Words ES3 reserved for future use that later editions released.
pub const ES3_RESERVED_WORDS: [&str; 27] = [
    "abstract",
    "boolean",
    "byte",
    "char",
    "double",
    "final",
    "float",
    "goto",
    "int",
    "long",
    "native",
    "short",
    "synchronized",
    "throws",
    "transient",
    "volatile",
    "implements",
    "interface",
    "package",
    "private",
    "protected",
    "public",
    "static",
    "const",
    "enum",
    "export",
    "import",
];

/// Punctuation and operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punctuator {
    /// {
    LBrace,
    /// }
    RBrace,
    /// (
    LParen,
    /// )
    RParen,
    /// [
    LBracket,
    /// ]
    RBracket,
    /// .
    Dot,
    /// ...
    Spread,
    /// ;
    Semicolon,
    /// ,
    Comma,
    /// <
    Lt,
    /// >
    Gt,
    /// <=
    LtEq,
    /// >=
    GtEq,
    /// ==
    EqEq,
    /// !=
    NotEq,
    /// ===
    EqEqEq,
    /// !==
    NotEqEq,
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// **
    StarStar,
    /// ++
    PlusPlus,
    /// --
    MinusMinus,
    /// <<
    LtLt,
    /// >>
    GtGt,
    /// >>>
    GtGtGt,
    /// &
    And,
    /// |
    Or,
    /// ^
    Xor,
    /// !
    Bang,
    /// ~
    Tilde,
    /// &&
    AndAnd,
    /// ||
    OrOr,
    /// ??
    NullishCoalesce,
    /// ?
    Question,
    /// ?.
    OptionalChain,
    /// :
    Colon,
    /// =
    Eq,
    /// +=
    PlusEq,
    /// -=
    MinusEq,
    /// *=
    StarEq,
    /// /=
    SlashEq,
    /// %=
    PercentEq,
    /// **=
    StarStarEq,
    /// <<=
    LtLtEq,
    /// >>=
    GtGtEq,
    /// >>>=
    GtGtGtEq,
    /// &=
    AndEq,
    /// |=
    OrEq,
    /// ^=
    XorEq,
    /// &&=
    AndAndEq,
    /// ||=
    OrOrEq,
    /// ??=
    NullishCoalesceEq,
    /// =>
    Arrow,
}

impl Punctuator {
    /// Source spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Punctuator::LBrace => "{",
            Punctuator::RBrace => "}",
            Punctuator::LParen => "(",
            Punctuator::RParen => ")",
            Punctuator::LBracket => "[",
            Punctuator::RBracket => "]",
            Punctuator::Dot => ".",
            Punctuator::Spread => "...",
            Punctuator::Semicolon => ";",
            Punctuator::Comma => ",",
            Punctuator::Lt => "<",
            Punctuator::Gt => ">",
            Punctuator::LtEq => "<=",
            Punctuator::GtEq => ">=",
            Punctuator::EqEq => "==",
            Punctuator::NotEq => "!=",
            Punctuator::EqEqEq => "===",
            Punctuator::NotEqEq => "!==",
            Punctuator::Plus => "+",
            Punctuator::Minus => "-",
            Punctuator::Star => "*",
            Punctuator::Slash => "/",
            Punctuator::Percent => "%",
            Punctuator::StarStar => "**",
            Punctuator::PlusPlus => "++",
            Punctuator::MinusMinus => "--",
            Punctuator::LtLt => "<<",
            Punctuator::GtGt => ">>",
            Punctuator::GtGtGt => ">>>",
            Punctuator::And => "&",
            Punctuator::Or => "|",
            Punctuator::Xor => "^",
            Punctuator::Bang => "!",
            Punctuator::Tilde => "~",
            Punctuator::AndAnd => "&&",
            Punctuator::OrOr => "||",
            Punctuator::NullishCoalesce => "??",
            Punctuator::Question => "?",
            Punctuator::OptionalChain => "?.",
            Punctuator::Colon => ":",
            Punctuator::Eq => "=",
            Punctuator::PlusEq => "+=",
            Punctuator::MinusEq => "-=",
            Punctuator::StarEq => "*=",
            Punctuator::SlashEq => "/=",
            Punctuator::PercentEq => "%=",
            Punctuator::StarStarEq => "**=",
            Punctuator::LtLtEq => "<<=",
            Punctuator::GtGtEq => ">>=",
            Punctuator::GtGtGtEq => ">>>=",
            Punctuator::AndEq => "&=",
            Punctuator::OrEq => "|=",
            Punctuator::XorEq => "^=",
            Punctuator::AndAndEq => "&&=",
            Punctuator::OrOrEq => "||=",
            Punctuator::NullishCoalesceEq => "??=",
            Punctuator::Arrow => "=>",
        }
    }
}

/// One piece of a template literal, up to a `${` or the closing backtick.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplatePart {
    /// Escape-processed text; `None` when an escape was invalid
    pub cooked: Option<String>,
    /// Text as written, with line terminators normalized to `\n`
    pub raw: String,
    /// True when the part ends the literal
    pub tail: bool,
    /// Escape problems; reported only when the template is not tagged
    pub problems: Vec<LexDiagnostic>,
}

/// Token payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier name, escapes decoded
    Identifier(String),
    /// Reserved word
    Keyword(Keyword),
    /// `#name`, stored without the `#`
    PrivateName(String),
    /// Punctuation
    Punctuator(Punctuator),
    /// Numeric literal
    Number(f64),
    /// BigInt literal
    BigInt(BigInt),
    /// String literal, escapes decoded
    String(String),
    /// Template literal piece
    Template(TemplatePart),
    /// Regular expression literal
    RegExp {
        /// Body between the slashes
        pattern: String,
        /// Flags after the closing slash
        flags: String,
    },
    /// End of input
    Eof,
}

/// A scanned token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What was scanned
    pub kind: TokenKind,
    /// Where it was scanned
    pub span: Span,
    /// A line terminator separates this token from the previous one
    pub newline_before: bool,
    /// The identifier or keyword was spelled with unicode escapes
    pub escaped: bool,
}

impl Token {
    /// True for the given punctuator.
    pub fn is(&self, p: Punctuator) -> bool {
        self.kind == TokenKind::Punctuator(p)
    }

    /// True for the given keyword.
    pub fn is_keyword(&self, k: Keyword) -> bool {
        self.kind == TokenKind::Keyword(k)
    }

    /// True for an identifier spelled `name`.
    pub fn is_identifier(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Identifier(n) if n == name)
    }

    /// True at end of input.
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// The identifier name or keyword spelling, usable as a property name.
    pub fn identifier_name(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Identifier(name) => Some(name),
            TokenKind::Keyword(k) => Some(k.as_str()),
            _ => None,
        }
    }

    /// Position of the first character.
    pub fn start(&self) -> SourcePosition {
        self.span.start()
    }
}

/// Comment flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
    /// `/** ... */`
    JsDoc,
    /// `/*! ... */`
    Important,
    /// `#!...` on the first line
    Shebang,
    /// `<!--` or `-->` legacy markers
    Html,
}

/// A comment with its verbatim text, delimiters included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Flavour
    pub kind: CommentKind,
    /// Verbatim text
    pub text: String,
    /// Location
    pub span: Span,
}

/// A problem found while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexDiagnostic {
    /// Where it was found
    pub position: SourcePosition,
    /// Message text
    pub message: String,
    /// Error or warning
    pub severity: Severity,
}

/// Snapshot used for speculative lookahead.
#[derive(Debug, Clone, Copy)]
pub struct LexerState {
    position: usize,
    line: u32,
    column: u32,
    at_line_start: bool,
    comments: usize,
    diagnostics: usize,
    features: usize,
}

const HTML_COMMENT_WARNING: &str = "In some cases, '<!--' and '-->' are treated as a '//' for legacy reasons. Removing this from your code is safe for all browsers currently in use.";

/// Warning for a backslash-newline inside a string or template.
pub const STRING_CONTINUATION_WARNING: &str = "String continuations are not recommended. See https://google.github.io/styleguide/jsguide.html#features-strings-no-line-continuations";

const INVALID_ESCAPE: &str = "Invalid escape sequence";

/// Error or warning for legacy octal literals and escapes.
pub const OCTAL_STRICT_MESSAGE: &str = "Octal integer literals are not supported in strict mode.";

/// JavaScript lexer
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    line: u32,
    column: u32,
    strict: bool,
    at_line_start: bool,
    comments: Vec<Comment>,
    diagnostics: Vec<LexDiagnostic>,
    features: Vec<(Feature, SourcePosition)>,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: &str, strict: bool) -> Self {
        let mut lexer = Lexer {
            chars: source.chars().collect(),
            position: 0,
            line: 1,
            column: 0,
            strict,
            at_line_start: true,
            comments: Vec::new(),
            diagnostics: Vec::new(),
            features: Vec::new(),
        };
        lexer.skip_shebang();
        lexer
    }

    fn skip_shebang(&mut self) {
        if self.peek() == '#' && self.peek_next() == Some('!') {
            self.skip_line_comment(CommentKind::Shebang);
        }
    }

    /// Comments recorded so far.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Hands over the recorded comments.
    pub fn take_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.comments)
    }

    /// Drains pending diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<LexDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Drains features seen by the scanner.
    pub fn take_features(&mut self) -> Vec<(Feature, SourcePosition)> {
        std::mem::take(&mut self.features)
    }

    /// Captures the scanner state.
    pub fn save(&self) -> LexerState {
        LexerState {
            position: self.position,
            line: self.line,
            column: self.column,
            at_line_start: self.at_line_start,
            comments: self.comments.len(),
            diagnostics: self.diagnostics.len(),
            features: self.features.len(),
        }
    }

    /// Rewinds to a captured state, forgetting everything recorded since.
    pub fn restore(&mut self, state: LexerState) {
        self.position = state.position;
        self.line = state.line;
        self.column = state.column;
        self.at_line_start = state.at_line_start;
        self.comments.truncate(state.comments);
        self.diagnostics.truncate(state.diagnostics);
        self.features.truncate(state.features);
    }

    fn reset_to(&mut self, start: SourcePosition) {
        self.position = start.offset;
        self.line = start.line;
        self.column = start.column;
    }

    /// Current scanner position.
    pub fn current_position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column, self.position)
    }

    fn error(&mut self, position: SourcePosition, message: impl Into<String>) {
        self.diagnostics.push(LexDiagnostic {
            position,
            message: message.into(),
            severity: Severity::Error,
        });
    }

    fn warning(&mut self, position: SourcePosition, message: impl Into<String>) {
        self.diagnostics.push(LexDiagnostic {
            position,
            message: message.into(),
            severity: Severity::Warning,
        });
    }

    fn record(&mut self, feature: Feature, position: SourcePosition) {
        self.features.push((feature, position));
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Token {
        let newline_before = self.skip_whitespace_and_comments();
        let start = self.current_position();
        if self.is_at_end() {
            return self.finish(TokenKind::Eof, start, newline_before, false);
        }
        self.at_line_start = false;
        let ch = self.advance();
        let mut escaped = false;
        let kind = match ch {
            '(' => TokenKind::Punctuator(Punctuator::LParen),
            ')' => TokenKind::Punctuator(Punctuator::RParen),
            '{' => TokenKind::Punctuator(Punctuator::LBrace),
            '}' => TokenKind::Punctuator(Punctuator::RBrace),
            '[' => TokenKind::Punctuator(Punctuator::LBracket),
            ']' => TokenKind::Punctuator(Punctuator::RBracket),
            ';' => TokenKind::Punctuator(Punctuator::Semicolon),
            ',' => TokenKind::Punctuator(Punctuator::Comma),
            ':' => TokenKind::Punctuator(Punctuator::Colon),
            '~' => TokenKind::Punctuator(Punctuator::Tilde),
            '.' => {
                if self.peek() == '.' && self.peek_next() == Some('.') {
                    self.advance();
                    self.advance();
                    TokenKind::Punctuator(Punctuator::Spread)
                } else if self.peek().is_ascii_digit() {
                    self.scan_number(ch, start)
                } else {
                    TokenKind::Punctuator(Punctuator::Dot)
                }
            }
            '?' => {
                if self.match_char('?') {
                    if self.match_char('=') {
                        TokenKind::Punctuator(Punctuator::NullishCoalesceEq)
                    } else {
                        TokenKind::Punctuator(Punctuator::NullishCoalesce)
                    }
                } else if self.peek() == '.'
                    && !self.peek_next().map_or(false, |c| c.is_ascii_digit())
                {
                    self.advance();
                    TokenKind::Punctuator(Punctuator::OptionalChain)
                } else {
                    TokenKind::Punctuator(Punctuator::Question)
                }
            }
            '=' => {
                if self.match_char('>') {
                    TokenKind::Punctuator(Punctuator::Arrow)
                } else if self.match_char('=') {
                    if self.match_char('=') {
                        TokenKind::Punctuator(Punctuator::EqEqEq)
                    } else {
                        TokenKind::Punctuator(Punctuator::EqEq)
                    }
                } else {
                    TokenKind::Punctuator(Punctuator::Eq)
                }
            }
            '!' => {
                if self.match_char('=') {
                    if self.match_char('=') {
                        TokenKind::Punctuator(Punctuator::NotEqEq)
                    } else {
                        TokenKind::Punctuator(Punctuator::NotEq)
                    }
                } else {
                    TokenKind::Punctuator(Punctuator::Bang)
                }
            }
            '+' => {
                if self.match_char('+') {
                    TokenKind::Punctuator(Punctuator::PlusPlus)
                } else if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::PlusEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Plus)
                }
            }
            '-' => {
                if self.match_char('-') {
                    TokenKind::Punctuator(Punctuator::MinusMinus)
                } else if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::MinusEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Minus)
                }
            }
            '*' => {
                if self.match_char('*') {
                    if self.match_char('=') {
                        TokenKind::Punctuator(Punctuator::StarStarEq)
                    } else {
                        TokenKind::Punctuator(Punctuator::StarStar)
                    }
                } else if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::StarEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Star)
                }
            }
            '/' => {
                if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::SlashEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Slash)
                }
            }
            '%' => {
                if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::PercentEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Percent)
                }
            }
            '<' => {
                if self.match_char('<') {
                    if self.match_char('=') {
                        TokenKind::Punctuator(Punctuator::LtLtEq)
                    } else {
                        TokenKind::Punctuator(Punctuator::LtLt)
                    }
                } else if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::LtEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Lt)
                }
            }
            '>' => {
                if self.match_char('>') {
                    if self.match_char('>') {
                        if self.match_char('=') {
                            TokenKind::Punctuator(Punctuator::GtGtGtEq)
                        } else {
                            TokenKind::Punctuator(Punctuator::GtGtGt)
                        }
                    } else if self.match_char('=') {
                        TokenKind::Punctuator(Punctuator::GtGtEq)
                    } else {
                        TokenKind::Punctuator(Punctuator::GtGt)
                    }
                } else if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::GtEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Gt)
                }
            }
            '&' => {
                if self.match_char('&') {
                    if self.match_char('=') {
                        TokenKind::Punctuator(Punctuator::AndAndEq)
                    } else {
                        TokenKind::Punctuator(Punctuator::AndAnd)
                    }
                } else if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::AndEq)
                } else {
                    TokenKind::Punctuator(Punctuator::And)
                }
            }
            '|' => {
                if self.match_char('|') {
                    if self.match_char('=') {
                        TokenKind::Punctuator(Punctuator::OrOrEq)
                    } else {
                        TokenKind::Punctuator(Punctuator::OrOr)
                    }
                } else if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::OrEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Or)
                }
            }
            '^' => {
                if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::XorEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Xor)
                }
            }
            '`' => TokenKind::Template(self.scan_template(start)),
            '"' | '\'' => self.scan_string(ch, start),
            '#' => return self.scan_hash(start, newline_before),
            _ if ch.is_ascii_digit() => self.scan_number(ch, start),
            '\\' => {
                escaped = true;
                self.scan_escaped_identifier(start)
            }
            _ if is_id_start(ch) => {
                let (kind, had_escape) = self.scan_identifier_from(ch, start);
                escaped = had_escape;
                kind
            }
            _ => {
                self.error(
                    start,
                    format!(
                        "Character '{}' (U+{:04X}) is not a valid identifier start char",
                        ch, ch as u32
                    ),
                );
                return self.next_token_after_error(newline_before);
            }
        };
        self.finish(kind, start, newline_before, escaped)
    }

    fn next_token_after_error(&mut self, newline_before: bool) -> Token {
        let mut token = self.next_token();
        token.newline_before |= newline_before;
        token
    }

    fn finish(
        &self,
        kind: TokenKind,
        start: SourcePosition,
        newline_before: bool,
        escaped: bool,
    ) -> Token {
        Token {
            kind,
            span: Span::between(start, self.position),
            newline_before,
            escaped,
        }
    }

    fn scan_hash(&mut self, start: SourcePosition, newline_before: bool) -> Token {
        if self.peek() == '!' {
            self.error(start, "Shebang comment must be at the start of the file");
            while !self.is_at_end() && !is_line_terminator(self.peek()) {
                self.advance();
            }
            return self.next_token_after_error(newline_before);
        }
        if self.is_at_end() || !(is_id_start(self.peek()) || self.peek() == '\\') {
            self.error(start, "Invalid usage of #");
            return self.next_token_after_error(newline_before);
        }
        let name_start = self.current_position();
        let first = self.advance();
        let (kind, escaped) = if first == '\\' {
            (self.scan_escaped_identifier(name_start), true)
        } else {
            self.scan_identifier_from(first, name_start)
        };
        let kind = match kind {
            TokenKind::Keyword(k) => TokenKind::PrivateName(k.as_str().to_string()),
            TokenKind::Identifier(name) => TokenKind::PrivateName(name),
            _ => return self.next_token_after_error(newline_before),
        };
        self.finish(kind, start, newline_before, escaped)
    }

    /// Rescans a `/` or `/=` token as a regular expression literal.
    pub fn rescan_regex(&mut self, slash: &Token) -> Token {
        self.reset_to(slash.start());
        let start = self.current_position();
        self.advance();
        let mut pattern = String::new();
        let mut in_class = false;
        loop {
            if self.is_at_end() || is_line_terminator(self.peek()) {
                self.error(self.current_position(), "Expected '/' in regular expression literal");
                break;
            }
            let c = self.advance();
            match c {
                '\\' => {
                    pattern.push(c);
                    if self.is_at_end() || is_line_terminator(self.peek()) {
                        self.error(
                            self.current_position(),
                            "New line not allowed in regular expression literal",
                        );
                        break;
                    }
                    pattern.push(self.advance());
                }
                '[' => {
                    in_class = true;
                    pattern.push(c);
                }
                ']' => {
                    in_class = false;
                    pattern.push(c);
                }
                '/' if !in_class => break,
                _ => pattern.push(c),
            }
        }
        let mut flags = String::new();
        while !self.is_at_end() && is_id_continue(self.peek()) {
            flags.push(self.advance());
        }
        self.finish(
            TokenKind::RegExp { pattern, flags },
            start,
            slash.newline_before,
            false,
        )
    }

    /// Rescans a `}` token as the continuation of a template literal.
    pub fn rescan_template_continuation(&mut self, brace: &Token) -> Token {
        self.reset_to(brace.start());
        let start = self.current_position();
        self.advance();
        let part = self.scan_template(start);
        self.finish(TokenKind::Template(part), start, brace.newline_before, false)
    }

    /// Returns true when a line terminator was skipped.
    fn skip_whitespace_and_comments(&mut self) -> bool {
        let mut newline = false;
        while !self.is_at_end() {
            let c = self.peek();
            if is_line_terminator(c) {
                self.advance();
                newline = true;
                self.at_line_start = true;
            } else if is_whitespace(c) {
                self.advance();
            } else if c == '/' && self.peek_next() == Some('/') {
                self.skip_line_comment(CommentKind::Line);
            } else if c == '/' && self.peek_next() == Some('*') {
                if self.skip_block_comment() {
                    newline = true;
                    self.at_line_start = true;
                }
            } else if c == '<' && self.lookahead_is("<!--") {
                self.warning(self.current_position(), HTML_COMMENT_WARNING);
                self.skip_line_comment(CommentKind::Html);
            } else if c == '-' && self.at_line_start && self.lookahead_is("-->") {
                self.warning(self.current_position(), HTML_COMMENT_WARNING);
                self.skip_line_comment(CommentKind::Html);
            } else {
                break;
            }
        }
        newline
    }

    fn lookahead_is(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.position + i) == Some(&c))
    }

    fn skip_line_comment(&mut self, kind: CommentKind) {
        let start = self.current_position();
        while !self.is_at_end() && !is_line_terminator(self.peek()) {
            self.advance();
        }
        self.push_comment(kind, start);
    }

    /// Returns true when the comment spans a line terminator.
    fn skip_block_comment(&mut self) -> bool {
        let start = self.current_position();
        self.advance();
        self.advance();
        let mut newline = false;
        while !self.is_at_end() && !(self.peek() == '*' && self.peek_next() == Some('/')) {
            if is_line_terminator(self.peek()) {
                newline = true;
            }
            self.advance();
        }
        if self.is_at_end() {
            self.error(self.current_position(), "unterminated comment");
            return newline;
        }
        self.advance();
        self.advance();
        let length = self.position - start.offset;
        let kind = if length > 4 && self.chars[start.offset + 2] == '*' {
            CommentKind::JsDoc
        } else if length > 4 && self.chars[start.offset + 2] == '!' {
            CommentKind::Important
        } else {
            CommentKind::Block
        };
        self.push_comment(kind, start);
        newline
    }

    fn push_comment(&mut self, kind: CommentKind, start: SourcePosition) {
        let text: String = self.chars[start.offset..self.position].iter().collect();
        self.comments.push(Comment {
            kind,
            text,
            span: Span::between(start, self.position),
        });
    }

    fn scan_string(&mut self, quote: char, start: SourcePosition) -> TokenKind {
        let mut value = String::new();
        let mut continuation = false;
        loop {
            if self.is_at_end() || matches!(self.peek(), '\n' | '\r') {
                self.error(start, "Unterminated string literal");
                break;
            }
            let c = self.advance();
            if c == quote {
                break;
            }
            match c {
                '\\' => {
                    if self.is_at_end() {
                        self.error(start, "Unterminated string literal");
                        break;
                    }
                    if is_line_terminator(self.peek()) {
                        self.skip_line_terminator();
                        continuation = true;
                        continue;
                    }
                    self.scan_string_escape(&mut value, start);
                }
                '\u{2028}' | '\u{2029}' => {
                    self.record(Feature::UnescapedUnicodeLineOrParagraphSep, start);
                    value.push(c);
                }
                _ => value.push(c),
            }
        }
        if continuation {
            self.warning(start, STRING_CONTINUATION_WARNING);
            self.record(Feature::StringContinuation, start);
        }
        TokenKind::String(value)
    }

    fn scan_string_escape(&mut self, value: &mut String, start: SourcePosition) {
        let escape_pos = self.current_position();
        let next = self.advance();
        match next {
            '\'' | '"' | '`' | '\\' => value.push(next),
            'b' => value.push('\u{8}'),
            'f' => value.push('\u{c}'),
            'n' => value.push('\n'),
            'r' => value.push('\r'),
            't' => value.push('\t'),
            'v' => value.push('\u{b}'),
            'x' => match self.scan_hex_digits(2) {
                Some(code) => value.push(char::from_u32(code).unwrap_or('\u{fffd}')),
                None => self.error(self.current_position(), "Hex digit expected"),
            },
            'u' => {
                if let Some(c) = self.scan_unicode_escape_body("Hex digit expected") {
                    value.push(c);
                }
            }
            '0'..='7' => {
                if next == '0' && !self.peek().is_ascii_digit() {
                    value.push('\0');
                    return;
                }
                let mut code = next.to_digit(8).unwrap_or(0);
                let max_len = if next <= '3' { 3 } else { 2 };
                let mut len = 1;
                while len < max_len && matches!(self.peek(), '0'..='7') {
                    code = code * 8 + self.advance().to_digit(8).unwrap_or(0);
                    len += 1;
                }
                value.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                if self.strict {
                    self.error(escape_pos, OCTAL_STRICT_MESSAGE);
                } else {
                    self.warning(escape_pos, OCTAL_STRICT_MESSAGE);
                }
            }
            '/' => value.push('/'),
            _ => {
                value.push(next);
                self.warning(
                    start,
                    format!("Unnecessary escape: '\\{}' is equivalent to just '{}'", next, next),
                );
            }
        }
    }

    /// Scans after `\u`: either four hex digits or `{...}`. `bad_digit` is
    /// reported for a malformed body.
    fn scan_unicode_escape_body(&mut self, bad_digit: &str) -> Option<char> {
        if self.match_char('{') {
            if self.peek() == '}' {
                self.advance();
                self.error(self.current_position(), "Empty unicode escape");
                return None;
            }
            let mut code: u32 = 0;
            let mut overflow = false;
            while !self.is_at_end() && self.peek() != '}' {
                match self.peek().to_digit(16) {
                    Some(d) => {
                        self.advance();
                        code = match code.checked_mul(16).and_then(|c| c.checked_add(d)) {
                            Some(c) => c,
                            None => {
                                overflow = true;
                                code
                            }
                        };
                    }
                    None => {
                        self.error(self.current_position(), bad_digit);
                        return None;
                    }
                }
            }
            if !self.match_char('}') {
                self.error(self.current_position(), bad_digit);
                return None;
            }
            if overflow || code > 0x10FFFF {
                self.error(self.current_position(), "Undefined Unicode code-point");
                return None;
            }
            Some(char::from_u32(code).unwrap_or('\u{fffd}'))
        } else {
            match self.scan_hex_digits(4) {
                Some(code) => Some(char::from_u32(code).unwrap_or('\u{fffd}')),
                None => {
                    self.error(self.current_position(), bad_digit);
                    None
                }
            }
        }
    }

    fn scan_hex_digits(&mut self, count: usize) -> Option<u32> {
        let mut code = 0;
        for _ in 0..count {
            let d = self.peek().to_digit(16)?;
            self.advance();
            code = code * 16 + d;
        }
        Some(code)
    }

    fn skip_line_terminator(&mut self) {
        let first = self.advance();
        if first == '\r' && self.peek() == '\n' {
            self.advance();
        }
    }

    fn scan_template(&mut self, start: SourcePosition) -> TemplatePart {
        let mut cooked = String::new();
        let mut raw = String::new();
        let mut valid = true;
        let mut problems = Vec::new();
        let mut continuation = false;
        let tail;
        loop {
            if self.is_at_end() {
                self.error(start, "Unterminated template literal");
                tail = true;
                break;
            }
            let c = self.peek();
            if c == '`' {
                self.advance();
                tail = true;
                break;
            }
            if c == '$' && self.peek_next() == Some('{') {
                self.advance();
                self.advance();
                tail = false;
                break;
            }
            if c == '\r' {
                self.skip_line_terminator();
                cooked.push('\n');
                raw.push('\n');
                continue;
            }
            if c != '\\' {
                self.advance();
                cooked.push(c);
                raw.push(c);
                continue;
            }
            let escape_pos = self.current_position();
            self.advance();
            raw.push('\\');
            if self.is_at_end() {
                continue;
            }
            if is_line_terminator(self.peek()) {
                self.skip_line_terminator();
                raw.push('\n');
                continuation = true;
                continue;
            }
            let next = self.advance();
            raw.push(next);
            let problem = |message: String, severity: Severity| LexDiagnostic {
                position: escape_pos,
                message,
                severity,
            };
            match next {
                '\\' | '`' | '$' => cooked.push(next),
                'b' => cooked.push('\u{8}'),
                'f' => cooked.push('\u{c}'),
                'n' => cooked.push('\n'),
                'r' => cooked.push('\r'),
                't' => cooked.push('\t'),
                'v' => cooked.push('\u{b}'),
                '0' if !self.peek().is_ascii_digit() => cooked.push('\0'),
                '0'..='9' => {
                    valid = false;
                    problems.push(problem(INVALID_ESCAPE.to_string(), Severity::Error));
                }
                'x' => {
                    let digits = self.take_hex_digits_raw(2, &mut raw);
                    match digits {
                        Some(code) => cooked.push(char::from_u32(code).unwrap_or('\u{fffd}')),
                        None => {
                            valid = false;
                            problems.push(problem("Hex digit expected".to_string(), Severity::Error));
                        }
                    }
                }
                'u' => match self.take_unicode_escape_raw(&mut raw) {
                    Ok(c) => cooked.push(c),
                    Err(message) => {
                        valid = false;
                        problems.push(problem(message.to_string(), Severity::Error));
                    }
                },
                '\'' => {
                    cooked.push(next);
                    problems.push(problem(
                        "Unnecessary escape: \"\\'\" is equivalent to just \"'\"".to_string(),
                        Severity::Warning,
                    ));
                }
                _ => {
                    cooked.push(next);
                    problems.push(problem(
                        format!("Unnecessary escape: '\\{}' is equivalent to just '{}'", next, next),
                        Severity::Warning,
                    ));
                }
            }
        }
        if continuation {
            problems.push(LexDiagnostic {
                position: start,
                message: STRING_CONTINUATION_WARNING.to_string(),
                severity: Severity::Warning,
            });
        }
        TemplatePart {
            cooked: valid.then_some(cooked),
            raw,
            tail,
            problems,
        }
    }

    fn take_hex_digits_raw(&mut self, count: usize, raw: &mut String) -> Option<u32> {
        let mut code = 0;
        for _ in 0..count {
            let c = self.peek();
            let d = c.to_digit(16)?;
            self.advance();
            raw.push(c);
            code = code * 16 + d;
        }
        Some(code)
    }

    fn take_unicode_escape_raw(&mut self, raw: &mut String) -> Result<char, &'static str> {
        if self.peek() != '{' {
            let code = self
                .take_hex_digits_raw(4, raw)
                .ok_or("Hex digit expected")?;
            return Ok(char::from_u32(code).unwrap_or('\u{fffd}'));
        }
        self.advance();
        raw.push('{');
        if self.peek() == '}' {
            self.advance();
            raw.push('}');
            return Err("Empty unicode escape");
        }
        let mut code: u64 = 0;
        while !self.is_at_end() && self.peek() != '}' {
            let c = self.peek();
            let d = c.to_digit(16).ok_or("Hex digit expected")?;
            self.advance();
            raw.push(c);
            code = (code * 16 + u64::from(d)).min(u64::from(u32::MAX));
        }
        if !self.match_char('}') {
            return Err("Hex digit expected");
        }
        raw.push('}');
        let code = u32::try_from(code).map_err(|_| "Undefined Unicode code-point")?;
        if code > 0x10FFFF {
            return Err("Undefined Unicode code-point");
        }
        Ok(char::from_u32(code).unwrap_or('\u{fffd}'))
    }

    fn scan_number(&mut self, first: char, start: SourcePosition) -> TokenKind {
        if first == '0' {
            let radix = match self.peek() {
                'x' | 'X' => Some((16, "Hex")),
                'o' | 'O' => Some((8, "Octal")),
                'b' | 'B' => Some((2, "Binary")),
                _ => None,
            };
            if let Some((radix, name)) = radix {
                self.advance();
                match radix {
                    8 => self.record(Feature::OctalLiterals, start),
                    2 => self.record(Feature::BinaryLiterals, start),
                    _ => {}
                }
                if !self.peek().is_digit(radix) {
                    self.error(
                        self.current_position(),
                        format!("{} Integer Literal must contain at least one digit", name),
                    );
                }
                let digits = self.scan_digits(radix, start);
                if radix == 8 && matches!(self.peek(), '8' | '9') {
                    self.error(self.current_position(), "Invalid octal digit in octal literal.");
                    while self.peek().is_ascii_digit() {
                        self.advance();
                    }
                }
                let value = BigInt::from_str_radix(if digits.is_empty() { "0" } else { &digits }, radix)
                    .unwrap_or_default();
                if self.match_char('n') {
                    return TokenKind::BigInt(value);
                }
                return TokenKind::Number(value.to_f64().unwrap_or(f64::INFINITY));
            }
            if self.peek().is_ascii_digit() {
                return self.scan_legacy_octal(start);
            }
        }

        let mut text = String::new();
        let mut is_integer = true;
        if first == '.' {
            text.push_str("0.");
            is_integer = false;
        } else {
            text.push(first);
        }
        if first != '.' {
            text.push_str(&self.scan_digits_after_first(start));
            if self.peek() == '.' {
                self.advance();
                text.push('.');
                is_integer = false;
            }
        }
        if !is_integer && self.peek().is_ascii_digit() {
            text.push_str(&self.scan_digits(10, start));
        }
        if matches!(self.peek(), 'e' | 'E') {
            is_integer = false;
            self.advance();
            text.push('e');
            if matches!(self.peek(), '+' | '-') {
                text.push(self.advance());
            }
            if !self.peek().is_ascii_digit() {
                self.error(self.current_position(), "Exponent part must contain at least one digit");
                text.push('0');
            }
            text.push_str(&self.scan_digits(10, start));
        }
        if self.peek() == 'n' {
            self.advance();
            if !is_integer {
                self.error(start, "SyntaxError: BigInt literals must be integers");
            }
            let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
            return TokenKind::BigInt(BigInt::from_str_radix(&digits, 10).unwrap_or_default());
        }
        TokenKind::Number(text.parse::<f64>().unwrap_or(f64::NAN))
    }

    fn scan_digits_after_first(&mut self, start: SourcePosition) -> String {
        if self.peek() == '_' || self.peek().is_ascii_digit() {
            self.scan_digits(10, start)
        } else {
            String::new()
        }
    }

    /// Scans digits of `radix` with `_` separators, returning the digits alone.
    fn scan_digits(&mut self, radix: u32, start: SourcePosition) -> String {
        let mut digits = String::new();
        loop {
            let c = self.peek();
            if c.is_digit(radix) {
                digits.push(self.advance());
            } else if c == '_' {
                self.advance();
                self.record(Feature::NumericSeparator, start);
                if !self.peek().is_digit(radix) {
                    self.error(self.current_position(), "Trailing numeric separator");
                }
            } else {
                break;
            }
        }
        digits
    }

    fn scan_legacy_octal(&mut self, start: SourcePosition) -> TokenKind {
        let mut digits = String::from("0");
        while self.peek().is_ascii_digit() {
            digits.push(self.advance());
        }
        let is_octal = digits.chars().all(|c| c.is_digit(8));
        if self.peek() == '.' && !is_octal {
            self.advance();
            digits.push('.');
            while self.peek().is_ascii_digit() {
                digits.push(self.advance());
            }
        }
        if self.peek() == 'n' {
            self.advance();
            self.error(self.current_position(), "SyntaxError: nonzero BigInt can't have leading zero");
            return TokenKind::BigInt(BigInt::from_str_radix(&digits, 10).unwrap_or_default());
        }
        if !is_octal {
            return TokenKind::Number(digits.parse::<f64>().unwrap_or(f64::NAN));
        }
        if self.strict {
            self.error(start, OCTAL_STRICT_MESSAGE);
        } else {
            self.warning(start, OCTAL_STRICT_MESSAGE);
        }
        let value = BigInt::from_str_radix(&digits, 8).unwrap_or_default();
        TokenKind::Number(value.to_f64().unwrap_or(f64::INFINITY))
    }

    /// Continues an identifier whose first character was `first`.
    fn scan_identifier_from(&mut self, first: char, start: SourcePosition) -> (TokenKind, bool) {
        let mut name = String::new();
        name.push(first);
        match self.scan_identifier_rest(&mut name) {
            Some(escaped) => (self.classify_identifier(name), escaped),
            None => (self.recover_identifier(start), true),
        }
    }

    /// Scans an identifier that starts with an escape; the `\` is consumed.
    fn scan_escaped_identifier(&mut self, start: SourcePosition) -> TokenKind {
        if !self.match_char('u') {
            self.error(self.current_position(), INVALID_ESCAPE);
            return self.recover_identifier(start);
        }
        let Some(first) = self.scan_unicode_escape_body(INVALID_ESCAPE) else {
            return self.recover_identifier(start);
        };
        if !is_id_start(first) {
            self.error(
                start,
                format!(
                    "Character '{}' (U+{:04X}) is not a valid identifier start char",
                    first, first as u32
                ),
            );
            return self.recover_identifier(start);
        }
        let mut name = String::new();
        name.push(first);
        match self.scan_identifier_rest(&mut name) {
            Some(_) => self.classify_identifier(name),
            None => self.recover_identifier(start),
        }
    }

    /// After a reported bad escape, swallows the rest of the word and
    /// stands in its raw text as the name so the parser does not report
    /// the same spot twice.
    fn recover_identifier(&mut self, start: SourcePosition) -> TokenKind {
        while !self.is_at_end() && (is_id_continue(self.peek()) || self.peek() == '\\') {
            self.advance();
        }
        let raw: String = self.chars[start.offset..self.position].iter().collect();
        TokenKind::Identifier(raw)
    }

    /// Returns `Some(had_escape)`, or `None` after reporting a bad escape.
    fn scan_identifier_rest(&mut self, name: &mut String) -> Option<bool> {
        let mut had_escape = false;
        loop {
            let c = self.peek();
            if !self.is_at_end() && is_id_continue(c) {
                name.push(self.advance());
            } else if c == '\\' {
                self.advance();
                had_escape = true;
                if !self.match_char('u') {
                    self.error(self.current_position(), INVALID_ESCAPE);
                    return None;
                }
                let decoded = self.scan_unicode_escape_body(INVALID_ESCAPE)?;
                if !is_id_continue(decoded) {
                    self.error(self.current_position(), INVALID_ESCAPE);
                    return None;
                }
                name.push(decoded);
            } else {
                return Some(had_escape);
            }
        }
    }

    fn classify_identifier(&self, name: String) -> TokenKind {
        match Keyword::from_name(&name) {
            Some(k) => TokenKind::Keyword(k),
            None => TokenKind::Identifier(name),
        }
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.position]
        }
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    /// Consumes one character, keeping line and column current. `\r\n`
    /// counts as a single line break.
    fn advance(&mut self) -> char {
        let ch = self.chars[self.position];
        self.position += 1;
        match ch {
            '\n' | '\u{2028}' | '\u{2029}' => {
                self.line += 1;
                self.column = 0;
            }
            '\r' if self.peek() != '\n' => {
                self.line += 1;
                self.column = 0;
            }
            _ => self.column += 1,
        }
        ch
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.chars[self.position] != expected {
            false
        } else {
            self.advance();
            true
        }
    }
}

/// Check if character is a line terminator (LF, CR, LS or PS)
pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{00A0}'
            | '\u{FEFF}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// Check if a character can start an identifier.
pub fn is_id_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphabetic() || is_other_id_start(ch)
}

/// Characters with Other_ID_Start property
fn is_other_id_start(ch: char) -> bool {
    matches!(ch, '\u{2118}' | '\u{212E}' | '\u{309B}' | '\u{309C}')
}

/// Check if a character can continue an identifier.
pub fn is_id_continue(ch: char) -> bool {
    is_id_start(ch)
        || ch.is_alphanumeric()
        || ch == '\u{200C}'
        || ch == '\u{200D}'
        || matches!(ch, '\u{00B7}' | '\u{0387}' | '\u{1369}'..='\u{1371}' | '\u{19DA}')
        || is_combining_mark(ch)
}

/// Combining marks and connector punctuation commonly found in identifiers.
fn is_combining_mark(ch: char) -> bool {
    matches!(ch,
        '\u{0300}'..='\u{036F}' |
        '\u{0483}'..='\u{0487}' |
        '\u{0591}'..='\u{05BD}' |
        '\u{0610}'..='\u{061A}' |
        '\u{064B}'..='\u{065F}' |
        '\u{0900}'..='\u{0903}' |
        '\u{093A}'..='\u{094F}' |
        '\u{1AB0}'..='\u{1AFF}' |
        '\u{1DC0}'..='\u{1DFF}' |
        '\u{20D0}'..='\u{20FF}' |
        '\u{203F}' | '\u{2040}' | '\u{2054}' |
        '\u{FE00}'..='\u{FE0F}' |
        '\u{FE20}'..='\u{FE2F}' |
        '\u{FE33}' | '\u{FE34}' | '\u{FE4D}'..='\u{FE4F}' | '\u{FF3F}'
    )
}
