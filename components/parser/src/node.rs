//! Abstract Syntax Tree node definitions
//!
//! The tree is uniform: every node has a [`NodeKind`], an optional literal
//! [`Payload`], an owned list of children, a source [`Span`] and a set of
//! independent [`NodeFlags`]. Documentation and plain comments are attached
//! as optional side fields.

use core_types::Span;
use jsdoc::JsDocInfo;
use num_bigint::BigInt;
use std::fmt::{self, Write};

/// Node categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum NodeKind {
    // Program structure
    Script,
    ModuleBody,
    Block,
    Empty,

    // Statements
    Var,
    Let,
    Const,
    ExprResult,
    If,
    Do,
    While,
    For,
    ForIn,
    ForOf,
    ForAwaitOf,
    Continue,
    Break,
    Return,
    With,
    Switch,
    Case,
    DefaultCase,
    Label,
    LabelName,
    Throw,
    Try,
    Catch,
    Debugger,

    // Functions and classes
    Function,
    ParamList,
    Class,
    ClassMembers,
    MemberFunctionDef,
    GetterDef,
    SetterDef,
    MemberFieldDef,
    ComputedProp,
    ComputedFieldDef,

    // Modules
    Import,
    ImportSpecs,
    ImportSpec,
    ImportStar,
    Export,
    ExportSpecs,
    ExportSpec,

    // Primaries
    Name,
    Number,
    BigInt,
    String,
    TemplateLit,
    TemplateLitString,
    TemplateLitSub,
    TaggedTemplateLit,
    RegExp,
    True,
    False,
    Null,
    This,
    Super,
    NewTarget,
    ImportMeta,
    DynamicImport,

    // Literals and patterns
    ArrayLit,
    ObjectLit,
    StringKey,
    ObjectSpread,
    Spread,
    ArrayPattern,
    ObjectPattern,
    DefaultValue,
    ObjectRest,
    IterRest,
    DestructuringLhs,

    // Access and calls
    GetProp,
    GetElem,
    OptChainGetProp,
    OptChainGetElem,
    Call,
    OptChainCall,
    New,

    // Operators
    Hook,
    Comma,
    Assign,
    AssignAdd,
    AssignSub,
    AssignMul,
    AssignDiv,
    AssignMod,
    AssignExponent,
    AssignLsh,
    AssignRsh,
    AssignUrsh,
    AssignBitAnd,
    AssignBitOr,
    AssignBitXor,
    AssignAnd,
    AssignOr,
    AssignCoalesce,
    Or,
    And,
    Coalesce,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    Sheq,
    Shne,
    Lt,
    Gt,
    Le,
    Ge,
    InstanceOf,
    In,
    Lsh,
    Rsh,
    Ursh,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exponent,
    Not,
    BitNot,
    Pos,
    Neg,
    TypeOf,
    Void,
    DelProp,
    Inc,
    Dec,
    Yield,
    Await,
}

impl NodeKind {
    /// Conventional upper-case name, as used in tree dumps.
    pub fn name(self) -> &'static str {
        use NodeKind::*;
        match self {
            Script => "SCRIPT",
            ModuleBody => "MODULE_BODY",
            Block => "BLOCK",
            Empty => "EMPTY",
            Var => "VAR",
            Let => "LET",
            Const => "CONST",
            ExprResult => "EXPR_RESULT",
            If => "IF",
            Do => "DO",
            While => "WHILE",
            For => "FOR",
            ForIn => "FOR_IN",
            ForOf => "FOR_OF",
            ForAwaitOf => "FOR_AWAIT_OF",
            Continue => "CONTINUE",
            Break => "BREAK",
            Return => "RETURN",
            With => "WITH",
            Switch => "SWITCH",
            Case => "CASE",
            DefaultCase => "DEFAULT_CASE",
            Label => "LABEL",
            LabelName => "LABEL_NAME",
            Throw => "THROW",
            Try => "TRY",
            Catch => "CATCH",
            Debugger => "DEBUGGER",
            Function => "FUNCTION",
            ParamList => "PARAM_LIST",
            Class => "CLASS",
            ClassMembers => "CLASS_MEMBERS",
            MemberFunctionDef => "MEMBER_FUNCTION_DEF",
            GetterDef => "GETTER_DEF",
            SetterDef => "SETTER_DEF",
            MemberFieldDef => "MEMBER_FIELD_DEF",
            ComputedProp => "COMPUTED_PROP",
            ComputedFieldDef => "COMPUTED_FIELD_DEF",
            Import => "IMPORT",
            ImportSpecs => "IMPORT_SPECS",
            ImportSpec => "IMPORT_SPEC",
            ImportStar => "IMPORT_STAR",
            Export => "EXPORT",
            ExportSpecs => "EXPORT_SPECS",
            ExportSpec => "EXPORT_SPEC",
            Name => "NAME",
            NodeKind::Number => "NUMBER",
            NodeKind::BigInt => "BIGINT",
            NodeKind::String => "STRINGLIT",
            TemplateLit => "TEMPLATELIT",
            TemplateLitString => "TEMPLATELIT_STRING",
            TemplateLitSub => "TEMPLATELIT_SUB",
            TaggedTemplateLit => "TAGGED_TEMPLATELIT",
            RegExp => "REGEXP",
            True => "TRUE",
            False => "FALSE",
            Null => "NULL",
            This => "THIS",
            Super => "SUPER",
            NewTarget => "NEW_TARGET",
            ImportMeta => "IMPORT_META",
            DynamicImport => "DYNAMIC_IMPORT",
            ArrayLit => "ARRAYLIT",
            ObjectLit => "OBJECTLIT",
            StringKey => "STRING_KEY",
            ObjectSpread => "OBJECT_SPREAD",
            Spread => "SPREAD",
            ArrayPattern => "ARRAY_PATTERN",
            ObjectPattern => "OBJECT_PATTERN",
            DefaultValue => "DEFAULT_VALUE",
            ObjectRest => "OBJECT_REST",
            IterRest => "ITER_REST",
            DestructuringLhs => "DESTRUCTURING_LHS",
            GetProp => "GETPROP",
            GetElem => "GETELEM",
            OptChainGetProp => "OPTCHAIN_GETPROP",
            OptChainGetElem => "OPTCHAIN_GETELEM",
            Call => "CALL",
            OptChainCall => "OPTCHAIN_CALL",
            New => "NEW",
            Hook => "HOOK",
            Comma => "COMMA",
            Assign => "ASSIGN",
            AssignAdd => "ASSIGN_ADD",
            AssignSub => "ASSIGN_SUB",
            AssignMul => "ASSIGN_MUL",
            AssignDiv => "ASSIGN_DIV",
            AssignMod => "ASSIGN_MOD",
            AssignExponent => "ASSIGN_EXPONENT",
            AssignLsh => "ASSIGN_LSH",
            AssignRsh => "ASSIGN_RSH",
            AssignUrsh => "ASSIGN_URSH",
            AssignBitAnd => "ASSIGN_BITAND",
            AssignBitOr => "ASSIGN_BITOR",
            AssignBitXor => "ASSIGN_BITXOR",
            AssignAnd => "ASSIGN_AND",
            AssignOr => "ASSIGN_OR",
            AssignCoalesce => "ASSIGN_COALESCE",
            Or => "OR",
            And => "AND",
            Coalesce => "COALESCE",
            BitOr => "BITOR",
            BitXor => "BITXOR",
            BitAnd => "BITAND",
            Eq => "EQ",
            Ne => "NE",
            Sheq => "SHEQ",
            Shne => "SHNE",
            Lt => "LT",
            Gt => "GT",
            Le => "LE",
            Ge => "GE",
            InstanceOf => "INSTANCEOF",
            In => "IN",
            Lsh => "LSH",
            Rsh => "RSH",
            Ursh => "URSH",
            Add => "ADD",
            Sub => "SUB",
            Mul => "MUL",
            Div => "DIV",
            Mod => "MOD",
            Exponent => "EXPONENT",
            Not => "NOT",
            BitNot => "BITNOT",
            Pos => "POS",
            Neg => "NEG",
            TypeOf => "TYPEOF",
            Void => "VOID",
            DelProp => "DELPROP",
            Inc => "INC",
            Dec => "DEC",
            Yield => "YIELD",
            Await => "AWAIT",
        }
    }

    /// True for `=` and the compound assignment operators.
    pub fn is_assignment_op(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Assign
                | AssignAdd
                | AssignSub
                | AssignMul
                | AssignDiv
                | AssignMod
                | AssignExponent
                | AssignLsh
                | AssignRsh
                | AssignUrsh
                | AssignBitAnd
                | AssignBitOr
                | AssignBitXor
                | AssignAnd
                | AssignOr
                | AssignCoalesce
        )
    }

    /// True for `var`, `let` and `const`.
    pub fn is_declaration(self) -> bool {
        matches!(self, NodeKind::Var | NodeKind::Let | NodeKind::Const)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Literal value carried by leaf nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    /// No value
    #[default]
    None,
    /// Names, strings, property names and labels
    Str(String),
    /// Numeric literals
    Number(f64),
    /// BigInt literals
    BigInt(BigInt),
    /// Template literal text; `cooked` is absent after an invalid escape
    Template {
        /// Escape-processed text
        cooked: Option<String>,
        /// Text as written
        raw: String,
    },
}

/// Independent boolean decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub struct NodeFlags {
    pub parenthesized: bool,
    pub trailing_comma: bool,
    pub is_static: bool,
    pub optional_chain_start: bool,
    pub free_call: bool,
    pub generator: bool,
    pub is_async: bool,
    pub arrow: bool,
    pub yield_all: bool,
    pub shorthand: bool,
    pub quoted: bool,
    pub postfix: bool,
    pub export_default: bool,
    pub export_all_from: bool,
    pub getter: bool,
    pub setter: bool,
}

/// A plain comment attached to a node when all comments are parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonJsDocComment {
    /// Comment text; merged comments are joined with newlines
    pub text: String,
    /// True for a comment that shares a line with code on both sides
    pub is_inline: bool,
    /// True when the last merged comment is a `//` comment
    pub ends_as_line_comment: bool,
    /// Source range covered by the merged comments
    pub span: Span,
}

/// An AST node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Category
    pub kind: NodeKind,
    /// Literal value
    pub payload: Payload,
    /// Owned children in source order
    pub children: Vec<Node>,
    /// Source range
    pub span: Span,
    /// Decorations
    pub flags: NodeFlags,
    /// Attached documentation comment
    pub jsdoc: Option<Box<JsDocInfo>>,
    /// Leading plain comment
    pub comment: Option<NonJsDocComment>,
    /// Trailing plain comment
    pub trailing_comment: Option<NonJsDocComment>,
}

impl Node {
    /// Creates a childless node.
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node {
            kind,
            payload: Payload::None,
            children: Vec::new(),
            span,
            flags: NodeFlags::default(),
            jsdoc: None,
            comment: None,
            trailing_comment: None,
        }
    }

    /// Creates a node with children.
    pub fn with_children(kind: NodeKind, span: Span, children: Vec<Node>) -> Self {
        let mut node = Node::new(kind, span);
        node.children = children;
        node
    }

    /// Creates a node carrying a string payload.
    pub fn with_string(kind: NodeKind, value: impl Into<String>, span: Span) -> Self {
        let mut node = Node::new(kind, span);
        node.payload = Payload::Str(value.into());
        node
    }

    /// A `NAME` node.
    pub fn name(value: impl Into<String>, span: Span) -> Self {
        Node::with_string(NodeKind::Name, value, span)
    }

    /// An `EMPTY` node.
    pub fn empty(span: Span) -> Self {
        Node::new(NodeKind::Empty, span)
    }

    /// True when the node has the given kind.
    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// Appends a child.
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// The `index`th child.
    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    /// First child.
    pub fn first_child(&self) -> Option<&Node> {
        self.children.first()
    }

    /// Last child.
    pub fn last_child(&self) -> Option<&Node> {
        self.children.last()
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// String payload, if any.
    pub fn string_value(&self) -> Option<&str> {
        match &self.payload {
            Payload::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric payload, if any.
    pub fn number_value(&self) -> Option<f64> {
        match self.payload {
            Payload::Number(n) => Some(n),
            _ => None,
        }
    }

    /// BigInt payload, if any.
    pub fn bigint_value(&self) -> Option<&BigInt> {
        match &self.payload {
            Payload::BigInt(n) => Some(n),
            _ => None,
        }
    }

    /// Pre-order iterator over this node and all descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Visits every node mutably in pre-order.
    pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut Node)) {
        let mut stack: Vec<&mut Node> = vec![self];
        while let Some(node) = stack.pop() {
            f(node);
            stack.extend(node.children.iter_mut().rev());
        }
    }

    /// Finds the first node of `kind` in pre-order.
    pub fn find(&self, kind: NodeKind) -> Option<&Node> {
        self.descendants().find(|n| n.kind == kind)
    }

    /// Indented dump of the tree, one node per line, for tests and debugging.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Span;
    /// use js_parser::{Node, NodeKind};
    ///
    /// let mut root = Node::new(NodeKind::Script, Span::default());
    /// root.add_child(Node::name("x", Span::default()));
    /// assert_eq!(root.to_tree_string(), "SCRIPT\n  NAME x\n");
    /// ```
    pub fn to_tree_string(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            for _ in 0..depth {
                out.push_str("  ");
            }
            out.push_str(node.kind.name());
            match &node.payload {
                Payload::None => {}
                Payload::Str(s) => {
                    let _ = write!(out, " {}", s);
                }
                Payload::Number(n) => {
                    let _ = write!(out, " {}", n);
                }
                Payload::BigInt(n) => {
                    let _ = write!(out, " {}n", n);
                }
                Payload::Template { raw, .. } => {
                    let _ = write!(out, " {}", raw);
                }
            }
            out.push('\n');
            for child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}

// Long operator chains nest tens of thousands of levels deep; the derived
// drop glue would recurse once per level.
impl Drop for Node {
    fn drop(&mut self) {
        if self.children.iter().all(|c| c.children.is_empty()) {
            return;
        }
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// Iterator returned by [`Node::descendants`]
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
