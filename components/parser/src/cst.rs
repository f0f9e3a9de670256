//! Concrete syntax tree produced by the grammar parser
//!
//! The shapes follow the grammar closely: patterns are kept in their
//! expression (cover grammar) form and are only turned into binding or
//! assignment targets by the tree builder. Every production carries the span
//! of the source text it was parsed from.

use crate::lexer::LexDiagnostic;
use core_types::Span;
use num_bigint::BigInt;

/// An identifier as written.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    /// Name, escapes decoded
    pub name: String,
    /// Source location
    pub span: Span,
}

/// A string literal.
#[derive(Debug, Clone, PartialEq)]
pub struct StringLit {
    /// Decoded value
    pub value: String,
    /// Source location, quotes included
    pub span: Span,
}

/// Top-level statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Statements in source order
    pub body: Vec<Statement>,
    /// Source location
    pub span: Span,
}

/// JavaScript statements
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `{ ... }`
    Block(Block),
    /// `;`
    Empty(Span),
    /// `var`, `let` or `const`
    Variable(VariableDeclaration),
    /// Expression statement
    Expression {
        /// The expression
        expression: Expression,
        /// Source location
        span: Span,
    },
    /// If statement
    If {
        /// Condition
        test: Expression,
        /// Consequent
        consequent: Box<Statement>,
        /// Alternate
        alternate: Option<Box<Statement>>,
        /// Source location
        span: Span,
    },
    /// `do ... while (test)`
    DoWhile {
        /// Loop body
        body: Box<Statement>,
        /// Loop condition
        test: Expression,
        /// Source location
        span: Span,
    },
    /// While loop
    While {
        /// Loop condition
        test: Expression,
        /// Loop body
        body: Box<Statement>,
        /// Source location
        span: Span,
    },
    /// `for (init; test; update)`
    For {
        /// Initialization
        init: Option<ForInit>,
        /// Condition
        test: Option<Expression>,
        /// Update expression
        update: Option<Expression>,
        /// Loop body
        body: Box<Statement>,
        /// Source location
        span: Span,
    },
    /// `for (left in right)`
    ForIn {
        /// Binding or target
        left: ForInit,
        /// Object to iterate over
        right: Expression,
        /// Loop body
        body: Box<Statement>,
        /// Source location
        span: Span,
    },
    /// `for (left of right)` and `for await (left of right)`
    ForOf {
        /// Binding or target
        left: ForInit,
        /// Iterable
        right: Expression,
        /// Loop body
        body: Box<Statement>,
        /// True for `for await`
        is_await: bool,
        /// Source location
        span: Span,
    },
    /// Continue statement
    Continue {
        /// Target label
        label: Option<Ident>,
        /// Source location
        span: Span,
    },
    /// Break statement
    Break {
        /// Target label
        label: Option<Ident>,
        /// Source location
        span: Span,
    },
    /// Return statement
    Return {
        /// Return value
        argument: Option<Expression>,
        /// Source location
        span: Span,
    },
    /// With statement
    With {
        /// Scope object
        object: Expression,
        /// Body
        body: Box<Statement>,
        /// Source location
        span: Span,
    },
    /// Switch statement
    Switch {
        /// Switched value
        discriminant: Expression,
        /// Clauses in order
        cases: Vec<SwitchCase>,
        /// Source location
        span: Span,
    },
    /// `label: body`
    Labeled {
        /// Label
        label: Ident,
        /// Labelled statement
        body: Box<Statement>,
        /// Source location
        span: Span,
    },
    /// Throw statement
    Throw {
        /// Thrown value
        argument: Expression,
        /// Source location
        span: Span,
    },
    /// Try statement
    Try {
        /// Protected block
        block: Block,
        /// Catch clause
        handler: Option<CatchClause>,
        /// Finally block
        finalizer: Option<Block>,
        /// Source location
        span: Span,
    },
    /// `debugger;`
    Debugger(Span),
    /// Function declaration
    Function(Box<Function>),
    /// Class declaration
    Class(Box<Class>),
    /// Import declaration
    Import(Box<ImportDeclaration>),
    /// Export declaration
    Export(Box<ExportDeclaration>),
    /// Placeholder left where a statement failed to parse
    Error(Span),
}

impl Statement {
    /// Source location of the statement.
    pub fn span(&self) -> Span {
        match self {
            Statement::Block(block) => block.span,
            Statement::Variable(decl) => decl.span,
            Statement::Function(function) => function.span,
            Statement::Class(class) => class.span,
            Statement::Import(import) => import.span,
            Statement::Export(export) => export.span(),
            Statement::Empty(span) | Statement::Debugger(span) | Statement::Error(span) => *span,
            Statement::Expression { span, .. }
            | Statement::If { span, .. }
            | Statement::DoWhile { span, .. }
            | Statement::While { span, .. }
            | Statement::For { span, .. }
            | Statement::ForIn { span, .. }
            | Statement::ForOf { span, .. }
            | Statement::Continue { span, .. }
            | Statement::Break { span, .. }
            | Statement::Return { span, .. }
            | Statement::With { span, .. }
            | Statement::Switch { span, .. }
            | Statement::Labeled { span, .. }
            | Statement::Throw { span, .. }
            | Statement::Try { span, .. } => *span,
        }
    }

    /// True for loops, the only valid targets of a labelled `continue`.
    pub fn is_iteration(&self) -> bool {
        matches!(
            self,
            Statement::DoWhile { .. }
                | Statement::While { .. }
                | Statement::For { .. }
                | Statement::ForIn { .. }
                | Statement::ForOf { .. }
        )
    }
}

/// `{ ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Statements
    pub body: Vec<Statement>,
    /// Source location, braces included
    pub span: Span,
}

/// Variable declaration kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// var
    Var,
    /// let
    Let,
    /// const
    Const,
}

/// `var`/`let`/`const` with its declarators
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    /// Declaration kind
    pub kind: VariableKind,
    /// Declarators in order
    pub declarations: Vec<VariableDeclarator>,
    /// Source location
    pub span: Span,
}

/// One `target = init` entry
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    /// Name or pattern, in expression form
    pub target: Expression,
    /// Initializer
    pub init: Option<Expression>,
    /// Source location
    pub span: Span,
}

/// Left side of a for statement
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    /// Declaration
    Variable(VariableDeclaration),
    /// Expression or assignment target
    Expression(Expression),
}

/// `case test:` or `default:`
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// Case value; `None` for `default`
    pub test: Option<Expression>,
    /// Statements of the clause
    pub consequent: Vec<Statement>,
    /// Source location
    pub span: Span,
}

/// `catch (param) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// Binding; `None` for an optional catch binding
    pub param: Option<Expression>,
    /// Gap between `catch` and `{` when the binding is omitted
    pub param_gap: Span,
    /// Handler body
    pub body: Block,
    /// Source location
    pub span: Span,
}

/// Function flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// Function declaration
    Declaration,
    /// Function expression
    Expression,
    /// Arrow function
    Arrow,
    /// Method of a class or object literal
    Method,
    /// `get` accessor
    Getter,
    /// `set` accessor
    Setter,
}

/// Function body
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    /// `{ ... }`
    Block(Block),
    /// Concise arrow body
    Expression(Box<Expression>),
}

/// Formal parameter list, in cover grammar form
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    /// Parameters: targets, `target = default` assignments or spreads
    pub items: Vec<Expression>,
    /// A comma follows the last parameter
    pub trailing_comma: bool,
    /// Source location, parentheses included
    pub span: Span,
}

/// Any function
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Name
    pub name: Option<Ident>,
    /// Parameters
    pub params: Params,
    /// Body
    pub body: FunctionBody,
    /// Flavour
    pub kind: FunctionKind,
    /// `async`
    pub is_async: bool,
    /// `function*`
    pub is_generator: bool,
    /// Source location
    pub span: Span,
}

/// Property key in an object literal or class body
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// Identifier name; keywords allowed
    Identifier(Ident),
    /// String literal
    String(StringLit),
    /// Numeric literal
    Number {
        /// Value
        value: f64,
        /// Source location
        span: Span,
    },
    /// BigInt literal
    BigInt {
        /// Value
        value: BigInt,
        /// Source location
        span: Span,
    },
    /// `[expr]`
    Computed {
        /// Key expression
        expression: Box<Expression>,
        /// Source location, brackets included
        span: Span,
    },
    /// `#name`
    Private(Ident),
}

impl PropertyKey {
    /// Source location of the key.
    pub fn span(&self) -> Span {
        match self {
            PropertyKey::Identifier(ident) | PropertyKey::Private(ident) => ident.span,
            PropertyKey::String(s) => s.span,
            PropertyKey::Number { span, .. }
            | PropertyKey::BigInt { span, .. }
            | PropertyKey::Computed { span, .. } => *span,
        }
    }
}

/// Object literal member
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    /// `key: value`
    KeyValue {
        /// Key
        key: PropertyKey,
        /// Value
        value: Expression,
        /// Source location
        span: Span,
    },
    /// `name` or, in patterns only, `name = default`
    Shorthand {
        /// Name
        name: Ident,
        /// Cover-grammar initializer
        init: Option<Expression>,
        /// Source location
        span: Span,
    },
    /// Method or accessor
    Method {
        /// Key
        key: PropertyKey,
        /// Function; its kind tells method from accessor
        function: Box<Function>,
        /// Source location
        span: Span,
    },
    /// `...expr`
    Spread {
        /// Spread operand
        argument: Expression,
        /// Source location
        span: Span,
    },
}

/// Array literal element
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayElement {
    /// Elision, located at its comma
    Hole(Span),
    /// Plain element
    Expression(Expression),
    /// `...expr`
    Spread {
        /// Spread operand
        argument: Expression,
        /// Source location
        span: Span,
    },
}

/// Class body member
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    /// Method or accessor
    Method {
        /// Key
        key: PropertyKey,
        /// Function; its kind tells method from accessor
        function: Box<Function>,
        /// `static`
        is_static: bool,
        /// Source location, modifiers included
        span: Span,
    },
    /// Field with optional initializer
    Field {
        /// Key
        key: PropertyKey,
        /// Initializer
        value: Option<Expression>,
        /// `static`
        is_static: bool,
        /// Source location
        span: Span,
    },
    /// `static { ... }`
    StaticBlock(Block),
}

/// Class declaration or expression
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    /// Name
    pub name: Option<Ident>,
    /// `extends` clause
    pub super_class: Option<Expression>,
    /// Members in order
    pub members: Vec<ClassMember>,
    /// Location of the `{ ... }` body
    pub body_span: Span,
    /// Source location
    pub span: Span,
}

/// One piece of template text
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateElement {
    /// Escape-processed text, if valid
    pub cooked: Option<String>,
    /// Raw text
    pub raw: String,
    /// Escape problems, reported for untagged templates only
    pub problems: Vec<LexDiagnostic>,
    /// Source location
    pub span: Span,
}

/// Template literal
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Text pieces; one more than substitutions
    pub quasis: Vec<TemplateElement>,
    /// Substitutions
    pub expressions: Vec<Expression>,
    /// Source location, backticks included
    pub span: Span,
}

/// Member access property
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    /// `.name`
    Name(Ident),
    /// `.#name`
    Private(Ident),
    /// `[expr]`
    Computed(Box<Expression>),
}

/// Call or `new` argument list
#[derive(Debug, Clone, PartialEq)]
pub struct Arguments {
    /// Arguments; spreads appear as `Expression::Spread`
    pub items: Vec<Expression>,
    /// A comma follows the last argument
    pub trailing_comma: bool,
    /// Source location, parentheses included
    pub span: Span,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// -
    Minus,
    /// +
    Plus,
    /// !
    Not,
    /// ~
    BitwiseNot,
    /// typeof
    Typeof,
    /// void
    Void,
    /// delete
    Delete,
}

/// Binary operators, logical ones included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// ??
    Coalesce,
    /// ||
    Or,
    /// &&
    And,
    /// |
    BitwiseOr,
    /// ^
    BitwiseXor,
    /// &
    BitwiseAnd,
    /// ==
    Equal,
    /// !=
    NotEqual,
    /// ===
    StrictEqual,
    /// !==
    StrictNotEqual,
    /// <
    Less,
    /// >
    Greater,
    /// <=
    LessEqual,
    /// >=
    GreaterEqual,
    /// instanceof
    Instanceof,
    /// in
    In,
    /// <<
    LeftShift,
    /// >>
    RightShift,
    /// >>>
    UnsignedRightShift,
    /// +
    Add,
    /// -
    Subtract,
    /// *
    Multiply,
    /// /
    Divide,
    /// %
    Modulo,
    /// **
    Exponent,
}

impl BinaryOperator {
    /// Binding power; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Coalesce => 1,
            BinaryOperator::Or => 2,
            BinaryOperator::And => 3,
            BinaryOperator::BitwiseOr => 4,
            BinaryOperator::BitwiseXor => 5,
            BinaryOperator::BitwiseAnd => 6,
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::StrictEqual
            | BinaryOperator::StrictNotEqual => 7,
            BinaryOperator::Less
            | BinaryOperator::Greater
            | BinaryOperator::LessEqual
            | BinaryOperator::GreaterEqual
            | BinaryOperator::Instanceof
            | BinaryOperator::In => 8,
            BinaryOperator::LeftShift
            | BinaryOperator::RightShift
            | BinaryOperator::UnsignedRightShift => 9,
            BinaryOperator::Add | BinaryOperator::Subtract => 10,
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulo => 11,
            BinaryOperator::Exponent => 12,
        }
    }
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    /// =
    Assign,
    /// +=
    Add,
    /// -=
    Subtract,
    /// *=
    Multiply,
    /// /=
    Divide,
    /// %=
    Modulo,
    /// **=
    Exponent,
    /// <<=
    LeftShift,
    /// >>=
    RightShift,
    /// >>>=
    UnsignedRightShift,
    /// &=
    BitwiseAnd,
    /// |=
    BitwiseOr,
    /// ^=
    BitwiseXor,
    /// &&=
    And,
    /// ||=
    Or,
    /// ??=
    Coalesce,
}

/// JavaScript expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Identifier reference
    Identifier(Ident),
    /// `this`
    This(Span),
    /// `super`
    Super(Span),
    /// `null`
    Null(Span),
    /// `true` / `false`
    Boolean {
        /// Value
        value: bool,
        /// Source location
        span: Span,
    },
    /// Numeric literal
    Number {
        /// Value
        value: f64,
        /// Source location
        span: Span,
    },
    /// BigInt literal
    BigInt {
        /// Value
        value: BigInt,
        /// Source location
        span: Span,
    },
    /// String literal
    String(StringLit),
    /// Regular expression literal
    RegExp {
        /// Body
        pattern: String,
        /// Flags
        flags: String,
        /// Source location
        span: Span,
    },
    /// Untagged template literal
    Template(Template),
    /// `` tag`...` ``
    TaggedTemplate {
        /// Tag function
        tag: Box<Expression>,
        /// Template
        template: Template,
        /// Source location
        span: Span,
    },
    /// Array literal or pattern
    Array {
        /// Elements
        elements: Vec<ArrayElement>,
        /// A comma follows the last element
        trailing_comma: bool,
        /// Source location
        span: Span,
    },
    /// Object literal or pattern
    Object {
        /// Members
        properties: Vec<Property>,
        /// A comma follows the last member
        trailing_comma: bool,
        /// Source location
        span: Span,
    },
    /// Function or arrow function
    Function(Box<Function>),
    /// Class expression
    Class(Box<Class>),
    /// Prefix unary operator
    Unary {
        /// Operator
        operator: UnaryOperator,
        /// Operand
        argument: Box<Expression>,
        /// Source location
        span: Span,
    },
    /// `++` / `--`
    Update {
        /// True for `++`
        increment: bool,
        /// True for `x++`
        postfix: bool,
        /// Operand
        argument: Box<Expression>,
        /// Source location
        span: Span,
    },
    /// Binary or logical operator
    Binary {
        /// Operator
        operator: BinaryOperator,
        /// Left operand
        left: Box<Expression>,
        /// Right operand
        right: Box<Expression>,
        /// Source location
        span: Span,
    },
    /// Assignment
    Assignment {
        /// Operator
        operator: AssignmentOperator,
        /// Target, in expression form
        left: Box<Expression>,
        /// Value
        right: Box<Expression>,
        /// Source location
        span: Span,
    },
    /// `test ? consequent : alternate`
    Conditional {
        /// Condition
        test: Box<Expression>,
        /// Value when true
        consequent: Box<Expression>,
        /// Value when false
        alternate: Box<Expression>,
        /// Source location
        span: Span,
    },
    /// Comma expression
    Sequence {
        /// Expressions in order
        expressions: Vec<Expression>,
        /// Source location
        span: Span,
    },
    /// Property access
    Member {
        /// Receiver
        object: Box<Expression>,
        /// Property
        property: MemberProperty,
        /// Written with `?.`
        optional: bool,
        /// Location of the property name, or of the whole access when computed
        span: Span,
    },
    /// Function call
    Call {
        /// Callee
        callee: Box<Expression>,
        /// Arguments
        arguments: Arguments,
        /// Written with `?.(`
        optional: bool,
        /// Source location
        span: Span,
    },
    /// `new callee(args)`
    New {
        /// Constructor
        callee: Box<Expression>,
        /// Arguments; `None` when the parentheses are omitted
        arguments: Option<Arguments>,
        /// Source location
        span: Span,
    },
    /// `...expr` inside arguments or parameter lists
    Spread {
        /// Operand
        argument: Box<Expression>,
        /// Source location
        span: Span,
    },
    /// `yield` / `yield*`
    Yield {
        /// Operand
        argument: Option<Box<Expression>>,
        /// True for `yield*`
        delegate: bool,
        /// Source location
        span: Span,
    },
    /// `await expr`
    Await {
        /// Operand
        argument: Box<Expression>,
        /// Source location
        span: Span,
    },
    /// `#name` as the left operand of `in`
    PrivateName(Ident),
    /// `new.target`
    NewTarget(Span),
    /// `import.meta`
    ImportMeta(Span),
    /// `import(specifier)`
    DynamicImport {
        /// Module specifier
        argument: Box<Expression>,
        /// Source location
        span: Span,
    },
    /// `( expr )`
    Paren {
        /// Inner expression
        expression: Box<Expression>,
        /// Source location, parentheses included
        span: Span,
    },
}

impl Expression {
    /// Source location of the expression.
    pub fn span(&self) -> Span {
        match self {
            Expression::Identifier(ident) | Expression::PrivateName(ident) => ident.span,
            Expression::String(s) => s.span,
            Expression::Template(template) => template.span,
            Expression::Function(function) => function.span,
            Expression::Class(class) => class.span,
            Expression::This(span)
            | Expression::Super(span)
            | Expression::Null(span)
            | Expression::NewTarget(span)
            | Expression::ImportMeta(span) => *span,
            Expression::Member { object, property, span, .. } => match property {
                MemberProperty::Computed(_) => *span,
                _ => object.span().to(*span),
            },
            Expression::Boolean { span, .. }
            | Expression::Number { span, .. }
            | Expression::BigInt { span, .. }
            | Expression::RegExp { span, .. }
            | Expression::TaggedTemplate { span, .. }
            | Expression::Array { span, .. }
            | Expression::Object { span, .. }
            | Expression::Unary { span, .. }
            | Expression::Update { span, .. }
            | Expression::Binary { span, .. }
            | Expression::Assignment { span, .. }
            | Expression::Conditional { span, .. }
            | Expression::Sequence { span, .. }
            | Expression::Call { span, .. }
            | Expression::New { span, .. }
            | Expression::Spread { span, .. }
            | Expression::Yield { span, .. }
            | Expression::Await { span, .. }
            | Expression::DynamicImport { span, .. }
            | Expression::Paren { span, .. } => *span,
        }
    }

    /// True for property accesses and calls that extend an optional chain.
    pub fn is_optional_chain(&self) -> bool {
        match self {
            Expression::Member {
                object, optional, ..
            }
            | Expression::Call {
                callee: object,
                optional,
                ..
            } => *optional || object.is_optional_chain(),
            _ => false,
        }
    }
}

/// Module name in an import or export clause
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleExportName {
    /// Identifier name; keywords allowed
    Identifier(Ident),
    /// String literal
    String(StringLit),
}

impl ModuleExportName {
    /// Source location.
    pub fn span(&self) -> Span {
        match self {
            ModuleExportName::Identifier(ident) => ident.span,
            ModuleExportName::String(s) => s.span,
        }
    }

    /// Name text.
    pub fn name(&self) -> &str {
        match self {
            ModuleExportName::Identifier(ident) => &ident.name,
            ModuleExportName::String(s) => &s.value,
        }
    }
}

/// `{ imported as local }` entry
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpecifier {
    /// Exported name in the source module
    pub imported: ModuleExportName,
    /// Local binding; `None` when not renamed
    pub local: Option<Ident>,
    /// Source location
    pub span: Span,
}

/// Import declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDeclaration {
    /// Default binding
    pub default: Option<Ident>,
    /// `* as name`
    pub namespace: Option<Ident>,
    /// Location of `* as name`
    pub namespace_span: Span,
    /// `{ ... }` specifiers
    pub named: Option<Vec<ImportSpecifier>>,
    /// Location of the `{ ... }` clause
    pub named_span: Span,
    /// Module specifier
    pub source: StringLit,
    /// Source location
    pub span: Span,
}

/// `{ local as exported }` entry
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    /// Local name, or the source module's name for re-exports
    pub local: ModuleExportName,
    /// Exported name; `None` when not renamed
    pub exported: Option<ModuleExportName>,
    /// Source location
    pub span: Span,
}

/// Export declaration
#[derive(Debug, Clone, PartialEq)]
pub enum ExportDeclaration {
    /// `export var/let/const/function/class ...`
    Declaration {
        /// Exported declaration
        declaration: Statement,
        /// Source location
        span: Span,
    },
    /// `export default ...`
    Default {
        /// Exported value; function and class declarations included
        value: Statement,
        /// Source location
        span: Span,
    },
    /// `export { a, b as c } [from 'm']`
    Named {
        /// Specifiers
        specifiers: Vec<ExportSpecifier>,
        /// Location of the `{ ... }` clause
        specifiers_span: Span,
        /// Re-export source
        source: Option<StringLit>,
        /// Source location
        span: Span,
    },
    /// `export * [as name] from 'm'`
    All {
        /// Namespace alias
        alias: Option<ModuleExportName>,
        /// Source module
        source: StringLit,
        /// Source location
        span: Span,
    },
}

impl ExportDeclaration {
    /// Source location.
    pub fn span(&self) -> Span {
        match self {
            ExportDeclaration::Declaration { span, .. }
            | ExportDeclaration::Default { span, .. }
            | ExportDeclaration::Named { span, .. }
            | ExportDeclaration::All { span, .. } => *span,
        }
    }
}
