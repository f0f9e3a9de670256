//! Type expressions parsed from JSDoc annotations.

use std::fmt;

/// A parsed type annotation such as `!Array<string>` or `function(number): ?`.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `?` on its own
    Unknown,
    /// `*`
    All,
    /// A (possibly dotted) type name with optional template arguments
    Named {
        /// Name as written, e.g. `goog.events.Event`
        name: String,
        /// Template arguments, e.g. `number` in `Array<number>`
        args: Vec<TypeExpr>,
    },
    /// `?T` or `T?`
    Nullable(Box<TypeExpr>),
    /// `!T` or `T!`
    NonNullable(Box<TypeExpr>),
    /// `T=` in parameter position
    Optional(Box<TypeExpr>),
    /// `...T` in parameter position
    VarArgs(Box<TypeExpr>),
    /// `(A|B)` or a bare top-level `A|B`
    Union(Vec<TypeExpr>),
    /// `{a: T, b}`
    Record(Vec<RecordField>),
    /// `function(...)`
    Function(FunctionType),
    /// `typeof some.name`
    TypeOf(String),
}

/// A field of a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    /// Property name
    pub key: String,
    /// Declared type; `None` means unknown
    pub value: Option<TypeExpr>,
}

/// The parts of a `function(...)` type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionType {
    /// `this:T`
    pub this_type: Option<Box<TypeExpr>>,
    /// `new:T`
    pub new_type: Option<Box<TypeExpr>>,
    /// Positional parameter types
    pub params: Vec<TypeExpr>,
    /// Return type after `:`
    pub return_type: Option<Box<TypeExpr>>,
}

impl TypeExpr {
    /// Shorthand for a name without template arguments.
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// True for `T=`.
    pub fn is_optional_arg(&self) -> bool {
        matches!(self, TypeExpr::Optional(_))
    }

    /// True for `...T`.
    pub fn is_var_args(&self) -> bool {
        matches!(self, TypeExpr::VarArgs(_))
    }

    /// The name of a plain named type.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeExpr::Named { name, .. } => Some(name),
            _ => None,
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[TypeExpr], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Unknown => f.write_str("?"),
            TypeExpr::All => f.write_str("*"),
            TypeExpr::Named { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    write_list(f, args, ",")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeExpr::Nullable(inner) => write!(f, "?{}", inner),
            TypeExpr::NonNullable(inner) => write!(f, "!{}", inner),
            TypeExpr::Optional(inner) => write!(f, "{}=", inner),
            TypeExpr::VarArgs(inner) => write!(f, "...{}", inner),
            TypeExpr::Union(alternatives) => {
                f.write_str("(")?;
                write_list(f, alternatives, "|")?;
                f.write_str(")")
            }
            TypeExpr::Record(fields) => {
                f.write_str("{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&field.key)?;
                    if let Some(value) = &field.value {
                        write!(f, ": {}", value)?;
                    }
                }
                f.write_str("}")
            }
            TypeExpr::Function(func) => {
                f.write_str("function(")?;
                let mut first = true;
                if let Some(this_type) = &func.this_type {
                    write!(f, "this:{}", this_type)?;
                    first = false;
                }
                if let Some(new_type) = &func.new_type {
                    if !first {
                        f.write_str(",")?;
                    }
                    write!(f, "new:{}", new_type)?;
                    first = false;
                }
                for param in &func.params {
                    if !first {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", param)?;
                    first = false;
                }
                f.write_str(")")?;
                if let Some(ret) = &func.return_type {
                    write!(f, ":{}", ret)?;
                }
                Ok(())
            }
            TypeExpr::TypeOf(name) => write!(f, "typeof {}", name),
        }
    }
}
