//! Recursive-descent parser for type expressions inside JSDoc.

use core_types::SourcePosition;
use thiserror::Error;

use crate::text::CommentText;
use crate::types::{FunctionType, RecordField, TypeExpr};

/// Suffix appended to every type-annotation warning.
pub const BAD_TYPE_WIKI_LINK: &str = " See https://github.com/google/closure-compiler/wiki/Annotating-JavaScript-for-the-Closure-Compiler for more information.";

/// A malformed type expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Bad type annotation. {reason}")]
pub struct TypeSyntaxError {
    /// What went wrong, e.g. `missing closing >`
    pub reason: String,
    /// Where it went wrong
    pub position: SourcePosition,
}

impl TypeSyntaxError {
    /// The full diagnostic text including the help link.
    pub fn message(&self) -> String {
        format!("{}{}", self, BAD_TYPE_WIKI_LINK)
    }
}

type TypeResult<T> = Result<T, TypeSyntaxError>;

pub(crate) struct TypeParser<'t> {
    text: &'t CommentText,
    pub pos: usize,
    end: usize,
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '.'
}

impl<'t> TypeParser<'t> {
    pub fn new(text: &'t CommentText, pos: usize, end: usize) -> Self {
        TypeParser { text, pos, end }
    }

    fn error<T>(&self, reason: &str) -> TypeResult<T> {
        Err(TypeSyntaxError {
            reason: reason.to_string(),
            position: self.text.position(self.pos),
        })
    }

    fn skip_ws(&mut self) {
        while self.pos < self.end && self.text.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    pub fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        if self.pos < self.end {
            Some(self.text.chars[self.pos])
        } else {
            None
        }
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, s: &str) -> bool {
        self.skip_ws();
        let wanted: Vec<char> = s.chars().collect();
        if self.pos + wanted.len() <= self.end && self.text.chars[self.pos..self.pos + wanted.len()] == wanted[..] {
            self.pos += wanted.len();
            true
        } else {
            false
        }
    }

    fn read_name(&mut self) -> Option<String> {
        self.skip_ws();
        let start = self.pos;
        while self.pos < self.end && is_name_char(self.text.chars[self.pos]) {
            self.pos += 1;
        }
        if start == self.pos {
            return None;
        }
        let mut name: String = self.text.chars[start..self.pos].iter().collect();
        // `Array.<T>` is the legacy spelling of `Array<T>`
        if name.ends_with('.') && self.pos < self.end && self.text.chars[self.pos] == '<' {
            name.pop();
        }
        Some(name)
    }

    /// `{T}` including the braces; the opening brace is the next character.
    pub fn parse_braced(&mut self) -> TypeResult<TypeExpr> {
        if !self.eat('{') {
            return self.error("type not recognized due to syntax error.");
        }
        let result = self.parse_param_type()?;
        if !self.eat('}') {
            return self.error("expected closing }");
        }
        Ok(result)
    }

    /// A type allowed in parameter position: `...T`, `T=` or a plain type.
    pub fn parse_param_type(&mut self) -> TypeResult<TypeExpr> {
        if self.eat_str("...") {
            return match self.peek() {
                None | Some('}') | Some(')') | Some(',') => {
                    Ok(TypeExpr::VarArgs(Box::new(TypeExpr::Unknown)))
                }
                _ => Ok(TypeExpr::VarArgs(Box::new(self.parse_top_level()?))),
            };
        }
        let t = self.parse_top_level()?;
        if self.eat('=') {
            return Ok(TypeExpr::Optional(Box::new(t)));
        }
        Ok(t)
    }

    /// A type with an optional bare union: `A|B|C`.
    pub fn parse_top_level(&mut self) -> TypeResult<TypeExpr> {
        let first = self.parse_type_expression()?;
        if self.peek() != Some('|') {
            return Ok(first);
        }
        let mut alternatives = vec![first];
        while self.eat('|') {
            // `||` is accepted as a single bar
            self.eat('|');
            alternatives.push(self.parse_type_expression()?);
        }
        Ok(TypeExpr::Union(alternatives))
    }

    fn parse_type_expression(&mut self) -> TypeResult<TypeExpr> {
        match self.peek() {
            Some('?') => {
                self.pos += 1;
                match self.peek() {
                    None | Some(',') | Some('=') | Some('}') | Some(')') | Some('>') | Some('|')
                    | Some(']') | Some(':') => Ok(TypeExpr::Unknown),
                    _ => Ok(TypeExpr::Nullable(Box::new(self.parse_basic()?))),
                }
            }
            Some('!') => {
                self.pos += 1;
                Ok(TypeExpr::NonNullable(Box::new(self.parse_basic()?)))
            }
            _ => {
                let basic = self.parse_basic()?;
                if self.eat('?') {
                    Ok(TypeExpr::Nullable(Box::new(basic)))
                } else if self.eat('!') {
                    Ok(TypeExpr::NonNullable(Box::new(basic)))
                } else {
                    Ok(basic)
                }
            }
        }
    }

    fn parse_basic(&mut self) -> TypeResult<TypeExpr> {
        match self.peek() {
            Some('*') => {
                self.pos += 1;
                Ok(TypeExpr::All)
            }
            Some('{') => self.parse_record(),
            Some('(') => {
                self.pos += 1;
                let inner = self.parse_top_level()?;
                if !self.eat(')') {
                    return self.error("missing closing )");
                }
                Ok(inner)
            }
            Some(c) if is_name_char(c) => {
                let save = self.pos;
                let name = self.read_name().unwrap_or_default();
                if name == "function" && self.peek() == Some('(') {
                    return self.parse_function();
                }
                if name == "typeof" {
                    return match self.read_name() {
                        Some(target) => Ok(TypeExpr::TypeOf(target)),
                        None => self.error("type not recognized due to syntax error."),
                    };
                }
                if name.starts_with('.') {
                    self.pos = save;
                    return self.error("type not recognized due to syntax error.");
                }
                let mut args = Vec::new();
                if self.eat('<') {
                    loop {
                        args.push(self.parse_top_level()?);
                        if !self.eat(',') {
                            break;
                        }
                    }
                    if !self.eat('>') {
                        return self.error("missing closing >");
                    }
                }
                Ok(TypeExpr::Named { name, args })
            }
            _ => self.error("type not recognized due to syntax error."),
        }
    }

    fn parse_record(&mut self) -> TypeResult<TypeExpr> {
        self.eat('{');
        let mut fields = Vec::new();
        if self.eat('}') {
            return Ok(TypeExpr::Record(fields));
        }
        loop {
            let key = match self.peek() {
                Some(q @ ('\'' | '"')) => {
                    self.pos += 1;
                    let start = self.pos;
                    while self.pos < self.end && self.text.chars[self.pos] != q {
                        self.pos += 1;
                    }
                    let key: String = self.text.chars[start..self.pos].iter().collect();
                    if self.pos < self.end {
                        self.pos += 1;
                    }
                    key
                }
                _ => match self.read_name() {
                    Some(name) => name,
                    None => return self.error("type not recognized due to syntax error."),
                },
            };
            let value = if self.eat(':') {
                Some(self.parse_top_level()?)
            } else {
                None
            };
            fields.push(RecordField { key, value });
            if !self.eat(',') {
                break;
            }
        }
        if !self.eat('}') {
            return self.error("expected closing }");
        }
        Ok(TypeExpr::Record(fields))
    }

    fn parse_function(&mut self) -> TypeResult<TypeExpr> {
        self.eat('(');
        let mut func = FunctionType::default();
        if !self.eat(')') {
            loop {
                if self.eat_str("this:") {
                    func.this_type = Some(Box::new(self.parse_top_level()?));
                } else if self.eat_str("new:") {
                    func.new_type = Some(Box::new(self.parse_top_level()?));
                } else {
                    func.params.push(self.parse_param_type()?);
                }
                if !self.eat(',') {
                    break;
                }
            }
            if !self.eat(')') {
                return self.error("missing closing )");
            }
        }
        if self.eat(':') {
            func.return_type = Some(Box::new(self.parse_type_expression()?));
        }
        Ok(TypeExpr::Function(func))
    }

    /// Index just past the `}` matching the `{` at the current position, or
    /// the end of the region when unbalanced.
    pub fn skip_braced(&self, from: usize) -> usize {
        let mut depth = 0usize;
        let mut i = from;
        while i < self.end {
            match self.text.chars[i] {
                '{' => depth += 1,
                '}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return i + 1;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        self.end
    }

    /// True when only whitespace remains.
    pub fn at_end(&mut self) -> bool {
        self.peek().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> TypeResult<TypeExpr> {
        let comment = format!("/**{}*/", src);
        let text = CommentText::new(&comment, SourcePosition::new(1, 0, 0));
        let mut parser = TypeParser::new(&text, 0, text.len());
        parser.parse_param_type()
    }

    #[test]
    fn test_generic_both_spellings() {
        assert_eq!(parse("Array<number>").unwrap().to_string(), "Array<number>");
        assert_eq!(parse("Array.<number>").unwrap().to_string(), "Array<number>");
    }

    #[test]
    fn test_unknown_and_nullable() {
        assert_eq!(parse("?").unwrap(), TypeExpr::Unknown);
        assert_eq!(parse("?string").unwrap().to_string(), "?string");
        assert_eq!(parse("string?").unwrap().to_string(), "?string");
    }

    #[test]
    fn test_record_type() {
        let t = parse("{attr: number, b}").unwrap();
        assert_eq!(t.to_string(), "{attr: number, b}");
    }

    #[test]
    fn test_optional_and_varargs() {
        assert!(parse("string=").unwrap().is_optional_arg());
        assert!(parse("...string").unwrap().is_var_args());
    }

    #[test]
    fn test_function_type() {
        let t = parse("function(new:Foo, string): void").unwrap();
        assert_eq!(t.to_string(), "function(new:Foo,string):void");
    }

    #[test]
    fn test_union_in_parens() {
        assert_eq!(parse("(string|number)").unwrap().to_string(), "(string|number)");
    }

    #[test]
    fn test_missing_closing_angle() {
        let err = parse("Array<number").unwrap_err();
        assert_eq!(err.reason, "missing closing >");
        assert!(err.message().ends_with("for more information."));
    }

    #[test]
    fn test_unrecognized_token() {
        let err = parse("%").unwrap_err();
        assert_eq!(err.to_string(), "Bad type annotation. type not recognized due to syntax error.");
    }
}
