//! The record produced from one documentation comment.

use crate::TypeExpr;

/// Declared visibility from `@private` and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// No visibility tag
    #[default]
    Inherited,
    /// `@public`
    Public,
    /// `@protected`
    Protected,
    /// `@package`
    Package,
    /// `@private`
    Private,
}

/// One `@param` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDoc {
    /// Parameter name
    pub name: String,
    /// Declared type, absent when it failed to parse or was omitted
    pub type_expr: Option<TypeExpr>,
    /// Trailing description, only kept when documentation is parsed
    pub description: Option<String>,
}

/// Parsed content of a JSDoc comment.
///
/// Only tags that appeared in the comment are set; a malformed type leaves
/// the corresponding slot empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsDocInfo {
    /// Prose before the first tag
    pub description: Option<String>,
    /// `@type`, or the whole comment for inline annotations
    pub type_expr: Option<TypeExpr>,
    /// True when the type came from a tagless inline comment
    pub inline_type: bool,
    /// `@param` entries in order
    pub params: Vec<ParamDoc>,
    /// `@return` / `@returns`
    pub return_type: Option<TypeExpr>,
    /// `@define {T}`
    pub define_type: Option<TypeExpr>,
    /// `@enum {T}`; a bare `@enum` records `number`
    pub enum_type: Option<TypeExpr>,
    /// `@typedef {T}`
    pub typedef_type: Option<TypeExpr>,
    /// `@this {T}`
    pub this_type: Option<TypeExpr>,
    /// `@extends` / `@augments`
    pub base_type: Option<TypeExpr>,
    /// `@implements` entries
    pub implemented_interfaces: Vec<TypeExpr>,
    /// `@template` names
    pub template_names: Vec<String>,
    /// `@const` / `@final`
    pub is_const: bool,
    /// `@constructor`
    pub is_constructor: bool,
    /// `@interface`
    pub is_interface: bool,
    /// `@record`
    pub is_record: bool,
    /// `@export`
    pub is_export: bool,
    /// `@override`
    pub is_override: bool,
    /// `@nosideeffects`
    pub no_side_effects: bool,
    /// `@nocollapse`
    pub no_collapse: bool,
    /// `@closureUnaware`
    pub closure_unaware: bool,
    /// `@deprecated`, with its reason when one was given
    pub deprecated: Option<String>,
    /// Visibility tag
    pub visibility: Visibility,
    /// `@fileoverview` prose
    pub file_overview: Option<String>,
    /// True when the block is a file-level block
    pub has_file_overview: bool,
    /// `@externs`
    pub is_externs: bool,
    /// `@typeSummary`
    pub is_type_summary: bool,
    /// `@license` / `@preserve` text, or the body of a `/*!` comment
    pub license: Option<String>,
    /// `@suppress {a,b}` entries, first-seen order without duplicates
    pub suppressions: Vec<String>,
    /// `@see` references
    pub see_references: Vec<String>,
    /// `@author` names
    pub authors: Vec<String>,
    /// `@desc` message description
    pub message_description: Option<String>,
}

impl JsDocInfo {
    /// True when a declared type is present.
    pub fn has_type(&self) -> bool {
        self.type_expr.is_some()
    }

    /// The declared type.
    pub fn get_type(&self) -> Option<&TypeExpr> {
        self.type_expr.as_ref()
    }

    /// Type declared for the parameter called `name`.
    pub fn param_type(&self, name: &str) -> Option<&TypeExpr> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.type_expr.as_ref())
    }

    /// True when this block belongs to the file rather than to a node.
    pub fn is_file_level(&self) -> bool {
        self.has_file_overview || self.is_externs || self.is_type_summary || self.license.is_some()
    }

    /// Adds a suppression unless already present.
    pub fn add_suppression(&mut self, name: &str) {
        if !self.suppressions.iter().any(|s| s == name) {
            self.suppressions.push(name.to_string());
        }
    }

    /// Appends license text.
    pub fn add_license(&mut self, text: &str) {
        match &mut self.license {
            Some(existing) => existing.push_str(text),
            None => self.license = Some(text.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppressions_are_unique() {
        let mut info = JsDocInfo::default();
        info.add_suppression("const");
        info.add_suppression("checkTypes");
        info.add_suppression("const");
        assert_eq!(info.suppressions, vec!["const", "checkTypes"]);
    }

    #[test]
    fn test_license_appends() {
        let mut info = JsDocInfo::default();
        info.add_license(" a ");
        info.add_license("b");
        assert_eq!(info.license.as_deref(), Some(" a b"));
        assert!(info.is_file_level());
    }

    #[test]
    fn test_param_type_lookup() {
        let info = JsDocInfo {
            params: vec![ParamDoc {
                name: "x".to_string(),
                type_expr: Some(TypeExpr::named("number")),
                description: None,
            }],
            ..JsDocInfo::default()
        };
        assert_eq!(info.param_type("x"), Some(&TypeExpr::named("number")));
        assert_eq!(info.param_type("y"), None);
    }
}
