//! Import and export declarations

use super::TreeBuilder;
use crate::cst::{ExportDeclaration, ImportDeclaration, ModuleExportName, Statement, StringLit};
use crate::node::{Node, NodeKind};
use core_types::Span;

impl<'r> TreeBuilder<'r> {
    /// `IMPORT(default, bindings, source)`; absent parts are `EMPTY`.
    pub(super) fn lower_import(&mut self, import: ImportDeclaration) -> Node {
        self.mark_module(import.span.start());
        let default = match import.default {
            Some(ident) => self.lower_identifier(ident),
            None => Node::empty(Span::empty_at(import.span.start())),
        };
        let bindings = if let Some(namespace) = import.namespace {
            Node::with_string(NodeKind::ImportStar, namespace.name, import.namespace_span)
        } else if let Some(named) = import.named {
            let mut specs = Node::new(NodeKind::ImportSpecs, import.named_span);
            for spec in named {
                let renamed = spec.local.is_some();
                let local = match spec.local {
                    Some(local) => self.lower_identifier(local),
                    None => Node::name(spec.imported.name(), spec.imported.span()),
                };
                let imported = module_export_name(spec.imported);
                let mut node = Node::with_children(NodeKind::ImportSpec, spec.span, vec![imported, local]);
                node.flags.shorthand = !renamed;
                specs.add_child(node);
            }
            specs
        } else {
            Node::empty(Span::empty_at(import.source.span.start()))
        };
        let source = string_literal(import.source);
        Node::with_children(NodeKind::Import, import.span, vec![default, bindings, source])
    }

    /// `EXPORT` in its four shapes.
    pub(super) fn lower_export(&mut self, export: ExportDeclaration) -> Node {
        self.mark_module(export.span().start());
        match export {
            ExportDeclaration::Declaration { declaration, span } => {
                let declaration = self.lower_statement(declaration);
                Node::with_children(NodeKind::Export, span, vec![declaration])
            }
            ExportDeclaration::Default { value, span } => {
                let value = match value {
                    Statement::Expression { expression, .. } => self.lower_expression(expression),
                    other => self.lower_statement(other),
                };
                let mut node = Node::with_children(NodeKind::Export, span, vec![value]);
                node.flags.export_default = true;
                node
            }
            ExportDeclaration::Named {
                specifiers,
                specifiers_span,
                source,
                span,
            } => {
                let mut specs = Node::new(NodeKind::ExportSpecs, specifiers_span);
                for spec in specifiers {
                    let renamed = spec.exported.is_some();
                    let exported = match spec.exported {
                        Some(exported) => module_export_name(exported),
                        None => module_export_name(spec.local.clone()),
                    };
                    let local = module_export_name(spec.local);
                    let mut node = Node::with_children(NodeKind::ExportSpec, spec.span, vec![local, exported]);
                    node.flags.shorthand = !renamed;
                    specs.add_child(node);
                }
                let mut node = Node::with_children(NodeKind::Export, span, vec![specs]);
                if let Some(source) = source {
                    node.add_child(string_literal(source));
                }
                node
            }
            ExportDeclaration::All { alias, source, span } => {
                let alias = match alias {
                    Some(alias) => module_export_name(alias),
                    None => Node::empty(Span::empty_at(span.start())),
                };
                let mut node =
                    Node::with_children(NodeKind::Export, span, vec![alias, string_literal(source)]);
                node.flags.export_all_from = true;
                node
            }
        }
    }
}

fn module_export_name(name: ModuleExportName) -> Node {
    match name {
        ModuleExportName::Identifier(ident) => Node::name(ident.name, ident.span),
        ModuleExportName::String(s) => string_literal(s),
    }
}

fn string_literal(s: StringLit) -> Node {
    Node::with_string(NodeKind::String, s.value, s.span)
}
