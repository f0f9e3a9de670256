//! Scope tracking for the tree builder
//!
//! Two stacks live alongside the builder's recursion: one entry per function
//! boundary (labels, loop nesting, generator/async context) and one entry per
//! class body (declared private names). Entries are pushed on entry and
//! popped on exit, so nothing survives the construct that owns it.

use std::collections::HashMap;

/// What introduced a function-level scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    /// Top level of the program
    Script,
    /// Function, method or accessor body
    Function,
    /// Arrow function body
    Arrow,
    /// `static { ... }` inside a class
    StaticBlock,
    /// Class field initializer
    FieldInitializer,
}

/// A label visible at the current point.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LabelInfo {
    /// The labelled statement is a loop
    pub is_iteration: bool,
}

/// Per-function state.
#[derive(Debug)]
pub(crate) struct FunctionScope {
    pub kind: ScopeKind,
    pub is_generator: bool,
    pub is_async: bool,
    labels: HashMap<String, LabelInfo>,
    loop_depth: usize,
    breakable_depth: usize,
}

impl FunctionScope {
    fn new(kind: ScopeKind, is_generator: bool, is_async: bool) -> Self {
        FunctionScope {
            kind,
            is_generator,
            is_async,
            labels: HashMap::new(),
            loop_depth: 0,
            breakable_depth: 0,
        }
    }
}

/// A private name declared by a class body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PrivateMember {
    /// Declared as a method or accessor rather than a field
    pub is_method: bool,
    /// Declared `static`
    pub is_static: bool,
}

/// Private names of one class body.
#[derive(Debug, Default)]
pub(crate) struct ClassScope {
    names: HashMap<String, PrivateMember>,
}

impl ClassScope {
    /// Records a declared name; the first declaration wins.
    pub(crate) fn declare(&mut self, name: &str, member: PrivateMember) {
        self.names.entry(name.to_string()).or_insert(member);
    }
}

/// Whether `await` may appear at the current point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AwaitContext {
    /// Inside an async function
    Allowed,
    /// At the top level; legal only if the file turns out to be a module
    TopLevel,
    /// Anywhere else
    Denied,
}

/// Function and class scope stacks.
#[derive(Debug)]
pub(crate) struct ScopeStack {
    functions: Vec<FunctionScope>,
    classes: Vec<ClassScope>,
}

impl ScopeStack {
    /// A stack holding only the script scope.
    pub(crate) fn new() -> Self {
        ScopeStack {
            functions: vec![FunctionScope::new(ScopeKind::Script, false, false)],
            classes: Vec::new(),
        }
    }

    pub(crate) fn enter_function(&mut self, kind: ScopeKind, is_generator: bool, is_async: bool) {
        self.functions
            .push(FunctionScope::new(kind, is_generator, is_async));
    }

    pub(crate) fn exit_function(&mut self) {
        // The script scope is never popped.
        if self.functions.len() > 1 {
            self.functions.pop();
        }
    }

    fn current(&self) -> &FunctionScope {
        // `new` seeds the script scope and `exit_function` keeps it.
        &self.functions[self.functions.len() - 1]
    }

    fn current_mut(&mut self) -> &mut FunctionScope {
        let last = self.functions.len() - 1;
        &mut self.functions[last]
    }

    /// Kind of the innermost function scope.
    pub(crate) fn kind(&self) -> ScopeKind {
        self.current().kind
    }

    pub(crate) fn in_generator(&self) -> bool {
        self.current().is_generator
    }

    pub(crate) fn await_context(&self) -> AwaitContext {
        let scope = self.current();
        if scope.is_async {
            AwaitContext::Allowed
        } else if scope.kind == ScopeKind::Script {
            AwaitContext::TopLevel
        } else {
            AwaitContext::Denied
        }
    }

    pub(crate) fn return_allowed(&self) -> bool {
        matches!(self.kind(), ScopeKind::Function | ScopeKind::Arrow)
    }

    /// `new.target` resolves through arrows to the nearest real function.
    pub(crate) fn new_target_allowed(&self) -> bool {
        self.functions
            .iter()
            .rev()
            .find(|scope| scope.kind != ScopeKind::Arrow)
            .map_or(false, |scope| {
                matches!(scope.kind, ScopeKind::Function | ScopeKind::FieldInitializer)
            })
    }

    // ------------------------------------------------------------------
    // Labels and jump targets
    // ------------------------------------------------------------------

    /// Pushes a label; returns false when the name is already in scope.
    pub(crate) fn push_label(&mut self, name: &str, is_iteration: bool) -> bool {
        let labels = &mut self.current_mut().labels;
        if labels.contains_key(name) {
            return false;
        }
        labels.insert(name.to_string(), LabelInfo { is_iteration });
        true
    }

    pub(crate) fn pop_label(&mut self, name: &str) {
        self.current_mut().labels.remove(name);
    }

    pub(crate) fn find_label(&self, name: &str) -> Option<LabelInfo> {
        self.current().labels.get(name).copied()
    }

    pub(crate) fn enter_loop(&mut self) {
        let scope = self.current_mut();
        scope.loop_depth += 1;
        scope.breakable_depth += 1;
    }

    pub(crate) fn exit_loop(&mut self) {
        let scope = self.current_mut();
        scope.loop_depth = scope.loop_depth.saturating_sub(1);
        scope.breakable_depth = scope.breakable_depth.saturating_sub(1);
    }

    pub(crate) fn enter_switch(&mut self) {
        self.current_mut().breakable_depth += 1;
    }

    pub(crate) fn exit_switch(&mut self) {
        let scope = self.current_mut();
        scope.breakable_depth = scope.breakable_depth.saturating_sub(1);
    }

    pub(crate) fn in_loop(&self) -> bool {
        self.current().loop_depth > 0
    }

    pub(crate) fn in_breakable(&self) -> bool {
        self.current().breakable_depth > 0
    }

    // ------------------------------------------------------------------
    // Private names
    // ------------------------------------------------------------------

    pub(crate) fn enter_class(&mut self, scope: ClassScope) {
        self.classes.push(scope);
    }

    pub(crate) fn exit_class(&mut self) {
        self.classes.pop();
    }

    pub(crate) fn in_class(&self) -> bool {
        !self.classes.is_empty()
    }

    /// Resolves `#name` from the innermost class outwards.
    pub(crate) fn lookup_private(&self, name: &str) -> Option<PrivateMember> {
        self.classes
            .iter()
            .rev()
            .find_map(|class| class.names.get(name).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_per_function() {
        let mut scopes = ScopeStack::new();
        assert!(scopes.push_label("a", true));
        assert!(!scopes.push_label("a", false));
        scopes.enter_function(ScopeKind::Function, false, false);
        assert!(scopes.find_label("a").is_none());
        assert!(scopes.push_label("a", false));
        scopes.exit_function();
        assert!(scopes.find_label("a").map_or(false, |l| l.is_iteration));
        scopes.pop_label("a");
        assert!(scopes.find_label("a").is_none());
    }

    #[test]
    fn test_loop_and_switch_depths() {
        let mut scopes = ScopeStack::new();
        assert!(!scopes.in_breakable());
        scopes.enter_switch();
        assert!(scopes.in_breakable());
        assert!(!scopes.in_loop());
        scopes.enter_loop();
        assert!(scopes.in_loop());
        scopes.enter_function(ScopeKind::StaticBlock, false, false);
        assert!(!scopes.in_loop());
        assert!(!scopes.in_breakable());
        scopes.exit_function();
        scopes.exit_loop();
        scopes.exit_switch();
        assert!(!scopes.in_breakable());
    }

    #[test]
    fn test_new_target_through_arrows() {
        let mut scopes = ScopeStack::new();
        assert!(!scopes.new_target_allowed());
        scopes.enter_function(ScopeKind::Arrow, false, false);
        assert!(!scopes.new_target_allowed());
        scopes.exit_function();
        scopes.enter_function(ScopeKind::Function, false, false);
        scopes.enter_function(ScopeKind::Arrow, false, false);
        assert!(scopes.new_target_allowed());
    }

    #[test]
    fn test_await_context() {
        let mut scopes = ScopeStack::new();
        assert_eq!(scopes.await_context(), AwaitContext::TopLevel);
        scopes.enter_function(ScopeKind::Function, false, true);
        assert_eq!(scopes.await_context(), AwaitContext::Allowed);
        scopes.enter_function(ScopeKind::StaticBlock, false, false);
        assert_eq!(scopes.await_context(), AwaitContext::Denied);
        assert!(!scopes.return_allowed());
    }

    #[test]
    fn test_private_lookup_walks_outwards() {
        let mut scopes = ScopeStack::new();
        let mut outer = ClassScope::default();
        outer.declare(
            "x",
            PrivateMember {
                is_method: false,
                is_static: false,
            },
        );
        scopes.enter_class(outer);
        scopes.enter_class(ClassScope::default());
        assert!(scopes.lookup_private("x").is_some());
        scopes.exit_class();
        scopes.exit_class();
        assert!(scopes.lookup_private("x").is_none());
    }
}
