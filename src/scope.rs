//! Scope management for name analysis.
//!
//! A [`ScopeStack`] is one stack of name→symbol frames, innermost on top.
//! The global scope is created with the stack and is never popped; every
//! other scope is pushed and popped around exactly one syntactic construct
//! (function body, if-branch, else-branch, while-body).

use std::rc::Rc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::symbols::Symbol;

/// Declaring a name that already exists in the same scope.
///
/// Shadowing a name from an *enclosing* scope is always permitted and never
/// produces this error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("name '{name}' already declared in this scope")]
pub struct DuplicateNameError {
    pub name: String,
}

/// Internal invariant violation: the traversal tried to pop the global
/// scope. Never user-triggerable from a well-formed tree; the analysis
/// aborts instead of reporting a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("scope stack would be empty")]
pub struct EmptyStackError;

/// A single name→symbol binding frame.
///
/// Bindings iterate in declaration order, which keeps debug output and any
/// whole-scope walks deterministic.
#[derive(Debug, Default)]
pub struct Scope {
    symbols: IndexMap<String, Rc<Symbol>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `symbol` under `name` in this scope.
    pub fn declare(
        &mut self,
        name: &str,
        symbol: Rc<Symbol>,
    ) -> Result<(), DuplicateNameError> {
        if self.symbols.contains_key(name) {
            return Err(DuplicateNameError {
                name: name.to_string(),
            });
        }
        self.symbols.insert(name.to_string(), symbol);
        Ok(())
    }

    /// Look up `name` in this scope only.
    pub fn lookup(&self, name: &str) -> Option<&Rc<Symbol>> {
        self.symbols.get(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Bindings in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rc<Symbol>)> {
        self.symbols.iter().map(|(name, sym)| (name.as_str(), sym))
    }
}

/// Stack of scopes, global at the bottom.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// Create a stack holding a single empty global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new()],
        }
    }

    /// Push a new empty scope on top of the stack.
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Remove the top scope. The global scope is never popped.
    pub fn pop_scope(&mut self) -> Result<(), EmptyStackError> {
        if self.scopes.len() <= 1 {
            return Err(EmptyStackError);
        }
        self.scopes.pop();
        Ok(())
    }

    /// Number of scopes on the stack (1 = global only).
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declare `symbol` under `name` in the current (top) scope.
    pub fn declare(
        &mut self,
        name: &str,
        symbol: Rc<Symbol>,
    ) -> Result<(), DuplicateNameError> {
        self.top_mut().declare(name, symbol)
    }

    /// Look up `name` in the current (top) scope only.
    pub fn lookup_local(&self, name: &str) -> Option<&Rc<Symbol>> {
        self.top().lookup(name)
    }

    /// Look up `name` from the innermost scope out to the global scope and
    /// return the first match.
    ///
    /// The stack is constructed with a global scope and [`pop_scope`]
    /// refuses to remove it, so there is always at least one scope to
    /// search.
    ///
    /// [`pop_scope`]: ScopeStack::pop_scope
    pub fn lookup_chain(&self, name: &str) -> Option<&Rc<Symbol>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.lookup(name))
    }

    fn top(&self) -> &Scope {
        self.scopes.last().expect("stack always has a global scope")
    }

    fn top_mut(&mut self) -> &mut Scope {
        self.scopes
            .last_mut()
            .expect("stack always has a global scope")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Primitive;

    fn var(ty: Primitive) -> Rc<Symbol> {
        Rc::new(Symbol::Variable { ty })
    }

    // Stack discipline

    #[test]
    fn test_new_stack_has_global_scope() {
        let stack = ScopeStack::new();
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_push_pop() {
        let mut stack = ScopeStack::new();
        stack.push_scope();
        stack.push_scope();
        assert_eq!(stack.depth(), 3);

        stack.pop_scope().expect("should pop");
        stack.pop_scope().expect("should pop");
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_cannot_pop_global() {
        let mut stack = ScopeStack::new();
        assert_eq!(stack.pop_scope(), Err(EmptyStackError));
        assert_eq!(stack.depth(), 1);
    }

    // Declaration

    #[test]
    fn test_declare_and_lookup_local() {
        let mut stack = ScopeStack::new();
        stack
            .declare("x", var(Primitive::Integer))
            .expect("should declare");
        assert!(stack.lookup_local("x").is_some());
        assert!(stack.lookup_local("y").is_none());
    }

    #[test]
    fn test_declare_duplicate_in_same_scope() {
        let mut stack = ScopeStack::new();
        stack
            .declare("x", var(Primitive::Integer))
            .expect("first should succeed");

        let err = stack
            .declare("x", var(Primitive::Logical))
            .expect_err("second should fail");
        assert_eq!(err.name, "x");
    }

    #[test]
    fn test_shadowing_in_nested_scope_is_allowed() {
        let mut stack = ScopeStack::new();
        stack
            .declare("x", var(Primitive::Integer))
            .expect("should declare");

        stack.push_scope();
        stack
            .declare("x", var(Primitive::Logical))
            .expect("shadowing should be allowed");

        let found = stack.lookup_chain("x").expect("should find");
        assert_eq!(found.to_string(), "logical");

        stack.pop_scope().expect("should pop");
        let found = stack.lookup_chain("x").expect("should find");
        assert_eq!(found.to_string(), "integer");
    }

    // Lookup disciplines

    #[test]
    fn test_lookup_local_ignores_enclosing_scopes() {
        let mut stack = ScopeStack::new();
        stack
            .declare("x", var(Primitive::Integer))
            .expect("should declare");

        stack.push_scope();
        assert!(stack.lookup_local("x").is_none());
        assert!(stack.lookup_chain("x").is_some());
    }

    #[test]
    fn test_lookup_chain_searches_innermost_first() {
        let mut stack = ScopeStack::new();
        stack
            .declare("x", var(Primitive::Integer))
            .expect("should declare");
        stack.push_scope();
        stack.push_scope();
        stack
            .declare("x", var(Primitive::Logical))
            .expect("should declare");

        let found = stack.lookup_chain("x").expect("should find");
        assert_eq!(found.to_string(), "logical");
    }

    #[test]
    fn test_lookup_chain_not_found() {
        let stack = ScopeStack::new();
        assert!(stack.lookup_chain("nonexistent").is_none());
    }

    #[test]
    fn test_popped_scope_bindings_are_gone() {
        let mut stack = ScopeStack::new();
        stack.push_scope();
        stack
            .declare("local", var(Primitive::Integer))
            .expect("should declare");
        stack.pop_scope().expect("should pop");

        assert!(stack.lookup_chain("local").is_none());
    }

    // Scope iteration

    #[test]
    fn test_scope_iterates_in_declaration_order() {
        let mut scope = Scope::new();
        scope.declare("b", var(Primitive::Integer)).expect("ok");
        scope.declare("a", var(Primitive::Integer)).expect("ok");
        scope.declare("c", var(Primitive::Logical)).expect("ok");

        let names: Vec<&str> = scope.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "a", "c"]);
        assert_eq!(scope.len(), 3);
        assert!(!scope.is_empty());
    }
}
