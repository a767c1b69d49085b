//! Scope stack for name resolution
//!
//! Tracks nested lexical scopes during AST traversal. Lookups walk from the
//! innermost scope outward, so inner declarations shadow outer ones.

use rustc_hash::FxHashMap;

/// Stack of lexical scopes mapping names to bindings of type `V`
#[derive(Debug, Clone)]
pub struct ScopeStack<V> {
    scopes: Vec<FxHashMap<String, V>>,
}

impl<V: Copy> ScopeStack<V> {
    /// Create an empty stack (no scope open)
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Push a new scope
    pub fn push(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Pop the current scope
    pub fn pop(&mut self) -> Option<FxHashMap<String, V>> {
        self.scopes.pop()
    }

    /// Bind `name` in the innermost scope. Returns the shadowed binding of the
    /// same scope, if any.
    pub fn declare(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        if self.scopes.is_empty() {
            self.push();
        }
        self.scopes
            .last_mut()
            .and_then(|scope| scope.insert(name.into(), value))
    }

    /// Look a name up, innermost scope first
    pub fn lookup(&self, name: &str) -> Option<V> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    /// Look a name up in the innermost scope only
    pub fn lookup_local(&self, name: &str) -> Option<V> {
        self.scopes.last().and_then(|scope| scope.get(name).copied())
    }

    /// Current depth
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Clear all scopes
    pub fn clear(&mut self) {
        self.scopes.clear();
    }

    /// Execute a closure within a new scope
    pub fn with_scope<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.push();
        let result = f(self);
        self.pop();
        result
    }
}

impl<V: Copy> Default for ScopeStack<V> {
    fn default() -> Self {
        Self::new()
    }
}
