//! The stack of open scopes while declarations are being read.

/// Names of the currently open scopes, outermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopeStack {
    names: Vec<String>,
}

impl ScopeStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a scope.
    pub fn push(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    /// Closes the innermost scope, returning its name.
    pub fn pop(&mut self) -> Option<String> {
        self.names.pop()
    }

    /// Returns a copy of the current path.
    pub fn path(&self) -> Vec<String> {
        self.names.clone()
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` when no scope is open.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
