//! The symbol table: a stack of named scopes.

use std::collections::HashMap;

use crate::ast::types::TypeSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
}

/// A named binding recording a variable or function's declared
/// properties. Entries are value copies owned by the table.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub node_type: TypeSystem,
    pub kind: SymbolKind,
    pub parameter_types: Vec<TypeSystem>,
    pub is_mutable: bool,
    pub is_constant: bool,
    pub scope_depth: usize,
}

/// An ordered sequence of scopes; index 0 is the global scope.
///
/// The table is never empty during analysis and pushes/pops stay
/// balanced: popping the global scope is a programming bug.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, Symbol>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![HashMap::new()],
        }
    }

    /// Depth of the innermost scope; the global scope is depth 0.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        debug_assert!(self.scopes.len() > 1, "attempted to pop the global scope");
        self.scopes.pop();
    }

    /// Inserts into the innermost scope. A duplicate name in the same
    /// scope is overwritten; the previous entry is returned so the
    /// caller can report the redeclaration.
    pub fn insert(&mut self, symbol: Symbol) -> Option<Symbol> {
        self.scopes
            .last_mut()
            .expect("symbol table has no scopes")
            .insert(symbol.name.clone(), symbol)
    }

    /// Linear search from the innermost scope outward; first match wins.
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Looks a name up in the global scope only.
    pub fn resolve_global(&self, name: &str) -> Option<&Symbol> {
        self.scopes[0].get(name)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}
