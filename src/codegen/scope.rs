//! The generator's scope stack.
//!
//! A stack of nested identifier-to-slot maps, searched innermost-first.
//! Each binding records the `stackSize` value at the moment the variable's
//! value was pushed, so its current `[rsp + offset]` is always
//! `(stackSize - stackLoc) * 8`.

use std::collections::HashMap;

struct Var {
    stack_loc: usize,
}

#[derive(Default)]
struct VarScope {
    vars: HashMap<String, Var>,
}

/// Tracks declared variables across nested scopes without owning anything
/// about the AST; purely a bookkeeping structure for stack offsets.
#[derive(Default)]
pub struct ScopeStack {
    scopes: Vec<VarScope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { scopes: vec![] }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(VarScope::default());
    }

    /// Returns the number of variables declared directly in the scope being
    /// left, for the caller to compute `add rsp, n*8`.
    pub fn pop_scope(&mut self) -> usize {
        self.scopes
            .pop()
            .map(|s| s.vars.len())
            .unwrap_or_default()
    }

    /// True if `name` is declared in any visible scope, innermost or not.
    pub fn declare(&mut self, name: &str, stack_size: usize) {
        self.scopes
            .last_mut()
            .expect("declare called with no open scope")
            .vars
            .insert(name.to_string(), Var {
                stack_loc: stack_size,
            });
    }

    /// Innermost-first lookup; returns the bound `stackLoc` if found.
    pub fn resolve(&self, name: &str) -> Option<usize> {
        self.scopes
            .iter()
            .rev()
            .find_map(|s| s.vars.get(name))
            .map(|v| v.stack_loc)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}
