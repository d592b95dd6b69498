//! Per-node symbol tables.
//!
//! Each `symtab`-capable node owns one [`SymbolTable`], mapping an
//! identifier's spelling to the ordered list of nodes bound at that name in
//! its scope. Upward lookup walks the chain of `symtab` ancestors; `lookdown`
//! (in `verona-lookup`) consults a single table directly. Modeled as a cheap
//! `Rc`-shared handle, mirroring the teacher's `Interner`/`SymbolTable`
//! pattern of a shared, mutable side-table keyed by `IndexMap`.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::node::Node;

#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error("`{0}` is already bound in this scope")]
    Collision(String),
}

#[derive(Default)]
struct SymbolTableData {
    bindings: IndexMap<String, Vec<Node>>,
}

/// A shared handle to one scope's bindings.
#[derive(Clone)]
pub struct SymbolTable(Rc<RefCell<SymbolTableData>>);

impl SymbolTable {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(SymbolTableData::default())))
    }

    /// Bind `name` to `def` in this scope.
    ///
    /// If `name` is already bound and `def`'s token is `shadowing`, the new
    /// binding is appended (shadowing the earlier one on lookup, which
    /// returns the most-recently-bound candidate first); otherwise a
    /// collision with a non-shadowing token is an error, per the symbol
    /// table invariants.
    pub fn bind(&self, name: &str, def: Node) -> Result<(), BindError> {
        let mut data = self.0.borrow_mut();
        let existing = data.bindings.get(name);
        if existing.is_some_and(|v| !v.is_empty()) && !def.token().is_shadowing() {
            return Err(BindError::Collision(name.to_string()));
        }
        data.bindings.entry(name.to_string()).or_default().push(def);
        Ok(())
    }

    /// All nodes currently bound at `name` in this scope, most recent first.
    pub fn lookup_local(&self, name: &str) -> Vec<Node> {
        let mut result = self
            .0
            .borrow()
            .bindings
            .get(name)
            .cloned()
            .unwrap_or_default();
        result.reverse();
        result
    }

    /// Remove `def`'s contribution to this table. Used when a node is
    /// detached from the tree: "removing a node from the tree removes its
    /// contribution from every ancestor's table."
    pub fn unbind(&self, name: &str, def: &Node) {
        let mut data = self.0.borrow_mut();
        if let Some(list) = data.bindings.get_mut(name) {
            list.retain(|n| n != def);
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.0.borrow().bindings.keys().cloned().collect()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Upward lookup: starting at `id`'s containing scope, walk `symtab`
/// ancestors outward, returning the first scope with a non-empty binding
/// list for `name`.
pub fn lookup_upward(start: &Node, name: &str) -> Vec<Node> {
    let mut scope = start.find_scope();
    while let Some(s) = scope {
        if let Some(table) = s.symtab() {
            let found = table.lookup_local(name);
            if !found.is_empty() {
                return found;
            }
        }
        scope = s.parent().and_then(|p| p.find_scope());
    }
    Vec::new()
}
