//! Detects a `TypeAlias` that recursively expands into itself, directly or
//! through other aliases and bound type parameters. The subtyping solver's
//! bound-type construction assumes acyclic aliases (it only breaks cycles
//! through the *unwinding scope*, not through arbitrary alias chains), so
//! this check runs first and rejects the definition outright.

use std::collections::{HashSet, VecDeque};

use verona_core::{Node, Token};

use crate::lookdown::{Bindings, lookup_scopedname};

/// New bindings win over old ones on a key collision, matching the
/// original's "insert def's bindings, then swap in the rest of the old map."
fn merge(old: &Bindings, new: &Bindings) -> Bindings {
    let mut merged = old.clone();
    merged.extend(new.clone());
    merged
}

pub fn lookup_recursive(node: &Node) -> bool {
    if node.token() != Token::TypeAlias {
        return false;
    }

    let aliased = node.child(2).expect("typealias has an aliased type");
    let mut worklist: VecDeque<(HashSet<Node>, Node, Bindings)> = VecDeque::new();
    worklist.push_back((HashSet::from([node.clone()]), aliased, Bindings::new()));

    while let Some((set, ty, bindings)) = worklist.pop_front() {
        match ty.token() {
            Token::Type => {
                let inner = ty.child(0).expect("type wraps an inner type");
                worklist.push_back((set, inner, bindings));
            }
            Token::TypeTuple | Token::TypeUnion | Token::TypeIsect | Token::TypeView => {
                for t in ty.children() {
                    worklist.push_back((set.clone(), t, bindings.clone()));
                }
            }
            Token::TypeAliasName => {
                let resolved = lookup_scopedname(&ty);
                if let Some(def) = resolved.defs.first() {
                    if set.contains(&def.def) {
                        return true;
                    }
                    let mut set = set.clone();
                    set.insert(def.def.clone());
                    let bindings = merge(&bindings, &def.bindings);
                    let aliased = def.def.child(2).expect("typealias has an aliased type");
                    worklist.push_back((set, aliased, bindings));
                }
            }
            Token::TypeParamName => {
                let resolved = lookup_scopedname(&ty);
                if let Some(def) = resolved.defs.first() {
                    if let Some(bound) = bindings.get(&def.def).cloned() {
                        worklist.push_back((set, bound, bindings));
                    }
                }
            }
            _ => {}
        }
    }

    false
}
