//! A bound type: a type node paired with the current map from `TypeParam`
//! definitions to argument type nodes. Construction eagerly unwinds
//! `Type` wrappers, resolves qualified names to their definitions
//! (merging in the definition's own bindings), substitutes bound type
//! parameters, and reduces `TypeView`, stopping at whichever shape the
//! unwinding can't simplify further.
//!
//! Grounded on `BtypeDef`'s constructor and `reduce_view` method.

use std::collections::HashSet;

use verona_core::{Node, Token};
use verona_lookup::{Bindings, lookup_scopedname};

#[derive(Clone)]
pub struct BoundType {
    pub node: Node,
    pub bindings: Bindings,
}

impl BoundType {
    pub fn new(node: Node, bindings: Bindings) -> Self {
        let mut node = node;
        let mut bindings = bindings;
        let mut visited_typeparams: HashSet<Node> = HashSet::new();

        loop {
            match node.token() {
                Token::Type => {
                    node = node.child(0).expect("type wraps an inner type");
                }
                Token::TypeClassName
                | Token::TypeTraitName
                | Token::TypeAliasName
                | Token::TypeParamName => {
                    let resolved = lookup_scopedname(&node);
                    let Some(def) = resolved.defs.into_iter().next() else {
                        // Empty only in test fixtures; a real pipeline never
                        // reaches subtyping with an unresolved name.
                        return Self { node, bindings };
                    };
                    node = def.def;
                    bindings = merge_bindings(&def.bindings, &bindings);

                    if visited_typeparams.contains(&node) {
                        return Self { node, bindings };
                    }
                }
                Token::TypeParam => {
                    // An unbound type parameter effectively binds to itself.
                    visited_typeparams.insert(node.clone());
                    match bindings.get(&node).cloned() {
                        Some(bound) => node = bound,
                        None => return Self { node, bindings },
                    }
                }
                Token::TypeView => {
                    let reduced = reduce_view(Self { node, bindings });
                    node = reduced.node;
                    bindings = reduced.bindings;
                }
                _ => return Self { node, bindings },
            }
        }
    }
}

/// New bindings win over old ones on a key collision.
fn merge_bindings(winner: &Bindings, loser: &Bindings) -> Bindings {
    let mut merged = winner.clone();
    for (k, v) in loser {
        merged.entry(k.clone()).or_insert_with(|| v.clone());
    }
    merged
}

/// The oriented `TypeView(L, R)` rewrite table. Applied once per call;
/// [`BoundType::new`]'s loop re-enters it until the shape stabilises.
fn reduce_view(bt: BoundType) -> BoundType {
    let BoundType { node, bindings } = bt;
    debug_assert_eq!(node.token(), Token::TypeView);
    let lhs_raw = node.child(0).expect("typeview has a lhs");
    let rhs_raw = node.child(1).expect("typeview has a rhs");
    let l = BoundType::new(lhs_raw.deep_clone(), bindings.clone());

    match l.node.token() {
        Token::TypeTuple
        | Token::TypeList
        | Token::Package
        | Token::Class
        | Token::TypeTrait
        | Token::TypeUnit => {
            return BoundType {
                node: Node::new(Token::TypeTrue),
                bindings: l.bindings,
            };
        }
        Token::TypeUnion | Token::TypeIsect => {
            // (A | B).C = A.C | B.C  ((A & B).C = A.C & B.C likewise)
            let connective = Node::new(l.node.token());
            for member in l.node.children() {
                let view = Node::new(Token::TypeView);
                view.push(member.deep_clone());
                view.push(rhs_raw.deep_clone());
                connective.push(view);
            }
            return BoundType {
                node: connective,
                bindings: l.bindings,
            };
        }
        Token::TypeAlias => {
            // This TypeView will itself be reduced when next unwound.
            let inner = l.node.child(2).expect("typealias has an aliased type").deep_clone();
            let view = Node::new(Token::TypeView);
            view.push(inner);
            view.push(rhs_raw.deep_clone());
            return BoundType {
                node: view,
                bindings: merge_bindings(&l.bindings, &bindings),
            };
        }
        Token::TypeTrue | Token::TypeFalse => {
            return BoundType {
                node: l.node,
                bindings: l.bindings,
            };
        }
        _ => {}
    }

    let r = BoundType::new(rhs_raw.deep_clone(), bindings.clone());

    match r.node.token() {
        Token::TypeUnion | Token::TypeIsect | Token::TypeTuple | Token::TypeList => {
            // A.(B & C) = A.B & A.C, A.(B | C) = A.B | A.C, A.(B, C) = A.B, A.C
            let connective = Node::new(r.node.token());
            for member in r.node.children() {
                let view = Node::new(Token::TypeView);
                view.push(l.node.deep_clone());
                view.push(member.deep_clone());
                connective.push(view);
            }
            return BoundType {
                node: connective,
                bindings,
            };
        }
        Token::TypeAlias => {
            let inner = r.node.child(2).expect("typealias has an aliased type").deep_clone();
            let view = Node::new(Token::TypeView);
            view.push(l.node.deep_clone());
            view.push(inner);
            return BoundType {
                node: view,
                bindings: merge_bindings(&r.bindings, &bindings),
            };
        }
        Token::Package | Token::Class | Token::TypeTrait | Token::TypeUnit | Token::TypeTrue | Token::TypeFalse => {
            return BoundType {
                node: r.node,
                bindings: r.bindings,
            };
        }
        // TODO: l in {TypeParam, TypeVar}; r in {TypeParam, TypeVar} — left
        // unreduced below, same as the original.
        Token::Const => {
            // *.Const = Const
            return BoundType {
                node: r.node,
                bindings,
            };
        }
        _ => {}
    }

    if matches!(l.node.token(), Token::Lin | Token::In) && r.node.token() == Token::Lin {
        // (Lin | In).Lin = False
        return BoundType {
            node: Node::new(Token::TypeFalse),
            bindings,
        };
    }

    if matches!(l.node.token(), Token::Lin | Token::In) && matches!(r.node.token(), Token::In | Token::Out) {
        // (Lin | In).(In | Out) = In
        return BoundType {
            node: Node::new(Token::In),
            bindings,
        };
    }

    if (l.node.token() == Token::Out && matches!(r.node.token(), Token::Lin | Token::In | Token::Out))
        || (l.node.token() == Token::Const && matches!(r.node.token(), Token::Lin | Token::In | Token::Out))
    {
        // Out.(Lin | In | Out) = Out, Const.(Lin | In | Out) = Const
        return BoundType {
            node: l.node,
            bindings,
        };
    }

    // Residual TypeView with at least one TypeParam/TypeVar operand: left
    // unreduced and treated opaquely by the solver.
    BoundType { node, bindings }
}
