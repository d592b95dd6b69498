//! Flattens nested algebraic types (`A | (B | C)` -> `A | B | C`), collapses
//! degenerate tuples (`TypeTuple` of arity 0/1), and unwraps a `Type` node
//! whose only child is itself a `Type` or is empty.
//!
//! Grounded on `typeflat()` in `lang.cc`.

use verona_core::{Node, Token};
use verona_rewrite::{Action, Captures, Direction, Pass, Pattern, Production, Rule, WellFormed};

use crate::util::{flatten_into, take_children, take_child};

fn has_nested(node: &Node, tok: Token) -> bool {
    node.children().iter().any(|c| c.token() == tok)
}

fn flatten_same(node: &Node, tok: Token, build: impl FnOnce() -> Node) -> Action {
    if !has_nested(node, tok) {
        return Action::NoChange;
    }
    let result = build();
    let mut flat = Vec::new();
    for child in take_children(node) {
        flatten_into(&mut flat, child, tok);
    }
    for c in flat {
        result.push(c);
    }
    Action::Replace(result)
}

fn flatten_union(node: &Node, _: &Captures) -> Action {
    flatten_same(node, Token::TypeUnion, || Node::new(Token::TypeUnion))
}

fn flatten_isect(node: &Node, _: &Captures) -> Action {
    flatten_same(node, Token::TypeIsect, || Node::new(Token::TypeIsect))
}

fn collapse_tuple(node: &Node, _: &Captures) -> Action {
    match node.child_count() {
        0 => Action::Replace(Node::new(Token::TypeUnit)),
        1 => Action::Replace(take_child(node, 0).unwrap()),
        _ => Action::NoChange,
    }
}

/// A `Type` wrapping exactly one `Type` child collapses to that child; an
/// empty `Type` becomes the unit type; anything else left over (more than
/// one remaining child) means an earlier fold left two elements merely
/// adjacent, which isn't a valid type.
fn flatten_type(node: &Node, _: &Captures) -> Action {
    match node.child_count() {
        0 => {
            let ty = Node::new(Token::Type);
            ty.push(Node::new(Token::TypeUnit));
            Action::Replace(ty)
        }
        1 => {
            let only = node.child(0).unwrap();
            if only.token() == Token::Type {
                Action::Replace(take_child(node, 0).unwrap())
            } else {
                Action::NoChange
            }
        }
        _ => Action::Error("can't use adjacency to specify a type".to_string()),
    }
}

fn nested_throw(node: &Node, _: &Captures) -> Action {
    let wrapped = node.child(0).and_then(|ty| ty.child(0));
    if wrapped.is_some_and(|c| c.token() == Token::TypeThrow) {
        return Action::Error("can't throw a throw type".to_string());
    }
    Action::NoChange
}

pub fn pass() -> Pass {
    let rules = vec![
        Rule::new("flatten-union", Pattern::tok(Token::TypeUnion), flatten_union),
        Rule::new("flatten-isect", Pattern::tok(Token::TypeIsect), flatten_isect),
        Rule::new("collapse-tuple", Pattern::tok(Token::TypeTuple), collapse_tuple),
        Rule::new("nested-throw", Pattern::tok(Token::TypeThrow), nested_throw),
        Rule::new("flatten-type", Pattern::tok(Token::Type), flatten_type),
    ];

    let schema = WellFormed::new()
        .with(Token::Type, Production::new([]).arity(1, Some(1)))
        .with(Token::TypeUnion, Production::new([]).arity(2, None))
        .with(Token::TypeIsect, Production::new([]).arity(2, None));

    Pass::new("typeflat", Direction::BottomUp, rules, schema)
}
