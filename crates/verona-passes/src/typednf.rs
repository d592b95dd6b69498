//! Disjunctive normal form: distributes `TypeThrow` and `TypeIsect` over
//! nested `TypeUnion`s, then re-flattens and re-validates the throw-type
//! invariants DNF can regenerate.
//!
//! Grounded on `typednf()` in `lang.cc`.

use verona_core::{Node, Token};
use verona_rewrite::{Action, Captures, Direction, Pass, Pattern, Production, Rule, WellFormed};

use crate::util::{flatten_into, take_child, take_children, wrap_type};

fn inner_of(node: &Node) -> Option<Node> {
    node.child(0).and_then(|ty| ty.child(0))
}

fn is_throw_over_union(node: &Node) -> bool {
    inner_of(node).is_some_and(|c| c.token() == Token::TypeUnion)
}

fn is_nested_throw(node: &Node) -> bool {
    inner_of(node).is_some_and(|c| c.token() == Token::TypeThrow)
}

fn throw_over_union(node: &Node, _: &Captures) -> Action {
    let inner = inner_of(node).expect("`is_throw_over_union` guarantees this");
    take_child(node, 0); // the `Type` wrapper, now discarded
    let union = Node::new(Token::TypeUnion);
    for member in take_children(&inner) {
        // `member` is already `Type`-wrapped (a `TypeUnion`'s members always
        // are), so it becomes `TypeThrow`'s single child directly.
        let throw = Node::new(Token::TypeThrow);
        throw.push(member);
        union.push(wrap_type(throw));
    }
    Action::Replace(union)
}

fn nested_throw_error(_: &Node, _: &Captures) -> Action {
    Action::Error("can't throw a throw type".to_string())
}

fn has_nested_isect(node: &Node) -> bool {
    node.children().iter().any(|c| c.token() == Token::TypeIsect)
}

fn has_union_member(node: &Node) -> bool {
    node.children().iter().any(|m| m.child(0).is_some_and(|inner| inner.token() == Token::TypeUnion))
}

fn all_throws(node: &Node) -> bool {
    node.child_count() >= 1 && node.children().iter().all(|m| m.child(0).is_some_and(|inner| inner.token() == Token::TypeThrow))
}

fn is_mixed_throw(node: &Node) -> bool {
    let members = node.children();
    let any_throw = members.iter().any(|m| m.child(0).is_some_and(|i| i.token() == Token::TypeThrow));
    let any_non_throw = members.iter().any(|m| m.child(0).is_some_and(|i| i.token() != Token::TypeThrow));
    any_throw && any_non_throw
}

fn flatten_isect_nested(node: &Node, _: &Captures) -> Action {
    let result = Node::new(Token::TypeIsect);
    let mut flat = Vec::new();
    for child in take_children(node) {
        flatten_into(&mut flat, child, Token::TypeIsect);
    }
    for c in flat {
        result.push(c);
    }
    Action::Replace(result)
}

fn isect_over_union(node: &Node, _: &Captures) -> Action {
    let mut members = node.children();
    let union_index = members
        .iter()
        .position(|m| m.child(0).is_some_and(|inner| inner.token() == Token::TypeUnion))
        .expect("`has_union_member` guarantees this");

    let union_member = members.remove(union_index);
    let union_inner = union_member.child(0).unwrap();
    take_child(&union_member, 0);
    let union_parts = take_children(&union_inner);

    let result = Node::new(Token::TypeUnion);
    for part in union_parts {
        let isect = Node::new(Token::TypeIsect);
        for other in &members {
            isect.push(other.deep_clone());
        }
        isect.push(part);
        result.push(wrap_type(isect));
    }
    Action::Replace(result)
}

fn combine_throws(node: &Node, _: &Captures) -> Action {
    let isect = Node::new(Token::TypeIsect);
    for member in take_children(node) {
        let throw = take_child(&member, 0).unwrap();
        let thrown_type = take_child(&throw, 0).unwrap();
        isect.push(thrown_type);
    }
    let throw = Node::new(Token::TypeThrow);
    throw.push(wrap_type(isect));
    Action::Replace(throw)
}

fn mixed_throw_error(_: &Node, _: &Captures) -> Action {
    Action::Error("can't intersect a throw type with a non-throw type".to_string())
}

fn has_nested_union(node: &Node) -> bool {
    node.children().iter().any(|c| c.token() == Token::TypeUnion)
}

fn flatten_union_nested(node: &Node, _: &Captures) -> Action {
    let result = Node::new(Token::TypeUnion);
    let mut flat = Vec::new();
    for child in take_children(node) {
        flatten_into(&mut flat, child, Token::TypeUnion);
    }
    for c in flat {
        result.push(c);
    }
    Action::Replace(result)
}

pub fn pass() -> Pass {
    let rules = vec![
        Rule::new("throw-over-union", Pattern::when(Pattern::tok(Token::TypeThrow), is_throw_over_union), throw_over_union),
        Rule::new("nested-throw", Pattern::when(Pattern::tok(Token::TypeThrow), is_nested_throw), nested_throw_error),
        Rule::new("flatten-isect-nested", Pattern::when(Pattern::tok(Token::TypeIsect), has_nested_isect), flatten_isect_nested),
        Rule::new("isect-over-union", Pattern::when(Pattern::tok(Token::TypeIsect), has_union_member), isect_over_union),
        Rule::new("combine-throws", Pattern::when(Pattern::tok(Token::TypeIsect), all_throws), combine_throws),
        Rule::new("mixed-throw-isect", Pattern::when(Pattern::tok(Token::TypeIsect), is_mixed_throw), mixed_throw_error),
        Rule::new("flatten-union-nested", Pattern::when(Pattern::tok(Token::TypeUnion), has_nested_union), flatten_union_nested),
    ];

    let schema = WellFormed::new();
    Pass::new("typednf", Direction::BottomUp, rules, schema)
}
