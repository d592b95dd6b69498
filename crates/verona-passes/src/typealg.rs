//! Algebraic types: `&` folds into `TypeIsect`, `|` into `TypeUnion`. There
//! are no dedicated tokens for these operators, so they arrive as `Symbol`
//! leaves and are matched by their location text; `&` binds tighter, so the
//! union fold only runs once no `&` remains.
//!
//! Grounded on `typealg()` in `lang.cc`.

use verona_core::{Node, Token};
use verona_rewrite::{Action, Captures, Direction, Pass, Pattern, Production, Rule, WellFormed};

use crate::util::{fold_infix, infix_index, wrap_type};

fn is_amp(c: &Node) -> bool {
    c.token() == Token::Symbol && c.location().is_some_and(|l| l.text() == "&")
}

fn is_pipe(c: &Node) -> bool {
    c.token() == Token::Symbol && c.location().is_some_and(|l| l.text() == "|")
}

fn is_other_symbol(c: &Node) -> bool {
    c.token() == Token::Symbol && !is_amp(c) && !is_pipe(c)
}

fn has_amp(node: &Node) -> bool {
    infix_index(&node.children(), is_amp).is_some()
}

fn has_pipe_only(node: &Node) -> bool {
    let children = node.children();
    infix_index(&children, is_pipe).is_some() && infix_index(&children, is_amp).is_none()
}

fn has_other_symbol(node: &Node) -> bool {
    node.children().iter().any(is_other_symbol)
}

fn fold_amp(node: &Node, _: &Captures) -> Action {
    let children = node.children();
    let index = infix_index(&children, is_amp).unwrap();
    let new_children = fold_infix(children, index, |lhs, rhs| {
        let isect = Node::new(Token::TypeIsect);
        isect.push(wrap_type(lhs));
        isect.push(wrap_type(rhs));
        isect
    });
    let ty = Node::new(Token::Type);
    for c in new_children {
        ty.push(c);
    }
    Action::Replace(ty)
}

fn fold_pipe(node: &Node, _: &Captures) -> Action {
    let children = node.children();
    let index = infix_index(&children, is_pipe).unwrap();
    let new_children = fold_infix(children, index, |lhs, rhs| {
        let union = Node::new(Token::TypeUnion);
        union.push(wrap_type(lhs));
        union.push(wrap_type(rhs));
        union
    });
    let ty = Node::new(Token::Type);
    for c in new_children {
        ty.push(c);
    }
    Action::Replace(ty)
}

fn invalid_symbol(node: &Node, _: &Captures) -> Action {
    if !has_other_symbol(node) {
        return Action::NoChange;
    }
    Action::Error("invalid symbol in type".to_string())
}

pub fn pass() -> Pass {
    let rules = vec![
        Rule::new("fold-isect", Pattern::when(Pattern::tok(Token::Type), has_amp), fold_amp),
        Rule::new("fold-union", Pattern::when(Pattern::tok(Token::Type), has_pipe_only), fold_pipe),
        Rule::new("invalid-symbol", Pattern::tok(Token::Type), invalid_symbol),
    ];

    let schema = WellFormed::new()
        .with(Token::TypeIsect, Production::new([Token::Type]).arity(2, None))
        .with(Token::TypeUnion, Production::new([Token::Type]).arity(2, None));

    Pass::new("typealg", Direction::TopDown, rules, schema)
}
