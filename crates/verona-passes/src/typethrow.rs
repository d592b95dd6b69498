//! Prefix `throw T` folds into `TypeThrow`, binding tighter than `&`/`|`.
//!
//! Grounded on `typethrow()` in `lang.cc`.

use verona_core::{Node, Token};
use verona_rewrite::{Action, Captures, Direction, Pass, Pattern, Production, Rule, WellFormed};

use crate::util::{fold_prefix, prefix_index, wrap_type};

fn is_throw(c: &Node) -> bool {
    c.token() == Token::Throw
}

fn has_throw(node: &Node) -> bool {
    prefix_index(&node.children(), is_throw).is_some()
}

fn fold_throw(node: &Node, _: &Captures) -> Action {
    let children = node.children();
    let index = prefix_index(&children, is_throw).unwrap();
    let new_children = fold_prefix(children, index, |rhs| {
        let throw = Node::new(Token::TypeThrow);
        throw.push(wrap_type(rhs));
        throw
    });
    let ty = Node::new(Token::Type);
    for c in new_children {
        ty.push(c);
    }
    Action::Replace(ty)
}

fn misplaced_throw(node: &Node, _: &Captures) -> Action {
    if node.children().iter().all(|c| !is_throw(c)) {
        return Action::NoChange;
    }
    Action::Error("must indicate what type is thrown".to_string())
}

pub fn pass() -> Pass {
    let rules = vec![
        Rule::new("fold-throw", Pattern::when(Pattern::tok(Token::Type), has_throw), fold_throw),
        Rule::new("misplaced-throw", Pattern::tok(Token::Type), misplaced_throw),
    ];

    let schema = WellFormed::new().with(Token::TypeThrow, Production::new([Token::Type]).arity(1, Some(1)));

    Pass::new("typethrow", Direction::TopDown, rules, schema)
}
