//! Function types: `->` folds into `TypeFunc`, right-associative (the only
//! right-associative operator in the type grammar).
//!
//! Grounded on `typefunc()` in `lang.cc`.

use verona_core::{Node, Token};
use verona_rewrite::{Action, Captures, Direction, Pass, Pattern, Production, Rule, WellFormed};

use crate::util::{fold_infix, rinfix_index, wrap_type};

fn is_arrow(c: &Node) -> bool {
    c.token() == Token::Arrow
}

fn has_arrow(node: &Node) -> bool {
    rinfix_index(&node.children(), is_arrow).is_some()
}

/// Right-associative: fold the *rightmost* arrow first, so the left side
/// (which may still contain earlier arrows) is revisited by the engine as
/// a freshly wrapped `Type` subtree.
fn fold_arrow(node: &Node, _: &Captures) -> Action {
    let children = node.children();
    let index = rinfix_index(&children, is_arrow).unwrap();
    let new_children = fold_infix(children, index, |lhs, rhs| {
        let func = Node::new(Token::TypeFunc);
        func.push(wrap_type(lhs));
        func.push(wrap_type(rhs));
        func
    });
    let ty = Node::new(Token::Type);
    for c in new_children {
        ty.push(c);
    }
    Action::Replace(ty)
}

fn misplaced_arrow(node: &Node, _: &Captures) -> Action {
    if node.children().iter().all(|c| !is_arrow(c)) {
        return Action::NoChange;
    }
    Action::Error("misplaced function type".to_string())
}

pub fn pass() -> Pass {
    let rules = vec![
        Rule::new("fold-arrow-func", Pattern::when(Pattern::tok(Token::Type), has_arrow), fold_arrow),
        Rule::new("misplaced-arrow", Pattern::tok(Token::Type), misplaced_arrow),
    ];

    let schema = WellFormed::new().with(Token::TypeFunc, Production::new([Token::Type]).arity(2, Some(2)));

    Pass::new("typefunc", Direction::TopDown, rules, schema)
}
