//! Type scoping and viewpoint adaptation: `DontCare` becomes a fresh type
//! variable, `Id::Id` chains become `TypeClassName`-style scoping, `.` folds
//! into `TypeView`, and `...` folds into `TypeList`.
//!
//! Grounded on `typeview()` in `lang.cc`. The original matches these shapes
//! anywhere a flat run of type tokens occurs (`TypeStruct`); here every such
//! run has already been bucketed as a `Type` node's children by an earlier
//! pass, so every rule below matches `Type` directly and folds one
//! occurrence per firing, relying on the engine's fixpoint loop.

use verona_core::{Node, Token};
use verona_rewrite::{Action, Captures, Direction, Pass, Pattern, Production, Rule, WellFormed};

use crate::util::{fold_infix, infix_index, position_of, postfix_index, synthetic_leaf, wrap_type};

fn has_dontcare(node: &Node) -> bool {
    node.children().iter().any(|c| c.token() == Token::DontCare)
}

fn has_scoping_ident(node: &Node) -> bool {
    node.children().iter().any(|c| c.token() == Token::Ident)
}

fn is_dot(c: &Node) -> bool {
    c.token() == Token::Dot
}

fn is_ellipsis(c: &Node) -> bool {
    c.token() == Token::Ellipsis
}

fn has_dot(node: &Node) -> bool {
    infix_index(&node.children(), is_dot).is_some()
}

fn has_ellipsis(node: &Node) -> bool {
    postfix_index(&node.children(), is_ellipsis).is_some()
}

fn dontcare_to_typevar(node: &Node, _: &Captures) -> Action {
    let mut children = node.children();
    let index = position_of(&children, |c| c.token() == Token::DontCare).unwrap();
    children[index] = synthetic_leaf(Token::TypeVar, &node.fresh("?"));
    let ty = Node::new(Token::Type);
    for c in children {
        ty.push(c);
    }
    Action::Replace(ty)
}

/// Builds `TypeClassName << scope << id << typeargs` for a bare `Ident`, or
/// folds `scope :: Ident` into a new scope when the scope is already a
/// resolved type name.
fn scope_ident(node: &Node, _: &Captures) -> Action {
    let mut children = node.children();
    let index = position_of(&children, |c| {
        c.token() == Token::Ident
    })
    .unwrap();

    let id = children.remove(index);
    let typeargs = if children.get(index).map(|c| c.token()) == Some(Token::TypeArgs) {
        children.remove(index)
    } else {
        Node::new(Token::TypeArgs)
    };

    let has_scope = index > 0 && children.get(index - 1).map(|c| c.token()) == Some(Token::DoubleColon);
    let scope = if has_scope {
        children.remove(index - 1); // DoubleColon marker
        children.remove(index - 2)
    } else {
        Node::new(Token::TypeUnit)
    };

    let name = Node::new(Token::TypeClassName);
    name.push(scope);
    name.push(id);
    name.push(typeargs);

    let insert_at = if has_scope { index - 2 } else { index };
    children.insert(insert_at, name);

    let ty = Node::new(Token::Type);
    for c in children {
        ty.push(c);
    }
    Action::Replace(ty)
}

fn fold_dot(node: &Node, _: &Captures) -> Action {
    let children = node.children();
    let index = infix_index(&children, is_dot).unwrap();
    let new_children = fold_infix(children, index, |lhs, rhs| {
        let view = Node::new(Token::TypeView);
        view.push(wrap_type(lhs));
        view.push(wrap_type(rhs));
        view
    });
    let ty = Node::new(Token::Type);
    for c in new_children {
        ty.push(c);
    }
    Action::Replace(ty)
}

fn fold_ellipsis(node: &Node, _: &Captures) -> Action {
    let mut children = node.children();
    let index = postfix_index(&children, is_ellipsis).unwrap();
    children.remove(index); // the `...` marker itself, a postfix operator
    let elem = children.remove(index - 1);
    let list = Node::new(Token::TypeList);
    list.push(wrap_type(elem));
    children.insert(index - 1, list);

    let ty = Node::new(Token::Type);
    for c in children {
        ty.push(c);
    }
    Action::Replace(ty)
}

fn has_doublecolon(node: &Node) -> bool {
    node.children().iter().any(|c| c.token() == Token::DoubleColon)
}

fn has_typeargs(node: &Node) -> bool {
    node.children().iter().any(|c| c.token() == Token::TypeArgs)
}

fn misplaced_doublecolon(_: &Node, _: &Captures) -> Action {
    Action::Error("misplaced type scope".to_string())
}

fn misplaced_typeargs(_: &Node, _: &Captures) -> Action {
    Action::Error("type arguments on their own are not a type".to_string())
}

pub fn pass() -> Pass {
    let rules = vec![
        Rule::new("dontcare-to-typevar", Pattern::when(Pattern::tok(Token::Type), has_dontcare), dontcare_to_typevar),
        Rule::new("scope-ident", Pattern::when(Pattern::tok(Token::Type), has_scoping_ident), scope_ident),
        Rule::new("fold-dot-view", Pattern::when(Pattern::tok(Token::Type), has_dot), fold_dot),
        Rule::new("fold-ellipsis-list", Pattern::when(Pattern::tok(Token::Type), has_ellipsis), fold_ellipsis),
        Rule::new("misplaced-doublecolon", Pattern::when(Pattern::tok(Token::Type), has_doublecolon), misplaced_doublecolon),
        Rule::new("misplaced-typeargs-alone", Pattern::when(Pattern::tok(Token::Type), has_typeargs), misplaced_typeargs),
    ];

    let schema = WellFormed::new().with(Token::TypeClassName, Production::new([]).arity(3, Some(3)));

    Pass::new("typeview", Direction::TopDown, rules, schema)
}
