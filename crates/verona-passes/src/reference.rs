//! Classifies a bare `Ident` used in expression position by what it looks
//! up to: a `var` becomes `RefVar`, a `let`/`Param` becomes `RefLet`, a
//! `Class`/`TypeAlias`/`TypeParam` becomes an unscoped `TypeName`, anything
//! else is a `Selector` (a method call target resolved at the call site).
//! A `Dot` followed by a name becomes a `Selector` too, folded later by
//! `reverseapp`.
//!
//! Grounded on `reference()` in `lang.cc`, using `verona_lookup`'s
//! `lookup_name` in place of the original's inline `lookup(n, {...})`.

use verona_core::{Node, Token};
use verona_lookup::lookup_name;
use verona_rewrite::{Action, Captures, Direction, Pass, Pattern, Production, Rule, WellFormed};

use crate::util::take_children;

fn is_ident_in_expr(node: &Node) -> bool {
    node.token() == Token::Ident && node.parent().is_some_and(|p| p.token() == Token::Expr)
}

fn classify_ident(node: &Node, _: &Captures) -> Action {
    if node.location().is_none() {
        return Action::NoChange;
    }
    // `node` is the node this rule's `Action::Replace` will overwrite in
    // place, so the ident carried into the replacement must be a detached
    // copy, never `node` itself (it still has a parent until the engine
    // applies the replacement).
    let id = node.deep_clone();
    let hits = lookup_name(node, None);
    let target_tok = hits.defs.first().map(|h| h.def.token());

    let wrapper = match target_tok {
        Some(Token::Var) => Token::RefVar,
        Some(Token::Let) | Some(Token::Param) => Token::RefLet,
        Some(Token::Class) | Some(Token::TypeAlias) | Some(Token::TypeParam) => {
            let name = Node::new(Token::TypeName);
            name.push(Node::new(Token::TypeUnit));
            name.push(id);
            return Action::Replace(wrap_with_typeargs(name, node));
        }
        _ => {
            let selector = Node::new(Token::Selector);
            selector.push(id);
            return Action::Replace(wrap_with_typeargs(selector, node));
        }
    };

    let wrapped = Node::new(wrapper);
    wrapped.push(id);
    Action::Replace(wrapped)
}

/// `TypeName`/`Selector` both end in a `TypeArgs` slot, filled from a
/// sibling `TypeArgs` node if the concrete syntax supplied one.
fn wrap_with_typeargs(built: Node, node: &Node) -> Node {
    let sibling_typeargs = node.parent().and_then(|p| {
        let typeargs = p.children().into_iter().find(|c| c.token() == Token::TypeArgs)?;
        p.remove_child(&typeargs);
        Some(typeargs)
    });
    built.push(sibling_typeargs.unwrap_or_else(|| Node::new(Token::TypeArgs)));
    built
}

/// `Dot Ident TypeArgs?` is a member-access name, not a local variable, so
/// it's folded into a `Selector` here — before `classify-ident` gets a
/// chance to see the `Ident` as a bare local reference — leaving the `Dot`
/// itself in place as a marker for `reverseapp` to fold into a call.
fn dot_name_index(children: &[Node]) -> Option<usize> {
    (0..children.len())
        .find(|&i| children[i].token() == Token::Dot && children.get(i + 1).is_some_and(|n| n.token() == Token::Ident))
}

fn has_dot_name(node: &Node) -> bool {
    dot_name_index(&node.children()).is_some()
}

fn fold_dot_name(node: &Node, _: &Captures) -> Action {
    let mut children = take_children(node);
    let dot_index = dot_name_index(&children).unwrap();
    let id = children.remove(dot_index + 1);
    let typeargs = if children.get(dot_index + 1).map(|c| c.token()) == Some(Token::TypeArgs) {
        children.remove(dot_index + 1)
    } else {
        Node::new(Token::TypeArgs)
    };
    let selector = Node::new(Token::Selector);
    selector.push(id);
    selector.push(typeargs);
    children.insert(dot_index + 1, selector);

    let expr = Node::new(Token::Expr);
    for c in children {
        expr.push(c);
    }
    Action::Replace(expr)
}

pub fn pass() -> Pass {
    let rules = vec![
        Rule::new("fold-dot-name", Pattern::when(Pattern::tok(Token::Expr), has_dot_name), fold_dot_name),
        Rule::new("classify-ident", Pattern::when(Pattern::tok(Token::Ident), is_ident_in_expr), classify_ident),
    ];

    let schema = WellFormed::new()
        .with(Token::RefVar, Production::new([Token::Ident]).arity(1, Some(1)))
        .with(Token::RefLet, Production::new([Token::Ident]).arity(1, Some(1)))
        .with(Token::Selector, Production::new([Token::Ident, Token::TypeArgs]).arity(2, Some(2)))
        .with(Token::TypeName, Production::new([]).arity(3, Some(3)));

    Pass::new("reference", Direction::TopDown, rules, schema)
}
