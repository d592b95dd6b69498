//! Wraps concrete-syntax groupings into the first structural skeleton:
//! a `Directory` or a loose top-level `File` becomes an implicit `Class`;
//! `package "..."` descriptors and `: T` type assertions are recognised.
//!
//! Grounded on `modules()` in `lang.cc`.

use verona_core::{Location, Node, Token};
use verona_rewrite::{Action, Captures, Direction, Pass, Pattern, Production, Rule, WellFormed};

use crate::util::take_children;

fn err(node: &Node, message: &str) -> Action {
    Action::Error(format!("{message} (at `{}`)", node.token()))
}

fn implicit_class(id_location: Option<Location>, contents: Vec<Node>) -> Node {
    let class = Node::new(Token::Class);
    let id = match id_location {
        Some(loc) => Node::new_leaf(Token::Ident, loc),
        None => Node::new(Token::Ident),
    };
    class.push(id);
    class.push(Node::new(Token::TypeParams));
    class.push(Node::new(Token::Type));
    let body = Node::new(Token::ClassBody);
    for child in contents {
        body.push(child);
    }
    class.push(body);
    class
}

/// A `Directory`'s `File` children are flattened directly into the
/// synthesised class body; `File` itself carries no meaning once grouped.
fn wrap_directory(node: &Node, _: &Captures) -> Action {
    let location = node.location();
    let contents = take_children(node)
        .into_iter()
        .flat_map(|file| take_children(&file))
        .collect();
    Action::Replace(implicit_class(location, contents))
}

/// A `File` not already inside a `Directory` is a module on its own.
fn wrap_loose_file(node: &Node, _: &Captures) -> Action {
    if verona_rewrite::in_context(node, Token::Directory) {
        return Action::NoChange;
    }
    let location = node.location();
    Action::Replace(implicit_class(location, take_children(node)))
}

fn package_descriptor(node: &Node, _: &Captures) -> Action {
    let children = take_children(node);
    let Some(string_child) = children
        .into_iter()
        .find(|c| matches!(c.token(), Token::String | Token::Escaped))
    else {
        return err(node, "`package` must have a descriptor string");
    };
    let package = Node::new(Token::Package);
    package.push(string_child);
    Action::Replace(package)
}

/// A `Group` headed by `:` holds the asserted type's tokens as the rest of
/// its children (the enclosing grouping stage already bucketed them there).
fn is_type_assertion_group(node: &Node) -> bool {
    node.token() == Token::Group && node.child(0).is_some_and(|c| c.token() == Token::Colon)
}

fn type_assertion(node: &Node, _: &Captures) -> Action {
    let ty = Node::new(Token::Type);
    let mut rest = take_children(node);
    rest.remove(0); // the `Colon` marker itself
    if rest.is_empty() {
        ty.push(Node::new(Token::DontCare));
    } else {
        for child in rest {
            ty.push(child);
        }
    }
    Action::Replace(ty)
}

pub fn pass() -> Pass {
    let rules = vec![
        Rule::new("directory-to-class", Pattern::tok(Token::Directory), wrap_directory),
        Rule::new("loose-file-to-class", Pattern::tok(Token::File), wrap_loose_file),
        Rule::new("package-descriptor", Pattern::tok(Token::Package), package_descriptor),
        Rule::new(
            "type-assertion",
            Pattern::when(Pattern::tok(Token::Group), is_type_assertion_group),
            type_assertion,
        ),
    ];

    let schema = WellFormed::new()
        .with(
            Token::Package,
            Production::new([Token::String, Token::Escaped]).arity(1, Some(1)),
        )
        .with(Token::Type, Production::new([]));

    Pass::new("modules", Direction::TopDown, rules, schema)
}
