//! Traversal and fixpoint application: turns a [`Pass`]'s rule set into
//! tree mutations, in the order the contract in §4.1 describes.

use verona_core::{Node, Token};
use verona_diagnostics::Diagnostics;

use crate::error::Error;
use crate::pass::{Direction, Pass};
use crate::rule::Action;

/// Runs `pass` over `tree` to fixpoint, then validates the result against
/// `pass.schema`. The validation failure is a compiler bug: the caller
/// panics rather than surfacing a `Result`, per the contract that a pass's
/// own rules must never produce output its own schema rejects.
pub fn run_pass(pass: &Pass, tree: &Node, fuel: u32, max_depth: u32) -> Result<Diagnostics, Error> {
    let mut diagnostics = Diagnostics::new();
    let mut remaining_fuel = fuel;
    apply_to_node(pass, tree, &mut remaining_fuel, max_depth, 0, &mut diagnostics)?;

    if let Err(violation) = pass.schema.validate(tree) {
        panic!(
            "pass `{}` produced a tree its own output schema rejects: {violation}",
            pass.name
        );
    }

    Ok(diagnostics)
}

fn apply_to_node(
    pass: &Pass,
    node: &Node,
    fuel: &mut u32,
    max_depth: u32,
    depth: u32,
    diagnostics: &mut Diagnostics,
) -> Result<(), Error> {
    if depth > max_depth {
        return Err(Error::MaxTreeDepthExceeded {
            pass: pass.name,
            max_depth,
        });
    }

    if pass.direction == Direction::BottomUp {
        for child in node.children() {
            apply_to_node(pass, &child, fuel, max_depth, depth + 1, diagnostics)?;
        }
    }

    loop {
        let fired = pass.rules.iter().find_map(|rule| rule.try_fire(node));
        let Some(action) = fired else { break };

        if matches!(action, Action::NoChange) {
            break;
        }

        if *fuel == 0 {
            return Err(Error::RewriteFuelExhausted {
                pass: pass.name,
                fuel: 0,
            });
        }
        *fuel -= 1;

        let stays_in_place = apply_action(node, action, diagnostics);
        if pass.once || !stays_in_place {
            break;
        }
    }

    if pass.direction == Direction::TopDown {
        for child in node.children() {
            apply_to_node(pass, &child, fuel, max_depth, depth + 1, diagnostics)?;
        }
    }

    Ok(())
}

/// Applies one fired action to `node`. Returns `true` if `node` survives at
/// its original position (so the fixpoint loop should re-examine it),
/// `false` if it was spliced out (so the loop must stop).
fn apply_action(node: &Node, action: Action, diagnostics: &mut Diagnostics) -> bool {
    match action {
        Action::Replace(replacement) => {
            node.become_node(replacement);
            true
        }
        Action::Splice(replacements) => {
            node.splice_siblings(replacements);
            false
        }
        Action::Delete => {
            node.splice_siblings(Vec::new());
            false
        }
        Action::NoChange => true,
        Action::Error(message) => {
            if let Some(location) = node.printable_location() {
                diagnostics.error(message.clone(), location).emit();
            }
            node.splice_siblings_with(|fragment| vec![error_node(message, fragment)]);
            false
        }
        Action::Lift(kind, hoisted) => {
            if let Some(ancestor) = node.find_ancestor_of(kind) {
                ancestor.push(hoisted);
            }
            node.splice_siblings(Vec::new());
            false
        }
    }
}

/// Builds an `Error(msg, fragment)` node per the errors-as-values design:
/// a malformed construct becomes an in-tree node, not a panic or `Result`.
/// `fragment` is the original, already-detached node the rule matched on.
fn error_node(message: String, fragment: Node) -> Node {
    let error = Node::new(Token::Error);
    let msg = Node::new(Token::ErrorMsg);
    msg.push(synthetic_string(&message));
    let ast = Node::new(Token::ErrorAst);
    ast.push(fragment);
    error.push(msg);
    error.push(ast);
    error
}

/// A `String` leaf whose location slices into a synthetic, message-backed
/// source file — there is no concrete-syntax span for a diagnostic string
/// the engine invents itself.
fn synthetic_string(text: &str) -> Node {
    let file = verona_core::SourceFile::new("<error>", text.to_string());
    let location = verona_core::Location::new(file, 0, text.len() as u32);
    Node::new_leaf(Token::String, location)
}
