//! Rules: a pattern plus an action, and the replacement vocabulary an
//! action can return.

use verona_core::{Node, Token};

use crate::pattern::{Captures, Pattern};

/// What a rule's action produces once its pattern has matched.
pub enum Action {
    /// Splice in a single new node in the matched node's place.
    Replace(Node),
    /// Splice in zero or more nodes (a `Seq`) in the matched node's place.
    Splice(Vec<Node>),
    /// Delete the matched node outright (an empty `Seq`).
    Delete,
    /// Keep the node, but stop re-matching it this pass (`dir::once`-style
    /// per-node opt-out without requiring the whole pass to be `once`).
    NoChange,
    /// Replace with an `Error(msg, fragment)` node; collected, not fatal.
    Error(String),
    /// Attach `node` to the nearest enclosing ancestor of token `kind`,
    /// used to hoist synthesized class/alias definitions and ANF bindings.
    Lift(Token, Node),
}

/// One rewrite rule: fires when `pattern` matches a node (optionally also
/// requiring an `In(context)` ancestor), producing `action`'s replacement.
pub struct Rule {
    pub name: &'static str,
    pub pattern: Pattern,
    /// `In(context)`: an additional ancestor-token guard, independent of
    /// the node-shape pattern above.
    pub context: Option<Token>,
    pub action: fn(&Node, &Captures) -> Action,
}

impl Rule {
    pub fn new(name: &'static str, pattern: Pattern, action: fn(&Node, &Captures) -> Action) -> Self {
        Self {
            name,
            pattern,
            context: None,
            action,
        }
    }

    pub fn in_context(mut self, kind: Token) -> Self {
        self.context = Some(kind);
        self
    }

    /// Tries this rule against `node`, returning the action it produces if
    /// both the context guard and the pattern match.
    pub fn try_fire(&self, node: &Node) -> Option<Action> {
        if let Some(kind) = self.context {
            if !crate::pattern::in_context(node, kind) {
                return None;
            }
        }
        let mut captures = Captures::new();
        if crate::pattern::matches(&self.pattern, node, &mut captures) {
            Some((self.action)(node, &captures))
        } else {
            None
        }
    }
}
