//! Matcher expressions over tokens: the pattern half of a rewrite rule.
//!
//! Mirrors the combinator vocabulary of the original's pattern DSL (`T()`,
//! `In()`, `/` disjunction, `*` sequence, `++` repetition, `!` negation,
//! `<<` structural descent, `End`, `Any`, named captures) as a small
//! recursive-descent matcher rather than a macro, since Rust doesn't give us
//! the operator overloading the original's embedded DSL relies on.

use indexmap::IndexMap;
use verona_core::{Node, Token};

/// Named nodes bound while matching a pattern, keyed by capture name.
pub type Captures = IndexMap<&'static str, Node>;

#[derive(Clone)]
pub enum Pattern {
    /// `T(x)`: matches a node whose token is exactly `x`.
    Tok(Token),
    /// `Any`: matches any single node.
    Any,
    /// `!p`: matches iff `p` does not.
    Not(Box<Pattern>),
    /// `p / q / ...`: matches iff any alternative matches.
    Or(Vec<Pattern>),
    /// `p[Name]`: matches `p` and binds the node under `Name`.
    Capture(&'static str, Box<Pattern>),
    /// `p` guarded by an arbitrary boolean predicate over the matched node.
    Where(Box<Pattern>, fn(&Node) -> bool),
    /// Matches a node whose children match `pats` end-to-end (`*` sequence).
    Children(Vec<Pattern>),
    /// Within a `Children` sequence: zero or more of the inner pattern (`++`).
    Repeat(Box<Pattern>),
    /// Within a `Children` sequence: asserts no more children remain.
    End,
    /// `p << q`: matches `q` against this node or any node in its subtree.
    Descendant(Box<Pattern>),
}

impl Pattern {
    pub fn tok(t: Token) -> Self {
        Pattern::Tok(t)
    }

    pub fn any() -> Self {
        Pattern::Any
    }

    pub fn not(p: Pattern) -> Self {
        Pattern::Not(Box::new(p))
    }

    pub fn or(alts: impl IntoIterator<Item = Pattern>) -> Self {
        Pattern::Or(alts.into_iter().collect())
    }

    pub fn capture(name: &'static str, p: Pattern) -> Self {
        Pattern::Capture(name, Box::new(p))
    }

    pub fn when(p: Pattern, pred: fn(&Node) -> bool) -> Self {
        Pattern::Where(Box::new(p), pred)
    }

    pub fn children(pats: impl IntoIterator<Item = Pattern>) -> Self {
        Pattern::Children(pats.into_iter().collect())
    }

    pub fn repeat(p: Pattern) -> Self {
        Pattern::Repeat(Box::new(p))
    }

    pub fn end() -> Self {
        Pattern::End
    }

    pub fn descendant(p: Pattern) -> Self {
        Pattern::Descendant(Box::new(p))
    }
}

/// Tests `pattern` against `node`, recording any captures it binds.
/// Captures from a failed alternative are not rolled back by the caller;
/// start from a fresh `Captures` per top-level attempt.
pub fn matches(pattern: &Pattern, node: &Node, captures: &mut Captures) -> bool {
    match pattern {
        Pattern::Tok(t) => node.token() == *t,
        Pattern::Any => true,
        Pattern::Not(inner) => {
            let mut scratch = Captures::new();
            !matches(inner, node, &mut scratch)
        }
        Pattern::Or(alts) => alts.iter().any(|p| matches(p, node, captures)),
        Pattern::Capture(name, inner) => {
            if matches(inner, node, captures) {
                captures.insert(name, node.clone());
                true
            } else {
                false
            }
        }
        Pattern::Where(inner, pred) => matches(inner, node, captures) && pred(node),
        Pattern::Children(pats) => match_seq(pats, &node.children(), captures),
        Pattern::Descendant(inner) => {
            if matches(inner, node, captures) {
                return true;
            }
            node.children()
                .iter()
                .any(|c| matches(&Pattern::Descendant(inner.clone()), c, captures))
        }
        // `Repeat`/`End` are only meaningful inside a `Children` sequence.
        Pattern::Repeat(inner) => matches(inner, node, captures),
        Pattern::End => node.is_leaf(),
    }
}

/// Matches a sequence of patterns against a slice of sibling nodes,
/// backtracking over the one point of choice: how many children a `Repeat`
/// consumes. Greedy, shrinking on failure, which is adequate since rules
/// use at most one `Repeat` per sequence in practice.
fn match_seq(pats: &[Pattern], nodes: &[Node], captures: &mut Captures) -> bool {
    match pats.split_first() {
        None => nodes.is_empty(),
        Some((Pattern::End, rest)) => nodes.is_empty() && match_seq(rest, nodes, captures),
        Some((Pattern::Repeat(inner), rest)) => {
            let mut consumed = 0;
            while consumed < nodes.len() {
                let mut scratch = captures.clone();
                if !matches(inner, &nodes[consumed], &mut scratch) {
                    break;
                }
                consumed += 1;
            }
            loop {
                let mut trial = captures.clone();
                let all_match = nodes[..consumed].iter().all(|n| matches(inner, n, &mut trial));
                if all_match && match_seq(rest, &nodes[consumed..], &mut trial) {
                    *captures = trial;
                    return true;
                }
                if consumed == 0 {
                    return false;
                }
                consumed -= 1;
            }
        }
        Some((p, rest)) => {
            if nodes.is_empty() {
                return false;
            }
            matches(p, &nodes[0], captures) && match_seq(rest, &nodes[1..], captures)
        }
    }
}

/// `In(kind)`: the node has an ancestor (strictly above it) of token `kind`.
pub fn in_context(node: &Node, kind: Token) -> bool {
    node.parent()
        .is_some_and(|p| p.find_ancestor_of(kind).is_some())
}
