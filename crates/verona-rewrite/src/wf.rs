//! Well-formedness schemas: the contract a pass's output tree must satisfy.
//!
//! A schema maps a token to the production it must follow: which child
//! tokens are allowed, and how many children are required. Validation
//! failure after a pass reaches fixpoint is a compiler bug — it means a
//! rule action produced a tree its own pass doesn't admit — never a
//! user-facing error, so callers treat it as a panic, not a `Result`.

use indexmap::IndexMap;
use verona_core::{Node, Token};

/// The shape one token's children must take.
#[derive(Clone)]
pub struct Production {
    /// Tokens allowed as direct children. Empty means "unconstrained":
    /// the schema doesn't model this token's children at all (e.g. a
    /// pass-through structural node untouched by the current pass).
    pub allowed_children: Vec<Token>,
    pub min_children: usize,
    pub max_children: Option<usize>,
}

impl Production {
    pub fn new(allowed_children: impl IntoIterator<Item = Token>) -> Self {
        Self {
            allowed_children: allowed_children.into_iter().collect(),
            min_children: 0,
            max_children: None,
        }
    }

    pub fn arity(mut self, min: usize, max: Option<usize>) -> Self {
        self.min_children = min;
        self.max_children = max;
        self
    }

    pub fn exactly(min: usize) -> Self {
        Self {
            allowed_children: Vec::new(),
            min_children: min,
            max_children: Some(min),
        }
    }
}

/// A pass's output schema: token → production. Schemas compose: a later
/// pass's schema is built by calling [`WellFormed::extend`] on the prior
/// pass's schema, overriding productions for tokens it changes and
/// inheriting the rest unchanged.
#[derive(Clone, Default)]
pub struct WellFormed {
    productions: IndexMap<Token, Production>,
}

impl WellFormed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, token: Token, production: Production) -> Self {
        self.productions.insert(token, production);
        self
    }

    /// Inherit every production from `base` not already overridden here.
    pub fn extend(mut self, base: &WellFormed) -> Self {
        for (token, production) in &base.productions {
            self.productions
                .entry(*token)
                .or_insert_with(|| production.clone());
        }
        self
    }

    pub fn validate(&self, tree: &Node) -> Result<(), String> {
        self.validate_node(tree)
    }

    fn validate_node(&self, node: &Node) -> Result<(), String> {
        let children = node.children();
        if let Some(production) = self.productions.get(&node.token()) {
            if children.len() < production.min_children
                || production
                    .max_children
                    .is_some_and(|max| children.len() > max)
            {
                return Err(format!(
                    "{} has {} children, expected {}..{:?}",
                    node.token(),
                    children.len(),
                    production.min_children,
                    production.max_children
                ));
            }
            if !production.allowed_children.is_empty() {
                for child in &children {
                    if !production.allowed_children.contains(&child.token()) {
                        return Err(format!(
                            "{} is not a valid child of {}",
                            child.token(),
                            node.token()
                        ));
                    }
                }
            }
        }
        for child in &children {
            self.validate_node(child)?;
        }
        Ok(())
    }
}
