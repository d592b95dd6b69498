//! A pass: an ordered rule set applied in one traversal direction, paired
//! with the well-formedness schema its output must satisfy.

use crate::rule::Rule;
use crate::wf::WellFormed;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    TopDown,
    BottomUp,
}

pub struct Pass {
    pub name: &'static str,
    pub direction: Direction,
    /// `dir::once`: visit each node at most once, even if a rule fires.
    pub once: bool,
    pub rules: Vec<Rule>,
    pub schema: WellFormed,
}

impl Pass {
    pub fn new(name: &'static str, direction: Direction, rules: Vec<Rule>, schema: WellFormed) -> Self {
        Self {
            name,
            direction,
            once: false,
            rules,
            schema,
        }
    }

    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }
}
