//! The rewrite engine: patterns, rules, passes, and the pipeline facade
//! that drives a concrete tree through an ordered sequence of them.
//!
//! `verona-passes` supplies the concrete passes (`modules`, `structure`,
//! `anf`, ...); this crate only knows about the generic mechanics of
//! matching, splicing, fixpoint iteration, and schema validation.

mod engine;
mod error;
mod pass;
mod pattern;
mod pipeline;
mod rule;
mod wf;

#[cfg(test)]
mod tests;

pub use error::{Error, PassResult};
pub use pass::{Direction, Pass};
pub use pattern::{Captures, Pattern, in_context, matches};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineConfig};
pub use rule::{Action, Rule};
pub use wf::{Production, WellFormed};
