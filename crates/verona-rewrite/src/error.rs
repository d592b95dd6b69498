//! Engineering failures of the rewrite engine itself.
//!
//! Distinct from the errors-as-values design: a malformed *input program*
//! becomes an `Error` node spliced into the tree, never one of these.
//! These variants only fire when the engine's own resource budgets are
//! exceeded, mirroring the teacher's `plotnik_compiler::Error`
//! (`ExecFuelExhausted`, `RecursionLimitExceeded`).

use verona_diagnostics::Diagnostics;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("pass `{pass}` did not reach a fixpoint within {fuel} rewrites")]
    RewriteFuelExhausted { pass: &'static str, fuel: u32 },

    #[error("pass `{pass}` exceeded the maximum tree depth of {max_depth} while traversing")]
    MaxTreeDepthExceeded { pass: &'static str, max_depth: u32 },
}

/// The result of running one stage of the pipeline: the rewritten tree
/// paired with whatever diagnostics it accumulated, or an engineering
/// failure that aborts the run.
pub type PassResult<T> = Result<(T, Diagnostics), Error>;
