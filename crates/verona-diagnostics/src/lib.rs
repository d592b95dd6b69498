//! Diagnostics-as-values for the Verona compiler front-end.
//!
//! Passes, lookup, and subtyping never log or print directly: engineering
//! failures (a malformed WF schema, an exhausted rewrite budget) and
//! surfaceable diagnostics both flow back through a [`Diagnostics`]
//! collection threaded alongside the tree. Only `verona-cli` ever turns one
//! into terminal output, via [`DiagnosticsPrinter`].
//!
//! User-facing errors in the *source program itself* (an unresolved name, a
//! subtype failure) are not reported through this crate at all: per the
//! errors-as-values design, those become `Error` nodes spliced into the tree
//! by the rewrite engine. This crate is for diagnostics about running the
//! compiler, and for the text rendering of whatever `Error` nodes survive to
//! the end of a pipeline run.

mod collection;
mod message;
mod printer;

#[cfg(test)]
mod tests;

pub use collection::{Diagnostics, DiagnosticBuilder};
pub use message::{DiagnosticMessage, Fix, RelatedInfo, Severity};
pub use printer::DiagnosticsPrinter;
