//! Name resolution over the shared AST: upward lookup by spelling, the
//! `lookdown` state machine that resolves a definition found that way down
//! to a member search, type-argument binding, and the recursive-alias
//! check that guards the subtyping solver against self-referential
//! aliases.
//!
//! Grounded on the original front-end's `lookup.cc`: `lookup_name`,
//! `lookup_scopedname`, `lookup_scopedname_name`, `lookdown`,
//! `lookup_recursive`, `lookup_valid_predicate`, `extract_typeparams`, and
//! `typeparams_to_typeargs` all have a same-named counterpart here.
//!
//! Field access throughout is positional (`Node::child(i)`) rather than
//! through a named wf-schema index: this crate doesn't carry over the
//! original's separate wf-schema-per-production machinery, so a
//! production's fields are accessed by the same order the original's
//! `wf / Production / Field` indices name them in.

mod lookdown;
mod predicate;
mod recursive;
mod typeparams;

pub use lookdown::{
    Bindings, Lookup, Lookups, lookup_functionname, lookup_name, lookup_scopedname, lookup_scopedname_name,
};
pub use predicate::lookup_valid_predicate;
pub use recursive::lookup_recursive;
pub use typeparams::{extract_typeparams, typeparams_to_typeargs};

#[cfg(test)]
mod tests;
