//! Structural subtyping for the front-end's type lattice: bound types
//! (type nodes paired with their current type-parameter substitution) and
//! the sequent-calculus procedure that decides `sub <: sup`.
//!
//! Grounded on the original front-end's `subtype.cc`: [`BoundType`] is
//! `BtypeDef`'s eager-unwinding constructor, the private `reduce_view`
//! reproduces its oriented `TypeView` rewrite table, and [`subtype`] is
//! `Sequent::reduce` wrapped as an entry point.

mod bound;
mod sequent;

pub use bound::BoundType;
pub use sequent::subtype;
pub use verona_lookup::Bindings;

#[cfg(test)]
mod tests;
