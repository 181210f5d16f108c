//! Interned type representation.
//!
//! Types are hash-consed into a [`TypePool`] and referenced by [`TypeId`].
//! Structurally equal types always intern to the same id, so type equality
//! is an O(1) integer comparison. Canonicalization (erasing tuple names,
//! nullability annotations and `dynamic`) produces a *different* id whose
//! equality is again O(1).

mod data;
mod pool;
mod subst;
mod traverse;

pub use data::TypeData;
pub use pool::TypePool;
pub use subst::Substitution;
pub use traverse::{TypeIdFolder, TypeIdVisitor};

#[cfg(test)]
mod tests;
