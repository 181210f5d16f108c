//! Bound intermediate representation for callable-conversion caching.
//!
//! This crate models the binder's output as consumed by the
//! conversion-caching pass: symbol tables for types, functions and type
//! parameters, a hash-consed [`TypePool`], and a flat [`ExprArena`] of
//! fully-resolved expressions. It also defines the cache layout the pass
//! produces ([`CacheContainer`], [`CacheSlot`], [`SlotRef`]).
//!
//! # Generic Environments
//!
//! Every function sees the type parameters of its owner type chain
//! (outermost first), of its enclosing functions (outermost first) and its
//! own. A [`FuncRef`] carries one type argument per environment parameter
//! of the referenced function.
//!
//! # Construction
//!
//! Programs are built with [`ProgramBuilder`], which assigns strictly
//! increasing spans so that allocation order is source order.

mod builder;
mod cache;
mod expr;
mod ids;
mod interner;
mod name;
mod program;
mod span;
mod symbols;
pub mod types;
pub mod visitor;

pub use builder::ProgramBuilder;
pub use cache::{CacheContainer, CacheSlot, ScopeAnchor, SlotRef};
pub use expr::{ConversionOrigin, Expr, ExprArena, ExprKind, ExprRange, FuncRef};
pub use ids::{ContainerId, ExprId, FuncId, TypeDefId, TypeId, TypeParamId};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use program::Program;
pub use span::Span;
pub use symbols::{
    Constraint, FuncDef, FuncKind, ParamOwner, StaticField, TypeDef, TypeDefKind, TypeParamDef,
};
pub use types::{Substitution, TypeData, TypeIdFolder, TypeIdVisitor, TypePool};

#[cfg(test)]
mod tests;
