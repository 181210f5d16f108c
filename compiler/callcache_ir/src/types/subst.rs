//! Type-parameter substitution.

use rustc_hash::FxHashMap;

use super::{TypeIdFolder, TypePool};
use crate::{TypeId, TypeParamId};

/// A mapping from type parameters to types, applied by folding.
///
/// Parameters without a mapping are left in place.
#[derive(Clone, Debug, Default)]
pub struct Substitution {
    map: FxHashMap<TypeParamId, TypeId>,
}

impl Substitution {
    /// Create an empty substitution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a substitution by zipping parameters with arguments.
    ///
    /// Returns `None` if the lengths differ.
    pub fn from_pairs(params: &[TypeParamId], args: &[TypeId]) -> Option<Self> {
        if params.len() != args.len() {
            return None;
        }
        Some(Self {
            map: params.iter().copied().zip(args.iter().copied()).collect(),
        })
    }

    /// Add or replace a mapping.
    pub fn insert(&mut self, param: TypeParamId, ty: TypeId) {
        self.map.insert(param, ty);
    }

    /// Get the mapping for a parameter.
    pub fn get(&self, param: TypeParamId) -> Option<TypeId> {
        self.map.get(&param).copied()
    }

    /// Returns `true` if no parameter is mapped.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Apply the substitution to a type.
    pub fn apply(&self, pool: &TypePool, ty: TypeId) -> TypeId {
        if self.map.is_empty() {
            return ty;
        }
        Substitutor { pool, subst: self }.fold(ty)
    }

    /// Apply the substitution to every type in a list.
    pub fn apply_all(&self, pool: &TypePool, tys: &[TypeId]) -> Box<[TypeId]> {
        tys.iter().map(|&ty| self.apply(pool, ty)).collect()
    }
}

struct Substitutor<'a> {
    pool: &'a TypePool,
    subst: &'a Substitution,
}

impl TypeIdFolder for Substitutor<'_> {
    fn pool(&self) -> &TypePool {
        self.pool
    }

    fn fold_param(&mut self, param: TypeParamId) -> TypeId {
        self.subst
            .get(param)
            .unwrap_or_else(|| self.pool.param(param))
    }
}
