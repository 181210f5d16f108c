//! Scope resolution.
//!
//! Decides which container a key belongs to. A key that mentions no type
//! parameter owned by a function lives in the enclosing type's container,
//! shared by every function of the type. Otherwise it lives in the
//! container of the innermost enclosing function that owns one of the
//! referenced parameters; that container is generic over the referenced
//! function-owned parameters.
//!
//! # Algorithm
//!
//! 1. Visit the key's type arguments and callable type, collecting every
//!    referenced type parameter in first-occurrence order.
//! 2. Check each parameter is in scope at the site: type-owned parameters
//!    must belong to the enclosing type chain, function-owned parameters
//!    to the enclosing function chain.
//! 3. Walk the enclosing function chain innermost-first; the first function
//!    owning a referenced parameter is the anchor.

use smallvec::SmallVec;

use callcache_ir::{
    FuncId, ParamOwner, Program, ScopeAnchor, TypeIdVisitor, TypeParamId, TypePool,
};

use crate::key::KeyData;
use crate::{ConversionSite, LowerError};

/// Result of scope resolution for one key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeResolution {
    pub anchor: ScopeAnchor,
    /// Referenced parameters owned by enclosing functions, in
    /// first-occurrence order. Empty for type anchors.
    pub func_params: SmallVec<[TypeParamId; 4]>,
}

/// Resolve the anchor of `key` at `site`.
pub fn resolve_scope(
    program: &Program,
    site: &ConversionSite,
    key: &KeyData,
) -> Result<ScopeResolution, LowerError> {
    let referenced = referenced_params(&program.pool, key);
    let type_chain = program.type_chain(site.enclosing_type);

    let mut func_params = SmallVec::new();
    for &param in &referenced {
        let Some(def) = program.type_params.get(param.index()) else {
            return Err(LowerError::UnknownSymbol {
                kind: "type parameter",
                index: param.raw(),
                span: site.span,
            });
        };
        let in_scope = match def.owner {
            ParamOwner::Type(ty) => type_chain.contains(&ty),
            ParamOwner::Func(func) => {
                let enclosed = site
                    .enclosing_func
                    .is_some_and(|inner| program.encloses(func, inner));
                if enclosed {
                    func_params.push(param);
                }
                enclosed
            }
            ParamOwner::Container(_) => false,
        };
        if !in_scope {
            return Err(LowerError::ForeignTypeParameter {
                param,
                name: program.name(def.name).to_owned(),
                span: site.span,
            });
        }
    }

    let anchor = match innermost_owner(program, site.enclosing_func, &func_params) {
        Some(func) => ScopeAnchor::Func(func),
        None => ScopeAnchor::Type(site.enclosing_type),
    };
    Ok(ScopeResolution {
        anchor,
        func_params,
    })
}

/// The innermost function in `func`'s chain that owns one of `params`.
fn innermost_owner(program: &Program, func: Option<FuncId>, params: &[TypeParamId]) -> Option<FuncId> {
    if params.is_empty() {
        return None;
    }
    let chain = program.func_chain(func?);
    chain.iter().rev().copied().find(|&candidate| {
        params
            .iter()
            .any(|&param| program.type_param(param).owner == ParamOwner::Func(candidate))
    })
}

/// Every type parameter mentioned by a key, in first-occurrence order.
pub fn referenced_params(pool: &TypePool, key: &KeyData) -> SmallVec<[TypeParamId; 4]> {
    let mut collector = ParamCollector {
        pool,
        found: SmallVec::new(),
    };
    collector.visit_all(&key.type_args);
    collector.visit(key.callable);
    collector.found
}

/// Collects referenced type parameters without duplicates.
pub(crate) struct ParamCollector<'a> {
    pub(crate) pool: &'a TypePool,
    pub(crate) found: SmallVec<[TypeParamId; 4]>,
}

impl TypeIdVisitor for ParamCollector<'_> {
    fn pool(&self) -> &TypePool {
        self.pool
    }

    fn visit_param(&mut self, param: TypeParamId) {
        if !self.found.contains(&param) {
            self.found.push(param);
        }
    }
}
