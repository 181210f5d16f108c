//! Structural traversal of interned types.
//!
//! [`TypeIdFolder`] rebuilds a type bottom-up (canonicalization,
//! substitution); [`TypeIdVisitor`] walks a type without rebuilding it
//! (collecting referenced type parameters).

use super::{TypeData, TypePool};
use crate::{Name, TypeDefId, TypeId, TypeParamId};

/// Trait for transforming interned types via structural recursion.
///
/// Default methods rebuild each compound type from its folded children;
/// override the variant hooks to change specific cases.
///
/// # Example
///
/// ```text
/// struct EraseDynamic<'a> { pool: &'a TypePool }
///
/// impl TypeIdFolder for EraseDynamic<'_> {
///     fn pool(&self) -> &TypePool { self.pool }
///
///     fn fold_dynamic(&mut self) -> TypeId { TypeId::OBJECT }
/// }
/// ```
pub trait TypeIdFolder {
    /// Get the type pool for lookups and interning new types.
    fn pool(&self) -> &TypePool;

    /// Fold a `TypeId` by dispatching to variant-specific methods.
    fn fold(&mut self, id: TypeId) -> TypeId {
        match self.pool().lookup(id) {
            TypeData::Int | TypeData::Bool | TypeData::Str | TypeData::Unit | TypeData::Object => {
                id
            }
            TypeData::Dynamic => self.fold_dynamic(),
            TypeData::Param(param) => self.fold_param(param),
            TypeData::Named { def, args } => self.fold_named(def, &args),
            TypeData::Function { params, ret } => self.fold_function(&params, ret),
            TypeData::Tuple { elems, names } => self.fold_tuple(&elems, names.as_deref()),
            TypeData::Nullable(inner) => self.fold_nullable(inner),
            TypeData::Annotated(inner) => self.fold_annotated(inner),
        }
    }

    /// Fold every type in a list.
    fn fold_all(&mut self, ids: &[TypeId]) -> Box<[TypeId]> {
        ids.iter().map(|&id| self.fold(id)).collect()
    }

    /// Fold `dynamic`. Default keeps it.
    fn fold_dynamic(&mut self) -> TypeId {
        TypeId::DYNAMIC
    }

    /// Fold a type parameter. Default keeps it.
    fn fold_param(&mut self, param: TypeParamId) -> TypeId {
        self.pool().param(param)
    }

    /// Fold a declared type instantiation. Default folds the arguments.
    fn fold_named(&mut self, def: TypeDefId, args: &[TypeId]) -> TypeId {
        let args = self.fold_all(args);
        self.pool().named(def, args)
    }

    /// Fold an anonymous callable type. Default folds parameters and return.
    fn fold_function(&mut self, params: &[TypeId], ret: TypeId) -> TypeId {
        let params = self.fold_all(params);
        let ret = self.fold(ret);
        self.pool().function(params, ret)
    }

    /// Fold a tuple. Default folds elements and keeps names.
    fn fold_tuple(&mut self, elems: &[TypeId], names: Option<&[Name]>) -> TypeId {
        let elems = self.fold_all(elems);
        self.pool().intern(TypeData::Tuple {
            elems,
            names: names.map(Into::into),
        })
    }

    /// Fold a nullable value type. Default folds the inner type.
    fn fold_nullable(&mut self, inner: TypeId) -> TypeId {
        let inner = self.fold(inner);
        self.pool().nullable(inner)
    }

    /// Fold a nullability annotation. Default folds the inner type.
    fn fold_annotated(&mut self, inner: TypeId) -> TypeId {
        let inner = self.fold(inner);
        self.pool().annotated(inner)
    }
}

/// Trait for visiting interned types without modification.
///
/// # Example
///
/// ```text
/// struct ParamCollector<'a> { pool: &'a TypePool, found: Vec<TypeParamId> }
///
/// impl TypeIdVisitor for ParamCollector<'_> {
///     fn pool(&self) -> &TypePool { self.pool }
///
///     fn visit_param(&mut self, param: TypeParamId) {
///         if !self.found.contains(&param) { self.found.push(param); }
///     }
/// }
/// ```
pub trait TypeIdVisitor {
    /// Get the type pool for lookups.
    fn pool(&self) -> &TypePool;

    /// Visit a `TypeId` by dispatching to variant-specific methods.
    fn visit(&mut self, id: TypeId) {
        match self.pool().lookup(id) {
            TypeData::Int
            | TypeData::Bool
            | TypeData::Str
            | TypeData::Unit
            | TypeData::Object
            | TypeData::Dynamic => {}
            TypeData::Param(param) => self.visit_param(param),
            TypeData::Named { def, args } => self.visit_named(def, &args),
            TypeData::Function { params, ret } => {
                self.visit_all(&params);
                self.visit(ret);
            }
            TypeData::Tuple { elems, .. } => self.visit_all(&elems),
            TypeData::Nullable(inner) | TypeData::Annotated(inner) => self.visit(inner),
        }
    }

    /// Visit every type in a list.
    fn visit_all(&mut self, ids: &[TypeId]) {
        for &id in ids {
            self.visit(id);
        }
    }

    /// Visit a type parameter. Override to handle parameters.
    fn visit_param(&mut self, _param: TypeParamId) {}

    /// Visit a declared type instantiation. Default visits the arguments.
    fn visit_named(&mut self, _def: TypeDefId, args: &[TypeId]) {
        self.visit_all(args);
    }
}
