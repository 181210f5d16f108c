//! Type data stored in the type pool.

use crate::{Name, TypeDefId, TypeId, TypeParamId};

/// Internal type representation stored in the [`TypePool`](super::TypePool).
///
/// Compound types store `TypeId` children, so equality of two interned
/// types never requires a deep walk.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeData {
    // Primitives (pre-interned at fixed indices)
    /// 64-bit signed integer.
    Int,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Str,
    /// Unit / `void`.
    Unit,
    /// Root reference type.
    Object,
    /// Dynamically-typed reference; erased to `Object` at run time.
    Dynamic,

    /// A generic type parameter.
    Param(TypeParamId),

    /// Instantiation of a declared type: `D<int>`, `Func<T, int>`.
    ///
    /// `args` has one entry per parameter of the declaration's generic
    /// environment (outer types first).
    Named {
        def: TypeDefId,
        args: Box<[TypeId]>,
    },

    /// Anonymous callable type synthesized by the binder for a function
    /// reference that has no declared target type.
    Function { params: Box<[TypeId]>, ret: TypeId },

    /// Tuple type, optionally carrying element names.
    ///
    /// Element names are a compile-time convenience; two tuples differing
    /// only in names share a run-time representation.
    Tuple {
        elems: Box<[TypeId]>,
        names: Option<Box<[Name]>>,
    },

    /// Nullable value type (`M?` where `M: struct`). Distinct at run time.
    Nullable(TypeId),

    /// Reference-nullability annotation (`T?` on a reference type).
    /// Compile-time only.
    Annotated(TypeId),
}

impl TypeData {
    /// Returns `true` for the pre-interned primitive variants.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeData::Int
                | TypeData::Bool
                | TypeData::Str
                | TypeData::Unit
                | TypeData::Object
                | TypeData::Dynamic
        )
    }
}
