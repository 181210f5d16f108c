//! Cache layout produced by the conversion-caching pass.
//!
//! A [`CacheContainer`] is the description handed to the emitter for one
//! scope anchor: an optional list of the container's own type parameters
//! and an ordered list of typed storage slots. Rewritten expressions refer
//! to a slot through a [`SlotRef`].

use crate::{ContainerId, FuncId, Name, TypeDefId, TypeId, TypeParamId};

/// Owner of a cache container.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeAnchor {
    /// Container nested in a type; shared by every function of the type.
    Type(TypeDefId),
    /// Container generic over parameters owned by this function (and its
    /// enclosing functions).
    Func(FuncId),
}

/// Reference from a rewritten expression to a cache slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub container: ContainerId,
    /// Slot ordinal within the container.
    pub index: u32,
    /// Instantiation of the container's own type parameters at the use
    /// site. Empty for type-scoped containers.
    pub type_args: Box<[TypeId]>,
}

/// One cache storage location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheSlot {
    pub ordinal: u32,
    /// Synthesized member name (`<0>__Target`), or `Name::EMPTY` when name
    /// synthesis is disabled.
    pub name: Name,
    /// Function the cached callable is built from.
    pub func: FuncId,
    /// Canonical type arguments of `func`, in terms of the container's
    /// own parameters.
    pub func_args: Box<[TypeId]>,
    /// Storage type (the canonical callable type), in terms of the
    /// container's own parameters.
    pub storage: TypeId,
}

/// A synthesized cache container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheContainer {
    pub id: ContainerId,
    /// Synthesized type name (`<>O`, `<Test>O__0_0`), or `Name::EMPTY`.
    pub name: Name,
    pub anchor: ScopeAnchor,
    /// Type the container is nested in.
    pub owner: TypeDefId,
    /// The container's own type parameters (function-scoped only).
    pub type_params: Vec<TypeParamId>,
    /// Original parameter each of `type_params` was derived from.
    pub param_sources: Vec<TypeParamId>,
    pub slots: Vec<CacheSlot>,
}

impl CacheContainer {
    /// Number of the container's own type parameters.
    pub fn arity(&self) -> usize {
        self.type_params.len()
    }

    /// Returns `true` if the container is anchored to a function.
    pub fn is_function_scoped(&self) -> bool {
        matches!(self.anchor, ScopeAnchor::Func(_))
    }

    /// Get a slot by ordinal.
    pub fn slot(&self, index: u32) -> Option<&CacheSlot> {
        self.slots.get(index as usize)
    }
}
