//! Container registry.
//!
//! One pending container per scope anchor, created on first use. Each
//! container keeps its slots in first-encounter order and an index from
//! key to ordinal, so equal keys within a container always map to the same
//! slot.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use callcache_ir::{ContainerId, FuncId, ScopeAnchor, TypeDefId, TypeId, TypeParamId};

use crate::key::{CacheKey, KeyData};

/// A slot before the container's parameters are finalized. Types are still
/// expressed over the original in-scope parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingSlot {
    pub func: FuncId,
    pub type_args: Box<[TypeId]>,
    pub callable: TypeId,
}

/// A container being filled during registration.
#[derive(Clone, Debug)]
pub struct PendingContainer {
    pub id: ContainerId,
    pub anchor: ScopeAnchor,
    /// Type the container will be nested in.
    pub owner: TypeDefId,
    /// Function-owned parameters referenced by any slot, in
    /// first-reference order.
    pub params: SmallVec<[TypeParamId; 4]>,
    pub slots: Vec<PendingSlot>,
    index: FxHashMap<CacheKey, u32>,
}

impl PendingContainer {
    /// Ordinal of the slot for `key`, if registered.
    pub fn slot_of(&self, key: CacheKey) -> Option<u32> {
        self.index.get(&key).copied()
    }
}

/// Registry of pending containers, keyed by anchor.
pub struct ContainerRegistry {
    /// Id of the first container created by this registry.
    base: u32,
    containers: Vec<PendingContainer>,
    by_anchor: FxHashMap<ScopeAnchor, ContainerId>,
}

impl ContainerRegistry {
    /// Create a registry whose container ids start at `base`.
    pub fn new(base: u32) -> Self {
        Self {
            base,
            containers: Vec::new(),
            by_anchor: FxHashMap::default(),
        }
    }

    /// Find or create the container for `anchor`.
    pub fn container_for(&mut self, anchor: ScopeAnchor, owner: TypeDefId) -> ContainerId {
        if let Some(&id) = self.by_anchor.get(&anchor) {
            return id;
        }
        let offset = u32::try_from(self.containers.len())
            .unwrap_or_else(|_| panic!("too many cache containers: {}", self.containers.len()));
        let id = ContainerId::new(self.base + offset);
        self.containers.push(PendingContainer {
            id,
            anchor,
            owner,
            params: SmallVec::new(),
            slots: Vec::new(),
            index: FxHashMap::default(),
        });
        self.by_anchor.insert(anchor, id);
        id
    }

    /// Find or append the slot for `key` in `container`.
    ///
    /// Returns the slot ordinal and whether the slot was newly created.
    /// `params` are the function-owned parameters the key references.
    pub fn insert_slot(
        &mut self,
        container: ContainerId,
        key: CacheKey,
        data: &KeyData,
        params: &[TypeParamId],
    ) -> (u32, bool) {
        let entry = &mut self.containers[(container.raw() - self.base) as usize];
        if let Some(ordinal) = entry.slot_of(key) {
            return (ordinal, false);
        }

        for &param in params {
            if !entry.params.contains(&param) {
                entry.params.push(param);
            }
        }
        let ordinal = u32::try_from(entry.slots.len())
            .unwrap_or_else(|_| panic!("too many cache slots: {}", entry.slots.len()));
        entry.slots.push(PendingSlot {
            func: data.func,
            type_args: data.type_args.clone(),
            callable: data.callable,
        });
        entry.index.insert(key, ordinal);
        (ordinal, true)
    }

    /// Number of containers created.
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Total number of slots across all containers.
    pub fn slot_count(&self) -> usize {
        self.containers.iter().map(|c| c.slots.len()).sum()
    }

    /// Consume the registry, yielding containers in id order.
    pub fn into_containers(self) -> Vec<PendingContainer> {
        self.containers
    }
}
