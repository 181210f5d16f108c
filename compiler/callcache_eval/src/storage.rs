//! Static storage: user static fields and synthesized cache slots.
//!
//! Both are per-instantiation: `D<int>` and `D<string>` have independent
//! static fields, and a container nested in `D<T>` has independent slots
//! for each instantiation of `D` and of the container's own parameters.

use rustc_hash::{FxHashMap, FxHashSet};

use callcache_ir::{ContainerId, Name, TypeId};

use crate::Value;

/// Values of user-declared static fields.
#[derive(Default)]
pub struct StaticFields {
    /// Keyed by concrete owner type and field name.
    values: FxHashMap<(TypeId, Name), Value>,
    /// Concrete types whose field initializers have run.
    initialized: FxHashSet<TypeId>,
}

impl StaticFields {
    pub fn get(&self, owner: TypeId, field: Name) -> Option<&Value> {
        self.values.get(&(owner, field))
    }

    pub fn set(&mut self, owner: TypeId, field: Name, value: Value) {
        self.values.insert((owner, field), value);
    }

    /// Mark `owner` initialized; returns `false` if it already was.
    pub fn begin_init(&mut self, owner: TypeId) -> bool {
        self.initialized.insert(owner)
    }
}

/// Concrete instantiation of a cache container: the owner type's
/// environment arguments followed by the container's own arguments.
pub type Instantiation = Box<[TypeId]>;

/// Values of synthesized cache slots.
#[derive(Default)]
pub struct SlotStorage {
    slots: FxHashMap<(ContainerId, Instantiation), Vec<Option<Value>>>,
}

impl SlotStorage {
    /// Read a slot; `None` if it has not been filled.
    pub fn get(&self, container: ContainerId, inst: &[TypeId], index: u32) -> Option<&Value> {
        self.slots
            .get(&(container, inst.into()))
            .and_then(|slots| slots.get(index as usize))
            .and_then(Option::as_ref)
    }

    /// Fill a slot, allocating the instantiation's slot vector on demand.
    ///
    /// Returns `false` and stores nothing if `index` is not below `len`.
    #[must_use]
    pub fn set(
        &mut self,
        container: ContainerId,
        inst: Instantiation,
        index: u32,
        len: usize,
        value: Value,
    ) -> bool {
        if index as usize >= len {
            return false;
        }
        let slots = self
            .slots
            .entry((container, inst))
            .or_insert_with(|| vec![None; len]);
        match slots.get_mut(index as usize) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    /// Number of filled slots across every instantiation.
    pub fn filled(&self) -> usize {
        self.slots
            .values()
            .map(|slots| slots.iter().filter(|slot| slot.is_some()).count())
            .sum()
    }
}
