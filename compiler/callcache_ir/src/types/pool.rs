//! Hash-consing type pool.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::TypeData;
use crate::ids::to_u32;
use crate::{Name, TypeDefId, TypeId, TypeParamId};

impl TypeId {
    /// The `int` type.
    pub const INT: Self = Self::new(0);
    /// The `bool` type.
    pub const BOOL: Self = Self::new(1);
    /// The `string` type.
    pub const STR: Self = Self::new(2);
    /// The unit type.
    pub const UNIT: Self = Self::new(3);
    /// The `object` type.
    pub const OBJECT: Self = Self::new(4);
    /// The `dynamic` type.
    pub const DYNAMIC: Self = Self::new(5);

    /// Number of pre-interned primitive types.
    pub const PRIMITIVE_COUNT: u32 = 6;
}

struct PoolTable {
    /// Map from type data to index for deduplication.
    map: FxHashMap<TypeData, u32>,
    /// Storage for type data, indexed by `TypeId`.
    types: Vec<TypeData>,
}

/// Hash-consing pool of types.
///
/// Interning takes `&self`: the lowering pass creates canonical and
/// substituted types while holding shared borrows of the program.
///
/// # Pre-interned Types
/// Primitive types are interned at fixed indices matching the `TypeId`
/// constants (`INT`, `BOOL`, ...).
pub struct TypePool {
    table: RwLock<PoolTable>,
}

impl TypePool {
    /// Create a pool with the primitives pre-interned.
    pub fn new() -> Self {
        let primitives = [
            TypeData::Int,     // 0 = TypeId::INT
            TypeData::Bool,    // 1 = TypeId::BOOL
            TypeData::Str,     // 2 = TypeId::STR
            TypeData::Unit,    // 3 = TypeId::UNIT
            TypeData::Object,  // 4 = TypeId::OBJECT
            TypeData::Dynamic, // 5 = TypeId::DYNAMIC
        ];

        let mut map = FxHashMap::default();
        let mut types = Vec::with_capacity(64);
        for (idx, data) in primitives.into_iter().enumerate() {
            map.insert(data.clone(), to_u32(idx, "types"));
            types.push(data);
        }

        Self {
            table: RwLock::new(PoolTable { map, types }),
        }
    }

    /// Intern a type, returning its id.
    ///
    /// Returns the existing id when a structurally equal type was interned
    /// before.
    pub fn intern(&self, data: TypeData) -> TypeId {
        // Fast path: already interned
        if let Some(&index) = self.table.read().map.get(&data) {
            return TypeId::new(index);
        }

        let mut guard = self.table.write();

        // Double-check after acquiring write lock
        if let Some(&index) = guard.map.get(&data) {
            return TypeId::new(index);
        }

        let index = to_u32(guard.types.len(), "types");
        guard.types.push(data.clone());
        guard.map.insert(data, index);
        TypeId::new(index)
    }

    /// Look up the data for an interned type.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this pool.
    pub fn lookup(&self, id: TypeId) -> TypeData {
        self.table.read().types[id.index()].clone()
    }

    /// Number of interned types (including primitives).
    pub fn len(&self) -> usize {
        self.table.read().types.len()
    }

    /// Always `false`: primitives are pre-interned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Constructors

    /// Intern a type parameter reference.
    pub fn param(&self, param: TypeParamId) -> TypeId {
        self.intern(TypeData::Param(param))
    }

    /// Intern an instantiation of a declared type.
    pub fn named(&self, def: TypeDefId, args: impl Into<Box<[TypeId]>>) -> TypeId {
        self.intern(TypeData::Named {
            def,
            args: args.into(),
        })
    }

    /// Intern an anonymous callable type.
    pub fn function(&self, params: impl Into<Box<[TypeId]>>, ret: TypeId) -> TypeId {
        self.intern(TypeData::Function {
            params: params.into(),
            ret,
        })
    }

    /// Intern an unnamed tuple type.
    pub fn tuple(&self, elems: impl Into<Box<[TypeId]>>) -> TypeId {
        self.intern(TypeData::Tuple {
            elems: elems.into(),
            names: None,
        })
    }

    /// Intern a tuple type with element names.
    pub fn named_tuple(&self, elems: impl Into<Box<[TypeId]>>, names: Vec<Name>) -> TypeId {
        self.intern(TypeData::Tuple {
            elems: elems.into(),
            names: Some(names.into_boxed_slice()),
        })
    }

    /// Intern a nullable value type.
    pub fn nullable(&self, inner: TypeId) -> TypeId {
        self.intern(TypeData::Nullable(inner))
    }

    /// Intern a reference-nullability annotation.
    pub fn annotated(&self, inner: TypeId) -> TypeId {
        self.intern(TypeData::Annotated(inner))
    }
}

impl Default for TypePool {
    fn default() -> Self {
        Self::new()
    }
}
