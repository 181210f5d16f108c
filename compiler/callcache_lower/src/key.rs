//! Key canonicalization.
//!
//! A cache key is the pair (substituted function, substituted callable
//! type). Both halves are normalized so that types differing only in ways
//! erased at run time compare equal:
//!
//! - tuple element names are dropped;
//! - reference-nullability annotations (`T?` on a reference type) are
//!   dropped, while value-type `Nullable` is kept;
//! - `dynamic` becomes `object`.
//!
//! Normalized types are interned in the program's `TypePool`, so a key is a
//! plain `(FuncId, [TypeId], TypeId)` compared by value. Keys are further
//! interned to a `CacheKey` handle per compilation.

use rustc_hash::FxHashMap;

use callcache_ir::{FuncId, Name, Program, TypeId, TypeIdFolder, TypePool};

use crate::ConversionSite;

/// Structural cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyData {
    pub func: FuncId,
    /// Canonical type arguments of `func`'s generic environment.
    pub type_args: Box<[TypeId]>,
    /// Canonical target callable type.
    pub callable: TypeId,
}

/// Interned cache key handle. Equal handles mean structurally equal keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(u32);

impl CacheKey {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Per-compilation key interner.
#[derive(Default)]
pub struct KeyInterner {
    map: FxHashMap<KeyData, CacheKey>,
    keys: Vec<KeyData>,
}

impl KeyInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a key, returning the existing handle for equal keys.
    pub fn intern(&mut self, data: KeyData) -> CacheKey {
        if let Some(&key) = self.map.get(&data) {
            return key;
        }
        let index = u32::try_from(self.keys.len())
            .unwrap_or_else(|_| panic!("too many cache keys: {}", self.keys.len()));
        let key = CacheKey(index);
        self.keys.push(data.clone());
        self.map.insert(data, key);
        key
    }

    /// Get the data for a key.
    pub fn get(&self, key: CacheKey) -> &KeyData {
        &self.keys[key.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Normalize a type for key comparison.
pub fn canonical_type(pool: &TypePool, ty: TypeId) -> TypeId {
    Canonicalizer { pool }.fold(ty)
}

/// Build the canonical key of an eligible site.
pub fn canonical_key(program: &Program, site: &ConversionSite) -> KeyData {
    let mut canon = Canonicalizer {
        pool: &program.pool,
    };
    KeyData {
        func: site.func_ref.func,
        type_args: canon.fold_all(&site.func_ref.type_args),
        callable: canon.fold(site.target),
    }
}

struct Canonicalizer<'a> {
    pool: &'a TypePool,
}

impl TypeIdFolder for Canonicalizer<'_> {
    fn pool(&self) -> &TypePool {
        self.pool
    }

    fn fold_dynamic(&mut self) -> TypeId {
        TypeId::OBJECT
    }

    fn fold_tuple(&mut self, elems: &[TypeId], _names: Option<&[Name]>) -> TypeId {
        let elems = self.fold_all(elems);
        self.pool.tuple(elems)
    }

    fn fold_annotated(&mut self, inner: TypeId) -> TypeId {
        self.fold(inner)
    }
}
