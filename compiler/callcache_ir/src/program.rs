//! The bound program: symbol tables, type pool and expression arena.

use std::fmt::Write as _;

use smallvec::SmallVec;

use crate::types::{Substitution, TypeData, TypePool};
use crate::{
    CacheContainer, ContainerId, ExprArena, FuncDef, FuncId, FuncKind, Name, SharedInterner,
    TypeDef, TypeDefId, TypeDefKind, TypeId, TypeParamDef, TypeParamId,
};

/// A bound translation unit.
///
/// Symbol tables are flat vectors indexed by their id newtypes. The
/// lowering pass mutates the program in place: it rewrites conversion
/// nodes in `arena`, appends container type parameters to `type_params`,
/// and records the synthesized layout in `containers`.
pub struct Program {
    pub interner: SharedInterner,
    pub pool: TypePool,
    pub types: Vec<TypeDef>,
    pub funcs: Vec<FuncDef>,
    pub type_params: Vec<TypeParamDef>,
    pub arena: ExprArena,
    pub containers: Vec<CacheContainer>,
}

impl Program {
    /// Create an empty program sharing `interner`.
    pub fn new(interner: SharedInterner) -> Self {
        Self {
            interner,
            pool: TypePool::new(),
            types: Vec::new(),
            funcs: Vec::new(),
            type_params: Vec::new(),
            arena: ExprArena::new(),
            containers: Vec::new(),
        }
    }

    // Lookups

    #[inline]
    pub fn type_def(&self, id: TypeDefId) -> &TypeDef {
        &self.types[id.index()]
    }

    #[inline]
    pub fn func(&self, id: FuncId) -> &FuncDef {
        &self.funcs[id.index()]
    }

    #[inline]
    pub fn type_param(&self, id: TypeParamId) -> &TypeParamDef {
        &self.type_params[id.index()]
    }

    #[inline]
    pub fn container(&self, id: ContainerId) -> &CacheContainer {
        &self.containers[id.index()]
    }

    /// Resolve an interned name.
    #[inline]
    pub fn name(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    /// Ids of every declared function, in declaration order.
    pub fn func_ids(&self) -> impl Iterator<Item = FuncId> + '_ {
        (0..self.funcs.len()).map(|idx| FuncId::new(crate::ids::to_u32(idx, "functions")))
    }

    /// Ids of every declared type, in declaration order.
    pub fn type_def_ids(&self) -> impl Iterator<Item = TypeDefId> + '_ {
        (0..self.types.len()).map(|idx| TypeDefId::new(crate::ids::to_u32(idx, "types")))
    }

    // Scope chains

    /// The type and its enclosing types, outermost first.
    pub fn type_chain(&self, def: TypeDefId) -> SmallVec<[TypeDefId; 4]> {
        let mut chain = SmallVec::new();
        let mut current = Some(def);
        while let Some(id) = current {
            chain.push(id);
            current = self.type_def(id).parent;
        }
        chain.reverse();
        chain
    }

    /// The function and its enclosing functions, outermost first.
    pub fn func_chain(&self, func: FuncId) -> SmallVec<[FuncId; 4]> {
        let mut chain = SmallVec::new();
        let mut current = Some(func);
        while let Some(id) = current {
            chain.push(id);
            current = self.func(id).parent;
        }
        chain.reverse();
        chain
    }

    /// The outermost function enclosing `func` (itself for non-local
    /// functions).
    pub fn outermost_func(&self, func: FuncId) -> FuncId {
        let mut current = func;
        while let Some(parent) = self.func(current).parent {
            current = parent;
        }
        current
    }

    /// Returns `true` if `func` is a static constructor or nested in one.
    pub fn in_static_constructor(&self, func: FuncId) -> bool {
        self.func(self.outermost_func(func)).kind == FuncKind::StaticConstructor
    }

    /// Static constructors declared by `def`, in declaration order.
    pub fn static_constructors(&self, def: TypeDefId) -> impl Iterator<Item = FuncId> + '_ {
        self.func_ids().filter(move |&func| {
            let data = self.func(func);
            data.owner == def && data.kind == FuncKind::StaticConstructor
        })
    }

    /// Returns `true` if `ancestor` is `func` or encloses it.
    pub fn encloses(&self, ancestor: FuncId, func: FuncId) -> bool {
        let mut current = Some(func);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.func(id).parent;
        }
        false
    }

    /// Every type parameter in scope inside `def`, outermost type first.
    pub fn type_env(&self, def: TypeDefId) -> Vec<TypeParamId> {
        self.type_chain(def)
            .iter()
            .flat_map(|&id| self.type_def(id).params.iter().copied())
            .collect()
    }

    /// The generic environment of `func`: its owner type chain's
    /// parameters, then its enclosing functions', then its own.
    pub fn func_env(&self, func: FuncId) -> Vec<TypeParamId> {
        let mut env = self.type_env(self.func(func).owner);
        for id in self.func_chain(func) {
            env.extend(self.func(id).type_params.iter().copied());
        }
        env
    }

    /// Declaration ordinal of a top-level function among the top-level
    /// functions of its owner type.
    pub fn top_level_ordinal(&self, func: FuncId) -> u32 {
        let top = self.outermost_func(func);
        let owner = self.func(top).owner;
        let preceding = self.funcs[..top.index()]
            .iter()
            .filter(|def| def.owner == owner && def.parent.is_none())
            .count();
        crate::ids::to_u32(preceding, "functions")
    }

    // Types

    /// The instantiation of `def` over its own generic environment
    /// (`D<T>` inside `D<T>`).
    pub fn self_type(&self, def: TypeDefId) -> TypeId {
        let args: Vec<TypeId> = self
            .type_env(def)
            .into_iter()
            .map(|param| self.pool.param(param))
            .collect();
        self.pool.named(def, args)
    }

    /// Parameter and return types of a callable type, with the declared
    /// callable's generic environment substituted.
    ///
    /// Returns `None` if `ty` is not a callable type.
    pub fn callable_signature(&self, ty: TypeId) -> Option<(Box<[TypeId]>, TypeId)> {
        match self.pool.lookup(ty) {
            TypeData::Function { params, ret } => Some((params, ret)),
            TypeData::Named { def, args } => {
                let TypeDefKind::Callable { params, ret } = &self.type_def(def).kind else {
                    return None;
                };
                let subst = Substitution::from_pairs(&self.type_env(def), &args)?;
                Some((
                    subst.apply_all(&self.pool, params),
                    subst.apply(&self.pool, *ret),
                ))
            }
            TypeData::Annotated(inner) => self.callable_signature(inner),
            _ => None,
        }
    }

    /// Append a type parameter definition.
    pub fn add_type_param(&mut self, def: TypeParamDef) -> TypeParamId {
        let id = TypeParamId::new(crate::ids::to_u32(self.type_params.len(), "type parameters"));
        self.type_params.push(def);
        id
    }

    // Display

    /// Render a type for diagnostics and logs.
    pub fn display_type(&self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, ty);
        out
    }

    fn write_type(&self, out: &mut String, ty: TypeId) {
        match self.pool.lookup(ty) {
            TypeData::Int => out.push_str("int"),
            TypeData::Bool => out.push_str("bool"),
            TypeData::Str => out.push_str("string"),
            TypeData::Unit => out.push_str("void"),
            TypeData::Object => out.push_str("object"),
            TypeData::Dynamic => out.push_str("dynamic"),
            TypeData::Param(param) => out.push_str(self.name(self.type_param(param).name)),
            TypeData::Named { def, args } => {
                out.push_str(self.name(self.type_def(def).name));
                if !args.is_empty() {
                    out.push('<');
                    self.write_list(out, &args);
                    out.push('>');
                }
            }
            TypeData::Function { params, ret } => {
                out.push_str("fn(");
                self.write_list(out, &params);
                out.push_str(") -> ");
                self.write_type(out, ret);
            }
            TypeData::Tuple { elems, names } => {
                out.push('(');
                for (idx, &elem) in elems.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(out, elem);
                    if let Some(name) = names.as_deref().and_then(|names| names.get(idx)) {
                        let _ = write!(out, " {}", self.name(*name));
                    }
                }
                out.push(')');
            }
            TypeData::Nullable(inner) | TypeData::Annotated(inner) => {
                self.write_type(out, inner);
                out.push('?');
            }
        }
    }

    fn write_list(&self, out: &mut String, tys: &[TypeId]) {
        for (idx, &ty) in tys.iter().enumerate() {
            if idx > 0 {
                out.push_str(", ");
            }
            self.write_type(out, ty);
        }
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new(SharedInterner::new())
    }
}
