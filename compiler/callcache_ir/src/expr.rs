//! Flat expression arena for bound function bodies.
//!
//! Expressions reference children by [`ExprId`]; argument and statement
//! lists are stored flattened and referenced by [`ExprRange`]. The lowering
//! pass rewrites conversion nodes in place with [`ExprArena::replace_kind`]
//! and appends the nodes it synthesizes.

use crate::cache::SlotRef;
use crate::ids::to_u32;
use crate::{ExprId, FuncId, Name, Span, TypeId};

/// Range of expression ids in the arena's flattened list storage.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ExprRange {
    pub start: u32,
    pub len: u32,
}

impl ExprRange {
    /// Empty range.
    pub const EMPTY: ExprRange = ExprRange { start: 0, len: 0 };

    /// Returns `true` if the range is empty.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// A resolved reference to a function, with its generic substitution.
///
/// `type_args` holds one argument per parameter of the function's generic
/// environment (owner types outermost first, then enclosing functions, then
/// the function's own parameters).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FuncRef {
    pub func: FuncId,
    pub type_args: Box<[TypeId]>,
    /// Receiver expression written at the reference (`c.Target`).
    pub receiver: Option<ExprId>,
}

/// Syntax that produced a function-reference-to-callable conversion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConversionOrigin {
    /// Target-typed conversion (`Action a = Target;`).
    Implicit,
    /// Cast syntax (`(Action)Target`).
    Explicit,
    /// Explicit construction (`new Action(Target)`, `new(Target)`).
    Construction,
    /// Fresh construction that populates a cache slot.
    CacheFill,
}

/// Expression kinds of the bound IR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprKind {
    Unit,
    Int(i64),
    Bool(bool),
    Str(Name),
    /// Read a local variable or parameter.
    Local(Name),
    /// Bind a local for the rest of the enclosing block.
    Let { name: Name, init: ExprId },
    /// Evaluate in order; the value is the last expression's (or unit).
    Block(ExprRange),
    /// Allocate an instance of a class or struct type.
    New(TypeId),
    /// A function reference (method group). Only meaningful as the source
    /// of a conversion.
    FuncRef(FuncRef),
    /// Convert a function reference to a callable value of type `target`.
    Convert {
        source: ExprId,
        target: TypeId,
        origin: ConversionOrigin,
    },
    /// Read `slot`; if empty, evaluate `init`, store it into `slot`; yield
    /// the slot's value.
    CacheOrInit { slot: SlotRef, init: ExprId },
    /// Direct call of a function.
    Call { target: FuncRef, args: ExprRange },
    /// Invoke a callable value.
    Invoke { callee: ExprId, args: ExprRange },
    /// Anonymous function closing over the current frame.
    Lambda { params: Box<[Name]>, body: ExprId },
    /// Quoted expression tree: the operand is reified as data, not run.
    Quote(ExprId),
    /// Assign a static field of an instantiated type.
    AssignStatic {
        owner: TypeId,
        field: Name,
        value: ExprId,
    },
    /// Read a static field of an instantiated type.
    StaticField { owner: TypeId, field: Name },
    /// Reference equality of two values.
    RefEq(ExprId, ExprId),
    /// Conditional expression.
    Cond {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },
}

/// An expression node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub ty: TypeId,
}

impl Expr {
    /// Create a new expression node.
    pub fn new(kind: ExprKind, span: Span, ty: TypeId) -> Self {
        Self { kind, span, ty }
    }
}

/// Arena of expression nodes.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    /// Flattened expression id lists (arguments, block statements).
    lists: Vec<ExprId>,
}

impl ExprArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, returning its id.
    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(to_u32(self.exprs.len(), "expressions"));
        self.exprs.push(expr);
        id
    }

    /// Allocate a list of expression ids, returning its range.
    pub fn alloc_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = to_u32(self.lists.len(), "expression list entries");
        self.lists.extend(ids);
        let len = to_u32(self.lists.len(), "expression list entries") - start;
        ExprRange { start, len }
    }

    /// Get an expression node.
    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Get an expression's kind.
    #[inline]
    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.exprs[id.index()].kind
    }

    /// Get an expression's span.
    #[inline]
    pub fn span(&self, id: ExprId) -> Span {
        self.exprs[id.index()].span
    }

    /// Get an expression's type.
    #[inline]
    pub fn ty(&self, id: ExprId) -> TypeId {
        self.exprs[id.index()].ty
    }

    /// Get the ids in a list range.
    #[inline]
    pub fn list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.lists[start..start + range.len as usize]
    }

    /// Replace an expression's kind, keeping its span and type.
    pub fn replace_kind(&mut self, id: ExprId, kind: ExprKind) -> ExprKind {
        std::mem::replace(&mut self.exprs[id.index()].kind, kind)
    }

    /// Returns `true` if `id` refers to an allocated node.
    #[inline]
    pub fn contains(&self, id: ExprId) -> bool {
        id.index() < self.exprs.len()
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    /// Returns `true` if no nodes have been allocated.
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}
