//! Conversion sites.

use callcache_ir::{ConversionOrigin, ExprId, FuncId, FuncRef, Span, TypeDefId, TypeId};

/// One function-reference-to-callable conversion, with the context the
/// eligibility filter and the scope resolver need.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionSite {
    /// The `Convert` node.
    pub expr: ExprId,
    /// The `FuncRef` node converted by `expr`.
    pub source: ExprId,
    pub span: Span,
    /// Fully-substituted function reference.
    pub func_ref: FuncRef,
    /// Fully-substituted target callable type.
    pub target: TypeId,
    pub origin: ConversionOrigin,
    /// Innermost type enclosing the site.
    pub enclosing_type: TypeDefId,
    /// Innermost function enclosing the site; `None` in static-field
    /// initializers.
    pub enclosing_func: Option<FuncId>,
    /// The site is inside a quoted expression tree.
    pub quoted: bool,
    /// The site runs during static initialization: a static-field
    /// initializer or a static constructor, nested lambdas and local
    /// functions included.
    pub static_init: bool,
}
