//! Internal-consistency faults of the caching pass.
//!
//! None of these describe a problem in user code: each one means the
//! binder handed the pass an IR that violates its input contract. Callers
//! abort the compilation and report an internal compiler error.

use callcache_ir::{ExprId, FuncId, ScopeAnchor, Span, TypeParamId};

/// Error raised by [`lower_program`](crate::lower_program).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LowerError {
    /// A cache key mentions a type parameter that is not in scope at the
    /// conversion site.
    #[error("type parameter {param:?} (`{name}`) is not in scope of the conversion at {span:?}")]
    ForeignTypeParameter {
        param: TypeParamId,
        name: String,
        span: Span,
    },

    /// A conversion node whose source is not a function reference.
    #[error("conversion {expr:?} at {span:?} does not convert a function reference")]
    MalformedConversion { expr: ExprId, span: Span },

    /// A function reference whose type arguments do not cover the
    /// referenced function's generic environment.
    #[error(
        "reference to function {func:?} at {span:?} has {found} type arguments, expected {expected}"
    )]
    ArityMismatch {
        func: FuncId,
        expected: usize,
        found: usize,
        span: Span,
    },

    /// A symbol handle that does not resolve in the program's tables.
    #[error("unknown {kind} {index} referenced at {span:?}")]
    UnknownSymbol {
        kind: &'static str,
        index: u32,
        span: Span,
    },

    /// A cacheable site in a scope that already owns a container from an
    /// earlier run. The pass runs once per program.
    #[error("scope {anchor:?} already owns a cache container; new site at {span:?}")]
    AnchorAlreadyLowered { anchor: ScopeAnchor, span: Span },
}

impl LowerError {
    /// Source location the fault was detected at.
    pub fn span(&self) -> Span {
        match self {
            LowerError::ForeignTypeParameter { span, .. }
            | LowerError::MalformedConversion { span, .. }
            | LowerError::ArityMismatch { span, .. }
            | LowerError::UnknownSymbol { span, .. }
            | LowerError::AnchorAlreadyLowered { span, .. } => *span,
        }
    }
}
