//! Evaluation errors.

use callcache_ir::ExprId;

use crate::Value;

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, EvalError>;

/// Run-time fault of the reference evaluator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("unbound local `{name}`")]
    UnboundLocal { name: String },

    #[error("cannot invoke a value of kind {found}")]
    NotCallable { found: &'static str },

    #[error("expected {expected} arguments, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("expected a {expected} value, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("static field `{field}` read before it was assigned")]
    UninitializedStatic { field: String },

    #[error("function `{func}` has no body")]
    MissingBody { func: String },

    #[error("function `{func}` needs a receiver")]
    MissingReceiver { func: String },

    #[error("quoted expression {expr:?} cannot be invoked")]
    QuotedInvoke { expr: ExprId },

    #[error("cache read {expr:?} references a missing slot")]
    DanglingSlot { expr: ExprId },

    #[error("call depth exceeded {limit}")]
    DepthExceeded { limit: usize },
}
