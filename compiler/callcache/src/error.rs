//! Compilation errors surfaced by the driver.

use callcache_lower::validate::Violation;
use callcache_lower::LowerError;

/// Failure of the caching pipeline.
///
/// Both variants are compiler-internal defects, never diagnostics about
/// user code.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The pass rejected its input.
    #[error("internal compiler error in conversion caching: {0}")]
    Internal(#[from] LowerError),

    /// The lowered program broke a layout or rewrite invariant.
    #[error(
        "conversion caching produced an invalid layout ({} violations, first: {})",
        .0.len(),
        first_violation(.0)
    )]
    Validation(Vec<Violation>),
}

fn first_violation(violations: &[Violation]) -> String {
    violations
        .first()
        .map_or_else(String::new, ToString::to_string)
}
