//! Callable-conversion cache synthesis.
//!
//! Rewrites conversions of unbound function references into callable
//! values so that, where legal, the callable is constructed once and cached
//! in a synthesized static slot instead of being allocated at every
//! evaluation.
//!
//! # Pipeline Position
//!
//! ```text
//! Bind → **Cache Conversions** → Emit
//! ```
//!
//! # Phases
//!
//! 1. **Collect** (`collect`): every conversion node with its context,
//!    sorted by source position
//! 2. **Register** (`eligibility`, `key`, `scope`, `registry`): filter,
//!    canonicalize, resolve the scope anchor, find-or-append a slot
//! 3. **Finalize** (`layout`, `naming`): container type parameters,
//!    constraint copying, storage types, synthesized names
//! 4. **Rewrite** (`emit`): each cached site becomes `CacheOrInit`
//! 5. **Validate** (`validate`, debug builds): layout and rewrite
//!    invariants
//!
//! # Prior Art
//!
//! - **Roslyn**: method group conversion caching (C# 11), which stores
//!   delegates for static method groups in synthesized `<>O` containers

mod collect;
mod context;
mod eligibility;
mod emit;
mod error;
mod key;
mod layout;
mod naming;
mod options;
mod registry;
mod scope;
mod site;
pub mod validate;

#[cfg(test)]
mod test_helpers;

pub use collect::collect_sites;
pub use context::{LowerStats, LoweringContext};
pub use eligibility::{check_site, Eligibility, Ineligible};
pub use error::LowerError;
pub use key::{canonical_key, canonical_type, CacheKey, KeyData, KeyInterner};
pub use naming::{container_name, slot_name, TYPE_CONTAINER_NAME};
pub use options::{CacheOptions, LanguageVersion};
pub use scope::{referenced_params, resolve_scope, ScopeResolution};
pub use site::ConversionSite;

use callcache_ir::Program;

/// Run the caching pass over `program`.
///
/// On success the program's conversion sites that could be cached are
/// rewritten to `CacheOrInit` nodes and `program.containers` describes the
/// synthesized containers. On error the program is unchanged.
///
/// The pass runs once per program. A second run leaves sites it already
/// rewrote alone, but a new cacheable site in a scope that already owns a
/// container fails with [`LowerError::AnchorAlreadyLowered`].
pub fn lower_program(program: &mut Program, options: &CacheOptions) -> Result<LowerStats, LowerError> {
    let sites = collect_sites(program, options.parallel_collect)?;

    let mut context = LoweringContext::new(program, options);
    for site in sites {
        context.register(program, site)?;
    }
    let stats = context.finish(program);

    #[cfg(debug_assertions)]
    validate::validate(program);

    tracing::debug!(
        sites = stats.sites,
        cached = stats.cached,
        skipped = stats.total_skipped(),
        containers = stats.containers,
        slots = stats.slots,
        "cached callable conversions",
    );
    Ok(stats)
}
