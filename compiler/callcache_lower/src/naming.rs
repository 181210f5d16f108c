//! Emitter-facing names for synthesized containers and slots.
//!
//! Names use characters that are illegal in source identifiers so they can
//! never collide with user declarations:
//!
//! - type-scoped container: `<>O`
//! - function-scoped container: `<Anchor>O__{top}_{generation}`
//! - slot: `<{ordinal}>__{Function}`

use callcache_ir::{FuncId, Program, ScopeAnchor};

/// Name of a type-scoped container.
pub const TYPE_CONTAINER_NAME: &str = "<>O";

/// Name of the container for `anchor`.
///
/// `generation` counts the function-scoped containers created before this
/// one under the same outermost function.
pub fn container_name(program: &Program, anchor: ScopeAnchor, generation: u32) -> String {
    match anchor {
        ScopeAnchor::Type(_) => TYPE_CONTAINER_NAME.to_owned(),
        ScopeAnchor::Func(func) => format!(
            "<{}>O__{}_{}",
            program.name(program.func(func).name),
            program.top_level_ordinal(func),
            generation,
        ),
    }
}

/// Name of slot `ordinal` caching a callable for `func`.
pub fn slot_name(program: &Program, ordinal: u32, func: FuncId) -> String {
    format!("<{ordinal}>__{}", program.name(program.func(func).name))
}
