//! Site rewriting (phase 4).
//!
//! Each cached conversion node is replaced in place by
//!
//! ```text
//! CacheOrInit { slot, init: Convert { source, target, origin: CacheFill } }
//! ```
//!
//! which reads the slot, and on an empty slot evaluates `init`, stores the
//! fresh callable and yields it. The original function-reference node is
//! moved under the new `init` node; span and type of the rewritten node are
//! unchanged.

use callcache_ir::{ContainerId, ConversionOrigin, Expr, ExprKind, Program, SlotRef, TypeId};

use crate::ConversionSite;

/// Rewrite `site` to read-or-populate `slot` of `container`.
///
/// The container must already be finalized in `program.containers`.
pub fn rewrite_site(program: &mut Program, site: &ConversionSite, container: ContainerId, slot: u32) {
    let type_args: Box<[TypeId]> = program
        .container(container)
        .param_sources
        .iter()
        .map(|&source| program.pool.param(source))
        .collect();

    let init = program.arena.alloc(Expr::new(
        ExprKind::Convert {
            source: site.source,
            target: site.target,
            origin: ConversionOrigin::CacheFill,
        },
        site.span,
        site.target,
    ));

    program.arena.replace_kind(
        site.expr,
        ExprKind::CacheOrInit {
            slot: SlotRef {
                container,
                index: slot,
                type_args,
            },
            init,
        },
    );
}
