//! Shared test utilities for the caching pass.
//!
//! Only compiled in test builds.

#![allow(clippy::unwrap_used)]

use callcache_ir::{
    CacheContainer, ExprId, ExprKind, FuncId, Program, ProgramBuilder, SlotRef, TypeDefId, TypeId,
};

use crate::{collect_sites, lower_program, CacheOptions, ConversionSite, LowerStats};

/// A class `C` with a static `Target()` and the `Action` callable type.
pub(crate) struct Basic {
    pub b: ProgramBuilder,
    pub class: TypeDefId,
    pub target: FuncId,
    pub action: TypeId,
}

pub(crate) fn basic() -> Basic {
    let mut b = ProgramBuilder::new();
    let class = b.class("C");
    let target = b.static_method(class, "Target");
    let action = b.action_of(&[]);
    Basic {
        b,
        class,
        target,
        action,
    }
}

/// Give `func` a block body made of `stmts`.
pub(crate) fn set_block_body(b: &mut ProgramBuilder, func: FuncId, stmts: &[ExprId]) {
    let body = b.block(stmts);
    b.set_body(func, body);
}

/// Lower with default options.
pub(crate) fn lower(program: &mut Program) -> LowerStats {
    lower_program(program, &CacheOptions::default()).unwrap()
}

/// The slot a rewritten expression reads, if it was rewritten.
pub(crate) fn slot_of(program: &Program, expr: ExprId) -> Option<&SlotRef> {
    match program.arena.kind(expr) {
        ExprKind::CacheOrInit { slot, .. } => Some(slot),
        _ => None,
    }
}

/// The container with the given synthesized name.
pub(crate) fn container_named<'p>(program: &'p Program, name: &str) -> &'p CacheContainer {
    program
        .containers
        .iter()
        .find(|container| program.name(container.name) == name)
        .unwrap()
}

/// Synthesized slot names of a container, in ordinal order.
pub(crate) fn slot_names(program: &Program, container: &CacheContainer) -> Vec<&'static str> {
    container
        .slots
        .iter()
        .map(|slot| program.name(slot.name))
        .collect()
}

/// The collected site for a conversion node.
pub(crate) fn site_for(program: &Program, expr: ExprId) -> ConversionSite {
    collect_sites(program, false)
        .unwrap()
        .into_iter()
        .find(|site| site.expr == expr)
        .unwrap()
}
