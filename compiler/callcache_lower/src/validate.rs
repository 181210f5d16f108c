//! Post-lowering validation of cache layout and rewrite invariants.
//!
//! [`check`] returns every violation found; [`validate`] is the debug-build
//! hook run at the end of [`lower_program`](crate::lower_program) and
//! panics on the first one.
//!
//! # What's Checked
//!
//! 1. Container ids match their position; one container per anchor
//! 2. Type-scoped containers have no parameters; function-scoped
//!    containers have at least one, each owned by the container
//! 3. Slot ordinals are dense and no two slots of a container share a key
//! 4. Every `CacheOrInit` names an existing slot with the container's arity
//!    and fills it from a `CacheFill` conversion of the slot's function
//! 5. No `CacheOrInit` appears inside a quoted expression tree

use rustc_hash::FxHashSet;

use callcache_ir::visitor::{walk_expr, Visitor};
use callcache_ir::{
    ContainerId, ConversionOrigin, ExprArena, ExprId, ExprKind, ParamOwner, Program, ScopeAnchor,
};

/// A violated invariant of lowered IR.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("container at position {position} has id {id:?}")]
    MisplacedContainer { position: usize, id: ContainerId },

    #[error("anchor {anchor:?} owns more than one container")]
    DuplicateAnchor { anchor: ScopeAnchor },

    #[error("container {container:?} has {found} type parameters, which is invalid for its anchor")]
    ContainerArity { container: ContainerId, found: usize },

    #[error("type parameter {param} of container {container:?} is not owned by it")]
    ForeignContainerParam { container: ContainerId, param: u32 },

    #[error("slot at position {position} of container {container:?} has ordinal {ordinal}")]
    SlotOrdinal {
        container: ContainerId,
        position: usize,
        ordinal: u32,
    },

    #[error("slots {first} and {second} of container {container:?} have equal keys")]
    DuplicateSlot {
        container: ContainerId,
        first: u32,
        second: u32,
    },

    #[error("cache read {expr:?} references a missing slot")]
    DanglingSlot { expr: ExprId },

    #[error("cache read {expr:?} instantiates a container of arity {expected} with {found} arguments")]
    SlotArity {
        expr: ExprId,
        expected: usize,
        found: usize,
    },

    #[error("cache read {expr:?} does not fill its slot from the slot's function")]
    MalformedFill { expr: ExprId },

    #[error("cache read {expr:?} inside a quoted expression")]
    QuotedCache { expr: ExprId },
}

/// Panic if `program` violates any lowering invariant.
///
/// Called after lowering in debug builds.
pub fn validate(program: &Program) {
    let violations = check(program);
    debug_assert!(
        violations.is_empty(),
        "lowered IR violates cache invariants: {violations:?}",
    );
}

/// Collect every invariant violation in `program`.
pub fn check(program: &Program) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_containers(program, &mut violations);
    check_rewrites(program, &mut violations);
    check_quoted(program, &mut violations);
    violations
}

fn check_containers(program: &Program, out: &mut Vec<Violation>) {
    let mut anchors = FxHashSet::default();
    for (position, container) in program.containers.iter().enumerate() {
        if container.id.index() != position {
            out.push(Violation::MisplacedContainer {
                position,
                id: container.id,
            });
        }
        if !anchors.insert(container.anchor) {
            out.push(Violation::DuplicateAnchor {
                anchor: container.anchor,
            });
        }

        let arity_ok = match container.anchor {
            ScopeAnchor::Type(_) => container.type_params.is_empty(),
            ScopeAnchor::Func(_) => !container.type_params.is_empty(),
        };
        if !arity_ok || container.param_sources.len() != container.type_params.len() {
            out.push(Violation::ContainerArity {
                container: container.id,
                found: container.type_params.len(),
            });
        }
        for &param in &container.type_params {
            let owned = program
                .type_params
                .get(param.index())
                .is_some_and(|def| def.owner == ParamOwner::Container(container.id));
            if !owned {
                out.push(Violation::ForeignContainerParam {
                    container: container.id,
                    param: param.raw(),
                });
            }
        }

        for (position, slot) in container.slots.iter().enumerate() {
            if slot.ordinal as usize != position {
                out.push(Violation::SlotOrdinal {
                    container: container.id,
                    position,
                    ordinal: slot.ordinal,
                });
            }
            for other in &container.slots[..position] {
                let equal = other.func == slot.func
                    && other.func_args == slot.func_args
                    && other.storage == slot.storage;
                if equal {
                    out.push(Violation::DuplicateSlot {
                        container: container.id,
                        first: other.ordinal,
                        second: slot.ordinal,
                    });
                }
            }
        }
    }
}

fn check_rewrites(program: &Program, out: &mut Vec<Violation>) {
    let arena = &program.arena;
    for index in 0..arena.len() {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "arena indices always fit u32"
        )]
        let expr = ExprId::new(index as u32);
        let ExprKind::CacheOrInit { slot, init } = arena.kind(expr) else {
            continue;
        };
        let Some(cached) = program
            .containers
            .get(slot.container.index())
            .and_then(|container| container.slot(slot.index).map(|s| (container, s)))
        else {
            out.push(Violation::DanglingSlot { expr });
            continue;
        };
        let (container, cache_slot) = cached;
        if slot.type_args.len() != container.arity() {
            out.push(Violation::SlotArity {
                expr,
                expected: container.arity(),
                found: slot.type_args.len(),
            });
        }

        let fills_slot = match arena.kind(*init) {
            ExprKind::Convert {
                source,
                origin: ConversionOrigin::CacheFill,
                ..
            } => matches!(
                arena.kind(*source),
                ExprKind::FuncRef(func_ref)
                    if func_ref.func == cache_slot.func && func_ref.receiver.is_none()
            ),
            _ => false,
        };
        if !fills_slot {
            out.push(Violation::MalformedFill { expr });
        }
    }
}

fn check_quoted(program: &Program, out: &mut Vec<Violation>) {
    let mut finder = QuotedCacheFinder {
        quote_depth: 0,
        found: Vec::new(),
    };
    for func in &program.funcs {
        if let Some(body) = func.body {
            finder.visit_expr(&program.arena, body);
        }
    }
    out.extend(
        finder
            .found
            .into_iter()
            .map(|expr| Violation::QuotedCache { expr }),
    );
}

struct QuotedCacheFinder {
    quote_depth: u32,
    found: Vec<ExprId>,
}

impl Visitor for QuotedCacheFinder {
    fn visit_expr(&mut self, arena: &ExprArena, id: ExprId) {
        match arena.kind(id) {
            ExprKind::Quote(_) => {
                self.quote_depth += 1;
                walk_expr(self, arena, id);
                self.quote_depth -= 1;
            }
            ExprKind::CacheOrInit { .. } => {
                if self.quote_depth > 0 {
                    self.found.push(id);
                }
                walk_expr(self, arena, id);
            }
            _ => walk_expr(self, arena, id),
        }
    }
}
