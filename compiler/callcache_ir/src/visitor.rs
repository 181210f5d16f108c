//! Read-only traversal of expression trees.

use smallvec::SmallVec;

use crate::{ExprArena, ExprId, ExprKind};

/// Child expressions of a node, in evaluation order.
pub fn children(arena: &ExprArena, id: ExprId) -> SmallVec<[ExprId; 4]> {
    let mut out = SmallVec::new();
    match arena.kind(id) {
        ExprKind::Unit
        | ExprKind::Int(_)
        | ExprKind::Bool(_)
        | ExprKind::Str(_)
        | ExprKind::Local(_)
        | ExprKind::New(_)
        | ExprKind::StaticField { .. } => {}
        ExprKind::FuncRef(func_ref) => out.extend(func_ref.receiver),
        ExprKind::Let { init, .. } => out.push(*init),
        ExprKind::Block(range) => out.extend_from_slice(arena.list(*range)),
        ExprKind::Convert { source, .. } => out.push(*source),
        ExprKind::CacheOrInit { init, .. } => out.push(*init),
        ExprKind::Call { target, args } => {
            out.extend(target.receiver);
            out.extend_from_slice(arena.list(*args));
        }
        ExprKind::Invoke { callee, args } => {
            out.push(*callee);
            out.extend_from_slice(arena.list(*args));
        }
        ExprKind::Lambda { body, .. } => out.push(*body),
        ExprKind::Quote(inner) => out.push(*inner),
        ExprKind::AssignStatic { value, .. } => out.push(*value),
        ExprKind::RefEq(lhs, rhs) => {
            out.push(*lhs);
            out.push(*rhs);
        }
        ExprKind::Cond {
            cond,
            then_branch,
            else_branch,
        } => {
            out.push(*cond);
            out.push(*then_branch);
            out.push(*else_branch);
        }
    }
    out
}

/// Expression visitor. Override `visit_expr` and call [`walk_expr`] to
/// continue into children.
pub trait Visitor {
    fn visit_expr(&mut self, arena: &ExprArena, id: ExprId) {
        walk_expr(self, arena, id);
    }
}

/// Visit every child of `id`.
pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, arena: &ExprArena, id: ExprId) {
    for child in children(arena, id) {
        visitor.visit_expr(arena, child);
    }
}
