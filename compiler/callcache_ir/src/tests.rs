use pretty_assertions::assert_eq;

use crate::visitor::{children, walk_expr, Visitor};
use crate::{
    ExprArena, ExprId, ExprKind, FuncKind, ParamOwner, ProgramBuilder, Span, TypeData, TypeDefKind,
    TypeId,
};

// Scope chains

#[test]
fn func_env_lists_type_then_function_params() {
    let mut b = ProgramBuilder::new();
    let outer = b.class("Outer");
    let t = b.type_param(outer, "T");
    let inner = b.nested_class(outer, "Inner");
    let u = b.type_param(inner, "U");
    let test = b.static_method(inner, "Test");
    let v = b.func_type_param(test, "V");
    let local = b.local_function(test, "Local", true, &[]);
    let w = b.func_type_param(local, "W");
    let program = b.finish();

    assert_eq!(program.type_env(inner), vec![t, u]);
    assert_eq!(program.func_env(test), vec![t, u, v]);
    assert_eq!(program.func_env(local), vec![t, u, v, w]);
    assert_eq!(program.type_param(w).owner, ParamOwner::Func(local));
}

#[test]
fn func_chain_is_outermost_first() {
    let mut b = ProgramBuilder::new();
    let c = b.class("C");
    let m = b.static_method(c, "M");
    let l1 = b.local_function(m, "L1", true, &[]);
    let l2 = b.local_function(l1, "L2", false, &[]);
    let program = b.finish();

    assert_eq!(program.func_chain(l2).to_vec(), vec![m, l1, l2]);
    assert_eq!(program.outermost_func(l2), m);
    assert!(program.encloses(m, l2));
    assert!(!program.encloses(l2, m));
    assert_eq!(program.func(l2).owner, c);
}

#[test]
fn static_constructor_context_covers_nested_locals() {
    let mut b = ProgramBuilder::new();
    let c = b.class("C");
    let other = b.class("Other");
    let cctor = b.static_constructor(c);
    let local = b.local_function(cctor, "L", false, &[]);
    let m = b.static_method(c, "M");
    let _ = b.static_constructor(other);
    let program = b.finish();

    assert!(program.in_static_constructor(cctor));
    assert!(program.in_static_constructor(local));
    assert!(!program.in_static_constructor(m));
    assert!(!program.func(cctor).kind.needs_capture());
    assert_eq!(program.static_constructors(c).collect::<Vec<_>>(), vec![cctor]);
}

#[test]
fn top_level_ordinal_counts_only_top_level_functions_of_owner() {
    let mut b = ProgramBuilder::new();
    let c = b.class("C");
    let other = b.class("Other");
    let a = b.static_method(c, "A");
    let _ = b.local_function(a, "Nested", true, &[]);
    let _ = b.static_method(other, "Elsewhere");
    let second = b.static_method(c, "B");
    let local = b.local_function(second, "L", true, &[]);
    let program = b.finish();

    assert_eq!(program.top_level_ordinal(a), 0);
    assert_eq!(program.top_level_ordinal(second), 1);
    assert_eq!(program.top_level_ordinal(local), 1);
}

// Types

#[test]
fn callable_signature_substitutes_declared_params() {
    let mut b = ProgramBuilder::new();
    let func_of = b.func_of(&[TypeId::INT], TypeId::STR);
    let action = b.action_of(&[]);
    let anon = b.pool().function(vec![TypeId::BOOL], TypeId::UNIT);
    let program = b.finish();

    assert_eq!(
        program.callable_signature(func_of),
        Some((vec![TypeId::INT].into_boxed_slice(), TypeId::STR))
    );
    assert_eq!(
        program.callable_signature(action),
        Some((Vec::<TypeId>::new().into_boxed_slice(), TypeId::UNIT))
    );
    assert_eq!(
        program.callable_signature(anon),
        Some((vec![TypeId::BOOL].into_boxed_slice(), TypeId::UNIT))
    );
    assert_eq!(program.callable_signature(TypeId::INT), None);
}

#[test]
fn callable_declarations_are_memoized() {
    let mut b = ProgramBuilder::new();
    let a1 = b.action(1);
    let a1_again = b.action(1);
    let a2 = b.action(2);
    assert_eq!(a1, a1_again);
    assert_ne!(a1, a2);
    assert!(b.program().type_def(a1).is_callable());
    assert!(matches!(
        b.program().type_def(a2).kind,
        TypeDefKind::Callable { ref params, ret } if params.len() == 2 && ret == TypeId::UNIT
    ));
}

#[test]
fn display_type_renders_nested_structure() {
    let mut b = ProgramBuilder::new();
    let d = b.class("D");
    let t = b.type_param(d, "T");
    let t_ty = b.param_ty(t);
    let x = b.name("x");
    let y = b.name("y");
    let tuple = b.pool().named_tuple(vec![t_ty, t_ty], vec![x, y]);
    let action = b.action_of(&[tuple]);
    let annotated = b.pool().annotated(t_ty);
    let program = b.finish();

    assert_eq!(program.display_type(action), "Action<(T x, T y)>");
    assert_eq!(program.display_type(program.self_type(d)), "D<T>");
    assert_eq!(program.display_type(annotated), "T?");
}

// Builder

#[test]
fn builder_spans_follow_allocation_order() {
    let mut b = ProgramBuilder::new();
    let first = b.int(1);
    let second = b.int(2);
    let program = b.finish();
    assert!(program.arena.span(first) < program.arena.span(second));
    assert_eq!(program.arena.span(second).len(), 1);
}

#[test]
fn local_functions_inherit_owner() {
    let mut b = ProgramBuilder::new();
    let c = b.class("C");
    let m = b.instance_method(c, "M");
    let local = b.local_function(m, "L", false, &["x"]);
    let program = b.finish();
    assert_eq!(program.func(local).owner, c);
    assert_eq!(program.func(local).kind, FuncKind::Local { is_static: false });
    assert!(program.func(local).kind.needs_capture());
    assert!(program.func(m).kind.needs_capture());
}

#[test]
fn convert_func_allocates_reference_then_conversion() {
    let mut b = ProgramBuilder::new();
    let c = b.class("C");
    let target = b.static_method(c, "Target");
    let action = b.action_of(&[]);
    let conv = b.convert_func(target, &[], action);
    let program = b.finish();

    let ExprKind::Convert { source, target: ty, .. } = program.arena.kind(conv) else {
        panic!("expected a conversion");
    };
    assert_eq!(*ty, action);
    assert_eq!(program.arena.ty(conv), action);
    assert!(matches!(program.arena.kind(*source), ExprKind::FuncRef(r) if r.func == target));
}

// Arena and visitor

#[test]
fn replace_kind_keeps_span_and_type() {
    let mut b = ProgramBuilder::new();
    let id = b.int(7);
    let mut program = b.finish();
    let span = program.arena.span(id);
    let old = program.arena.replace_kind(id, ExprKind::Bool(true));
    assert_eq!(old, ExprKind::Int(7));
    assert_eq!(program.arena.span(id), span);
    assert_eq!(program.arena.ty(id), TypeId::INT);
}

#[test]
fn empty_list_range() {
    let mut arena = ExprArena::new();
    let range = arena.alloc_list(std::iter::empty());
    assert!(range.is_empty());
    assert_eq!(arena.list(range), &[] as &[ExprId]);
    assert_eq!(Span::DUMMY.len(), 0);
}

struct CountInts(usize);

impl Visitor for CountInts {
    fn visit_expr(&mut self, arena: &ExprArena, id: ExprId) {
        if matches!(arena.kind(id), ExprKind::Int(_)) {
            self.0 += 1;
        }
        walk_expr(self, arena, id);
    }
}

#[test]
fn visitor_reaches_every_nested_expression() {
    let mut b = ProgramBuilder::new();
    let one = b.int(1);
    let two = b.int(2);
    let three = b.int(3);
    let flag = b.boolean(true);
    let cond = b.cond(flag, two, three);
    let quoted = b.quote(cond);
    let block = b.block(&[one, quoted]);
    let program = b.finish();

    let mut counter = CountInts(0);
    counter.visit_expr(&program.arena, block);
    assert_eq!(counter.0, 3);
    assert_eq!(children(&program.arena, block).to_vec(), vec![one, quoted]);
    assert_eq!(program.arena.ty(block), TypeId::OBJECT);
}

#[test]
fn self_type_of_nested_generic_includes_outer_params() {
    let mut b = ProgramBuilder::new();
    let a = b.class("A");
    let t = b.type_param(a, "T");
    let inner = b.nested_class(a, "B");
    let v = b.type_param(inner, "V");
    let program = b.finish();

    let expected = TypeData::Named {
        def: inner,
        args: vec![program.pool.param(t), program.pool.param(v)].into_boxed_slice(),
    };
    assert_eq!(program.pool.lookup(program.self_type(inner)), expected);
}
