use pretty_assertions::assert_eq;

use callcache_ir::{ConversionOrigin, ProgramBuilder, TypeId};

use crate::test_helpers::{basic, set_block_body};
use crate::{collect_sites, LowerError};

#[test]
fn sites_are_sorted_by_source_position() {
    let mut t = basic();
    let first = t.b.static_method(t.class, "First");
    let second = t.b.static_method(t.class, "Second");
    // Second's body is allocated before First's.
    let late_decl = t.b.convert_func(t.target, &[], t.action);
    set_block_body(&mut t.b, second, &[late_decl]);
    let early_decl = t.b.convert_func(t.target, &[], t.action);
    set_block_body(&mut t.b, first, &[early_decl]);
    let program = t.b.finish();

    let sites = collect_sites(&program, false).unwrap();
    let exprs: Vec<_> = sites.iter().map(|site| site.expr).collect();
    assert_eq!(exprs, vec![late_decl, early_decl]);
    assert_eq!(sites[0].enclosing_func, Some(second));
    assert_eq!(sites[1].enclosing_func, Some(first));
}

#[test]
fn parallel_collection_matches_sequential() {
    let mut t = basic();
    for idx in 0..8 {
        let func = t.b.static_method(t.class, &format!("M{idx}"));
        let a = t.b.convert_func(t.target, &[], t.action);
        let b = t.b.convert_func(t.target, &[], t.action);
        set_block_body(&mut t.b, func, &[a, b]);
    }
    let program = t.b.finish();

    let sequential = collect_sites(&program, false).unwrap();
    let parallel = collect_sites(&program, true).unwrap();
    assert_eq!(sequential.len(), 16);
    assert_eq!(sequential, parallel);
}

#[test]
fn quoted_context_is_recorded() {
    let mut t = basic();
    let test = t.b.static_method(t.class, "Test");
    let plain = t.b.convert_func(t.target, &[], t.action);
    let quoted_conv = t.b.convert_func(t.target, &[], t.action);
    let quote = t.b.quote(quoted_conv);
    set_block_body(&mut t.b, test, &[plain, quote]);
    let program = t.b.finish();

    let sites = collect_sites(&program, false).unwrap();
    assert_eq!(sites.len(), 2);
    assert!(!sites[0].quoted);
    assert!(sites[1].quoted);
}

#[test]
fn static_initialization_sites_are_flagged() {
    let mut t = basic();
    let self_ty = t.b.self_type(t.class);

    // static Action F = Target;
    let field_init = t.b.convert_func(t.target, &[], t.action);
    t.b.static_field(t.class, "F", t.action, Some(field_init));

    // static Func<Action> G = () => Target;
    let nested = t.b.convert_func(t.target, &[], t.action);
    let lambda_ty = t.b.func_of(&[], t.action);
    let lambda = t.b.lambda(&[], nested, lambda_ty);
    t.b.static_field(t.class, "G", lambda_ty, Some(lambda));

    // static C() { F = Target; void Local() { Target; } }
    let cctor = t.b.static_constructor(t.class);
    let local = t.b.local_function(cctor, "Local", true, &[]);
    let in_cctor = t.b.convert_func(t.target, &[], t.action);
    let cctor_assign = t.b.assign_static(self_ty, "F", in_cctor);
    set_block_body(&mut t.b, cctor, &[cctor_assign]);
    let in_local = t.b.convert_func(t.target, &[], t.action);
    set_block_body(&mut t.b, local, &[in_local]);

    // static void Init() { F = Target; }
    let method = t.b.static_method(t.class, "Init");
    let assigned = t.b.convert_func(t.target, &[], t.action);
    let assign = t.b.assign_static(self_ty, "F", assigned);
    set_block_body(&mut t.b, method, &[assign]);
    let program = t.b.finish();

    let sites = collect_sites(&program, false).unwrap();
    let flags: Vec<_> = sites
        .iter()
        .map(|site| (site.expr, site.static_init, site.enclosing_func))
        .collect();
    assert_eq!(
        flags,
        vec![
            (field_init, true, None),
            (nested, true, None),
            (in_cctor, true, Some(cctor)),
            (in_local, true, Some(local)),
            (assigned, false, Some(method)),
        ]
    );
}

#[test]
fn origin_and_target_are_recorded() {
    let mut t = basic();
    let test = t.b.static_method(t.class, "Test");
    let source = t.b.func_ref(t.target, &[]);
    let construct = t.b.construct(source, t.action);
    set_block_body(&mut t.b, test, &[construct]);
    let program = t.b.finish();

    let sites = collect_sites(&program, false).unwrap();
    assert_eq!(sites[0].origin, ConversionOrigin::Construction);
    assert_eq!(sites[0].target, t.action);
    assert_eq!(sites[0].source, source);
    assert_eq!(sites[0].enclosing_type, t.class);
}

#[test]
fn conversion_of_non_reference_is_malformed() {
    let mut b = ProgramBuilder::new();
    let c = b.class("C");
    let test = b.static_method(c, "Test");
    let action = b.action_of(&[]);
    let value = b.int(1);
    let conv = b.convert(value, action);
    b.set_body(test, conv);
    let program = b.finish();

    let err = collect_sites(&program, false).unwrap_err();
    assert!(matches!(err, LowerError::MalformedConversion { expr, .. } if expr == conv));
}

#[test]
fn missing_type_arguments_are_an_arity_mismatch() {
    let mut b = ProgramBuilder::new();
    let c = b.class("C");
    let target = b.static_method(c, "Target");
    let _ = b.func_type_param(target, "T");
    let test = b.static_method(c, "Test");
    let action = b.action_of(&[]);
    let conv = b.convert_func(target, &[], action);
    b.set_body(test, conv);
    let program = b.finish();

    let err = collect_sites(&program, false).unwrap_err();
    assert_eq!(
        err,
        LowerError::ArityMismatch {
            func: target,
            expected: 1,
            found: 0,
            span: program.arena.span(conv),
        }
    );
}

#[test]
fn conversions_under_calls_and_lambdas_are_found() {
    let mut t = basic();
    let sink = t.b.method(t.class, "Sink", callcache_ir::FuncKind::Static, &["a"]);
    let test = t.b.static_method(t.class, "Test");
    let arg = t.b.convert_func(t.target, &[], t.action);
    let call = t.b.call(sink, &[], &[arg]);
    let inner = t.b.convert_func(t.target, &[], t.action);
    let lambda_ty = t.b.func_of(&[], t.action);
    let lambda = t.b.lambda(&[], inner, lambda_ty);
    set_block_body(&mut t.b, test, &[call, lambda]);
    let program = t.b.finish();

    let sites = collect_sites(&program, false).unwrap();
    assert_eq!(sites.len(), 2);
    assert!(sites.iter().all(|site| site.enclosing_func == Some(test)));
    assert_eq!(program.arena.ty(arg), t.action);
    assert_ne!(program.arena.ty(call), TypeId::UNIT);
}
