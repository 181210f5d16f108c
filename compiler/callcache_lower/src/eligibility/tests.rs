use pretty_assertions::assert_eq;

use callcache_ir::{ConversionOrigin, FuncKind};

use crate::test_helpers::{basic, set_block_body, site_for};
use crate::{check_site, CacheOptions, Eligibility, Ineligible, LanguageVersion};

fn ineligible(reason: Ineligible) -> Eligibility {
    Eligibility::Ineligible(reason)
}

#[test]
fn static_function_reference_is_eligible() {
    let mut t = basic();
    let test = t.b.static_method(t.class, "Test");
    let conv = t.b.convert_func(t.target, &[], t.action);
    set_block_body(&mut t.b, test, &[conv]);
    let program = t.b.finish();

    let site = site_for(&program, conv);
    let result = check_site(&program, &site, &CacheOptions::default());
    assert_eq!(result, Eligibility::Eligible);
    assert!(result.is_eligible());
}

#[test]
fn cast_syntax_is_eligible() {
    let mut t = basic();
    let test = t.b.static_method(t.class, "Test");
    let source = t.b.func_ref(t.target, &[]);
    let cast = t.b.cast(source, t.action);
    set_block_body(&mut t.b, test, &[cast]);
    let program = t.b.finish();

    let site = site_for(&program, cast);
    assert_eq!(site.origin, ConversionOrigin::Explicit);
    assert_eq!(
        check_site(&program, &site, &CacheOptions::default()),
        Eligibility::Eligible
    );
}

#[test]
fn options_gate_every_site() {
    let mut t = basic();
    let test = t.b.static_method(t.class, "Test");
    let conv = t.b.convert_func(t.target, &[], t.action);
    set_block_body(&mut t.b, test, &[conv]);
    let program = t.b.finish();
    let site = site_for(&program, conv);

    let off = CacheOptions::disabled();
    let old = CacheOptions::default().with_language_version(LanguageVersion::V10);
    let v11 = CacheOptions::default().with_language_version(LanguageVersion::V11);
    assert_eq!(check_site(&program, &site, &off), ineligible(Ineligible::Disabled));
    assert_eq!(check_site(&program, &site, &old), ineligible(Ineligible::Disabled));
    assert_eq!(check_site(&program, &site, &v11), Eligibility::Eligible);
}

#[test]
fn explicit_construction_is_never_cached() {
    let mut t = basic();
    let test = t.b.static_method(t.class, "Test");
    let source = t.b.func_ref(t.target, &[]);
    let construct = t.b.construct(source, t.action);
    set_block_body(&mut t.b, test, &[construct]);
    let program = t.b.finish();

    let site = site_for(&program, construct);
    assert_eq!(
        check_site(&program, &site, &CacheOptions::default()),
        ineligible(Ineligible::ExplicitConstruction)
    );
}

#[test]
fn quoted_and_static_contexts_are_excluded() {
    let mut t = basic();
    let self_ty = t.b.self_type(t.class);
    t.b.static_field(t.class, "F", t.action, None);

    // static C() { F = Target; }
    let cctor = t.b.static_constructor(t.class);
    let in_cctor = t.b.convert_func(t.target, &[], t.action);
    let cctor_assign = t.b.assign_static(self_ty, "F", in_cctor);
    set_block_body(&mut t.b, cctor, &[cctor_assign]);

    let test = t.b.static_method(t.class, "Test");
    let quoted = t.b.convert_func(t.target, &[], t.action);
    let quote = t.b.quote(quoted);
    let stored = t.b.convert_func(t.target, &[], t.action);
    let assign = t.b.assign_static(self_ty, "F", stored);
    set_block_body(&mut t.b, test, &[quote, assign]);
    let program = t.b.finish();

    let options = CacheOptions::default();
    let check = |expr| check_site(&program, &site_for(&program, expr), &options);
    assert_eq!(check(quoted), ineligible(Ineligible::QuotedContext));
    assert_eq!(check(in_cctor), ineligible(Ineligible::StaticInitializer));
    // Storing into a static field from an ordinary method is cacheable.
    assert_eq!(check(stored), Eligibility::Eligible);
}

#[test]
fn receivers_and_captures_are_excluded() {
    let mut t = basic();
    let self_ty = t.b.self_type(t.class);
    let instance = t.b.instance_method(t.class, "Instance");
    let ext_holder = t.b.static_class("E");
    let extension = t.b.method(ext_holder, "Ext", FuncKind::Extension, &["c"]);
    let test = t.b.static_method(t.class, "Test");
    let capturing = t.b.local_function(test, "Capturing", false, &[]);
    let static_local = t.b.local_function(test, "StaticLocal", true, &[]);
    let action_c = t.b.action_of(&[self_ty]);

    let receiver = t.b.new_object(self_ty);
    let bound_source = t.b.bound_func_ref(instance, &[], receiver);
    let bound = t.b.convert(bound_source, t.action);
    let unbound_instance = t.b.convert_func(instance, &[], t.action);
    let ext_receiver = t.b.new_object(self_ty);
    let ext_source = t.b.bound_func_ref(extension, &[], ext_receiver);
    let ext_bound = t.b.convert(ext_source, t.action);
    let ext_unbound = t.b.convert_func(extension, &[], action_c);
    let capture = t.b.convert_func(capturing, &[], t.action);
    let no_capture = t.b.convert_func(static_local, &[], t.action);
    set_block_body(
        &mut t.b,
        test,
        &[bound, unbound_instance, ext_bound, ext_unbound, capture, no_capture],
    );
    let program = t.b.finish();

    let options = CacheOptions::default();
    let check = |expr| check_site(&program, &site_for(&program, expr), &options);
    assert_eq!(check(bound), ineligible(Ineligible::BoundReceiver));
    assert_eq!(check(unbound_instance), ineligible(Ineligible::CapturingFunction));
    assert_eq!(check(ext_bound), ineligible(Ineligible::BoundReceiver));
    assert_eq!(check(ext_unbound), Eligibility::Eligible);
    assert_eq!(check(capture), ineligible(Ineligible::CapturingFunction));
    assert_eq!(check(no_capture), Eligibility::Eligible);
}

#[test]
fn cache_fill_nodes_are_not_cached_again() {
    let mut t = basic();
    let test = t.b.static_method(t.class, "Test");
    let source = t.b.func_ref(t.target, &[]);
    let fill = t.b.conversion(source, t.action, ConversionOrigin::CacheFill);
    set_block_body(&mut t.b, test, &[fill]);
    let program = t.b.finish();

    let site = site_for(&program, fill);
    assert_eq!(
        check_site(&program, &site, &CacheOptions::default()),
        ineligible(Ineligible::AlreadyCached)
    );
}

#[test]
fn reasons_have_dense_indices() {
    for (idx, reason) in Ineligible::ALL.iter().enumerate() {
        assert_eq!(reason.index(), idx);
        assert!(!reason.as_str().is_empty());
    }
}
