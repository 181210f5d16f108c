use pretty_assertions::assert_eq;

use super::*;
use crate::{Name, TypeDefId, TypeId, TypeParamId};

#[test]
fn primitives_are_preinterned() {
    let pool = TypePool::new();
    assert_eq!(pool.intern(TypeData::Int), TypeId::INT);
    assert_eq!(pool.intern(TypeData::Dynamic), TypeId::DYNAMIC);
    assert_eq!(pool.len(), TypeId::PRIMITIVE_COUNT as usize);
}

#[test]
fn structurally_equal_types_share_an_id() {
    let pool = TypePool::new();
    let t = pool.param(TypeParamId::new(0));
    let a = pool.named(TypeDefId::new(3), vec![t, TypeId::INT]);
    let b = pool.named(TypeDefId::new(3), vec![t, TypeId::INT]);
    let c = pool.named(TypeDefId::new(3), vec![TypeId::INT, t]);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn tuple_names_participate_in_identity() {
    let pool = TypePool::new();
    let plain = pool.tuple(vec![TypeId::INT, TypeId::INT]);
    let named = pool.named_tuple(
        vec![TypeId::INT, TypeId::INT],
        vec![Name::from_raw(1), Name::from_raw(2)],
    );
    assert_ne!(plain, named);
}

#[test]
fn substitution_replaces_mapped_params_only() {
    let pool = TypePool::new();
    let t = TypeParamId::new(0);
    let u = TypeParamId::new(1);
    let func = pool.function(vec![pool.param(t)], pool.param(u));

    let mut subst = Substitution::new();
    subst.insert(t, TypeId::STR);
    let applied = subst.apply(&pool, func);

    assert_eq!(applied, pool.function(vec![TypeId::STR], pool.param(u)));
}

#[test]
fn substitution_from_mismatched_pairs_is_none() {
    assert!(Substitution::from_pairs(&[TypeParamId::new(0)], &[]).is_none());
    assert!(Substitution::from_pairs(&[], &[]).is_some_and(|s| s.is_empty()));
}

#[test]
fn visitor_reaches_nested_params() {
    struct Collect<'a> {
        pool: &'a TypePool,
        found: Vec<TypeParamId>,
    }

    impl TypeIdVisitor for Collect<'_> {
        fn pool(&self) -> &TypePool {
            self.pool
        }

        fn visit_param(&mut self, param: TypeParamId) {
            self.found.push(param);
        }
    }

    let pool = TypePool::new();
    let t = TypeParamId::new(4);
    let nested = pool.nullable(pool.param(t));
    let ty = pool.named(TypeDefId::new(0), vec![pool.tuple(vec![nested, TypeId::BOOL])]);

    let mut collect = Collect {
        pool: &pool,
        found: Vec::new(),
    };
    collect.visit(ty);
    assert_eq!(collect.found, vec![t]);
}
