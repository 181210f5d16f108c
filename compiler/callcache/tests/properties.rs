#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Property tests over generated programs.

use proptest::prelude::*;
use rustc_hash::FxHashSet;

use callcache::{render_layout, CacheOptions, Evaluator, Program, ProgramBuilder, Session};
use callcache_ir::{ExprId, ExprKind, FuncId, TypeId};

/// One conversion in a generated caller: target index and whether it is
/// written as an explicit construction.
#[derive(Clone, Debug)]
struct Conversion {
    target: usize,
    construct: bool,
}

/// A class with `targets` static functions and one caller per entry of
/// `callers`, each converting the listed targets in order.
#[derive(Clone, Debug)]
struct Shape {
    targets: usize,
    callers: Vec<Vec<Conversion>>,
}

fn shape() -> impl Strategy<Value = Shape> {
    (1usize..5).prop_flat_map(|targets| {
        let conversion = (0..targets, proptest::bool::weighted(0.2))
            .prop_map(|(target, construct)| Conversion { target, construct });
        proptest::collection::vec(proptest::collection::vec(conversion, 0..6), 1..5)
            .prop_map(move |callers| Shape { targets, callers })
    })
}

struct Built {
    program: Program,
    callers: Vec<FuncId>,
    /// Every conversion node with its shape entry.
    sites: Vec<(ExprId, Conversion)>,
}

fn build(shape: &Shape) -> Built {
    let mut b = ProgramBuilder::new();
    let c = b.class("C");
    let func_int = b.func_of(&[], TypeId::INT);
    let targets: Vec<FuncId> = (0..shape.targets)
        .map(|idx| {
            let target = b.static_method(c, &format!("Target{idx}"));
            let body = b.int(i64::try_from(idx).unwrap());
            b.set_body(target, body);
            target
        })
        .collect();

    let mut callers = Vec::new();
    let mut sites = Vec::new();
    for (idx, conversions) in shape.callers.iter().enumerate() {
        let caller = b.static_method(c, &format!("Caller{idx}"));
        let stmts: Vec<ExprId> = conversions
            .iter()
            .map(|conversion| {
                let source = b.func_ref(targets[conversion.target], &[]);
                let expr = if conversion.construct {
                    b.construct(source, func_int)
                } else {
                    b.convert(source, func_int)
                };
                sites.push((expr, conversion.clone()));
                expr
            })
            .collect();
        let body = b.block(&stmts);
        b.set_body(caller, body);
        callers.push(caller);
    }

    Built {
        program: b.finish(),
        callers,
        sites,
    }
}

proptest! {
    #[test]
    fn layout_is_deterministic(shape in shape()) {
        let mut sequential = build(&shape).program;
        Session::default().compile(&mut sequential).unwrap();

        let mut parallel = build(&shape).program;
        Session::new(CacheOptions::default().with_parallel_collect(true))
            .compile(&mut parallel)
            .unwrap();

        prop_assert_eq!(render_layout(&sequential), render_layout(&parallel));
    }

    #[test]
    fn one_slot_per_distinct_target(shape in shape()) {
        let mut built = build(&shape);
        let stats = Session::default().compile(&mut built.program).unwrap();

        let cacheable: Vec<&(ExprId, Conversion)> = built
            .sites
            .iter()
            .filter(|(_, conversion)| !conversion.construct)
            .collect();
        let distinct: FxHashSet<usize> = cacheable
            .iter()
            .map(|(_, conversion)| conversion.target)
            .collect();

        prop_assert_eq!(stats.cached, cacheable.len());
        prop_assert_eq!(stats.slots, distinct.len());
        prop_assert_eq!(stats.containers, usize::from(!distinct.is_empty()));

        for (expr, conversion) in &built.sites {
            let cached = matches!(
                built.program.arena.kind(*expr),
                ExprKind::CacheOrInit { .. }
            );
            prop_assert_eq!(cached, !conversion.construct);
        }
    }

    #[test]
    fn second_run_changes_nothing(shape in shape()) {
        let mut program = build(&shape).program;
        Session::default().compile(&mut program).unwrap();
        let first = render_layout(&program);

        let stats = Session::default().compile(&mut program).unwrap();
        prop_assert_eq!(stats.cached, 0);
        prop_assert_eq!(render_layout(&program), first);
    }

    #[test]
    fn callers_allocate_at_most_one_callable_per_target(shape in shape()) {
        let mut built = build(&shape);
        Session::default().compile(&mut built.program).unwrap();

        let constructions = built
            .sites
            .iter()
            .filter(|(_, conversion)| conversion.construct)
            .count();
        let distinct: FxHashSet<usize> = built
            .sites
            .iter()
            .filter(|(_, conversion)| !conversion.construct)
            .map(|(_, conversion)| conversion.target)
            .collect();

        let mut eval = Evaluator::new(&built.program);
        for _ in 0..2 {
            for &caller in &built.callers {
                eval.call(caller, &[], vec![]).unwrap();
            }
        }
        prop_assert_eq!(
            eval.callables_constructed(),
            distinct.len() + 2 * constructions
        );
    }
}
