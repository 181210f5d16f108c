//! Container finalization (phase 3).
//!
//! Turns pending containers into [`CacheContainer`] descriptions:
//!
//! 1. For function-scoped containers, close the referenced parameter set
//!    over constraint dependencies and order it by declaration.
//! 2. Allocate one container-owned type parameter per selected parameter,
//!    copying its constraints with every selected parameter substituted by
//!    its container counterpart.
//! 3. Re-express each slot's function arguments and storage type over the
//!    container's parameters.
//! 4. Assign synthesized names.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use callcache_ir::{
    CacheContainer, CacheSlot, Constraint, FuncId, Name, ParamOwner, Program, ScopeAnchor,
    Substitution, TypeIdVisitor, TypeParamDef, TypeParamId,
};

use crate::naming::{container_name, slot_name};
use crate::registry::PendingContainer;
use crate::scope::ParamCollector;
use crate::CacheOptions;

/// Finalize every pending container and append it to `program.containers`.
pub fn finalize_containers(
    program: &mut Program,
    pending: Vec<PendingContainer>,
    options: &CacheOptions,
) {
    // Function-scoped containers already created per outermost function.
    let mut generations: FxHashMap<FuncId, u32> = FxHashMap::default();

    for container in pending {
        let sources = match container.anchor {
            ScopeAnchor::Type(_) => SmallVec::new(),
            ScopeAnchor::Func(anchor) => container_params(program, anchor, &container.params),
        };

        // Allocate container parameters first so constraints can refer to
        // any of them.
        let mut subst = Substitution::new();
        let mut type_params = Vec::with_capacity(sources.len());
        for &source in &sources {
            let name = program.type_param(source).name;
            let param = program.add_type_param(TypeParamDef {
                name,
                owner: ParamOwner::Container(container.id),
                constraints: Vec::new(),
            });
            subst.insert(source, program.pool.param(param));
            type_params.push(param);
        }
        for (&source, &param) in sources.iter().zip(&type_params) {
            let constraints: Vec<Constraint> = program
                .type_param(source)
                .constraints
                .iter()
                .map(|constraint| match *constraint {
                    Constraint::Type(ty) => Constraint::Type(subst.apply(&program.pool, ty)),
                    other => other,
                })
                .collect();
            program.type_params[param.index()].constraints = constraints;
        }

        let slots: Vec<CacheSlot> = container
            .slots
            .iter()
            .zip(0u32..)
            .map(|(slot, ordinal)| CacheSlot {
                ordinal,
                name: if options.synthesize_names {
                    program.interner.intern(&slot_name(program, ordinal, slot.func))
                } else {
                    Name::EMPTY
                },
                func: slot.func,
                func_args: subst.apply_all(&program.pool, &slot.type_args),
                storage: subst.apply(&program.pool, slot.callable),
            })
            .collect();

        let name = if options.synthesize_names {
            let generation = match container.anchor {
                ScopeAnchor::Type(_) => 0,
                ScopeAnchor::Func(anchor) => {
                    let counter = generations.entry(program.outermost_func(anchor)).or_default();
                    let generation = *counter;
                    *counter += 1;
                    generation
                }
            };
            program
                .interner
                .intern(&container_name(program, container.anchor, generation))
        } else {
            Name::EMPTY
        };

        tracing::debug!(
            container = container.id.raw(),
            name = program.name(name),
            arity = type_params.len(),
            slots = slots.len(),
            "synthesized cache container",
        );

        program.containers.push(CacheContainer {
            id: container.id,
            name,
            anchor: container.anchor,
            owner: container.owner,
            type_params,
            param_sources: sources.to_vec(),
            slots,
        });
    }
}

/// The parameters a function-scoped container is generic over: the
/// referenced function-owned parameters, closed over the parameters their
/// constraints mention, in declaration order of `anchor`'s environment.
fn container_params(
    program: &Program,
    anchor: FuncId,
    referenced: &[TypeParamId],
) -> SmallVec<[TypeParamId; 4]> {
    let mut selected: SmallVec<[TypeParamId; 4]> = referenced.iter().copied().collect();

    let mut next = 0;
    while next < selected.len() {
        let param = selected[next];
        next += 1;
        for constraint in &program.type_param(param).constraints {
            let Constraint::Type(ty) = *constraint else {
                continue;
            };
            let mut collector = ParamCollector {
                pool: &program.pool,
                found: SmallVec::new(),
            };
            collector.visit(ty);
            for dep in collector.found {
                let func_owned = matches!(program.type_param(dep).owner, ParamOwner::Func(_));
                if func_owned && !selected.contains(&dep) {
                    selected.push(dep);
                }
            }
        }
    }

    let env = program.func_env(anchor);
    selected.sort_by_key(|param| env.iter().position(|p| p == param).unwrap_or(usize::MAX));
    selected
}
