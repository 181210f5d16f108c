//! Per-compilation lowering state.
//!
//! [`LoweringContext`] owns the key interner and the container registry for
//! one run of the pass. Nothing outlives the run except what
//! [`LoweringContext::finish`] writes into the program.

use callcache_ir::{ContainerId, Program, ScopeAnchor};

use crate::eligibility::{check_site, Eligibility, Ineligible};
use crate::emit::rewrite_site;
use crate::key::{canonical_key, KeyInterner};
use crate::layout::finalize_containers;
use crate::registry::ContainerRegistry;
use crate::scope::resolve_scope;
use crate::{CacheOptions, ConversionSite, LowerError};

/// Counters reported by a run of the pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LowerStats {
    /// Conversion sites visited.
    pub sites: usize,
    /// Sites rewritten to read a cache slot.
    pub cached: usize,
    /// Containers synthesized.
    pub containers: usize,
    /// Slots synthesized.
    pub slots: usize,
    skipped: [usize; Ineligible::COUNT],
}

impl LowerStats {
    /// Sites left uncached for `reason`.
    pub fn skipped(&self, reason: Ineligible) -> usize {
        self.skipped[reason.index()]
    }

    /// Sites left uncached for any reason.
    pub fn total_skipped(&self) -> usize {
        self.skipped.iter().sum()
    }
}

/// A site assigned to a slot, waiting for the rewrite phase.
struct Assignment {
    site: ConversionSite,
    container: ContainerId,
    slot: u32,
}

/// State of one run of the caching pass.
pub struct LoweringContext<'o> {
    options: &'o CacheOptions,
    keys: KeyInterner,
    registry: ContainerRegistry,
    assignments: Vec<Assignment>,
    stats: LowerStats,
}

impl<'o> LoweringContext<'o> {
    /// Create a context for lowering `program`.
    pub fn new(program: &Program, options: &'o CacheOptions) -> Self {
        let base = u32::try_from(program.containers.len())
            .unwrap_or_else(|_| panic!("too many cache containers: {}", program.containers.len()));
        Self {
            options,
            keys: KeyInterner::new(),
            registry: ContainerRegistry::new(base),
            assignments: Vec::new(),
            stats: LowerStats::default(),
        }
    }

    /// Register one site (phase 2). Sites must be registered in source
    /// order.
    pub fn register(&mut self, program: &Program, site: ConversionSite) -> Result<(), LowerError> {
        self.stats.sites += 1;

        if let Eligibility::Ineligible(reason) = check_site(program, &site, self.options) {
            self.stats.skipped[reason.index()] += 1;
            tracing::trace!(
                span = ?site.span,
                reason = reason.as_str(),
                "conversion left uncached",
            );
            return Ok(());
        }

        let data = canonical_key(program, &site);
        let scope = resolve_scope(program, &site, &data)?;
        if program
            .containers
            .iter()
            .any(|container| container.anchor == scope.anchor)
        {
            return Err(LowerError::AnchorAlreadyLowered {
                anchor: scope.anchor,
                span: site.span,
            });
        }
        let owner = match scope.anchor {
            ScopeAnchor::Type(ty) => ty,
            ScopeAnchor::Func(func) => program.func(func).owner,
        };
        let key = self.keys.intern(data);
        let container = self.registry.container_for(scope.anchor, owner);
        let (slot, created) =
            self.registry
                .insert_slot(container, key, self.keys.get(key), &scope.func_params);

        tracing::trace!(
            span = ?site.span,
            container = container.raw(),
            slot,
            created,
            "conversion cached",
        );

        self.stats.cached += 1;
        self.assignments.push(Assignment {
            site,
            container,
            slot,
        });
        Ok(())
    }

    /// Finalize containers and rewrite every registered site (phases 3
    /// and 4).
    pub fn finish(self, program: &mut Program) -> LowerStats {
        let LoweringContext {
            options,
            registry,
            assignments,
            mut stats,
            ..
        } = self;

        stats.containers = registry.len();
        stats.slots = registry.slot_count();
        finalize_containers(program, registry.into_containers(), options);

        for assignment in &assignments {
            rewrite_site(program, &assignment.site, assignment.container, assignment.slot);
        }
        stats
    }
}
