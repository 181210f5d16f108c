//! Eligibility filter.
//!
//! A conversion may be cached only if the callable it builds is a pure
//! function of the site's key: no receiver or closure object is captured,
//! the program did not ask for a fresh object, the value is not reified,
//! and the site does not run during static initialization, which already
//! executes once per type.

use callcache_ir::{ConversionOrigin, Program};

use crate::{CacheOptions, ConversionSite};

/// Why a site is left uncached.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ineligible {
    /// Caching is switched off, or the language version predates it.
    Disabled,
    /// The node is already the fill expression of a cache slot.
    AlreadyCached,
    /// `new Callable(F)`: explicit construction always allocates.
    ExplicitConstruction,
    /// Inside a quoted expression tree.
    QuotedContext,
    /// Inside a static-field initializer or a static constructor.
    StaticInitializer,
    /// A receiver expression is captured (`c.F`, `this.F`).
    BoundReceiver,
    /// The function needs a receiver or closure even without one written
    /// (instance methods, capturing local functions).
    CapturingFunction,
}

impl Ineligible {
    /// Number of variants.
    pub const COUNT: usize = 7;

    /// Every variant, in declaration order.
    pub const ALL: [Ineligible; Self::COUNT] = [
        Ineligible::Disabled,
        Ineligible::AlreadyCached,
        Ineligible::ExplicitConstruction,
        Ineligible::QuotedContext,
        Ineligible::StaticInitializer,
        Ineligible::BoundReceiver,
        Ineligible::CapturingFunction,
    ];

    /// Dense index, for per-reason counters.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Ineligible::Disabled => "disabled",
            Ineligible::AlreadyCached => "already-cached",
            Ineligible::ExplicitConstruction => "explicit-construction",
            Ineligible::QuotedContext => "quoted-context",
            Ineligible::StaticInitializer => "static-initializer",
            Ineligible::BoundReceiver => "bound-receiver",
            Ineligible::CapturingFunction => "capturing-function",
        }
    }
}

/// Outcome of the eligibility filter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    Ineligible(Ineligible),
}

impl Eligibility {
    pub fn is_eligible(self) -> bool {
        matches!(self, Eligibility::Eligible)
    }
}

/// Decide whether `site` may be cached. Has no side effects.
pub fn check_site(program: &Program, site: &ConversionSite, options: &CacheOptions) -> Eligibility {
    if !options.caching_active() {
        return Eligibility::Ineligible(Ineligible::Disabled);
    }

    match site.origin {
        ConversionOrigin::Implicit | ConversionOrigin::Explicit => {}
        ConversionOrigin::Construction => {
            return Eligibility::Ineligible(Ineligible::ExplicitConstruction)
        }
        ConversionOrigin::CacheFill => return Eligibility::Ineligible(Ineligible::AlreadyCached),
    }

    if site.quoted {
        return Eligibility::Ineligible(Ineligible::QuotedContext);
    }
    if site.static_init {
        return Eligibility::Ineligible(Ineligible::StaticInitializer);
    }

    // An extension method referenced through a receiver binds that
    // receiver as its first argument, so any written receiver disqualifies.
    if site.func_ref.receiver.is_some() {
        return Eligibility::Ineligible(Ineligible::BoundReceiver);
    }
    if program.func(site.func_ref.func).kind.needs_capture() {
        return Eligibility::Ineligible(Ineligible::CapturingFunction);
    }

    Eligibility::Eligible
}

#[cfg(test)]
mod tests;
