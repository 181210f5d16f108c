//! Pass configuration.

/// Source language version the program was compiled for.
///
/// Conversion caching is a behavior change (callable values become
/// reference-equal across evaluations), so it is only enabled for language
/// versions that specify it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LanguageVersion {
    V10,
    V11,
    #[default]
    Latest,
}

impl LanguageVersion {
    /// Returns `true` if this version caches function-reference conversions.
    pub fn caches_conversions(self) -> bool {
        self >= LanguageVersion::V11
    }
}

/// Configuration for [`lower_program`](crate::lower_program).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheOptions {
    /// Master switch. When `false`, every site is left uncached.
    pub enabled: bool,
    pub language_version: LanguageVersion,
    /// Collect conversion sites across functions in parallel.
    pub parallel_collect: bool,
    /// Assign emitter-facing names to containers and slots.
    pub synthesize_names: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            language_version: LanguageVersion::default(),
            parallel_collect: false,
            synthesize_names: true,
        }
    }
}

impl CacheOptions {
    /// Options with caching turned off (the unoptimized baseline).
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_language_version(mut self, version: LanguageVersion) -> Self {
        self.language_version = version;
        self
    }

    #[must_use]
    pub fn with_parallel_collect(mut self, parallel: bool) -> Self {
        self.parallel_collect = parallel;
        self
    }

    #[must_use]
    pub fn with_synthesize_names(mut self, synthesize: bool) -> Self {
        self.synthesize_names = synthesize;
        self
    }

    /// Returns `true` if any site may be cached under these options.
    pub fn caching_active(&self) -> bool {
        self.enabled && self.language_version.caches_conversions()
    }
}
