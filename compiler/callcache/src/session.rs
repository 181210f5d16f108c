//! Compilation session: options plus the lower → validate pipeline.

use callcache_ir::Program;
use callcache_lower::{lower_program, validate, CacheOptions, LowerStats};

use crate::CompileError;

/// One configured run of the caching pipeline.
#[derive(Clone, Debug, Default)]
pub struct Session {
    options: CacheOptions,
}

impl Session {
    pub fn new(options: CacheOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// Lower `program` and check the result.
    ///
    /// On [`CompileError::Internal`] the program is left untouched. On
    /// [`CompileError::Validation`] it has been rewritten and must be
    /// discarded.
    pub fn compile(&self, program: &mut Program) -> Result<LowerStats, CompileError> {
        let stats = lower_program(program, &self.options)?;

        let violations = validate::check(program);
        if !violations.is_empty() {
            tracing::error!(
                violations = violations.len(),
                "conversion caching broke a layout invariant",
            );
            return Err(CompileError::Validation(violations));
        }

        Ok(stats)
    }
}
