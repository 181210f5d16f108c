//! Callable-conversion caching driver.
//!
//! Bundles the lowering pass, its post-pass validation and the reference
//! evaluator behind one [`Session`], and re-exports the pieces an embedding
//! compiler needs.
//!
//! # Usage
//!
//! ```ignore
//! use callcache::{CacheOptions, Session};
//!
//! let session = Session::new(CacheOptions::default());
//! let stats = session.compile(&mut program)?;
//! println!("{}", callcache::render_layout(&program));
//! ```
//!
//! # Architecture
//!
//! ```text
//! callcache_ir  →  callcache_lower  →  callcache_eval
//!                        ↓
//!                    callcache  ← this crate
//! ```

mod error;
mod layout;
mod session;

use std::sync::Once;

pub use callcache_eval::{Callable, EvalError, EvalResult, Evaluator, Value};
pub use callcache_ir::{Program, ProgramBuilder};
pub use callcache_lower::validate::Violation;
pub use callcache_lower::{
    lower_program, CacheOptions, Ineligible, LanguageVersion, LowerError, LowerStats,
};
pub use error::CompileError;
pub use layout::render_layout;
pub use session::Session;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for pass diagnostics.
///
/// Safe to call multiple times. Enable with `RUST_LOG=callcache_lower=debug`
/// (per-container and summary events) or `=trace` (per-site decisions).
/// Setting `CALLCACHE_LOG_TREE` switches to indented, hierarchical output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        let registry = tracing_subscriber::registry().with(filter);
        // A test harness may already own the global default.
        let _ = if std::env::var_os("CALLCACHE_LOG_TREE").is_some() {
            registry
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .try_init()
        } else {
            registry
                .with(fmt::layer().with_target(true).with_level(true))
                .try_init()
        };
    });
}
