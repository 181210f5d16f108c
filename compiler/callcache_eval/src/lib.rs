//! Reference evaluator for the bound IR.
//!
//! Runs a [`Program`](callcache_ir::Program) before or after conversion
//! caching so the two can be compared: results must agree, while the
//! identity of callables built at a cached site differs (one shared
//! instance per instantiation instead of a fresh one per evaluation).
//!
//! # Storage Model
//!
//! - Locals live in a persistent [`Env`]; closures keep it alive.
//! - Static fields are stored per concrete owner type and initialized
//!   lazily on first access.
//! - Cache slots are stored per container and concrete instantiation,
//!   filled on first read.

mod env;
mod error;
mod interpreter;
mod storage;
mod value;

pub use env::Env;
pub use error::{EvalError, EvalResult};
pub use interpreter::Evaluator;
pub use storage::Instantiation;
pub use value::{Callable, Captured, Object, Value};
