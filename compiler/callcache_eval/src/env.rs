//! Persistent local environments.
//!
//! An environment is an immutable linked list of bindings. Extending it is
//! O(1) and leaves the original untouched, so closures capture their
//! defining environment by cloning an `Rc`.

use std::rc::Rc;

use callcache_ir::Name;

use crate::Value;

struct Binding {
    name: Name,
    value: Value,
    next: Option<Rc<Binding>>,
}

/// Local variable bindings, innermost first.
#[derive(Clone, Default)]
pub struct Env {
    head: Option<Rc<Binding>>,
}

impl Env {
    /// The empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// A new environment with `name` bound to `value`, shadowing any outer
    /// binding of the same name.
    #[must_use]
    pub fn bind(&self, name: Name, value: Value) -> Env {
        Env {
            head: Some(Rc::new(Binding {
                name,
                value,
                next: self.head.clone(),
            })),
        }
    }

    /// Look up the innermost binding of `name`.
    pub fn lookup(&self, name: Name) -> Option<&Value> {
        let mut current = self.head.as_deref();
        while let Some(binding) = current {
            if binding.name == name {
                return Some(&binding.value);
            }
            current = binding.next.as_deref();
        }
        None
    }
}
