//! Index newtypes for the bound IR.
//!
//! Every symbol table and arena is a flat `Vec` indexed by one of these
//! 32-bit handles. Handles from different tables are distinct types.

use std::fmt;

macro_rules! define_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create from a raw index.
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw `u32` value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Get the index as `usize` (for indexing into `Vec`s).
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

define_index!(
    /// A declared type (class, struct, static class or callable type).
    TypeDefId
);

define_index!(
    /// A declared function: method, extension method or local function.
    FuncId
);

define_index!(
    /// A generic type parameter, owned by a type, a function, or a
    /// synthesized cache container.
    TypeParamId
);

define_index!(
    /// An expression node in the [`ExprArena`](crate::ExprArena).
    ExprId
);

define_index!(
    /// A synthesized cache container in [`Program::containers`](crate::Program).
    ContainerId
);

define_index!(
    /// An interned type in the [`TypePool`](crate::TypePool).
    TypeId
);

/// Convert a table length into a 32-bit handle value.
///
/// # Panics
/// Panics if the table has grown past `u32::MAX` entries.
#[inline]
pub(crate) fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("too many {what}: {len} exceeds u32::MAX"))
}
