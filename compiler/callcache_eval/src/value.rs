//! Run-time values.

use std::fmt;
use std::rc::Rc;

use callcache_ir::{ExprId, FuncId, Name, Substitution, TypeId};

use crate::env::Env;

/// A run-time value.
///
/// Objects and callables are heap values compared by identity; everything
/// else is compared by value.
#[derive(Clone)]
pub enum Value {
    Unit,
    Int(i64),
    Bool(bool),
    Str(Name),
    Object(Rc<Object>),
    Callable(Rc<Callable>),
    /// A quoted expression tree, reified as data.
    Quoted(ExprId),
}

impl Value {
    /// Short name of the value's kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
            Value::Callable(_) => "callable",
            Value::Quoted(_) => "expression tree",
        }
    }

    /// Reference equality: heap values by identity, others by value.
    pub fn ref_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Callable(a), Value::Callable(b)) => Rc::ptr_eq(a, b),
            (Value::Quoted(a), Value::Quoted(b)) => a == b,
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Str(name) => write!(f, "str({name:?})"),
            Value::Object(object) => write!(f, "object({:?} @ {:p})", object.ty, Rc::as_ptr(object)),
            Value::Callable(callable) => write!(f, "{:?} @ {:p}", callable, Rc::as_ptr(callable)),
            Value::Quoted(expr) => write!(f, "quote({expr:?})"),
        }
    }
}

/// An allocated instance.
#[derive(Debug)]
pub struct Object {
    /// Concrete type of the instance.
    pub ty: TypeId,
}

/// The part of a frame a closure keeps alive.
#[derive(Clone)]
pub struct Captured {
    pub env: Env,
    pub this: Option<Value>,
}

/// A first-class function value.
pub enum Callable {
    /// Built from a function reference.
    Func {
        func: FuncId,
        /// Concrete arguments for the function's generic environment.
        type_args: Box<[TypeId]>,
        /// Captured receiver (instance methods, bound extension methods).
        receiver: Option<Value>,
        /// Captured frame of a capturing local function.
        captured: Option<Captured>,
    },
    /// An anonymous function closing over its defining frame.
    Lambda {
        params: Box<[Name]>,
        body: ExprId,
        env: Env,
        this: Option<Value>,
        subst: Rc<Substitution>,
    },
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Func {
                func,
                type_args,
                receiver,
                ..
            } => f
                .debug_struct("Func")
                .field("func", func)
                .field("type_args", type_args)
                .field("bound", &receiver.is_some())
                .finish(),
            Callable::Lambda { params, body, .. } => f
                .debug_struct("Lambda")
                .field("params", &params.len())
                .field("body", body)
                .finish(),
        }
    }
}
