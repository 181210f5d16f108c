//! Tree-walking evaluator.
//!
//! Evaluates bound expressions directly over the program's arena. Generic
//! code runs under a substitution from every in-scope type parameter to a
//! concrete type, so static fields and cache slots resolve to the storage
//! of the concrete instantiation.

use std::rc::Rc;

use callcache_ir::{
    ContainerId, ExprId, ExprKind, FuncId, FuncKind, FuncRef, Program, SlotRef, Substitution,
    TypeData, TypeId,
};

use crate::env::Env;
use crate::storage::{SlotStorage, StaticFields};
use crate::value::{Callable, Captured, Object};
use crate::{EvalError, EvalResult, Value};

/// Evaluation context of one function activation.
#[derive(Clone)]
struct Frame {
    env: Env,
    this: Option<Value>,
    subst: Rc<Substitution>,
}

impl Frame {
    fn empty(subst: Substitution) -> Self {
        Self {
            env: Env::new(),
            this: None,
            subst: Rc::new(subst),
        }
    }
}

/// Reference evaluator over a (lowered or unlowered) [`Program`].
pub struct Evaluator<'p> {
    program: &'p Program,
    statics: StaticFields,
    slots: SlotStorage,
    depth: usize,
    max_depth: usize,
    constructed: usize,
}

impl<'p> Evaluator<'p> {
    /// Default limit on nested calls.
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            statics: StaticFields::default(),
            slots: SlotStorage::default(),
            depth: 0,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            constructed: 0,
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = limit;
        self
    }

    /// Number of callable values constructed so far.
    pub fn callables_constructed(&self) -> usize {
        self.constructed
    }

    /// Number of cache slots filled so far, across instantiations.
    pub fn filled_slots(&self) -> usize {
        self.slots.filled()
    }

    /// Current value of a cache slot for a concrete instantiation.
    pub fn slot_value(&self, container: ContainerId, inst: &[TypeId], index: u32) -> Option<&Value> {
        self.slots.get(container, inst, index)
    }

    // Entry points

    /// Call a function that takes no receiver. `type_args` are concrete
    /// arguments for the function's generic environment.
    pub fn call(&mut self, func: FuncId, type_args: &[TypeId], args: Vec<Value>) -> EvalResult {
        self.call_function(func, type_args.into(), None, None, args)
    }

    /// Call an instance method on `receiver`.
    pub fn call_method(
        &mut self,
        receiver: Value,
        func: FuncId,
        type_args: &[TypeId],
        args: Vec<Value>,
    ) -> EvalResult {
        self.call_function(func, type_args.into(), Some(receiver), None, args)
    }

    /// Invoke a callable value.
    pub fn invoke(&mut self, callee: &Value, args: Vec<Value>) -> EvalResult {
        let Value::Callable(callable) = callee else {
            return Err(match callee {
                Value::Quoted(expr) => EvalError::QuotedInvoke { expr: *expr },
                other => EvalError::NotCallable {
                    found: other.kind_name(),
                },
            });
        };

        match &**callable {
            Callable::Func {
                func,
                type_args,
                receiver,
                captured,
            } => self.call_function(
                *func,
                type_args.clone(),
                receiver.clone(),
                captured.clone(),
                args,
            ),
            Callable::Lambda {
                params,
                body,
                env,
                this,
                subst,
            } => {
                if params.len() != args.len() {
                    return Err(EvalError::ArityMismatch {
                        expected: params.len(),
                        found: args.len(),
                    });
                }
                let mut env = env.clone();
                for (&name, value) in params.iter().zip(args) {
                    env = env.bind(name, value);
                }
                let frame = Frame {
                    env,
                    this: this.clone(),
                    subst: Rc::clone(subst),
                };
                self.enter()?;
                let result = self.eval(&frame, *body);
                self.depth -= 1;
                result
            }
        }
    }

    /// Read a static field of a concrete type, running its initializers
    /// first.
    pub fn read_static(&mut self, owner: TypeId, field: &str) -> EvalResult {
        let field = self.program.interner.intern(field);
        self.ensure_initialized(owner)?;
        self.statics
            .get(owner, field)
            .cloned()
            .ok_or_else(|| EvalError::UninitializedStatic {
                field: self.program.name(field).to_owned(),
            })
    }

    // Calls

    fn call_function(
        &mut self,
        func: FuncId,
        type_args: Box<[TypeId]>,
        receiver: Option<Value>,
        captured: Option<Captured>,
        args: Vec<Value>,
    ) -> EvalResult {
        let program = self.program;
        let def = program.func(func);
        let func_name = || program.name(def.name).to_owned();
        let Some(body) = def.body else {
            return Err(EvalError::MissingBody { func: func_name() });
        };

        let env_params = program.func_env(func);
        let subst = Substitution::from_pairs(&env_params, &type_args).ok_or(
            EvalError::ArityMismatch {
                expected: env_params.len(),
                found: type_args.len(),
            },
        )?;

        let (this, args) = match def.kind {
            FuncKind::Instance => match receiver {
                Some(receiver) => (Some(receiver), args),
                None => return Err(EvalError::MissingReceiver { func: func_name() }),
            },
            // A bound extension method receives its receiver as the first
            // argument.
            FuncKind::Extension => match receiver {
                Some(receiver) => {
                    let mut all = Vec::with_capacity(args.len() + 1);
                    all.push(receiver);
                    all.extend(args);
                    (None, all)
                }
                None => (None, args),
            },
            FuncKind::Static | FuncKind::StaticConstructor | FuncKind::Local { .. } => {
                (captured.as_ref().and_then(|c| c.this.clone()), args)
            }
        };

        if def.params.len() != args.len() {
            return Err(EvalError::ArityMismatch {
                expected: def.params.len(),
                found: args.len(),
            });
        }

        let mut env = captured.map(|c| c.env).unwrap_or_default();
        for (&name, value) in def.params.iter().zip(args) {
            env = env.bind(name, value);
        }
        let frame = Frame {
            env,
            this,
            subst: Rc::new(subst),
        };

        self.enter()?;
        let result = self.eval(&frame, body);
        self.depth -= 1;
        result
    }

    fn enter(&mut self) -> Result<(), EvalError> {
        if self.depth >= self.max_depth {
            return Err(EvalError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    // Expressions

    fn eval(&mut self, frame: &Frame, id: ExprId) -> EvalResult {
        let program = self.program;
        match program.arena.kind(id) {
            ExprKind::Unit => Ok(Value::Unit),
            ExprKind::Int(value) => Ok(Value::Int(*value)),
            ExprKind::Bool(value) => Ok(Value::Bool(*value)),
            ExprKind::Str(name) => Ok(Value::Str(*name)),
            ExprKind::Local(name) => {
                frame
                    .env
                    .lookup(*name)
                    .cloned()
                    .ok_or_else(|| EvalError::UnboundLocal {
                        name: program.name(*name).to_owned(),
                    })
            }
            ExprKind::Let { init, .. } => {
                // Only meaningful inside a block; the binding is dropped.
                self.eval(frame, *init)?;
                Ok(Value::Unit)
            }
            ExprKind::Block(range) => {
                let mut scope = frame.clone();
                let mut last = Value::Unit;
                for &stmt in program.arena.list(*range) {
                    if let ExprKind::Let { name, init } = program.arena.kind(stmt) {
                        let value = self.eval(&scope, *init)?;
                        scope.env = scope.env.bind(*name, value);
                        last = Value::Unit;
                    } else {
                        last = self.eval(&scope, stmt)?;
                    }
                }
                Ok(last)
            }
            ExprKind::New(ty) => Ok(Value::Object(Rc::new(Object {
                ty: self.concrete(frame, *ty),
            }))),
            ExprKind::FuncRef(func_ref) => self.build_callable(frame, func_ref),
            ExprKind::Convert { source, .. } => match program.arena.kind(*source) {
                ExprKind::FuncRef(func_ref) => self.build_callable(frame, func_ref),
                _ => self.eval(frame, *source),
            },
            ExprKind::CacheOrInit { slot, init } => self.eval_cached(frame, id, slot, *init),
            ExprKind::Call { target, args } => {
                let parts = self.build_parts(frame, target)?;
                let args = self.eval_list(frame, program.arena.list(*args))?;
                self.call_function(
                    target.func,
                    parts.type_args,
                    parts.receiver,
                    parts.captured,
                    args,
                )
            }
            ExprKind::Invoke { callee, args } => {
                let callee = self.eval(frame, *callee)?;
                let args = self.eval_list(frame, program.arena.list(*args))?;
                self.invoke(&callee, args)
            }
            ExprKind::Lambda { params, body } => {
                self.constructed += 1;
                Ok(Value::Callable(Rc::new(Callable::Lambda {
                    params: params.clone(),
                    body: *body,
                    env: frame.env.clone(),
                    this: frame.this.clone(),
                    subst: Rc::clone(&frame.subst),
                })))
            }
            ExprKind::Quote(inner) => Ok(Value::Quoted(*inner)),
            ExprKind::AssignStatic {
                owner,
                field,
                value,
            } => {
                let owner = self.concrete(frame, *owner);
                self.ensure_initialized(owner)?;
                let value = self.eval(frame, *value)?;
                self.statics.set(owner, *field, value);
                Ok(Value::Unit)
            }
            ExprKind::StaticField { owner, field } => {
                let owner = self.concrete(frame, *owner);
                self.ensure_initialized(owner)?;
                self.statics
                    .get(owner, *field)
                    .cloned()
                    .ok_or_else(|| EvalError::UninitializedStatic {
                        field: program.name(*field).to_owned(),
                    })
            }
            ExprKind::RefEq(lhs, rhs) => {
                let lhs = self.eval(frame, *lhs)?;
                let rhs = self.eval(frame, *rhs)?;
                Ok(Value::Bool(lhs.ref_eq(&rhs)))
            }
            ExprKind::Cond {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond = self.eval(frame, *cond)?;
                match cond.as_bool() {
                    Some(true) => self.eval(frame, *then_branch),
                    Some(false) => self.eval(frame, *else_branch),
                    None => Err(EvalError::TypeMismatch {
                        expected: "bool",
                        found: cond.kind_name(),
                    }),
                }
            }
        }
    }

    fn eval_list(&mut self, frame: &Frame, ids: &[ExprId]) -> Result<Vec<Value>, EvalError> {
        ids.iter().map(|&id| self.eval(frame, id)).collect()
    }

    /// Read-or-populate a cache slot.
    fn eval_cached(
        &mut self,
        frame: &Frame,
        id: ExprId,
        slot: &SlotRef,
        init: ExprId,
    ) -> EvalResult {
        let program = self.program;
        let Some(container) = program.containers.get(slot.container.index()) else {
            return Err(EvalError::DanglingSlot { expr: id });
        };
        if container.slot(slot.index).is_none() {
            return Err(EvalError::DanglingSlot { expr: id });
        }

        let mut inst: Vec<TypeId> = program
            .type_env(container.owner)
            .into_iter()
            .map(|param| self.concrete(frame, program.pool.param(param)))
            .collect();
        inst.extend(slot.type_args.iter().map(|&ty| self.concrete(frame, ty)));

        if let Some(value) = self.slots.get(container.id, &inst, slot.index) {
            return Ok(value.clone());
        }

        let value = self.eval(frame, init)?;
        tracing::trace!(
            container = container.id.raw(),
            slot = slot.index,
            "filled cache slot"
        );
        let stored = self.slots.set(
            container.id,
            inst.into_boxed_slice(),
            slot.index,
            container.slots.len(),
            value.clone(),
        );
        if !stored {
            return Err(EvalError::DanglingSlot { expr: id });
        }
        Ok(value)
    }

    /// Construct a fresh callable from a function reference.
    fn build_callable(&mut self, frame: &Frame, func_ref: &FuncRef) -> EvalResult {
        let parts = self.build_parts(frame, func_ref)?;
        self.constructed += 1;
        Ok(Value::Callable(Rc::new(Callable::Func {
            func: func_ref.func,
            type_args: parts.type_args,
            receiver: parts.receiver,
            captured: parts.captured,
        })))
    }

    /// Resolve the receiver, captures and concrete type arguments of a
    /// function reference.
    fn build_parts(
        &mut self,
        frame: &Frame,
        func_ref: &FuncRef,
    ) -> Result<CalleeParts, EvalError> {
        let kind = self.program.func(func_ref.func).kind;
        let receiver = match func_ref.receiver {
            Some(expr) => Some(self.eval(frame, expr)?),
            None if kind == FuncKind::Instance => frame.this.clone(),
            None => None,
        };
        let captured = matches!(kind, FuncKind::Local { is_static: false }).then(|| Captured {
            env: frame.env.clone(),
            this: frame.this.clone(),
        });
        let type_args = func_ref
            .type_args
            .iter()
            .map(|&ty| self.concrete(frame, ty))
            .collect();
        Ok(CalleeParts {
            type_args,
            receiver,
            captured,
        })
    }

    fn concrete(&self, frame: &Frame, ty: TypeId) -> TypeId {
        frame.subst.apply(&self.program.pool, ty)
    }

    /// Run the static-field initializers, then the static constructors, of a
    /// concrete type once.
    fn ensure_initialized(&mut self, owner: TypeId) -> Result<(), EvalError> {
        let program = self.program;
        let TypeData::Named { def, args } = program.pool.lookup(owner) else {
            return Ok(());
        };
        if !self.statics.begin_init(owner) {
            return Ok(());
        }

        let subst = Substitution::from_pairs(&program.type_env(def), &args).ok_or(
            EvalError::ArityMismatch {
                expected: program.type_env(def).len(),
                found: args.len(),
            },
        )?;
        let frame = Frame::empty(subst);
        for field in &program.type_def(def).statics {
            if let Some(init) = field.init {
                let value = self.eval(&frame, init)?;
                self.statics.set(owner, field.name, value);
            }
        }
        for cctor in program.static_constructors(def) {
            self.call_function(cctor, args.clone(), None, None, Vec::new())?;
        }
        Ok(())
    }
}

struct CalleeParts {
    type_args: Box<[TypeId]>,
    receiver: Option<Value>,
    captured: Option<Captured>,
}
