//! Programmatic construction of bound programs.
//!
//! `ProgramBuilder` stands in for the binder: it declares symbols and
//! allocates fully-resolved expressions. Every allocation receives a fresh,
//! strictly increasing span, so allocation order is source order.

use rustc_hash::FxHashMap;

use crate::{
    ConversionOrigin, Constraint, Expr, ExprId, ExprKind, FuncDef, FuncId, FuncKind, FuncRef,
    Name, ParamOwner, Program, SharedInterner, Span, StaticField, TypeDef, TypeDefId, TypeDefKind,
    TypeId, TypeParamDef, TypeParamId, TypePool,
};

/// Builder for [`Program`]s.
pub struct ProgramBuilder {
    program: Program,
    cursor: u32,
    /// Memoized `Action<...>` declarations by arity.
    actions: FxHashMap<usize, TypeDefId>,
    /// Memoized `Func<..., TResult>` declarations by parameter count.
    func_types: FxHashMap<usize, TypeDefId>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::with_interner(SharedInterner::new())
    }

    pub fn with_interner(interner: SharedInterner) -> Self {
        Self {
            program: Program::new(interner),
            cursor: 0,
            actions: FxHashMap::default(),
            func_types: FxHashMap::default(),
        }
    }

    /// Intern a name.
    pub fn name(&self, s: &str) -> Name {
        self.program.interner.intern(s)
    }

    pub fn pool(&self) -> &TypePool {
        &self.program.pool
    }

    /// The program built so far.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Finish building.
    pub fn finish(self) -> Program {
        self.program
    }

    fn next_span(&mut self) -> Span {
        let start = self.cursor;
        self.cursor += 1;
        Span::new(start, start + 1)
    }

    // Type declarations

    /// Declare a type.
    pub fn declare_type(
        &mut self,
        name: &str,
        parent: Option<TypeDefId>,
        kind: TypeDefKind,
    ) -> TypeDefId {
        let name = self.name(name);
        let span = self.next_span();
        let id = TypeDefId::new(crate::ids::to_u32(self.program.types.len(), "types"));
        self.program.types.push(TypeDef {
            name,
            parent,
            params: Vec::new(),
            kind,
            statics: Vec::new(),
            span,
        });
        id
    }

    /// Declare a top-level class.
    pub fn class(&mut self, name: &str) -> TypeDefId {
        self.declare_type(name, None, TypeDefKind::Class)
    }

    /// Declare a class nested in `parent`.
    pub fn nested_class(&mut self, parent: TypeDefId, name: &str) -> TypeDefId {
        self.declare_type(name, Some(parent), TypeDefKind::Class)
    }

    /// Declare a top-level struct.
    pub fn structure(&mut self, name: &str) -> TypeDefId {
        self.declare_type(name, None, TypeDefKind::Struct)
    }

    /// Declare a top-level static class.
    pub fn static_class(&mut self, name: &str) -> TypeDefId {
        self.declare_type(name, None, TypeDefKind::Static)
    }

    /// Declare a type parameter on a type.
    pub fn type_param(&mut self, def: TypeDefId, name: &str) -> TypeParamId {
        let param = self.new_param(ParamOwner::Type(def), name);
        self.program.types[def.index()].params.push(param);
        param
    }

    /// Declare a type parameter on a function.
    pub fn func_type_param(&mut self, func: FuncId, name: &str) -> TypeParamId {
        let param = self.new_param(ParamOwner::Func(func), name);
        self.program.funcs[func.index()].type_params.push(param);
        param
    }

    fn new_param(&mut self, owner: ParamOwner, name: &str) -> TypeParamId {
        let name = self.name(name);
        self.program.add_type_param(TypeParamDef {
            name,
            owner,
            constraints: Vec::new(),
        })
    }

    /// Add a constraint to a type parameter.
    pub fn constrain(&mut self, param: TypeParamId, constraint: Constraint) {
        self.program.type_params[param.index()]
            .constraints
            .push(constraint);
    }

    /// Declare a generic callable type; its signature is set afterwards
    /// with [`set_signature`](Self::set_signature).
    pub fn callable(
        &mut self,
        name: &str,
        parent: Option<TypeDefId>,
        type_params: &[&str],
    ) -> (TypeDefId, Vec<TypeId>) {
        let def = self.declare_type(
            name,
            parent,
            TypeDefKind::Callable {
                params: Box::default(),
                ret: TypeId::UNIT,
            },
        );
        let params = type_params
            .iter()
            .map(|param| {
                let id = self.type_param(def, param);
                self.program.pool.param(id)
            })
            .collect();
        (def, params)
    }

    /// Set the signature of a declared callable type.
    pub fn set_signature(&mut self, def: TypeDefId, params: &[TypeId], ret: TypeId) {
        self.program.types[def.index()].kind = TypeDefKind::Callable {
            params: params.into(),
            ret,
        };
    }

    /// `Action<T1, ..., Tn>`: takes `n` arguments, returns unit.
    pub fn action(&mut self, arity: usize) -> TypeDefId {
        if let Some(&def) = self.actions.get(&arity) {
            return def;
        }
        let names: Vec<String> = (1..=arity).map(|idx| format!("T{idx}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let (def, params) = self.callable("Action", None, &names);
        self.set_signature(def, &params, TypeId::UNIT);
        self.actions.insert(arity, def);
        def
    }

    /// `Func<T1, ..., Tn, TResult>`: takes `n` arguments, returns `TResult`.
    pub fn func_type(&mut self, arity: usize) -> TypeDefId {
        if let Some(&def) = self.func_types.get(&arity) {
            return def;
        }
        let mut names: Vec<String> = (1..=arity).map(|idx| format!("T{idx}")).collect();
        names.push("TResult".to_owned());
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let (def, params) = self.callable("Func", None, &names);
        if let Some((&ret, args)) = params.split_last() {
            self.set_signature(def, args, ret);
        }
        self.func_types.insert(arity, def);
        def
    }

    /// Instantiate `Action<args...>`.
    pub fn action_of(&mut self, args: &[TypeId]) -> TypeId {
        let def = self.action(args.len());
        self.program.pool.named(def, args)
    }

    /// Instantiate `Func<args..., ret>`.
    pub fn func_of(&mut self, args: &[TypeId], ret: TypeId) -> TypeId {
        let def = self.func_type(args.len());
        let mut all = args.to_vec();
        all.push(ret);
        self.program.pool.named(def, all)
    }

    /// Add a static field to a type.
    pub fn static_field(&mut self, owner: TypeDefId, name: &str, ty: TypeId, init: Option<ExprId>) {
        let name = self.name(name);
        self.program.types[owner.index()]
            .statics
            .push(StaticField { name, ty, init });
    }

    // Function declarations

    /// Declare a function of `owner`.
    pub fn method(&mut self, owner: TypeDefId, name: &str, kind: FuncKind, params: &[&str]) -> FuncId {
        self.declare_func(owner, None, name, kind, params)
    }

    /// Declare a parameterless static method.
    pub fn static_method(&mut self, owner: TypeDefId, name: &str) -> FuncId {
        self.method(owner, name, FuncKind::Static, &[])
    }

    /// Declare a parameterless instance method.
    pub fn instance_method(&mut self, owner: TypeDefId, name: &str) -> FuncId {
        self.method(owner, name, FuncKind::Instance, &[])
    }

    /// Declare the static constructor of `owner`.
    pub fn static_constructor(&mut self, owner: TypeDefId) -> FuncId {
        self.method(owner, ".cctor", FuncKind::StaticConstructor, &[])
    }

    /// Declare a local function inside `parent`.
    pub fn local_function(&mut self, parent: FuncId, name: &str, is_static: bool, params: &[&str]) -> FuncId {
        let owner = self.program.func(parent).owner;
        self.declare_func(owner, Some(parent), name, FuncKind::Local { is_static }, params)
    }

    fn declare_func(
        &mut self,
        owner: TypeDefId,
        parent: Option<FuncId>,
        name: &str,
        kind: FuncKind,
        params: &[&str],
    ) -> FuncId {
        let name = self.name(name);
        let params = params.iter().map(|param| self.name(param)).collect();
        let span = self.next_span();
        let id = FuncId::new(crate::ids::to_u32(self.program.funcs.len(), "functions"));
        self.program.funcs.push(FuncDef {
            name,
            owner,
            parent,
            type_params: Vec::new(),
            params,
            kind,
            body: None,
            span,
        });
        id
    }

    /// Set a function's body.
    pub fn set_body(&mut self, func: FuncId, body: ExprId) {
        self.program.funcs[func.index()].body = Some(body);
    }

    // Type helpers

    /// The type of a type parameter.
    pub fn param_ty(&self, param: TypeParamId) -> TypeId {
        self.program.pool.param(param)
    }

    /// Instantiate a declared type.
    pub fn instance(&self, def: TypeDefId, args: &[TypeId]) -> TypeId {
        self.program.pool.named(def, args)
    }

    /// `def` instantiated over its own parameters.
    pub fn self_type(&self, def: TypeDefId) -> TypeId {
        self.program.self_type(def)
    }

    /// Type arguments that reference `func` from inside its own generic
    /// environment (each parameter mapped to itself).
    pub fn identity_args(&self, func: FuncId) -> Vec<TypeId> {
        self.program
            .func_env(func)
            .into_iter()
            .map(|param| self.program.pool.param(param))
            .collect()
    }

    // Expressions

    /// Allocate an expression with a fresh span.
    pub fn expr(&mut self, kind: ExprKind, ty: TypeId) -> ExprId {
        let span = self.next_span();
        self.program.arena.alloc(Expr::new(kind, span, ty))
    }

    pub fn unit(&mut self) -> ExprId {
        self.expr(ExprKind::Unit, TypeId::UNIT)
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        self.expr(ExprKind::Int(value), TypeId::INT)
    }

    pub fn boolean(&mut self, value: bool) -> ExprId {
        self.expr(ExprKind::Bool(value), TypeId::BOOL)
    }

    pub fn string(&mut self, value: &str) -> ExprId {
        let name = self.name(value);
        self.expr(ExprKind::Str(name), TypeId::STR)
    }

    pub fn local(&mut self, name: &str, ty: TypeId) -> ExprId {
        let name = self.name(name);
        self.expr(ExprKind::Local(name), ty)
    }

    pub fn let_(&mut self, name: &str, init: ExprId) -> ExprId {
        let name = self.name(name);
        self.expr(ExprKind::Let { name, init }, TypeId::UNIT)
    }

    pub fn block(&mut self, stmts: &[ExprId]) -> ExprId {
        let ty = stmts
            .last()
            .map_or(TypeId::UNIT, |&last| self.program.arena.ty(last));
        let range = self.program.arena.alloc_list(stmts.iter().copied());
        self.expr(ExprKind::Block(range), ty)
    }

    /// Allocate an instance of `ty`.
    pub fn new_object(&mut self, ty: TypeId) -> ExprId {
        self.expr(ExprKind::New(ty), ty)
    }

    /// Unbound reference to `func`.
    pub fn func_ref(&mut self, func: FuncId, type_args: &[TypeId]) -> ExprId {
        self.func_ref_with(func, type_args, None)
    }

    /// Reference to `func` through a receiver expression (`c.Target`).
    pub fn bound_func_ref(&mut self, func: FuncId, type_args: &[TypeId], receiver: ExprId) -> ExprId {
        self.func_ref_with(func, type_args, Some(receiver))
    }

    fn func_ref_with(&mut self, func: FuncId, type_args: &[TypeId], receiver: Option<ExprId>) -> ExprId {
        self.expr(
            ExprKind::FuncRef(FuncRef {
                func,
                type_args: type_args.into(),
                receiver,
            }),
            TypeId::UNIT,
        )
    }

    /// Conversion of `source` to `target` with the given syntax.
    pub fn conversion(&mut self, source: ExprId, target: TypeId, origin: ConversionOrigin) -> ExprId {
        self.expr(
            ExprKind::Convert {
                source,
                target,
                origin,
            },
            target,
        )
    }

    /// Target-typed conversion.
    pub fn convert(&mut self, source: ExprId, target: TypeId) -> ExprId {
        self.conversion(source, target, ConversionOrigin::Implicit)
    }

    /// Cast conversion.
    pub fn cast(&mut self, source: ExprId, target: TypeId) -> ExprId {
        self.conversion(source, target, ConversionOrigin::Explicit)
    }

    /// Explicit construction of a callable.
    pub fn construct(&mut self, source: ExprId, target: TypeId) -> ExprId {
        self.conversion(source, target, ConversionOrigin::Construction)
    }

    /// Shorthand: implicit conversion of an unbound reference to `func`.
    pub fn convert_func(&mut self, func: FuncId, type_args: &[TypeId], target: TypeId) -> ExprId {
        let source = self.func_ref(func, type_args);
        self.convert(source, target)
    }

    /// Direct call of a static or local function.
    pub fn call(&mut self, func: FuncId, type_args: &[TypeId], args: &[ExprId]) -> ExprId {
        self.call_with(func, type_args, None, args)
    }

    /// Direct call through a receiver.
    pub fn call_on(&mut self, receiver: ExprId, func: FuncId, type_args: &[TypeId], args: &[ExprId]) -> ExprId {
        self.call_with(func, type_args, Some(receiver), args)
    }

    fn call_with(
        &mut self,
        func: FuncId,
        type_args: &[TypeId],
        receiver: Option<ExprId>,
        args: &[ExprId],
    ) -> ExprId {
        let args = self.program.arena.alloc_list(args.iter().copied());
        let target = FuncRef {
            func,
            type_args: type_args.into(),
            receiver,
        };
        self.expr(ExprKind::Call { target, args }, TypeId::OBJECT)
    }

    /// Invoke a callable value.
    pub fn invoke(&mut self, callee: ExprId, args: &[ExprId]) -> ExprId {
        let ty = self
            .program
            .callable_signature(self.program.arena.ty(callee))
            .map_or(TypeId::OBJECT, |(_, ret)| ret);
        let args = self.program.arena.alloc_list(args.iter().copied());
        self.expr(ExprKind::Invoke { callee, args }, ty)
    }

    /// Anonymous function of callable type `ty`.
    pub fn lambda(&mut self, params: &[&str], body: ExprId, ty: TypeId) -> ExprId {
        let params = params.iter().map(|param| self.name(param)).collect();
        self.expr(ExprKind::Lambda { params, body }, ty)
    }

    /// Quote `inner` as an expression tree.
    pub fn quote(&mut self, inner: ExprId) -> ExprId {
        self.expr(ExprKind::Quote(inner), TypeId::OBJECT)
    }

    /// Assign a static field of `owner`.
    pub fn assign_static(&mut self, owner: TypeId, field: &str, value: ExprId) -> ExprId {
        let field = self.name(field);
        self.expr(ExprKind::AssignStatic { owner, field, value }, TypeId::UNIT)
    }

    /// Read a static field of `owner`.
    pub fn read_static(&mut self, owner: TypeId, field: &str, ty: TypeId) -> ExprId {
        let field = self.name(field);
        self.expr(ExprKind::StaticField { owner, field }, ty)
    }

    pub fn ref_eq(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.expr(ExprKind::RefEq(lhs, rhs), TypeId::BOOL)
    }

    pub fn cond(&mut self, cond: ExprId, then_branch: ExprId, else_branch: ExprId) -> ExprId {
        let ty = self.program.arena.ty(then_branch);
        self.expr(
            ExprKind::Cond {
                cond,
                then_branch,
                else_branch,
            },
            ty,
        )
    }
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}
