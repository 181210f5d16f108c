//! Bound symbol tables: declared types, functions and type parameters.
//!
//! These are produced by the binder and consumed read-only by the lowering
//! pass, except for container type parameters, which the pass appends.

use crate::{ContainerId, ExprId, FuncId, Name, Span, TypeDefId, TypeId, TypeParamId};

/// Kind of a declared type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeDefKind {
    /// Reference type.
    Class,
    /// Value type.
    Struct,
    /// Static holder type (extension methods live here).
    Static,
    /// Declared callable type (a delegate). The signature is expressed in
    /// terms of the type's generic environment.
    Callable { params: Box<[TypeId]>, ret: TypeId },
}

/// A static field declared on a type.
#[derive(Clone, Debug)]
pub struct StaticField {
    pub name: Name,
    pub ty: TypeId,
    /// Field initializer, run once when the type is initialized.
    pub init: Option<ExprId>,
}

/// A declared type.
#[derive(Clone, Debug)]
pub struct TypeDef {
    pub name: Name,
    /// Enclosing type for nested declarations.
    pub parent: Option<TypeDefId>,
    /// Type parameters declared by this type (not including outer types').
    pub params: Vec<TypeParamId>,
    pub kind: TypeDefKind,
    pub statics: Vec<StaticField>,
    pub span: Span,
}

impl TypeDef {
    /// Returns `true` for declared callable types.
    pub fn is_callable(&self) -> bool {
        matches!(self.kind, TypeDefKind::Callable { .. })
    }

    /// Find a static field by name.
    pub fn static_field(&self, name: Name) -> Option<&StaticField> {
        self.statics.iter().find(|field| field.name == name)
    }
}

/// How a function receives its (optional) implicit receiver.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FuncKind {
    /// No receiver.
    Static,
    /// Receiver is an instance of the owner type.
    Instance,
    /// Static function whose first parameter may be supplied as a receiver
    /// with member-access syntax.
    Extension,
    /// Function declared inside another function's body. Non-static local
    /// functions close over their enclosing frame.
    Local { is_static: bool },
    /// Static constructor. Runs once per concrete owner type, after the
    /// type's static-field initializers.
    StaticConstructor,
}

impl FuncKind {
    /// Returns `true` if a callable value built from this function must
    /// capture a receiver or closure object.
    pub fn needs_capture(self) -> bool {
        matches!(
            self,
            FuncKind::Instance | FuncKind::Local { is_static: false }
        )
    }
}

/// A declared function.
#[derive(Clone, Debug)]
pub struct FuncDef {
    pub name: Name,
    /// Type the function is declared in (for local functions, the type of
    /// the outermost enclosing function).
    pub owner: TypeDefId,
    /// Enclosing function for local functions.
    pub parent: Option<FuncId>,
    /// Type parameters declared by this function (not including outer ones).
    pub type_params: Vec<TypeParamId>,
    /// Value parameter names, in order. Extension methods list their
    /// receiver parameter first.
    pub params: Vec<Name>,
    pub kind: FuncKind,
    pub body: Option<ExprId>,
    pub span: Span,
}

/// Owner of a type parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamOwner {
    Type(TypeDefId),
    Func(FuncId),
    /// A parameter synthesized for a function-scoped cache container.
    Container(ContainerId),
}

/// A constraint on a type parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Must derive from / implement the given type.
    Type(TypeId),
    /// Must be a non-nullable value type.
    ValueType,
    /// Must be a reference type.
    ReferenceType,
    /// Must have a public parameterless constructor.
    Constructor,
}

/// A declared type parameter.
#[derive(Clone, Debug)]
pub struct TypeParamDef {
    pub name: Name,
    pub owner: ParamOwner,
    pub constraints: Vec<Constraint>,
}
