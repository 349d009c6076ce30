//! Type descriptors.
//!
//! `Type` is a shared, immutable handle over a closed set of kinds. Two
//! handles to unnamed types compare structurally; named types are identical
//! only to themselves (same declaration).
//!
//! # Stripping names
//!
//! - `rep()` strips one level: a named type becomes its underlying type.
//!   Use it for kind dispatch.
//! - `literal()` strips every name, recursively through element, pointer
//!   and signature types. Use it only for assignability comparisons.

mod bounds;
mod convert;

use std::fmt;
use std::sync::Arc;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use crate::value::Value;

pub use bounds::Bounds;

/// Width of a sized integer. Only machine widths exist.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }
}

/// Width of a floating-point number: single or double precision.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    W32,
    W64,
}

impl FloatWidth {
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            FloatWidth::W32 => 32,
            FloatWidth::W64 => 64,
        }
    }
}

/// Width and canonical name of a sized integer type.
///
/// `int` and `int64` share a width but are distinct types, so the name is
/// part of the identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IntSpec {
    pub width: IntWidth,
    pub name: &'static str,
}

/// Width and canonical name of a floating-point type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FloatSpec {
    pub width: FloatWidth,
    pub name: &'static str,
}

/// Function signature.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncSig {
    pub params: Vec<Type>,
    /// The last parameter collects trailing arguments.
    pub variadic: bool,
    pub results: Vec<Type>,
}

/// The kind of a type.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeKind {
    Bool,
    Uint(IntSpec),
    Int(IntSpec),
    /// Untyped integer constant.
    IdealInt,
    Float(FloatSpec),
    /// Untyped floating-point constant.
    IdealFloat,
    String,
    Array { len: u64, elem: Type },
    Ptr { elem: Type },
    Func(FuncSig),
    /// A declared name for another type. `underlying` is never itself named.
    Named { name: Arc<str>, underlying: Type },
}

/// Shared type handle.
#[derive(Clone)]
pub struct Type(Arc<TypeKind>);

impl Type {
    fn new(kind: TypeKind) -> Self {
        Type(Arc::new(kind))
    }

    pub fn bool() -> Self {
        Type::new(TypeKind::Bool)
    }

    pub fn uint(width: IntWidth, name: &'static str) -> Self {
        Type::new(TypeKind::Uint(IntSpec { width, name }))
    }

    pub fn int(width: IntWidth, name: &'static str) -> Self {
        Type::new(TypeKind::Int(IntSpec { width, name }))
    }

    pub fn float(width: FloatWidth, name: &'static str) -> Self {
        Type::new(TypeKind::Float(FloatSpec { width, name }))
    }

    pub fn ideal_int() -> Self {
        Type::new(TypeKind::IdealInt)
    }

    pub fn ideal_float() -> Self {
        Type::new(TypeKind::IdealFloat)
    }

    pub fn string() -> Self {
        Type::new(TypeKind::String)
    }

    pub fn array(len: u64, elem: Type) -> Self {
        Type::new(TypeKind::Array { len, elem })
    }

    pub fn ptr(elem: Type) -> Self {
        Type::new(TypeKind::Ptr { elem })
    }

    pub fn func(params: Vec<Type>, variadic: bool, results: Vec<Type>) -> Self {
        Type::new(TypeKind::Func(FuncSig {
            params,
            variadic,
            results,
        }))
    }

    /// Declare a new named type.
    ///
    /// The underlying type is `def.rep()`, so naming a named type does not
    /// build a chain of names.
    pub fn named(name: impl Into<Arc<str>>, def: &Type) -> Self {
        Type::new(TypeKind::Named {
            name: name.into(),
            underlying: def.rep(),
        })
    }

    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.0
    }

    #[inline]
    pub fn is_named(&self) -> bool {
        matches!(*self.0, TypeKind::Named { .. })
    }

    /// This type with every name stripped, recursively.
    pub fn literal(&self) -> Type {
        match self.kind() {
            TypeKind::Named { underlying, .. } => underlying.literal(),
            TypeKind::Array { len, elem } => Type::array(*len, elem.literal()),
            TypeKind::Ptr { elem } => Type::ptr(elem.literal()),
            TypeKind::Func(sig) => Type::func(
                sig.params.iter().map(Type::literal).collect(),
                sig.variadic,
                sig.results.iter().map(Type::literal).collect(),
            ),
            _ => self.clone(),
        }
    }

    /// The representative (underlying) type. Identity for unnamed types.
    pub fn rep(&self) -> Type {
        match self.kind() {
            TypeKind::Named { underlying, .. } => underlying.clone(),
            _ => self.clone(),
        }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.rep().kind(), TypeKind::Bool)
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self.rep().kind(),
            TypeKind::Uint(_) | TypeKind::Int(_) | TypeKind::IdealInt
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self.rep().kind(), TypeKind::Float(_) | TypeKind::IdealFloat)
    }

    pub fn is_ideal(&self) -> bool {
        matches!(self.rep().kind(), TypeKind::IdealInt | TypeKind::IdealFloat)
    }

    /// A fresh zero value of this type.
    pub fn zero(&self) -> Value {
        match self.kind() {
            TypeKind::Bool => Value::bool(false),
            TypeKind::Uint(spec) => Value::uint(spec.width, 0),
            TypeKind::Int(spec) => Value::int(spec.width, 0),
            TypeKind::IdealInt => Value::ideal_int(BigInt::zero()),
            TypeKind::Float(spec) => Value::float(spec.width, 0.0),
            TypeKind::IdealFloat => Value::ideal_float(BigRational::zero()),
            TypeKind::String => Value::string(String::new()),
            TypeKind::Array { len, elem } => {
                Value::array((0..*len).map(|_| elem.zero()).collect())
            }
            TypeKind::Ptr { .. } => Value::ptr(None),
            TypeKind::Func(_) => Value::func(None),
            TypeKind::Named { underlying, .. } => underlying.zero(),
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (!self.is_named() && !other.is_named() && self.0 == other.0)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({self})")
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[Type], variadic: bool) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        if variadic && i + 1 == types.len() {
            write!(f, "...")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            TypeKind::Bool => write!(f, "bool"),
            TypeKind::Uint(spec) | TypeKind::Int(spec) => write!(f, "{}", spec.name),
            TypeKind::IdealInt => write!(f, "ideal integer"),
            TypeKind::Float(spec) => write!(f, "{}", spec.name),
            TypeKind::IdealFloat => write!(f, "ideal float"),
            TypeKind::String => write!(f, "string"),
            TypeKind::Array { len, elem } => write!(f, "[{len}]{elem}"),
            TypeKind::Ptr { elem } => write!(f, "*{elem}"),
            TypeKind::Func(sig) => {
                write!(f, "func(")?;
                write_list(f, &sig.params, sig.variadic)?;
                write!(f, ")")?;
                match sig.results.as_slice() {
                    [] => Ok(()),
                    [single] if !matches!(single.kind(), TypeKind::Func(_)) => {
                        write!(f, " {single}")
                    }
                    results => {
                        write!(f, " (")?;
                        write_list(f, results, false)?;
                        write!(f, ")")
                    }
                }
            }
            TypeKind::Named { name, .. } => write!(f, "{name}"),
        }
    }
}
