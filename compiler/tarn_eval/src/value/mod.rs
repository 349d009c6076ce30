//! Runtime values.
//!
//! Every `Value` is a handle to a storage cell. Cloning a `Value` aliases the
//! cell; `assign` is the operation that copies contents from one cell to
//! another. Frames, array elements and pointers all hold handles, which is
//! what gives `ArrayValue::elem` and `PtrValue::get` reference semantics.
//!
//! All cells are allocated through the factory methods on `Value`.

mod composite;
mod scalar;
mod storage;

use std::fmt;
use std::sync::Arc;

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::errors::{EvalError, EvalResult};
use crate::ideal::format_exact;
use crate::types::{FloatWidth, IntWidth};
use storage::Storage;

pub use composite::{ArrayValue, Func, FuncValue, PtrValue};
pub use scalar::{
    BoolValue, FloatValue, IdealFloatValue, IdealIntValue, IntValue, StringValue, UintValue,
};

/// Runtime value of one kind.
#[derive(Clone, Debug)]
pub enum Value {
    Bool(BoolValue),
    Uint(UintValue),
    Int(IntValue),
    IdealInt(IdealIntValue),
    Float(FloatValue),
    IdealFloat(IdealFloatValue),
    String(StringValue),
    Array(ArrayValue),
    Ptr(PtrValue),
    Func(FuncValue),
}

/// Kind discriminator of a `Value`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Uint,
    Int,
    IdealInt,
    Float,
    IdealFloat,
    String,
    Array,
    Ptr,
    Func,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Uint => "unsigned integer",
            ValueKind::Int => "integer",
            ValueKind::IdealInt => "ideal integer",
            ValueKind::Float => "float",
            ValueKind::IdealFloat => "ideal float",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Ptr => "pointer",
            ValueKind::Func => "func",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Factory Methods (ONLY way to allocate cells)

impl Value {
    #[inline]
    pub fn bool(value: bool) -> Self {
        Value::Bool(BoolValue(Storage::new(value)))
    }

    /// Unsigned integer of the given width; `value` is wrapped to fit.
    #[inline]
    pub fn uint(width: IntWidth, value: u64) -> Self {
        Value::Uint(UintValue {
            width,
            cell: Storage::new(scalar::wrap_unsigned(width, value)),
        })
    }

    /// Signed integer of the given width; `value` is wrapped to fit.
    #[inline]
    pub fn int(width: IntWidth, value: i64) -> Self {
        Value::Int(IntValue {
            width,
            cell: Storage::new(scalar::wrap_signed(width, value)),
        })
    }

    #[inline]
    pub fn float(width: FloatWidth, value: f64) -> Self {
        Value::Float(FloatValue {
            width,
            cell: Storage::new(scalar::round_float(width, value)),
        })
    }

    #[inline]
    pub fn ideal_int(value: BigInt) -> Self {
        Value::IdealInt(IdealIntValue(Storage::new(value)))
    }

    #[inline]
    pub fn ideal_float(value: BigRational) -> Self {
        Value::IdealFloat(IdealFloatValue(Storage::new(value)))
    }

    #[inline]
    pub fn string(value: impl Into<String>) -> Self {
        Value::String(StringValue(Storage::new(value.into())))
    }

    /// Array over the given element cells. The cells are adopted, not copied.
    #[inline]
    pub fn array(elems: Vec<Value>) -> Self {
        Value::Array(ArrayValue {
            elems: elems.into(),
        })
    }

    /// Pointer to `target`, or nil.
    #[inline]
    pub fn ptr(target: Option<Value>) -> Self {
        Value::Ptr(PtrValue(Storage::new(target)))
    }

    #[inline]
    pub fn func(func: Option<Arc<dyn Func>>) -> Self {
        Value::Func(FuncValue(Storage::new(func)))
    }
}

macro_rules! kind_accessor {
    ($(#[$doc:meta])* $fn_name:ident, $variant:ident, $handle:ty) => {
        $(#[$doc])*
        pub fn $fn_name(&self) -> EvalResult<&$handle> {
            match self {
                Value::$variant(v) => Ok(v),
                other => Err(EvalError::type_mismatch(ValueKind::$variant, other.kind())),
            }
        }
    };
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Uint(_) => ValueKind::Uint,
            Value::Int(_) => ValueKind::Int,
            Value::IdealInt(_) => ValueKind::IdealInt,
            Value::Float(_) => ValueKind::Float,
            Value::IdealFloat(_) => ValueKind::IdealFloat,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Ptr(_) => ValueKind::Ptr,
            Value::Func(_) => ValueKind::Func,
        }
    }

    kind_accessor!(
        /// Checked downcast to a bool handle.
        as_bool, Bool, BoolValue
    );
    kind_accessor!(
        /// Checked downcast to an unsigned integer handle.
        as_uint, Uint, UintValue
    );
    kind_accessor!(
        /// Checked downcast to a signed integer handle.
        as_int, Int, IntValue
    );
    kind_accessor!(
        /// Checked downcast to an ideal integer handle.
        as_ideal_int, IdealInt, IdealIntValue
    );
    kind_accessor!(
        /// Checked downcast to a float handle.
        as_float, Float, FloatValue
    );
    kind_accessor!(
        /// Checked downcast to an ideal float handle.
        as_ideal_float, IdealFloat, IdealFloatValue
    );
    kind_accessor!(
        /// Checked downcast to a string handle.
        as_string, String, StringValue
    );
    kind_accessor!(
        /// Checked downcast to an array handle.
        as_array, Array, ArrayValue
    );
    kind_accessor!(
        /// Checked downcast to a pointer handle.
        as_ptr, Ptr, PtrValue
    );
    kind_accessor!(
        /// Checked downcast to a function handle.
        as_func, Func, FuncValue
    );

    /// Copy `other`'s contents into this value's cell.
    ///
    /// Both values must be the same kind. Arrays must also have the same
    /// length and are copied element by element; pointers copy the target
    /// reference, not the pointee.
    pub fn assign(&self, other: &Value) -> EvalResult {
        match (self, other) {
            (Value::Bool(dst), Value::Bool(src)) => dst.set(src.get()),
            (Value::Uint(dst), Value::Uint(src)) => dst.set(src.get()),
            (Value::Int(dst), Value::Int(src)) => dst.set(src.get()),
            (Value::IdealInt(dst), Value::IdealInt(src)) => dst.0.replace(src.get()),
            (Value::Float(dst), Value::Float(src)) => dst.set(src.get()),
            (Value::IdealFloat(dst), Value::IdealFloat(src)) => dst.0.replace(src.get()),
            (Value::String(dst), Value::String(src)) => dst.set(src.get()),
            (Value::Array(dst), Value::Array(src)) => dst.assign(src)?,
            (Value::Ptr(dst), Value::Ptr(src)) => dst.set(src.get()),
            (Value::Func(dst), Value::Func(src)) => dst.set(src.get()),
            _ => return Err(EvalError::type_mismatch(self.kind(), other.kind())),
        }
        Ok(())
    }

    /// Whether both handles refer to the same storage.
    pub fn same_cell(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.0.ptr_eq(&b.0),
            (Value::Uint(a), Value::Uint(b)) => a.cell.ptr_eq(&b.cell),
            (Value::Int(a), Value::Int(b)) => a.cell.ptr_eq(&b.cell),
            (Value::IdealInt(a), Value::IdealInt(b)) => a.0.ptr_eq(&b.0),
            (Value::Float(a), Value::Float(b)) => a.cell.ptr_eq(&b.cell),
            (Value::IdealFloat(a), Value::IdealFloat(b)) => a.0.ptr_eq(&b.0),
            (Value::String(a), Value::String(b)) => a.0.ptr_eq(&b.0),
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(&a.elems, &b.elems),
            (Value::Ptr(a), Value::Ptr(b)) => a.0.ptr_eq(&b.0),
            (Value::Func(a), Value::Func(b)) => a.0.ptr_eq(&b.0),
            _ => false,
        }
    }
}

/// Content equality. Pointers are equal when they target the same cell;
/// function values when they hold the same callable.
impl PartialEq for Value {
    #[expect(clippy::float_cmp, reason = "stored floats are compared exactly")]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.get() == b.get(),
            (Value::Uint(a), Value::Uint(b)) => a.get() == b.get(),
            (Value::Int(a), Value::Int(b)) => a.get() == b.get(),
            (Value::IdealInt(a), Value::IdealInt(b)) => a.get() == b.get(),
            (Value::Float(a), Value::Float(b)) => a.get() == b.get(),
            (Value::IdealFloat(a), Value::IdealFloat(b)) => a.get() == b.get(),
            (Value::String(a), Value::String(b)) => a.get() == b.get(),
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            (Value::Ptr(a), Value::Ptr(b)) => match (a.get(), b.get()) {
                (None, None) => true,
                (Some(x), Some(y)) => x.same_cell(&y),
                _ => false,
            },
            (Value::Func(a), Value::Func(b)) => match (a.get(), b.get()) {
                (None, None) => true,
                (Some(x), Some(y)) => Arc::ptr_eq(&x, &y),
                _ => false,
            },
            _ => false,
        }
    }
}

/// Pointer hops followed when rendering a value. Pointer chains may be
/// cyclic; anything past the limit renders as `&...`.
const MAX_DISPLAY_HOPS: usize = 8;

impl Value {
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>, hops: usize) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v.get()),
            Value::Uint(v) => write!(f, "{}", v.get()),
            Value::Int(v) => write!(f, "{}", v.get()),
            Value::IdealInt(v) => write!(f, "{}", v.get()),
            Value::Float(v) => write!(f, "{}", v.get()),
            Value::IdealFloat(v) => write!(f, "{}", format_exact(&v.get())),
            Value::String(v) => write!(f, "{:?}", v.get()),
            Value::Array(v) => {
                write!(f, "{{")?;
                for (i, elem) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    elem.fmt_nested(f, hops)?;
                }
                write!(f, "}}")
            }
            Value::Ptr(v) => match v.get() {
                Some(_) if hops >= MAX_DISPLAY_HOPS => write!(f, "&..."),
                Some(target) => {
                    write!(f, "&")?;
                    target.fmt_nested(f, hops + 1)
                }
                None => write!(f, "<nil>"),
            },
            Value::Func(v) => match v.get() {
                Some(_) => write!(f, "func"),
                None => write!(f, "<nil>"),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_nested(f, 0)
    }
}

#[cfg(test)]
mod tests;
