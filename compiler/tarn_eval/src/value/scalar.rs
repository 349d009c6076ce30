//! Scalar value kinds.
//!
//! Sized numeric values remember their width so `set` behaves like a store
//! into a machine word of that width: integers wrap, 32-bit floats round.

use num_bigint::BigInt;
use num_rational::BigRational;

use super::storage::Storage;
use crate::types::{FloatWidth, IntWidth};

#[derive(Clone, Debug)]
pub struct BoolValue(pub(super) Storage<bool>);

impl BoolValue {
    #[inline]
    pub fn get(&self) -> bool {
        self.0.get()
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.0.replace(value);
    }
}

#[derive(Clone, Debug)]
pub struct UintValue {
    pub(super) width: IntWidth,
    pub(super) cell: Storage<u64>,
}

impl UintValue {
    #[inline]
    pub fn bits(&self) -> u32 {
        self.width.bits()
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.cell.get()
    }

    /// Store `value`, discarding bits above this value's width.
    #[inline]
    pub fn set(&self, value: u64) {
        self.cell.replace(wrap_unsigned(self.width, value));
    }
}

#[derive(Clone, Debug)]
pub struct IntValue {
    pub(super) width: IntWidth,
    pub(super) cell: Storage<i64>,
}

impl IntValue {
    #[inline]
    pub fn bits(&self) -> u32 {
        self.width.bits()
    }

    #[inline]
    pub fn get(&self) -> i64 {
        self.cell.get()
    }

    /// Store `value`, sign-wrapping it to this value's width.
    #[inline]
    pub fn set(&self, value: i64) {
        self.cell.replace(wrap_signed(self.width, value));
    }
}

#[derive(Clone, Debug)]
pub struct FloatValue {
    pub(super) width: FloatWidth,
    pub(super) cell: Storage<f64>,
}

impl FloatValue {
    #[inline]
    pub fn bits(&self) -> u32 {
        self.width.bits()
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.cell.get()
    }

    /// Store `value`, rounding to single precision for 32-bit values.
    #[inline]
    pub fn set(&self, value: f64) {
        self.cell.replace(round_float(self.width, value));
    }
}

#[derive(Clone, Debug)]
pub struct StringValue(pub(super) Storage<String>);

impl StringValue {
    #[inline]
    pub fn get(&self) -> String {
        self.0.get()
    }

    #[inline]
    pub fn set(&self, value: impl Into<String>) {
        self.0.replace(value.into());
    }
}

/// An untyped integer constant. Constants have no public setter.
#[derive(Clone, Debug)]
pub struct IdealIntValue(pub(super) Storage<BigInt>);

impl IdealIntValue {
    #[inline]
    pub fn get(&self) -> BigInt {
        self.0.get()
    }
}

/// An untyped floating-point constant, kept as an exact rational.
#[derive(Clone, Debug)]
pub struct IdealFloatValue(pub(super) Storage<BigRational>);

impl IdealFloatValue {
    #[inline]
    pub fn get(&self) -> BigRational {
        self.0.get()
    }
}

pub(super) fn wrap_unsigned(width: IntWidth, value: u64) -> u64 {
    match width {
        IntWidth::W64 => value,
        narrow => value & ((1u64 << narrow.bits()) - 1),
    }
}

pub(super) fn wrap_signed(width: IntWidth, value: i64) -> i64 {
    match width {
        IntWidth::W64 => value,
        narrow => {
            let shift = 64 - narrow.bits();
            (value << shift) >> shift
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "narrowing to f32 is the point of a 32-bit store"
)]
pub(super) fn round_float(width: FloatWidth, value: f64) -> f64 {
    match width {
        FloatWidth::W32 => f64::from(value as f32),
        FloatWidth::W64 => value,
    }
}
