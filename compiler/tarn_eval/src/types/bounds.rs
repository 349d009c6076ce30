//! Numeric range refinement for sized types.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use super::{FloatWidth, IntWidth, Type, TypeKind};

/// Inclusive value range of a sized numeric type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min: BigRational,
    pub max: BigRational,
}

impl Bounds {
    fn unsigned(width: IntWidth) -> Self {
        let max = (BigInt::one() << width.bits()) - BigInt::one();
        Bounds {
            min: BigRational::zero(),
            max: BigRational::from_integer(max),
        }
    }

    fn signed(width: IntWidth) -> Self {
        let half = BigInt::one() << (width.bits() - 1);
        Bounds {
            min: BigRational::from_integer(-half.clone()),
            max: BigRational::from_integer(half - BigInt::one()),
        }
    }

    fn float(width: FloatWidth) -> Self {
        let largest = match width {
            FloatWidth::W32 => f64::from(f32::MAX),
            FloatWidth::W64 => f64::MAX,
        };
        // Finite floats always have an exact rational form.
        let max = BigRational::from_float(largest).unwrap_or_else(BigRational::zero);
        Bounds {
            min: -max.clone(),
            max,
        }
    }

    /// Whether `value` lies inside the range.
    #[inline]
    pub fn contains(&self, value: &BigRational) -> bool {
        &self.min <= value && value <= &self.max
    }
}

impl Type {
    /// The inclusive range of this type, if it is a sized numeric type.
    ///
    /// Ideal types are unbounded and yield `None`.
    pub fn bounds(&self) -> Option<Bounds> {
        match self.rep().kind() {
            TypeKind::Uint(spec) => Some(Bounds::unsigned(spec.width)),
            TypeKind::Int(spec) => Some(Bounds::signed(spec.width)),
            TypeKind::Float(spec) => Some(Bounds::float(spec.width)),
            _ => None,
        }
    }

    /// Smallest value of this type.
    pub fn min_val(&self) -> Option<BigRational> {
        self.bounds().map(|b| b.min)
    }

    /// Largest value of this type.
    pub fn max_val(&self) -> Option<BigRational> {
        self.bounds().map(|b| b.max)
    }
}
