//! Conversion of ideal constants into concrete types.

use num_rational::BigRational;
use num_traits::ToPrimitive;

use super::{Type, TypeKind};
use crate::errors::{EvalError, EvalResult};
use crate::ideal::format_exact;
use crate::value::Value;

impl Type {
    /// Convert an ideal constant into a fresh value of this type.
    ///
    /// Integer targets reject fractional constants (`Truncated`) and any
    /// sized target rejects constants outside its inclusive range
    /// (`Overflow`). Non-ideal sources and non-numeric targets are a
    /// `TypeMismatch`.
    pub fn convert_const(&self, value: &Value) -> EvalResult<Value> {
        let exact = match value {
            Value::IdealInt(v) => BigRational::from_integer(v.get()),
            Value::IdealFloat(v) => v.get(),
            other => return Err(EvalError::type_mismatch("ideal constant", other.kind())),
        };

        match self.rep().kind() {
            TypeKind::Uint(spec) => {
                self.check_integral(&exact)?;
                self.check_range(&exact)?;
                let raw = exact.to_integer().to_u64().ok_or_else(|| self.overflow(&exact))?;
                Ok(Value::uint(spec.width, raw))
            }
            TypeKind::Int(spec) => {
                self.check_integral(&exact)?;
                self.check_range(&exact)?;
                let raw = exact.to_integer().to_i64().ok_or_else(|| self.overflow(&exact))?;
                Ok(Value::int(spec.width, raw))
            }
            TypeKind::Float(spec) => {
                self.check_range(&exact)?;
                let raw = exact.to_f64().ok_or_else(|| self.overflow(&exact))?;
                Ok(Value::float(spec.width, raw))
            }
            TypeKind::IdealInt => {
                self.check_integral(&exact)?;
                Ok(Value::ideal_int(exact.to_integer()))
            }
            TypeKind::IdealFloat => Ok(Value::ideal_float(exact)),
            _ => Err(EvalError::type_mismatch(self, value.kind())),
        }
    }

    fn check_integral(&self, exact: &BigRational) -> EvalResult {
        if exact.is_integer() {
            Ok(())
        } else {
            Err(EvalError::Truncated {
                value: format_exact(exact),
                ty: self.to_string(),
            })
        }
    }

    fn check_range(&self, exact: &BigRational) -> EvalResult {
        match self.bounds() {
            Some(bounds) if !bounds.contains(exact) => Err(self.overflow(exact)),
            _ => Ok(()),
        }
    }

    fn overflow(&self, exact: &BigRational) -> EvalError {
        EvalError::Overflow {
            value: format_exact(exact),
            ty: self.to_string(),
        }
    }
}
