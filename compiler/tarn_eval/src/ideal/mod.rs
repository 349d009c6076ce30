//! Ideal constant arithmetic.
//!
//! Ideal integers are `BigInt`s and ideal floats are exact `BigRational`s,
//! so constant folding never loses precision. Precision is only given up when
//! a constant is converted into a sized type (`Type::convert_const`).

use std::cmp::Ordering;
use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use crate::errors::{EvalError, EvalResult};
use crate::value::Value;

/// Largest shift count accepted when folding `<<` and `>>`.
pub const MAX_SHIFT: u32 = 10_000;

/// Largest decimal exponent magnitude accepted in a float literal.
pub const MAX_EXPONENT: u32 = 10_000;

/// Binary operators that can be folded over ideal constants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IdealOp {
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    And,
    Or,
    Xor,
    AndNot,
    Shl,
    Shr,
}

impl IdealOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            IdealOp::Add => "+",
            IdealOp::Sub => "-",
            IdealOp::Mul => "*",
            IdealOp::Quo => "/",
            IdealOp::Rem => "%",
            IdealOp::And => "&",
            IdealOp::Or => "|",
            IdealOp::Xor => "^",
            IdealOp::AndNot => "&^",
            IdealOp::Shl => "<<",
            IdealOp::Shr => ">>",
        }
    }
}

impl fmt::Display for IdealOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// Fold `op` over two ideal integers.
///
/// Division truncates toward zero and the remainder takes the sign of the
/// dividend.
pub fn int_binary(op: IdealOp, lhs: &BigInt, rhs: &BigInt) -> EvalResult<BigInt> {
    Ok(match op {
        IdealOp::Add => lhs + rhs,
        IdealOp::Sub => lhs - rhs,
        IdealOp::Mul => lhs * rhs,
        IdealOp::Quo | IdealOp::Rem if rhs.is_zero() => return Err(EvalError::DivisionByZero),
        IdealOp::Quo => lhs / rhs,
        IdealOp::Rem => lhs % rhs,
        IdealOp::And => lhs & rhs,
        IdealOp::Or => lhs | rhs,
        IdealOp::Xor => lhs ^ rhs,
        IdealOp::AndNot => lhs & &!rhs,
        IdealOp::Shl => lhs << shift_count(rhs)?,
        IdealOp::Shr => lhs >> shift_count(rhs)?,
    })
}

fn shift_count(count: &BigInt) -> EvalResult<u32> {
    count
        .to_u32()
        .filter(|&n| n <= MAX_SHIFT)
        .ok_or_else(|| EvalError::InvalidShift {
            count: count.to_string(),
        })
}

/// Fold `op` over two ideal floats. Only the field operations are defined.
pub fn float_binary(op: IdealOp, lhs: &BigRational, rhs: &BigRational) -> EvalResult<BigRational> {
    match op {
        IdealOp::Add => Ok(lhs + rhs),
        IdealOp::Sub => Ok(lhs - rhs),
        IdealOp::Mul => Ok(lhs * rhs),
        IdealOp::Quo if rhs.is_zero() => Err(EvalError::DivisionByZero),
        IdealOp::Quo => Ok(lhs / rhs),
        _ => Err(EvalError::InvalidIdealOp {
            op: op.as_symbol(),
            operand: "ideal float",
        }),
    }
}

/// The exact rational form of an ideal value.
pub fn to_exact(value: &Value) -> EvalResult<BigRational> {
    match value {
        Value::IdealInt(v) => Ok(BigRational::from_integer(v.get())),
        Value::IdealFloat(v) => Ok(v.get()),
        other => Err(EvalError::type_mismatch("ideal constant", other.kind())),
    }
}

/// Fold `op` over two ideal values.
///
/// Two ideal integers produce an ideal integer; an ideal float on either
/// side promotes the operation to ideal floats.
pub fn fold_binary(op: IdealOp, lhs: &Value, rhs: &Value) -> EvalResult<Value> {
    if let (Value::IdealInt(a), Value::IdealInt(b)) = (lhs, rhs) {
        return int_binary(op, &a.get(), &b.get()).map(Value::ideal_int);
    }
    let a = to_exact(lhs)?;
    let b = to_exact(rhs)?;
    float_binary(op, &a, &b).map(Value::ideal_float)
}

/// Negate an ideal value.
pub fn negate(value: &Value) -> EvalResult<Value> {
    match value {
        Value::IdealInt(v) => Ok(Value::ideal_int(-v.get())),
        Value::IdealFloat(v) => Ok(Value::ideal_float(-v.get())),
        other => Err(EvalError::type_mismatch("ideal constant", other.kind())),
    }
}

/// Compare two ideal values numerically.
pub fn compare(lhs: &Value, rhs: &Value) -> EvalResult<Ordering> {
    Ok(to_exact(lhs)?.cmp(&to_exact(rhs)?))
}

/// Parse an integer literal: decimal, `0x` hexadecimal or `0`-prefixed octal.
pub fn parse_int_literal(text: &str) -> EvalResult<BigInt> {
    let (digits, radix) = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid_literal(text));
    }
    BigInt::parse_bytes(digits.as_bytes(), radix).ok_or_else(|| invalid_literal(text))
}

/// Parse a decimal float literal (`1.5`, `.5`, `3.`, `1e10`, `2.5E-3`)
/// into its exact rational value.
pub fn parse_float_literal(text: &str) -> EvalResult<BigRational> {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(at) => (&text[..at], parse_exponent(&text[at + 1..], text)?),
        None => (text, 0),
    };
    let (whole, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
        return Err(invalid_literal(text));
    }

    let digits = format!("{whole}{frac}");
    let numer = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| invalid_literal(text))?;
    let frac_len = i64::try_from(frac.len()).map_err(|_| invalid_literal(text))?;
    let scale = exponent - frac_len;

    let ten_pow = |n: i64| -> EvalResult<BigInt> {
        let n = usize::try_from(n).map_err(|_| invalid_literal(text))?;
        Ok(num_traits::pow(BigInt::from(10), n))
    };
    Ok(if scale >= 0 {
        BigRational::from_integer(numer * ten_pow(scale)?)
    } else {
        BigRational::new(numer, ten_pow(-scale)?)
    })
}

fn parse_exponent(exp: &str, text: &str) -> EvalResult<i64> {
    let (negative, magnitude) = match exp.as_bytes().first() {
        Some(b'-') => (true, &exp[1..]),
        Some(b'+') => (false, &exp[1..]),
        _ => (false, exp),
    };
    if magnitude.is_empty() || !magnitude.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid_literal(text));
    }
    let value: u32 = magnitude
        .parse()
        .ok()
        .filter(|&n| n <= MAX_EXPONENT)
        .ok_or_else(|| invalid_literal(text))?;
    let value = i64::from(value);
    Ok(if negative { -value } else { value })
}

fn invalid_literal(text: &str) -> EvalError {
    EvalError::InvalidLiteral {
        text: text.to_string(),
    }
}

/// Render an exact rational: integers as integers, otherwise `num/den`.
pub fn format_exact(value: &BigRational) -> String {
    if value.is_integer() {
        value.numer().to_string()
    } else {
        value.to_string()
    }
}
