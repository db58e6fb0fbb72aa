//! Element values carried through operators.
//!
//! The sparse engine stores elements in its own layout and hands them to
//! operators as `Value`s. Arithmetic follows the interpreted semantics that
//! generic operators are expected to have: booleans count as integers, mixed
//! int/float promotes to float, integer division and remainder are floored.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::DataType;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    I64(i64),
    F64(f64),
}

/// Operands of a binary arithmetic op after promotion.
enum Promoted {
    Int(i64, i64),
    Float(f64, f64),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Bool(_) => DataType::Boolean,
            Value::I64(_) => DataType::Int64,
            Value::F64(_) => DataType::Float64,
        }
    }

    /// The zero of this value's type (`false`, `0`, `0.0`).
    pub fn zero_like(&self) -> Value {
        match self {
            Value::Bool(_) => Value::Bool(false),
            Value::I64(_) => Value::I64(0),
            Value::F64(_) => Value::F64(0.0),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match *self {
            Value::Bool(b) => b,
            Value::I64(i) => i != 0,
            Value::F64(f) => f != 0.0,
        }
    }

    /// Integer view; `None` for floats.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Bool(b) => Some(b as i64),
            Value::I64(i) => Some(i),
            Value::F64(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Bool(b) => b as i64 as f64,
            Value::I64(i) => i as f64,
            Value::F64(f) => f,
        }
    }

    /// Arithmetic promotion. Lossy for integers beyond 2^53 mixed with
    /// floats; comparisons go through `partial_cmp_num` instead.
    fn promote(&self, other: &Value) -> Promoted {
        match (
            DataType::promote(self.data_type(), other.data_type()),
            self.as_i64(),
            other.as_i64(),
        ) {
            (DataType::Int64, Some(a), Some(b)) => Promoted::Int(a, b),
            _ => Promoted::Float(self.as_f64(), other.as_f64()),
        }
    }

    pub fn try_add(&self, other: &Value) -> Result<Value> {
        match self.promote(other) {
            Promoted::Int(a, b) => a
                .checked_add(b)
                .map(Value::I64)
                .ok_or_else(|| overflow("add", a, b)),
            Promoted::Float(a, b) => Ok(Value::F64(a + b)),
        }
    }

    pub fn try_sub(&self, other: &Value) -> Result<Value> {
        match self.promote(other) {
            Promoted::Int(a, b) => a
                .checked_sub(b)
                .map(Value::I64)
                .ok_or_else(|| overflow("sub", a, b)),
            Promoted::Float(a, b) => Ok(Value::F64(a - b)),
        }
    }

    pub fn try_mul(&self, other: &Value) -> Result<Value> {
        match self.promote(other) {
            Promoted::Int(a, b) => a
                .checked_mul(b)
                .map(Value::I64)
                .ok_or_else(|| overflow("mul", a, b)),
            Promoted::Float(a, b) => Ok(Value::F64(a * b)),
        }
    }

    /// Division; floored for integer operands.
    pub fn try_div(&self, other: &Value) -> Result<Value> {
        match self.promote(other) {
            Promoted::Int(_, 0) => Err(zero_division("div")),
            Promoted::Int(a, b) => {
                let q = a.checked_div(b).ok_or_else(|| overflow("div", a, b))?;
                if a % b != 0 && ((a < 0) != (b < 0)) {
                    Ok(Value::I64(q - 1))
                } else {
                    Ok(Value::I64(q))
                }
            }
            Promoted::Float(_, b) if b == 0.0 => Err(zero_division("div")),
            Promoted::Float(a, b) => Ok(Value::F64(a / b)),
        }
    }

    /// Floored remainder: a nonzero result takes the sign of the divisor.
    pub fn try_rem(&self, other: &Value) -> Result<Value> {
        match self.promote(other) {
            Promoted::Int(_, 0) => Err(zero_division("mod")),
            Promoted::Int(a, b) => {
                // i64::MIN % -1 overflows in Rust; mathematically it is 0.
                let r = a.checked_rem(b).unwrap_or(0);
                if r != 0 && ((r < 0) != (b < 0)) {
                    Ok(Value::I64(r + b))
                } else {
                    Ok(Value::I64(r))
                }
            }
            Promoted::Float(_, b) if b == 0.0 => Err(zero_division("mod")),
            Promoted::Float(a, b) => {
                let r = a % b;
                if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
                    Ok(Value::F64(r + b))
                } else {
                    Ok(Value::F64(r))
                }
            }
        }
    }

    /// Exponentiation. A negative integer exponent yields a float.
    pub fn try_pow(&self, other: &Value) -> Result<Value> {
        match self.promote(other) {
            Promoted::Int(0, b) if b < 0 => Err(zero_division("pow")),
            Promoted::Int(a, b) if b < 0 => Ok(Value::F64((a as f64).powf(b as f64))),
            // Exact for any exponent, however large.
            Promoted::Int(0, b) => Ok(Value::I64(i64::from(b == 0))),
            Promoted::Int(1, _) => Ok(Value::I64(1)),
            Promoted::Int(-1, b) => Ok(Value::I64(if b % 2 == 0 { 1 } else { -1 })),
            Promoted::Int(a, b) => u32::try_from(b)
                .ok()
                .and_then(|e| a.checked_pow(e))
                .map(Value::I64)
                .ok_or_else(|| overflow("pow", a, b)),
            Promoted::Float(a, b) if a == 0.0 && b < 0.0 => Err(zero_division("pow")),
            Promoted::Float(a, b) if a < 0.0 && b.fract() != 0.0 => Err(Error::Arithmetic(
                format!("negative base {a} raised to fractional power {b}"),
            )),
            Promoted::Float(a, b) => Ok(Value::F64(a.powf(b))),
        }
    }

    /// First argument unless the second is strictly greater.
    pub fn max_of(&self, other: &Value) -> Value {
        match other.partial_cmp_num(self) {
            Some(Ordering::Greater) => *other,
            _ => *self,
        }
    }

    /// First argument unless the second is strictly smaller.
    pub fn min_of(&self, other: &Value) -> Value {
        match other.partial_cmp_num(self) {
            Some(Ordering::Less) => *other,
            _ => *self,
        }
    }

    pub fn try_bit_and(&self, other: &Value) -> Result<Value> {
        self.bitwise(other, "bit_and", |a, b| a & b, |a, b| a & b)
    }

    pub fn try_bit_or(&self, other: &Value) -> Result<Value> {
        self.bitwise(other, "bit_or", |a, b| a | b, |a, b| a | b)
    }

    pub fn try_bit_xor(&self, other: &Value) -> Result<Value> {
        self.bitwise(other, "bit_xor", |a, b| a ^ b, |a, b| a ^ b)
    }

    fn bitwise(
        &self,
        other: &Value,
        name: &str,
        on_bool: fn(bool, bool) -> bool,
        on_int: fn(i64, i64) -> i64,
    ) -> Result<Value> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(on_bool(*a, *b))),
            _ => match (self.as_i64(), other.as_i64()) {
                (Some(a), Some(b)) => Ok(Value::I64(on_int(a, b))),
                _ => Err(Error::Type(format!(
                    "unsupported operand types for {name}: '{}' and '{}'",
                    self.data_type().name(),
                    other.data_type().name()
                ))),
            },
        }
    }

    /// `x and y`: `x` if it is falsy, otherwise `y`.
    pub fn logical_and(&self, other: &Value) -> Value {
        if self.is_truthy() {
            *other
        } else {
            *self
        }
    }

    /// `x or y`: `x` if it is truthy, otherwise `y`.
    pub fn logical_or(&self, other: &Value) -> Value {
        if self.is_truthy() {
            *self
        } else {
            *other
        }
    }

    pub fn logical_xor(&self, other: &Value) -> Value {
        Value::Bool(self.is_truthy() != other.is_truthy())
    }

    pub fn logical_not(&self) -> Value {
        Value::Bool(!self.is_truthy())
    }

    /// Numeric comparison across types; `None` when a NaN is involved.
    ///
    /// Integer against float is exact: `I64(2^53 + 1)` is greater than
    /// `F64(2^53)` even though both convert to the same `f64`.
    pub fn partial_cmp_num(&self, other: &Value) -> Option<Ordering> {
        match (self.as_i64(), other.as_i64()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            (Some(a), None) => cmp_int_float(a, other.as_f64()),
            (None, Some(b)) => cmp_int_float(b, self.as_f64()).map(Ordering::reverse),
            (None, None) => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }

    /// Numeric equality across types (`I64(1)` equals `F64(1.0)`).
    pub fn num_eq(&self, other: &Value) -> bool {
        self.partial_cmp_num(other) == Some(Ordering::Equal)
    }

    pub fn try_abs(&self) -> Result<Value> {
        match *self {
            Value::Bool(b) => Ok(Value::I64(b as i64)),
            Value::I64(i) => i
                .checked_abs()
                .map(Value::I64)
                .ok_or_else(|| Error::Arithmetic(format!("abs overflow for {i}"))),
            Value::F64(f) => Ok(Value::F64(f.abs())),
        }
    }

    pub fn try_neg(&self) -> Result<Value> {
        match *self {
            Value::Bool(b) => Ok(Value::I64(-(b as i64))),
            Value::I64(i) => i
                .checked_neg()
                .map(Value::I64)
                .ok_or_else(|| Error::Arithmetic(format!("negate overflow for {i}"))),
            Value::F64(f) => Ok(Value::F64(-f)),
        }
    }

    /// Two's complement inversion; booleans invert as integers.
    pub fn try_bit_not(&self) -> Result<Value> {
        match self.as_i64() {
            Some(i) => Ok(Value::I64(!i)),
            None => Err(Error::Type(
                "bad operand type for bit_not: 'float'".to_string(),
            )),
        }
    }
}

/// 2^63, the first float above every `i64`.
const I64_END: f64 = 9_223_372_036_854_775_808.0;

fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    let floor = f.floor();
    if floor >= I64_END {
        return Some(Ordering::Less);
    }
    if floor < -I64_END {
        return Some(Ordering::Greater);
    }
    // `floor` is integral and in range, so the cast is exact.
    match i.cmp(&(floor as i64)) {
        Ordering::Equal if f > floor => Some(Ordering::Less),
        ord => Some(ord),
    }
}

fn overflow(op: &str, a: i64, b: i64) -> Error {
    Error::Arithmetic(format!("integer overflow in {op}({a}, {b})"))
}

fn zero_division(op: &str) -> Error {
    Error::Arithmetic(format!("division by zero in {op}"))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::I64(i) => write!(f, "{i}"),
            Value::F64(x) => write!(f, "{x}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I64(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}
