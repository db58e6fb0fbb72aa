//! Semirings for generalized sparse multiply/add.
//!
//! A semiring pairs a reduce (⊕, `add`) with a combine (⊗, `mul`):
//! `C[i,j] = ⊕_k (A[i,k] ⊗ B[k,j])`. Both are held in native binary form so
//! the engine can run them directly.
//!
//! - `PlusTimes`: ordinary (+, ×)
//! - `Select2ndMax`: (max, second), propagating the larger of the incoming
//!   `B` values, as used by BFS-style traversals
//! - `Custom`: built from arbitrary operators with `sr`

use ewise_core::info;
use ewise_core::schema::DataType;
use ewise_core::{Result, Value};

use crate::bridge;
use crate::op::{GenericOp, NativeKind, NativeOp, Operator};
use crate::registry::Builtin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemiringKind {
    PlusTimes,
    Select2ndMax,
    Custom,
}

#[derive(Debug, Clone)]
pub struct Semiring {
    kind: SemiringKind,
    add: Operator,
    mul: Operator,
}

/// Semiring from two binary operators; generics are boxed for the engine.
pub fn sr(add: Operator, mul: Operator) -> Result<Semiring> {
    Ok(Semiring {
        kind: SemiringKind::Custom,
        add: bridge::to_native_binary(add)?,
        mul: bridge::to_native_binary(mul)?,
    })
}

impl Semiring {
    pub fn plus_times() -> Self {
        Self {
            kind: SemiringKind::PlusTimes,
            add: Builtin::Add.into(),
            mul: Builtin::Mul.into(),
        }
    }

    pub fn select2nd_max() -> Self {
        let second = GenericOp::binary(|_, y| Ok(*y));
        Self {
            kind: SemiringKind::Select2ndMax,
            add: Builtin::Max.into(),
            mul: Operator::Native(NativeOp::boxed(NativeKind::Binary, second)),
        }
    }

    pub fn kind(&self) -> SemiringKind {
        self.kind
    }

    pub fn add_op(&self) -> &Operator {
        &self.add
    }

    pub fn mul_op(&self) -> &Operator {
        &self.mul
    }

    /// ⊗
    pub fn combine(&self, x: &Value, y: &Value) -> Result<Value> {
        self.mul.call_binary(x, y)
    }

    /// ⊕
    pub fn reduce(&self, acc: &Value, v: &Value) -> Result<Value> {
        self.add.call_binary(acc, v)
    }

    /// Identity of ⊕ for elements of type `ty`, when known.
    ///
    /// - `PlusTimes`: zero
    /// - `Select2ndMax`: the smallest value (`min_int` for integers, −∞ for
    ///   floats, `false` for booleans)
    /// - `Custom`: unknown
    pub fn reduce_identity(&self, ty: DataType) -> Option<Value> {
        match (self.kind, ty) {
            (SemiringKind::PlusTimes, DataType::Boolean) => Some(Value::Bool(false)),
            (SemiringKind::PlusTimes, DataType::Int64) => Some(Value::I64(0)),
            (SemiringKind::PlusTimes, DataType::Float64) => Some(Value::F64(0.0)),
            (SemiringKind::Select2ndMax, DataType::Boolean) => Some(Value::Bool(false)),
            (SemiringKind::Select2ndMax, DataType::Int64) => Some(Value::I64(info::min_int())),
            (SemiringKind::Select2ndMax, DataType::Float64) => Some(Value::F64(f64::NEG_INFINITY)),
            (SemiringKind::Custom, _) => None,
        }
    }

    /// `⊕` over `x ⊗ y` for every pair; `None` for no pairs.
    pub fn fold_products<I>(&self, pairs: I) -> Result<Option<Value>>
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        let mut acc: Option<Value> = None;
        for (x, y) in pairs {
            let product = self.combine(&x, &y)?;
            acc = Some(match acc {
                Some(a) => self.reduce(&a, &product)?,
                None => product,
            });
        }
        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(v: &[(i64, i64)]) -> Vec<(Value, Value)> {
        v.iter().map(|&(x, y)| (Value::I64(x), Value::I64(y))).collect()
    }

    #[test]
    fn test_plus_times_is_dot_product() {
        let s = Semiring::plus_times();
        let dot = s.fold_products(pairs(&[(1, 2), (3, 4), (5, 6)])).unwrap();
        assert_eq!(dot, Some(Value::I64(44)));
        assert_eq!(s.fold_products(Vec::new()).unwrap(), None);
    }

    #[test]
    fn test_select2nd_max() {
        let s = Semiring::select2nd_max();
        assert_eq!(s.kind(), SemiringKind::Select2ndMax);
        assert_eq!(s.combine(&Value::I64(100), &Value::I64(7)).unwrap(), Value::I64(7));
        let r = s.fold_products(pairs(&[(1, 7), (1, 3), (9, 5)])).unwrap();
        assert_eq!(r, Some(Value::I64(7)));
        assert!(bridge::is_native(s.mul_op()));
    }

    #[test]
    fn test_sr_boxes_generic_operators() {
        let s = sr(
            Operator::binary(|x, y| Ok(x.min_of(y))),
            Operator::binary(|x, y| x.try_add(y)),
        )
        .unwrap();
        assert_eq!(s.kind(), SemiringKind::Custom);
        assert!(bridge::is_native(s.add_op()));
        assert!(bridge::is_native(s.mul_op()));

        // min-plus: shortest path relaxation
        let r = s.fold_products(pairs(&[(1, 10), (4, 2), (2, 5)])).unwrap();
        assert_eq!(r, Some(Value::I64(6)));
        assert_eq!(s.reduce_identity(DataType::Int64), None);

        assert!(sr(Builtin::Abs.into(), Builtin::Add.into()).is_err());
    }

    #[test]
    fn test_reduce_identity() {
        let s = Semiring::select2nd_max();
        assert_eq!(
            s.reduce_identity(DataType::Int64),
            Some(Value::I64(info::min_int()))
        );
        assert_eq!(
            Semiring::plus_times().reduce_identity(DataType::Float64),
            Some(Value::F64(0.0))
        );
    }
}
