//! Unary filter composition.
//!
//! Each policy decides what a filtered-out element maps to:
//!
//! | policy | predicate fails | predicate passes |
//! |---|---|---|
//! | `filtered_unary_or_self` | `x` unchanged | `op(x)` |
//! | `filtered_unary_or_op_val` | `op(zero of default's type)` | `op(x)` |
//! | `filtered_unary_or_val` | `default` | `op(x)` |
//!
//! Without a filter every policy returns `op` itself.

use ewise_core::{Result, Value};

use crate::bridge;
use crate::filter::{combined_predicate, Filterable, PredicateChain};
use crate::op::{Operator, UnaryFn};

#[derive(Debug, Clone, Copy, PartialEq)]
enum OnFail {
    PassThrough,
    /// `op` applied to this (precomputed) zero value.
    MapZero(Value),
    Literal(Value),
}

/// `op` guarded by a predicate chain.
pub struct FilteredUnary {
    filter: PredicateChain,
    op: UnaryFn,
    on_fail: OnFail,
}

impl FilteredUnary {
    pub fn call(&self, x: &Value) -> Result<Value> {
        if self.filter.test(x) {
            return (self.op)(x);
        }
        match &self.on_fail {
            OnFail::PassThrough => Ok(*x),
            OnFail::MapZero(zero) => (self.op)(zero),
            OnFail::Literal(v) => Ok(*v),
        }
    }
}

/// Pass-through-on-fail: filtered-out elements stay visible, unmodified.
pub fn filtered_unary_or_self<F: Filterable + ?Sized>(obj: &F, op: Operator) -> Result<Operator> {
    compose(obj, op, OnFail::PassThrough)
}

/// Mapped-default-on-fail: filtered-out elements become `op` applied to the
/// zero value of `default`'s type. The value of `default` itself is never
/// used, only its type.
pub fn filtered_unary_or_op_val<F: Filterable + ?Sized>(
    obj: &F,
    op: Operator,
    default: Value,
) -> Result<Operator> {
    compose(obj, op, OnFail::MapZero(default.zero_like()))
}

/// Literal-default-on-fail: filtered-out elements become `default`; `op` is
/// not invoked for them.
pub fn filtered_unary_or_val<F: Filterable + ?Sized>(
    obj: &F,
    op: Operator,
    default: Value,
) -> Result<Operator> {
    compose(obj, op, OnFail::Literal(default))
}

fn compose<F: Filterable + ?Sized>(obj: &F, op: Operator, on_fail: OnFail) -> Result<Operator> {
    let Some(filter) = combined_predicate(obj) else {
        #[cfg(feature = "tracing")]
        tracing::trace!("unfiltered unary operand, returning operator unchanged");
        return Ok(op);
    };

    let body = bridge::downgrade(op)?.into_unary()?;

    #[cfg(feature = "tracing")]
    tracing::trace!(filters = filter.len(), policy = ?on_fail, "composed filtered unary operator");

    let filtered = FilteredUnary {
        filter,
        op: body,
        on_fail,
    };
    Ok(Operator::unary(move |x| filtered.call(x)))
}
