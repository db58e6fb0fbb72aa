//! Binary (elementwise) filter composition.
//!
//! Given two filterable operands A and B, a combine operator `op` and an
//! existence predicate `do_op`, produce a filtered pair that the engine uses
//! as follows: call `do_op(x, y)` first; only if it is truthy, call
//! `op(x, y)` to obtain the result element.
//!
//! Both outputs share one decision table (xPass = A's chain on x, yPass = B's
//! chain on y):
//!
//! | xPass | yPass | result |
//! |---|---|---|
//! | true  | true  | `orig(x, y)` |
//! | false | false | fallback |
//! | true  | false | `orig(x, b_null)` if B has a default, else fallback |
//! | false | true  | `orig(a_null, y)` if A has a default, else fallback |
//!
//! The fallback is `false` for `do_op`. For `op` it is a contract violation:
//! `do_op` already excluded that pair, so reaching it means the caller skipped
//! `do_op`.

use ewise_core::{Error, Result, Value};

use crate::bridge;
use crate::filter::{combined_predicate, Filterable, PredicateChain};
use crate::op::{BinaryFn, Operator};

/// One composition request. Consumed by `ewise_filtered_ops`.
#[derive(Debug, Clone)]
pub struct FilteredBinarySpec {
    pub op: Operator,
    /// Whether a pair yields a result at all; `None` means always.
    pub do_op: Option<Operator>,
    pub allow_a_nulls: bool,
    pub allow_b_nulls: bool,
    /// Substitute for a filtered-out A element; ignored unless `allow_a_nulls`.
    pub a_null: Option<Value>,
    /// Substitute for a filtered-out B element; ignored unless `allow_b_nulls`.
    pub b_null: Option<Value>,
}

impl FilteredBinarySpec {
    /// No existence predicate, no defaults (intersection semantics).
    pub fn new(op: Operator) -> Self {
        Self {
            op,
            do_op: None,
            allow_a_nulls: false,
            allow_b_nulls: false,
            a_null: None,
            b_null: None,
        }
    }

    pub fn with_do_op(mut self, do_op: Operator) -> Self {
        self.do_op = Some(do_op);
        self
    }

    /// Allow substituting `v` for filtered-out A elements.
    pub fn with_a_null(mut self, v: Value) -> Self {
        self.allow_a_nulls = true;
        self.a_null = Some(v);
        self
    }

    /// Allow substituting `v` for filtered-out B elements.
    pub fn with_b_null(mut self, v: Value) -> Self {
        self.allow_b_nulls = true;
        self.b_null = Some(v);
        self
    }

    pub fn allow_a_nulls(mut self, allow: bool) -> Self {
        self.allow_a_nulls = allow;
        self
    }

    pub fn allow_b_nulls(mut self, allow: bool) -> Self {
        self.allow_b_nulls = allow;
        self
    }
}

/// The operator pair handed to the engine.
#[derive(Debug, Clone)]
pub struct EWiseOps {
    pub op: Operator,
    pub do_op: Option<Operator>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Fallback {
    Value(Value),
    ContractViolation,
}

/// Decision-table functor shared by the filtered `op` and `do_op`.
pub struct FilteredBinary {
    x_filter: PredicateChain,
    y_filter: PredicateChain,
    x_default: Option<Value>,
    y_default: Option<Value>,
    orig: BinaryFn,
    fallback: Fallback,
}

impl FilteredBinary {
    pub fn call(&self, x: &Value, y: &Value) -> Result<Value> {
        let x_pass = self.x_filter.test(x);
        let y_pass = self.y_filter.test(y);

        match (x_pass, y_pass) {
            (true, true) => (self.orig)(x, y),
            (false, false) => self.fallback(x, y),
            (true, false) => match &self.y_default {
                Some(d) => (self.orig)(x, d),
                None => self.fallback(x, y),
            },
            (false, true) => match &self.x_default {
                Some(d) => (self.orig)(d, y),
                None => self.fallback(x, y),
            },
        }
    }

    fn fallback(&self, x: &Value, y: &Value) -> Result<Value> {
        match self.fallback {
            Fallback::Value(v) => Ok(v),
            Fallback::ContractViolation => {
                #[cfg(feature = "tracing")]
                tracing::error!(%x, %y, "filtered op invoked for a pair excluded by do_op");
                Err(Error::ContractViolation(format!(
                    "filtered op invoked for ({x}, {y}), a pair its do_op excludes; \
                     consult do_op before op"
                )))
            }
        }
    }
}

/// Build the filtered `(op, do_op)` pair for an elementwise operation
/// between `a` and `b`.
///
/// If neither operand is filtered, `request.op` and `request.do_op` come back
/// untouched (same objects, still native if they were). Otherwise both are
/// downgraded to generic form and wrapped, which fails for natives with no
/// generic equivalent.
pub fn ewise_filtered_ops<A, B>(a: &A, b: &B, request: FilteredBinarySpec) -> Result<EWiseOps>
where
    A: Filterable + ?Sized,
    B: Filterable + ?Sized,
{
    let a_filter = combined_predicate(a);
    let b_filter = combined_predicate(b);

    if a_filter.is_none() && b_filter.is_none() {
        #[cfg(feature = "tracing")]
        tracing::trace!("no operand filters, returning operators unchanged");
        return Ok(EWiseOps {
            op: request.op,
            do_op: request.do_op,
        });
    }

    let do_op = request
        .do_op
        .unwrap_or_else(|| Operator::binary(|_, _| Ok(Value::Bool(true))));

    let op = bridge::downgrade(request.op)?.into_binary()?;
    let do_op = bridge::downgrade(do_op)?.into_binary()?;

    let x_filter = a_filter.unwrap_or_else(PredicateChain::always_pass);
    let y_filter = b_filter.unwrap_or_else(PredicateChain::always_pass);

    let a_null = if request.allow_a_nulls { request.a_null } else { None };
    let b_null = if request.allow_b_nulls { request.b_null } else { None };

    #[cfg(feature = "tracing")]
    {
        if !request.allow_a_nulls && request.a_null.is_some() {
            tracing::debug!("A default supplied but A nulls disallowed; ignoring it");
        }
        if !request.allow_b_nulls && request.b_null.is_some() {
            tracing::debug!("B default supplied but B nulls disallowed; ignoring it");
        }
        tracing::trace!(
            a_filters = x_filter.len(),
            b_filters = y_filter.len(),
            a_default = a_null.is_some(),
            b_default = b_null.is_some(),
            "composed filtered elementwise operators"
        );
    }

    let filtered_do_op = FilteredBinary {
        x_filter: x_filter.clone(),
        y_filter: y_filter.clone(),
        x_default: a_null,
        y_default: b_null,
        orig: do_op,
        fallback: Fallback::Value(Value::Bool(false)),
    };
    let filtered_op = FilteredBinary {
        x_filter,
        y_filter,
        x_default: a_null,
        y_default: b_null,
        orig: op,
        fallback: Fallback::ContractViolation,
    };

    Ok(EWiseOps {
        op: Operator::binary(move |x, y| filtered_op.call(x, y)),
        do_op: Some(Operator::binary(move |x, y| filtered_do_op.call(x, y))),
    })
}
