//! Operator combinators.
//!
//! These build composite native operators out of other operators (`bind1st`,
//! `compose1`, ...). The engine compiles a composite by walking its parts,
//! so every part is converted to native form first. A composite is not a
//! registry builtin: the bridge cannot downgrade it, and filtering one fails
//! with `UnsupportedConversion`.

use std::any::Any;

use ewise_core::{Error, Result, Value};

use crate::bridge;
use crate::op::{NativeKernel, NativeKind, NativeOp, Operator};

#[derive(Debug, Clone)]
pub enum Composite {
    /// `x -> value`
    Set(Value),
    /// `x -> if predicate(x) { then_op(x) } else { else_op(x) }`
    IfThenElse {
        predicate: Operator,
        then_op: Operator,
        else_op: Operator,
    },
    /// `x -> op(value, x)`
    Bind1st { op: Operator, value: Value },
    /// `x -> op(x, value)`
    Bind2nd { op: Operator, value: Value },
    /// `x -> f(g(x))`
    Compose1 { f: Operator, g: Operator },
    /// `x -> f(g1(x), g2(x))`
    Compose2 {
        f: Operator,
        g1: Operator,
        g2: Operator,
    },
    /// `x -> !pred(x)`
    Not1(Operator),
    /// `(x, y) -> !pred(x, y)`
    Not2(Operator),
}

impl Composite {
    pub fn kind(&self) -> NativeKind {
        match self {
            Composite::Not1(_) => NativeKind::UnaryPredicate,
            Composite::Not2(_) => NativeKind::BinaryPredicate,
            _ => NativeKind::Unary,
        }
    }

    /// Reference evaluation, for engines without a compiled path and tests.
    pub fn apply_unary(&self, x: &Value) -> Result<Value> {
        match self {
            Composite::Set(v) => Ok(*v),
            Composite::IfThenElse {
                predicate,
                then_op,
                else_op,
            } => {
                if predicate.test_unary(x)? {
                    then_op.call_unary(x)
                } else {
                    else_op.call_unary(x)
                }
            }
            Composite::Bind1st { op, value } => op.call_binary(value, x),
            Composite::Bind2nd { op, value } => op.call_binary(x, value),
            Composite::Compose1 { f, g } => f.call_unary(&g.call_unary(x)?),
            Composite::Compose2 { f, g1, g2 } => {
                f.call_binary(&g1.call_unary(x)?, &g2.call_unary(x)?)
            }
            Composite::Not1(pred) => Ok(Value::Bool(!pred.test_unary(x)?)),
            Composite::Not2(_) => Err(Error::ArityMismatch {
                expected: 2,
                found: 1,
            }),
        }
    }

    pub fn apply_binary(&self, x: &Value, y: &Value) -> Result<Value> {
        match self {
            Composite::Not2(pred) => Ok(Value::Bool(!pred.test_binary(x, y)?)),
            _ => Err(Error::ArityMismatch {
                expected: 1,
                found: 2,
            }),
        }
    }

    fn into_operator(self) -> Operator {
        Operator::Native(NativeOp::new(self.kind(), self))
    }
}

impl NativeKernel for Composite {
    fn name(&self) -> &str {
        match self {
            Composite::Set(_) => "set",
            Composite::IfThenElse { .. } => "if_then_else",
            Composite::Bind1st { .. } => "bind1st",
            Composite::Bind2nd { .. } => "bind2nd",
            Composite::Compose1 { .. } => "compose1",
            Composite::Compose2 { .. } => "compose2",
            Composite::Not1(_) => "not1",
            Composite::Not2(_) => "not2",
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn set(value: Value) -> Operator {
    Composite::Set(value).into_operator()
}

pub fn if_then_else(predicate: Operator, then_op: Operator, else_op: Operator) -> Result<Operator> {
    Ok(Composite::IfThenElse {
        predicate: bridge::to_native_unary_predicate(predicate)?,
        then_op: bridge::to_native_unary(then_op)?,
        else_op: bridge::to_native_unary(else_op)?,
    }
    .into_operator())
}

pub fn bind1st(op: Operator, value: Value) -> Result<Operator> {
    Ok(Composite::Bind1st {
        op: bridge::to_native_binary(op)?,
        value,
    }
    .into_operator())
}

pub fn bind2nd(op: Operator, value: Value) -> Result<Operator> {
    Ok(Composite::Bind2nd {
        op: bridge::to_native_binary(op)?,
        value,
    }
    .into_operator())
}

pub fn compose1(f: Operator, g: Operator) -> Result<Operator> {
    Ok(Composite::Compose1 {
        f: bridge::to_native_unary(f)?,
        g: bridge::to_native_unary(g)?,
    }
    .into_operator())
}

pub fn compose2(f: Operator, g1: Operator, g2: Operator) -> Result<Operator> {
    Ok(Composite::Compose2 {
        f: bridge::to_native_binary(f)?,
        g1: bridge::to_native_unary(g1)?,
        g2: bridge::to_native_unary(g2)?,
    }
    .into_operator())
}

pub fn not1(pred: Operator) -> Result<Operator> {
    Ok(Composite::Not1(bridge::to_native_unary_predicate(pred)?).into_operator())
}

pub fn not2(pred: Operator) -> Result<Operator> {
    Ok(Composite::Not2(bridge::to_native_binary_predicate(pred)?).into_operator())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilteredView;
    use crate::registry::Builtin;
    use crate::unary::filtered_unary_or_self;

    #[test]
    fn test_bind_and_compose() {
        let minus_from_ten = bind1st(Builtin::Sub.into(), Value::I64(10)).unwrap();
        assert_eq!(minus_from_ten.call_unary(&Value::I64(3)).unwrap(), Value::I64(7));

        let halve = bind2nd(Builtin::Div.into(), Value::I64(2)).unwrap();
        assert_eq!(halve.call_unary(&Value::I64(9)).unwrap(), Value::I64(4));

        let abs_neg = compose1(Builtin::Negate.into(), Builtin::Abs.into()).unwrap();
        assert_eq!(abs_neg.call_unary(&Value::I64(-3)).unwrap(), Value::I64(-3));

        let square = compose2(Builtin::Mul.into(), Builtin::Id.into(), Builtin::Id.into()).unwrap();
        assert_eq!(square.call_unary(&Value::I64(4)).unwrap(), Value::I64(16));
    }

    #[test]
    fn test_if_then_else_and_set() {
        let positive = Operator::unary_predicate(|x| x.as_f64() > 0.0);
        let clamp = if_then_else(positive, Builtin::Id.into(), set(Value::I64(0))).unwrap();
        assert_eq!(clamp.call_unary(&Value::I64(5)).unwrap(), Value::I64(5));
        assert_eq!(clamp.call_unary(&Value::I64(-5)).unwrap(), Value::I64(0));
    }

    #[test]
    fn test_negations() {
        let not_zero = not1(Builtin::Not.into()).unwrap();
        assert!(not_zero.test_unary(&Value::I64(3)).unwrap());
        assert!(!not_zero.test_unary(&Value::I64(0)).unwrap());
        assert!(matches!(&not_zero, Operator::Native(n) if n.kind() == NativeKind::UnaryPredicate));

        let not_lt = not2(Builtin::Lt.into()).unwrap();
        assert!(not_lt.test_binary(&Value::I64(2), &Value::I64(1)).unwrap());
        assert!(!not_lt.test_binary(&Value::I64(1), &Value::I64(2)).unwrap());
    }

    #[test]
    fn test_composites_are_opaque_to_the_bridge() {
        let op = bind2nd(Builtin::Add.into(), Value::I64(1)).unwrap();
        assert!(bridge::is_native(&op));
        assert!(matches!(
            bridge::to_generic(op.clone()),
            Err(Error::UnsupportedConversion(_))
        ));

        let view = FilteredView::new().with_filter(|x| x.is_truthy());
        assert!(filtered_unary_or_self(&view, op).is_err());
    }

    #[test]
    fn test_engine_can_introspect_composite() {
        let op = bind1st(Builtin::Pow.into(), Value::I64(2)).unwrap();
        let Operator::Native(n) = &op else {
            panic!("expected native operator");
        };
        assert_eq!(n.name(), "bind1st");
        let composite = n.kernel().as_any().downcast_ref::<Composite>().unwrap();
        assert!(matches!(
            composite,
            Composite::Bind1st { value: Value::I64(2), .. }
        ));
    }

    #[test]
    fn test_arity_is_checked() {
        assert!(bind1st(Builtin::Abs.into(), Value::I64(1)).is_err());
        assert!(compose1(Builtin::Add.into(), Builtin::Abs.into()).is_err());
        assert!(not2(Builtin::Not.into()).is_err());
    }
}
