//! Conversion between generic and native operator representations.
//!
//! Boxing a generic closure into a native category always works (for a
//! matching arity). Going the other way only works for builtins, through the
//! registry; anything else native is a dead end.

use ewise_core::{Error, Result};

use crate::op::{GenericOp, NativeKind, NativeOp, Operator};
use crate::registry;

/// Representation class of an operator as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpClass {
    NativeUnary,
    NativeBinary,
    NativeUnaryPredicate,
    NativeBinaryPredicate,
    Generic,
}

pub fn classify(op: &Operator) -> OpClass {
    match op {
        Operator::Builtin(b) if b.arity() == 1 => OpClass::NativeUnary,
        Operator::Builtin(_) => OpClass::NativeBinary,
        Operator::Native(n) => match n.kind() {
            NativeKind::Unary => OpClass::NativeUnary,
            NativeKind::Binary => OpClass::NativeBinary,
            NativeKind::UnaryPredicate => OpClass::NativeUnaryPredicate,
            NativeKind::BinaryPredicate => OpClass::NativeBinaryPredicate,
        },
        Operator::Generic(_) => OpClass::Generic,
    }
}

/// True iff the operator is in any of the four native categories.
pub fn is_native(op: &Operator) -> bool {
    classify(op) != OpClass::Generic
}

pub fn to_native_unary(op: Operator) -> Result<Operator> {
    to_native(op, NativeKind::Unary)
}

pub fn to_native_binary(op: Operator) -> Result<Operator> {
    to_native(op, NativeKind::Binary)
}

pub fn to_native_unary_predicate(op: Operator) -> Result<Operator> {
    to_native(op, NativeKind::UnaryPredicate)
}

pub fn to_native_binary_predicate(op: Operator) -> Result<Operator> {
    to_native(op, NativeKind::BinaryPredicate)
}

/// Builtins are accepted as-is in both the function and the predicate
/// category of their arity; other natives are re-tagged when their category
/// differs; generics are boxed.
fn to_native(op: Operator, target: NativeKind) -> Result<Operator> {
    if op.arity() != target.arity() {
        return Err(Error::ArityMismatch {
            expected: target.arity(),
            found: op.arity(),
        });
    }
    match op {
        Operator::Builtin(_) => Ok(op),
        Operator::Native(ref n) if n.kind() == target => Ok(op),
        Operator::Native(n) => Ok(Operator::Native(n.with_kind(target))),
        Operator::Generic(g) => Ok(Operator::Native(NativeOp::boxed(target, g))),
    }
}

/// Always hand the engine a boxed binary object.
///
/// Builtins are re-boxed through their generic equivalent; a native that is
/// not a boxed closure has no equivalent and fails.
pub fn to_native_binary_obj(op: Operator) -> Result<Operator> {
    if op.arity() != 2 {
        return Err(Error::ArityMismatch {
            expected: 2,
            found: op.arity(),
        });
    }
    match op {
        Operator::Native(ref n) if n.as_boxed().is_some() => {
            if n.kind() == NativeKind::Binary {
                Ok(op)
            } else {
                Ok(Operator::Native(n.with_kind(NativeKind::Binary)))
            }
        }
        Operator::Native(_) | Operator::Builtin(_) => {
            let generic = to_generic(op)?;
            to_native_binary(generic)
        }
        Operator::Generic(g) => Ok(Operator::Native(NativeOp::boxed(NativeKind::Binary, g))),
    }
}

/// Downgrade to a generic closure.
///
/// Errors: `UnsupportedBuiltin` for builtins deliberately left out of the
/// registry, `UnsupportedConversion` for any other native.
pub fn to_generic(op: Operator) -> Result<Operator> {
    match op {
        Operator::Generic(_) => Ok(op),
        other => downgrade(other).map(Operator::Generic),
    }
}

/// `to_generic`, unwrapped to the closure itself.
pub(crate) fn downgrade(op: Operator) -> Result<GenericOp> {
    match op {
        Operator::Generic(g) => Ok(g),
        Operator::Builtin(b) => {
            let generic = registry::lookup(b)?;
            #[cfg(feature = "tracing")]
            tracing::trace!(builtin = b.name(), "downgraded builtin to generic form");
            Ok(generic)
        }
        Operator::Native(n) => Err(Error::UnsupportedConversion(format!(
            "unable to convert native functor '{}' ({:?}) back to a generic expression",
            n.name(),
            n.kind()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Builtin;
    use ewise_core::Value;

    #[test]
    fn test_classify() {
        assert_eq!(classify(&Builtin::Abs.into()), OpClass::NativeUnary);
        assert_eq!(classify(&Builtin::Max.into()), OpClass::NativeBinary);
        assert_eq!(classify(&Operator::unary(|x| Ok(*x))), OpClass::Generic);

        let pred = to_native_unary_predicate(Operator::unary_predicate(|x| x.is_truthy())).unwrap();
        assert_eq!(classify(&pred), OpClass::NativeUnaryPredicate);
        assert!(is_native(&pred));
    }

    #[test]
    fn test_to_native_is_idempotent() {
        let boxed = to_native_binary(Operator::binary(|x, y| x.try_mul(y))).unwrap();
        let again = to_native_binary(boxed.clone()).unwrap();
        assert!(boxed.same(&again));

        let builtin = Operator::from(Builtin::Lt);
        assert!(to_native_binary_predicate(builtin.clone()).unwrap().same(&builtin));
        assert!(to_native_binary(builtin.clone()).unwrap().same(&builtin));
    }

    #[test]
    fn test_to_native_rejects_wrong_arity() {
        let err = to_native_binary(Operator::unary(|x| Ok(*x))).unwrap_err();
        assert_eq!(
            err,
            Error::ArityMismatch {
                expected: 2,
                found: 1
            }
        );
        assert!(to_native_unary(Builtin::Add.into()).is_err());
    }

    #[test]
    fn test_boxing_is_not_reversible() {
        let boxed = to_native_unary(Operator::unary(|x| x.try_neg())).unwrap();
        assert!(matches!(
            to_generic(boxed.clone()),
            Err(Error::UnsupportedConversion(_))
        ));
        // Still executable in-process.
        assert_eq!(boxed.call_unary(&Value::I64(2)).unwrap(), Value::I64(-2));
    }

    #[test]
    fn test_to_generic() {
        let g = Operator::binary(|x, y| x.try_sub(y));
        assert!(to_generic(g.clone()).unwrap().same(&g));

        let add = to_generic(Builtin::Add.into()).unwrap();
        assert_eq!(classify(&add), OpClass::Generic);
        assert_eq!(
            add.call_binary(&Value::I64(2), &Value::I64(2)).unwrap(),
            Value::I64(4)
        );

        assert_eq!(
            to_generic(Builtin::Fmod.into()).unwrap_err(),
            Error::UnsupportedBuiltin("fmod")
        );
    }

    #[test]
    fn test_to_native_binary_obj() {
        let from_builtin = to_native_binary_obj(Builtin::Add.into()).unwrap();
        match &from_builtin {
            Operator::Native(n) => {
                assert_eq!(n.kind(), NativeKind::Binary);
                assert!(n.as_boxed().is_some());
            }
            other => panic!("expected native, got {other:?}"),
        }
        assert!(to_native_binary_obj(from_builtin.clone())
            .unwrap()
            .same(&from_builtin));
        assert!(to_native_binary_obj(Builtin::Fmod.into()).is_err());
    }
}
