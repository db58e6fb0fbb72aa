//! Builtin fast-path operators and their generic equivalents.
//!
//! The engine recognizes a fixed set of compiled functors. Each one has a
//! generic (closure) equivalent so it can be composed with filters; the table
//! is built once per process and never mutated afterwards.
//!
//! `Fmod` is the one builtin without an equivalent: floating remainder and
//! floored `Mod` disagree on negative and fractional operands, so it is
//! registered as unsupported rather than mapped onto `Mod`.

use std::cmp::Ordering;

use ewise_core::{Error, Result, Value};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::op::GenericOp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Builtin {
    // binary
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Fmod,
    Pow,
    Max,
    Min,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Xor,
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    // unary
    Id,
    Abs,
    Negate,
    BitNot,
    Not,
}

impl Builtin {
    pub const COUNT: usize = 26;

    /// Every builtin, in declaration order (`ALL[b as usize] == b`).
    pub const ALL: [Builtin; Builtin::COUNT] = [
        Builtin::Add,
        Builtin::Sub,
        Builtin::Mul,
        Builtin::Div,
        Builtin::Mod,
        Builtin::Fmod,
        Builtin::Pow,
        Builtin::Max,
        Builtin::Min,
        Builtin::BitAnd,
        Builtin::BitOr,
        Builtin::BitXor,
        Builtin::And,
        Builtin::Or,
        Builtin::Xor,
        Builtin::Eq,
        Builtin::Ne,
        Builtin::Gt,
        Builtin::Lt,
        Builtin::Ge,
        Builtin::Le,
        Builtin::Id,
        Builtin::Abs,
        Builtin::Negate,
        Builtin::BitNot,
        Builtin::Not,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Add => "add",
            Builtin::Sub => "sub",
            Builtin::Mul => "mul",
            Builtin::Div => "div",
            Builtin::Mod => "mod",
            Builtin::Fmod => "fmod",
            Builtin::Pow => "pow",
            Builtin::Max => "max",
            Builtin::Min => "min",
            Builtin::BitAnd => "bit_and",
            Builtin::BitOr => "bit_or",
            Builtin::BitXor => "bit_xor",
            Builtin::And => "and",
            Builtin::Or => "or",
            Builtin::Xor => "xor",
            Builtin::Eq => "eq",
            Builtin::Ne => "ne",
            Builtin::Gt => "gt",
            Builtin::Lt => "lt",
            Builtin::Ge => "ge",
            Builtin::Le => "le",
            Builtin::Id => "id",
            Builtin::Abs => "abs",
            Builtin::Negate => "negate",
            Builtin::BitNot => "bit_not",
            Builtin::Not => "not",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Builtin::Id | Builtin::Abs | Builtin::Negate | Builtin::BitNot | Builtin::Not => 1,
            _ => 2,
        }
    }

    /// Whether a generic equivalent exists.
    pub fn is_supported(self) -> bool {
        !matches!(self, Builtin::Fmod)
    }
}

static REGISTRY: Lazy<[Result<GenericOp>; Builtin::COUNT]> =
    Lazy::new(|| Builtin::ALL.map(generic_equivalent));

/// Generic equivalent of a builtin. Repeated lookups share one closure.
pub fn lookup(builtin: Builtin) -> Result<GenericOp> {
    REGISTRY[builtin as usize].clone()
}

fn generic_equivalent(builtin: Builtin) -> Result<GenericOp> {
    let op = match builtin {
        Builtin::Add => GenericOp::binary(|x, y| x.try_add(y)),
        Builtin::Sub => GenericOp::binary(|x, y| x.try_sub(y)),
        Builtin::Mul => GenericOp::binary(|x, y| x.try_mul(y)),
        Builtin::Div => GenericOp::binary(|x, y| x.try_div(y)),
        Builtin::Mod => GenericOp::binary(|x, y| x.try_rem(y)),
        Builtin::Fmod => return Err(Error::UnsupportedBuiltin("fmod")),
        Builtin::Pow => GenericOp::binary(|x, y| x.try_pow(y)),
        Builtin::Max => GenericOp::binary(|x, y| Ok(x.max_of(y))),
        Builtin::Min => GenericOp::binary(|x, y| Ok(x.min_of(y))),
        Builtin::BitAnd => GenericOp::binary(|x, y| x.try_bit_and(y)),
        Builtin::BitOr => GenericOp::binary(|x, y| x.try_bit_or(y)),
        Builtin::BitXor => GenericOp::binary(|x, y| x.try_bit_xor(y)),
        Builtin::And => GenericOp::binary(|x, y| Ok(x.logical_and(y))),
        Builtin::Or => GenericOp::binary(|x, y| Ok(x.logical_or(y))),
        Builtin::Xor => GenericOp::binary(|x, y| Ok(x.logical_xor(y))),
        Builtin::Eq => GenericOp::binary(|x, y| Ok(Value::Bool(x.num_eq(y)))),
        Builtin::Ne => GenericOp::binary(|x, y| Ok(Value::Bool(!x.num_eq(y)))),
        Builtin::Gt => comparison(Ordering::is_gt),
        Builtin::Lt => comparison(Ordering::is_lt),
        Builtin::Ge => comparison(Ordering::is_ge),
        Builtin::Le => comparison(Ordering::is_le),
        Builtin::Id => GenericOp::unary(|x| Ok(*x)),
        Builtin::Abs => GenericOp::unary(|x| x.try_abs()),
        Builtin::Negate => GenericOp::unary(|x| x.try_neg()),
        Builtin::BitNot => GenericOp::unary(|x| x.try_bit_not()),
        Builtin::Not => GenericOp::unary(|x| Ok(x.logical_not())),
    };
    Ok(op)
}

/// NaN compares false under every ordering test.
fn comparison(test: fn(Ordering) -> bool) -> GenericOp {
    GenericOp::binary(move |x, y| Ok(Value::Bool(x.partial_cmp_num(y).is_some_and(test))))
}
