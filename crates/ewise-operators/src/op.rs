//! Operator representations.
//!
//! An operator is in exactly one representation at a time:
//!
//! - `Builtin`: a fast-path functor the engine compiles natively. Recognized
//!   by variant, so it can always be turned back into a closure via the
//!   registry (except `Fmod`).
//! - `Native`: any other engine-side functor, tagged with its category. This
//!   covers generic closures boxed for the engine and composite kernels built
//!   by the combinators. Its logic cannot be recovered as a closure.
//! - `Generic`: a plain closure over `Value`s; always callable and
//!   composable with filters.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use ewise_core::{Error, Result, Value};

use crate::combinators::Composite;
use crate::registry::{self, Builtin};

pub type UnaryFn = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;
pub type BinaryFn = Arc<dyn Fn(&Value, &Value) -> Result<Value> + Send + Sync>;

#[derive(Clone)]
pub enum GenericOp {
    Unary(UnaryFn),
    Binary(BinaryFn),
}

impl GenericOp {
    pub fn unary<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        GenericOp::Unary(Arc::new(f))
    }

    pub fn binary<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        GenericOp::Binary(Arc::new(f))
    }

    pub fn arity(&self) -> usize {
        match self {
            GenericOp::Unary(_) => 1,
            GenericOp::Binary(_) => 2,
        }
    }

    pub fn call_unary(&self, x: &Value) -> Result<Value> {
        match self {
            GenericOp::Unary(f) => f(x),
            GenericOp::Binary(_) => Err(Error::ArityMismatch {
                expected: 1,
                found: 2,
            }),
        }
    }

    pub fn call_binary(&self, x: &Value, y: &Value) -> Result<Value> {
        match self {
            GenericOp::Binary(f) => f(x, y),
            GenericOp::Unary(_) => Err(Error::ArityMismatch {
                expected: 2,
                found: 1,
            }),
        }
    }

    pub fn into_unary(self) -> Result<UnaryFn> {
        match self {
            GenericOp::Unary(f) => Ok(f),
            GenericOp::Binary(_) => Err(Error::ArityMismatch {
                expected: 1,
                found: 2,
            }),
        }
    }

    pub fn into_binary(self) -> Result<BinaryFn> {
        match self {
            GenericOp::Binary(f) => Ok(f),
            GenericOp::Unary(_) => Err(Error::ArityMismatch {
                expected: 2,
                found: 1,
            }),
        }
    }

    /// Same closure object (not merely equivalent behavior).
    pub fn ptr_eq(&self, other: &GenericOp) -> bool {
        match (self, other) {
            (GenericOp::Unary(a), GenericOp::Unary(b)) => Arc::ptr_eq(a, b),
            (GenericOp::Binary(a), GenericOp::Binary(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for GenericOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericOp::Unary(_) => f.write_str("GenericOp::Unary(..)"),
            GenericOp::Binary(_) => f.write_str("GenericOp::Binary(..)"),
        }
    }
}

/// The four categories the engine accepts natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKind {
    Unary,
    Binary,
    UnaryPredicate,
    BinaryPredicate,
}

impl NativeKind {
    pub fn arity(self) -> usize {
        match self {
            NativeKind::Unary | NativeKind::UnaryPredicate => 1,
            NativeKind::Binary | NativeKind::BinaryPredicate => 2,
        }
    }

    pub fn is_predicate(self) -> bool {
        matches!(self, NativeKind::UnaryPredicate | NativeKind::BinaryPredicate)
    }
}

/// An engine-side functor body.
///
/// The engine downcasts through `as_any` to find out how to run it; this
/// crate only ever needs its name for diagnostics.
pub trait NativeKernel: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

/// A generic closure boxed so the engine can hold it in a native slot.
pub struct BoxedGeneric {
    op: GenericOp,
}

impl BoxedGeneric {
    pub fn op(&self) -> &GenericOp {
        &self.op
    }
}

impl NativeKernel for BoxedGeneric {
    fn name(&self) -> &str {
        match self.op {
            GenericOp::Unary(_) => "boxed_unary",
            GenericOp::Binary(_) => "boxed_binary",
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Clone)]
pub struct NativeOp {
    kind: NativeKind,
    kernel: Arc<dyn NativeKernel>,
}

impl NativeOp {
    pub fn new<K: NativeKernel>(kind: NativeKind, kernel: K) -> Self {
        Self {
            kind,
            kernel: Arc::new(kernel),
        }
    }

    pub(crate) fn boxed(kind: NativeKind, op: GenericOp) -> Self {
        Self::new(kind, BoxedGeneric { op })
    }

    pub fn kind(&self) -> NativeKind {
        self.kind
    }

    pub fn kernel(&self) -> &dyn NativeKernel {
        self.kernel.as_ref()
    }

    pub fn name(&self) -> &str {
        self.kernel.name()
    }

    /// The boxed closure, if this native wraps one.
    pub fn as_boxed(&self) -> Option<&BoxedGeneric> {
        self.kernel.as_any().downcast_ref::<BoxedGeneric>()
    }

    /// Same kernel viewed under another category of the same arity.
    pub(crate) fn with_kind(&self, kind: NativeKind) -> Self {
        Self {
            kind,
            kernel: Arc::clone(&self.kernel),
        }
    }

    pub fn ptr_eq(&self, other: &NativeOp) -> bool {
        self.kind == other.kind && Arc::ptr_eq(&self.kernel, &other.kernel)
    }
}

impl fmt::Debug for NativeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeOp")
            .field("kind", &self.kind)
            .field("kernel", &self.kernel.name())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum Operator {
    Builtin(Builtin),
    Native(NativeOp),
    Generic(GenericOp),
}

impl Operator {
    pub fn unary<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        Operator::Generic(GenericOp::unary(f))
    }

    pub fn binary<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        Operator::Generic(GenericOp::binary(f))
    }

    /// A generic unary predicate from a plain `bool` test.
    pub fn unary_predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Operator::unary(move |x| Ok(Value::Bool(f(x))))
    }

    /// A generic binary predicate from a plain `bool` test.
    pub fn binary_predicate<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        Operator::binary(move |x, y| Ok(Value::Bool(f(x, y))))
    }

    pub fn arity(&self) -> usize {
        match self {
            Operator::Builtin(b) => b.arity(),
            Operator::Native(n) => n.kind().arity(),
            Operator::Generic(g) => g.arity(),
        }
    }

    /// Identity comparison: true only for the very same operator object
    /// (or the same builtin).
    pub fn same(&self, other: &Operator) -> bool {
        match (self, other) {
            (Operator::Builtin(a), Operator::Builtin(b)) => a == b,
            (Operator::Native(a), Operator::Native(b)) => a.ptr_eq(b),
            (Operator::Generic(a), Operator::Generic(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Closure that evaluates this operator in-process.
    ///
    /// Builtins resolve through the registry; boxed natives expose their
    /// closure. Composites are walked by `call_*` directly. Any other native
    /// only runs inside the engine.
    fn evaluator(&self) -> Result<GenericOp> {
        match self {
            Operator::Generic(g) => Ok(g.clone()),
            Operator::Builtin(b) => registry::lookup(*b),
            Operator::Native(n) => match n.as_boxed() {
                Some(boxed) => Ok(boxed.op().clone()),
                None => Err(Error::UnsupportedConversion(format!(
                    "native kernel '{}' can only be executed by the engine",
                    n.name()
                ))),
            },
        }
    }

    fn as_composite(&self) -> Option<&Composite> {
        match self {
            Operator::Native(n) => n.kernel().as_any().downcast_ref::<Composite>(),
            _ => None,
        }
    }

    pub fn call_unary(&self, x: &Value) -> Result<Value> {
        if let Some(composite) = self.as_composite() {
            return composite.apply_unary(x);
        }
        self.evaluator()?.call_unary(x)
    }

    pub fn call_binary(&self, x: &Value, y: &Value) -> Result<Value> {
        if let Some(composite) = self.as_composite() {
            return composite.apply_binary(x, y);
        }
        self.evaluator()?.call_binary(x, y)
    }

    /// Evaluate as a predicate: the result's truthiness.
    pub fn test_unary(&self, x: &Value) -> Result<bool> {
        self.call_unary(x).map(|v| v.is_truthy())
    }

    pub fn test_binary(&self, x: &Value, y: &Value) -> Result<bool> {
        self.call_binary(x, y).map(|v| v.is_truthy())
    }
}

impl From<Builtin> for Operator {
    fn from(b: Builtin) -> Self {
        Operator::Builtin(b)
    }
}

impl From<GenericOp> for Operator {
    fn from(g: GenericOp) -> Self {
        Operator::Generic(g)
    }
}

impl From<NativeOp> for Operator {
    fn from(n: NativeOp) -> Self {
        Operator::Native(n)
    }
}
