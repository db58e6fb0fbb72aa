#![forbid(unsafe_code)]
//! ewise-operators: filter-aware operator composition for sparse elementwise
//! kernels.
//!
//! Design intent:
//! - Unfiltered operands cost nothing: every composition returns the caller's
//!   operator untouched, so builtins keep their native fast path.
//! - Filtered operands get a generic closure that evaluates the filter chain
//!   around the original operator. Composed operators are immutable and
//!   `Send + Sync`; the engine may call them from any thread.
//! - Conversions between native and generic form go through `bridge`, backed
//!   by the process-wide builtin `registry`.

pub mod bridge;
pub mod combinators;
pub mod ewise;
pub mod filter;
pub mod op;
pub mod registry;
pub mod semiring;
pub mod unary;

pub use bridge::{
    classify, is_native, to_generic, to_native_binary, to_native_binary_obj,
    to_native_binary_predicate, to_native_unary, to_native_unary_predicate, OpClass,
};
pub use combinators::{
    bind1st, bind2nd, compose1, compose2, if_then_else, not1, not2, set, Composite,
};
pub use ewise::{ewise_filtered_ops, EWiseOps, FilteredBinarySpec};
pub use filter::{combined_predicate, Filterable, FilterPredicate, FilteredView, PredicateChain};
pub use op::{GenericOp, NativeKernel, NativeKind, NativeOp, Operator};
pub use registry::Builtin;
pub use semiring::{sr, Semiring, SemiringKind};
pub use unary::{filtered_unary_or_op_val, filtered_unary_or_self, filtered_unary_or_val};

pub use ewise_core::{Error, Result, Value};
