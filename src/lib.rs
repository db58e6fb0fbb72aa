#![forbid(unsafe_code)]
//! ewise: filtered operator composition for sparse elementwise engines.
//!
//! Facade over the workspace crates. Most callers only need the prelude:
//!
//! ```
//! use ewise::prelude::*;
//!
//! let positive = FilteredView::new().with_filter(|x| x.as_f64() > 0.0);
//! let op = filtered_unary_or_val(&positive, Builtin::Negate.into(), Value::I64(0)).unwrap();
//! assert_eq!(op.call_unary(&Value::I64(4)).unwrap(), Value::I64(-4));
//! assert_eq!(op.call_unary(&Value::I64(-4)).unwrap(), Value::I64(0));
//! ```

pub use ewise_core as core;
pub use ewise_operators as operators;

pub mod prelude {
    pub use ewise_core::prelude::*;
    pub use ewise_operators::{
        ewise_filtered_ops, filtered_unary_or_op_val, filtered_unary_or_self,
        filtered_unary_or_val, sr, to_generic, to_native_binary, to_native_unary, Builtin,
        EWiseOps, Filterable, FilteredBinarySpec, FilteredView, Operator, Semiring,
    };
}
