#![forbid(unsafe_code)]
//! ewise-core: the shared vocabulary of the ewise operator layer.
//!
//! Pure data and small helpers only: the element `Value` model, the error
//! type every layer reports through, engine configuration, numeric info and
//! process-role queries. No operator logic lives here; see `ewise-operators`.

pub mod config;
pub mod error;
pub mod grid;
pub mod id;
pub mod info;
pub mod prelude;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
pub use types::Value;
