//! Convenient re-exports for downstream crates.

pub use crate::config::EngineConfig;
pub use crate::error::{Error, Result};
pub use crate::grid::{LocalGrid, ProcessGrid};
pub use crate::id::Rank;
pub use crate::schema::DataType;
pub use crate::types::Value;
