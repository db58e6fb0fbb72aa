//! Element data types. Pure data; the engine maps these onto its own storage.
//!
//! The `types.rs` module holds the `Value` carried through operators; this
//! module only names the type lattice used for numeric promotion.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int64,
    Float64,
}

impl DataType {
    /// Common type for a binary arithmetic operation.
    ///
    /// Booleans take part in arithmetic as integers; any float operand
    /// makes the result a float.
    pub fn promote(a: DataType, b: DataType) -> DataType {
        use DataType::*;
        match (a, b) {
            (Float64, _) | (_, Float64) => Float64,
            _ => Int64,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::Boolean => "bool",
            DataType::Int64 => "int",
            DataType::Float64 => "float",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promote() {
        assert_eq!(DataType::promote(DataType::Boolean, DataType::Boolean), DataType::Int64);
        assert_eq!(DataType::promote(DataType::Int64, DataType::Boolean), DataType::Int64);
        assert_eq!(DataType::promote(DataType::Int64, DataType::Float64), DataType::Float64);
        assert_eq!(DataType::promote(DataType::Float64, DataType::Boolean), DataType::Float64);
    }
}
