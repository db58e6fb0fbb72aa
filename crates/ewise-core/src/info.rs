//! Numeric limits and build identification.

pub const VERSION: &str = "0.2.x";
pub const REVISION: &str = "r7xx";

/// IEEE double precision machine epsilon.
pub fn eps() -> f64 {
    f64::EPSILON
}

/// Smallest integer the engine treats as a valid element value; used as a
/// "minus infinity" sentinel for integer max-reductions.
pub fn min_int() -> i64 {
    -(1_i64 << 62)
}

pub fn version() -> &'static str {
    VERSION
}

pub fn revision() -> &'static str {
    REVISION
}
