use thiserror::Error;

/// Canonical result for core and the operator layer.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A native operator with no known generic equivalent had to be
    /// downgraded (boxed objects, engine kernels, composites).
    #[error("Unsupported conversion: {0}")]
    UnsupportedConversion(String),

    /// A builtin deliberately left out of generic translation.
    #[error("Unsupported builtin '{0}': no generic expression available")]
    UnsupportedBuiltin(&'static str),

    /// A filtered combine ran for a pair its existence predicate excludes.
    /// Always a caller bug: `do_op` must be consulted first.
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Arity mismatch: expected {expected}-ary operator, found {found}-ary")]
    ArityMismatch { expected: usize, found: usize },

    #[error("Type error: {0}")]
    Type(String),

    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
