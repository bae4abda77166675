//! Error types for the direction engine.

use thiserror::Error;

/// Errors reported by direction computations.
#[derive(Debug, Error)]
pub enum Error {
    /// A buffer had the wrong length for the workspace dimension.
    #[error("Dimension mismatch: expected {expected}, actual {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The least-squares system was rank deficient beyond recovery.
    #[error("Matrix is singular or rank deficient")]
    SingularMatrix,

    /// A configuration value was out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A direction strategy name failed to parse.
    #[error("Unknown direction strategy: {0}")]
    UnknownStrategy(String),
}

/// Result type for direction computations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = Error::DimensionMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(e.to_string(), "Dimension mismatch: expected 4, actual 3");

        let e = Error::UnknownStrategy("newton".to_string());
        assert_eq!(e.to_string(), "Unknown direction strategy: newton");
    }
}
