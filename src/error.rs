//! Error types for spdm

use thiserror::Error;

/// Result type alias using spdm's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur before a product kernel is entered
#[derive(Error, Debug)]
pub enum Error {
    /// Inner dimensions of the two operands disagree
    #[error("Dimension mismatch in {op}: lhs is {lhs:?}, rhs is {rhs:?}")]
    DimensionMismatch {
        /// The product being attempted
        op: &'static str,
        /// Shape of the left operand (rows, cols)
        lhs: (usize, usize),
        /// Shape of the right operand (rows, cols)
        rhs: (usize, usize),
    },

    /// A compressed structure or vector is not well formed, or has the
    /// wrong orientation for the requested operation
    #[error("Invalid structure: {reason}")]
    InvalidStructure {
        /// What is wrong with the input
        reason: String,
    },

    /// The per-call thread pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Unreachable driver path, signals a bug in the calling layer
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Error::InvalidStructure {
            reason: reason.into(),
        }
    }
}
