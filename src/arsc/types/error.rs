//! Custom error types for the arsc-entry crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum ArscError {
    /// An error originating from I/O operations while writing records.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The input ended before a declared size could be satisfied.
    #[error("Unexpected end of data while reading {context}: need {expected} bytes, but only {found} available")]
    Truncated {
        context: &'static str,
        expected: u64,
        found: u64,
    },

    /// The record is structurally invalid or a discriminator selects no known variant.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A configuration size outside the ladder of valid sizes was requested.
    #[error("Invalid config size: {0}. Expected one of 16, 28, 32, 36, 48, 52, 56, 64 or a multiple of 4 above 64")]
    InvalidConfigSize(u32),

    /// Shrinking a configuration would drop non-zero bytes.
    #[error("Cannot trim config to {size} bytes: trailing bytes are not zero")]
    TrimRejected { size: u32 },

    /// A merge precondition does not hold for the given pair of records.
    #[error("Merge rejected: {0}")]
    MergeRejected(String),

    /// JSON mirror could not be produced or parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenience `Result` type alias using the crate's `ArscError` type.
pub type Result<T> = std::result::Result<T, ArscError>;
