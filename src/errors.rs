//! Unified error types and result handling.

use thiserror::Error;

/// Errors surfaced by the reconciliation engine and its configuration layer.
///
/// Numeric edge cases (zero denominators, unparseable amounts, malformed
/// records) are deliberately NOT errors; they degrade into null percentages,
/// zero amounts and skipped records so a single bad line never takes down the
/// whole report.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record has an empty site name and cannot be attributed")]
    EmptySite,

    #[error("invalid report date '{value}': {message}")]
    InvalidDate { value: String, message: String },
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
