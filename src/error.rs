//! Custom error types for bibresolve.
//!
//! Only conditions that make a run impossible are errors: unreadable input,
//! malformed roster rows and invalid configuration. Skipped papers and
//! unmatched names are reported through logging and the run report instead.

use thiserror::Error;

/// Main error type for bibresolve operations.
#[derive(Debug, Error)]
pub enum BibError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Roster row that cannot be turned into an author record
    #[error("Malformed roster row {line}: {reason}")]
    MalformedRoster {
        /// 1-based line number in the roster source (header is line 1)
        line: u64,
        /// What is wrong with the row
        reason: String,
    },

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias using `BibError`
pub type Result<T> = std::result::Result<T, BibError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_roster_display() {
        let err = BibError::MalformedRoster {
            line: 4,
            reason: "empty family name".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed roster row 4: empty family name");
    }
}
