//! Error types.
//!
//! Two separate families:
//!
//! - [`PricingError`]: the request itself is unusable (bad input, bad
//!   configuration). Returned as `Err`.
//! - [`ReconcileFailure`]: the request was fine but no exact solution was
//!   found. This is an expected outcome and travels inside
//!   [`ReconcileOutcome::Failed`](crate::reconcile::ReconcileOutcome).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PricingError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        PricingError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        PricingError::Config {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PricingError>;

/// Why a reconciliation produced no solution.
///
/// Both variants mean "adjust manually"; they are kept apart for logging.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileFailure {
    #[error("no exact solution found within budget")]
    NoSolutionFound,

    #[error("no exact solution found within budget (time budget of {budget_ms} ms exceeded after {elapsed_ms} ms)")]
    TimeBudgetExceeded { budget_ms: u64, elapsed_ms: u64 },
}

impl ReconcileFailure {
    /// Check whether the failure was caused by the time budget
    pub fn is_timeout(&self) -> bool {
        matches!(self, ReconcileFailure::TimeBudgetExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages_share_prefix() {
        let exhausted = ReconcileFailure::NoSolutionFound.to_string();
        let timeout = ReconcileFailure::TimeBudgetExceeded {
            budget_ms: 2000,
            elapsed_ms: 2003,
        }
        .to_string();

        assert!(timeout.starts_with(&exhausted));
        assert!(timeout.contains("2000 ms"));
    }

    #[test]
    fn test_is_timeout() {
        assert!(!ReconcileFailure::NoSolutionFound.is_timeout());
        assert!(ReconcileFailure::TimeBudgetExceeded {
            budget_ms: 1,
            elapsed_ms: 2
        }
        .is_timeout());
    }

    #[test]
    fn test_invalid_input_display() {
        let err = PricingError::invalid_input("quantity must be at least 1");
        assert_eq!(err.to_string(), "Invalid input: quantity must be at least 1");
    }
}
