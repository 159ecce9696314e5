//! Custom error types for Splitpenny
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Splitpenny operations
#[derive(Error, Debug)]
pub enum SplitpennyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// An expense or settlement amount failed validation
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A split percentage failed validation
    #[error("Invalid percentage: {0}")]
    InvalidPercentage(String),

    /// Split percentages do not total exactly 100
    #[error("Percentages must total 100: got {percentage1} + {percentage2}")]
    PercentagesNotComplementary { percentage1: f64, percentage2: f64 },

    /// Settle-up precondition: there is nothing to settle
    #[error("No unsettled expenses to settle")]
    NoUnsettledExpenses,

    /// The atomic settlement commit did not succeed; prior state is unchanged
    #[error("Settlement commit failed: {0}")]
    SettlementCommitFailed(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl SplitpennyError {
    /// Create a "not found" error for couples
    pub fn couple_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Couple",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for settlements
    pub fn settlement_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Settlement",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error (including split-input failures)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::InvalidAmount(_)
                | Self::InvalidPercentage(_)
                | Self::PercentagesNotComplementary { .. }
        )
    }

    /// Check if this is a failed commit that the caller may retry from scratch
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SettlementCommitFailed(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for SplitpennyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SplitpennyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Splitpenny operations
pub type SplitpennyResult<T> = Result<T, SplitpennyError>;
