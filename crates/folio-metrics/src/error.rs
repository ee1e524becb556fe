//! Error types for portfolio metrics.

use thiserror::Error;

/// Result type for portfolio metrics operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// Errors that can occur while building transactions or computing metrics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    /// A date could not be parsed or constructed.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Unrecognised transaction type.
    #[error("Unknown transaction type '{value}' (expected PURCHASE, SIP, REDEMPTION, SWP or STP)")]
    InvalidTransactionKind {
        /// The rejected value.
        value: String,
    },

    /// A required field was absent from an input row.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// A field was present but could not be parsed.
    #[error("Invalid value '{value}' for field {field}")]
    InvalidField {
        /// The field name.
        field: String,
        /// The raw value.
        value: String,
    },

    /// A parsed transaction violates the input contract.
    #[error("Invalid transaction: {reason}")]
    InvalidTransaction {
        /// Why the transaction was rejected.
        reason: String,
    },

    /// Too few cash flows to define a rate of return.
    #[error("Need at least {required} cash flows, got {actual}")]
    InsufficientCashFlows {
        /// Minimum required flows.
        required: usize,
        /// Flows supplied.
        actual: usize,
    },

    /// No annualized return could be determined for the cash-flow series.
    #[error("Annualized return did not converge: {reason}")]
    ReturnUnconverged {
        /// Solver diagnostics.
        reason: String,
    },

    /// Configuration values are inconsistent.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// Decimal arithmetic overflowed.
    #[error("Arithmetic overflow in {operation}")]
    Overflow {
        /// The operation that overflowed.
        operation: String,
    },
}

impl MetricsError {
    /// Create an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Create a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid field error.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an invalid transaction error.
    #[must_use]
    pub fn invalid_transaction(reason: impl Into<String>) -> Self {
        Self::InvalidTransaction {
            reason: reason.into(),
        }
    }

    /// Create a return-unconverged error.
    #[must_use]
    pub fn unconverged(reason: impl Into<String>) -> Self {
        Self::ReturnUnconverged {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create an overflow error.
    #[must_use]
    pub fn overflow(operation: impl Into<String>) -> Self {
        Self::Overflow {
            operation: operation.into(),
        }
    }

    /// Returns true when the error only means "no rate of return exists".
    ///
    /// These are recovered into `annualized_return = None` by the calculator.
    #[must_use]
    pub fn is_undetermined_return(&self) -> bool {
        matches!(
            self,
            Self::ReturnUnconverged { .. } | Self::InsufficientCashFlows { .. }
        )
    }
}
