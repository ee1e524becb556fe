//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),

    /// Input file extension not recognised.
    #[error("Unsupported ledger format '{}'. Use .csv or .json.", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Input file could not be parsed.
    #[error("Could not parse {}: {reason}", path.display())]
    Parse {
        /// The offending file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// Requested account has no transactions.
    #[error("No transactions for account '{0}'")]
    UnknownAccount(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
