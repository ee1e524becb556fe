//! Core types: dates, transactions, configuration.

mod config;
mod date;
mod transaction;

pub use config::{
    MetricsConfig, XirrConfig, DEFAULT_DAY_COUNT_BASIS, DEFAULT_INITIAL_GUESS,
    DEFAULT_LOWER_BOUND, DEFAULT_UPPER_BOUND,
};
pub use date::Date;
pub use transaction::{parse_rows, FlowDirection, Transaction, TransactionKind, TransactionRow};
