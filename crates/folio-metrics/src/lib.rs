//! # Folio Metrics
//!
//! Valuation and return metrics for mutual-fund transaction ledgers.
//!
//! Given the transactions of one client, CAN or folio (each carrying the
//! scheme's current NAV), this crate computes:
//!
//! - **Current value** (AUM): Σ units × current price
//! - **Net invested**: PURCHASE + SIP − REDEMPTION − SWP
//! - **Total gain**: current value − net invested
//! - **Annualized return**: XIRR over the investor cash flows, with the current
//!   value as a terminal inflow
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: All calculations are stateless with explicit inputs
//! - **Decimal money, float rates**: Amounts stay in `rust_decimal` until the
//!   rate solve
//! - **Explicit non-convergence**: An undeterminable return is `None`, never a
//!   silent zero
//! - **Config-driven parallelism**: Optional rayon support for per-account
//!   breakdowns
//!
//! ## Quick Start
//!
//! ```rust
//! use folio_metrics::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let txns = vec![
//!     Transaction::new(
//!         Date::from_ymd(2023, 1, 15).unwrap(),
//!         TransactionKind::Sip,
//!         dec!(5000),
//!         dec!(100),
//!         dec!(62.5),
//!     )
//!     .unwrap(),
//! ];
//!
//! let as_of = Date::from_ymd(2024, 1, 15).unwrap();
//! let metrics = calculate_metrics_as_of(&txns, as_of, &MetricsConfig::default()).unwrap();
//!
//! assert_eq!(metrics.current_value, dec!(6250));
//! assert_eq!(metrics.total_gain, dec!(1250));
//! assert!(metrics.annualized_return.is_some());
//! ```
//!
//! ## Module Overview
//!
//! - [`types`] - Dates, transactions, input rows and configuration
//! - [`cashflow`] - Investor cash-flow series
//! - [`xirr`] - Annualized money-weighted return
//! - [`metrics`] - Current value, net invested, gain and the combined calculator
//! - [`grouping`] - Per-account breakdowns
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable rayon-based parallel per-account computation

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod cashflow;
pub mod error;
pub mod grouping;
pub mod metrics;
pub mod types;
pub mod xirr;

pub use error::{MetricsError, MetricsResult};

pub use types::{
    parse_rows, Date, FlowDirection, MetricsConfig, Transaction, TransactionKind,
    TransactionRow, XirrConfig,
};

pub use cashflow::{build_cash_flows, CashFlowSeries, DatedCashFlow};
pub use grouping::{filter_by_account, metrics_by_account, AccountBreakdown, UNASSIGNED_ACCOUNT};
pub use metrics::{
    calculate_current_value, calculate_metrics, calculate_metrics_as_of, calculate_net_invested,
    PortfolioMetrics,
};
pub use xirr::{xirr, XirrSolution};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cashflow::{build_cash_flows, DatedCashFlow};
    pub use crate::error::{MetricsError, MetricsResult};
    pub use crate::grouping::{filter_by_account, metrics_by_account, AccountBreakdown};
    pub use crate::metrics::{
        calculate_current_value, calculate_metrics, calculate_metrics_as_of,
        calculate_net_invested, PortfolioMetrics,
    };
    pub use crate::types::{
        Date, MetricsConfig, Transaction, TransactionKind, TransactionRow, XirrConfig,
    };
    pub use crate::xirr::xirr;
}
