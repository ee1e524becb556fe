//! Investor cash-flow series derived from transactions.
//!
//! Signs are from the investor's pocket: money paid into a scheme is
//! negative, money received (redemptions, withdrawals, and the terminal
//! market value) is positive.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, MetricsResult};
use crate::types::{Date, FlowDirection, Transaction};

/// A single dated cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedCashFlow {
    /// Settlement date.
    pub date: Date,
    /// Signed amount (negative = paid by the investor).
    pub amount: f64,
}

impl DatedCashFlow {
    /// Creates a cash flow.
    #[must_use]
    pub fn new(date: Date, amount: f64) -> Self {
        Self { date, amount }
    }
}

/// Cash flows for one grouping, in date order, ending with the terminal value.
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowSeries {
    flows: Vec<DatedCashFlow>,
    excluded_transfers: usize,
}

impl CashFlowSeries {
    /// The flows, sorted by date.
    #[must_use]
    pub fn flows(&self) -> &[DatedCashFlow] {
        &self.flows
    }

    /// Number of STP rows left out of the series.
    #[must_use]
    pub fn excluded_transfers(&self) -> usize {
        self.excluded_transfers
    }

    /// Number of flows, terminal value included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// True when the series holds no flows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

/// Builds the investor cash-flow series.
///
/// PURCHASE and SIP become `-amount`, REDEMPTION and SWP become `+amount`,
/// STP rows are skipped and counted. A final `+terminal_value` flow dated
/// `as_of` is appended. The input slice is left untouched; the result is
/// sorted by date with the original order kept among equal dates.
pub fn build_cash_flows(
    transactions: &[Transaction],
    terminal_value: Decimal,
    as_of: Date,
) -> MetricsResult<CashFlowSeries> {
    let mut flows = Vec::with_capacity(transactions.len() + 1);
    let mut excluded_transfers = 0;

    for txn in transactions {
        let Some(direction) = txn.kind().flow_direction() else {
            excluded_transfers += 1;
            continue;
        };
        let magnitude = to_f64(txn.amount(), "transaction amount")?;
        let amount = match direction {
            FlowDirection::Invest => -magnitude,
            FlowDirection::Withdraw => magnitude,
        };
        flows.push(DatedCashFlow::new(txn.date(), amount));
    }

    flows.sort_by_key(|flow| flow.date);
    flows.push(DatedCashFlow::new(
        as_of,
        to_f64(terminal_value, "terminal value")?,
    ));

    if excluded_transfers > 0 {
        log::debug!("excluded {excluded_transfers} STP transaction(s) from the cash-flow series");
    }

    Ok(CashFlowSeries {
        flows,
        excluded_transfers,
    })
}

fn to_f64(value: Decimal, what: &str) -> MetricsResult<f64> {
    value.to_f64().ok_or_else(|| {
        MetricsError::invalid_transaction(format!("{what} {value} is not representable"))
    })
}
