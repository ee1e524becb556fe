//! Per-account grouping of transactions.
//!
//! Metrics are meaningful per investment grouping. A ledger that mixes
//! accounts is split by the `account` field before computing metrics;
//! rows without an account land in [`UNASSIGNED_ACCOUNT`].

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, MetricsResult};
use crate::metrics::{calculate_metrics_as_of, PortfolioMetrics};
use crate::types::{Date, MetricsConfig, Transaction};

/// Key used for transactions that carry no account.
pub const UNASSIGNED_ACCOUNT: &str = "UNASSIGNED";

/// Returns the transactions that belong to `account`.
///
/// Passing [`UNASSIGNED_ACCOUNT`] selects rows without an account.
#[must_use]
pub fn filter_by_account(transactions: &[Transaction], account: &str) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|txn| account_key(txn) == account)
        .cloned()
        .collect()
}

/// Metrics per account plus the whole-ledger figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBreakdown {
    /// Metrics over every transaction.
    pub total: PortfolioMetrics,

    /// Metrics per account, ordered by account key.
    pub by_account: BTreeMap<String, PortfolioMetrics>,
}

impl AccountBreakdown {
    /// Sum of current value across accounts.
    ///
    /// Equal to `total.current_value` by construction.
    pub fn total_aum(&self) -> MetricsResult<Decimal> {
        self.by_account
            .values()
            .try_fold(Decimal::ZERO, |sum, metrics| {
                sum.checked_add(metrics.current_value)
                    .ok_or_else(|| MetricsError::overflow("total AUM"))
            })
    }

    /// Number of accounts.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.by_account.len()
    }

    /// Metrics for one account.
    #[must_use]
    pub fn get(&self, account: &str) -> Option<&PortfolioMetrics> {
        self.by_account.get(account)
    }
}

/// Computes metrics for every account in the ledger and for the ledger
/// as a whole.
///
/// Accounts are computed in parallel when the `parallel` feature is on and
/// the account count reaches `config.parallel_threshold`.
pub fn metrics_by_account(
    transactions: &[Transaction],
    as_of: Date,
    config: &MetricsConfig,
) -> MetricsResult<AccountBreakdown> {
    let total = calculate_metrics_as_of(transactions, as_of, config)?;

    let mut groups: BTreeMap<String, Vec<Transaction>> = BTreeMap::new();
    for txn in transactions {
        groups
            .entry(account_key(txn).to_string())
            .or_default()
            .push(txn.clone());
    }
    let groups: Vec<(String, Vec<Transaction>)> = groups.into_iter().collect();

    log::debug!(
        "computing metrics for {} account(s) as of {as_of}",
        groups.len()
    );

    let results = maybe_parallel_map(&groups, config, |(account, txns)| {
        calculate_metrics_as_of(txns, as_of, config).map(|metrics| (account.clone(), metrics))
    });

    let by_account = results.into_iter().collect::<MetricsResult<BTreeMap<_, _>>>()?;

    Ok(AccountBreakdown { total, by_account })
}

fn account_key(txn: &Transaction) -> &str {
    txn.account().unwrap_or(UNASSIGNED_ACCOUNT)
}

#[allow(unused_variables)]
fn maybe_parallel_map<T, U, F>(items: &[T], config: &MetricsConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}
