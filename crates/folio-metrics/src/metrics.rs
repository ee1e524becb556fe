//! Portfolio valuation metrics.
//!
//! Computes, for the transactions of one grouping:
//!
//! - **Current value** (AUM): Σ units × current price
//! - **Net invested**: acquisitions minus disposals
//! - **Total gain**: current value − net invested
//! - **Annualized return**: XIRR of the investor cash flows plus the current
//!   value as a terminal inflow

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cashflow::build_cash_flows;
use crate::error::{MetricsError, MetricsResult};
use crate::types::{Date, MetricsConfig, Transaction};
use crate::xirr::xirr;

/// Aggregate metrics for one investment grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    /// Σ units × current price.
    pub current_value: Decimal,

    /// Capital put in minus capital taken out. STP rows do not count.
    pub net_invested: Decimal,

    /// `current_value - net_invested`.
    pub total_gain: Decimal,

    /// Annualized money-weighted return as a fraction.
    /// `None` when no rate could be determined.
    pub annualized_return: Option<f64>,

    /// Date of the terminal cash flow.
    pub as_of: Date,

    /// Transactions considered.
    pub transaction_count: usize,

    /// STP transactions left out of net invested and the cash-flow series.
    pub excluded_transfers: usize,
}

impl PortfolioMetrics {
    /// Metrics of an empty grouping: every amount is zero.
    #[must_use]
    pub fn empty(as_of: Date) -> Self {
        Self {
            current_value: Decimal::ZERO,
            net_invested: Decimal::ZERO,
            total_gain: Decimal::ZERO,
            annualized_return: None,
            as_of,
            transaction_count: 0,
            excluded_transfers: 0,
        }
    }

    /// Annualized return with "undetermined" collapsed to zero.
    #[must_use]
    pub fn annualized_return_or_zero(&self) -> f64 {
        self.annualized_return.unwrap_or(0.0)
    }

    /// True if an annualized return was determined.
    #[must_use]
    pub fn has_annualized_return(&self) -> bool {
        self.annualized_return.is_some()
    }

    /// Absolute return on net invested capital (`total_gain / net_invested`).
    ///
    /// `None` when nothing is net invested.
    #[must_use]
    pub fn absolute_return(&self) -> Option<Decimal> {
        if self.net_invested <= Decimal::ZERO {
            return None;
        }
        self.total_gain.checked_div(self.net_invested)
    }
}

/// Σ units × current price. Zero for an empty slice.
pub fn calculate_current_value(transactions: &[Transaction]) -> MetricsResult<Decimal> {
    transactions.iter().try_fold(Decimal::ZERO, |total, txn| {
        total
            .checked_add(txn.market_value()?)
            .ok_or_else(|| MetricsError::overflow("current value"))
    })
}

/// Σ amount for PURCHASE/SIP minus Σ amount for REDEMPTION/SWP.
///
/// STP rows contribute nothing. Zero for an empty slice.
pub fn calculate_net_invested(transactions: &[Transaction]) -> MetricsResult<Decimal> {
    transactions
        .iter()
        .filter_map(Transaction::invested_amount)
        .try_fold(Decimal::ZERO, |total, amount| {
            total
                .checked_add(amount)
                .ok_or_else(|| MetricsError::overflow("net invested"))
        })
}

/// Computes metrics with today's local date as the terminal date.
///
/// See [`calculate_metrics_as_of`].
pub fn calculate_metrics(transactions: &[Transaction]) -> MetricsResult<PortfolioMetrics> {
    calculate_metrics_as_of(transactions, Date::today(), &MetricsConfig::default())
}

/// Computes metrics for a grouping as of a given date.
///
/// A failed return solve is not an error: it is logged and reported as
/// `annualized_return = None`. Only arithmetic overflow and invalid
/// configuration are returned as errors.
///
/// # Example
///
/// ```rust
/// use folio_metrics::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let as_of = Date::from_ymd(2024, 6, 30).unwrap();
/// let bought = as_of.add_years(-1).unwrap();
/// let txns = vec![
///     Transaction::new(bought, TransactionKind::Purchase, dec!(10000), dec!(100), dec!(150)).unwrap(),
/// ];
///
/// let metrics = calculate_metrics_as_of(&txns, as_of, &MetricsConfig::default()).unwrap();
/// assert_eq!(metrics.current_value, dec!(15000));
/// assert_eq!(metrics.total_gain, dec!(5000));
/// assert!((metrics.annualized_return.unwrap() - 0.5).abs() < 1e-2);
/// ```
pub fn calculate_metrics_as_of(
    transactions: &[Transaction],
    as_of: Date,
    config: &MetricsConfig,
) -> MetricsResult<PortfolioMetrics> {
    config.validate()?;

    if transactions.is_empty() {
        return Ok(PortfolioMetrics::empty(as_of));
    }

    let current_value = calculate_current_value(transactions)?;
    let net_invested = calculate_net_invested(transactions)?;
    let total_gain = current_value
        .checked_sub(net_invested)
        .ok_or_else(|| MetricsError::overflow("total gain"))?;

    let series = build_cash_flows(transactions, current_value, as_of)?;
    let annualized_return = match xirr(series.flows(), &config.xirr) {
        Ok(solution) => Some(solution.rate),
        Err(err) if err.is_undetermined_return() => {
            log::warn!(
                "annualized return undetermined for {} transaction(s) as of {as_of}: {err}",
                transactions.len()
            );
            None
        }
        Err(err) => return Err(err),
    };

    Ok(PortfolioMetrics {
        current_value,
        net_invested,
        total_gain,
        annualized_return,
        as_of,
        transaction_count: transactions.len(),
        excluded_transfers: series.excluded_transfers(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn as_of() -> Date {
        Date::from_ymd(2024, 6, 30).unwrap()
    }

    fn txn(
        date: Date,
        kind: TransactionKind,
        amount: Decimal,
        units: Decimal,
        price: Decimal,
    ) -> Transaction {
        Transaction::new(date, kind, amount, units, price).unwrap()
    }

    #[test]
    fn test_empty_is_all_zero() {
        let metrics = calculate_metrics_as_of(&[], as_of(), &MetricsConfig::default()).unwrap();

        assert_eq!(metrics.current_value, Decimal::ZERO);
        assert_eq!(metrics.net_invested, Decimal::ZERO);
        assert_eq!(metrics.total_gain, Decimal::ZERO);
        assert_eq!(metrics.annualized_return, None);
        assert_eq!(metrics.annualized_return_or_zero(), 0.0);
        assert_eq!(metrics.transaction_count, 0);
    }

    #[test]
    fn test_wall_clock_entry_point_on_empty_input() {
        let metrics = calculate_metrics(&[]).unwrap();
        assert_eq!(metrics.current_value, Decimal::ZERO);
        assert_eq!(metrics.annualized_return_or_zero(), 0.0);
    }

    #[test]
    fn test_single_purchase_one_year() {
        let bought = as_of().add_years(-1).unwrap();
        let txns = vec![txn(
            bought,
            TransactionKind::Purchase,
            dec!(10000),
            dec!(100),
            dec!(150),
        )];

        let metrics = calculate_metrics_as_of(&txns, as_of(), &MetricsConfig::default()).unwrap();

        assert_eq!(metrics.current_value, dec!(15000));
        assert_eq!(metrics.net_invested, dec!(10000));
        assert_eq!(metrics.total_gain, dec!(5000));
        let years = bought.days_between(&as_of()) as f64 / 365.25;
        assert_relative_eq!(
            metrics.annualized_return.unwrap(),
            1.5_f64.powf(1.0 / years) - 1.0,
            epsilon = 1e-9
        );
        assert_eq!(metrics.absolute_return(), Some(dec!(0.5)));
    }

    #[test]
    fn test_redemption_reduces_net_invested() {
        let start = Date::from_ymd(2023, 1, 2).unwrap();
        let txns = vec![
            txn(start, TransactionKind::Purchase, dec!(10000), dec!(100), dec!(130)),
            txn(
                start.add_days(180).unwrap(),
                TransactionKind::Redemption,
                dec!(2400),
                dec!(-20),
                dec!(130),
            ),
            txn(start.add_days(200).unwrap(), TransactionKind::Swp, dec!(600), dec!(-5), dec!(130)),
        ];

        let metrics = calculate_metrics_as_of(&txns, as_of(), &MetricsConfig::default()).unwrap();

        assert_eq!(metrics.current_value, dec!(9750));
        assert_eq!(metrics.net_invested, dec!(7000));
        assert_eq!(metrics.total_gain, dec!(2750));
        assert!(metrics.annualized_return.unwrap() > 0.0);
    }

    #[test]
    fn test_stp_counts_toward_value_only() {
        let start = Date::from_ymd(2023, 6, 30).unwrap();
        let txns = vec![
            txn(start, TransactionKind::Purchase, dec!(1000), dec!(10), dec!(120)),
            txn(start.add_days(30).unwrap(), TransactionKind::Stp, dec!(500), dec!(4), dec!(120)),
        ];

        let metrics = calculate_metrics_as_of(&txns, as_of(), &MetricsConfig::default()).unwrap();

        assert_eq!(metrics.current_value, dec!(1680));
        assert_eq!(metrics.net_invested, dec!(1000));
        assert_eq!(metrics.excluded_transfers, 1);
        assert_eq!(metrics.transaction_count, 2);
    }

    #[test]
    fn test_unconverged_return_is_none() {
        // Everything written off: no inflow ever offsets the purchase.
        let txns = vec![txn(
            Date::from_ymd(2023, 1, 1).unwrap(),
            TransactionKind::Purchase,
            dec!(5000),
            dec!(50),
            dec!(0),
        )];

        let metrics = calculate_metrics_as_of(&txns, as_of(), &MetricsConfig::default()).unwrap();

        assert_eq!(metrics.current_value, Decimal::ZERO);
        assert_eq!(metrics.total_gain, dec!(-5000));
        assert_eq!(metrics.annualized_return, None);
        assert_eq!(metrics.annualized_return_or_zero(), 0.0);
        assert!(!metrics.has_annualized_return());
    }

    #[test]
    fn test_bought_today_at_cost_is_zero_return() {
        let txns = vec![txn(as_of(), TransactionKind::Purchase, dec!(1000), dec!(10), dec!(100))];

        let metrics = calculate_metrics_as_of(&txns, as_of(), &MetricsConfig::default()).unwrap();

        assert_eq!(metrics.total_gain, Decimal::ZERO);
        assert_eq!(metrics.annualized_return, Some(0.0));
    }

    #[test]
    fn test_only_transfers_gives_no_return() {
        let txns = vec![txn(
            Date::from_ymd(2024, 1, 1).unwrap(),
            TransactionKind::Stp,
            dec!(500),
            dec!(5),
            dec!(100),
        )];

        let metrics = calculate_metrics_as_of(&txns, as_of(), &MetricsConfig::default()).unwrap();

        assert_eq!(metrics.net_invested, Decimal::ZERO);
        assert_eq!(metrics.current_value, dec!(500));
        assert_eq!(metrics.annualized_return, None);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let config = MetricsConfig::default()
            .with_xirr(crate::types::XirrConfig::new().with_bounds(1.0, 0.0));
        assert!(matches!(
            calculate_metrics_as_of(&[], as_of(), &config),
            Err(MetricsError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_overflow_is_reported() {
        let txns = vec![txn(
            as_of(),
            TransactionKind::Purchase,
            dec!(1),
            Decimal::MAX,
            dec!(2),
        )];

        assert!(matches!(
            calculate_current_value(&txns),
            Err(MetricsError::Overflow { .. })
        ));
    }

    #[test]
    fn test_absolute_return_without_capital() {
        let mut metrics = PortfolioMetrics::empty(as_of());
        assert_eq!(metrics.absolute_return(), None);

        metrics.net_invested = dec!(-100);
        assert_eq!(metrics.absolute_return(), None);
    }
}
