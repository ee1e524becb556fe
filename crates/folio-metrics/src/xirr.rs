//! Annualized money-weighted return (XIRR).
//!
//! Finds the rate `r` for which
//!
//! ```text
//! NPV(r) = Σ cf_i / (1 + r)^(d_i / B) = 0
//! ```
//!
//! where `d_i` is the signed day count from the earliest flow and `B` the
//! day-count basis (365.25 by default). Anchoring on the earliest flow
//! scales NPV by a positive constant, so the root is the same for any anchor.

use folio_math::solvers::hybrid;
use serde::{Deserialize, Serialize};

use crate::cashflow::DatedCashFlow;
use crate::error::{MetricsError, MetricsResult};
use crate::types::XirrConfig;

/// A converged XIRR solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XirrSolution {
    /// Annualized rate as a fraction (0.12 = 12 %).
    pub rate: f64,
    /// Solver iterations used.
    pub iterations: u32,
    /// NPV at `rate`.
    pub residual: f64,
}

/// Solves for the annualized money-weighted return of `flows`.
///
/// # Errors
///
/// - [`MetricsError::InsufficientCashFlows`] for fewer than two flows
/// - [`MetricsError::ReturnUnconverged`] when the flows never change sign,
///   all fall on one day without netting to zero, or the solver finds no
///   root in range
///
/// Flows that all fall on one day and net to zero satisfy NPV = 0 at every
/// rate; the result is reported as a 0 % return.
/// - [`MetricsError::InvalidConfig`] for inconsistent settings
///
/// # Example
///
/// ```rust
/// use folio_metrics::cashflow::DatedCashFlow;
/// use folio_metrics::types::{Date, XirrConfig};
/// use folio_metrics::xirr::xirr;
///
/// let start = Date::from_ymd(2023, 1, 1).unwrap();
/// let flows = [
///     DatedCashFlow::new(start, -10_000.0),
///     DatedCashFlow::new(start.add_days(730).unwrap(), 12_100.0),
/// ];
///
/// let solution = xirr(&flows, &XirrConfig::default()).unwrap();
/// assert!((solution.rate - 0.1).abs() < 1e-3);
/// ```
pub fn xirr(flows: &[DatedCashFlow], config: &XirrConfig) -> MetricsResult<XirrSolution> {
    config.validate()?;

    if flows.len() < 2 {
        return Err(MetricsError::InsufficientCashFlows {
            required: 2,
            actual: flows.len(),
        });
    }
    if let Some(bad) = flows.iter().find(|flow| !flow.amount.is_finite()) {
        return Err(MetricsError::invalid_transaction(format!(
            "cash flow on {} is not finite",
            bad.date
        )));
    }

    let has_inflow = flows.iter().any(|flow| flow.amount > 0.0);
    let has_outflow = flows.iter().any(|flow| flow.amount < 0.0);
    if !(has_inflow && has_outflow) {
        return Err(MetricsError::unconverged(
            "cash flows never change sign, so no rate sets NPV to zero",
        ));
    }

    // Non-empty after the length check.
    let anchor = flows.iter().map(|flow| flow.date).min().unwrap_or(flows[0].date);
    let terms: Vec<(f64, f64)> = flows
        .iter()
        .map(|flow| {
            let years = anchor.days_between(&flow.date) as f64 / config.day_count_basis;
            (years, flow.amount)
        })
        .collect();

    if terms.iter().all(|(years, _)| *years == 0.0) {
        // NPV is the plain sum, independent of the rate.
        let net: f64 = terms.iter().map(|(_, amount)| amount).sum();
        let gross: f64 = terms.iter().map(|(_, amount)| amount.abs()).sum();
        if net.abs() <= config.solver.tolerance * gross.max(1.0) {
            return Ok(XirrSolution {
                rate: 0.0,
                iterations: 0,
                residual: net,
            });
        }
        return Err(MetricsError::unconverged(format!(
            "all cash flows fall on the same day and net to {net}"
        )));
    }

    let npv = |rate: f64| -> f64 {
        let base = 1.0 + rate;
        terms
            .iter()
            .map(|(years, amount)| amount / base.powf(*years))
            .sum()
    };
    let d_npv = |rate: f64| -> f64 {
        let base = 1.0 + rate;
        terms
            .iter()
            .map(|(years, amount)| -years * amount / base.powf(years + 1.0))
            .sum()
    };

    let result = hybrid(
        npv,
        d_npv,
        config.initial_guess,
        Some((config.lower_bound, config.upper_bound)),
        &config.solver,
    )
    .map_err(|err| MetricsError::unconverged(err.to_string()))?;

    if !(result.root.is_finite() && result.root > -1.0) {
        return Err(MetricsError::unconverged(format!(
            "solver returned out-of-domain rate {}",
            result.root
        )));
    }

    log::trace!(
        "xirr converged to {:.6} in {} iterations over {} flows",
        result.root,
        result.iterations,
        flows.len()
    );

    Ok(XirrSolution {
        rate: result.root,
        iterations: result.iterations,
        residual: result.residual,
    })
}
