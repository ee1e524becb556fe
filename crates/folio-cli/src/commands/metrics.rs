//! Metrics command implementation.
//!
//! Loads a transaction ledger and reports current value, net invested,
//! total gain and XIRR, optionally per account.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use folio_metrics::{
    calculate_metrics_as_of, filter_by_account, metrics_by_account, AccountBreakdown, Date,
    MetricsConfig, PortfolioMetrics,
};

use crate::cli::OutputFormat;
use crate::commands::{parse_date, read_ledger};
use crate::error::CliError;
use crate::output::{
    format_money, metrics_summary, print_header, print_json, print_rows, print_warning,
    AccountRow,
};

/// Arguments for the metrics command.
#[derive(Args, Debug)]
pub struct MetricsArgs {
    /// Ledger file (.csv or .json) with date, type, amount, units, current_price
    pub ledger: PathBuf,

    /// Valuation date (YYYY-MM-DD). Defaults to today.
    #[arg(short, long)]
    pub as_of: Option<String>,

    /// Only consider transactions of this account (folio / CAN)
    #[arg(long)]
    pub account: Option<String>,

    /// Report each account separately plus the total
    #[arg(long, conflicts_with = "account")]
    pub by_account: bool,
}

/// JSON shape of a per-account report.
#[derive(Serialize)]
struct BreakdownReport<'a> {
    total_aum: String,
    #[serde(flatten)]
    breakdown: &'a AccountBreakdown,
}

/// Execute the metrics command.
pub fn execute(args: MetricsArgs, config: &MetricsConfig, format: OutputFormat) -> Result<()> {
    let as_of = match args.as_of.as_deref() {
        Some(s) => parse_date(s)?,
        None => Date::today(),
    };

    let mut transactions = read_ledger(&args.ledger)?;
    if let Some(account) = args.account.as_deref() {
        transactions = filter_by_account(&transactions, account);
        if transactions.is_empty() {
            return Err(CliError::UnknownAccount(account.to_string()).into());
        }
    }

    if args.by_account {
        let breakdown = metrics_by_account(&transactions, as_of, config)?;
        report_breakdown(&breakdown, format)
    } else {
        let metrics = calculate_metrics_as_of(&transactions, as_of, config)?;
        report_single(&metrics, format)
    }
}

fn report_single(metrics: &PortfolioMetrics, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            print_header("Portfolio Metrics");
            print_rows(&metrics_summary(metrics, true), format)?;
            if metrics.annualized_return.is_none() && metrics.transaction_count > 0 {
                print_warning("annualized return could not be determined for these cash flows");
            }
        }
        OutputFormat::Json => print_json(metrics)?,
        OutputFormat::Csv => {
            print_rows(&[AccountRow::from_metrics("ALL", metrics, false)], format)?;
        }
    }
    Ok(())
}

fn report_breakdown(breakdown: &AccountBreakdown, format: OutputFormat) -> Result<()> {
    let total_aum = breakdown.total_aum()?;

    match format {
        OutputFormat::Json => {
            let report = BreakdownReport {
                total_aum: total_aum.to_string(),
                breakdown,
            };
            print_json(&report)?;
        }
        OutputFormat::Table | OutputFormat::Csv => {
            let colour = format == OutputFormat::Table;
            let mut rows: Vec<AccountRow> = breakdown
                .by_account
                .iter()
                .map(|(account, metrics)| AccountRow::from_metrics(account, metrics, colour))
                .collect();
            rows.push(AccountRow::from_metrics("TOTAL", &breakdown.total, colour));

            if colour {
                print_header(&format!(
                    "Metrics by Account (as of {}, AUM {})",
                    breakdown.total.as_of,
                    format_money(total_aum)
                ));
            }
            print_rows(&rows, format)?;
        }
    }
    Ok(())
}
