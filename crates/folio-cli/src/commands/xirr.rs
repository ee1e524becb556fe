//! XIRR command implementation.
//!
//! Solves the annualized return of an arbitrary `date,amount` series.
//! Amounts are signed from the investor's side: negative when paid in.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde::{Deserialize, Serialize};

use folio_metrics::cashflow::DatedCashFlow;
use folio_metrics::{xirr, MetricsConfig};

use crate::cli::OutputFormat;
use crate::commands::parse_date;
use crate::error::CliError;
use crate::output::{format_rate, print_header, print_json, print_rows, KeyValue};

/// Arguments for the xirr command.
#[derive(Args, Debug)]
pub struct XirrArgs {
    /// CSV file with `date,amount` columns
    pub cashflows: PathBuf,

    /// Override the initial guess for the solver
    #[arg(long)]
    pub guess: Option<f64>,
}

#[derive(Deserialize)]
struct FlowRecord {
    date: String,
    amount: f64,
}

#[derive(Serialize)]
struct XirrReport {
    flows: usize,
    rate: Option<f64>,
    iterations: Option<u32>,
    message: Option<String>,
}

/// Execute the xirr command.
pub fn execute(args: XirrArgs, config: &MetricsConfig, format: OutputFormat) -> Result<()> {
    let flows = read_flows(&args.cashflows)?;

    let mut xirr_config = config.xirr;
    if let Some(guess) = args.guess {
        xirr_config = xirr_config.with_initial_guess(guess);
    }

    let report = match xirr(&flows, &xirr_config) {
        Ok(solution) => XirrReport {
            flows: flows.len(),
            rate: Some(solution.rate),
            iterations: Some(solution.iterations),
            message: None,
        },
        Err(err) if err.is_undetermined_return() => {
            tracing::warn!(%err, "no rate of return for cash flows");
            XirrReport {
                flows: flows.len(),
                rate: None,
                iterations: None,
                message: Some(err.to_string()),
            }
        }
        Err(err) => return Err(err.into()),
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table | OutputFormat::Csv => {
            let mut rows = vec![
                KeyValue::new("Cash Flows", report.flows.to_string()),
                KeyValue::new("XIRR", format_rate(report.rate)),
            ];
            if let Some(iterations) = report.iterations {
                rows.push(KeyValue::new("Iterations", iterations.to_string()));
            }
            if let Some(message) = &report.message {
                rows.push(KeyValue::new("Note", message.clone()));
            }
            if format == OutputFormat::Table {
                print_header("XIRR");
            }
            print_rows(&rows, format)?;
        }
    }
    Ok(())
}

fn read_flows(path: &Path) -> Result<Vec<DatedCashFlow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(File::open(path)?);

    let mut flows = Vec::new();
    for (index, record) in reader.deserialize::<FlowRecord>().enumerate() {
        let record = record.map_err(|e| CliError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let date = parse_date(&record.date).map_err(|e| CliError::Parse {
            path: path.to_path_buf(),
            reason: format!("row {}: {e}", index + 1),
        })?;
        flows.push(DatedCashFlow::new(date, record.amount));
    }

    tracing::debug!(count = flows.len(), "read cash flows");
    Ok(flows)
}
