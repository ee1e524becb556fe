//! CLI command implementations.

pub mod metrics;
pub mod xirr;

pub use metrics::MetricsArgs;
pub use xirr::XirrArgs;

use std::fs::File;
use std::path::Path;

use folio_metrics::{parse_rows, Date, MetricsConfig, Transaction, TransactionRow};

use crate::error::{CliError, CliResult};

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<Date> {
    Date::parse(s.trim()).map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Loads the metrics configuration, falling back to defaults without a file.
pub fn load_config(path: Option<&Path>) -> CliResult<MetricsConfig> {
    let Some(path) = path else {
        return Ok(MetricsConfig::default());
    };

    let text = std::fs::read_to_string(path)?;
    let config: MetricsConfig =
        toml::from_str(&text).map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
    config
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;

    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Reads a transaction ledger from a `.csv` or `.json` file.
pub fn read_ledger(path: &Path) -> anyhow::Result<Vec<Transaction>> {
    let rows: Vec<TransactionRow> = match extension(path).as_deref() {
        Some("csv") => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(File::open(path)?);
            let headers = reader.headers().map_err(|e| parse_error(path, e))?.clone();
            reader
                .records()
                .map(|record| {
                    record.map(|record| TransactionRow::from_fields(headers.iter().zip(&record)))
                })
                .collect::<Result<_, _>>()
                .map_err(|e| parse_error(path, e))?
        }
        Some("json") => {
            serde_json::from_reader(File::open(path)?).map_err(|e| parse_error(path, e))?
        }
        _ => return Err(CliError::UnsupportedFormat(path.to_path_buf()).into()),
    };

    let transactions = parse_rows(rows).map_err(|e| parse_error(path, e))?;
    tracing::info!(
        path = %path.display(),
        count = transactions.len(),
        "loaded ledger"
    );
    Ok(transactions)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

fn parse_error(path: &Path, err: impl std::fmt::Display) -> CliError {
    CliError::Parse {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
