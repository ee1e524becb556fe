//! Output formatting utilities.

use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use folio_metrics::PortfolioMetrics;

use crate::cli::OutputFormat;

/// Placeholder shown when no annualized return exists.
pub const NOT_AVAILABLE: &str = "n/a";

/// Prints rows in the table or CSV layout.
///
/// JSON output is handled by the callers, which serialize their domain
/// results directly.
pub fn print_rows<T: Serialize + Tabled>(data: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Csv => print_csv(data),
        OutputFormat::Json => print_json(data),
    }
}

/// Prints any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as a formatted table.
fn print_table<T: Tabled>(data: &[T]) -> anyhow::Result<()> {
    if data.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{}", table);
    Ok(())
}

/// Prints data as CSV.
fn print_csv<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for item in data {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Formats a money amount with two decimals.
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Formats an optional rate as a percentage.
pub fn format_rate(rate: Option<f64>) -> String {
    rate.map_or_else(|| NOT_AVAILABLE.to_string(), |r| format!("{:.2}%", r * 100.0))
}

/// Colours a gain green or red by sign.
pub fn format_gain(value: Decimal) -> String {
    let text = format_money(value);
    if value.is_sign_negative() && !value.is_zero() {
        text.red().to_string()
    } else {
        text.green().to_string()
    }
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One line of a per-account breakdown.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct AccountRow {
    #[tabled(rename = "Account")]
    pub account: String,
    #[tabled(rename = "Transactions")]
    pub transactions: usize,
    #[tabled(rename = "Current Value")]
    pub current_value: String,
    #[tabled(rename = "Net Invested")]
    pub net_invested: String,
    #[tabled(rename = "Total Gain")]
    pub total_gain: String,
    #[tabled(rename = "XIRR")]
    pub xirr: String,
}

impl AccountRow {
    /// Builds a row from computed metrics. Gains are coloured for tables only.
    pub fn from_metrics(account: impl Into<String>, metrics: &PortfolioMetrics, colour: bool) -> Self {
        Self {
            account: account.into(),
            transactions: metrics.transaction_count,
            current_value: format_money(metrics.current_value),
            net_invested: format_money(metrics.net_invested),
            total_gain: if colour {
                format_gain(metrics.total_gain)
            } else {
                format_money(metrics.total_gain)
            },
            xirr: format_rate(metrics.annualized_return),
        }
    }
}

/// Key-value summary of one grouping's metrics.
pub fn metrics_summary(metrics: &PortfolioMetrics, colour: bool) -> Vec<KeyValue> {
    let mut rows = vec![
        KeyValue::new("As Of", metrics.as_of.to_string()),
        KeyValue::new("Transactions", metrics.transaction_count.to_string()),
        KeyValue::new("Current Value", format_money(metrics.current_value)),
        KeyValue::new("Net Invested", format_money(metrics.net_invested)),
        KeyValue::new(
            "Total Gain",
            if colour {
                format_gain(metrics.total_gain)
            } else {
                format_money(metrics.total_gain)
            },
        ),
        KeyValue::new("XIRR", format_rate(metrics.annualized_return)),
    ];
    if metrics.excluded_transfers > 0 {
        rows.push(KeyValue::new(
            "Excluded STP",
            metrics.excluded_transfers.to_string(),
        ));
    }
    rows
}
