//! Transaction records and the raw rows they are parsed from.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Date;
use crate::error::{MetricsError, MetricsResult};

/// Kind of a mutual-fund transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Lump-sum purchase.
    Purchase,
    /// Systematic investment plan instalment.
    Sip,
    /// Redemption of units.
    Redemption,
    /// Systematic withdrawal plan payout.
    Swp,
    /// Systematic transfer plan leg between schemes.
    Stp,
}

/// Which way capital moves for a transaction, seen from the investor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    /// Capital goes into the portfolio (investor pays).
    Invest,
    /// Capital comes out of the portfolio (investor receives).
    Withdraw,
}

impl TransactionKind {
    /// All kinds, in display order.
    pub const ALL: [TransactionKind; 5] = [
        TransactionKind::Purchase,
        TransactionKind::Sip,
        TransactionKind::Redemption,
        TransactionKind::Swp,
        TransactionKind::Stp,
    ];

    /// Direction of the external cash flow, or `None` for transfers.
    #[must_use]
    pub fn flow_direction(&self) -> Option<FlowDirection> {
        match self {
            Self::Purchase | Self::Sip => Some(FlowDirection::Invest),
            Self::Redemption | Self::Swp => Some(FlowDirection::Withdraw),
            Self::Stp => None,
        }
    }

    /// True for PURCHASE and SIP.
    #[must_use]
    pub fn is_acquisition(&self) -> bool {
        self.flow_direction() == Some(FlowDirection::Invest)
    }

    /// True for REDEMPTION and SWP.
    #[must_use]
    pub fn is_disposal(&self) -> bool {
        self.flow_direction() == Some(FlowDirection::Withdraw)
    }

    /// True for STP, which has no external cash flow of its own.
    #[must_use]
    pub fn is_transfer(&self) -> bool {
        self.flow_direction().is_none()
    }

    /// Canonical upper-case code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Purchase => "PURCHASE",
            Self::Sip => "SIP",
            Self::Redemption => "REDEMPTION",
            Self::Swp => "SWP",
            Self::Stp => "STP",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| MetricsError::InvalidTransactionKind {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A validated transaction joined with the current price of its scheme.
///
/// `amount` is the cash magnitude; its direction comes from `kind`.
/// `units` carries its own sign (negative for disposals) so that summing
/// units gives the net holding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    date: Date,
    kind: TransactionKind,
    amount: Decimal,
    units: Decimal,
    current_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    account: Option<String>,
}

impl Transaction {
    /// Creates a transaction.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::InvalidTransaction` if `amount` or
    /// `current_price` is negative.
    pub fn new(
        date: Date,
        kind: TransactionKind,
        amount: Decimal,
        units: Decimal,
        current_price: Decimal,
    ) -> MetricsResult<Self> {
        if amount < Decimal::ZERO {
            return Err(MetricsError::invalid_transaction(format!(
                "{kind} on {date}: amount {amount} must be a non-negative magnitude"
            )));
        }
        if current_price < Decimal::ZERO {
            return Err(MetricsError::invalid_transaction(format!(
                "{kind} on {date}: current price {current_price} is negative"
            )));
        }

        Ok(Self {
            date,
            kind,
            amount,
            units,
            current_price,
            account: None,
        })
    }

    /// Tags the transaction with a folio / CAN grouping key.
    #[must_use]
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Trade date.
    #[must_use]
    pub fn date(&self) -> Date {
        self.date
    }

    /// Transaction kind.
    #[must_use]
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Cash magnitude.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Signed unit quantity.
    #[must_use]
    pub fn units(&self) -> Decimal {
        self.units
    }

    /// Current price per unit.
    #[must_use]
    pub fn current_price(&self) -> Decimal {
        self.current_price
    }

    /// Grouping key, if any.
    #[must_use]
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// Amount signed as invested capital: positive for acquisitions,
    /// negative for disposals, `None` for transfers.
    #[must_use]
    pub fn invested_amount(&self) -> Option<Decimal> {
        self.kind.flow_direction().map(|direction| match direction {
            FlowDirection::Invest => self.amount,
            FlowDirection::Withdraw => -self.amount,
        })
    }

    /// Current market value of this row (`units * current_price`).
    pub fn market_value(&self) -> MetricsResult<Decimal> {
        self.units.checked_mul(self.current_price).ok_or_else(|| {
            MetricsError::overflow(format!("market value of {} on {}", self.kind, self.date))
        })
    }
}

/// An unvalidated transaction row as delivered by the storage layer.
///
/// Every field is optional text so that a missing column surfaces as
/// [`MetricsError::MissingField`] instead of a deserializer error.
///
/// Delimited files go through [`TransactionRow::from_fields`], which keeps
/// each cell verbatim. The `Deserialize` impl is meant for self-describing
/// formats such as JSON: numbers are accepted and turned into text, and a
/// non-integer JSON number keeps only `f64` precision. Send long decimals as
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRow {
    /// Trade date.
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    /// Cash magnitude.
    #[serde(default, deserialize_with = "lenient_text")]
    pub amount: Option<String>,
    /// Transaction type code.
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    /// Signed unit quantity.
    #[serde(default, deserialize_with = "lenient_text")]
    pub units: Option<String>,
    /// Current price of the scheme.
    #[serde(default, deserialize_with = "lenient_text")]
    pub current_price: Option<String>,
    /// Folio / CAN grouping key.
    #[serde(default, deserialize_with = "lenient_text")]
    pub account: Option<String>,
}

impl TransactionRow {
    /// Builds a row from `(column, cell)` pairs such as a CSV header zipped
    /// with a record.
    ///
    /// Cells stay text, so `00123` keeps its leading zeros and money keeps
    /// every digit. Column names match case-insensitively, `type` fills
    /// [`kind`](Self::kind), unknown columns are ignored and blank cells
    /// count as missing.
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut row = Self::default();
        for (column, cell) in fields {
            let slot = match column.trim().to_ascii_lowercase().as_str() {
                "date" => &mut row.date,
                "amount" => &mut row.amount,
                "type" => &mut row.kind,
                "units" => &mut row.units,
                "current_price" => &mut row.current_price,
                "account" => &mut row.account,
                _ => continue,
            };
            let cell = cell.trim();
            *slot = (!cell.is_empty()).then(|| cell.to_string());
        }
        row
    }
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = MetricsError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let date = Date::parse(&required("date", row.date.as_deref())?)?;
        let kind: TransactionKind = required("type", row.kind.as_deref())?.parse()?;
        let amount = parse_decimal("amount", &required("amount", row.amount.as_deref())?)?;
        let units = parse_decimal("units", &required("units", row.units.as_deref())?)?;
        let current_price = parse_decimal(
            "current_price",
            &required("current_price", row.current_price.as_deref())?,
        )?;

        let transaction = Transaction::new(date, kind, amount, units, current_price)?;
        Ok(match row.account {
            Some(account) => transaction.with_account(account),
            None => transaction,
        })
    }
}

/// Validates a batch of rows, stopping at the first malformed one.
///
/// The returned error names the 1-based row number.
pub fn parse_rows<I>(rows: I) -> MetricsResult<Vec<Transaction>>
where
    I: IntoIterator<Item = TransactionRow>,
{
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            Transaction::try_from(row).map_err(|err| {
                MetricsError::invalid_transaction(format!("row {}: {err}", index + 1))
            })
        })
        .collect()
}

fn required(field: &str, value: Option<&str>) -> MetricsResult<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| MetricsError::missing_field(field))
}

fn parse_decimal(field: &str, value: &str) -> MetricsResult<Decimal> {
    let cleaned = value.replace(',', "");
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| MetricsError::invalid_field(field, value))
}

/// Deserializes JSON strings, numbers and nulls into `Option<String>`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientText;

    impl<'de> serde::de::Visitor<'de> for LenientText {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, a number or null")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let trimmed = v.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }

        fn visit_string<E: serde::de::Error>(self, v: String) -> Result<Self::Value, E> {
            self.visit_str(&v)
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i128<E: serde::de::Error>(self, v: i128) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u128<E: serde::de::Error>(self, v: u128) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(LenientText)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(date: &str, kind: &str, amount: &str, units: &str, price: &str) -> TransactionRow {
        TransactionRow {
            date: Some(date.to_string()),
            amount: Some(amount.to_string()),
            kind: Some(kind.to_string()),
            units: Some(units.to_string()),
            current_price: Some(price.to_string()),
            account: None,
        }
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("PURCHASE".parse::<TransactionKind>().unwrap(), TransactionKind::Purchase);
        assert_eq!(" sip ".parse::<TransactionKind>().unwrap(), TransactionKind::Sip);
        assert_eq!("Redemption".parse::<TransactionKind>().unwrap(), TransactionKind::Redemption);
        assert_eq!("swp".parse::<TransactionKind>().unwrap(), TransactionKind::Swp);
        assert_eq!("STP".parse::<TransactionKind>().unwrap(), TransactionKind::Stp);
        assert!(matches!(
            "DIVIDEND".parse::<TransactionKind>(),
            Err(MetricsError::InvalidTransactionKind { .. })
        ));
    }

    #[test]
    fn test_kind_directions() {
        assert!(TransactionKind::Purchase.is_acquisition());
        assert!(TransactionKind::Sip.is_acquisition());
        assert!(TransactionKind::Redemption.is_disposal());
        assert!(TransactionKind::Swp.is_disposal());
        assert!(TransactionKind::Stp.is_transfer());
        assert!(!TransactionKind::Stp.is_acquisition());
        assert!(!TransactionKind::Stp.is_disposal());
    }

    #[test]
    fn test_kind_serde_codes() {
        for kind in TransactionKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.code()));
        }
    }

    #[test]
    fn test_invested_amount_sign() {
        let date = Date::from_ymd(2024, 1, 1).unwrap();
        let buy = Transaction::new(date, TransactionKind::Purchase, dec!(500), dec!(5), dec!(100))
            .unwrap();
        let sell =
            Transaction::new(date, TransactionKind::Redemption, dec!(500), dec!(-5), dec!(100))
                .unwrap();
        let stp = Transaction::new(date, TransactionKind::Stp, dec!(500), dec!(5), dec!(100))
            .unwrap();

        assert_eq!(buy.invested_amount(), Some(dec!(500)));
        assert_eq!(sell.invested_amount(), Some(dec!(-500)));
        assert_eq!(stp.invested_amount(), None);
        assert_eq!(sell.market_value().unwrap(), dec!(-500));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let date = Date::from_ymd(2024, 1, 1).unwrap();
        let result = Transaction::new(date, TransactionKind::Swp, dec!(-1), dec!(-1), dec!(10));
        assert!(matches!(result, Err(MetricsError::InvalidTransaction { .. })));

        let result = Transaction::new(date, TransactionKind::Sip, dec!(1), dec!(1), dec!(-10));
        assert!(matches!(result, Err(MetricsError::InvalidTransaction { .. })));
    }

    #[test]
    fn test_zero_amount_accepted() {
        let date = Date::from_ymd(2024, 1, 1).unwrap();
        let txn = Transaction::new(date, TransactionKind::Sip, dec!(0), dec!(0), dec!(10)).unwrap();
        assert_eq!(txn.invested_amount(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_row_conversion() {
        let mut raw = row("2024-02-10 10:15:00", "sip", "1,000.50", "10.005", "120");
        raw.account = Some("CAN-7".to_string());

        let txn = Transaction::try_from(raw).unwrap();
        assert_eq!(txn.date(), Date::from_ymd(2024, 2, 10).unwrap());
        assert_eq!(txn.kind(), TransactionKind::Sip);
        assert_eq!(txn.amount(), dec!(1000.50));
        assert_eq!(txn.units(), dec!(10.005));
        assert_eq!(txn.current_price(), dec!(120));
        assert_eq!(txn.account(), Some("CAN-7"));
    }

    #[test]
    fn test_row_missing_field() {
        let mut raw = row("2024-02-10", "SIP", "1000", "10", "120");
        raw.current_price = None;
        assert_eq!(
            Transaction::try_from(raw).unwrap_err(),
            MetricsError::missing_field("current_price")
        );

        let mut raw = row("2024-02-10", "SIP", "1000", "10", "120");
        raw.date = Some("   ".to_string());
        assert_eq!(
            Transaction::try_from(raw).unwrap_err(),
            MetricsError::missing_field("date")
        );
    }

    #[test]
    fn test_row_malformed_values() {
        let raw = row("10/02/2024", "SIP", "1000", "10", "120");
        assert!(matches!(
            Transaction::try_from(raw),
            Err(MetricsError::InvalidDate { .. })
        ));

        let raw = row("2024-02-10", "SIP", "ten", "10", "120");
        assert_eq!(
            Transaction::try_from(raw).unwrap_err(),
            MetricsError::invalid_field("amount", "ten")
        );
    }

    #[test]
    fn test_row_from_json_numbers() {
        let json = r#"{"date": "2024-01-01", "amount": 10000, "type": "PURCHASE",
                       "units": 100.5, "current_price": "150", "account": null}"#;
        let raw: TransactionRow = serde_json::from_str(json).unwrap();
        assert_eq!(raw.amount.as_deref(), Some("10000"));
        assert_eq!(raw.units.as_deref(), Some("100.5"));
        assert_eq!(raw.account, None);

        let txn = Transaction::try_from(raw).unwrap();
        assert_eq!(txn.units(), dec!(100.5));
    }

    #[test]
    fn test_row_from_fields_keeps_text() {
        let header = ["date", "TYPE", "amount", "units", "current_price", "account", "notes"];
        let cells = [
            "2024-01-01",
            "PURCHASE",
            "10000.123456789012345678",
            "100",
            "150",
            " 00123 ",
            "ignored",
        ];
        let raw = TransactionRow::from_fields(header.into_iter().zip(cells));

        assert_eq!(raw.account.as_deref(), Some("00123"));
        assert_eq!(raw.amount.as_deref(), Some("10000.123456789012345678"));

        let txn = Transaction::try_from(raw).unwrap();
        assert_eq!(txn.amount(), dec!(10000.123456789012345678));
        assert_eq!(txn.account(), Some("00123"));
    }

    #[test]
    fn test_row_from_fields_blank_cell_is_missing() {
        let header = ["date", "type", "amount", "units", "current_price"];
        let cells = ["2024-01-01", "SIP", "10", "1", ""];
        let raw = TransactionRow::from_fields(header.into_iter().zip(cells));

        assert_eq!(raw.current_price, None);
        assert_eq!(raw.account, None);
        assert_eq!(
            Transaction::try_from(raw).unwrap_err(),
            MetricsError::missing_field("current_price")
        );
    }

    #[test]
    fn test_row_from_json_missing_key() {
        let json = r#"{"date": "2024-01-01", "amount": "10", "type": "SIP", "units": "1"}"#;
        let raw: TransactionRow = serde_json::from_str(json).unwrap();
        assert_eq!(
            Transaction::try_from(raw).unwrap_err(),
            MetricsError::missing_field("current_price")
        );
    }

    #[test]
    fn test_parse_rows_reports_row_number() {
        let rows = vec![
            row("2024-01-01", "PURCHASE", "100", "1", "100"),
            row("2024-01-02", "BONUS", "0", "1", "100"),
        ];
        let err = parse_rows(rows).unwrap_err();
        assert!(err.to_string().contains("row 2"));
        assert!(err.to_string().contains("BONUS"));
    }
}
