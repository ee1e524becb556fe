//! Calendar date type.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{MetricsError, MetricsResult};

/// A calendar date with no time-of-day component.
///
/// Transactions and cash flows are compared at day granularity, so any
/// time carried by the source is dropped when a `Date` is built.
///
/// # Example
///
/// ```rust
/// use folio_metrics::types::Date;
///
/// let date = Date::parse("2024-03-31 14:05:00").unwrap();
/// assert_eq!(date, Date::from_ymd(2024, 3, 31).unwrap());
/// assert_eq!(date.add_months(-1).unwrap(), Date::from_ymd(2024, 2, 29).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> MetricsResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| MetricsError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Parses a date, discarding any time-of-day component.
    ///
    /// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS[.fff]`,
    /// `YYYY-MM-DDTHH:MM:SS[.fff]` and RFC 3339 timestamps.
    pub fn parse(s: &str) -> MetricsResult<Self> {
        let s = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Date(date));
        }
        for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Date(datetime.date()));
            }
        }
        if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
            return Ok(Date(datetime.date_naive()));
        }

        Err(MetricsError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Returns today's date in the local time zone.
    #[must_use]
    pub fn today() -> Self {
        Date(chrono::Local::now().date_naive())
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Adds a (possibly negative) number of days to the date.
    ///
    /// Fails with [`MetricsError::InvalidDate`] when the result leaves the
    /// calendar range `chrono` supports.
    pub fn add_days(&self, days: i64) -> MetricsResult<Self> {
        chrono::Duration::try_days(days)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Date)
            .ok_or_else(|| MetricsError::invalid_date(format!("{self} {days:+} days")))
    }

    /// Adds a number of months, clamping to the last day of the target month.
    pub fn add_months(&self, months: i32) -> MetricsResult<Self> {
        let total_months = self.year() * 12 + self.month() as i32 - 1 + months;
        let new_year = total_months.div_euclid(12);
        let new_month = (total_months.rem_euclid(12) + 1) as u32;
        let new_day = self.day().min(days_in_month(new_year, new_month));

        Self::from_ymd(new_year, new_month, new_day)
    }

    /// Adds a number of years, clamping Feb 29 to Feb 28 in common years.
    pub fn add_years(&self, years: i32) -> MetricsResult<Self> {
        self.add_months(years * 12)
    }

    /// Signed number of calendar days from `self` to `other`.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(28, |last| last.day())
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl FromStr for Date {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        let date = Date::parse("2024-01-15").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_parse_drops_time_of_day() {
        let expected = Date::from_ymd(2023, 7, 1).unwrap();
        assert_eq!(Date::parse("2023-07-01 23:59:59").unwrap(), expected);
        assert_eq!(Date::parse("2023-07-01T08:30:00.250").unwrap(), expected);
        assert_eq!(Date::parse("2023-07-01T23:30:00+05:30").unwrap(), expected);
        assert_eq!(Date::parse("  2023-07-01  ").unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Date::parse("01/07/2023").is_err());
        assert!(Date::parse("").is_err());
        assert!(Date::parse("2023-02-30").is_err());
    }

    #[test]
    fn test_invalid_ymd() {
        assert!(Date::from_ymd(2023, 13, 1).is_err());
        assert!(Date::from_ymd(2023, 2, 29).is_err());
        assert!(Date::from_ymd(2024, 2, 29).is_ok());
    }

    #[test]
    fn test_add_months_clamps() {
        let date = Date::from_ymd(2024, 8, 31).unwrap();
        assert_eq!(date.add_months(-6).unwrap(), Date::from_ymd(2024, 2, 29).unwrap());
        assert_eq!(date.add_months(6).unwrap(), Date::from_ymd(2025, 2, 28).unwrap());
        assert_eq!(date.add_months(-20).unwrap(), Date::from_ymd(2022, 12, 31).unwrap());
    }

    #[test]
    fn test_add_years_leap_day() {
        let leap = Date::from_ymd(2024, 2, 29).unwrap();
        assert_eq!(leap.add_years(-1).unwrap(), Date::from_ymd(2023, 2, 28).unwrap());
    }

    #[test]
    fn test_days_between_is_signed() {
        let a = Date::from_ymd(2024, 1, 1).unwrap();
        let b = Date::from_ymd(2025, 1, 1).unwrap();
        assert_eq!(a.days_between(&b), 366);
        assert_eq!(b.days_between(&a), -366);
        assert_eq!(a.add_days(366).unwrap(), b);
    }

    #[test]
    fn test_add_days_out_of_range() {
        let date = Date::from_ymd(2024, 1, 1).unwrap();
        assert!(matches!(
            date.add_days(i64::MAX),
            Err(MetricsError::InvalidDate { .. })
        ));
        assert!(matches!(
            date.add_days(-400_000_000),
            Err(MetricsError::InvalidDate { .. })
        ));
        assert_eq!(
            date.add_days(-1).unwrap(),
            Date::from_ymd(2023, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_display_and_serde() {
        let date = Date::from_ymd(2024, 3, 5).unwrap();
        assert_eq!(date.to_string(), "2024-03-05");

        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2024-03-05\"");
        let parsed: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, date);
    }
}
