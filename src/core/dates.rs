//! Calendar arithmetic on plain dates.
//!
//! Year and month counts compare (year, month, day) components directly
//! instead of relying on duration rounding, so leap days and month ends
//! behave identically everywhere.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole years from `start` to `end` under the anniversary rule, floored at zero.
pub fn holding_years(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut years = end.year() - start.year();
    if (end.month(), end.day()) < (start.month(), start.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// Whole months from `start` to `end`, floored at zero. A month counts once
/// the day of month reaches the start's day of month.
pub fn holding_months(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut months =
        (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if end.day() < start.day() {
        months -= 1;
    }
    months.max(0) as u32
}

/// Signed day count from `start` to `end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    i64::from(end.num_days_from_ce()) - i64::from(start.num_days_from_ce())
}

/// Elapsed fractional years using a 365.25 day year.
pub fn elapsed_years(start: NaiveDate, end: NaiveDate) -> Decimal {
    Decimal::from(days_between(start, end)) / dec!(365.25)
}

/// Last calendar day of the given month.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Holding band used to pick short-term rate codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShortTermBand {
    UnderOneYear,
    OneToTwoYears,
    TwoYearsOrMore,
}

impl ShortTermBand {
    pub fn from_months(months: u32) -> Self {
        match months {
            0..=11 => ShortTermBand::UnderOneYear,
            12..=23 => ShortTermBand::OneToTwoYears,
            _ => ShortTermBand::TwoYearsOrMore,
        }
    }

    pub fn is_short_term(&self) -> bool {
        !matches!(self, ShortTermBand::TwoYearsOrMore)
    }
}

impl fmt::Display for ShortTermBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortTermBand::UnderOneYear => write!(f, "under 1 year"),
            ShortTermBand::OneToTwoYears => write!(f, "1-2 years"),
            ShortTermBand::TwoYearsOrMore => write!(f, "2 years or more"),
        }
    }
}

/// Classify a holding period directly from its dates.
pub fn short_term_band(start: NaiveDate, end: NaiveDate) -> ShortTermBand {
    ShortTermBand::from_months(holding_months(start, end))
}
