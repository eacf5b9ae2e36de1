//! Statutory filing due dates.

use crate::core::dates::last_day_of_month;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FilingKind {
    RealEstate,
    Securities,
    Derivatives,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deadlines {
    pub kind: FilingKind,
    pub transfer_date: NaiveDate,
    pub preliminary: NaiveDate,
    pub final_return: NaiveDate,
}

/// Last day of the second month after `(year, month)`.
fn two_months_after(year: i32, month: u32) -> Option<NaiveDate> {
    let index = year * 12 + month as i32 - 1 + 2;
    last_day_of_month(index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// Preliminary return due date. Real estate counts from the transfer month,
/// securities and derivatives from the end of the transfer's half year.
pub fn preliminary_due(kind: FilingKind, transfer_date: NaiveDate) -> Option<NaiveDate> {
    let year = transfer_date.year();
    match kind {
        FilingKind::RealEstate => two_months_after(year, transfer_date.month()),
        FilingKind::Securities | FilingKind::Derivatives => {
            let half_end = if transfer_date.month() <= 6 { 6 } else { 12 };
            two_months_after(year, half_end)
        }
    }
}

/// Final return for the year: 31 May of the following year.
pub fn final_due(tax_year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(tax_year + 1, 5, 31)
}

pub fn deadlines(kind: FilingKind, transfer_date: NaiveDate) -> Option<Deadlines> {
    Some(Deadlines {
        kind,
        transfer_date,
        preliminary: preliminary_due(kind, transfer_date)?,
        final_return: final_due(transfer_date.year())?,
    })
}
