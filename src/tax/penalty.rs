//! Underreporting and late-payment penalties.

use crate::core::case::{PenaltyInfo, ReportType, UnderReportType};
use crate::core::dates::days_between;
use crate::core::log::CalculationLog;
use crate::core::money::round_to_won;
use crate::core::result::PenaltyBreakdown;
use crate::rules::PenaltyRules;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use std::fmt;

/// Lateness of a return relative to its legal due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ReductionBand {
    #[serde(rename = "WITHIN_1M")]
    Within1Month,
    #[serde(rename = "WITHIN_3M")]
    Within3Months,
    #[serde(rename = "WITHIN_6M")]
    Within6Months,
    #[serde(rename = "WITHIN_1Y")]
    Within1Year,
    #[serde(rename = "WITHIN_1Y6M")]
    Within18Months,
    #[serde(rename = "WITHIN_2Y")]
    Within2Years,
    #[serde(rename = "OVER_2Y")]
    Over2Years,
}

impl ReductionBand {
    pub fn of_days(days: i64) -> Self {
        match days {
            i64::MIN..=30 => ReductionBand::Within1Month,
            31..=90 => ReductionBand::Within3Months,
            91..=180 => ReductionBand::Within6Months,
            181..=365 => ReductionBand::Within1Year,
            366..=548 => ReductionBand::Within18Months,
            549..=730 => ReductionBand::Within2Years,
            _ => ReductionBand::Over2Years,
        }
    }

    pub fn between(due: NaiveDate, filed: NaiveDate) -> Self {
        Self::of_days(days_between(due, filed).max(0))
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ReductionBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReductionBand::Within1Month => "within 1 month",
            ReductionBand::Within3Months => "within 3 months",
            ReductionBand::Within6Months => "within 6 months",
            ReductionBand::Within1Year => "within 1 year",
            ReductionBand::Within18Months => "within 18 months",
            ReductionBand::Within2Years => "within 2 years",
            ReductionBand::Over2Years => "over 2 years",
        };
        f.write_str(s)
    }
}

/// Reduction rate for a band. Only late and amended returns get one.
pub fn reduction_rate(report_type: ReportType, band: ReductionBand, rules: &PenaltyRules) -> Decimal {
    let table = match report_type {
        ReportType::Late => &rules.late_filing_reduction,
        ReportType::Amend => &rules.amended_filing_reduction,
        ReportType::Prelim | ReportType::Final => return Decimal::ZERO,
    };
    table.get(band.index()).copied().unwrap_or(Decimal::ZERO)
}

fn under_report_rate(kind: UnderReportType, rules: &PenaltyRules) -> Decimal {
    match kind {
        UnderReportType::None => Decimal::ZERO,
        UnderReportType::NoReport => rules.general_no_report,
        UnderReportType::UnderReport => rules.general_under_report,
        UnderReportType::UnfaithfulNo => rules.unfaithful_no_report,
        UnderReportType::UnfaithfulUnder => rules.unfaithful_under_report,
    }
}

pub fn compute(
    report_type: ReportType,
    info: Option<&PenaltyInfo>,
    rules: &PenaltyRules,
    log: &mut CalculationLog,
) -> PenaltyBreakdown {
    let info = match info {
        Some(info) => info,
        None => return PenaltyBreakdown::default(),
    };

    let mut under_report = Decimal::ZERO;
    let mut applied_reduction = None;
    if info.under_report_type != UnderReportType::None && info.under_report_base > Decimal::ZERO {
        let rate = under_report_rate(info.under_report_type, rules);
        under_report = round_to_won(info.under_report_base * rate);

        if let (true, Some(filed), Some(due)) =
            (info.reduction_applied, info.report_date, info.due_date)
        {
            let band = ReductionBand::between(due, filed);
            let reduction = reduction_rate(report_type, band, rules);
            under_report = round_to_won(under_report * (Decimal::ONE - reduction));
            applied_reduction = Some(reduction);
            log.record(
                "CALC-PEN-010-REDUCTION",
                "penalty reduction for late or amended return",
                [
                    ("period", json!(band)),
                    ("reductionRate", json!(reduction)),
                    ("reducedUnderReport", json!(under_report)),
                ],
            );
        }
    }

    let mut late_payment = Decimal::ZERO;
    if info.late_payment_days > 0 && info.late_payment_base > Decimal::ZERO {
        let days = info.late_payment_days.min(rules.late_payment_max_days);
        late_payment =
            round_to_won(info.late_payment_base * rules.late_payment_daily_rate * Decimal::from(days));
    }

    let total = under_report + late_payment;
    log.record(
        "CALC-PEN-010",
        "penalty",
        [
            ("underReport", json!(under_report)),
            ("latePayment", json!(late_payment)),
            ("total", json!(total)),
        ],
    );

    PenaltyBreakdown {
        under_report,
        late_payment,
        other: Decimal::ZERO,
        total,
        reduction_rate: applied_reduction,
    }
}
