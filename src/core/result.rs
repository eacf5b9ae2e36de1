//! Derived output records. Recreated on every calculation, never persisted.

use crate::core::log::LogEntry;
use crate::core::money::Won;
use crate::rules::RateKind;
use crate::tax::acquisition::CostStep;
use crate::tax::holding::HoldingPeriod;
use crate::tax::one_house::OneHouseVerdict;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Schedules in input order: real estate, then securities, then derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetKind {
    RealEstate,
    Security,
    Derivative,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::RealEstate => write!(f, "real estate"),
            AssetKind::Security => write!(f, "security"),
            AssetKind::Derivative => write!(f, "derivative"),
        }
    }
}

/// Basic deduction categories, in allocation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeductionBucket {
    Domestic,
    Stock,
    Derivative,
    Foreign,
    Other,
}

impl DeductionBucket {
    pub const ALL: [DeductionBucket; 5] = [
        DeductionBucket::Domestic,
        DeductionBucket::Stock,
        DeductionBucket::Derivative,
        DeductionBucket::Foreign,
        DeductionBucket::Other,
    ];
}

impl fmt::Display for DeductionBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeductionBucket::Domestic => write!(f, "domestic real property"),
            DeductionBucket::Stock => write!(f, "domestic stock"),
            DeductionBucket::Derivative => write!(f, "derivatives"),
            DeductionBucket::Foreign => write!(f, "foreign"),
            DeductionBucket::Other => write!(f, "other"),
        }
    }
}

/// Rate classification applied to one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedRate {
    pub rate_code: String,
    pub rate_type: RateKind,
    /// Flat rate in percent points, absent for progressive codes.
    pub rate_value: Option<Decimal>,
    /// Surtax points added on top (multi-home, non-business land).
    pub additional_rate: Decimal,
    pub rate_label: String,
}

impl AppliedRate {
    pub fn flat(code: &str, rate: Decimal, label: &str) -> Self {
        AppliedRate {
            rate_code: code.to_string(),
            rate_type: RateKind::Flat,
            rate_value: Some(rate),
            additional_rate: Decimal::ZERO,
            rate_label: label.to_string(),
        }
    }

    pub fn progressive(code: &str, label: &str) -> Self {
        AppliedRate {
            rate_code: code.to_string(),
            rate_type: RateKind::Progressive,
            rate_value: None,
            additional_rate: Decimal::ZERO,
            rate_label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetResult {
    pub asset_id: String,
    pub kind: AssetKind,
    /// Position of the asset in its input list, used as the sort tie-break.
    #[serde(skip)]
    pub input_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_type_code: Option<String>,
    pub unregistered: bool,
    #[serde(flatten)]
    pub rate: AppliedRate,
    pub transfer_date: Option<NaiveDate>,
    pub transfer_price: Won,
    pub acquire_price: Won,
    pub necessary_expense: Won,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cost_basis: Vec<CostStep>,
    pub gift_tax_expense: Won,
    /// Raw gain, may be negative.
    pub transfer_gain_total: Won,
    pub high_value_ratio: Decimal,
    pub taxable_transfer_gain: Won,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holding: Option<HoldingPeriod>,
    pub residence_years: u32,
    pub lt_deduction_rate: Decimal,
    pub lt_deduction_amount: Won,
    pub taxable_lt_deduction: Won,
    pub gain_income: Won,
    pub deduction_bucket: DeductionBucket,
    pub basic_deduction: Won,
    pub tax_base: Won,
    pub asset_tax: Won,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_house: Option<OneHouseVerdict>,
}

impl AssetResult {
    /// A result with every derived amount zeroed, ready for a valuation
    /// engine to fill in.
    pub fn new(
        asset_id: &str,
        kind: AssetKind,
        input_index: usize,
        rate: AppliedRate,
        bucket: DeductionBucket,
    ) -> Self {
        AssetResult {
            asset_id: asset_id.to_string(),
            kind,
            input_index,
            asset_type_code: None,
            unregistered: false,
            rate,
            transfer_date: None,
            transfer_price: Decimal::ZERO,
            acquire_price: Decimal::ZERO,
            necessary_expense: Decimal::ZERO,
            cost_basis: Vec::new(),
            gift_tax_expense: Decimal::ZERO,
            transfer_gain_total: Decimal::ZERO,
            high_value_ratio: Decimal::ZERO,
            taxable_transfer_gain: Decimal::ZERO,
            holding: None,
            residence_years: 0,
            lt_deduction_rate: Decimal::ZERO,
            lt_deduction_amount: Decimal::ZERO,
            taxable_lt_deduction: Decimal::ZERO,
            gain_income: Decimal::ZERO,
            deduction_bucket: bucket,
            basic_deduction: Decimal::ZERO,
            tax_base: Decimal::ZERO,
            asset_tax: Decimal::ZERO,
            one_house: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyBreakdown {
    pub under_report: Won,
    pub late_payment: Won,
    pub other: Won,
    pub total: Won,
    /// Reduction rate applied to the underreporting penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduction_rate: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuralTaxDetail {
    pub relief_id: String,
    pub relief_code: String,
    pub relief_name: String,
    pub relief_amount: Won,
    pub is_exempt: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exempt_reason: Option<String>,
    /// Display figure only; the aggregate amount is authoritative.
    pub rural_tax_amount: Won,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuralTaxBreakdown {
    pub taxable_relief_amount: Won,
    pub exempt_relief_amount: Won,
    pub tax_rate: Decimal,
    pub tax_amount: Won,
    pub details: Vec<RuralTaxDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReliefLimitBreakdown {
    pub annual_limit: Won,
    pub five_year_limit: Won,
    pub requested_amount: Won,
    pub prev_four_years_used: Won,
    pub annual_excess: Won,
    pub five_year_excess: Won,
    pub exceeded_amount: Won,
    pub limited_amount: Won,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateGroupSummary {
    pub rate_code: String,
    pub gain_income_sum: Won,
    pub asset_count: usize,
}

/// Official return lines ④ to ⑱ plus supporting breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainResult {
    #[serde(rename = "line04_gainIncomeTotal")]
    pub gain_income_total: Won,
    #[serde(rename = "line05_prevReportedGainIncome")]
    pub prev_reported_gain_income: Won,
    #[serde(rename = "line06_incomeDeductionBase")]
    pub income_deduction_base: Won,
    #[serde(rename = "line07_basicDeduction")]
    pub basic_deduction: Won,
    #[serde(rename = "line08_taxBase")]
    pub tax_base: Won,
    #[serde(rename = "line09_rateLabel")]
    pub rate_label: String,
    #[serde(rename = "taxA")]
    pub tax_a: Won,
    #[serde(rename = "taxB")]
    pub tax_b: Won,
    #[serde(rename = "line10_taxBeforeCredits")]
    pub tax_before_credits: Won,
    #[serde(rename = "line11_taxRelief")]
    pub tax_relief: Won,
    #[serde(rename = "line12_foreignTaxCredit")]
    pub foreign_tax_credit: Won,
    #[serde(rename = "line13_withholdingCredit")]
    pub withholding_credit: Won,
    #[serde(rename = "line14_pensionCredit")]
    pub pension_credit: Won,
    #[serde(rename = "line15_eFilingCredit")]
    pub e_filing_credit: Won,
    #[serde(rename = "line16_penalty")]
    pub penalty: PenaltyBreakdown,
    #[serde(rename = "line17_prevTaxPaid")]
    pub prev_tax_paid: Won,
    #[serde(rename = "line18_taxDue")]
    pub tax_due: Won,
    #[serde(rename = "ruralSpecialTax")]
    pub rural_special_tax: RuralTaxBreakdown,
    #[serde(rename = "reliefLimitResult")]
    pub relief_limit: ReliefLimitBreakdown,
    #[serde(rename = "totalTaxDue")]
    pub total_tax_due: Won,
    #[serde(rename = "rateCategorySummary")]
    pub rate_category_summary: Vec<RateGroupSummary>,
    #[serde(rename = "basicDeductionByBucket")]
    pub basic_deduction_by_bucket: BTreeMap<DeductionBucket, Won>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub case_id: String,
    pub tax_year: i32,
    /// Year of the rule pack actually used.
    pub rule_pack_year: i32,
    pub calculated_at: DateTime<Utc>,
    /// Hex SHA-256 of the input case JSON.
    pub input_digest: String,
    pub asset_results: Vec<AssetResult>,
    pub main_result: MainResult,
    pub calculation_log: Vec<LogEntry>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}
