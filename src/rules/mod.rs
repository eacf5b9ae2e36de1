//! Tax-year rule packs: every statutory constant the engine consumes.
//!
//! Packs are plain data. The engine never derives a constant itself, it asks
//! a [`RulePackProvider`] for the pack of the case's tax year.

mod builtin;

pub use builtin::BuiltinRulePacks;

use crate::core::money::Won;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum RulePackError {
    #[error("no rule pack for tax year {0}")]
    UnsupportedYear(i32),
    #[error("failed to load rule pack from {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Supplies the immutable rule pack for a tax year.
pub trait RulePackProvider {
    fn rule_pack(&self, year: i32) -> Result<&RulePack, RulePackError>;

    /// Latest tax year this provider can serve.
    fn latest_year(&self) -> Option<i32>;
}

impl<P: RulePackProvider + ?Sized> RulePackProvider for &P {
    fn rule_pack(&self, year: i32) -> Result<&RulePack, RulePackError> {
        (**self).rule_pack(year)
    }

    fn latest_year(&self) -> Option<i32> {
        (**self).latest_year()
    }
}

/// Serves the latest known pack when the requested year is missing.
///
/// Opt-in only: the plain providers report unsupported years as errors.
pub struct FallbackToLatest<P>(pub P);

impl<P: RulePackProvider> RulePackProvider for FallbackToLatest<P> {
    fn rule_pack(&self, year: i32) -> Result<&RulePack, RulePackError> {
        match self.0.rule_pack(year) {
            Err(RulePackError::UnsupportedYear(_)) => {
                let latest = self
                    .0
                    .latest_year()
                    .ok_or(RulePackError::UnsupportedYear(year))?;
                log::warn!("no rule pack for {}, using {} rules", year, latest);
                self.0.rule_pack(latest)
            }
            other => other,
        }
    }

    fn latest_year(&self) -> Option<i32> {
        self.0.latest_year()
    }
}

/// A single pack read from a JSON file, served only for its own year.
pub struct FileRulePack {
    pack: RulePack,
}

impl FileRulePack {
    pub fn load(path: &Path) -> Result<Self, RulePackError> {
        let load_err = |e: Box<dyn std::error::Error + Send + Sync>| RulePackError::Load {
            path: path.to_path_buf(),
            source: e,
        };
        let file = std::fs::File::open(path).map_err(|e| load_err(Box::new(e)))?;
        let pack: RulePack = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| load_err(Box::new(e)))?;
        Ok(FileRulePack { pack })
    }

    pub fn from_pack(pack: RulePack) -> Self {
        FileRulePack { pack }
    }
}

impl RulePackProvider for FileRulePack {
    fn rule_pack(&self, year: i32) -> Result<&RulePack, RulePackError> {
        if self.pack.year == year {
            Ok(&self.pack)
        } else {
            Err(RulePackError::UnsupportedYear(year))
        }
    }

    fn latest_year(&self) -> Option<i32> {
        Some(self.pack.year)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RulePack {
    pub year: i32,
    pub brackets: Vec<Bracket>,
    pub rate_categories: BTreeMap<String, RateCategory>,
    /// Transfers inside this window skip the multi-home surtax.
    pub multi_home_suspension: Option<DateWindow>,
    #[schemars(with = "f64")]
    pub non_business_surtax: Decimal,
    pub lt_deduction: LtDeductionTables,
    #[schemars(with = "f64")]
    pub high_value_threshold: Won,
    pub basic_deduction: BasicDeductionLimits,
    #[schemars(with = "f64")]
    pub e_filing_credit: Won,
    pub relief_limits: ReliefLimits,
    pub rural_special_tax: RuralTaxRules,
    pub penalty: PenaltyRules,
    pub carryover: CarryoverRules,
    pub derivative_rates: DerivativeRates,
}

impl RulePack {
    pub fn rate_category(&self, code: &str) -> Option<&RateCategory> {
        self.rate_categories.get(code)
    }

    pub fn multi_home_suspended(&self, transfer_date: NaiveDate) -> bool {
        self.multi_home_suspension
            .is_some_and(|w| w.contains(transfer_date))
    }
}

/// Progressive bracket. `upper = None` marks the open top bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
    #[schemars(with = "Option<f64>")]
    pub upper: Option<Won>,
    #[schemars(with = "f64")]
    pub rate: Decimal,
    #[schemars(with = "f64")]
    pub deduction: Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RateKind {
    Progressive,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateCategory {
    pub label: String,
    pub kind: RateKind,
    /// Flat rate in percent points; ignored for progressive codes.
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub rate: Option<Decimal>,
    #[serde(default)]
    pub non_business: bool,
    /// Multi-home surtax points (20 or 30).
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub multi_home_surtax: Option<Decimal>,
}

impl RateCategory {
    pub fn progressive(label: &str) -> Self {
        RateCategory {
            label: label.to_string(),
            kind: RateKind::Progressive,
            rate: None,
            non_business: false,
            multi_home_surtax: None,
        }
    }

    pub fn flat(label: &str, rate: Decimal) -> Self {
        RateCategory {
            label: label.to_string(),
            kind: RateKind::Flat,
            rate: Some(rate),
            non_business: false,
            multi_home_surtax: None,
        }
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Year-indexed rate table: 0 below `min_years`, years above `cap_years` use
/// the capped entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct YearTable {
    pub min_years: u32,
    pub cap_years: u32,
    #[schemars(with = "BTreeMap<u32, f64>")]
    pub rates: BTreeMap<u32, Decimal>,
}

impl YearTable {
    pub fn rate(&self, years: u32) -> Decimal {
        if years < self.min_years {
            return Decimal::ZERO;
        }
        self.rates
            .get(&years.min(self.cap_years))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaircaseStep {
    pub min_years: u32,
    #[schemars(with = "f64")]
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LtDeductionTables {
    /// Table 1.
    pub general: YearTable,
    /// Table 2, holding component.
    pub one_house_holding: YearTable,
    /// Table 2, residence component.
    pub one_house_residence: YearTable,
    #[schemars(with = "f64")]
    pub one_house_max: Decimal,
    /// Highest step first.
    pub rental_staircase: Vec<StaircaseStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BasicDeductionLimits {
    #[schemars(with = "f64")]
    pub per_bucket: Won,
    #[schemars(with = "f64")]
    pub annual_total: Won,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReliefLimits {
    #[schemars(with = "f64")]
    pub annual: Won,
    #[schemars(with = "f64")]
    pub five_year: Won,
    /// Relief codes subject to the comprehensive ceiling.
    pub applicable_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExemptCode {
    pub code: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuralTaxRules {
    #[schemars(with = "f64")]
    pub rate: Decimal,
    pub exempt_codes: Vec<ExemptCode>,
    /// Codes with this prefix are exempt when the land was self-farmed.
    pub public_acquisition_prefix: String,
}

impl RuralTaxRules {
    pub fn exemption(&self, code: &str) -> Option<&ExemptCode> {
        self.exempt_codes.iter().find(|e| e.code == code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyRules {
    #[schemars(with = "f64")]
    pub general_no_report: Decimal,
    #[schemars(with = "f64")]
    pub general_under_report: Decimal,
    #[schemars(with = "f64")]
    pub unfaithful_no_report: Decimal,
    #[schemars(with = "f64")]
    pub unfaithful_under_report: Decimal,
    #[schemars(with = "f64")]
    pub late_payment_daily_rate: Decimal,
    pub late_payment_max_days: u32,
    /// Reduction per lateness band, seven entries (≤30 … >730 days).
    #[schemars(with = "Vec<f64>")]
    pub late_filing_reduction: Vec<Decimal>,
    #[schemars(with = "Vec<f64>")]
    pub amended_filing_reduction: Vec<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarryoverRules {
    pub real_estate_years: u32,
    /// Gifts on or after this date use `real_estate_years_extended`.
    pub real_estate_extended_from: NaiveDate,
    pub real_estate_years_extended: u32,
    pub securities_years: u32,
    /// First tax year in which securities carryover applies.
    pub securities_effective_year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DerivativeRates {
    #[schemars(with = "f64")]
    pub transitional: Decimal,
    #[schemars(with = "f64")]
    pub standard: Decimal,
}
