//! Filing case input model.
//!
//! JSON field names are camelCase; coded values use the official form codes.
//! Nested fact blocks are `Option<Block>` with an `enabled` flag, and the
//! accessor methods hand out only enabled blocks.

use crate::core::money::Won;
use crate::core::warnings::Warning;
use chrono::NaiveDate;
use kcgt_derive::FormFields;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Column metadata generated by `#[derive(FormFields)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub line: &'static str,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    /// Preliminary return filed after each transfer
    Prelim,
    /// Final return for the year
    Final,
    /// Amended return
    Amend,
    /// Return filed after the deadline
    Late,
}

/// Asset-type codes of the real-estate schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum AssetType {
    #[serde(rename = "1")]
    Land,
    #[serde(rename = "2")]
    Housing,
    #[serde(rename = "3")]
    GeneralBuilding,
    #[serde(rename = "4")]
    OtherBuilding,
    #[serde(rename = "5")]
    SurfaceRight,
    #[serde(rename = "6")]
    LeaseholdRight,
    #[serde(rename = "7")]
    RegisteredLease,
    #[serde(rename = "8")]
    SpecificStock,
    #[serde(rename = "14")]
    Goodwill,
    #[serde(rename = "15")]
    FacilityUseRight,
    #[serde(rename = "16")]
    RelocationRight,
    #[serde(rename = "17")]
    TrustBeneficialRight,
    #[serde(rename = "23")]
    RealEstateRichStock,
    #[serde(rename = "24")]
    RightToAcquire,
    #[serde(rename = "25")]
    MembershipRight,
    #[serde(rename = "26")]
    PreSaleRight,
}

impl AssetType {
    pub fn code(&self) -> &'static str {
        match self {
            AssetType::Land => "1",
            AssetType::Housing => "2",
            AssetType::GeneralBuilding => "3",
            AssetType::OtherBuilding => "4",
            AssetType::SurfaceRight => "5",
            AssetType::LeaseholdRight => "6",
            AssetType::RegisteredLease => "7",
            AssetType::SpecificStock => "8",
            AssetType::Goodwill => "14",
            AssetType::FacilityUseRight => "15",
            AssetType::RelocationRight => "16",
            AssetType::TrustBeneficialRight => "17",
            AssetType::RealEstateRichStock => "23",
            AssetType::RightToAcquire => "24",
            AssetType::MembershipRight => "25",
            AssetType::PreSaleRight => "26",
        }
    }

    pub fn is_building(&self) -> bool {
        matches!(self, AssetType::GeneralBuilding | AssetType::OtherBuilding)
    }
}

/// Transfer or acquisition cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Cause {
    #[serde(rename = "1")]
    Purchase,
    #[serde(rename = "2")]
    Expropriation,
    #[serde(rename = "3")]
    NegotiatedPurchase,
    #[serde(rename = "4")]
    Exchange,
    #[serde(rename = "5")]
    PublicSale,
    #[serde(rename = "6")]
    Auction,
    #[serde(rename = "7")]
    Inheritance,
    #[serde(rename = "8")]
    Gift,
    #[serde(rename = "9")]
    NewConstruction,
    #[serde(rename = "10")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcquirePriceType {
    #[default]
    Actual,
    Comparable,
    Appraisal,
    Converted,
    Standard,
    ForeignGov,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum LtDeductionCode {
    /// Table 2, one household one house
    #[serde(rename = "01")]
    OneHouse,
    /// Table 1
    #[default]
    #[serde(rename = "02")]
    General,
    #[serde(rename = "03")]
    Excluded,
    /// Long-term rental housing
    #[serde(rename = "04")]
    LongTermRental,
    /// Public-support private rental housing
    #[serde(rename = "05")]
    SupportedRental,
    /// Regional unsold housing, no holding deduction
    #[serde(rename = "06")]
    RegionalUnsold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum DomesticForeign {
    #[default]
    #[serde(rename = "1")]
    Domestic,
    #[serde(rename = "2")]
    Foreign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxCase {
    pub id: String,
    pub report_type: ReportType,
    pub tax_year: i32,
    #[serde(default)]
    pub taxpayer: Taxpayer,
    #[serde(default)]
    pub real_estate: Vec<RealEstateAsset>,
    #[serde(default)]
    pub securities: Vec<Security>,
    #[serde(default)]
    pub derivatives: Option<DerivativeSet>,
    #[serde(default)]
    pub reliefs: Vec<Relief>,
    #[serde(default)]
    pub penalty: Option<PenaltyInfo>,
    #[serde(default)]
    pub adjustments: Adjustments,
    #[serde(default)]
    pub flags: FilingFlags,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Taxpayer {
    #[serde(default)]
    pub name: String,
    /// Resident registration number
    #[serde(default)]
    pub rrn: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// User-asserted facts about a real-estate asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UserFlags {
    pub unregistered: bool,
    pub non_business_land: bool,
    pub multi_home_surtax: bool,
    pub multi_home_count: u32,
    pub adjusted_area: bool,
    pub one_house_exemption: bool,
    pub high_value_housing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RealEstateAsset {
    pub id: String,
    pub rate_code: String,
    #[serde(rename = "assetTypeCode")]
    pub asset_type: AssetType,
    pub transfer_date: NaiveDate,
    pub acquire_date: NaiveDate,
    #[serde(default)]
    pub transfer_cause: Option<Cause>,
    #[serde(default)]
    pub acquire_cause: Option<Cause>,
    #[schemars(with = "f64")]
    pub transfer_price: Won,
    #[schemars(with = "f64")]
    pub acquire_price: Won,
    #[serde(default)]
    pub acquire_price_type: AcquirePriceType,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub std_value_transfer_building: Option<Won>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub std_value_transfer_land: Option<Won>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub std_value_acquire_building: Option<Won>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub std_value_acquire_land: Option<Won>,
    #[serde(default)]
    pub lt_deduction_code: LtDeductionCode,
    #[serde(default)]
    pub residence_years: Option<u32>,
    #[serde(default)]
    pub user_flags: UserFlags,
    #[serde(default)]
    pub inheritance_info: Option<InheritanceInfo>,
    #[serde(default)]
    pub original_acquisition: Option<OriginalAcquisition>,
    #[serde(default)]
    pub adjusted_area_info: Option<AdjustedAreaInfo>,
    #[serde(default)]
    pub one_house_exemption_detail: Option<OneHouseExemptionDetail>,
    #[serde(default)]
    pub gift_with_debt: Option<GiftWithDebt>,
    #[serde(default)]
    pub carryover_tax: Option<CarryoverTax>,
    #[serde(default)]
    pub cost_breakdown: Option<CostBreakdown>,
}

/// A nested fact block that only applies when switched on.
pub trait Toggle {
    fn is_enabled(&self) -> bool;
}

fn enabled<T: Toggle>(block: &Option<T>) -> Option<&T> {
    block.as_ref().filter(|b| b.is_enabled())
}

macro_rules! impl_toggle {
    ($($ty:ty),*) => {
        $(impl Toggle for $ty {
            fn is_enabled(&self) -> bool {
                self.enabled
            }
        })*
    };
}

impl_toggle!(
    InheritanceInfo,
    OriginalAcquisition,
    AdjustedAreaInfo,
    OneHouseExemptionDetail,
    GiftWithDebt,
    CarryoverTax,
    CostBreakdown
);

impl RealEstateAsset {
    /// Inheritance facts, only when the asset was actually inherited.
    pub fn inheritance(&self) -> Option<&InheritanceInfo> {
        if self.acquire_cause != Some(Cause::Inheritance) {
            return None;
        }
        enabled(&self.inheritance_info)
    }

    pub fn original_acquisition(&self) -> Option<&OriginalAcquisition> {
        enabled(&self.original_acquisition)
    }

    pub fn adjusted_area(&self) -> Option<&AdjustedAreaInfo> {
        enabled(&self.adjusted_area_info)
    }

    pub fn one_house_detail(&self) -> Option<&OneHouseExemptionDetail> {
        enabled(&self.one_house_exemption_detail)
    }

    pub fn gift_with_debt(&self) -> Option<&GiftWithDebt> {
        enabled(&self.gift_with_debt)
    }

    pub fn carryover(&self) -> Option<&CarryoverTax> {
        enabled(&self.carryover_tax)
    }

    pub fn cost_breakdown(&self) -> Option<&CostBreakdown> {
        enabled(&self.cost_breakdown)
    }

    pub fn is_housing(&self) -> bool {
        self.asset_type == AssetType::Housing
    }

    /// Pre-sale and redevelopment membership rights follow their own rate table.
    pub fn is_housing_right(&self) -> bool {
        matches!(
            self.asset_type,
            AssetType::PreSaleRight | AssetType::MembershipRight
        )
    }

    /// High-value housing by assertion or by price above the threshold.
    pub fn is_high_value(&self, threshold: Won) -> bool {
        self.user_flags.high_value_housing || self.transfer_price > threshold
    }

    /// One-house exempt and under the high-value threshold: the gain is not
    /// taxed at all, so carryover substitution is pointless.
    pub fn exempt_low_value_house(&self, threshold: Won) -> bool {
        self.user_flags.one_house_exemption && !self.is_high_value(threshold)
    }

    /// Stated residence plus inherited residence for same-household inheritance.
    pub fn total_residence_years(&self) -> u32 {
        let inherited = self
            .inheritance()
            .filter(|i| i.same_household)
            .and_then(|i| i.decedent_residence_years)
            .unwrap_or(0);
        self.residence_years.unwrap_or(0) + inherited
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InheritanceInfo {
    #[serde(default)]
    pub enabled: bool,
    /// Date of the decedent's death
    #[serde(default)]
    pub inheritance_date: Option<NaiveDate>,
    #[serde(default)]
    pub decedent_acquire_date: Option<NaiveDate>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub decedent_acquire_cost: Option<Won>,
    #[serde(default)]
    pub decedent_acquire_cause: Option<Cause>,
    /// Value assessed for inheritance tax
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub inheritance_tax_value: Option<Won>,
    #[serde(default)]
    pub same_household: bool,
    #[serde(default)]
    pub decedent_holding_years: Option<u32>,
    #[serde(default)]
    pub decedent_residence_years: Option<u32>,
    #[serde(default)]
    pub business_succession: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChainLink {
    pub date: NaiveDate,
    pub cause: Cause,
    #[schemars(with = "f64")]
    pub value: Won,
}

/// The acquisition that started the ownership chain (e.g. before an exchange).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OriginalAcquisition {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub cost: Option<Won>,
    #[serde(default)]
    pub cause: Option<Cause>,
    #[serde(default)]
    pub chain_history: Vec<ChainLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedAreaInfo {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub acquired_in_adjusted_area: bool,
    #[serde(default)]
    pub currently_adjusted_area: bool,
    #[serde(default)]
    pub adjusted_area_acquire_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoldingExemptReason {
    #[default]
    None,
    OverseasEmigration,
    OverseasWorkStudy,
    RentalHousingResidence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResidenceExemptReason {
    #[default]
    None,
    WorkStudyIllness,
    PreAdjustedAreaContract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemporaryExemptReason {
    #[default]
    None,
    #[serde(rename = "TEMPORARY_2HOUSE")]
    TemporaryTwoHouse,
    InheritedHouse,
    MarriageMerge,
    ElderlyCare,
    RuralRelocation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct OneHouseExemptionDetail {
    pub enabled: bool,
    pub actual_holding_years: u32,
    pub inherited_holding_years: u32,
    pub actual_residence_years: u32,
    pub inherited_residence_years: u32,
    pub holding_exempt_reason: HoldingExemptReason,
    pub residence_exempt_reason: ResidenceExemptReason,
    pub temporary_exempt_reason: TemporaryExemptReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValuationMethod {
    /// Market price: donor's actual acquisition cost
    #[default]
    MarketPrice,
    /// Supplementary standard value: donor's standard price at acquisition
    SupplementaryStandard,
    RentConversion,
    CollateralDebt,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GiftWithDebt {
    #[serde(default)]
    pub enabled: bool,
    #[schemars(with = "f64")]
    pub assessed_value: Won,
    #[schemars(with = "f64")]
    pub debt_amount: Won,
    #[serde(default)]
    pub valuation_method: ValuationMethod,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub donor_actual_acquire_cost: Option<Won>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub donor_standard_price_at_acquire: Option<Won>,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub donor_acquire_cost: Won,
    #[serde(default)]
    pub gift_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DonorRelation {
    Spouse,
    Lineal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CarryoverExclusion {
    #[default]
    None,
    OneHouseExemption,
    LowerTaxBenefit,
    SpouseDeath,
    PublicAcquisition,
    RelationshipTerminated,
}

/// Carryover taxation facts for an asset received as a gift from a spouse or
/// lineal relative and transferred within the statutory window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarryoverTax {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub gift_date: Option<NaiveDate>,
    #[serde(default)]
    pub donor_acquire_date: Option<NaiveDate>,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub donor_acquire_cost: Won,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub gift_tax_paid: Option<Won>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub gift_tax_base: Option<Won>,
    /// Gift-tax base across all jointly gifted assets
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub total_gift_tax_base: Option<Won>,
    #[serde(default)]
    pub donor_relation: Option<DonorRelation>,
    #[serde(default)]
    pub exclusion_reason: CarryoverExclusion,
}

/// Itemized acquisition costs (lines 111-116).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AcquisitionCosts {
    #[schemars(with = "Option<f64>")]
    pub purchase_price: Option<Won>,
    #[schemars(with = "Option<f64>")]
    pub acquisition_tax: Option<Won>,
    #[schemars(with = "Option<f64>")]
    pub registration_tax: Option<Won>,
    #[schemars(with = "Option<f64>")]
    pub lawyer_fee: Option<Won>,
    #[schemars(with = "Option<f64>")]
    pub broker_fee: Option<Won>,
    #[schemars(with = "Option<f64>")]
    pub other: Option<Won>,
}

/// Itemized necessary expenses (lines 210, 220, 250-290).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpenseLines {
    #[schemars(with = "Option<f64>")]
    pub capital_expense: Option<Won>,
    #[schemars(with = "Option<f64>")]
    pub transfer_expense: Option<Won>,
    #[schemars(with = "Option<f64>")]
    pub filing_fee: Option<Won>,
    #[schemars(with = "Option<f64>")]
    pub lawyer_fee: Option<Won>,
    #[schemars(with = "Option<f64>")]
    pub notary_fee: Option<Won>,
    #[schemars(with = "Option<f64>")]
    pub stamp_duty: Option<Won>,
    #[schemars(with = "Option<f64>")]
    pub other: Option<Won>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CostBreakdown {
    pub enabled: bool,
    pub acquire_costs: AcquisitionCosts,
    pub expenses: ExpenseLines,
}

impl CostBreakdown {
    pub fn acquire_total(&self) -> Won {
        let c = &self.acquire_costs;
        [
            c.purchase_price,
            c.acquisition_tax,
            c.registration_tax,
            c.lawyer_fee,
            c.broker_fee,
            c.other,
        ]
        .into_iter()
        .flatten()
        .sum()
    }

    pub fn expense_total(&self) -> Won {
        let e = &self.expenses;
        [
            e.capital_expense,
            e.transfer_expense,
            e.filing_fee,
            e.lawyer_fee,
            e.notary_fee,
            e.stamp_duty,
            e.other,
        ]
        .into_iter()
        .flatten()
        .sum()
    }
}

/// Stock-type codes with their own default rate code.
pub mod stock_type {
    pub const SMALL_MEDIUM_ENTERPRISE: &str = "33";
    pub const LISTED_MAJOR_SHAREHOLDER: &str = "34";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    pub id: String,
    #[serde(default)]
    pub issuer_name: String,
    #[serde(default)]
    pub security_id: Option<String>,
    #[serde(default)]
    pub domestic_foreign: DomesticForeign,
    #[serde(default)]
    pub stock_type_code: String,
    #[serde(default)]
    pub transfer_type: Option<Cause>,
    #[serde(default)]
    pub acquire_type: Option<Cause>,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub quantity: Decimal,
    pub transfer_date: NaiveDate,
    #[serde(default)]
    pub acquire_date: Option<NaiveDate>,
    #[schemars(with = "f64")]
    pub transfer_price: Won,
    #[schemars(with = "f64")]
    pub acquire_price: Won,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub necessary_expense: Won,
    #[serde(default)]
    pub tax_deferral_apply: bool,
    #[serde(default)]
    pub rate_code: Option<String>,
    #[serde(default)]
    pub carryover_tax: Option<CarryoverTax>,
}

impl Security {
    pub fn carryover(&self) -> Option<&CarryoverTax> {
        enabled(&self.carryover_tax)
    }

    pub fn is_foreign(&self) -> bool {
        self.domestic_foreign == DomesticForeign::Foreign
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DerivativeSet {
    #[serde(default)]
    pub tax_year: Option<i32>,
    #[serde(default)]
    pub rows: Vec<DerivativeRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DerivativeRateCode {
    /// 5% rate for transfers before the statutory cutoff
    #[serde(rename = "80")]
    Transitional,
    /// 10% rate
    #[serde(rename = "81")]
    Standard,
}

impl DerivativeRateCode {
    pub fn code(&self) -> &'static str {
        match self {
            DerivativeRateCode::Transitional => "80",
            DerivativeRateCode::Standard => "81",
        }
    }
}

/// One product row of the derivatives schedule. Column names double as the
/// CSV import header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, FormFields)]
pub struct DerivativeRow {
    /// Row identifier
    pub id: String,
    /// Rate code: 80 (5%) or 81 (10%)
    #[serde(rename = "rateCode")]
    #[form(line = "②")]
    pub rate_code: DerivativeRateCode,
    /// Product name
    #[serde(rename = "productName", default)]
    #[form(line = "③")]
    pub product_name: Option<String>,
    /// Transfer price
    #[serde(rename = "transferPrice")]
    #[form(line = "⑧")]
    #[schemars(with = "f64")]
    pub transfer_price: Won,
    /// Necessary expense
    #[serde(rename = "necessaryExpense", default)]
    #[form(line = "⑨")]
    #[schemars(with = "f64")]
    pub necessary_expense: Won,
    /// Gain already reported earlier in the year
    #[serde(rename = "priorYearCarriedGain", default)]
    #[form(line = "⑪")]
    #[schemars(with = "f64")]
    pub prior_year_carried_gain: Won,
    /// Loss in the current year
    #[serde(rename = "currentYearLoss", default)]
    #[form(line = "⑫")]
    #[schemars(with = "f64")]
    pub current_year_loss: Won,
    /// Carried loss (added as written on the form)
    #[serde(rename = "carriedLoss", default)]
    #[form(line = "⑬")]
    #[schemars(with = "f64")]
    pub carried_loss: Won,
    /// Other deductions
    #[serde(rename = "otherDeduction", default)]
    #[form(line = "⑭")]
    #[schemars(with = "f64")]
    pub other_deduction: Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReliefType {
    /// Reduces tax directly
    Tax,
    /// Reduces taxable income
    Income,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Relief {
    pub id: String,
    /// Asset the relief belongs to, by id
    #[serde(default)]
    pub asset_id: Option<String>,
    pub relief_code: String,
    #[serde(default)]
    pub relief_name: String,
    pub relief_type: ReliefType,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub relief_rate: Option<Decimal>,
    #[schemars(with = "f64")]
    pub relief_amount: Won,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub base_amount: Option<Won>,
    #[serde(default)]
    pub legal_basis: Option<String>,
    #[serde(default)]
    pub limit_group: Option<String>,
    /// Relief used in the prior four years
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub prev_year_relief_used: Option<Won>,
    #[serde(default)]
    pub rural_special_tax_exempt: bool,
    #[serde(default)]
    pub is_self_farm_land: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnderReportType {
    #[default]
    None,
    NoReport,
    UnderReport,
    UnfaithfulNo,
    UnfaithfulUnder,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PenaltyInfo {
    pub under_report_type: UnderReportType,
    #[schemars(with = "f64")]
    pub under_report_base: Won,
    pub late_payment_days: u32,
    #[schemars(with = "f64")]
    pub late_payment_base: Won,
    pub report_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub reduction_applied: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Adjustments {
    #[schemars(with = "f64")]
    pub prev_reported_gain_income: Won,
    #[schemars(with = "f64")]
    pub foreign_tax_credit: Won,
    #[schemars(with = "f64")]
    pub withholding_credit: Won,
    #[schemars(with = "f64")]
    pub pension_credit: Won,
    #[schemars(with = "f64")]
    pub prev_tax_paid: Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FilingFlags {
    pub e_filing: bool,
    pub proxy_filing: bool,
}

impl Default for FilingFlags {
    fn default() -> Self {
        FilingFlags {
            e_filing: true,
            proxy_filing: false,
        }
    }
}

impl TaxCase {
    /// Parse a case from JSON.
    pub fn from_json<R: std::io::Read>(reader: R) -> serde_json::Result<Self> {
        serde_json::from_reader(reader)
    }

    pub fn derivative_rows(&self) -> &[DerivativeRow] {
        self.derivatives.as_ref().map_or(&[], |d| d.rows.as_slice())
    }

    /// Boundary checks on enabled fact blocks. Findings are advisory only.
    pub fn validate(&self) -> Vec<Warning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        let ids = self
            .real_estate
            .iter()
            .map(|a| a.id.as_str())
            .chain(self.securities.iter().map(|s| s.id.as_str()))
            .chain(self.derivative_rows().iter().map(|r| r.id.as_str()));
        for id in ids {
            if !seen.insert(id) {
                warnings.push(Warning::DuplicateAssetId {
                    asset_id: id.to_string(),
                });
            }
        }

        for asset in &self.real_estate {
            let id = || asset.id.clone();
            if asset.acquire_date > asset.transfer_date {
                warnings.push(Warning::AcquiredAfterTransfer { asset_id: id() });
            }
            if asset.acquire_cause == Some(Cause::Inheritance)
                && asset.inheritance().is_some_and(|i| i.inheritance_date.is_none())
            {
                warnings.push(Warning::InheritanceDateMissing { asset_id: id() });
            }
            if let Some(carryover) = asset.carryover() {
                check_carryover(carryover, asset.transfer_date, &asset.id, &mut warnings);
            }
            if let Some(gift) = asset.gift_with_debt() {
                if gift.debt_amount > gift.assessed_value {
                    warnings.push(Warning::DebtExceedsAssessedValue { asset_id: id() });
                }
            }
            if let Some(original) = asset.original_acquisition() {
                if original.date.is_some_and(|d| d > asset.acquire_date) {
                    warnings.push(Warning::OriginalAcquisitionAfterAcquireDate {
                        asset_id: id(),
                    });
                }
            }
        }

        for security in &self.securities {
            if let Some(carryover) = security.carryover() {
                check_carryover(carryover, security.transfer_date, &security.id, &mut warnings);
            }
        }

        for relief in &self.reliefs {
            if let Some(asset_id) = &relief.asset_id {
                if !seen.contains(asset_id.as_str()) {
                    warnings.push(Warning::UnknownReliefAsset {
                        relief_id: relief.id.clone(),
                        asset_id: asset_id.clone(),
                    });
                }
            }
        }

        warnings
    }
}

fn check_carryover(
    carryover: &CarryoverTax,
    transfer_date: NaiveDate,
    asset_id: &str,
    warnings: &mut Vec<Warning>,
) {
    match carryover.gift_date {
        None => warnings.push(Warning::GiftDateMissing {
            asset_id: asset_id.to_string(),
        }),
        Some(gift) if gift > transfer_date => warnings.push(Warning::GiftAfterTransfer {
            asset_id: asset_id.to_string(),
        }),
        Some(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const MINIMAL: &str = r#"{
        "id": "case-1",
        "reportType": "PRELIM",
        "taxYear": 2024,
        "realEstate": [{
            "id": "land-1",
            "rateCode": "1-10",
            "assetTypeCode": "1",
            "transferDate": "2024-06-15",
            "acquireDate": "2009-06-15",
            "transferPrice": 500000000,
            "acquirePrice": 200000000,
            "ltDeductionCode": "02",
            "inheritanceInfo": { "enabled": false, "inheritanceTaxValue": 1 }
        }]
    }"#;

    #[test]
    fn parses_minimal_case_with_defaults() {
        let case = TaxCase::from_json(MINIMAL.as_bytes()).unwrap();
        assert_eq!(case.report_type, ReportType::Prelim);
        assert!(case.flags.e_filing);
        assert!(!case.flags.proxy_filing);
        let asset = &case.real_estate[0];
        assert_eq!(asset.asset_type, AssetType::Land);
        assert_eq!(asset.acquire_price_type, AcquirePriceType::Actual);
        assert_eq!(asset.transfer_price, dec!(500000000));
        assert!(case.derivatives.is_none());
    }

    #[test]
    fn disabled_blocks_are_not_applicable() {
        let case = TaxCase::from_json(MINIMAL.as_bytes()).unwrap();
        let asset = &case.real_estate[0];
        assert!(asset.inheritance_info.is_some());
        assert!(asset.inheritance().is_none());
        assert!(asset.carryover().is_none());
    }

    #[test]
    fn inheritance_requires_inheritance_cause() {
        let mut case = TaxCase::from_json(MINIMAL.as_bytes()).unwrap();
        let asset = &mut case.real_estate[0];
        asset.inheritance_info = Some(InheritanceInfo {
            enabled: true,
            ..Default::default()
        });
        assert!(asset.inheritance().is_none());
        asset.acquire_cause = Some(Cause::Inheritance);
        assert!(asset.inheritance().is_some());
    }

    #[test]
    fn itemized_totals_sum_present_lines() {
        let breakdown = CostBreakdown {
            enabled: true,
            acquire_costs: AcquisitionCosts {
                purchase_price: Some(dec!(300000000)),
                acquisition_tax: Some(dec!(12000000)),
                broker_fee: Some(dec!(1500000)),
                ..Default::default()
            },
            expenses: ExpenseLines {
                capital_expense: Some(dec!(20000000)),
                stamp_duty: Some(dec!(150000)),
                ..Default::default()
            },
        };
        assert_eq!(breakdown.acquire_total(), dec!(313500000));
        assert_eq!(breakdown.expense_total(), dec!(20150000));
        assert_eq!(CostBreakdown::default().acquire_total(), Decimal::ZERO);
    }

    #[test]
    fn validate_flags_boundary_problems() {
        let mut case = TaxCase::from_json(MINIMAL.as_bytes()).unwrap();
        let mut dup = case.real_estate[0].clone();
        dup.carryover_tax = Some(CarryoverTax {
            enabled: true,
            ..Default::default()
        });
        dup.gift_with_debt = Some(GiftWithDebt {
            enabled: true,
            assessed_value: dec!(100),
            debt_amount: dec!(200),
            ..Default::default()
        });
        case.real_estate.push(dup);
        case.reliefs.push(Relief {
            id: "r1".to_string(),
            asset_id: Some("missing".to_string()),
            relief_code: "SELF_FARM_8Y".to_string(),
            relief_name: String::new(),
            relief_type: ReliefType::Tax,
            relief_rate: None,
            relief_amount: dec!(1000),
            base_amount: None,
            legal_basis: None,
            limit_group: None,
            prev_year_relief_used: None,
            rural_special_tax_exempt: false,
            is_self_farm_land: false,
        });

        let warnings = case.validate();
        assert!(warnings.contains(&Warning::DuplicateAssetId {
            asset_id: "land-1".to_string()
        }));
        assert!(warnings.contains(&Warning::GiftDateMissing {
            asset_id: "land-1".to_string()
        }));
        assert!(warnings.contains(&Warning::DebtExceedsAssessedValue {
            asset_id: "land-1".to_string()
        }));
        assert!(warnings.contains(&Warning::UnknownReliefAsset {
            relief_id: "r1".to_string(),
            asset_id: "missing".to_string()
        }));
    }

    #[test]
    fn derivative_columns_come_from_field_metadata() {
        let fields = DerivativeRow::form_fields();
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            [
                "id",
                "rateCode",
                "productName",
                "transferPrice",
                "necessaryExpense",
                "priorYearCarriedGain",
                "currentYearLoss",
                "carriedLoss",
                "otherDeduction"
            ]
        );
        let transfer = fields.iter().find(|f| f.name == "transferPrice").unwrap();
        assert_eq!(transfer.line, "⑧");
        assert!(transfer.required);
        assert!(!fields.iter().find(|f| f.name == "productName").unwrap().required);
    }
}
