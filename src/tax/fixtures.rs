//! Builders shared by the unit tests of the tax components.

use crate::core::case::*;
use crate::rules::{BuiltinRulePacks, RulePack, RulePackProvider};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn pack(year: i32) -> RulePack {
    BuiltinRulePacks::new().rule_pack(year).unwrap().clone()
}

/// Purchased house with actual prices and the general deduction table.
pub fn house(acquire: NaiveDate, transfer: NaiveDate) -> RealEstateAsset {
    RealEstateAsset {
        id: "house".to_string(),
        rate_code: "1-52".to_string(),
        asset_type: AssetType::Housing,
        transfer_date: transfer,
        acquire_date: acquire,
        transfer_cause: Some(Cause::Purchase),
        acquire_cause: Some(Cause::Purchase),
        transfer_price: dec!(800_000_000),
        acquire_price: dec!(400_000_000),
        acquire_price_type: AcquirePriceType::Actual,
        std_value_transfer_building: None,
        std_value_transfer_land: None,
        std_value_acquire_building: None,
        std_value_acquire_land: None,
        lt_deduction_code: LtDeductionCode::General,
        residence_years: None,
        user_flags: UserFlags::default(),
        inheritance_info: None,
        original_acquisition: None,
        adjusted_area_info: None,
        one_house_exemption_detail: None,
        gift_with_debt: None,
        carryover_tax: None,
        cost_breakdown: None,
    }
}

pub fn land(id: &str, acquire: NaiveDate, transfer: NaiveDate) -> RealEstateAsset {
    RealEstateAsset {
        id: id.to_string(),
        rate_code: "1-10".to_string(),
        asset_type: AssetType::Land,
        ..house(acquire, transfer)
    }
}

pub fn stock(id: &str, transfer: NaiveDate) -> Security {
    Security {
        id: id.to_string(),
        issuer_name: "Issuer".to_string(),
        security_id: None,
        domestic_foreign: DomesticForeign::Domestic,
        stock_type_code: "31".to_string(),
        transfer_type: Some(Cause::Purchase),
        acquire_type: Some(Cause::Purchase),
        quantity: dec!(1000),
        transfer_date: transfer,
        acquire_date: None,
        transfer_price: dec!(500_000_000),
        acquire_price: dec!(100_000_000),
        necessary_expense: dec!(5_000_000),
        tax_deferral_apply: false,
        rate_code: None,
        carryover_tax: None,
    }
}

pub fn derivative(id: &str) -> DerivativeRow {
    DerivativeRow {
        id: id.to_string(),
        rate_code: DerivativeRateCode::Standard,
        product_name: Some("KOSPI200 futures".to_string()),
        transfer_price: dec!(100_000_000),
        necessary_expense: dec!(5_000_000),
        prior_year_carried_gain: dec!(0),
        current_year_loss: dec!(0),
        carried_loss: dec!(0),
        other_deduction: dec!(0),
    }
}

pub fn relief(id: &str, code: &str, relief_type: ReliefType, amount: i64) -> Relief {
    Relief {
        id: id.to_string(),
        asset_id: None,
        relief_code: code.to_string(),
        relief_name: code.to_lowercase(),
        relief_type,
        relief_rate: None,
        relief_amount: amount.into(),
        base_amount: None,
        legal_basis: None,
        limit_group: None,
        prev_year_relief_used: None,
        rural_special_tax_exempt: false,
        is_self_farm_land: false,
    }
}

pub fn case(year: i32) -> TaxCase {
    TaxCase {
        id: "case".to_string(),
        report_type: ReportType::Prelim,
        tax_year: year,
        taxpayer: Taxpayer::default(),
        real_estate: Vec::new(),
        securities: Vec::new(),
        derivatives: None,
        reliefs: Vec::new(),
        penalty: None,
        adjustments: Adjustments::default(),
        flags: FilingFlags::default(),
    }
}
