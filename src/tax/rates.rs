//! Rate-code classification: flat or progressive, plus surtax points.

use crate::core::case::{stock_type, AssetType, RealEstateAsset, Security, TaxCase};
use crate::core::dates::ShortTermBand;
use crate::core::result::AppliedRate;
use crate::core::warnings::Warning;
use crate::rules::{RateCategory, RateKind, RulePack};
use crate::tax::holding::{self, HoldingPurpose};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const UNREGISTERED: &str = "1-35";

/// Surtax facts asserted on the asset rather than carried by its rate code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurtaxFacts {
    pub non_business_land: bool,
    pub multi_home_tier: Option<Decimal>,
}

impl SurtaxFacts {
    pub fn of(asset: &RealEstateAsset) -> Self {
        let flags = &asset.user_flags;
        let multi_home_tier = if asset.is_housing() && flags.multi_home_surtax && flags.adjusted_area
        {
            match flags.multi_home_count {
                0 | 1 => None,
                2 => Some(dec!(20)),
                _ => Some(dec!(30)),
            }
        } else {
            None
        };
        SurtaxFacts {
            non_business_land: flags.non_business_land,
            multi_home_tier,
        }
    }
}

/// Resolve a rate code against the pack. Unknown codes fall back to
/// progressive rates with a warning.
pub fn classify(
    code: &str,
    transfer_date: NaiveDate,
    facts: SurtaxFacts,
    pack: &RulePack,
    asset_id: &str,
    warnings: &mut Vec<Warning>,
) -> AppliedRate {
    let unknown;
    let category = match pack.rate_category(code) {
        Some(category) => category,
        None => {
            log::warn!("asset {}: unknown rate code {}", asset_id, code);
            warnings.push(Warning::UnknownRateCode {
                asset_id: asset_id.to_string(),
                code: code.to_string(),
            });
            unknown = RateCategory::progressive("unknown rate code");
            &unknown
        }
    };

    let mut additional = Decimal::ZERO;
    if category.non_business || facts.non_business_land {
        additional += pack.non_business_surtax;
    }
    if let Some(tier) = category.multi_home_surtax.or(facts.multi_home_tier) {
        if !pack.multi_home_suspended(transfer_date) {
            additional += tier;
        }
    }

    AppliedRate {
        rate_code: code.to_string(),
        rate_type: category.kind,
        rate_value: match category.kind {
            RateKind::Flat => category.rate,
            RateKind::Progressive => None,
        },
        additional_rate: additional,
        rate_label: category.label.clone(),
    }
}

/// Rate code of a pre-sale or membership right by holding band. Pre-sale
/// rights stay flat at two years or more, membership rights turn progressive.
pub fn housing_right_code(asset_type: AssetType, band: ShortTermBand) -> Option<&'static str> {
    let code = match (asset_type, band) {
        (AssetType::PreSaleRight, ShortTermBand::UnderOneYear) => "1-38",
        (AssetType::PreSaleRight, ShortTermBand::OneToTwoYears) => "1-39",
        (AssetType::PreSaleRight, ShortTermBand::TwoYearsOrMore) => "1-40",
        (AssetType::MembershipRight, ShortTermBand::UnderOneYear) => "1-23",
        (AssetType::MembershipRight, ShortTermBand::OneToTwoYears) => "1-24",
        (AssetType::MembershipRight, ShortTermBand::TwoYearsOrMore) => "1-30",
        _ => return None,
    };
    Some(code)
}

/// Short-term code for housing, land and buildings held under two years.
pub fn short_term_code(asset_type: AssetType, band: ShortTermBand) -> Option<&'static str> {
    let housing = asset_type == AssetType::Housing;
    let land_or_building = asset_type == AssetType::Land || asset_type.is_building();
    match band {
        ShortTermBand::UnderOneYear if housing => Some("1-50"),
        ShortTermBand::OneToTwoYears if housing => Some("1-51"),
        ShortTermBand::UnderOneYear if land_or_building => Some("1-15"),
        ShortTermBand::OneToTwoYears if land_or_building => Some("1-21"),
        _ => None,
    }
}

/// Codes that carry no surtax and only encode the holding band.
const BAND_ONLY_CODES: [&str; 6] = ["1-10", "1-15", "1-21", "1-50", "1-51", "1-52"];

/// Code that replaces `declared` for a short holding. Non-business land keeps
/// its code; multi-home housing moves to its own short-term codes so the
/// surtax survives.
pub fn short_term_substitute(
    declared: &str,
    asset_type: AssetType,
    band: ShortTermBand,
) -> Option<&'static str> {
    match (declared, band) {
        (_, ShortTermBand::TwoYearsOrMore) => None,
        ("1-46", ShortTermBand::UnderOneYear) => Some("1-53"),
        ("1-46", ShortTermBand::OneToTwoYears) => Some("1-54"),
        ("1-47", ShortTermBand::UnderOneYear) => Some("1-55"),
        ("1-47", ShortTermBand::OneToTwoYears) => Some("1-56"),
        (code, _) if BAND_ONLY_CODES.contains(&code) => short_term_code(asset_type, band),
        _ => None,
    }
}

/// Default rate code of a security when none is declared.
pub fn security_rate_code(security: &Security) -> String {
    if let Some(code) = &security.rate_code {
        return code.clone();
    }
    let code = if security.stock_type_code == stock_type::SMALL_MEDIUM_ENTERPRISE {
        "1-61"
    } else if security.is_foreign() {
        "1-73"
    } else if security.stock_type_code == stock_type::LISTED_MAJOR_SHAREHOLDER {
        "1-63"
    } else {
        "1-62"
    };
    code.to_string()
}

/// Rate code implied by the asset facts alone.
pub fn suggest_real_estate_code(asset: &RealEstateAsset, pack: &RulePack) -> String {
    if asset.user_flags.unregistered {
        return UNREGISTERED.to_string();
    }
    let band =
        holding::resolve(asset, HoldingPurpose::RateApplication, pack.high_value_threshold).band();
    if let Some(code) = housing_right_code(asset.asset_type, band) {
        return code.to_string();
    }
    let flags = &asset.user_flags;
    let code = match asset.asset_type {
        AssetType::Housing
            if flags.multi_home_surtax
                && flags.adjusted_area
                && !pack.multi_home_suspended(asset.transfer_date) =>
        {
            let long_term = if flags.multi_home_count >= 3 {
                "1-47"
            } else {
                "1-46"
            };
            short_term_substitute(long_term, asset.asset_type, band).unwrap_or(long_term)
        }
        AssetType::Land if flags.non_business_land => "1-11",
        AssetType::Housing => short_term_code(asset.asset_type, band).unwrap_or("1-52"),
        _ => short_term_code(asset.asset_type, band).unwrap_or("1-10"),
    };
    code.to_string()
}

/// Declared codes that disagree with the facts.
pub fn rate_code_mismatches(case: &TaxCase, pack: &RulePack) -> Vec<Warning> {
    let real_estate = case.real_estate.iter().map(|asset| {
        (
            asset.id.as_str(),
            asset.rate_code.clone(),
            suggest_real_estate_code(asset, pack),
        )
    });
    let securities = case.securities.iter().filter_map(|s| {
        let declared = s.rate_code.clone()?;
        let suggested = security_rate_code(&Security {
            rate_code: None,
            ..s.clone()
        });
        Some((s.id.as_str(), declared, suggested))
    });

    real_estate
        .chain(securities)
        .filter(|(_, declared, suggested)| declared != suggested)
        .map(|(id, declared, suggested)| Warning::RateCodeMismatch {
            asset_id: id.to_string(),
            declared,
            suggested,
        })
        .collect()
}
