//! Valuation of a single real-estate asset: cost basis, gain, high-value
//! apportionment, long-term deduction and rate classification.

use crate::core::case::{AssetType, LtDeductionCode, RealEstateAsset};
use crate::core::error::ComputationError;
use crate::core::log::CalculationLog;
use crate::core::money::{apply_percent, round_to_won, Won};
use crate::core::result::{AssetKind, AssetResult};
use crate::core::warnings::Warning;
use crate::rules::RulePack;
use crate::tax::deduction::real_estate_bucket;
use crate::tax::holding::{self, HoldingPurpose};
use crate::tax::rates::{self, SurtaxFacts};
use crate::tax::{acquisition, lt_deduction, one_house};
use rust_decimal::Decimal;
use serde_json::json;

/// `(price − threshold) ÷ price` above the threshold, else zero.
pub fn high_value_ratio(transfer_price: Won, threshold: Won) -> Decimal {
    if transfer_price > threshold && transfer_price > Decimal::ZERO {
        (transfer_price - threshold) / transfer_price
    } else {
        Decimal::ZERO
    }
}

/// Rate code after band-driven derivation for rights and short-term substitution.
fn effective_rate_code(
    asset: &RealEstateAsset,
    pack: &RulePack,
    warnings: &mut Vec<Warning>,
) -> String {
    if asset.user_flags.unregistered {
        return asset.rate_code.clone();
    }
    let band =
        holding::resolve(asset, HoldingPurpose::RateApplication, pack.high_value_threshold).band();

    if asset.is_housing_right() {
        return rates::housing_right_code(asset.asset_type, band)
            .map_or_else(|| asset.rate_code.clone(), str::to_string);
    }

    match rates::short_term_substitute(&asset.rate_code, asset.asset_type, band) {
        Some(code) if code != asset.rate_code => {
            log::warn!(
                "asset {}: held {}, rate code {} replaced by {}",
                asset.id,
                band,
                asset.rate_code,
                code
            );
            warnings.push(Warning::RateCodeSubstituted {
                asset_id: asset.id.clone(),
                from: asset.rate_code.clone(),
                to: code.to_string(),
                band: band.to_string(),
            });
            code.to_string()
        }
        _ => asset.rate_code.clone(),
    }
}

pub fn value(
    asset: &RealEstateAsset,
    index: usize,
    pack: &RulePack,
    log: &mut CalculationLog,
    warnings: &mut Vec<Warning>,
) -> Result<AssetResult, ComputationError> {
    let threshold = pack.high_value_threshold;

    let one_house = asset
        .user_flags
        .one_house_exemption
        .then(|| one_house::evaluate(asset, threshold, warnings));

    let code = effective_rate_code(asset, pack, warnings);
    let rate = rates::classify(
        &code,
        asset.transfer_date,
        SurtaxFacts::of(asset),
        pack,
        &asset.id,
        warnings,
    );

    let cost = acquisition::resolve(asset, pack, log)?;
    let transfer_gain = cost.transfer_price - cost.acquire_price - cost.necessary_expense;
    log.record(
        "CALC-BP1-100",
        "transfer gain",
        [
            ("assetId", json!(asset.id)),
            ("transferPrice", json!(cost.transfer_price)),
            ("effectiveAcquirePrice", json!(cost.acquire_price)),
            ("effectiveExpense", json!(cost.necessary_expense)),
            ("transferGainTotal", json!(transfer_gain)),
        ],
    );

    let apportioned = asset.is_housing() && asset.user_flags.one_house_exemption;
    let ratio = if apportioned && asset.is_high_value(threshold) {
        high_value_ratio(asset.transfer_price, threshold)
    } else {
        Decimal::ZERO
    };
    let taxable_gain = if ratio > Decimal::ZERO {
        let taxable = round_to_won(transfer_gain * ratio);
        log.record(
            "CALC-BP1-120",
            "high-value housing apportionment",
            [
                ("threshold", json!(threshold)),
                ("highValueRatio", json!(ratio)),
                ("taxableTransferGain", json!(taxable)),
            ],
        );
        taxable
    } else {
        transfer_gain
    };

    let holding = holding::resolve(asset, HoldingPurpose::LongTermDeduction, threshold);
    let residence_years = asset.total_residence_years();
    let excluded = asset.user_flags.unregistered
        || asset.lt_deduction_code == LtDeductionCode::Excluded
        || asset.asset_type == AssetType::PreSaleRight;
    let lt_rate = if excluded {
        Decimal::ZERO
    } else {
        lt_deduction::rate(
            asset.lt_deduction_code,
            holding.years,
            residence_years,
            &pack.lt_deduction,
        )
    };
    let lt_amount = round_to_won(apply_percent(transfer_gain.max(Decimal::ZERO), lt_rate));
    let taxable_lt = if ratio > Decimal::ZERO {
        round_to_won(lt_amount * ratio)
    } else {
        lt_amount
    };
    log.record(
        "CALC-LT-001",
        "long-term holding deduction",
        [
            ("holdingYears", json!(holding.years)),
            ("holdingBasis", json!(holding.basis)),
            ("residenceYears", json!(residence_years)),
            ("ltDeductionRate", json!(lt_rate)),
            ("ltDeductionAmount", json!(lt_amount)),
            ("taxableLtDeduction", json!(taxable_lt)),
        ],
    );

    let gain_income = (taxable_gain - taxable_lt).max(Decimal::ZERO);
    log.record(
        "CALC-BP1-300",
        "gain income",
        [
            ("taxableTransferGain", json!(taxable_gain)),
            ("taxableLtDeduction", json!(taxable_lt)),
            ("gainIncome", json!(gain_income)),
        ],
    );

    let mut result = AssetResult::new(
        &asset.id,
        AssetKind::RealEstate,
        index,
        rate,
        real_estate_bucket(asset.asset_type),
    );
    result.asset_type_code = Some(asset.asset_type.code().to_string());
    result.unregistered = asset.user_flags.unregistered;
    result.transfer_date = Some(asset.transfer_date);
    result.transfer_price = cost.transfer_price;
    result.acquire_price = cost.acquire_price;
    result.necessary_expense = cost.necessary_expense;
    result.gift_tax_expense = cost.gift_tax_expense;
    result.cost_basis = cost.steps;
    result.transfer_gain_total = transfer_gain;
    result.high_value_ratio = ratio;
    result.taxable_transfer_gain = taxable_gain;
    result.holding = Some(holding);
    result.residence_years = residence_years;
    result.lt_deduction_rate = lt_rate;
    result.lt_deduction_amount = lt_amount;
    result.taxable_lt_deduction = taxable_lt;
    result.gain_income = gain_income;
    result.tax_base = gain_income;
    result.one_house = one_house;
    Ok(result)
}
