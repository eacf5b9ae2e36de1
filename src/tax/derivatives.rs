//! Derivatives schedule rows: a fixed formula over the form columns.

use crate::core::case::{DerivativeRateCode, DerivativeRow};
use crate::core::log::CalculationLog;
use crate::core::money::Won;
use crate::core::result::{AppliedRate, AssetKind, AssetResult, DeductionBucket};
use crate::rules::DerivativeRates;
use rust_decimal::Decimal;
use serde_json::json;

/// ⑧ − ⑨ − ⑪ − ⑫ + ⑬ − ⑭. The carried-loss column is added, as printed on the form.
pub fn row_gain(row: &DerivativeRow) -> Won {
    row.transfer_price
        - row.necessary_expense
        - row.prior_year_carried_gain
        - row.current_year_loss
        + row.carried_loss
        - row.other_deduction
}

pub fn value(
    row: &DerivativeRow,
    index: usize,
    rates: &DerivativeRates,
    log: &mut CalculationLog,
) -> AssetResult {
    let (rate_value, label) = match row.rate_code {
        DerivativeRateCode::Transitional => (rates.transitional, "derivatives, transitional"),
        DerivativeRateCode::Standard => (rates.standard, "derivatives"),
    };
    let code = format!("1-{}", row.rate_code.code());
    let gain = row_gain(row);
    let gain_income = gain.max(Decimal::ZERO);
    log.record(
        "CALC-DERIV-100",
        "derivative gain income",
        [
            ("assetId", json!(row.id)),
            ("formula", json!("⑧-⑨-⑪-⑫+⑬-⑭")),
            ("gainIncome", json!(gain)),
            ("rateValue", json!(rate_value)),
        ],
    );

    let mut result = AssetResult::new(
        &row.id,
        AssetKind::Derivative,
        index,
        AppliedRate::flat(&code, rate_value, label),
        DeductionBucket::Derivative,
    );
    result.transfer_price = row.transfer_price;
    result.necessary_expense = row.necessary_expense;
    result.transfer_gain_total = gain;
    result.taxable_transfer_gain = gain;
    result.gain_income = gain_income;
    result.tax_base = gain_income;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::fixtures::{derivative, pack};
    use rust_decimal_macros::dec;

    #[test]
    fn current_loss_reduces_gain() {
        let mut row = derivative("d1");
        row.current_year_loss = dec!(30_000_000);
        assert_eq!(row_gain(&row), dec!(65_000_000));

        let r = value(&row, 0, &pack(2024).derivative_rates, &mut CalculationLog::new());
        assert_eq!(r.gain_income, dec!(65_000_000));
        assert_eq!(r.rate.rate_code, "1-81");
        assert_eq!(r.rate.rate_value, Some(dec!(10)));
        assert_eq!(r.deduction_bucket, DeductionBucket::Derivative);
    }

    #[test]
    fn carried_loss_is_added() {
        let mut row = derivative("d2");
        row.carried_loss = dec!(1_000_000);
        row.other_deduction = dec!(500_000);
        row.prior_year_carried_gain = dec!(2_000_000);
        assert_eq!(row_gain(&row), dec!(93_500_000));
    }

    #[test]
    fn transitional_rate_and_floor() {
        let mut row = derivative("d3");
        row.rate_code = DerivativeRateCode::Transitional;
        row.current_year_loss = dec!(200_000_000);
        let r = value(&row, 0, &pack(2024).derivative_rates, &mut CalculationLog::new());
        assert_eq!(r.rate.rate_value, Some(dec!(5)));
        assert_eq!(r.transfer_gain_total, dec!(-105_000_000));
        assert_eq!(r.gain_income, Decimal::ZERO);
    }
}
