//! Valuation of a single security transfer.

use crate::core::case::Security;
use crate::core::log::CalculationLog;
use crate::core::result::{AssetKind, AssetResult};
use crate::core::warnings::Warning;
use crate::rules::RulePack;
use crate::tax::acquisition::{
    applicable_carryover, gift_tax_expense, CarryoverClass, CostSource, CostStep,
};
use crate::tax::deduction::security_bucket;
use crate::tax::rates::{self, SurtaxFacts};
use rust_decimal::Decimal;
use serde_json::json;

pub fn value(
    security: &Security,
    index: usize,
    pack: &RulePack,
    log: &mut CalculationLog,
    warnings: &mut Vec<Warning>,
) -> AssetResult {
    let code = rates::security_rate_code(security);
    let rate = rates::classify(
        &code,
        security.transfer_date,
        SurtaxFacts::default(),
        pack,
        &security.id,
        warnings,
    );

    let mut steps = vec![CostStep {
        source: CostSource::Stated,
        label: "stated acquisition price".to_string(),
        acquire_price: security.acquire_price,
    }];
    let mut acquire_price = security.acquire_price;
    let mut gift_tax = Decimal::ZERO;

    let carryover = applicable_carryover(
        security.carryover(),
        CarryoverClass::Security,
        security.transfer_date,
        &pack.carryover,
    );
    if let Some(c) = carryover {
        acquire_price = c.donor_acquire_cost;
        steps.push(CostStep {
            source: CostSource::Carryover,
            label: "donor's acquisition cost".to_string(),
            acquire_price,
        });
        if let Some(paid) = c.gift_tax_paid.filter(|p| *p > Decimal::ZERO) {
            let pre_gain = security.transfer_price - acquire_price - security.necessary_expense;
            gift_tax = gift_tax_expense(paid, c.gift_tax_base, c.total_gift_tax_base, pre_gain);
        }
        log.record(
            "CALC-CARRY-972",
            "carryover taxation acquisition price",
            [
                ("assetId", json!(security.id)),
                ("donorAcquireCost", json!(c.donor_acquire_cost)),
                ("giftTaxExpense", json!(gift_tax)),
            ],
        );
    }

    let expense = security.necessary_expense + gift_tax;
    let gain = security.transfer_price - acquire_price - expense;
    let gain_income = gain.max(Decimal::ZERO);
    log.record(
        "CALC-BP2-100",
        "security gain income",
        [
            ("assetId", json!(security.id)),
            ("transferPrice", json!(security.transfer_price)),
            ("acquirePrice", json!(acquire_price)),
            ("necessaryExpense", json!(expense)),
            ("gainIncome", json!(gain)),
        ],
    );

    let mut result = AssetResult::new(
        &security.id,
        AssetKind::Security,
        index,
        rate,
        security_bucket(security),
    );
    if !security.stock_type_code.is_empty() {
        result.asset_type_code = Some(security.stock_type_code.clone());
    }
    result.transfer_date = Some(security.transfer_date);
    result.transfer_price = security.transfer_price;
    result.acquire_price = acquire_price;
    result.necessary_expense = expense;
    result.cost_basis = steps;
    result.gift_tax_expense = gift_tax;
    result.transfer_gain_total = gain;
    result.taxable_transfer_gain = gain;
    result.gain_income = gain_income;
    result.tax_base = gain_income;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::case::*;
    use crate::core::result::DeductionBucket;
    use crate::rules::RateKind;
    use crate::tax::fixtures::{date, pack, stock};
    use rust_decimal_macros::dec;

    fn run(security: &Security, year: i32) -> AssetResult {
        value(security, 0, &pack(year), &mut CalculationLog::new(), &mut Vec::new())
    }

    #[test]
    fn small_business_stock() {
        let mut s = stock("sme", date(2024, 6, 1));
        s.stock_type_code = stock_type::SMALL_MEDIUM_ENTERPRISE.to_string();
        let r = run(&s, 2024);
        assert_eq!(r.gain_income, dec!(395_000_000));
        assert_eq!(r.rate.rate_code, "1-61");
        assert_eq!(r.rate.rate_type, RateKind::Flat);
        assert_eq!(r.rate.rate_value, Some(dec!(10)));
        assert_eq!(r.deduction_bucket, DeductionBucket::Stock);
    }

    #[test]
    fn loss_keeps_raw_gain() {
        let mut s = stock("loss", date(2024, 6, 1));
        s.transfer_price = dec!(50_000_000);
        let r = run(&s, 2024);
        assert_eq!(r.transfer_gain_total, dec!(-55_000_000));
        assert_eq!(r.gain_income, Decimal::ZERO);
    }

    #[test]
    fn foreign_stock_uses_foreign_bucket() {
        let mut s = stock("f", date(2024, 6, 1));
        s.domestic_foreign = DomesticForeign::Foreign;
        let r = run(&s, 2024);
        assert_eq!(r.deduction_bucket, DeductionBucket::Foreign);
        assert_eq!(r.rate.rate_code, "1-73");
    }

    fn gifted(transfer: chrono::NaiveDate) -> Security {
        let mut s = stock("gift", transfer);
        s.carryover_tax = Some(CarryoverTax {
            enabled: true,
            gift_date: Some(date(2024, 11, 1)),
            donor_acquire_cost: dec!(20_000_000),
            gift_tax_paid: Some(dec!(10_000_000)),
            ..Default::default()
        });
        s
    }

    #[test]
    fn carryover_applies_from_2025() {
        let r = run(&gifted(date(2025, 5, 1)), 2025);
        assert_eq!(r.acquire_price, dec!(20_000_000));
        assert_eq!(r.gift_tax_expense, dec!(10_000_000));
        assert_eq!(r.gain_income, dec!(465_000_000));
        assert_eq!(r.cost_basis.len(), 2);
    }

    #[test]
    fn carryover_never_applies_before_2025() {
        let mut s = gifted(date(2024, 12, 20));
        if let Some(c) = s.carryover_tax.as_mut() {
            c.gift_date = Some(date(2024, 1, 10));
        }
        let r = run(&s, 2024);
        assert_eq!(r.acquire_price, dec!(100_000_000));
        assert_eq!(r.gift_tax_expense, Decimal::ZERO);
    }
}
