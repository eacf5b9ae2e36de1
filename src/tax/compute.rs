//! Calculated tax: the larger of progressive tax on the whole base (method A)
//! and the sum of per-asset taxes (method B).

use crate::core::case::FilingFlags;
use crate::core::log::CalculationLog;
use crate::core::money::{apply_percent, round_to_won, Won};
use crate::core::result::AssetResult;
use crate::rules::{Bracket, RateKind};
use rust_decimal::Decimal;
use serde_json::json;

/// Progressive tax: the first bracket whose upper bound covers `base`
/// (else the top bracket), `base × rate − deduction`.
pub fn bracket_tax(base: Won, brackets: &[Bracket]) -> Won {
    if base <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let bracket = brackets
        .iter()
        .find(|b| b.upper.map_or(true, |upper| base <= upper))
        .or_else(|| brackets.last());
    match bracket {
        Some(b) => round_to_won(apply_percent(base, b.rate) - b.deduction),
        None => Decimal::ZERO,
    }
}

pub fn flat_tax(base: Won, rate: Decimal) -> Won {
    round_to_won(apply_percent(base, rate))
}

/// Method B contribution of one asset.
pub fn asset_tax(result: &AssetResult, brackets: &[Bracket]) -> Won {
    let base = result.tax_base;
    let surtax = result.rate.additional_rate;
    match (result.rate.rate_type, result.rate.rate_value) {
        (RateKind::Flat, Some(rate)) => flat_tax(base, rate + surtax),
        _ => {
            let mut tax = bracket_tax(base, brackets);
            if surtax > Decimal::ZERO {
                tax += flat_tax(base, surtax);
            }
            tax
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaxInputs {
    pub gain_income_total: Won,
    pub prev_reported_gain_income: Won,
    pub income_relief: Won,
    pub basic_deduction: Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxComputation {
    pub tax_base: Won,
    pub tax_a: Won,
    pub tax_b: Won,
    pub tax_before_credits: Won,
}

/// Compute methods A and B, storing each asset's method B tax on the result.
pub fn compute(
    results: &mut [AssetResult],
    inputs: TaxInputs,
    brackets: &[Bracket],
    log: &mut CalculationLog,
) -> TaxComputation {
    let tax_base = (inputs.gain_income_total
        - inputs.prev_reported_gain_income
        - inputs.income_relief
        - inputs.basic_deduction)
        .max(Decimal::ZERO);
    log.record(
        "CALC-RET-080",
        "tax base",
        [
            ("totalGainIncome", json!(inputs.gain_income_total)),
            ("prevReportedGainIncome", json!(inputs.prev_reported_gain_income)),
            ("incomeDeductionBase", json!(inputs.income_relief)),
            ("totalBasicDeduction", json!(inputs.basic_deduction)),
            ("taxBase", json!(tax_base)),
        ],
    );

    let tax_a = bracket_tax(tax_base, brackets);
    log.record(
        "CALC-RET-100A",
        "method A, progressive on the whole base",
        [("taxBase", json!(tax_base)), ("taxA", json!(tax_a))],
    );

    let mut tax_b = Decimal::ZERO;
    for r in results.iter_mut() {
        r.asset_tax = asset_tax(r, brackets);
        tax_b += r.asset_tax;
    }
    log.record(
        "CALC-RET-100B",
        "method B, per-asset sum",
        [("taxB", json!(tax_b))],
    );

    let tax_before_credits = tax_a.max(tax_b);
    log.record(
        "CALC-RET-100",
        "calculated tax = max(A, B)",
        [
            ("taxA", json!(tax_a)),
            ("taxB", json!(tax_b)),
            ("taxBeforeCredits", json!(tax_before_credits)),
        ],
    );

    TaxComputation {
        tax_base,
        tax_a,
        tax_b,
        tax_before_credits,
    }
}

/// Flat e-filing credit, limited to the tax still left after reliefs and
/// other credits. Proxy filings get nothing.
pub fn e_filing_credit(flags: FilingFlags, credit: Won, remaining_tax: Won) -> Won {
    if flags.e_filing && !flags.proxy_filing {
        credit.min(remaining_tax.max(Decimal::ZERO))
    } else {
        Decimal::ZERO
    }
}
