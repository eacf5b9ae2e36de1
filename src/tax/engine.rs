//! Case orchestration: value every asset, then run the return-level steps
//! in form order (④ → ⑱) and assemble the result.

use crate::core::case::TaxCase;
use crate::core::error::EngineError;
use crate::core::log::CalculationLog;
use crate::core::money::Won;
use crate::core::result::{AssetResult, CalculationResult, MainResult, RateGroupSummary};
use crate::core::warnings::Warning;
use crate::rules::{RateKind, RulePackProvider};
use crate::tax::compute::{self, TaxInputs};
use crate::tax::{deduction, derivatives, penalty, real_estate, relief, rural, securities};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use sha2::{Digest, Sha256};

/// Label on line ⑨ unless the case is a single flat-rate asset.
pub const PROGRESSIVE_LABEL: &str = "basic progressive rates";

pub fn calculate<P>(case: &TaxCase, provider: &P) -> Result<CalculationResult, EngineError>
where
    P: RulePackProvider + ?Sized,
{
    calculate_at(case, provider, Utc::now())
}

/// As [`calculate`], with the timestamp supplied by the caller.
pub fn calculate_at<P>(
    case: &TaxCase,
    provider: &P,
    calculated_at: DateTime<Utc>,
) -> Result<CalculationResult, EngineError>
where
    P: RulePackProvider + ?Sized,
{
    let pack = provider.rule_pack(case.tax_year)?;
    let input_digest = hex::encode(Sha256::digest(serde_json::to_vec(case)?));

    let mut log = CalculationLog::new();
    let mut warnings = case.validate();
    if pack.year != case.tax_year {
        warnings.push(Warning::RulePackFallback {
            requested: case.tax_year,
            served: pack.year,
        });
    }
    let mut errors = Vec::new();

    let mut results: Vec<AssetResult> = Vec::new();
    for (i, asset) in case.real_estate.iter().enumerate() {
        match real_estate::value(asset, i, pack, &mut log, &mut warnings) {
            Ok(result) => results.push(result),
            Err(e) => {
                log::error!("real estate asset {}: {}", asset.id, e);
                errors.push(format!("real estate asset {}: {}", asset.id, e));
            }
        }
    }
    for (i, security) in case.securities.iter().enumerate() {
        results.push(securities::value(security, i, pack, &mut log, &mut warnings));
    }
    for (i, row) in case.derivative_rows().iter().enumerate() {
        results.push(derivatives::value(row, i, &pack.derivative_rates, &mut log));
    }

    let gain_income_total: Won = results.iter().map(|r| r.gain_income).sum();
    log.record(
        "CALC-RET-040",
        "④ gain income total",
        [("totalGainIncome", json!(gain_income_total))],
    );

    let limited = relief::apply_limits(&case.reliefs, &pack.relief_limits, &mut log);
    let relief_totals = relief::totals(&limited.reliefs);
    log.record(
        "CALC-RELIEF-001",
        "relief totals after limits",
        [
            ("incomeDeductionBase", json!(relief_totals.income)),
            ("taxReliefTotal", json!(relief_totals.tax)),
        ],
    );

    let allocation = deduction::allocate(&mut results, &pack.basic_deduction, &mut log);

    let adjustments = &case.adjustments;
    let tax = compute::compute(
        &mut results,
        TaxInputs {
            gain_income_total,
            prev_reported_gain_income: adjustments.prev_reported_gain_income,
            income_relief: relief_totals.income,
            basic_deduction: allocation.total,
        },
        &pack.brackets,
        &mut log,
    );

    let credits = relief_totals.tax
        + adjustments.foreign_tax_credit
        + adjustments.withholding_credit
        + adjustments.pension_credit;
    let e_filing_credit = compute::e_filing_credit(
        case.flags,
        pack.e_filing_credit,
        tax.tax_before_credits - credits,
    );
    log.record(
        "CALC-RET-150",
        "⑮ e-filing credit",
        [("eFilingCredit", json!(e_filing_credit))],
    );

    let penalty = penalty::compute(case.report_type, case.penalty.as_ref(), &pack.penalty, &mut log);

    let tax_due = (tax.tax_before_credits - credits - e_filing_credit + penalty.total
        - adjustments.prev_tax_paid)
        .max(Decimal::ZERO);
    log.record(
        "CALC-RET-180",
        "⑱ tax due",
        [
            ("taxBeforeCredits", json!(tax.tax_before_credits)),
            ("taxRelief", json!(relief_totals.tax)),
            ("foreignTaxCredit", json!(adjustments.foreign_tax_credit)),
            ("withholdingCredit", json!(adjustments.withholding_credit)),
            ("pensionCredit", json!(adjustments.pension_credit)),
            ("eFilingCredit", json!(e_filing_credit)),
            ("penalty", json!(penalty.total)),
            ("prevTaxPaid", json!(adjustments.prev_tax_paid)),
            ("taxDue", json!(tax_due)),
        ],
    );

    let rural_tax = rural::compute(&limited.reliefs, &pack.rural_special_tax, &mut log);
    let total_tax_due = tax_due + rural_tax.tax_amount;
    log.record(
        "CALC-RET-TOTAL",
        "total due, capital gains tax plus rural special tax",
        [
            ("capitalGainsTax", json!(tax_due)),
            ("ruralSpecialTax", json!(rural_tax.tax_amount)),
            ("totalTaxDue", json!(total_tax_due)),
        ],
    );

    let rate_category_summary = rate_summary(&results);
    let rate_label = rate_label(&results, &rate_category_summary);

    for w in &warnings {
        log::warn!("{}", w);
    }

    Ok(CalculationResult {
        case_id: case.id.clone(),
        tax_year: case.tax_year,
        rule_pack_year: pack.year,
        calculated_at,
        input_digest,
        asset_results: results,
        main_result: MainResult {
            gain_income_total,
            prev_reported_gain_income: adjustments.prev_reported_gain_income,
            income_deduction_base: relief_totals.income,
            basic_deduction: allocation.total,
            tax_base: tax.tax_base,
            rate_label,
            tax_a: tax.tax_a,
            tax_b: tax.tax_b,
            tax_before_credits: tax.tax_before_credits,
            tax_relief: relief_totals.tax,
            foreign_tax_credit: adjustments.foreign_tax_credit,
            withholding_credit: adjustments.withholding_credit,
            pension_credit: adjustments.pension_credit,
            e_filing_credit,
            penalty,
            prev_tax_paid: adjustments.prev_tax_paid,
            tax_due,
            rural_special_tax: rural_tax,
            relief_limit: limited.breakdown,
            total_tax_due,
            rate_category_summary,
            basic_deduction_by_bucket: allocation.by_bucket,
        },
        calculation_log: log.into_entries(),
        warnings: warnings.iter().map(|w| w.to_string()).collect(),
        errors,
    })
}

/// Gain income and asset count per rate code, in first-seen order.
pub fn rate_summary(results: &[AssetResult]) -> Vec<RateGroupSummary> {
    let mut groups: Vec<RateGroupSummary> = Vec::new();
    for r in results {
        match groups.iter_mut().find(|g| g.rate_code == r.rate.rate_code) {
            Some(group) => {
                group.gain_income_sum += r.gain_income;
                group.asset_count += 1;
            }
            None => groups.push(RateGroupSummary {
                rate_code: r.rate.rate_code.clone(),
                gain_income_sum: r.gain_income,
                asset_count: 1,
            }),
        }
    }
    groups
}

fn rate_label(results: &[AssetResult], summary: &[RateGroupSummary]) -> String {
    if let ([_], [only]) = (summary, results) {
        if let (RateKind::Flat, Some(rate)) = (only.rate.rate_type, only.rate.rate_value) {
            if !rate.is_zero() {
                let mut label = format!("{}%", rate.normalize());
                if only.rate.additional_rate > Decimal::ZERO {
                    label.push_str(&format!("+{}%p", only.rate.additional_rate.normalize()));
                }
                return label;
            }
        }
    }
    PROGRESSIVE_LABEL.to_string()
}
