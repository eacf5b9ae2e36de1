//! Rural special tax on granted tax reliefs.
//!
//! Each relief gets its own display amount, but the payable amount is the
//! rate applied once to the taxable total. The two can differ by a won or
//! so of rounding; the aggregate is what flows into the total due.

use crate::core::case::{Relief, ReliefType};
use crate::core::log::CalculationLog;
use crate::core::money::{apply_percent, round_to_won};
use crate::core::result::{RuralTaxBreakdown, RuralTaxDetail};
use crate::rules::RuralTaxRules;
use rust_decimal::Decimal;
use serde_json::json;

const USER_DESIGNATED: &str = "user-designated exemption";
const PUBLIC_SELF_FARM: &str = "self-farmed land taken for public works";

fn exemption(relief: &Relief, rules: &RuralTaxRules) -> Option<String> {
    let mut reason = rules.exemption(&relief.relief_code).map(|e| e.reason.clone());
    if relief.rural_special_tax_exempt && reason.is_none() {
        reason = Some(USER_DESIGNATED.to_string());
    }
    if relief.is_self_farm_land && relief.relief_code.starts_with(&rules.public_acquisition_prefix) {
        reason = Some(PUBLIC_SELF_FARM.to_string());
    }
    reason
}

pub fn compute(reliefs: &[Relief], rules: &RuralTaxRules, log: &mut CalculationLog) -> RuralTaxBreakdown {
    let mut taxable = Decimal::ZERO;
    let mut exempt = Decimal::ZERO;
    let mut details = Vec::new();

    for relief in reliefs
        .iter()
        .filter(|r| r.relief_type == ReliefType::Tax && r.relief_amount > Decimal::ZERO)
    {
        let reason = exemption(relief, rules);
        let is_exempt = reason.is_some();
        let rural_tax_amount = if is_exempt {
            exempt += relief.relief_amount;
            Decimal::ZERO
        } else {
            taxable += relief.relief_amount;
            round_to_won(apply_percent(relief.relief_amount, rules.rate))
        };
        details.push(RuralTaxDetail {
            relief_id: relief.id.clone(),
            relief_code: relief.relief_code.clone(),
            relief_name: relief.relief_name.clone(),
            relief_amount: relief.relief_amount,
            is_exempt,
            exempt_reason: reason,
            rural_tax_amount,
        });
    }

    let tax_amount = round_to_won(apply_percent(taxable, rules.rate));
    log.record(
        "CALC-RURAL-TAX",
        "rural special tax",
        [
            ("taxableReliefAmount", json!(taxable)),
            ("exemptReliefAmount", json!(exempt)),
            ("taxRate", json!(rules.rate)),
            ("taxAmount", json!(tax_amount)),
        ],
    );

    RuralTaxBreakdown {
        taxable_relief_amount: taxable,
        exempt_relief_amount: exempt,
        tax_rate: rules.rate,
        tax_amount,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::fixtures::{pack, relief};
    use rust_decimal_macros::dec;

    fn rules() -> RuralTaxRules {
        pack(2024).rural_special_tax
    }

    fn run(reliefs: &[Relief]) -> RuralTaxBreakdown {
        compute(reliefs, &rules(), &mut CalculationLog::new())
    }

    #[test]
    fn listed_codes_are_exempt() {
        let out = run(&[
            relief("r1", "SELF_FARM_8Y", ReliefType::Tax, 10_000_000),
            relief("r2", "PUBLIC_CASH", ReliefType::Tax, 5_000_000),
        ]);
        assert_eq!(out.exempt_relief_amount, dec!(10_000_000));
        assert_eq!(out.taxable_relief_amount, dec!(5_000_000));
        assert_eq!(out.tax_amount, dec!(1_000_000));
        assert_eq!(out.details[0].exempt_reason.as_deref(), Some("self-farmed farmland relief"));
        assert_eq!(out.details[1].rural_tax_amount, dec!(1_000_000));
    }

    #[test]
    fn income_reliefs_and_zero_amounts_are_ignored() {
        let out = run(&[
            relief("r1", "OTHER", ReliefType::Income, 10_000_000),
            relief("r2", "OTHER", ReliefType::Tax, 0),
        ]);
        assert!(out.details.is_empty());
        assert_eq!(out.tax_amount, Decimal::ZERO);
    }

    #[test]
    fn user_flag_and_public_self_farm_exemptions() {
        let mut flagged = relief("r1", "OTHER", ReliefType::Tax, 1_000_000);
        flagged.rural_special_tax_exempt = true;
        let mut farm = relief("r2", "PUBLIC_BOND_3Y", ReliefType::Tax, 2_000_000);
        farm.is_self_farm_land = true;
        let out = run(&[flagged, farm]);
        assert_eq!(out.details[0].exempt_reason.as_deref(), Some(USER_DESIGNATED));
        assert_eq!(out.details[1].exempt_reason.as_deref(), Some(PUBLIC_SELF_FARM));
        assert_eq!(out.exempt_relief_amount, dec!(3_000_000));
        assert_eq!(out.tax_amount, Decimal::ZERO);
    }

    #[test]
    fn aggregate_rounding_can_differ_from_details() {
        let out = run(&[
            relief("r1", "A", ReliefType::Tax, 3),
            relief("r2", "B", ReliefType::Tax, 3),
        ]);
        // 0.6 rounds up per relief, 1.2 rounds down in aggregate
        let detail_sum: Decimal = out.details.iter().map(|d| d.rural_tax_amount).sum();
        assert_eq!(detail_sum, dec!(2));
        assert_eq!(out.tax_amount, dec!(1));
    }
}
