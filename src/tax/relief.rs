//! Comprehensive relief ceiling: annual and five-year caps, rationed
//! pro rata across the reliefs they cover.

use crate::core::case::{Relief, ReliefType};
use crate::core::log::CalculationLog;
use crate::core::money::{round_to_won, Won};
use crate::core::result::ReliefLimitBreakdown;
use crate::rules::ReliefLimits;
use rust_decimal::Decimal;
use serde_json::json;

#[derive(Debug, Clone, PartialEq)]
pub struct LimitedReliefs {
    /// Input reliefs with limited amounts; order preserved.
    pub reliefs: Vec<Relief>,
    pub breakdown: ReliefLimitBreakdown,
}

pub fn apply_limits(
    reliefs: &[Relief],
    limits: &ReliefLimits,
    log: &mut CalculationLog,
) -> LimitedReliefs {
    let applicable = |r: &Relief| limits.applicable_codes.iter().any(|c| *c == r.relief_code);

    let (requested, prior) = reliefs
        .iter()
        .filter(|r| applicable(r))
        .fold((Decimal::ZERO, Decimal::ZERO), |(req, prior), r| {
            (
                req + r.relief_amount,
                prior + r.prev_year_relief_used.unwrap_or_default(),
            )
        });

    let annual_excess = (requested - limits.annual).max(Decimal::ZERO);
    let five_year_excess = (requested + prior - limits.five_year).max(Decimal::ZERO);
    let exceeded = annual_excess.max(five_year_excess);
    let limited = (requested - exceeded).max(Decimal::ZERO);

    let breakdown = ReliefLimitBreakdown {
        annual_limit: limits.annual,
        five_year_limit: limits.five_year,
        requested_amount: requested,
        prev_four_years_used: prior,
        annual_excess,
        five_year_excess,
        exceeded_amount: exceeded,
        limited_amount: limited,
    };
    log.record(
        "CALC-RELIEF-LIMIT",
        "comprehensive relief ceiling",
        [
            ("requestedAmount", json!(requested)),
            ("annualLimit", json!(limits.annual)),
            ("fiveYearLimit", json!(limits.five_year)),
            ("prevFourYearsUsed", json!(prior)),
            ("annualExcess", json!(annual_excess)),
            ("fiveYearExcess", json!(five_year_excess)),
            ("exceededAmount", json!(exceeded)),
            ("limitedAmount", json!(limited)),
        ],
    );

    let reliefs = reliefs
        .iter()
        .map(|r| {
            if exceeded > Decimal::ZERO && requested > Decimal::ZERO && applicable(r) {
                Relief {
                    relief_amount: round_to_won(r.relief_amount * limited / requested),
                    ..r.clone()
                }
            } else {
                r.clone()
            }
        })
        .collect();

    LimitedReliefs { reliefs, breakdown }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReliefTotals {
    /// Reduces the tax base (line ⑥).
    pub income: Won,
    /// Reduces the calculated tax (line ⑪).
    pub tax: Won,
}

pub fn totals(reliefs: &[Relief]) -> ReliefTotals {
    reliefs
        .iter()
        .fold(ReliefTotals::default(), |mut totals, r| {
            match r.relief_type {
                ReliefType::Income => totals.income += r.relief_amount,
                ReliefType::Tax => totals.tax += r.relief_amount,
            }
            totals
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::fixtures::{pack, relief};
    use rust_decimal_macros::dec;

    fn limits() -> ReliefLimits {
        pack(2024).relief_limits
    }

    fn run(reliefs: &[Relief]) -> LimitedReliefs {
        apply_limits(reliefs, &limits(), &mut CalculationLog::new())
    }

    #[test]
    fn under_the_ceiling_nothing_changes() {
        let reliefs = [relief("r1", "SELF_FARM_8Y", ReliefType::Tax, 40_000_000)];
        let out = run(&reliefs);
        assert_eq!(out.reliefs, reliefs);
        assert_eq!(out.breakdown.exceeded_amount, Decimal::ZERO);
        assert_eq!(out.breakdown.limited_amount, dec!(40_000_000));
    }

    #[test]
    fn annual_cap_scales_applicable_reliefs() {
        let reliefs = [
            relief("r1", "SELF_FARM_8Y", ReliefType::Tax, 90_000_000),
            relief("r2", "PUBLIC_CASH", ReliefType::Tax, 60_000_000),
            relief("r3", "OTHER_RELIEF", ReliefType::Tax, 7_000_000),
        ];
        let out = run(&reliefs);
        assert_eq!(out.breakdown.requested_amount, dec!(150_000_000));
        assert_eq!(out.breakdown.annual_excess, dec!(50_000_000));
        assert_eq!(out.breakdown.limited_amount, dec!(100_000_000));
        let amounts: Vec<_> = out.reliefs.iter().map(|r| r.relief_amount).collect();
        assert_eq!(amounts, [dec!(60_000_000), dec!(40_000_000), dec!(7_000_000)]);
    }

    #[test]
    fn five_year_cap_counts_prior_usage() {
        let mut r1 = relief("r1", "SELF_FARM_8Y", ReliefType::Tax, 80_000_000);
        r1.prev_year_relief_used = Some(dec!(150_000_000));
        let mut other = relief("r2", "OTHER_RELIEF", ReliefType::Tax, 1_000_000);
        other.prev_year_relief_used = Some(dec!(999_000_000));
        let out = run(&[r1, other]);
        assert_eq!(out.breakdown.prev_four_years_used, dec!(150_000_000));
        assert_eq!(out.breakdown.annual_excess, Decimal::ZERO);
        assert_eq!(out.breakdown.five_year_excess, dec!(30_000_000));
        assert_eq!(out.reliefs[0].relief_amount, dec!(50_000_000));
        assert_eq!(out.reliefs[1].relief_amount, dec!(1_000_000));
    }

    #[test]
    fn totals_split_by_type() {
        let reliefs = [
            relief("r1", "A", ReliefType::Tax, 3_000_000),
            relief("r2", "B", ReliefType::Income, 5_000_000),
            relief("r3", "C", ReliefType::Tax, 1_000_000),
        ];
        let t = totals(&reliefs);
        assert_eq!(t.tax, dec!(4_000_000));
        assert_eq!(t.income, dec!(5_000_000));
    }
}
