//! Effective cost basis of a real-estate asset.
//!
//! The acquisition price passes through an ordered chain of stages. A later
//! stage overrides an earlier one, and every override is kept as a
//! [`CostStep`] so the result shows where the final figure came from.

use crate::core::case::{
    AcquirePriceType, CarryoverExclusion, CarryoverTax, Cause, GiftWithDebt, RealEstateAsset,
    ValuationMethod,
};
use crate::core::dates::elapsed_years;
use crate::core::error::ComputationError;
use crate::core::log::CalculationLog;
use crate::core::money::{round_to_won, Won};
use crate::rules::{CarryoverRules, RulePack};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostSource {
    Stated,
    InheritanceAssessed,
    Converted,
    GiftWithDebt,
    Carryover,
    Itemized,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostStep {
    pub source: CostSource,
    pub label: String,
    pub acquire_price: Won,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCost {
    /// Transfer price after gift-with-debt scaling.
    pub transfer_price: Won,
    pub acquire_price: Won,
    /// Itemized expenses plus any gift-tax add-on.
    pub necessary_expense: Won,
    pub gift_tax_expense: Won,
    pub carryover_applied: bool,
    pub steps: Vec<CostStep>,
}

impl ResolvedCost {
    pub fn source(&self) -> CostSource {
        self.steps.last().map_or(CostSource::Stated, |s| s.source)
    }
}

#[derive(Debug, Clone)]
struct CostState {
    transfer_price: Won,
    acquire_price: Won,
    inheritance_applied: bool,
    carryover_applied: bool,
    steps: Vec<CostStep>,
}

impl CostState {
    fn set(mut self, source: CostSource, label: impl Into<String>, price: Won) -> Self {
        self.acquire_price = price;
        self.steps.push(CostStep {
            source,
            label: label.into(),
            acquire_price: price,
        });
        self
    }

    fn last_source(&self) -> Option<CostSource> {
        self.steps.last().map(|s| s.source)
    }
}

struct Ctx<'a> {
    asset: &'a RealEstateAsset,
    pack: &'a RulePack,
}

type Stage = fn(&Ctx, CostState, &mut CalculationLog) -> Result<CostState, ComputationError>;

/// Precedence is load-bearing: inheritance beats conversion, and gift-with-debt,
/// carryover and itemized totals each override what came before.
const STAGES: &[Stage] = &[
    stated_price,
    inheritance_value,
    converted_price,
    inheritance_over_conversion,
    gift_with_debt,
    carryover,
    itemized_total,
];

pub fn resolve(
    asset: &RealEstateAsset,
    pack: &RulePack,
    log: &mut CalculationLog,
) -> Result<ResolvedCost, ComputationError> {
    let ctx = Ctx { asset, pack };
    let mut state = CostState {
        transfer_price: asset.transfer_price,
        acquire_price: asset.acquire_price,
        inheritance_applied: false,
        carryover_applied: false,
        steps: Vec::new(),
    };
    for stage in STAGES {
        state = stage(&ctx, state, log)?;
    }

    let itemized_expense = asset
        .cost_breakdown()
        .map_or(Decimal::ZERO, |b| b.expense_total());

    let mut gift_tax = Decimal::ZERO;
    if state.carryover_applied {
        if let Some(c) = asset.carryover() {
            if let Some(paid) = c.gift_tax_paid.filter(|p| *p > Decimal::ZERO) {
                let pre_gain = state.transfer_price - state.acquire_price - itemized_expense;
                gift_tax = gift_tax_expense(paid, c.gift_tax_base, c.total_gift_tax_base, pre_gain);
                log.record(
                    "CALC-CARRY-972-GIFT-TAX",
                    "gift tax added to necessary expense",
                    [
                        ("giftTaxPaid", json!(paid)),
                        ("preGiftTaxGain", json!(pre_gain)),
                        ("giftTaxExpense", json!(gift_tax)),
                    ],
                );
            }
        }
    }

    Ok(ResolvedCost {
        transfer_price: state.transfer_price,
        acquire_price: state.acquire_price,
        necessary_expense: itemized_expense + gift_tax,
        gift_tax_expense: gift_tax,
        carryover_applied: state.carryover_applied,
        steps: state.steps,
    })
}

fn stated_price(
    ctx: &Ctx,
    state: CostState,
    _log: &mut CalculationLog,
) -> Result<CostState, ComputationError> {
    let kind = match ctx.asset.acquire_price_type {
        AcquirePriceType::Actual => "actual transaction price",
        AcquirePriceType::Comparable => "comparable sale price",
        AcquirePriceType::Appraisal => "appraised value",
        AcquirePriceType::Converted => "stated price",
        AcquirePriceType::Standard => "standard value",
        AcquirePriceType::ForeignGov => "foreign government assessed value",
    };
    let label = match ctx.asset.acquire_cause {
        Some(Cause::Inheritance) => format!("{} (inherited)", kind),
        Some(Cause::Gift) => format!("{} (gifted)", kind),
        _ => kind.to_string(),
    };
    let price = ctx.asset.acquire_price;
    Ok(state.set(CostSource::Stated, label, price))
}

fn inheritance_value(
    ctx: &Ctx,
    state: CostState,
    log: &mut CalculationLog,
) -> Result<CostState, ComputationError> {
    let assessed = ctx
        .asset
        .inheritance()
        .and_then(|i| i.inheritance_tax_value)
        .filter(|v| *v > Decimal::ZERO);
    match assessed {
        Some(value) => {
            log.record(
                "CALC-INH-001",
                "inheritance tax assessed value as acquisition price",
                [("inheritanceTaxValue", json!(value))],
            );
            let mut state = state.set(
                CostSource::InheritanceAssessed,
                "inheritance tax assessed value",
                value,
            );
            state.inheritance_applied = true;
            Ok(state)
        }
        None => Ok(state),
    }
}

fn converted_price(
    ctx: &Ctx,
    state: CostState,
    log: &mut CalculationLog,
) -> Result<CostState, ComputationError> {
    let a = ctx.asset;
    if a.acquire_price_type != AcquirePriceType::Converted {
        return Ok(state);
    }
    let (Some(tb), Some(tl), Some(ab), Some(al)) = (
        a.std_value_transfer_building,
        a.std_value_transfer_land,
        a.std_value_acquire_building,
        a.std_value_acquire_land,
    ) else {
        return Ok(state);
    };

    let converted = converted_acquire_price(a.transfer_price, ab + al, tb + tl)?;
    log.record(
        "CALC-BP1-400",
        "converted acquisition price",
        [
            ("transferPrice", json!(a.transfer_price)),
            ("acquireStandardValue", json!(ab + al)),
            ("transferStandardValue", json!(tb + tl)),
            ("convertedAcquirePrice", json!(converted)),
        ],
    );
    Ok(state.set(
        CostSource::Converted,
        "converted from standard values",
        converted,
    ))
}

/// `transfer price × acquire standard ÷ transfer standard`, rounded.
pub fn converted_acquire_price(
    transfer_price: Won,
    acquire_standard: Won,
    transfer_standard: Won,
) -> Result<Won, ComputationError> {
    if transfer_standard.is_zero() {
        return Err(ComputationError::ZeroTransferStandardValue);
    }
    Ok(round_to_won(
        transfer_price * acquire_standard / transfer_standard,
    ))
}

fn inheritance_over_conversion(
    ctx: &Ctx,
    state: CostState,
    log: &mut CalculationLog,
) -> Result<CostState, ComputationError> {
    if state.last_source() == Some(CostSource::Converted) && state.inheritance_applied {
        return inheritance_value(ctx, state, log);
    }
    Ok(state)
}

/// Deemed-transfer portion of a gift encumbered by debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GiftWithDebtPortion {
    pub ratio: Decimal,
    pub transfer_price: Won,
    pub acquire_price: Won,
}

pub fn gift_with_debt_portion(
    gift: &GiftWithDebt,
    transfer_date: NaiveDate,
) -> Result<GiftWithDebtPortion, ComputationError> {
    if gift.assessed_value.is_zero() {
        return Err(ComputationError::ZeroAssessedValue);
    }
    let ratio = gift.debt_amount / gift.assessed_value;
    let donor_cost = donor_cost(gift, gift.gift_date.unwrap_or(transfer_date));
    Ok(GiftWithDebtPortion {
        ratio,
        transfer_price: round_to_won(gift.assessed_value * ratio),
        acquire_price: round_to_won(donor_cost * ratio),
    })
}

/// Donor cost matching the valuation method used for the gift.
fn donor_cost(gift: &GiftWithDebt, reference: NaiveDate) -> Won {
    let actual = gift.donor_actual_acquire_cost.unwrap_or(gift.donor_acquire_cost);
    let standard = gift
        .donor_standard_price_at_acquire
        .unwrap_or(gift.donor_acquire_cost);
    let standard_from = |y, m, d| {
        NaiveDate::from_ymd_opt(y, m, d).is_some_and(|cutoff| reference >= cutoff)
    };
    match gift.valuation_method {
        ValuationMethod::MarketPrice => actual,
        ValuationMethod::SupplementaryStandard => standard,
        ValuationMethod::RentConversion if standard_from(2020, 2, 11) => standard,
        ValuationMethod::CollateralDebt if standard_from(2023, 2, 28) => standard,
        ValuationMethod::RentConversion | ValuationMethod::CollateralDebt => actual,
    }
}

fn gift_with_debt(
    ctx: &Ctx,
    mut state: CostState,
    log: &mut CalculationLog,
) -> Result<CostState, ComputationError> {
    let Some(gift) = ctx.asset.gift_with_debt() else {
        return Ok(state);
    };
    let portion = gift_with_debt_portion(gift, ctx.asset.transfer_date)?;
    log.record(
        "CALC-GIFT-159",
        "gift-with-debt apportionment",
        [
            ("ratio", json!(portion.ratio)),
            ("transferPricePortion", json!(portion.transfer_price)),
            ("acquirePricePortion", json!(portion.acquire_price)),
        ],
    );
    state.transfer_price = portion.transfer_price;
    Ok(state.set(
        CostSource::GiftWithDebt,
        "donor cost apportioned to assumed debt",
        portion.acquire_price,
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarryoverClass {
    RealEstate,
    Security,
}

/// Whether the gift-then-transfer happened inside the carryover window.
pub fn carryover_period_valid(
    class: CarryoverClass,
    gift_date: NaiveDate,
    transfer_date: NaiveDate,
    rules: &CarryoverRules,
) -> bool {
    let allowed = match class {
        CarryoverClass::RealEstate if gift_date >= rules.real_estate_extended_from => {
            rules.real_estate_years_extended
        }
        CarryoverClass::RealEstate => rules.real_estate_years,
        CarryoverClass::Security => {
            if transfer_date.year() < rules.securities_effective_year {
                return false;
            }
            rules.securities_years
        }
    };
    elapsed_years(gift_date, transfer_date) <= Decimal::from(allowed)
}

/// Carryover facts that actually apply: enabled, not excluded and within the window.
pub fn applicable_carryover<'a>(
    carryover: Option<&'a CarryoverTax>,
    class: CarryoverClass,
    transfer_date: NaiveDate,
    rules: &CarryoverRules,
) -> Option<&'a CarryoverTax> {
    carryover
        .filter(|c| c.exclusion_reason == CarryoverExclusion::None)
        .filter(|c| {
            c.gift_date
                .is_some_and(|gift| carryover_period_valid(class, gift, transfer_date, rules))
        })
}

fn carryover(
    ctx: &Ctx,
    state: CostState,
    log: &mut CalculationLog,
) -> Result<CostState, ComputationError> {
    let asset = ctx.asset;
    if asset.exempt_low_value_house(ctx.pack.high_value_threshold) {
        return Ok(state);
    }
    let Some(c) = applicable_carryover(
        asset.carryover(),
        CarryoverClass::RealEstate,
        asset.transfer_date,
        &ctx.pack.carryover,
    ) else {
        return Ok(state);
    };

    log.record(
        "CALC-CARRY-972",
        "carryover taxation acquisition price",
        [
            ("donorAcquireCost", json!(c.donor_acquire_cost)),
            ("giftTaxPaid", json!(c.gift_tax_paid)),
        ],
    );
    let mut state = state.set(
        CostSource::Carryover,
        "donor's acquisition cost",
        c.donor_acquire_cost,
    );
    state.carryover_applied = true;
    Ok(state)
}

fn itemized_total(
    ctx: &Ctx,
    state: CostState,
    _log: &mut CalculationLog,
) -> Result<CostState, ComputationError> {
    if state.inheritance_applied || state.carryover_applied {
        return Ok(state);
    }
    match ctx.asset.cost_breakdown().map(|b| b.acquire_total()) {
        Some(total) if total > Decimal::ZERO => {
            Ok(state.set(CostSource::Itemized, "itemized acquisition costs", total))
        }
        _ => Ok(state),
    }
}

/// Share of paid gift tax deductible as an expense, capped at the gain it offsets.
pub fn gift_tax_expense(
    paid: Won,
    base: Option<Won>,
    total_base: Option<Won>,
    pre_gift_tax_gain: Won,
) -> Won {
    let allocated = match (base, total_base) {
        (Some(base), Some(total)) if total > base && total > Decimal::ZERO => {
            round_to_won(paid * base / total)
        }
        _ => paid,
    };
    allocated.min(pre_gift_tax_gain.max(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::case::*;
    use crate::tax::fixtures::{date, land, pack};
    use rust_decimal_macros::dec;

    fn resolve_default(asset: &RealEstateAsset) -> Result<ResolvedCost, ComputationError> {
        resolve(asset, &pack(2024), &mut CalculationLog::new())
    }

    fn plain() -> RealEstateAsset {
        let mut asset = land("l1", date(2015, 1, 10), date(2024, 6, 15));
        asset.transfer_price = dec!(1_000_000_000);
        asset.acquire_price = dec!(600_000_000);
        asset
    }

    #[test]
    fn stated_price_passes_through() {
        let cost = resolve_default(&plain()).unwrap();
        assert_eq!(cost.acquire_price, dec!(600_000_000));
        assert_eq!(cost.transfer_price, dec!(1_000_000_000));
        assert_eq!(cost.necessary_expense, Decimal::ZERO);
        assert_eq!(cost.source(), CostSource::Stated);
        assert_eq!(cost.steps[0].label, "actual transaction price");
    }

    fn with_standard_values(asset: &mut RealEstateAsset, transfer_side: Won) {
        asset.acquire_price_type = AcquirePriceType::Converted;
        asset.std_value_transfer_building = Some(transfer_side / dec!(2));
        asset.std_value_transfer_land = Some(transfer_side / dec!(2));
        asset.std_value_acquire_building = Some(dec!(100_000_000));
        asset.std_value_acquire_land = Some(dec!(200_000_000));
    }

    #[test]
    fn converts_from_standard_values() {
        let mut asset = plain();
        with_standard_values(&mut asset, dec!(600_000_000));
        let cost = resolve_default(&asset).unwrap();
        // 1,000,000,000 × 300,000,000 / 600,000,000
        assert_eq!(cost.acquire_price, dec!(500_000_000));
        assert_eq!(cost.source(), CostSource::Converted);
    }

    #[test]
    fn conversion_with_zero_transfer_side_fails() {
        let mut asset = plain();
        with_standard_values(&mut asset, Decimal::ZERO);
        assert_eq!(
            resolve_default(&asset),
            Err(ComputationError::ZeroTransferStandardValue)
        );
    }

    #[test]
    fn conversion_needs_all_four_standard_values() {
        let mut asset = plain();
        with_standard_values(&mut asset, dec!(600_000_000));
        asset.std_value_acquire_land = None;
        let cost = resolve_default(&asset).unwrap();
        assert_eq!(cost.acquire_price, dec!(600_000_000));
    }

    #[test]
    fn converted_price_rounds_to_won() {
        assert_eq!(
            converted_acquire_price(dec!(100), dec!(1), dec!(3)).unwrap(),
            dec!(33)
        );
        assert_eq!(
            converted_acquire_price(dec!(200), dec!(1), dec!(3)).unwrap(),
            dec!(67)
        );
    }

    fn inherited(asset: &mut RealEstateAsset, value: Won) {
        asset.acquire_cause = Some(Cause::Inheritance);
        asset.inheritance_info = Some(InheritanceInfo {
            enabled: true,
            inheritance_date: Some(date(2015, 1, 10)),
            inheritance_tax_value: Some(value),
            ..Default::default()
        });
    }

    #[test]
    fn inheritance_value_overrides_conversion() {
        let mut asset = plain();
        inherited(&mut asset, dec!(450_000_000));
        with_standard_values(&mut asset, dec!(600_000_000));
        let cost = resolve_default(&asset).unwrap();
        assert_eq!(cost.acquire_price, dec!(450_000_000));
        assert_eq!(cost.source(), CostSource::InheritanceAssessed);
        let sources: Vec<_> = cost.steps.iter().map(|s| s.source).collect();
        assert_eq!(
            sources,
            [
                CostSource::Stated,
                CostSource::InheritanceAssessed,
                CostSource::Converted,
                CostSource::InheritanceAssessed
            ]
        );
    }

    #[test]
    fn zero_inheritance_value_is_ignored() {
        let mut asset = plain();
        inherited(&mut asset, Decimal::ZERO);
        let cost = resolve_default(&asset).unwrap();
        assert_eq!(cost.acquire_price, dec!(600_000_000));
    }

    fn gift(method: ValuationMethod) -> GiftWithDebt {
        GiftWithDebt {
            enabled: true,
            assessed_value: dec!(1_000_000_000),
            debt_amount: dec!(300_000_000),
            valuation_method: method,
            donor_actual_acquire_cost: None,
            donor_standard_price_at_acquire: None,
            donor_acquire_cost: dec!(400_000_000),
            gift_date: None,
        }
    }

    #[test]
    fn gift_with_debt_scales_both_sides() {
        let mut asset = plain();
        asset.transfer_price = dec!(1_200_000_000);
        asset.gift_with_debt = Some(gift(ValuationMethod::MarketPrice));
        let cost = resolve_default(&asset).unwrap();
        assert_eq!(cost.transfer_price, dec!(300_000_000));
        assert_eq!(cost.acquire_price, dec!(120_000_000));
        assert_eq!(
            cost.transfer_price - cost.acquire_price - cost.necessary_expense,
            dec!(180_000_000)
        );
    }

    #[test]
    fn gift_with_debt_zero_assessed_value_fails() {
        let mut asset = plain();
        let mut g = gift(ValuationMethod::MarketPrice);
        g.assessed_value = Decimal::ZERO;
        asset.gift_with_debt = Some(g);
        assert_eq!(
            resolve_default(&asset),
            Err(ComputationError::ZeroAssessedValue)
        );
    }

    #[test]
    fn valuation_method_selects_donor_cost() {
        let mut g = gift(ValuationMethod::SupplementaryStandard);
        g.assessed_value = dec!(600_000_000);
        g.debt_amount = dec!(300_000_000);
        g.donor_actual_acquire_cost = Some(dec!(500_000_000));
        g.donor_standard_price_at_acquire = Some(dec!(200_000_000));
        let portion = gift_with_debt_portion(&g, date(2024, 6, 1)).unwrap();
        assert_eq!(portion.acquire_price, dec!(100_000_000));

        g.valuation_method = ValuationMethod::MarketPrice;
        let portion = gift_with_debt_portion(&g, date(2024, 6, 1)).unwrap();
        assert_eq!(portion.acquire_price, dec!(250_000_000));
    }

    #[test]
    fn collateral_debt_uses_standard_price_after_cutoff() {
        let mut g = gift(ValuationMethod::CollateralDebt);
        g.assessed_value = dec!(1_000_000_000);
        g.debt_amount = dec!(400_000_000);
        g.donor_actual_acquire_cost = Some(dec!(600_000_000));
        g.donor_standard_price_at_acquire = Some(dec!(500_000_000));

        let after = gift_with_debt_portion(&g, date(2023, 3, 1)).unwrap();
        assert_eq!(after.acquire_price, dec!(200_000_000));
        let before = gift_with_debt_portion(&g, date(2023, 2, 27)).unwrap();
        assert_eq!(before.acquire_price, dec!(240_000_000));
    }

    fn carryover_asset(gift_date: NaiveDate) -> RealEstateAsset {
        let mut asset = plain();
        asset.acquire_cause = Some(Cause::Gift);
        asset.carryover_tax = Some(CarryoverTax {
            enabled: true,
            gift_date: Some(gift_date),
            donor_acquire_date: Some(date(2005, 1, 1)),
            donor_acquire_cost: dec!(200_000_000),
            gift_tax_paid: Some(dec!(30_000_000)),
            ..Default::default()
        });
        asset
    }

    #[test]
    fn carryover_uses_donor_cost_and_adds_gift_tax() {
        let asset = carryover_asset(date(2021, 6, 1));
        let cost = resolve_default(&asset).unwrap();
        assert!(cost.carryover_applied);
        assert_eq!(cost.acquire_price, dec!(200_000_000));
        assert_eq!(cost.gift_tax_expense, dec!(30_000_000));
        assert_eq!(cost.necessary_expense, dec!(30_000_000));
    }

    #[test]
    fn carryover_expired_window_keeps_own_cost() {
        // gifted before 2023: five-year window
        let asset = carryover_asset(date(2018, 6, 1));
        let cost = resolve_default(&asset).unwrap();
        assert!(!cost.carryover_applied);
        assert_eq!(cost.acquire_price, dec!(600_000_000));
        assert_eq!(cost.gift_tax_expense, Decimal::ZERO);
    }

    #[test]
    fn carryover_skipped_for_exempt_low_value_house() {
        let mut asset = carryover_asset(date(2021, 6, 1));
        asset.user_flags.one_house_exemption = true;
        let cost = resolve_default(&asset).unwrap();
        assert!(!cost.carryover_applied);
        assert_eq!(cost.acquire_price, dec!(600_000_000));
    }

    #[test]
    fn itemized_total_applies_without_inheritance_or_carryover() {
        let mut asset = plain();
        asset.cost_breakdown = Some(CostBreakdown {
            enabled: true,
            acquire_costs: AcquisitionCosts {
                purchase_price: Some(dec!(600_000_000)),
                acquisition_tax: Some(dec!(27_600_000)),
                ..Default::default()
            },
            expenses: ExpenseLines {
                capital_expense: Some(dec!(15_000_000)),
                ..Default::default()
            },
        });
        let cost = resolve_default(&asset).unwrap();
        assert_eq!(cost.acquire_price, dec!(627_600_000));
        assert_eq!(cost.necessary_expense, dec!(15_000_000));
        assert_eq!(cost.source(), CostSource::Itemized);

        let mut carried = carryover_asset(date(2021, 6, 1));
        carried.cost_breakdown = asset.cost_breakdown.clone();
        let cost = resolve_default(&carried).unwrap();
        assert_eq!(cost.acquire_price, dec!(200_000_000));
        assert_eq!(cost.necessary_expense, dec!(45_000_000));
    }

    #[test]
    fn real_estate_window_depends_on_gift_date() {
        let rules = pack(2024).carryover;
        let transfer = date(2030, 6, 1);
        assert!(carryover_period_valid(
            CarryoverClass::RealEstate,
            date(2023, 1, 1),
            transfer,
            &rules
        ));
        assert!(!carryover_period_valid(
            CarryoverClass::RealEstate,
            date(2022, 12, 31),
            transfer,
            &rules
        ));
    }

    #[test]
    fn securities_window_starts_in_2025() {
        let rules = pack(2025).carryover;
        assert!(carryover_period_valid(
            CarryoverClass::Security,
            date(2024, 9, 1),
            date(2025, 3, 1),
            &rules
        ));
        assert!(!carryover_period_valid(
            CarryoverClass::Security,
            date(2024, 3, 1),
            date(2024, 9, 1),
            &rules
        ));
        assert!(!carryover_period_valid(
            CarryoverClass::Security,
            date(2024, 1, 1),
            date(2025, 6, 1),
            &rules
        ));
    }

    #[test]
    fn gift_tax_is_allocated_and_capped() {
        assert_eq!(
            gift_tax_expense(dec!(30_000_000), Some(dec!(100)), Some(dec!(300)), dec!(1_000_000_000)),
            dec!(10_000_000)
        );
        assert_eq!(
            gift_tax_expense(dec!(30_000_000), Some(dec!(300)), Some(dec!(300)), dec!(1_000_000_000)),
            dec!(30_000_000)
        );
        assert_eq!(
            gift_tax_expense(dec!(30_000_000), None, None, dec!(12_000_000)),
            dec!(12_000_000)
        );
        assert_eq!(
            gift_tax_expense(dec!(30_000_000), None, None, dec!(-5)),
            Decimal::ZERO
        );
    }
}
