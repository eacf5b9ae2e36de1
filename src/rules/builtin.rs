use super::*;
use rust_decimal_macros::dec;

/// Rule packs compiled into the binary (tax years 2023 to 2025).
pub struct BuiltinRulePacks {
    packs: BTreeMap<i32, RulePack>,
}

impl BuiltinRulePacks {
    pub fn new() -> Self {
        let packs = [2023, 2024, 2025]
            .into_iter()
            .map(|year| (year, pack_for(year)))
            .collect();
        BuiltinRulePacks { packs }
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.packs.keys().copied()
    }
}

impl Default for BuiltinRulePacks {
    fn default() -> Self {
        Self::new()
    }
}

impl RulePackProvider for BuiltinRulePacks {
    fn rule_pack(&self, year: i32) -> Result<&RulePack, RulePackError> {
        self.packs
            .get(&year)
            .ok_or(RulePackError::UnsupportedYear(year))
    }

    fn latest_year(&self) -> Option<i32> {
        self.packs.keys().next_back().copied()
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn pack_for(year: i32) -> RulePack {
    // the multi-home surtax suspension has been extended a year at a time
    let suspension_end = match year {
        2023 => date(2024, 5, 9),
        2024 => date(2025, 5, 9),
        _ => date(2026, 5, 9),
    };

    RulePack {
        year,
        brackets: brackets(),
        rate_categories: rate_categories(),
        multi_home_suspension: Some(DateWindow {
            start: date(2022, 5, 10),
            end: suspension_end,
        }),
        non_business_surtax: dec!(10),
        lt_deduction: lt_deduction_tables(),
        high_value_threshold: dec!(1_200_000_000),
        basic_deduction: BasicDeductionLimits {
            per_bucket: dec!(2_500_000),
            annual_total: dec!(12_500_000),
        },
        e_filing_credit: dec!(20_000),
        relief_limits: ReliefLimits {
            annual: dec!(100_000_000),
            five_year: dec!(200_000_000),
            applicable_codes: [
                "SELF_FARM_8Y",
                "FARM_SUBSTITUTE",
                "PUBLIC_CASH",
                "PUBLIC_BOND_3Y",
                "PUBLIC_BOND_5Y",
                "FOREST_MGMT",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        },
        rural_special_tax: RuralTaxRules {
            rate: dec!(20),
            exempt_codes: vec![
                ExemptCode {
                    code: "SELF_FARM_8Y".to_string(),
                    reason: "self-farmed farmland relief".to_string(),
                },
                ExemptCode {
                    code: "FARM_SUBSTITUTE".to_string(),
                    reason: "farmland substitution relief".to_string(),
                },
            ],
            public_acquisition_prefix: "PUBLIC_".to_string(),
        },
        penalty: PenaltyRules {
            general_no_report: dec!(0.20),
            general_under_report: dec!(0.10),
            unfaithful_no_report: dec!(0.40),
            unfaithful_under_report: dec!(0.40),
            late_payment_daily_rate: dec!(0.00022),
            late_payment_max_days: 1825,
            late_filing_reduction: vec![
                dec!(0.50),
                dec!(0.30),
                dec!(0.20),
                dec!(0.10),
                dec!(0.05),
                dec!(0.05),
                dec!(0),
            ],
            amended_filing_reduction: vec![
                dec!(0.90),
                dec!(0.75),
                dec!(0.50),
                dec!(0.30),
                dec!(0.20),
                dec!(0.10),
                dec!(0),
            ],
        },
        carryover: CarryoverRules {
            real_estate_years: 5,
            real_estate_extended_from: date(2023, 1, 1),
            real_estate_years_extended: 10,
            securities_years: 1,
            securities_effective_year: 2025,
        },
        derivative_rates: DerivativeRates {
            transitional: dec!(5),
            standard: dec!(10),
        },
    }
}

fn brackets() -> Vec<Bracket> {
    [
        (Some(dec!(14_000_000)), dec!(6), dec!(0)),
        (Some(dec!(50_000_000)), dec!(15), dec!(1_260_000)),
        (Some(dec!(88_000_000)), dec!(24), dec!(5_760_000)),
        (Some(dec!(150_000_000)), dec!(35), dec!(15_440_000)),
        (Some(dec!(300_000_000)), dec!(38), dec!(19_940_000)),
        (Some(dec!(500_000_000)), dec!(40), dec!(25_940_000)),
        (Some(dec!(1_000_000_000)), dec!(42), dec!(35_940_000)),
        (None, dec!(45), dec!(65_940_000)),
    ]
    .into_iter()
    .map(|(upper, rate, deduction)| Bracket {
        upper,
        rate,
        deduction,
    })
    .collect()
}

fn rate_categories() -> BTreeMap<String, RateCategory> {
    let mut codes = BTreeMap::new();
    let mut add = |code: &str, category: RateCategory| {
        codes.insert(code.to_string(), category);
    };

    add("1-10", RateCategory::progressive("land/building, general"));
    add(
        "1-11",
        RateCategory {
            non_business: true,
            ..RateCategory::progressive("non-business land")
        },
    );
    add("1-15", RateCategory::flat("land/building, under 1 year", dec!(50)));
    add("1-21", RateCategory::flat("land/building, 1-2 years", dec!(40)));
    add("1-23", RateCategory::flat("membership right, under 1 year", dec!(70)));
    add("1-24", RateCategory::flat("membership right, 1-2 years", dec!(60)));
    add("1-30", RateCategory::progressive("membership right, 2 years or more"));
    add(
        "1-33",
        RateCategory {
            non_business: true,
            ..RateCategory::progressive("non-business land, 2 years or more")
        },
    );
    add("1-35", RateCategory::flat("unregistered", dec!(70)));
    add("1-38", RateCategory::flat("pre-sale right, under 1 year", dec!(70)));
    add("1-39", RateCategory::flat("pre-sale right, 1-2 years", dec!(60)));
    add("1-40", RateCategory::flat("pre-sale right, 2 years or more", dec!(60)));
    add(
        "1-46",
        RateCategory {
            multi_home_surtax: Some(dec!(20)),
            ..RateCategory::progressive("adjusted area, two homes")
        },
    );
    add(
        "1-47",
        RateCategory {
            multi_home_surtax: Some(dec!(30)),
            ..RateCategory::progressive("adjusted area, three or more homes")
        },
    );
    add("1-50", RateCategory::flat("housing, under 1 year", dec!(70)));
    add("1-51", RateCategory::flat("housing, 1-2 years", dec!(60)));
    add("1-52", RateCategory::progressive("housing, 2 years or more"));
    // short-term multi-home housing: short-term rate plus the home-count surtax
    for (code, label, rate, surtax) in [
        ("1-53", "adjusted area, two homes, under 1 year", dec!(70), dec!(20)),
        ("1-54", "adjusted area, two homes, 1-2 years", dec!(60), dec!(20)),
        ("1-55", "adjusted area, three or more homes, under 1 year", dec!(70), dec!(30)),
        ("1-56", "adjusted area, three or more homes, 1-2 years", dec!(60), dec!(30)),
    ] {
        add(
            code,
            RateCategory {
                multi_home_surtax: Some(surtax),
                ..RateCategory::flat(label, rate)
            },
        );
    }
    add("1-61", RateCategory::flat("small/medium enterprise stock", dec!(10)));
    add("1-62", RateCategory::flat("stock, general", dec!(20)));
    add("1-63", RateCategory::flat("listed stock, major shareholder", dec!(20)));
    add("1-65", RateCategory::flat("stock, major shareholder over threshold", dec!(25)));
    add("1-70", RateCategory::progressive("specific stock"));
    add("1-73", RateCategory::flat("foreign stock", dec!(20)));
    add("1-80", RateCategory::flat("derivatives, transitional", dec!(5)));
    add("1-81", RateCategory::flat("derivatives", dec!(10)));

    codes
}

fn lt_deduction_tables() -> LtDeductionTables {
    // table 1: 6% at 3 years, +2% per year, 30% at 15 years
    let general = (3..=15u32)
        .map(|y| (y, Decimal::from(6 + (y - 3) * 2)))
        .collect();
    // table 2 holding: 4% per year from 3 years, 40% at 10 years
    let holding = (3..=10u32).map(|y| (y, Decimal::from(y * 4))).collect();
    // table 2 residence: 8% at 2 years, then 4% per year, 40% at 10 years
    let residence = (2..=10u32).map(|y| (y, Decimal::from(y * 4))).collect();

    LtDeductionTables {
        general: YearTable {
            min_years: 3,
            cap_years: 15,
            rates: general,
        },
        one_house_holding: YearTable {
            min_years: 3,
            cap_years: 10,
            rates: holding,
        },
        one_house_residence: YearTable {
            min_years: 2,
            cap_years: 10,
            rates: residence,
        },
        one_house_max: dec!(80),
        rental_staircase: vec![
            StaircaseStep {
                min_years: 10,
                rate: dec!(70),
            },
            StaircaseStep {
                min_years: 8,
                rate: dec!(50),
            },
        ],
    }
}
