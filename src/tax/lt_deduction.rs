//! Long-term holding deduction rates.

use crate::core::case::LtDeductionCode;
use crate::rules::LtDeductionTables;
use rust_decimal::Decimal;

/// Deduction rate in percent points for a deduction code and holding facts.
pub fn rate(
    code: LtDeductionCode,
    holding_years: u32,
    residence_years: u32,
    tables: &LtDeductionTables,
) -> Decimal {
    match code {
        LtDeductionCode::Excluded | LtDeductionCode::RegionalUnsold => Decimal::ZERO,
        LtDeductionCode::OneHouse => {
            let holding = tables.one_house_holding.rate(holding_years);
            let residence = tables.one_house_residence.rate(residence_years);
            (holding + residence).min(tables.one_house_max)
        }
        LtDeductionCode::General => tables.general.rate(holding_years),
        LtDeductionCode::LongTermRental | LtDeductionCode::SupportedRental => tables
            .rental_staircase
            .iter()
            .find(|step| holding_years >= step.min_years)
            .map_or(Decimal::ZERO, |step| step.rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::fixtures::pack;
    use rust_decimal_macros::dec;

    fn tables() -> LtDeductionTables {
        pack(2024).lt_deduction
    }

    #[test]
    fn excluded_is_zero() {
        assert_eq!(rate(LtDeductionCode::Excluded, 20, 20, &tables()), Decimal::ZERO);
    }

    #[test]
    fn regional_unsold_has_no_table() {
        let t = tables();
        assert_eq!(rate(LtDeductionCode::RegionalUnsold, 10, 0, &t), Decimal::ZERO);
        assert_eq!(rate(LtDeductionCode::RegionalUnsold, 15, 5, &t), Decimal::ZERO);
    }

    #[test]
    fn general_table() {
        let t = tables();
        assert_eq!(rate(LtDeductionCode::General, 2, 0, &t), Decimal::ZERO);
        assert_eq!(rate(LtDeductionCode::General, 3, 0, &t), dec!(6));
        assert_eq!(rate(LtDeductionCode::General, 10, 0, &t), dec!(20));
        assert_eq!(rate(LtDeductionCode::General, 15, 0, &t), dec!(30));
        assert_eq!(rate(LtDeductionCode::General, 25, 0, &t), dec!(30));
    }

    #[test]
    fn one_house_sums_holding_and_residence() {
        let t = tables();
        assert_eq!(rate(LtDeductionCode::OneHouse, 5, 5, &t), dec!(40));
        assert_eq!(rate(LtDeductionCode::OneHouse, 10, 10, &t), dec!(80));
        assert_eq!(rate(LtDeductionCode::OneHouse, 30, 30, &t), dec!(80));
        // residence counts from two years, holding from three
        assert_eq!(rate(LtDeductionCode::OneHouse, 2, 2, &t), dec!(8));
        assert_eq!(rate(LtDeductionCode::OneHouse, 3, 1, &t), dec!(12));
    }

    #[test]
    fn rental_staircase() {
        let t = tables();
        assert_eq!(rate(LtDeductionCode::LongTermRental, 7, 0, &t), Decimal::ZERO);
        assert_eq!(rate(LtDeductionCode::LongTermRental, 8, 0, &t), dec!(50));
        assert_eq!(rate(LtDeductionCode::SupportedRental, 12, 0, &t), dec!(70));
    }
}
