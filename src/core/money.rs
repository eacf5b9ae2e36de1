//! Whole-won amounts and the rounding rules used on every official form line.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Amount in Korean won. Every value that lands on a form line is a whole number.
pub type Won = Decimal;

/// Round to the nearest whole won, halves upward (`floor(x + 0.5)`).
///
/// Idempotent: rounding an already whole amount returns it unchanged.
pub fn round_to_won(amount: Decimal) -> Won {
    (amount + dec!(0.5)).floor()
}

/// `amount × pct / 100`, unrounded. Rates are carried as percent points.
pub fn apply_percent(amount: Decimal, pct: Decimal) -> Decimal {
    amount * pct / dec!(100)
}

/// Format as `₩1,234,567` for terminal tables.
pub fn format_won(amount: Won) -> String {
    let negative = amount.is_sign_negative() && !amount.is_zero();
    let digits = amount.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-₩{}", grouped)
    } else {
        format!("₩{}", grouped)
    }
}
