//! Display formatting for amounts, ratios and rates.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as dollars with thousands separators: `$1,234.56`.
///
/// Negative amounts render as `-$200.00`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{}${}", sign, group_thousands(rounded.abs()))
}

/// Format a ratio as a percentage with one decimal: `0.5` -> `50.0%`.
pub fn format_percent(ratio: Decimal) -> String {
    let pct = ratio
        .saturating_mul(Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}%", pct)
}

/// Two-decimal rendering without a currency sign, for exchange rates.
pub fn format_rate(rate: Decimal) -> String {
    group_thousands(rate.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Lossy conversion for chart libraries that only take floats.
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn group_thousands(value: Decimal) -> String {
    let text = format!("{:.2}", value);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((&text, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}.{}", grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(0)), "$0.00");
        assert_eq!(format_currency(dec!(500)), "$500.00");
        assert_eq!(format_currency(dec!(1234.5)), "$1,234.50");
        assert_eq!(format_currency(dec!(1628.894627)), "$1,628.89");
        assert_eq!(format_currency(dec!(1000000)), "$1,000,000.00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-200)), "-$200.00");
        assert_eq!(format_currency(dec!(-1234.567)), "-$1,234.57");
    }

    #[test]
    fn test_format_currency_rounds_half_away() {
        assert_eq!(format_currency(dec!(166.665)), "$166.67");
        assert_eq!(format_currency(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(0.5)), "50.0%");
        assert_eq!(format_percent(dec!(1)), "100.0%");
        assert_eq!(format_percent(dec!(0.12345)), "12.3%");
        assert!(format_percent(Decimal::MAX).ends_with('%'));
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(dec!(0.9234)), "0.92");
        assert_eq!(format_rate(dec!(149.5)), "149.50");
    }
}
