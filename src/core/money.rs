//! Currency tolerance and rounding helpers
//!
//! All settlement comparisons use a fixed tolerance of one cent. Emitted
//! amounts are rounded half-up (away from zero) to two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Tolerance below which a balance or residue counts as settled (0.01)
pub const SETTLEMENT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Currency precision in decimal places
pub const CURRENCY_SCALE: u32 = 2;

/// Round an amount to currency precision
///
/// Uses round-half-up (`MidpointAwayFromZero`), so `0.005` becomes `0.01` and
/// `-0.005` becomes `-0.01`. A zero result is always the positive `0.00`.
pub fn round_currency(amount: Decimal) -> Decimal {
    let rounded =
        amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        Decimal::new(0, CURRENCY_SCALE)
    } else {
        rounded
    }
}

/// Whether an amount is within tolerance of zero
pub fn is_settled(amount: Decimal) -> bool {
    amount.abs() < SETTLEMENT_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_epsilon_is_one_cent() {
        assert_eq!(SETTLEMENT_EPSILON, dec!(0.01));
    }

    #[rstest]
    #[case::thirds(dec!(100) / dec!(3), "33.33")]
    #[case::two_thirds(dec!(200) / dec!(3), "66.67")]
    #[case::half_up(dec!(0.005), "0.01")]
    #[case::half_up_negative(dec!(-2.345), "-2.35")]
    #[case::pads_scale(dec!(30), "30.00")]
    #[case::negative_zero(dec!(-0.001), "0.00")]
    #[case::tiny_residue(dec!(0.000000000000000000000000001), "0.00")]
    fn test_round_currency(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format!("{:.2}", round_currency(amount)), expected);
    }

    #[rstest]
    #[case(dec!(0), true)]
    #[case(dec!(0.0099), true)]
    #[case(dec!(-0.0099), true)]
    #[case(dec!(0.01), false)]
    #[case(dec!(-5), false)]
    fn test_is_settled(#[case] amount: Decimal, #[case] expected: bool) {
        assert_eq!(is_settled(amount), expected);
    }
}
