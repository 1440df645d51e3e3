//! Decimal money helpers.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Smallest fare the core ever publishes.
pub const FARE_FLOOR: Decimal = Decimal::ONE;

/// Multiply an amount by a float factor, saturating on overflow.
///
/// Non-finite factors yield zero.
pub fn scale(amount: Decimal, factor: f64) -> Decimal {
    Decimal::from_f64(factor).map_or(Decimal::ZERO, |f| amount.saturating_mul(f))
}

/// Round a fare to cents and floor it at [`FARE_FLOOR`].
pub fn fare(amount: Decimal) -> Decimal {
    amount.round_dp(2).max(FARE_FLOOR)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn scale_handles_fractions_and_nan() {
        assert_eq!(scale(dec!(10000), 0.5), dec!(5000));
        assert_eq!(scale(dec!(10000), -1.5), dec!(-15000));
        assert_eq!(scale(dec!(10000), f64::NAN), Decimal::ZERO);
    }

    #[test]
    fn fares_are_floored_and_rounded() {
        assert_eq!(fare(dec!(0.004)), dec!(1.00));
        assert_eq!(fare(dec!(123.456)), dec!(123.46));
    }
}
