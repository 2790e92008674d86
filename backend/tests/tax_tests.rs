//! Tax calculation tests
//!
//! Tests for the derived tax-value calculator:
//! - exactness and two-digit scale
//! - negative-rate clamping and soft-fail on malformed input
//! - recomputation on sale-price changes

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::tax::calculate_tax_value;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Creating a product with sale_price=100.00 and an 18% ICMS rate
    /// derives icms_valor=18.00
    #[test]
    fn test_icms_on_create() {
        assert_eq!(
            calculate_tax_value(Some(dec("100.00")), Some(dec("18"))),
            dec("18.00")
        );
    }

    /// Updating the sale price to 50.00 without touching the rate
    /// recomputes icms_valor to 9.00
    #[test]
    fn test_icms_recomputed_on_price_change() {
        let rate = Some(dec("18"));
        assert_eq!(calculate_tax_value(Some(dec("100.00")), rate), dec("18.00"));
        assert_eq!(calculate_tax_value(Some(dec("50.00")), rate), dec("9.00"));
    }

    /// The result always carries exactly two fractional digits
    #[test]
    fn test_two_digit_scale() {
        let value = calculate_tax_value(Some(dec("100")), Some(dec("18")));
        assert_eq!(value.scale(), 2);
        assert_eq!(value.to_string(), "18.00");
    }

    /// Midpoints round away from zero, not to even
    #[test]
    fn test_half_away_from_zero_rounding() {
        // 4.69 * 50% = 2.345 -> 2.35 (banker's rounding would give 2.34)
        assert_eq!(
            calculate_tax_value(Some(dec("4.69")), Some(dec("50"))),
            dec("2.35")
        );
        // 0.05 * 50% = 0.025 -> 0.03
        assert_eq!(
            calculate_tax_value(Some(dec("0.05")), Some(dec("50"))),
            dec("0.03")
        );
    }

    /// Missing inputs degrade to zero instead of failing
    #[test]
    fn test_missing_inputs_soft_fail() {
        assert_eq!(calculate_tax_value(None, Some(dec("18"))), Decimal::ZERO);
        assert_eq!(calculate_tax_value(Some(dec("100")), None), Decimal::ZERO);
        assert_eq!(calculate_tax_value(None, None), Decimal::ZERO);
    }

    /// Negative rates clamp to zero
    #[test]
    fn test_negative_rate_clamps() {
        assert_eq!(
            calculate_tax_value(Some(dec("250.00")), Some(dec("-18"))),
            Decimal::ZERO
        );
        assert_eq!(
            calculate_tax_value(Some(dec("250.00")), Some(dec("-0.01"))),
            Decimal::ZERO
        );
    }

    /// Malformed JSON rate input degrades to None through the lenient
    /// deserializer, which the calculator treats as zero
    #[test]
    fn test_malformed_rate_becomes_zero() {
        #[derive(serde::Deserialize)]
        struct Probe {
            #[serde(default, deserialize_with = "shared::tax::lenient_decimal")]
            rate: Option<Decimal>,
        }

        let probe: Probe = serde_json::from_str(r#"{"rate": "not-a-number"}"#).unwrap();
        assert_eq!(probe.rate, None);
        assert_eq!(
            calculate_tax_value(Some(dec("100.00")), probe.rate),
            Decimal::ZERO
        );
    }

    /// Typical Brazilian PIS/COFINS fractional rates
    #[test]
    fn test_fractional_rates() {
        assert_eq!(
            calculate_tax_value(Some(dec("199.90")), Some(dec("1.65"))),
            dec("3.30")
        );
        assert_eq!(
            calculate_tax_value(Some(dec("199.90")), Some(dec("7.60"))),
            dec("15.19")
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;
    use rust_decimal::RoundingStrategy;

    /// Strategy for generating non-negative prices up to 100000.00
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for generating rates in 0..=100.00
    fn rate_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// The tax value equals price * rate / 100 rounded to 2 digits
        #[test]
        fn prop_tax_value_matches_definition(
            price in price_strategy(),
            rate in rate_strategy()
        ) {
            let expected = (price * rate / Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            prop_assert_eq!(calculate_tax_value(Some(price), Some(rate)), expected);
        }

        /// The tax value is never negative for a non-negative price
        #[test]
        fn prop_tax_value_non_negative(
            price in price_strategy(),
            rate in -10_000i64..=10_000i64
        ) {
            let rate = Decimal::new(rate, 2);
            let value = calculate_tax_value(Some(price), Some(rate));
            prop_assert!(value >= Decimal::ZERO);
        }

        /// Any negative rate behaves exactly like a zero rate
        #[test]
        fn prop_negative_rate_equals_zero_rate(
            price in price_strategy(),
            rate in 1i64..=10_000i64
        ) {
            let negative = Decimal::new(-rate, 2);
            prop_assert_eq!(
                calculate_tax_value(Some(price), Some(negative)),
                calculate_tax_value(Some(price), Some(Decimal::ZERO))
            );
        }

        /// The result always has scale 2 (no binary-float artifacts)
        #[test]
        fn prop_result_scale_is_two(
            price in price_strategy(),
            rate in rate_strategy()
        ) {
            let value = calculate_tax_value(Some(price), Some(rate));
            prop_assert_eq!(value.scale(), 2);
        }
    }
}
