//! Derived tax-value calculation
//!
//! Product tax lines (ICMS, IPI, PIS, COFINS) carry a percentage rate and a
//! derived value. The value is always `price * rate / 100`, rounded to two
//! fractional digits half away from zero. Missing or unusable inputs degrade
//! to zero so a product write never fails on a tax line.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::PatchField;

/// Fractional digits kept on derived tax values
pub const TAX_SCALE: u32 = 2;

/// Compute a tax value from a base price and a percentage rate.
///
/// A missing price or rate counts as zero, and a negative rate is clamped
/// to zero, so the result is never negative for a non-negative price.
pub fn calculate_tax_value(price: Option<Decimal>, rate: Option<Decimal>) -> Decimal {
    let price = price.unwrap_or(Decimal::ZERO);
    let rate = rate.unwrap_or(Decimal::ZERO).max(Decimal::ZERO);
    let mut value = (price * rate / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(TAX_SCALE, RoundingStrategy::MidpointAwayFromZero);
    // Exact results come back with a smaller scale; pad to two digits
    value.rescale(TAX_SCALE);
    value
}

fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        // Going through the textual form keeps JSON numbers exact
        Value::Number(number) => Decimal::from_str(&number.to_string()).ok(),
        Value::String(text) => Decimal::from_str(text.trim()).ok(),
        _ => None,
    }
}

/// Lenient decimal deserializer: `null` or unparseable input becomes `None`.
///
/// Combine with `#[serde(default)]` so an absent key also maps to `None`.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decimal_from_value(&value))
}

/// Lenient patch deserializer for decimal fields: `null` or unparseable
/// input clears the stored value, anything parseable sets it. Absent keys
/// never reach this function and default to [`PatchField::Keep`].
pub fn lenient_decimal_patch<'de, D>(deserializer: D) -> Result<PatchField<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match decimal_from_value(&value) {
        Some(parsed) => PatchField::Set(parsed),
        None => PatchField::Clear,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_basic_tax_value() {
        assert_eq!(
            calculate_tax_value(Some(dec("100.00")), Some(dec("18"))),
            dec("18.00")
        );
        assert_eq!(
            calculate_tax_value(Some(dec("50.00")), Some(dec("18"))),
            dec("9.00")
        );
    }

    #[test]
    fn test_result_always_two_decimal_places() {
        let value = calculate_tax_value(Some(dec("100")), Some(dec("18")));
        assert_eq!(value.to_string(), "18.00");
    }

    #[test]
    fn test_missing_inputs_are_zero() {
        assert_eq!(calculate_tax_value(None, Some(dec("18"))), Decimal::ZERO);
        assert_eq!(calculate_tax_value(Some(dec("100")), None), Decimal::ZERO);
        assert_eq!(calculate_tax_value(None, None), Decimal::ZERO);
    }

    #[test]
    fn test_negative_rate_clamps_to_zero() {
        assert_eq!(
            calculate_tax_value(Some(dec("100.00")), Some(dec("-5"))),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        // 4.69 * 50% = 2.345, which must round up to 2.35 (not to even)
        assert_eq!(
            calculate_tax_value(Some(dec("4.69")), Some(dec("50"))),
            dec("2.35")
        );
        // 4.67 * 50% = 2.335 -> 2.34
        assert_eq!(
            calculate_tax_value(Some(dec("4.67")), Some(dec("50"))),
            dec("2.34")
        );
    }

    #[test]
    fn test_fractional_rate() {
        assert_eq!(
            calculate_tax_value(Some(dec("199.90")), Some(dec("1.65"))),
            dec("3.30")
        );
    }

    #[derive(Debug, Deserialize)]
    struct RateProbe {
        #[serde(default, deserialize_with = "lenient_decimal")]
        rate: Option<Decimal>,
    }

    #[test]
    fn test_lenient_decimal_accepts_numbers_and_strings() {
        let probe: RateProbe = serde_json::from_str(r#"{"rate": 18.5}"#).unwrap();
        assert_eq!(probe.rate, Some(dec("18.5")));

        let probe: RateProbe = serde_json::from_str(r#"{"rate": "12.25"}"#).unwrap();
        assert_eq!(probe.rate, Some(dec("12.25")));
    }

    #[test]
    fn test_lenient_decimal_degrades_junk_to_none() {
        let probe: RateProbe = serde_json::from_str(r#"{"rate": "abc"}"#).unwrap();
        assert_eq!(probe.rate, None);

        let probe: RateProbe = serde_json::from_str(r#"{"rate": null}"#).unwrap();
        assert_eq!(probe.rate, None);

        let probe: RateProbe = serde_json::from_str(r#"{"rate": [1, 2]}"#).unwrap();
        assert_eq!(probe.rate, None);

        let probe: RateProbe = serde_json::from_str("{}").unwrap();
        assert_eq!(probe.rate, None);
    }

    #[derive(Debug, Deserialize)]
    struct PatchProbe {
        #[serde(default, deserialize_with = "lenient_decimal_patch")]
        rate: PatchField<Decimal>,
    }

    #[test]
    fn test_lenient_patch_tristate() {
        let probe: PatchProbe = serde_json::from_str("{}").unwrap();
        assert_eq!(probe.rate, PatchField::Keep);

        let probe: PatchProbe = serde_json::from_str(r#"{"rate": null}"#).unwrap();
        assert_eq!(probe.rate, PatchField::Clear);

        let probe: PatchProbe = serde_json::from_str(r#"{"rate": "oops"}"#).unwrap();
        assert_eq!(probe.rate, PatchField::Clear);

        let probe: PatchProbe = serde_json::from_str(r#"{"rate": 7}"#).unwrap();
        assert_eq!(probe.rate, PatchField::Set(dec("7")));
    }
}
