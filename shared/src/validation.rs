//! Validation utilities for the Estoque inventory platform
//!
//! Includes Brazil-specific document validations (CPF/CNPJ) used on
//! customer and supplier records.

use rust_decimal::Decimal;
use validator::ValidationError;

// ============================================================================
// General Validations
// ============================================================================

/// Validate that a monetary amount or quantity is not negative
pub fn validate_not_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("not_negative"));
    }
    Ok(())
}

// ============================================================================
// Brazil-Specific Validations
// ============================================================================

fn collect_digits(value: &str) -> Vec<u32> {
    value.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn all_digits_equal(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

/// Validate a Brazilian CPF (individual taxpayer number)
///
/// Accepts formatted ("529.982.247-25") or bare ("52998224725") input.
/// 11 digits with two modulo-11 check digits.
pub fn validate_cpf(cpf: &str) -> Result<(), ValidationError> {
    let digits = collect_digits(cpf);

    if digits.len() != 11 {
        return Err(ValidationError::new("cpf_length"));
    }
    // Sequences like 111.111.111-11 pass the checksum but are not issued
    if all_digits_equal(&digits) {
        return Err(ValidationError::new("cpf_repeated_digits"));
    }

    let check_digit = |prefix_len: usize| -> u32 {
        let start_weight = (prefix_len + 1) as u32;
        let sum: u32 = digits[..prefix_len]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (start_weight - i as u32))
            .sum();
        let remainder = sum % 11;
        if remainder < 2 {
            0
        } else {
            11 - remainder
        }
    };

    if check_digit(9) != digits[9] || check_digit(10) != digits[10] {
        return Err(ValidationError::new("cpf_checksum"));
    }

    Ok(())
}

/// Validate a Brazilian CNPJ (company taxpayer number)
///
/// Accepts formatted ("11.222.333/0001-81") or bare input.
/// 14 digits with two modulo-11 check digits over cyclic weights.
pub fn validate_cnpj(cnpj: &str) -> Result<(), ValidationError> {
    const FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

    let digits = collect_digits(cnpj);

    if digits.len() != 14 {
        return Err(ValidationError::new("cnpj_length"));
    }
    if all_digits_equal(&digits) {
        return Err(ValidationError::new("cnpj_repeated_digits"));
    }

    let check_digit = |weights: &[u32]| -> u32 {
        let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
        let remainder = sum % 11;
        if remainder < 2 {
            0
        } else {
            11 - remainder
        }
    };

    if check_digit(&FIRST_WEIGHTS) != digits[12] || check_digit(&SECOND_WEIGHTS) != digits[13] {
        return Err(ValidationError::new("cnpj_checksum"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    // ========================================================================
    // General Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_not_negative() {
        assert!(validate_not_negative(&Decimal::ZERO).is_ok());
        assert!(validate_not_negative(&Decimal::from(10)).is_ok());
        assert!(validate_not_negative(&Decimal::from_str("0.01").unwrap()).is_ok());
        assert!(validate_not_negative(&Decimal::from(-1)).is_err());
        assert!(validate_not_negative(&Decimal::from_str("-0.01").unwrap()).is_err());
    }

    // ========================================================================
    // Brazil-Specific Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_cpf_valid() {
        assert!(validate_cpf("52998224725").is_ok());
        // Formatted input
        assert!(validate_cpf("529.982.247-25").is_ok());
        assert!(validate_cpf("111.444.777-35").is_ok());
    }

    #[test]
    fn test_validate_cpf_invalid() {
        // Wrong length
        assert!(validate_cpf("123456789").is_err());
        // Bad check digits
        assert!(validate_cpf("52998224726").is_err());
        assert!(validate_cpf("111.444.777-34").is_err());
        // Repeated digits pass the raw checksum but are rejected
        assert!(validate_cpf("11111111111").is_err());
    }

    #[test]
    fn test_validate_cnpj_valid() {
        assert!(validate_cnpj("11222333000181").is_ok());
        // Formatted input
        assert!(validate_cnpj("11.222.333/0001-81").is_ok());
    }

    #[test]
    fn test_validate_cnpj_invalid() {
        assert!(validate_cnpj("1122233300018").is_err());
        assert!(validate_cnpj("11222333000182").is_err());
        assert!(validate_cnpj("00000000000000").is_err());
    }
}
