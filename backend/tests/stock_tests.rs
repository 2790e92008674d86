//! Stock ledger tests
//!
//! Tests for the check-and-apply rules the movement transaction executes
//! under its product row lock:
//! - net-sum invariant and non-negativity
//! - fail-fast on insufficient stock and invalid quantity
//! - serialization of concurrent outbound movements

use proptest::prelude::*;

use shared::stock::{apply_movement, revert_movement, StockError};
use shared::types::MovementKind;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_inbound_increases_stock() {
        assert_eq!(apply_movement(0, MovementKind::Inbound, 10), Ok(10));
        assert_eq!(apply_movement(7, MovementKind::Inbound, 3), Ok(10));
    }

    #[test]
    fn test_outbound_decreases_stock() {
        assert_eq!(apply_movement(10, MovementKind::Outbound, 3), Ok(7));
        // Draining to exactly zero is allowed
        assert_eq!(apply_movement(10, MovementKind::Outbound, 10), Ok(0));
    }

    /// A failed outbound leaves the state represented by the input untouched:
    /// the caller rolls back and no movement is recorded
    #[test]
    fn test_outbound_insufficient_stock() {
        assert_eq!(
            apply_movement(5, MovementKind::Outbound, 6),
            Err(StockError::InsufficientStock {
                available: 5,
                requested: 6,
            })
        );
    }

    #[test]
    fn test_zero_and_negative_quantities_rejected() {
        assert_eq!(
            apply_movement(10, MovementKind::Inbound, 0),
            Err(StockError::InvalidQuantity)
        );
        assert_eq!(
            apply_movement(10, MovementKind::Outbound, -5),
            Err(StockError::InvalidQuantity)
        );
    }

    /// Two outbound movements of 3 against stock 5: whichever the row lock
    /// admits first succeeds, the second sees stock 2 and fails; final
    /// stock is 2, never negative, never double-decremented
    #[test]
    fn test_concurrent_outbound_serialization() {
        let initial = 5;

        let after_first = apply_movement(initial, MovementKind::Outbound, 3).unwrap();
        assert_eq!(after_first, 2);

        let second = apply_movement(after_first, MovementKind::Outbound, 3);
        assert_eq!(
            second,
            Err(StockError::InsufficientStock {
                available: 2,
                requested: 3,
            })
        );
    }

    /// Deleting a movement reverses its delta
    #[test]
    fn test_delete_reverses_delta() {
        let after_out = apply_movement(10, MovementKind::Outbound, 4).unwrap();
        assert_eq!(revert_movement(after_out, MovementKind::Outbound, 4), Ok(10));

        let after_in = apply_movement(10, MovementKind::Inbound, 4).unwrap();
        assert_eq!(revert_movement(after_in, MovementKind::Inbound, 4), Ok(10));
    }

    /// Two deletes of the same movement revert the stock only once: the
    /// second finds no ledger row left and must not touch the stock, so
    /// stock stays equal to the net sum of the remaining rows
    #[test]
    fn test_repeated_delete_reverts_only_once() {
        let mut ledger = vec![
            (MovementKind::Inbound, 10),
            (MovementKind::Outbound, 4),
        ];
        let mut stock = 0;
        for &(kind, quantity) in &ledger {
            stock = apply_movement(stock, kind, quantity).unwrap();
        }
        assert_eq!(stock, 6);

        // First delete of the outbound movement removes the row and
        // reverts its delta
        let (kind, quantity) = ledger.remove(1);
        stock = revert_movement(stock, kind, quantity).unwrap();
        assert_eq!(stock, 10);

        // A second delete of the same movement sees no row and reverts
        // nothing; the net-sum invariant still holds
        assert!(ledger.get(1).is_none());
        let net: i32 = ledger
            .iter()
            .map(|&(k, q)| match k {
                MovementKind::Inbound => q,
                MovementKind::Outbound => -q,
            })
            .sum();
        assert_eq!(stock, net);
    }

    /// Reversing an inbound whose quantity was already shipped out again
    /// must not drive stock negative
    #[test]
    fn test_delete_inbound_blocked_when_consumed() {
        assert_eq!(
            revert_movement(2, MovementKind::Inbound, 5),
            Err(StockError::InsufficientStock {
                available: 2,
                requested: 5,
            })
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating movement kinds
    fn kind_strategy() -> impl Strategy<Value = MovementKind> {
        prop_oneof![Just(MovementKind::Inbound), Just(MovementKind::Outbound)]
    }

    /// Strategy for generating positive quantities
    fn quantity_strategy() -> impl Strategy<Value = i32> {
        1i32..=1000i32
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// After any sequence of movements, stock equals the net sum of the
        /// applied quantities and never goes negative; rejected movements
        /// change nothing
        #[test]
        fn prop_stock_equals_net_sum_of_applied_movements(
            movements in prop::collection::vec(
                (kind_strategy(), quantity_strategy()),
                0..40
            )
        ) {
            let mut stock = 0i32;
            let mut inbound_total = 0i64;
            let mut outbound_total = 0i64;

            for (kind, quantity) in movements {
                match apply_movement(stock, kind, quantity) {
                    Ok(new_stock) => {
                        stock = new_stock;
                        match kind {
                            MovementKind::Inbound => inbound_total += i64::from(quantity),
                            MovementKind::Outbound => outbound_total += i64::from(quantity),
                        }
                    }
                    Err(StockError::InsufficientStock { available, requested }) => {
                        // Failure reports the exact state it checked against
                        prop_assert_eq!(available, stock);
                        prop_assert_eq!(i64::from(requested), i64::from(quantity));
                    }
                    Err(StockError::InvalidQuantity) => {
                        prop_assert!(quantity <= 0);
                    }
                }

                prop_assert!(stock >= 0);
                prop_assert_eq!(i64::from(stock), inbound_total - outbound_total);
            }
        }

        /// An outbound either succeeds with enough stock or fails leaving
        /// the input untouched
        #[test]
        fn prop_outbound_all_or_nothing(
            stock in 0i32..=1000i32,
            quantity in quantity_strategy()
        ) {
            match apply_movement(stock, MovementKind::Outbound, quantity) {
                Ok(new_stock) => {
                    prop_assert!(stock >= quantity);
                    prop_assert_eq!(new_stock, stock - quantity);
                }
                Err(StockError::InsufficientStock { available, requested }) => {
                    prop_assert!(stock < quantity);
                    prop_assert_eq!(available, stock);
                    prop_assert_eq!(requested, quantity);
                }
                Err(StockError::InvalidQuantity) => {
                    // quantity_strategy only yields positive values
                    prop_assert!(false);
                }
            }
        }

        /// Applying then reverting a movement restores the original stock
        #[test]
        fn prop_revert_is_inverse_of_apply(
            stock in 0i32..=1000i32,
            kind in kind_strategy(),
            quantity in quantity_strategy()
        ) {
            if let Ok(after) = apply_movement(stock, kind, quantity) {
                prop_assert_eq!(revert_movement(after, kind, quantity), Ok(stock));
            }
        }
    }
}
