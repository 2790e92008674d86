//! Stock ledger arithmetic
//!
//! Pure check-and-apply rules for stock movements. The persistence layer
//! runs these inside a row-locked transaction so the availability check and
//! the stock update are atomic per product.

use thiserror::Error;

use crate::types::MovementKind;

/// Violations of the stock ledger rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StockError {
    #[error("movement quantity must be a positive integer")]
    InvalidQuantity,

    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i32, requested: i32 },
}

/// Apply a movement to a stock level.
///
/// Inbound movements add unconditionally. Outbound movements require the
/// full quantity to be available; on failure the current level is untouched.
pub fn apply_movement(
    current_stock: i32,
    kind: MovementKind,
    quantity: i32,
) -> Result<i32, StockError> {
    if quantity <= 0 {
        return Err(StockError::InvalidQuantity);
    }
    match kind {
        MovementKind::Inbound => Ok(current_stock + quantity),
        MovementKind::Outbound => {
            if current_stock < quantity {
                Err(StockError::InsufficientStock {
                    available: current_stock,
                    requested: quantity,
                })
            } else {
                Ok(current_stock - quantity)
            }
        }
    }
}

/// Undo a previously applied movement, used when a movement is deleted.
///
/// Reversing an inbound movement can fail with `InsufficientStock` when the
/// quantity has already been consumed, keeping stock non-negative.
pub fn revert_movement(
    current_stock: i32,
    kind: MovementKind,
    quantity: i32,
) -> Result<i32, StockError> {
    apply_movement(current_stock, kind.opposite(), quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_adds() {
        assert_eq!(apply_movement(10, MovementKind::Inbound, 5), Ok(15));
        assert_eq!(apply_movement(0, MovementKind::Inbound, 1), Ok(1));
    }

    #[test]
    fn test_outbound_subtracts() {
        assert_eq!(apply_movement(10, MovementKind::Outbound, 4), Ok(6));
        // Draining to exactly zero is allowed
        assert_eq!(apply_movement(5, MovementKind::Outbound, 5), Ok(0));
    }

    #[test]
    fn test_outbound_insufficient() {
        assert_eq!(
            apply_movement(5, MovementKind::Outbound, 6),
            Err(StockError::InsufficientStock {
                available: 5,
                requested: 6,
            })
        );
        assert_eq!(
            apply_movement(0, MovementKind::Outbound, 1),
            Err(StockError::InsufficientStock {
                available: 0,
                requested: 1,
            })
        );
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        assert_eq!(
            apply_movement(10, MovementKind::Inbound, 0),
            Err(StockError::InvalidQuantity)
        );
        assert_eq!(
            apply_movement(10, MovementKind::Outbound, -3),
            Err(StockError::InvalidQuantity)
        );
    }

    #[test]
    fn test_revert_undoes_apply() {
        let after = apply_movement(10, MovementKind::Outbound, 4).unwrap();
        assert_eq!(revert_movement(after, MovementKind::Outbound, 4), Ok(10));

        let after = apply_movement(10, MovementKind::Inbound, 4).unwrap();
        assert_eq!(revert_movement(after, MovementKind::Inbound, 4), Ok(10));
    }

    #[test]
    fn test_revert_inbound_cannot_go_negative() {
        // The received quantity was already shipped out again
        assert_eq!(
            revert_movement(2, MovementKind::Inbound, 5),
            Err(StockError::InsufficientStock {
                available: 2,
                requested: 5,
            })
        );
    }
}
