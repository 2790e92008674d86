//! Stock movement models
//!
//! Movements are the append-only ledger behind a product's stock counter:
//! they are created or deleted as a whole, never updated.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::MovementKind;

/// A recorded stock movement, enriched with display names for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: Option<String>,
    pub product_code: Option<String>,
    pub kind: MovementKind,
    pub quantity: i32,
    /// Commit-time server clock, immutable after creation
    pub occurred_at: DateTime<Utc>,
    pub note: Option<String>,
    pub invoice_number: Option<String>,
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
}

/// Payload for recording a movement
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMovementRequest {
    #[validate(required(message = "produto é obrigatório"))]
    pub product_id: Option<Uuid>,
    #[validate(required(message = "tipo de movimentação é obrigatório"))]
    pub kind: Option<MovementKind>,
    #[validate(required(message = "quantidade é obrigatória"))]
    pub quantity: Option<i32>,
    pub note: Option<String>,
    pub invoice_number: Option<String>,
    /// Only meaningful for outbound movements; ignored on inbound
    pub customer_id: Option<Uuid>,
}

/// Filters for the movement listing
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MovementFilter {
    pub product_id: Option<Uuid>,
    pub kind: Option<MovementKind>,
    pub customer_id: Option<Uuid>,
    /// Inclusive lower bound (start of day)
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound, treated as end of day
    pub end_date: Option<NaiveDate>,
}
