//! Stock movement service
//!
//! Executes the stock ledger: every create or delete runs inside a single
//! transaction holding a `FOR UPDATE` lock on the product row, so the
//! availability check and the stock update cannot interleave with a
//! concurrent movement on the same product.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{CreateMovementRequest, Movement, MovementFilter};
use shared::stock::{apply_movement, revert_movement};
use shared::types::{MovementKind, Paginated, PaginationParams};

/// Movement service owning the ledger transactions
#[derive(Clone)]
pub struct MovementService {
    db: PgPool,
}

/// Movement row enriched with product and customer display names
#[derive(Debug, FromRow)]
struct MovementRow {
    id: Uuid,
    product_id: Uuid,
    product_name: Option<String>,
    product_code: Option<String>,
    kind: MovementKind,
    quantity: i32,
    occurred_at: DateTime<Utc>,
    note: Option<String>,
    invoice_number: Option<String>,
    customer_id: Option<Uuid>,
    customer_name: Option<String>,
}

impl From<MovementRow> for Movement {
    fn from(row: MovementRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            product_code: row.product_code,
            kind: row.kind,
            quantity: row.quantity,
            occurred_at: row.occurred_at,
            note: row.note,
            invoice_number: row.invoice_number,
            customer_id: row.customer_id,
            customer_name: row.customer_name,
        }
    }
}

/// Shared SELECT column list for enriched movement reads
const MOVEMENT_COLUMNS: &str = r#"
    m.id, m.product_id, p.name AS product_name, p.code AS product_code,
    m.kind, m.quantity, m.occurred_at, m.note, m.invoice_number,
    m.customer_id, c.name AS customer_name
"#;

impl MovementService {
    /// Create a new MovementService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a movement and adjust the product's stock as one atomic unit
    pub async fn create(&self, input: CreateMovementRequest) -> AppResult<Movement> {
        // Required fields guaranteed by the validated payload
        let product_id = input.product_id.unwrap_or_default();
        let kind = input.kind.ok_or(AppError::ValidationError(
            "kind must be 'inbound' or 'outbound'".to_string(),
        ))?;
        let quantity = input.quantity.unwrap_or_default();

        // Pure check before any I/O
        if quantity <= 0 {
            return Err(AppError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        // The serialization point: concurrent movements on the same product
        // queue behind this lock
        let current_stock = sqlx::query_scalar::<_, i32>(
            "SELECT current_stock FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Produto".to_string()))?;

        // A customer reference is only meaningful on outbound movements
        let customer_id = match (kind, input.customer_id) {
            (MovementKind::Outbound, Some(id)) => {
                let exists = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)",
                )
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
                if !exists {
                    return Err(AppError::UnknownCustomer);
                }
                Some(id)
            }
            _ => None,
        };

        let new_stock = apply_movement(current_stock, kind, quantity)?;

        sqlx::query("UPDATE products SET current_stock = $1, updated_at = NOW() WHERE id = $2")
            .bind(new_stock)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        let movement_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO movements (product_id, kind, quantity, occurred_at, note, invoice_number, customer_id)
            VALUES ($1, $2, $3, NOW(), $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(product_id)
        .bind(kind)
        .bind(quantity)
        .bind(&input.note)
        .bind(&input.invoice_number)
        .bind(customer_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get(movement_id).await
    }

    /// Get a movement by id, enriched with display names
    pub async fn get(&self, movement_id: Uuid) -> AppResult<Movement> {
        let row = sqlx::query_as::<_, MovementRow>(&format!(
            r#"
            SELECT {MOVEMENT_COLUMNS}
            FROM movements m
            JOIN products p ON p.id = m.product_id
            LEFT JOIN customers c ON c.id = m.customer_id
            WHERE m.id = $1
            "#,
        ))
        .bind(movement_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movimentação".to_string()))?;

        Ok(row.into())
    }

    /// List movements newest first, with product/kind/customer/date filters
    pub async fn list(
        &self,
        filter: MovementFilter,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<Movement>> {
        let (start, end) = date_bounds(&filter);

        let where_clause = r#"
            ($1::uuid IS NULL OR m.product_id = $1)
            AND ($2::movement_kind IS NULL OR m.kind = $2)
            AND ($3::uuid IS NULL OR m.customer_id = $3)
            AND ($4::timestamptz IS NULL OR m.occurred_at >= $4)
            AND ($5::timestamptz IS NULL OR m.occurred_at <= $5)
        "#;

        let total_items = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM movements m WHERE {where_clause}"
        ))
        .bind(filter.product_id)
        .bind(filter.kind)
        .bind(filter.customer_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, MovementRow>(&format!(
            r#"
            SELECT {MOVEMENT_COLUMNS}
            FROM movements m
            JOIN products p ON p.id = m.product_id
            LEFT JOIN customers c ON c.id = m.customer_id
            WHERE {where_clause}
            ORDER BY m.occurred_at DESC
            LIMIT $6 OFFSET $7
            "#,
        ))
        .bind(filter.product_id)
        .bind(filter.kind)
        .bind(filter.customer_id)
        .bind(start)
        .bind(end)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let items = rows.into_iter().map(Movement::from).collect();
        Ok(Paginated::new(
            items,
            total_items,
            pagination.page,
            pagination.per_page,
        ))
    }

    /// List every movement of one product, newest first, unpaginated
    pub async fn list_for_product(
        &self,
        product_id: Uuid,
        filter: MovementFilter,
    ) -> AppResult<Vec<Movement>> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Produto".to_string()));
        }

        let (start, end) = date_bounds(&filter);

        let rows = sqlx::query_as::<_, MovementRow>(&format!(
            r#"
            SELECT {MOVEMENT_COLUMNS}
            FROM movements m
            JOIN products p ON p.id = m.product_id
            LEFT JOIN customers c ON c.id = m.customer_id
            WHERE m.product_id = $1
              AND ($2::movement_kind IS NULL OR m.kind = $2)
              AND ($3::timestamptz IS NULL OR m.occurred_at >= $3)
              AND ($4::timestamptz IS NULL OR m.occurred_at <= $4)
            ORDER BY m.occurred_at DESC
            "#,
        ))
        .bind(product_id)
        .bind(filter.kind)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Movement::from).collect())
    }

    /// The newest movements across all products, enriched for the dashboard
    pub async fn recent(&self, limit: i64) -> AppResult<Vec<Movement>> {
        let rows = sqlx::query_as::<_, MovementRow>(&format!(
            r#"
            SELECT {MOVEMENT_COLUMNS}
            FROM movements m
            JOIN products p ON p.id = m.product_id
            LEFT JOIN customers c ON c.id = m.customer_id
            ORDER BY m.occurred_at DESC
            LIMIT $1
            "#,
        ))
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Movement::from).collect())
    }

    /// Delete a movement, reversing its stock delta under the same row lock
    pub async fn delete(&self, movement_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // Lock the movement row too: a concurrent delete of the same
        // movement blocks here and, once the first commit lands, sees the
        // row gone instead of reverting the delta a second time
        let movement = sqlx::query_as::<_, (Uuid, MovementKind, i32)>(
            "SELECT product_id, kind, quantity FROM movements WHERE id = $1 FOR UPDATE",
        )
        .bind(movement_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Movimentação".to_string()))?;

        let (product_id, kind, quantity) = movement;

        let current_stock = sqlx::query_scalar::<_, i32>(
            "SELECT current_stock FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;

        // Undoing an inbound can fail when the received quantity has
        // already been shipped out again; stock never goes negative
        let new_stock = revert_movement(current_stock, kind, quantity)?;

        sqlx::query("UPDATE products SET current_stock = $1, updated_at = NOW() WHERE id = $2")
            .bind(new_stock)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM movements WHERE id = $1")
            .bind(movement_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

/// Convert the date filters into inclusive timestamp bounds; the end date
/// covers the whole day
fn date_bounds(filter: &MovementFilter) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let start = filter
        .start_date
        .and_then(|d: NaiveDate| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc());
    let end = filter
        .end_date
        .and_then(|d: NaiveDate| d.and_hms_micro_opt(23, 59, 59, 999_999))
        .map(|dt| dt.and_utc());
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_bounds_cover_whole_days() {
        let filter = MovementFilter {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 10),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 12),
            ..Default::default()
        };

        let (start, end) = date_bounds(&filter);
        assert_eq!(start.unwrap().to_rfc3339(), "2024-03-10T00:00:00+00:00");
        // The end date is inclusive: the bound sits at the last microsecond
        assert_eq!(end.unwrap().to_rfc3339(), "2024-03-12T23:59:59.999999+00:00");
    }

    #[test]
    fn test_date_bounds_absent_filters() {
        let (start, end) = date_bounds(&MovementFilter::default());
        assert_eq!(start, None);
        assert_eq!(end, None);
    }
}
