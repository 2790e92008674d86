//! Reporting service for the critical-stock view and the dashboard summary

use sqlx::PgPool;

use crate::error::AppResult;
use crate::services::{MovementService, ProductService};
use shared::models::{DashboardSummary, Product};
use shared::types::ReportMode;

/// Number of recent movements shown on the dashboard
const RECENT_MOVEMENTS: i64 = 5;

/// Report service aggregating across products and movements
#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
}

impl ReportService {
    /// Create a new ReportService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Critical-stock view: `low` (stock at or below minimum) or `out`
    pub async fn critical_stock(&self, mode: ReportMode) -> AppResult<Vec<Product>> {
        ProductService::new(self.db.clone()).critical_stock(mode).await
    }

    /// Whole-inventory summary for the dashboard
    pub async fn dashboard_summary(&self) -> AppResult<DashboardSummary> {
        let (total_products, low_stock_count, out_of_stock_count) =
            sqlx::query_as::<_, (i64, i64, i64)>(
                r#"
                SELECT COUNT(*),
                       COUNT(*) FILTER (WHERE current_stock <= min_stock),
                       COUNT(*) FILTER (WHERE current_stock = 0)
                FROM products
                "#,
            )
            .fetch_one(&self.db)
            .await?;

        let (total_inbound, total_outbound) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COALESCE(SUM(quantity) FILTER (WHERE kind = 'inbound'), 0),
                   COALESCE(SUM(quantity) FILTER (WHERE kind = 'outbound'), 0)
            FROM movements
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let recent_movements = MovementService::new(self.db.clone())
            .recent(RECENT_MOVEMENTS)
            .await?;

        Ok(DashboardSummary {
            total_products,
            low_stock_count,
            out_of_stock_count,
            recent_movements,
            total_inbound,
            total_outbound,
        })
    }
}
