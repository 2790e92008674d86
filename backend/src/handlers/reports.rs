//! HTTP handlers for reporting endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::ReportService;
use crate::AppState;
use shared::models::{CriticalStockQuery, DashboardSummary, Product};

/// Products at or below their minimum stock, or out of stock entirely
pub async fn critical_stock_report(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<CriticalStockQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let mode = query.mode().ok_or_else(|| {
        AppError::ValidationError("mode must be 'low' or 'out'".to_string())
    })?;

    let service = ReportService::new(state.db);
    let products = service.critical_stock(mode).await?;
    Ok(Json(products))
}

/// Whole-inventory summary for the dashboard
pub async fn dashboard_summary(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<DashboardSummary>> {
    let service = ReportService::new(state.db);
    let summary = service.dashboard_summary().await?;
    Ok(Json(summary))
}
