//! HTTP handlers for stock movement endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::MovementService;
use crate::AppState;
use shared::models::{CreateMovementRequest, Movement, MovementFilter};
use shared::types::{Paginated, PaginationParams};

/// Record a stock movement; the ledger operation
pub async fn create_movement(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(body): Json<CreateMovementRequest>,
) -> AppResult<(StatusCode, Json<Movement>)> {
    body.validate()?;

    let service = MovementService::new(state.db);
    let movement = service.create(body).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

/// List movements with product/kind/customer/date filters, newest first
pub async fn list_movements(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<MovementFilter>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Movement>>> {
    let service = MovementService::new(state.db);
    let page = service.list(filter, pagination.normalized()).await?;
    Ok(Json(page))
}

/// Get a movement by id
pub async fn get_movement(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(movement_id): Path<Uuid>,
) -> AppResult<Json<Movement>> {
    let service = MovementService::new(state.db);
    let movement = service.get(movement_id).await?;
    Ok(Json(movement))
}

/// Delete a movement, reversing its stock delta
pub async fn delete_movement(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(movement_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = MovementService::new(state.db);
    service.delete(movement_id).await?;
    Ok(Json(()))
}
