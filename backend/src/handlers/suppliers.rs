//! HTTP handlers for supplier endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::SupplierService;
use crate::AppState;
use shared::models::{CreateSupplierRequest, Supplier, UpdateSupplierRequest};
use shared::types::{Paginated, PaginationParams};

/// Search parameter for supplier/customer listings
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// Create a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(body): Json<CreateSupplierRequest>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    body.validate()?;

    let service = SupplierService::new(state.db);
    let supplier = service.create(body).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// List suppliers, searchable over name and CNPJ
pub async fn list_suppliers(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<SearchQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Supplier>>> {
    let service = SupplierService::new(state.db);
    let page = service.list(query.search, pagination.normalized()).await?;
    Ok(Json(page))
}

/// Get a supplier by id
pub async fn get_supplier(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service.get(supplier_id).await?;
    Ok(Json(supplier))
}

/// Patch a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
    Json(body): Json<UpdateSupplierRequest>,
) -> AppResult<Json<Supplier>> {
    body.validate()?;

    let service = SupplierService::new(state.db);
    let supplier = service.update(supplier_id, body).await?;
    Ok(Json(supplier))
}

/// Delete a supplier, blocked while products reference it
pub async fn delete_supplier(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = SupplierService::new(state.db);
    service.delete(supplier_id).await?;
    Ok(Json(()))
}
