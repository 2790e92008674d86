//! HTTP handlers for product catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::{MovementService, ProductService};
use crate::AppState;
use shared::models::{
    CreateProductRequest, Movement, MovementFilter, Product, ProductFilter, UpdateProductRequest,
};
use shared::types::{Paginated, PaginationParams};

/// Create a product; tax values are derived server-side
pub async fn create_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(body): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<Product>)> {
    body.validate()?;

    let service = ProductService::new(state.db);
    let product = service.create(body).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// List products with search, stock-status and supplier filters
pub async fn list_products(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<ProductFilter>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Product>>> {
    let service = ProductService::new(state.db);
    let page = service.list(filter, pagination.normalized()).await?;
    Ok(Json(page))
}

/// Get a product by id
pub async fn get_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.get(product_id).await?;
    Ok(Json(product))
}

/// Patch a product; omitted fields keep their stored values
pub async fn update_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(body): Json<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    body.validate()?;

    let service = ProductService::new(state.db);
    let product = service.update(product_id, body).await?;
    Ok(Json(product))
}

/// Delete a product, blocked while movements reference it
pub async fn delete_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = ProductService::new(state.db);
    service.delete(product_id).await?;
    Ok(Json(()))
}

/// List every movement of one product, newest first
pub async fn get_product_movements(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Query(filter): Query<MovementFilter>,
) -> AppResult<Json<Vec<Movement>>> {
    let service = MovementService::new(state.db);
    let movements = service.list_for_product(product_id, filter).await?;
    Ok(Json(movements))
}
