//! HTTP handlers for customer endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::suppliers::SearchQuery;
use crate::middleware::CurrentUser;
use crate::services::CustomerService;
use crate::AppState;
use shared::models::{CreateCustomerRequest, Customer, UpdateCustomerRequest};
use shared::types::{Paginated, PaginationParams};

/// Create a customer
pub async fn create_customer(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(body): Json<CreateCustomerRequest>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    body.validate()?;

    let service = CustomerService::new(state.db);
    let customer = service.create(body).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// List customers, searchable over name and CPF
pub async fn list_customers(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<SearchQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Customer>>> {
    let service = CustomerService::new(state.db);
    let page = service.list(query.search, pagination.normalized()).await?;
    Ok(Json(page))
}

/// Get a customer by id
pub async fn get_customer(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.db);
    let customer = service.get(customer_id).await?;
    Ok(Json(customer))
}

/// Patch a customer
pub async fn update_customer(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
    Json(body): Json<UpdateCustomerRequest>,
) -> AppResult<Json<Customer>> {
    body.validate()?;

    let service = CustomerService::new(state.db);
    let customer = service.update(customer_id, body).await?;
    Ok(Json(customer))
}

/// Delete a customer, blocked while movements reference it
pub async fn delete_customer(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = CustomerService::new(state.db);
    service.delete(customer_id).await?;
    Ok(Json(()))
}
