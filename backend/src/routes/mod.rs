//! Route definitions for the Estoque Inventory Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public + protected probe)
        .nest("/auth", auth_routes(state.clone()))
        // Protected routes - product catalog
        .nest("/products", product_routes(state.clone()))
        // Protected routes - stock movements
        .nest("/movements", movement_routes(state.clone()))
        // Protected routes - suppliers
        .nest("/suppliers", supplier_routes(state.clone()))
        // Protected routes - customers
        .nest("/customers", customer_routes(state.clone()))
        // Protected routes - reports and dashboard
        .nest("/reports", report_routes(state.clone()))
        .nest("/dashboard", dashboard_routes(state))
}

/// Authentication routes
fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .merge(
            Router::new()
                .route("/me", get(handlers::me))
                .route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}

/// Product management routes (protected)
fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/:product_id/movements", get(handlers::get_product_movements))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Stock movement routes (protected); movements are append-only, no update
fn movement_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_movements).post(handlers::create_movement))
        .route(
            "/:movement_id",
            get(handlers::get_movement).delete(handlers::delete_movement),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Supplier management routes (protected)
fn supplier_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_suppliers).post(handlers::create_supplier))
        .route(
            "/:supplier_id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Customer management routes (protected)
fn customer_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_customers).post(handlers::create_customer))
        .route(
            "/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Reporting routes (protected)
fn report_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/critical-stock", get(handlers::critical_stock_report))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Dashboard routes (protected)
fn dashboard_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/summary", get(handlers::dashboard_summary))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
