//! HTTP handlers for the Estoque Inventory Platform

pub mod auth;
pub mod customers;
pub mod health;
pub mod movements;
pub mod products;
pub mod reports;
pub mod suppliers;

pub use auth::{login, me, register};
pub use customers::{
    create_customer, delete_customer, get_customer, list_customers, update_customer,
};
pub use health::health_check;
pub use movements::{create_movement, delete_movement, get_movement, list_movements};
pub use products::{
    create_product, delete_product, get_product, get_product_movements, list_products,
    update_product,
};
pub use reports::{critical_stock_report, dashboard_summary};
pub use suppliers::{
    create_supplier, delete_supplier, get_supplier, list_suppliers, update_supplier,
};
