//! Business logic services for the Estoque Inventory Platform

pub mod auth;
pub mod customer;
pub mod movement;
pub mod product;
pub mod report;
pub mod supplier;

pub use auth::AuthService;
pub use customer::CustomerService;
pub use movement::MovementService;
pub use product::ProductService;
pub use report::ReportService;
pub use supplier::SupplierService;
