//! Request middleware for the Estoque Inventory Platform

pub mod auth;

pub use auth::{auth_middleware, AuthUser, Claims, CurrentUser};
