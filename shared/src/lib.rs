//! Shared types and domain rules for the Estoque inventory platform
//!
//! This crate contains everything the backend exposes over the wire plus the
//! pure domain rules behind it: transport models, the tax-value calculator,
//! the stock ledger arithmetic, and validation helpers. It performs no I/O.

pub mod models;
pub mod stock;
pub mod tax;
pub mod types;
pub mod validation;

pub use models::*;
pub use stock::*;
pub use tax::*;
pub use types::*;
pub use validation::*;
