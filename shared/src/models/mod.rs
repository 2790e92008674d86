//! Domain models for the Estoque inventory platform

mod customer;
mod movement;
mod product;
mod report;
mod supplier;
mod user;

pub use customer::*;
pub use movement::*;
pub use product::*;
pub use report::*;
pub use supplier::*;
pub use user::*;
