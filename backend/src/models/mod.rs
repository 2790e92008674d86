//! Database models for the Estoque Inventory Platform
//!
//! Re-exports transport models from the shared crate and adds the
//! backend-only persistence rows that never leave the server.

pub use shared::models::*;

use uuid::Uuid;

/// User account row, carries the password hash and stays server-side
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl From<UserRow> for shared::models::User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
        }
    }
}
