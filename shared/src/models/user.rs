//! User account models
//!
//! Users exist for authentication only; they carry no business data.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Public view of a user account, never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// Payload for registering a user
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(required(message = "nome de usuário é obrigatório"), length(min = 1, message = "nome de usuário é obrigatório"))]
    pub username: Option<String>,
    #[validate(required(message = "email é obrigatório"), email(message = "email inválido"))]
    pub email: Option<String>,
    #[validate(required(message = "senha é obrigatória"), length(min = 8, message = "senha deve ter pelo menos 8 caracteres"))]
    pub password: Option<String>,
}

/// Payload for logging in
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "email é obrigatório"))]
    pub email: Option<String>,
    #[validate(required(message = "senha é obrigatória"))]
    pub password: Option<String>,
}

/// Response for a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub username: String,
}
