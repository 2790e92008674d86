//! Supplier models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::PatchField;

/// A product supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub cnpj: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a supplier
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplierRequest {
    #[validate(required(message = "nome é obrigatório"), length(min = 1, message = "nome é obrigatório"))]
    pub name: Option<String>,
    #[validate(custom = "crate::validation::validate_cnpj")]
    pub cnpj: Option<String>,
    #[validate(email(message = "email inválido"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Patch payload for updating a supplier
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSupplierRequest {
    #[validate(length(min = 1, message = "nome não pode ser vazio"))]
    pub name: Option<String>,
    #[serde(default)]
    pub cnpj: PatchField<String>,
    #[serde(default)]
    pub email: PatchField<String>,
    #[serde(default)]
    pub phone: PatchField<String>,
    #[serde(default)]
    pub address: PatchField<String>,
}
