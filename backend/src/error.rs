//! Error handling for the Estoque Inventory Platform
//!
//! Provides consistent error responses in English and Portuguese

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
        message_pt: String,
    },

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_pt: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {message}")]
    Conflict {
        resource: String,
        message: String,
        message_pt: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Ledger errors
    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i32, requested: i32 },

    #[error("Invalid movement quantity")]
    InvalidQuantity,

    // Reference resolution errors
    #[error("Unknown customer")]
    UnknownCustomer,

    #[error("Unknown supplier")]
    UnknownSupplier,

    // Referential integrity
    #[error("Cannot delete {resource}: dependent {dependent} records exist")]
    DependencyExists {
        resource: String,
        dependent: String,
        message_pt: String,
    },

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_pt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message_en: "Invalid email or password".to_string(),
                    message_pt: "Credenciais inválidas.".to_string(),
                    field: None,
                },
            ),
            AppError::Unauthorized { message, message_pt } => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "UNAUTHORIZED".to_string(),
                    message_en: message.clone(),
                    message_pt: message_pt.clone(),
                    field: None,
                },
            ),
            AppError::Validation { field, message, message_pt } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_pt: message_pt.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_pt: format!("Dados inválidos: {}", msg),
                    field: None,
                },
            ),
            AppError::Conflict { resource, message, message_pt } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "CONFLICT".to_string(),
                    message_en: message.clone(),
                    message_pt: message_pt.clone(),
                    field: Some(resource.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_pt: format!("{} não encontrado.", resource),
                    field: None,
                },
            ),
            AppError::InsufficientStock { available, requested } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INSUFFICIENT_STOCK".to_string(),
                    message_en: format!(
                        "Insufficient stock: {} available, {} requested",
                        available, requested
                    ),
                    message_pt: "Estoque insuficiente para esta saída.".to_string(),
                    field: None,
                },
            ),
            AppError::InvalidQuantity => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_QUANTITY".to_string(),
                    message_en: "Quantity must be greater than zero".to_string(),
                    message_pt: "Quantidade deve ser maior que zero.".to_string(),
                    field: Some("quantity".to_string()),
                },
            ),
            AppError::UnknownCustomer => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "UNKNOWN_CUSTOMER".to_string(),
                    message_en: "No customer exists with the given id".to_string(),
                    message_pt: "Cliente não encontrado com o ID fornecido.".to_string(),
                    field: Some("customer_id".to_string()),
                },
            ),
            AppError::UnknownSupplier => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "UNKNOWN_SUPPLIER".to_string(),
                    message_en: "No supplier exists with the given id".to_string(),
                    message_pt: "Fornecedor não encontrado com o ID fornecido.".to_string(),
                    field: Some("supplier_id".to_string()),
                },
            ),
            AppError::DependencyExists { resource, dependent, message_pt } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DEPENDENCY_EXISTS".to_string(),
                    message_en: format!(
                        "Cannot delete {}: dependent {} records exist",
                        resource, dependent
                    ),
                    message_pt: message_pt.clone(),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_pt: "Erro no banco de dados.".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_pt: "Erro interno do servidor.".to_string(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_pt: "Erro interno do servidor.".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request failed: {:?}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

impl From<shared::stock::StockError> for AppError {
    fn from(err: shared::stock::StockError) -> Self {
        match err {
            shared::stock::StockError::InvalidQuantity => AppError::InvalidQuantity,
            shared::stock::StockError::InsufficientStock { available, requested } => {
                AppError::InsufficientStock { available, requested }
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Report the full missing/invalid field set in one message
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "invalid value".to_string());
                format!("{}: {}", field, detail)
            })
            .collect();
        fields.sort();
        AppError::ValidationError(fields.join("; "))
    }
}

/// Classify a unique-constraint violation by constraint name, falling back
/// to the generic database error for anything else.
pub fn map_unique_violation(err: sqlx::Error, constraints: &[(&str, &str, &str)]) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            if let Some(constraint) = db_err.constraint() {
                for (name, resource, message_pt) in constraints {
                    if constraint == *name {
                        return AppError::Conflict {
                            resource: resource.to_string(),
                            message: format!("A record with this {} already exists", resource),
                            message_pt: message_pt.to_string(),
                        };
                    }
                }
            }
        }
    }
    AppError::DatabaseError(err)
}

/// Classify a foreign-key RESTRICT violation raised by a DELETE, falling
/// back to the generic database error for anything else. Backstops the
/// dependency pre-checks when a dependent row lands in between.
pub fn map_restrict_violation(
    err: sqlx::Error,
    resource: &str,
    dependent: &str,
    message_pt: &str,
) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23503") {
            return AppError::DependencyExists {
                resource: resource.to_string(),
                dependent: dependent.to_string(),
                message_pt: message_pt.to_string(),
            };
        }
    }
    AppError::DatabaseError(err)
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases: Vec<(AppError, StatusCode)> = vec![
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                AppError::Unauthorized {
                    message: "Missing or invalid Authorization header".into(),
                    message_pt: "Não autorizado.".into(),
                },
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::ValidationError("name: nome é obrigatório".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::NotFound("Produto".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Conflict {
                    resource: "code".into(),
                    message: "A record with this code already exists".into(),
                    message_pt: "Código já existente.".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                AppError::InsufficientStock {
                    available: 2,
                    requested: 3,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::InvalidQuantity, StatusCode::BAD_REQUEST),
            (AppError::UnknownCustomer, StatusCode::BAD_REQUEST),
            (AppError::UnknownSupplier, StatusCode::BAD_REQUEST),
            (
                AppError::DependencyExists {
                    resource: "supplier".into(),
                    dependent: "product".into(),
                    message_pt: "Existem produtos vinculados.".into(),
                },
                StatusCode::CONFLICT,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_stock_error_conversion() {
        let err: AppError = shared::stock::StockError::InsufficientStock {
            available: 1,
            requested: 4,
        }
        .into();
        assert!(matches!(
            err,
            AppError::InsufficientStock {
                available: 1,
                requested: 4
            }
        ));

        let err: AppError = shared::stock::StockError::InvalidQuantity.into();
        assert!(matches!(err, AppError::InvalidQuantity));
    }

    #[test]
    fn test_unique_violation_fallback() {
        // Anything but a named 23505 stays a generic database error
        let err = map_unique_violation(
            sqlx::Error::RowNotFound,
            &[("uq_products_code", "code", "Código já existente.")],
        );
        assert!(matches!(err, AppError::DatabaseError(_)));
    }

    #[test]
    fn test_restrict_violation_fallback() {
        // Anything but a 23503 stays a generic database error
        let err = map_restrict_violation(
            sqlx::Error::RowNotFound,
            "product",
            "movement",
            "Existem movimentações vinculadas.",
        );
        assert!(matches!(err, AppError::DatabaseError(_)));
    }
}
