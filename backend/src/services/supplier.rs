//! Supplier service

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{map_restrict_violation, map_unique_violation, AppError, AppResult};
use shared::models::{CreateSupplierRequest, Supplier, UpdateSupplierRequest};
use shared::types::{Paginated, PaginationParams, PatchField};
use shared::validation::validate_cnpj;

/// Supplier service owning supplier queries
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct SupplierRow {
    id: Uuid,
    name: String,
    cnpj: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            cnpj: row.cnpj,
            email: row.email,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SUPPLIER_COLUMNS: &str = "id, name, cnpj, email, phone, address, created_at, updated_at";

const SUPPLIER_CONSTRAINTS: &[(&str, &str, &str)] = &[
    (
        "uq_suppliers_name",
        "name",
        "Erro: Nome de fornecedor já existe. Por favor, use um nome único.",
    ),
    (
        "uq_suppliers_cnpj",
        "cnpj",
        "Erro: CNPJ de fornecedor já existe. Por favor, use um CNPJ único.",
    ),
];

const SUPPLIER_DELETE_BLOCKED_PT: &str =
    "Não é possível excluir o fornecedor. Existem produtos vinculados a ele.";

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a supplier
    pub async fn create(&self, input: CreateSupplierRequest) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            r#"
            INSERT INTO suppliers (name, cnpj, email, phone, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SUPPLIER_COLUMNS}
            "#,
        ))
        .bind(input.name.unwrap_or_default())
        .bind(&input.cnpj)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, SUPPLIER_CONSTRAINTS))?;

        Ok(row.into())
    }

    /// Get a supplier by id
    pub async fn get(&self, supplier_id: Uuid) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = $1",
        ))
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Fornecedor".to_string()))?;

        Ok(row.into())
    }

    /// List suppliers, searchable over name and CNPJ
    pub async fn list(
        &self,
        search: Option<String>,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<Supplier>> {
        let where_clause =
            "($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR cnpj ILIKE '%' || $1 || '%')";

        let total_items = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM suppliers WHERE {where_clause}"
        ))
        .bind(&search)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, SupplierRow>(&format!(
            r#"
            SELECT {SUPPLIER_COLUMNS} FROM suppliers
            WHERE {where_clause}
            ORDER BY name
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(&search)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let items = rows.into_iter().map(Supplier::from).collect();
        Ok(Paginated::new(
            items,
            total_items,
            pagination.page,
            pagination.per_page,
        ))
    }

    /// Patch a supplier
    pub async fn update(
        &self,
        supplier_id: Uuid,
        input: UpdateSupplierRequest,
    ) -> AppResult<Supplier> {
        let current = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = $1",
        ))
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Fornecedor".to_string()))?;

        // Patch fields arrive via the tri-state path, so the checksum has
        // to run here rather than in the derive
        if let PatchField::Set(ref cnpj) = input.cnpj {
            validate_cnpj(cnpj).map_err(|_| AppError::Validation {
                field: "cnpj".to_string(),
                message: "Invalid CNPJ".to_string(),
                message_pt: "CNPJ inválido.".to_string(),
            })?;
        }

        let name = input.name.unwrap_or(current.name);
        let cnpj = input.cnpj.resolve(current.cnpj);
        let email = input.email.resolve(current.email);
        let phone = input.phone.resolve(current.phone);
        let address = input.address.resolve(current.address);

        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            r#"
            UPDATE suppliers
            SET name = $1, cnpj = $2, email = $3, phone = $4, address = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING {SUPPLIER_COLUMNS}
            "#,
        ))
        .bind(&name)
        .bind(&cnpj)
        .bind(&email)
        .bind(&phone)
        .bind(&address)
        .bind(supplier_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, SUPPLIER_CONSTRAINTS))?;

        Ok(row.into())
    }

    /// Delete a supplier, blocked while any product references it
    pub async fn delete(&self, supplier_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1)",
        )
        .bind(supplier_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Fornecedor".to_string()));
        }

        let has_products = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE supplier_id = $1)",
        )
        .bind(supplier_id)
        .fetch_one(&self.db)
        .await?;

        if has_products {
            return Err(AppError::DependencyExists {
                resource: "supplier".to_string(),
                dependent: "product".to_string(),
                message_pt: SUPPLIER_DELETE_BLOCKED_PT.to_string(),
            });
        }

        // A product linked after the pre-check trips the FK RESTRICT;
        // keep that outcome in the same error category
        sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(supplier_id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                map_restrict_violation(e, "supplier", "product", SUPPLIER_DELETE_BLOCKED_PT)
            })?;

        Ok(())
    }
}
