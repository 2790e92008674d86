//! Customer service

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{map_restrict_violation, map_unique_violation, AppError, AppResult};
use shared::models::{CreateCustomerRequest, Customer, UpdateCustomerRequest};
use shared::types::{Paginated, PaginationParams, PatchField};
use shared::validation::validate_cpf;

/// Customer service owning customer queries
#[derive(Clone)]
pub struct CustomerService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    cpf: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            cpf: row.cpf,
            email: row.email,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const CUSTOMER_COLUMNS: &str = "id, name, cpf, email, phone, address, created_at, updated_at";

const CUSTOMER_CONSTRAINTS: &[(&str, &str, &str)] = &[(
    "uq_customers_cpf",
    "cpf",
    "Erro: CPF de cliente já existe. Por favor, use um CPF único.",
)];

const CUSTOMER_DELETE_BLOCKED_PT: &str =
    "Não é possível excluir o cliente. Existem movimentações de saída vinculadas a ele.";

impl CustomerService {
    /// Create a new CustomerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a customer
    pub async fn create(&self, input: CreateCustomerRequest) -> AppResult<Customer> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r#"
            INSERT INTO customers (name, cpf, email, phone, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CUSTOMER_COLUMNS}
            "#,
        ))
        .bind(input.name.unwrap_or_default())
        .bind(&input.cpf)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, CUSTOMER_CONSTRAINTS))?;

        Ok(row.into())
    }

    /// Get a customer by id
    pub async fn get(&self, customer_id: Uuid) -> AppResult<Customer> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1",
        ))
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Cliente".to_string()))?;

        Ok(row.into())
    }

    /// List customers, searchable over name and CPF
    pub async fn list(
        &self,
        search: Option<String>,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<Customer>> {
        let where_clause =
            "($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR cpf ILIKE '%' || $1 || '%')";

        let total_items = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM customers WHERE {where_clause}"
        ))
        .bind(&search)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            r#"
            SELECT {CUSTOMER_COLUMNS} FROM customers
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

        let items = rows.into_iter().map(Customer::from).collect();
        Ok(Paginated::new(
            items,
            total_items,
            pagination.page,
            pagination.per_page,
        ))
    }

    /// Patch a customer
    pub async fn update(
        &self,
        customer_id: Uuid,
        input: UpdateCustomerRequest,
    ) -> AppResult<Customer> {
        let current = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1",
        ))
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Cliente".to_string()))?;

        if let PatchField::Set(ref cpf) = input.cpf {
            validate_cpf(cpf).map_err(|_| AppError::Validation {
                field: "cpf".to_string(),
                message: "Invalid CPF".to_string(),
                message_pt: "CPF inválido.".to_string(),
            })?;
        }

        let name = input.name.unwrap_or(current.name);
        let cpf = input.cpf.resolve(current.cpf);
        let email = input.email.resolve(current.email);
        let phone = input.phone.resolve(current.phone);
        let address = input.address.resolve(current.address);

        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r#"
            UPDATE customers
            SET name = $1, cpf = $2, email = $3, phone = $4, address = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING {CUSTOMER_COLUMNS}
            "#,
        ))
        .bind(&name)
        .bind(&cpf)
        .bind(&email)
        .bind(&phone)
        .bind(&address)
        .bind(customer_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, CUSTOMER_CONSTRAINTS))?;

        Ok(row.into())
    }

    /// Delete a customer, blocked while any movement references it
    pub async fn delete(&self, customer_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)",
        )
        .bind(customer_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Cliente".to_string()));
        }

        let has_movements = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM movements WHERE customer_id = $1)",
        )
        .bind(customer_id)
        .fetch_one(&self.db)
        .await?;

        if has_movements {
            return Err(AppError::DependencyExists {
                resource: "customer".to_string(),
                dependent: "movement".to_string(),
                message_pt: CUSTOMER_DELETE_BLOCKED_PT.to_string(),
            });
        }

        // A movement recorded after the pre-check trips the FK RESTRICT;
        // keep that outcome in the same error category
        sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(customer_id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                map_restrict_violation(e, "customer", "movement", CUSTOMER_DELETE_BLOCKED_PT)
            })?;

        Ok(())
    }
}
