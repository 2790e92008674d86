//! Product catalog service
//!
//! Owns all product SQL, including the derived tax-value recomputation on
//! create and update. The stock counter is only written here at creation
//! time (opening balance); afterwards it belongs to the movement ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{map_restrict_violation, map_unique_violation, AppError, AppResult};
use shared::models::{CreateProductRequest, Product, ProductFilter, UpdateProductRequest};
use shared::tax::calculate_tax_value;
use shared::types::{Paginated, PaginationParams, PatchField, StockStatus};

/// Product service owning the catalog queries
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Product row as persisted, plus the supplier display name join
#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    code: String,
    name: String,
    description: Option<String>,
    unit: String,
    current_stock: i32,
    min_stock: i32,
    location: Option<String>,
    purchase_price: Decimal,
    sale_price: Decimal,
    ncm: Option<String>,
    cst_csosn: Option<String>,
    cfop: Option<String>,
    origin: Option<String>,
    icms_aliquota: Option<Decimal>,
    icms_valor: Decimal,
    ipi_aliquota: Option<Decimal>,
    ipi_valor: Decimal,
    pis_aliquota: Option<Decimal>,
    pis_valor: Decimal,
    cofins_aliquota: Option<Decimal>,
    cofins_valor: Decimal,
    invoice_notes: Option<String>,
    supplier_id: Option<Uuid>,
    supplier_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let stock_status = StockStatus::classify(row.current_stock, row.min_stock);
        Self {
            id: row.id,
            code: row.code,
            name: row.name,
            description: row.description,
            unit: row.unit,
            current_stock: row.current_stock,
            min_stock: row.min_stock,
            stock_status,
            location: row.location,
            purchase_price: row.purchase_price,
            sale_price: row.sale_price,
            ncm: row.ncm,
            cst_csosn: row.cst_csosn,
            cfop: row.cfop,
            origin: row.origin,
            icms_aliquota: row.icms_aliquota,
            icms_valor: row.icms_valor,
            ipi_aliquota: row.ipi_aliquota,
            ipi_valor: row.ipi_valor,
            pis_aliquota: row.pis_aliquota,
            pis_valor: row.pis_valor,
            cofins_aliquota: row.cofins_aliquota,
            cofins_valor: row.cofins_valor,
            invoice_notes: row.invoice_notes,
            supplier_id: row.supplier_id,
            supplier_name: row.supplier_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Shared SELECT column list for product reads
const PRODUCT_COLUMNS: &str = r#"
    p.id, p.code, p.name, p.description, p.unit, p.current_stock, p.min_stock,
    p.location, p.purchase_price, p.sale_price, p.ncm, p.cst_csosn, p.cfop,
    p.origin, p.icms_aliquota, p.icms_valor, p.ipi_aliquota, p.ipi_valor,
    p.pis_aliquota, p.pis_valor, p.cofins_aliquota, p.cofins_valor,
    p.invoice_notes, p.supplier_id, s.name AS supplier_name,
    p.created_at, p.updated_at
"#;

/// Code uniqueness constraint mapping
const PRODUCT_CONSTRAINTS: &[(&str, &str, &str)] = &[(
    "uq_products_code",
    "code",
    "Erro: Código de produto já existente. Por favor, use um código único.",
)];

const PRODUCT_DELETE_BLOCKED_PT: &str =
    "Não é possível excluir o produto. Existem movimentações vinculadas a ele.";

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product, deriving all four tax values from the sale price
    pub async fn create(&self, input: CreateProductRequest) -> AppResult<Product> {
        // Required fields guaranteed by the validated payload
        let sale_price = input.sale_price.unwrap_or(Decimal::ZERO);

        let supplier_id = match input.supplier_id {
            Some(id) => {
                self.ensure_supplier_exists(id).await?;
                Some(id)
            }
            None => None,
        };

        let icms_valor = calculate_tax_value(Some(sale_price), input.icms_aliquota);
        let ipi_valor = calculate_tax_value(Some(sale_price), input.ipi_aliquota);
        let pis_valor = calculate_tax_value(Some(sale_price), input.pis_aliquota);
        let cofins_valor = calculate_tax_value(Some(sale_price), input.cofins_aliquota);

        let product_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO products (
                code, name, description, unit, current_stock, min_stock, location,
                purchase_price, sale_price, ncm, cst_csosn, cfop, origin,
                icms_aliquota, icms_valor, ipi_aliquota, ipi_valor,
                pis_aliquota, pis_valor, cofins_aliquota, cofins_valor,
                invoice_notes, supplier_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)
            RETURNING id
            "#,
        )
        .bind(input.code.unwrap_or_default())
        .bind(input.name.unwrap_or_default())
        .bind(&input.description)
        .bind(input.unit.unwrap_or_default())
        .bind(input.current_stock.unwrap_or(0).max(0))
        .bind(input.min_stock.unwrap_or(0).max(0))
        .bind(&input.location)
        .bind(input.purchase_price.unwrap_or(Decimal::ZERO))
        .bind(sale_price)
        .bind(&input.ncm)
        .bind(&input.cst_csosn)
        .bind(&input.cfop)
        .bind(&input.origin)
        .bind(input.icms_aliquota)
        .bind(icms_valor)
        .bind(input.ipi_aliquota)
        .bind(ipi_valor)
        .bind(input.pis_aliquota)
        .bind(pis_valor)
        .bind(input.cofins_aliquota)
        .bind(cofins_valor)
        .bind(&input.invoice_notes)
        .bind(supplier_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, PRODUCT_CONSTRAINTS))?;

        self.get(product_id).await
    }

    /// Get a product by id
    pub async fn get(&self, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            WHERE p.id = $1
            "#,
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Produto".to_string()))?;

        Ok(row.into())
    }

    /// List products with search, stock-status, unit and supplier filters
    pub async fn list(
        &self,
        filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<Product>> {
        // Validate the status filter up front instead of silently matching nothing
        let stock_status = match filter.stock_status.as_deref() {
            None => None,
            Some(value) => Some(
                StockStatus::parse(value)
                    .ok_or_else(|| {
                        AppError::ValidationError(
                            "stock_status must be 'low', 'out' or 'available'".to_string(),
                        )
                    })?
                    .as_str(),
            ),
        };

        let where_clause = r#"
            ($1::text IS NULL OR p.name ILIKE '%' || $1 || '%' OR p.code ILIKE '%' || $1 || '%')
            AND ($2::text IS NULL
                 OR ($2 = 'low' AND p.current_stock <= p.min_stock)
                 OR ($2 = 'out' AND p.current_stock = 0)
                 OR ($2 = 'available' AND p.current_stock > p.min_stock AND p.current_stock > 0))
            AND ($3::text IS NULL OR p.unit ILIKE '%' || $3 || '%')
            AND ($4::uuid IS NULL OR p.supplier_id = $4)
        "#;

        let total_items = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM products p WHERE {where_clause}"
        ))
        .bind(&filter.search)
        .bind(stock_status)
        .bind(&filter.unit)
        .bind(filter.supplier_id)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            WHERE {where_clause}
            ORDER BY p.name
            LIMIT $5 OFFSET $6
            "#,
        ))
        .bind(&filter.search)
        .bind(stock_status)
        .bind(&filter.unit)
        .bind(filter.supplier_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let items = rows.into_iter().map(Product::from).collect();
        Ok(Paginated::new(
            items,
            total_items,
            pagination.page,
            pagination.per_page,
        ))
    }

    /// Patch a product, recomputing every tax value whenever the sale price
    /// or any rate may have changed
    pub async fn update(
        &self,
        product_id: Uuid,
        input: UpdateProductRequest,
    ) -> AppResult<Product> {
        let current = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            WHERE p.id = $1
            "#,
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Produto".to_string()))?;

        let supplier_id = match input.supplier_id {
            PatchField::Keep => current.supplier_id,
            PatchField::Clear => None,
            PatchField::Set(id) => {
                self.ensure_supplier_exists(id).await?;
                Some(id)
            }
        };

        let name = input.name.unwrap_or(current.name);
        let code = input.code.unwrap_or(current.code);
        let unit = input.unit.unwrap_or(current.unit);
        let min_stock = input.min_stock.unwrap_or(current.min_stock).max(0);
        let description = input.description.resolve(current.description);
        let location = input.location.resolve(current.location);
        let purchase_price = input.purchase_price.unwrap_or(current.purchase_price);
        let sale_price = input.sale_price.unwrap_or(current.sale_price);
        let ncm = input.ncm.resolve(current.ncm);
        let cst_csosn = input.cst_csosn.resolve(current.cst_csosn);
        let cfop = input.cfop.resolve(current.cfop);
        let origin = input.origin.resolve(current.origin);
        let invoice_notes = input.invoice_notes.resolve(current.invoice_notes);

        let icms_aliquota = input.icms_aliquota.resolve(current.icms_aliquota);
        let ipi_aliquota = input.ipi_aliquota.resolve(current.ipi_aliquota);
        let pis_aliquota = input.pis_aliquota.resolve(current.pis_aliquota);
        let cofins_aliquota = input.cofins_aliquota.resolve(current.cofins_aliquota);

        // Untouched rates are recomputed against the possibly new price too
        let icms_valor = calculate_tax_value(Some(sale_price), icms_aliquota);
        let ipi_valor = calculate_tax_value(Some(sale_price), ipi_aliquota);
        let pis_valor = calculate_tax_value(Some(sale_price), pis_aliquota);
        let cofins_valor = calculate_tax_value(Some(sale_price), cofins_aliquota);

        sqlx::query(
            r#"
            UPDATE products SET
                code = $1, name = $2, description = $3, unit = $4, min_stock = $5,
                location = $6, purchase_price = $7, sale_price = $8,
                ncm = $9, cst_csosn = $10, cfop = $11, origin = $12,
                icms_aliquota = $13, icms_valor = $14,
                ipi_aliquota = $15, ipi_valor = $16,
                pis_aliquota = $17, pis_valor = $18,
                cofins_aliquota = $19, cofins_valor = $20,
                invoice_notes = $21, supplier_id = $22, updated_at = NOW()
            WHERE id = $23
            "#,
        )
        .bind(&code)
        .bind(&name)
        .bind(&description)
        .bind(&unit)
        .bind(min_stock)
        .bind(&location)
        .bind(purchase_price)
        .bind(sale_price)
        .bind(&ncm)
        .bind(&cst_csosn)
        .bind(&cfop)
        .bind(&origin)
        .bind(icms_aliquota)
        .bind(icms_valor)
        .bind(ipi_aliquota)
        .bind(ipi_valor)
        .bind(pis_aliquota)
        .bind(pis_valor)
        .bind(cofins_aliquota)
        .bind(cofins_valor)
        .bind(&invoice_notes)
        .bind(supplier_id)
        .bind(product_id)
        .execute(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, PRODUCT_CONSTRAINTS))?;

        self.get(product_id).await
    }

    /// Delete a product, blocked while any movement references it
    pub async fn delete(&self, product_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Produto".to_string()));
        }

        let has_movements = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM movements WHERE product_id = $1)",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if has_movements {
            return Err(AppError::DependencyExists {
                resource: "product".to_string(),
                dependent: "movement".to_string(),
                message_pt: PRODUCT_DELETE_BLOCKED_PT.to_string(),
            });
        }

        // A movement recorded after the pre-check trips the FK RESTRICT;
        // keep that outcome in the same error category
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                map_restrict_violation(e, "product", "movement", PRODUCT_DELETE_BLOCKED_PT)
            })?;

        Ok(())
    }

    /// Products at or below their minimum, or out of stock, ordered by name
    pub async fn critical_stock(&self, mode: shared::types::ReportMode) -> AppResult<Vec<Product>> {
        let condition = match mode {
            shared::types::ReportMode::Low => "p.current_stock <= p.min_stock",
            shared::types::ReportMode::Out => "p.current_stock = 0",
        };

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            WHERE {condition}
            ORDER BY p.name
            "#,
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn ensure_supplier_exists(&self, supplier_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1)",
        )
        .bind(supplier_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::UnknownSupplier);
        }
        Ok(())
    }
}
