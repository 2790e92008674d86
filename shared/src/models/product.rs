//! Product models
//!
//! A product carries its stock counters and the Brazilian tax lines
//! (ICMS, IPI, PIS, COFINS). The `*_valor` fields are derived from the
//! sale price and the corresponding rate; they are never client-supplied.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::tax;
use crate::types::{PatchField, StockStatus};

/// A catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub unit: String,
    pub current_stock: i32,
    pub min_stock: i32,
    /// Derived from `current_stock` and `min_stock`, zero stock wins
    pub stock_status: StockStatus,
    pub location: Option<String>,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    pub ncm: Option<String>,
    pub cst_csosn: Option<String>,
    pub cfop: Option<String>,
    pub origin: Option<String>,
    pub icms_aliquota: Option<Decimal>,
    pub icms_valor: Decimal,
    pub ipi_aliquota: Option<Decimal>,
    pub ipi_valor: Decimal,
    pub pis_aliquota: Option<Decimal>,
    pub pis_valor: Decimal,
    pub cofins_aliquota: Option<Decimal>,
    pub cofins_valor: Decimal,
    pub invoice_notes: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub supplier_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a product
///
/// Required fields are `Option` so missing ones surface as a validation
/// error set instead of a deserialization failure. Rates go through the
/// lenient decimal path: unusable input counts as "no rate".
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(required(message = "nome é obrigatório"), length(min = 1, message = "nome é obrigatório"))]
    pub name: Option<String>,
    #[validate(required(message = "código é obrigatório"), length(min = 1, message = "código é obrigatório"))]
    pub code: Option<String>,
    pub description: Option<String>,
    #[validate(required(message = "unidade de medida é obrigatória"), length(min = 1, message = "unidade de medida é obrigatória"))]
    pub unit: Option<String>,
    /// Opening stock balance; afterwards only movements change it
    pub current_stock: Option<i32>,
    pub min_stock: Option<i32>,
    pub location: Option<String>,
    #[validate(
        required(message = "preço de compra é obrigatório"),
        custom = "crate::validation::validate_not_negative"
    )]
    #[serde(default, deserialize_with = "tax::lenient_decimal")]
    pub purchase_price: Option<Decimal>,
    #[validate(
        required(message = "preço de venda é obrigatório"),
        custom = "crate::validation::validate_not_negative"
    )]
    #[serde(default, deserialize_with = "tax::lenient_decimal")]
    pub sale_price: Option<Decimal>,
    pub ncm: Option<String>,
    pub cst_csosn: Option<String>,
    pub cfop: Option<String>,
    pub origin: Option<String>,
    #[serde(default, deserialize_with = "tax::lenient_decimal")]
    pub icms_aliquota: Option<Decimal>,
    #[serde(default, deserialize_with = "tax::lenient_decimal")]
    pub ipi_aliquota: Option<Decimal>,
    #[serde(default, deserialize_with = "tax::lenient_decimal")]
    pub pis_aliquota: Option<Decimal>,
    #[serde(default, deserialize_with = "tax::lenient_decimal")]
    pub cofins_aliquota: Option<Decimal>,
    pub invoice_notes: Option<String>,
    pub supplier_id: Option<Uuid>,
}

/// Patch payload for updating a product
///
/// Plain `Option` fields keep the stored value when absent; nullable fields
/// use [`PatchField`] so an explicit `null` clears them. Prices go through
/// the same lenient decode as on create, so malformed input degrades to
/// absent (keep) instead of failing deserialization. `current_stock` is
/// deliberately absent: after creation only stock movements change it.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "nome não pode ser vazio"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "código não pode ser vazio"))]
    pub code: Option<String>,
    #[serde(default)]
    pub description: PatchField<String>,
    #[validate(length(min = 1, message = "unidade de medida não pode ser vazia"))]
    pub unit: Option<String>,
    pub min_stock: Option<i32>,
    #[serde(default)]
    pub location: PatchField<String>,
    #[validate(custom = "crate::validation::validate_not_negative")]
    #[serde(default, deserialize_with = "tax::lenient_decimal")]
    pub purchase_price: Option<Decimal>,
    #[validate(custom = "crate::validation::validate_not_negative")]
    #[serde(default, deserialize_with = "tax::lenient_decimal")]
    pub sale_price: Option<Decimal>,
    #[serde(default)]
    pub ncm: PatchField<String>,
    #[serde(default)]
    pub cst_csosn: PatchField<String>,
    #[serde(default)]
    pub cfop: PatchField<String>,
    #[serde(default)]
    pub origin: PatchField<String>,
    #[serde(default, deserialize_with = "tax::lenient_decimal_patch")]
    pub icms_aliquota: PatchField<Decimal>,
    #[serde(default, deserialize_with = "tax::lenient_decimal_patch")]
    pub ipi_aliquota: PatchField<Decimal>,
    #[serde(default, deserialize_with = "tax::lenient_decimal_patch")]
    pub pis_aliquota: PatchField<Decimal>,
    #[serde(default, deserialize_with = "tax::lenient_decimal_patch")]
    pub cofins_aliquota: PatchField<Decimal>,
    #[serde(default)]
    pub invoice_notes: PatchField<String>,
    #[serde(default)]
    pub supplier_id: PatchField<Uuid>,
}

/// Filters for the product listing
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive substring over name or code
    pub search: Option<String>,
    /// `low`, `out` or `available`
    pub stock_status: Option<String>,
    pub unit: Option<String>,
    pub supplier_id: Option<Uuid>,
}
