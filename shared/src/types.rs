//! Common types used across the platform

use serde::{Deserialize, Deserializer, Serialize};

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "movement_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Inbound,
    Outbound,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Inbound => "inbound",
            MovementKind::Outbound => "outbound",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "inbound" => Some(MovementKind::Inbound),
            "outbound" => Some(MovementKind::Outbound),
            _ => None,
        }
    }

    /// The direction that undoes this one
    pub fn opposite(&self) -> Self {
        match self {
            MovementKind::Inbound => MovementKind::Outbound,
            MovementKind::Outbound => MovementKind::Inbound,
        }
    }
}

/// Stock position of a product relative to its configured minimum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Low,
    Out,
    Available,
}

impl StockStatus {
    /// Classify a stock level. Zero stock wins over the low threshold.
    pub fn classify(current_stock: i32, min_stock: i32) -> Self {
        if current_stock == 0 {
            StockStatus::Out
        } else if current_stock <= min_stock {
            StockStatus::Low
        } else {
            StockStatus::Available
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(StockStatus::Low),
            "out" => Some(StockStatus::Out),
            "available" => Some(StockStatus::Available),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Low => "low",
            StockStatus::Out => "out",
            StockStatus::Available => "available",
        }
    }
}

/// Mode of the critical-stock report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    #[default]
    Low,
    Out,
}

impl ReportMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(ReportMode::Low),
            "out" => Some(ReportMode::Out),
            _ => None,
        }
    }
}

/// Tri-state patch field for JSON updates: an absent key keeps the stored
/// value, an explicit `null` clears it, anything else sets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchField<T> {
    Keep,
    Clear,
    Set(T),
}

impl<T> Default for PatchField<T> {
    fn default() -> Self {
        PatchField::Keep
    }
}

impl<T> PatchField<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, PatchField::Keep)
    }

    /// Resolve the patch against the currently stored value
    pub fn resolve(self, current: Option<T>) -> Option<T> {
        match self {
            PatchField::Keep => current,
            PatchField::Clear => None,
            PatchField::Set(value) => Some(value),
        }
    }

    pub fn as_ref(&self) -> PatchField<&T> {
        match self {
            PatchField::Keep => PatchField::Keep,
            PatchField::Clear => PatchField::Clear,
            PatchField::Set(value) => PatchField::Set(value),
        }
    }
}

impl<'de, T> Deserialize<'de> for PatchField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only called when the key is present; `#[serde(default)]` covers absence.
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => PatchField::Set(value),
            None => PatchField::Clear,
        })
    }
}

/// Default page size for list endpoints
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Upper bound on the page size a client may request
pub const MAX_PER_PAGE: i64 = 100;

/// Pagination query parameters (1-based page)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    DEFAULT_PER_PAGE
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationParams {
    /// Clamp the page to 1-based and the page size to `1..=MAX_PER_PAGE`
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }

    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub per_page: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Paginated<T> {
    /// Build the envelope from one page of items and the total row count.
    /// `page` and `per_page` are expected to be normalized already.
    pub fn new(items: Vec<T>, total_items: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + per_page - 1) / per_page
        };
        Self {
            items,
            total_items,
            total_pages,
            current_page: page,
            per_page,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_kind_roundtrip() {
        assert_eq!(MovementKind::parse("inbound"), Some(MovementKind::Inbound));
        assert_eq!(MovementKind::parse("outbound"), Some(MovementKind::Outbound));
        assert_eq!(MovementKind::parse("sideways"), None);
        assert_eq!(MovementKind::Inbound.as_str(), "inbound");
        assert_eq!(MovementKind::Outbound.opposite(), MovementKind::Inbound);
    }

    #[test]
    fn test_stock_status_classification() {
        assert_eq!(StockStatus::classify(0, 5), StockStatus::Out);
        assert_eq!(StockStatus::classify(3, 5), StockStatus::Low);
        assert_eq!(StockStatus::classify(5, 5), StockStatus::Low);
        assert_eq!(StockStatus::classify(6, 5), StockStatus::Available);
        // Zero stock is "out" even when the minimum is zero
        assert_eq!(StockStatus::classify(0, 0), StockStatus::Out);
    }

    #[test]
    fn test_report_mode_parse() {
        assert_eq!(ReportMode::parse("low"), Some(ReportMode::Low));
        assert_eq!(ReportMode::parse("out"), Some(ReportMode::Out));
        assert_eq!(ReportMode::parse("critical"), None);
        assert_eq!(ReportMode::default(), ReportMode::Low);
    }

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default)]
        value: PatchField<String>,
    }

    #[test]
    fn test_patch_field_absent_keeps() {
        let probe: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(probe.value, PatchField::Keep);
    }

    #[test]
    fn test_patch_field_null_clears() {
        let probe: Probe = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(probe.value, PatchField::Clear);
    }

    #[test]
    fn test_patch_field_value_sets() {
        let probe: Probe = serde_json::from_str(r#"{"value": "shelf A"}"#).unwrap();
        assert_eq!(probe.value, PatchField::Set("shelf A".to_string()));
    }

    #[test]
    fn test_patch_field_resolve() {
        let current = Some("old".to_string());
        assert_eq!(
            PatchField::Keep.resolve(current.clone()),
            Some("old".to_string())
        );
        assert_eq!(PatchField::<String>::Clear.resolve(current.clone()), None);
        assert_eq!(
            PatchField::Set("new".to_string()).resolve(current),
            Some("new".to_string())
        );
    }

    #[test]
    fn test_pagination_normalization() {
        let params = PaginationParams { page: 0, per_page: 500 };
        let normalized = params.normalized();
        assert_eq!(normalized.page, 1);
        assert_eq!(normalized.per_page, MAX_PER_PAGE);
        assert_eq!(params.offset(), 0);

        let params = PaginationParams { page: 3, per_page: 10 };
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 20);
    }

    #[test]
    fn test_pagination_defaults() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn test_paginated_envelope_math() {
        let page: Paginated<i32> = Paginated::new(vec![1, 2, 3], 25, 1, 10);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(!page.has_prev);

        let page: Paginated<i32> = Paginated::new(vec![], 25, 3, 10);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next);
        assert!(page.has_prev);

        let page: Paginated<i32> = Paginated::new(vec![], 30, 3, 10);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next);
    }

    #[test]
    fn test_paginated_empty() {
        let page: Paginated<i32> = Paginated::new(vec![], 0, 1, 10);
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn test_paginated_past_the_end() {
        // Requesting a page past the data still reports consistent flags
        let page: Paginated<i32> = Paginated::new(vec![], 5, 4, 10);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }
}
