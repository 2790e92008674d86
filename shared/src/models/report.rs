//! Reporting models

use serde::{Deserialize, Serialize};

use crate::models::Movement;
use crate::types::ReportMode;

/// Query parameters for the critical-stock report
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CriticalStockQuery {
    /// `low` (stock at or below minimum, default) or `out` (stock zero)
    pub mode: Option<String>,
}

impl CriticalStockQuery {
    pub fn mode(&self) -> Option<ReportMode> {
        match self.mode.as_deref() {
            None => Some(ReportMode::default()),
            Some(value) => ReportMode::parse(value),
        }
    }
}

/// Dashboard summary of the whole inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_products: i64,
    pub low_stock_count: i64,
    pub out_of_stock_count: i64,
    /// The 5 newest movements, enriched with product and customer names
    pub recent_movements: Vec<Movement>,
    /// Running sums of quantities across all time
    pub total_inbound: i64,
    pub total_outbound: i64,
}
