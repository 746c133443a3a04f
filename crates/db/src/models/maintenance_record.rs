//! Maintenance record models and DTOs.

use assetdesk_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `maintenance_records` table. `complete_date` is `None`
/// while the work order is open.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaintenanceRecord {
    pub id: DbId,
    pub asset_id: DbId,
    pub maintenance_date: NaiveDate,
    pub maintenance_type: String,
    pub description: Option<String>,
    pub cost: f64,
    pub performed_by: Option<String>,
    pub complete_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for opening a work order. The asset comes from the request path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMaintenanceRecord {
    pub maintenance_type: String,
    /// Defaults to today.
    pub maintenance_date: Option<NaiveDate>,
    pub description: Option<String>,
    /// Defaults to `0`.
    pub cost: Option<f64>,
    pub performed_by: Option<String>,
}

/// DTO for editing a work order. Completion goes through its own endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMaintenanceRecord {
    pub maintenance_type: Option<String>,
    pub maintenance_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub cost: Option<f64>,
    pub performed_by: Option<String>,
}

/// Body of the completion request.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteMaintenance {
    /// Defaults to today.
    pub complete_date: Option<NaiveDate>,
}

/// Query parameters for listing maintenance records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaintenanceListParams {
    pub asset_id: Option<DbId>,
    pub maintenance_type: Option<String>,
    /// `true` for open orders only, `false` for completed only.
    pub open: Option<bool>,
    /// Maximum results (default 20, max 100).
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for the cost summary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaintenanceStatsParams {
    pub asset_id: Option<DbId>,
}
