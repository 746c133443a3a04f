//! Asset models and DTOs.

use assetdesk_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub asset_id: String,
    pub category_id: DbId,
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
    pub location: Option<String>,
    pub department: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    /// Borrow requests wait for approval before the asset is handed out.
    pub requires_approval: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an asset. There is no `asset_id` field: the identifier
/// is always allocated server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAsset {
    pub category_id: DbId,
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
    pub location: Option<String>,
    pub department: Option<String>,
    /// Defaults to `active`.
    pub status: Option<String>,
    pub notes: Option<String>,
    /// Defaults to `false`.
    pub requires_approval: Option<bool>,
}

/// DTO for updating an asset. `asset_id` and `category_id` are immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAsset {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
    pub location: Option<String>,
    pub department: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub requires_approval: Option<bool>,
}

/// Query parameters for listing/searching assets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetListParams {
    /// Restrict to one category.
    pub category_id: Option<DbId>,
    /// Restrict to one status.
    pub status: Option<String>,
    /// Free text matched (ILIKE) against name, serial number, asset id and notes.
    pub q: Option<String>,
    /// Maximum results (default 20, max 100).
    pub limit: Option<i64>,
    /// Offset for pagination.
    pub offset: Option<i64>,
}
