//! Borrow record models and DTOs.

use assetdesk_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `borrow_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BorrowRecord {
    pub id: DbId,
    /// The borrowed asset's row id (not its `NB-001` style identifier).
    pub asset_id: DbId,
    pub borrower: String,
    pub borrow_date: NaiveDate,
    pub expected_return_date: NaiveDate,
    pub returned_at: Option<Timestamp>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for lending an asset. The asset comes from the request path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBorrowRecord {
    pub borrower: String,
    pub expected_return_date: NaiveDate,
    pub notes: Option<String>,
}

/// Query parameters for listing borrow records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BorrowListParams {
    pub asset_id: Option<DbId>,
    pub borrower: Option<String>,
    pub status: Option<String>,
    /// Maximum results (default 50, max 100).
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
