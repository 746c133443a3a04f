//! Asset category models and DTOs.

use assetdesk_core::allocation::SequencedCategory;
use assetdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `asset_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetCategory {
    pub id: DbId,
    pub name: String,
    pub prefix: String,
    pub description: Option<String>,
    pub next_sequence: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SequencedCategory for AssetCategory {
    fn id(&self) -> DbId {
        self.id
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn next_sequence(&self) -> i32 {
        self.next_sequence
    }
}

/// DTO for creating a category. Normalized by
/// `assetdesk_core::categories` before it reaches the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssetCategory {
    pub name: String,
    pub prefix: String,
    pub description: Option<String>,
    /// Starting watermark (default 1).
    pub next_sequence: Option<i32>,
}

/// DTO for updating a category. The prefix and watermark are not editable.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAssetCategory {
    pub name: Option<String>,
    pub description: Option<String>,
}
