//! Record store contract used by the allocator.

use async_trait::async_trait;

use crate::types::DbId;

/// Field whose unique constraint arbitrates allocation races.
pub const ASSET_ID_FIELD: &str = "asset_id";

/// Failure reported by a record store.
///
/// Unique violations are a distinct variant so the allocator can tell a lost
/// race apart from every other failure without inspecting messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Duplicate value for unique field '{field}'")]
    UniqueViolation { field: String },

    #[error("Record not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether this is a unique violation on `asset_id`.
    pub fn is_asset_id_conflict(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { field } if field == ASSET_ID_FIELD)
    }
}

/// The subset of the record store the allocator talks to.
///
/// `Draft` is the caller's asset payload without an identifier; the store
/// attaches the allocated `asset_id` when it writes the row.
#[async_trait]
pub trait AssetStore: Send + Sync {
    type Draft: Send + Sync;
    type Asset: Send;

    /// Every `asset_id` currently assigned in the category. Implementations
    /// must return the complete set, not a page of it.
    async fn list_category_asset_ids(&self, category_id: DbId) -> Result<Vec<String>, StoreError>;

    /// Insert an asset carrying `asset_id`.
    ///
    /// Must fail with [`StoreError::UniqueViolation`] naming `asset_id` when
    /// the identifier is already taken.
    async fn create_asset(
        &self,
        draft: &Self::Draft,
        category_id: DbId,
        asset_id: &str,
    ) -> Result<Self::Asset, StoreError>;

    /// Move the category watermark forward to `next_sequence`. A lower value
    /// than the stored one must leave the stored value untouched.
    async fn advance_category_sequence(
        &self,
        category_id: DbId,
        next_sequence: i32,
    ) -> Result<(), StoreError>;
}
