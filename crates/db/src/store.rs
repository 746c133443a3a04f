//! PostgreSQL implementation of the allocator's record store.

use async_trait::async_trait;
use assetdesk_core::allocation::{AssetStore, StoreError};
use assetdesk_core::types::DbId;

use crate::models::asset::{Asset, CreateAsset};
use crate::repositories::{AssetCategoryRepo, AssetRepo};
use crate::DbPool;

/// Default number of rows read per keyset batch.
pub const DEFAULT_FETCH_BATCH_SIZE: i64 = 1000;

/// PostgreSQL error codes the store distinguishes.
const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
const PG_NOT_NULL_VIOLATION: &str = "23502";
const PG_CHECK_VIOLATION: &str = "23514";

/// Unique constraints and the field each one guards.
const UNIQUE_CONSTRAINT_FIELDS: &[(&str, &str)] = &[
    ("uq_assets_asset_id", "asset_id"),
    ("uq_asset_categories_prefix", "prefix"),
];

/// Record store backed by the `assets` and `asset_categories` tables.
#[derive(Clone)]
pub struct PgAssetStore {
    pool: DbPool,
    fetch_batch_size: i64,
}

impl PgAssetStore {
    pub fn new(pool: DbPool) -> Self {
        Self::with_batch_size(pool, DEFAULT_FETCH_BATCH_SIZE)
    }

    /// Build a store that reads category identifiers `batch_size` rows at a
    /// time. Values below 1 are raised to 1.
    pub fn with_batch_size(pool: DbPool, batch_size: i64) -> Self {
        Self {
            pool,
            fetch_batch_size: batch_size.max(1),
        }
    }
}

#[async_trait]
impl AssetStore for PgAssetStore {
    type Draft = CreateAsset;
    type Asset = Asset;

    /// Reads in keyset batches until a short batch, so categories of any
    /// size are returned whole.
    async fn list_category_asset_ids(&self, category_id: DbId) -> Result<Vec<String>, StoreError> {
        let mut ids = Vec::new();
        let mut after_id: DbId = 0;

        loop {
            let batch = AssetRepo::list_ids_in_category(
                &self.pool,
                category_id,
                after_id,
                self.fetch_batch_size,
            )
            .await
            .map_err(classify_store_error)?;

            let batch_len = batch.len() as i64;
            if let Some((last_id, _)) = batch.last() {
                after_id = *last_id;
            }
            ids.extend(batch.into_iter().map(|(_, asset_id)| asset_id));

            if batch_len < self.fetch_batch_size {
                break;
            }
        }

        tracing::debug!(category_id, count = ids.len(), "Loaded category asset ids");
        Ok(ids)
    }

    async fn create_asset(
        &self,
        draft: &CreateAsset,
        category_id: DbId,
        asset_id: &str,
    ) -> Result<Asset, StoreError> {
        AssetRepo::create(&self.pool, draft, category_id, asset_id)
            .await
            .map_err(classify_store_error)
    }

    async fn advance_category_sequence(
        &self,
        category_id: DbId,
        next_sequence: i32,
    ) -> Result<(), StoreError> {
        let found = AssetCategoryRepo::advance_sequence(&self.pool, category_id, next_sequence)
            .await
            .map_err(classify_store_error)?;
        if !found {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// Translate a sqlx error into the store taxonomy.
///
/// Unique violations (`23505`) become [`StoreError::UniqueViolation`] naming
/// the guarded field; constraint violations become validation errors; all
/// other failures are reported as the store being unavailable.
pub fn classify_store_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => StoreError::UniqueViolation {
                    field: unique_field(constraint).to_string(),
                },
                Some(PG_FOREIGN_KEY_VIOLATION) => StoreError::Validation(format!(
                    "Referenced record does not exist or is still in use ({constraint})"
                )),
                Some(PG_NOT_NULL_VIOLATION) | Some(PG_CHECK_VIOLATION) => {
                    StoreError::Validation(format!("Constraint {constraint} rejected the value"))
                }
                _ => StoreError::Unavailable(db_err.to_string()),
            }
        }
        other => StoreError::Unavailable(other.to_string()),
    }
}

/// Field guarded by a unique constraint, falling back to the constraint name.
pub fn unique_field(constraint: &str) -> &str {
    UNIQUE_CONSTRAINT_FIELDS
        .iter()
        .find(|(name, _)| *name == constraint)
        .map(|(_, field)| *field)
        .unwrap_or(constraint)
}
