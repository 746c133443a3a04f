//! Repository for the `asset_categories` table.

use assetdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::asset_category::AssetCategory;

/// Column list for `asset_categories` queries.
const COLUMNS: &str = "id, name, prefix, description, next_sequence, created_at, updated_at";

/// Provides CRUD operations for asset categories.
pub struct AssetCategoryRepo;

impl AssetCategoryRepo {
    /// Insert a category. Inputs must already be normalized.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        prefix: &str,
        description: Option<&str>,
        next_sequence: i32,
    ) -> Result<AssetCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO asset_categories (name, prefix, description, next_sequence) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetCategory>(&query)
            .bind(name)
            .bind(prefix)
            .bind(description)
            .bind(next_sequence)
            .fetch_one(pool)
            .await
    }

    /// Find a category by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AssetCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM asset_categories WHERE id = $1");
        sqlx::query_as::<_, AssetCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every category, ordered by name.
    ///
    /// Unpaginated: the allocator needs the full list to resolve a category.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<AssetCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM asset_categories ORDER BY name, id");
        sqlx::query_as::<_, AssetCategory>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update a category's name and description. Returns `None` if not found.
    ///
    /// `description` is `None` to leave it unchanged and `Some(None)` to
    /// clear it.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: Option<&str>,
        description: Option<Option<&str>>,
    ) -> Result<Option<AssetCategory>, sqlx::Error> {
        let query = format!(
            "UPDATE asset_categories SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetCategory>(&query)
            .bind(id)
            .bind(name)
            .bind(description.is_some())
            .bind(description.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Raise `next_sequence` to at least `next_sequence`.
    ///
    /// `GREATEST` keeps the watermark forward-only even when two allocations
    /// finish out of order. Returns `false` if the category does not exist.
    pub async fn advance_sequence(
        pool: &PgPool,
        id: DbId,
        next_sequence: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE asset_categories \
             SET next_sequence = GREATEST(next_sequence, $2) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(next_sequence)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a category. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign key violation while assets still reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM asset_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
