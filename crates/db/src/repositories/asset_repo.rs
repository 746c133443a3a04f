//! Repository for the `assets` table.
//!
//! Inserts always carry an `asset_id` allocated by the caller; the
//! `uq_assets_asset_id` constraint rejects a duplicate atomically.

use assetdesk_core::status::STATUS_ACTIVE;
use assetdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::asset::{Asset, AssetListParams, CreateAsset, UpdateAsset};

/// Column list for `assets` queries.
const COLUMNS: &str = "\
    id, asset_id, category_id, name, brand, model, serial_number, \
    purchase_date, purchase_price, location, department, status, notes, \
    requires_approval, created_at, updated_at";

/// Default page size for asset listing.
const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for asset listing.
const MAX_LIMIT: i64 = 100;

/// Provides CRUD operations for assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Insert an asset with a pre-allocated identifier.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAsset,
        category_id: DbId,
        asset_id: &str,
    ) -> Result<Asset, sqlx::Error> {
        let status = input.status.as_deref().unwrap_or(STATUS_ACTIVE);

        let query = format!(
            "INSERT INTO assets (\
                asset_id, category_id, name, brand, model, serial_number, \
                purchase_date, purchase_price, location, department, status, notes, \
                requires_approval\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, COALESCE($13, false)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(asset_id)
            .bind(category_id)
            .bind(input.name.trim())
            .bind(input.brand.as_deref())
            .bind(input.model.as_deref())
            .bind(input.serial_number.as_deref())
            .bind(input.purchase_date)
            .bind(input.purchase_price)
            .bind(input.location.as_deref())
            .bind(input.department.as_deref())
            .bind(status)
            .bind(input.notes.as_deref())
            .bind(input.requires_approval)
            .fetch_one(pool)
            .await
    }

    /// Find an asset by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List assets, newest first, with optional filters and pagination.
    pub async fn list(pool: &PgPool, params: &AssetListParams) -> Result<Vec<Asset>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if params.category_id.is_some() {
            conditions.push(format!("category_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.status.is_some() {
            conditions.push(format!("status = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.q.is_some() {
            conditions.push(format!(
                "(name ILIKE ${bind_idx} ESCAPE '\\' OR serial_number ILIKE ${bind_idx} ESCAPE '\\' \
                  OR asset_id ILIKE ${bind_idx} ESCAPE '\\' OR notes ILIKE ${bind_idx} ESCAPE '\\')"
            ));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM assets {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${} OFFSET ${}",
            bind_idx,
            bind_idx + 1
        );

        let mut q = sqlx::query_as::<_, Asset>(&query);
        if let Some(category_id) = params.category_id {
            q = q.bind(category_id);
        }
        if let Some(status) = &params.status {
            q = q.bind(status);
        }
        if let Some(text) = &params.q {
            q = q.bind(format!("%{}%", escape_like(text)));
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// One keyset page of `(id, asset_id)` pairs in a category, ordered by
    /// `id`, starting after `after_id`.
    pub async fn list_ids_in_category(
        pool: &PgPool,
        category_id: DbId,
        after_id: DbId,
        limit: i64,
    ) -> Result<Vec<(DbId, String)>, sqlx::Error> {
        sqlx::query_as::<_, (DbId, String)>(
            "SELECT id, asset_id FROM assets \
             WHERE category_id = $1 AND id > $2 \
             ORDER BY id \
             LIMIT $3",
        )
        .bind(category_id)
        .bind(after_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Update an asset's descriptive fields. Returns `None` if not found.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET
                name = COALESCE($2, name),
                brand = COALESCE($3, brand),
                model = COALESCE($4, model),
                serial_number = COALESCE($5, serial_number),
                purchase_date = COALESCE($6, purchase_date),
                purchase_price = COALESCE($7, purchase_price),
                location = COALESCE($8, location),
                department = COALESCE($9, department),
                status = COALESCE($10, status),
                notes = COALESCE($11, notes),
                requires_approval = COALESCE($12, requires_approval)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.brand)
            .bind(&input.model)
            .bind(&input.serial_number)
            .bind(input.purchase_date)
            .bind(input.purchase_price)
            .bind(&input.location)
            .bind(&input.department)
            .bind(&input.status)
            .bind(&input.notes)
            .bind(input.requires_approval)
            .fetch_optional(pool)
            .await
    }

    /// Delete an asset. Returns `true` if a row was removed.
    ///
    /// The freed suffix becomes the first candidate for the next allocation
    /// in the category.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Escape `LIKE` wildcards so user text matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like(r"c:\\tmp"), r"c:\\\\tmp");
        assert_eq!(escape_like("ThinkPad"), "ThinkPad");
    }
}
