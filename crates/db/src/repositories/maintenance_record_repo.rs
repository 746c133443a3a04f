//! Repository for the `maintenance_records` table.
//!
//! Opening, completing and deleting a work order lock the asset row so the
//! count of open orders and the asset status are decided together.

use assetdesk_core::maintenance::{status_after_completion, MAINTAINABLE_STATUSES};
use assetdesk_core::status::{STATUS_ACTIVE, STATUS_MAINTENANCE};
use assetdesk_core::types::DbId;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::maintenance_record::{
    CreateMaintenanceRecord, MaintenanceListParams, MaintenanceRecord, UpdateMaintenanceRecord,
};

/// Column list for `maintenance_records` queries.
const COLUMNS: &str = "\
    id, asset_id, maintenance_date, maintenance_type, description, cost, \
    performed_by, complete_date, created_at, updated_at";

/// Default page size for maintenance record listing.
const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for maintenance record listing.
const MAX_LIMIT: i64 = 100;

/// One row of the per-type cost summary.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MaintenanceTypeTotal {
    pub maintenance_type: String,
    pub count: i64,
    pub cost: f64,
}

/// Outcome of closing a work order.
#[derive(Debug, Clone)]
pub struct CompletedMaintenance {
    pub record: MaintenanceRecord,
    /// Other orders on the same asset that are still open.
    pub remaining_open: i64,
    /// The asset's status after the order closed.
    pub asset_status: String,
}

/// Provides lifecycle and CRUD operations for maintenance records.
pub struct MaintenanceRecordRepo;

impl MaintenanceRecordRepo {
    /// Open a work order and put the asset into `maintenance`.
    ///
    /// Returns `None` if the asset is missing or in a status that cannot
    /// enter maintenance.
    pub async fn open(
        pool: &PgPool,
        asset_id: DbId,
        input: &CreateMaintenanceRecord,
    ) -> Result<Option<MaintenanceRecord>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let moved = sqlx::query("UPDATE assets SET status = $2 WHERE id = $1 AND status = ANY($3)")
            .bind(asset_id)
            .bind(STATUS_MAINTENANCE)
            .bind(MAINTAINABLE_STATUSES.map(str::to_string).to_vec())
            .execute(&mut *tx)
            .await?;
        if moved.rows_affected() == 0 {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO maintenance_records \
                (asset_id, maintenance_type, maintenance_date, description, cost, performed_by) \
             VALUES ($1, $2, COALESCE($3, CURRENT_DATE), $4, COALESCE($5, 0), $6) \
             RETURNING {COLUMNS}"
        );
        let record = sqlx::query_as::<_, MaintenanceRecord>(&query)
            .bind(asset_id)
            .bind(&input.maintenance_type)
            .bind(input.maintenance_date)
            .bind(input.description.as_deref())
            .bind(input.cost)
            .bind(input.performed_by.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(record))
    }

    /// Close an open work order.
    ///
    /// The asset returns to `active` once no other order for it is open.
    /// Returns `None` if the record does not exist or is already closed.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        complete_date: NaiveDate,
    ) -> Result<Option<CompletedMaintenance>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(asset_id) = lock_asset_of(&mut tx, id).await? else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE maintenance_records SET complete_date = $2 \
             WHERE id = $1 AND complete_date IS NULL \
             RETURNING {COLUMNS}"
        );
        let Some(record) = sqlx::query_as::<_, MaintenanceRecord>(&query)
            .bind(id)
            .bind(complete_date)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let remaining_open = count_open(&mut tx, asset_id).await?;
        let asset_status = settle_asset_status(&mut tx, asset_id, remaining_open).await?;

        tx.commit().await?;
        Ok(Some(CompletedMaintenance {
            record,
            remaining_open,
            asset_status,
        }))
    }

    /// Find a maintenance record by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MaintenanceRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM maintenance_records WHERE id = $1");
        sqlx::query_as::<_, MaintenanceRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List maintenance records, most recent maintenance date first.
    pub async fn list(
        pool: &PgPool,
        params: &MaintenanceListParams,
    ) -> Result<Vec<MaintenanceRecord>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if params.asset_id.is_some() {
            conditions.push(format!("asset_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.maintenance_type.is_some() {
            conditions.push(format!("maintenance_type = ${bind_idx}"));
            bind_idx += 1;
        }
        match params.open {
            Some(true) => conditions.push("complete_date IS NULL".to_string()),
            Some(false) => conditions.push("complete_date IS NOT NULL".to_string()),
            None => {}
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM maintenance_records {where_clause} \
             ORDER BY maintenance_date DESC, id DESC \
             LIMIT ${} OFFSET ${}",
            bind_idx,
            bind_idx + 1
        );

        let mut q = sqlx::query_as::<_, MaintenanceRecord>(&query);
        if let Some(asset_id) = params.asset_id {
            q = q.bind(asset_id);
        }
        if let Some(kind) = &params.maintenance_type {
            q = q.bind(kind);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Edit a work order's details. Returns `None` if not found.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMaintenanceRecord,
    ) -> Result<Option<MaintenanceRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE maintenance_records SET
                maintenance_type = COALESCE($2, maintenance_type),
                maintenance_date = COALESCE($3, maintenance_date),
                description = COALESCE($4, description),
                cost = COALESCE($5, cost),
                performed_by = COALESCE($6, performed_by)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceRecord>(&query)
            .bind(id)
            .bind(&input.maintenance_type)
            .bind(input.maintenance_date)
            .bind(&input.description)
            .bind(input.cost)
            .bind(&input.performed_by)
            .fetch_optional(pool)
            .await
    }

    /// Delete a work order. Returns `true` if a row was removed.
    ///
    /// Deleting the last open order for an asset releases it from
    /// maintenance, the same as completing it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(asset_id) = lock_asset_of(&mut tx, id).await? else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM maintenance_records WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let remaining_open = count_open(&mut tx, asset_id).await?;
        settle_asset_status(&mut tx, asset_id, remaining_open).await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count and total cost per maintenance type, optionally for one asset.
    pub async fn type_totals(
        pool: &PgPool,
        asset_id: Option<DbId>,
    ) -> Result<Vec<MaintenanceTypeTotal>, sqlx::Error> {
        sqlx::query_as::<_, MaintenanceTypeTotal>(
            "SELECT maintenance_type, COUNT(*) AS count, \
                    COALESCE(SUM(cost), 0)::DOUBLE PRECISION AS cost \
             FROM maintenance_records \
             WHERE $1::BIGINT IS NULL OR asset_id = $1 \
             GROUP BY maintenance_type \
             ORDER BY maintenance_type",
        )
        .bind(asset_id)
        .fetch_all(pool)
        .await
    }
}

/// Lock the asset a maintenance record belongs to and return its id.
async fn lock_asset_of(
    tx: &mut Transaction<'_, Postgres>,
    record_id: DbId,
) -> Result<Option<DbId>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT a.id FROM assets a \
         JOIN maintenance_records m ON m.asset_id = a.id \
         WHERE m.id = $1 \
         FOR UPDATE OF a",
    )
    .bind(record_id)
    .fetch_optional(&mut **tx)
    .await
}

async fn count_open(
    tx: &mut Transaction<'_, Postgres>,
    asset_id: DbId,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM maintenance_records \
         WHERE asset_id = $1 AND complete_date IS NULL",
    )
    .bind(asset_id)
    .fetch_one(&mut **tx)
    .await
}

/// Move a `maintenance` asset back to `active` when no order is open, and
/// return the asset's resulting status.
async fn settle_asset_status(
    tx: &mut Transaction<'_, Postgres>,
    asset_id: DbId,
    remaining_open: i64,
) -> Result<String, sqlx::Error> {
    if status_after_completion(remaining_open) == STATUS_ACTIVE {
        sqlx::query("UPDATE assets SET status = $2 WHERE id = $1 AND status = $3")
            .bind(asset_id)
            .bind(STATUS_ACTIVE)
            .bind(STATUS_MAINTENANCE)
            .execute(&mut **tx)
            .await?;
    }
    sqlx::query_scalar("SELECT status FROM assets WHERE id = $1")
        .bind(asset_id)
        .fetch_one(&mut **tx)
        .await
}
