//! Repository for the `borrow_records` table.
//!
//! Every write that changes a record's status also moves the asset's status
//! in the same transaction. Updates are conditional on the expected current
//! status; a `None` result means another request got there first.

use assetdesk_core::borrowing::{
    BORROW_BORROWED, BORROW_OVERDUE, BORROW_PENDING, BORROW_REJECTED, BORROW_RETURNED,
};
use assetdesk_core::status::{STATUS_ACTIVE, STATUS_BORROWED};
use assetdesk_core::types::DbId;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::borrow_record::{BorrowListParams, BorrowRecord, CreateBorrowRecord};

/// Column list for `borrow_records` queries.
const COLUMNS: &str = "\
    id, asset_id, borrower, borrow_date, expected_return_date, returned_at, \
    status, notes, created_at, updated_at";

/// Default page size for borrow record listing.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for borrow record listing.
const MAX_LIMIT: i64 = 100;

/// Provides lifecycle operations for borrow records.
pub struct BorrowRecordRepo;

impl BorrowRecordRepo {
    /// Open a borrow record for an `active` asset.
    ///
    /// With `status = borrowed` the asset is checked out immediately; with
    /// `pending` it stays `active` until approval. Returns `None` if the
    /// asset is missing or no longer `active`.
    pub async fn open(
        pool: &PgPool,
        asset_id: DbId,
        input: &CreateBorrowRecord,
        status: &str,
    ) -> Result<Option<BorrowRecord>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM assets WHERE id = $1 FOR UPDATE")
                .bind(asset_id)
                .fetch_optional(&mut *tx)
                .await?;
        if current.as_deref() != Some(STATUS_ACTIVE) {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO borrow_records (asset_id, borrower, expected_return_date, status, notes) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let record = sqlx::query_as::<_, BorrowRecord>(&query)
            .bind(asset_id)
            .bind(input.borrower.trim())
            .bind(input.expected_return_date)
            .bind(status)
            .bind(input.notes.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        if status == BORROW_BORROWED {
            set_asset_status(&mut tx, asset_id, STATUS_BORROWED).await?;
        }

        tx.commit().await?;
        Ok(Some(record))
    }

    /// Approve a pending request: the record becomes `borrowed` as of today
    /// and the asset is checked out. Returns `None` if the record is no
    /// longer pending or the asset is no longer `active`.
    pub async fn approve(pool: &PgPool, id: DbId) -> Result<Option<BorrowRecord>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE borrow_records SET status = $2, borrow_date = CURRENT_DATE \
             WHERE id = $1 AND status = $3 \
             RETURNING {COLUMNS}"
        );
        let Some(record) = sqlx::query_as::<_, BorrowRecord>(&query)
            .bind(id)
            .bind(BORROW_BORROWED)
            .bind(BORROW_PENDING)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let checked_out = sqlx::query("UPDATE assets SET status = $2 WHERE id = $1 AND status = $3")
            .bind(record.asset_id)
            .bind(STATUS_BORROWED)
            .bind(STATUS_ACTIVE)
            .execute(&mut *tx)
            .await?;
        if checked_out.rows_affected() == 0 {
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(record))
    }

    /// Reject a pending request. The asset is untouched.
    pub async fn reject(pool: &PgPool, id: DbId) -> Result<Option<BorrowRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE borrow_records SET status = $2 \
             WHERE id = $1 AND status = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BorrowRecord>(&query)
            .bind(id)
            .bind(BORROW_REJECTED)
            .bind(BORROW_PENDING)
            .fetch_optional(pool)
            .await
    }

    /// Close a `borrowed` or `overdue` record and put the asset back to
    /// `active`.
    pub async fn return_asset(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BorrowRecord>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE borrow_records SET status = $2, returned_at = NOW() \
             WHERE id = $1 AND status IN ($3, $4) \
             RETURNING {COLUMNS}"
        );
        let Some(record) = sqlx::query_as::<_, BorrowRecord>(&query)
            .bind(id)
            .bind(BORROW_RETURNED)
            .bind(BORROW_BORROWED)
            .bind(BORROW_OVERDUE)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query("UPDATE assets SET status = $2 WHERE id = $1 AND status = $3")
            .bind(record.asset_id)
            .bind(STATUS_ACTIVE)
            .bind(STATUS_BORROWED)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(record))
    }

    /// Flag every `borrowed` record whose expected return date is before
    /// `today` as `overdue`. Returns the number of records flagged.
    pub async fn mark_overdue(pool: &PgPool, today: NaiveDate) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE borrow_records SET status = $1 \
             WHERE status = $2 AND expected_return_date < $3",
        )
        .bind(BORROW_OVERDUE)
        .bind(BORROW_BORROWED)
        .bind(today)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Find a borrow record by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BorrowRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM borrow_records WHERE id = $1");
        sqlx::query_as::<_, BorrowRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The `borrowed` or `overdue` record for an asset, if it is out.
    pub async fn find_outstanding_for_asset(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Option<BorrowRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM borrow_records \
             WHERE asset_id = $1 AND status IN ($2, $3) \
             ORDER BY created_at DESC LIMIT 1"
        );
        sqlx::query_as::<_, BorrowRecord>(&query)
            .bind(asset_id)
            .bind(BORROW_BORROWED)
            .bind(BORROW_OVERDUE)
            .fetch_optional(pool)
            .await
    }

    /// List borrow records, newest first, with optional filters.
    pub async fn list(
        pool: &PgPool,
        params: &BorrowListParams,
    ) -> Result<Vec<BorrowRecord>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if params.asset_id.is_some() {
            conditions.push(format!("asset_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.borrower.is_some() {
            conditions.push(format!("borrower = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.status.is_some() {
            conditions.push(format!("status = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM borrow_records {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${} OFFSET ${}",
            bind_idx,
            bind_idx + 1
        );

        let mut q = sqlx::query_as::<_, BorrowRecord>(&query);
        if let Some(asset_id) = params.asset_id {
            q = q.bind(asset_id);
        }
        if let Some(borrower) = &params.borrower {
            q = q.bind(borrower);
        }
        if let Some(status) = &params.status {
            q = q.bind(status);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }
}

async fn set_asset_status(
    tx: &mut Transaction<'_, Postgres>,
    asset_id: DbId,
    status: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE assets SET status = $2 WHERE id = $1")
        .bind(asset_id)
        .bind(status)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
