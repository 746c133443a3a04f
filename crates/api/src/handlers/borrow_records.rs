//! Handlers for the borrow/return workflow.
//!
//! Each transition is checked against the record's current status first so
//! the caller gets a precise error; the repository then applies it
//! conditionally, so a request that loses a race is reported as a conflict.

use assetdesk_core::borrowing::{
    ensure_borrow_transition, ensure_borrowable, initial_borrow_status, is_overdue,
    validate_borrow_status, validate_return_window, BORROW_BORROWED, BORROW_OVERDUE,
    BORROW_REJECTED, BORROW_RETURNED,
};
use assetdesk_core::error::CoreError;
use assetdesk_core::types::DbId;
use assetdesk_db::models::borrow_record::{BorrowListParams, BorrowRecord, CreateBorrowRecord};
use assetdesk_db::repositories::{AssetRepo, BorrowRecordRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::assets;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "BorrowRecord",
        id,
    })
}

fn changed_concurrently(id: DbId) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Borrow record {id} or its asset changed concurrently, please retry"
    )))
}

async fn load(state: &AppState, id: DbId) -> AppResult<BorrowRecord> {
    BorrowRecordRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// GET /api/v1/borrow-records
pub async fn list_borrow_records(
    State(state): State<AppState>,
    Query(params): Query<BorrowListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = params.status.as_deref() {
        validate_borrow_status(status)?;
    }
    let records = BorrowRecordRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/borrow-records/{id}
pub async fn get_borrow_record(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let record = load(&state, id).await?;
    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/assets/{id}/borrow
///
/// Lend out an `active` asset. Assets that require approval produce a
/// `pending` request and stay `active` until it is approved.
pub async fn borrow_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<DbId>,
    Json(input): Json<CreateBorrowRecord>,
) -> AppResult<impl IntoResponse> {
    if input.borrower.trim().is_empty() {
        return Err(CoreError::Validation("Borrower must not be empty".to_string()).into());
    }
    validate_return_window(Utc::now().date_naive(), input.expected_return_date)?;

    let asset = AssetRepo::find_by_id(&state.pool, asset_id)
        .await?
        .ok_or_else(|| assets::not_found(asset_id))?;
    ensure_borrowable(&asset.status)?;

    let status = initial_borrow_status(asset.requires_approval);
    let record = BorrowRecordRepo::open(&state.pool, asset_id, &input, status)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Asset {} is no longer available to borrow",
                asset.asset_id
            )))
        })?;

    tracing::info!(
        borrow_record_id = record.id,
        asset_id = %asset.asset_id,
        status = %record.status,
        "Borrow record opened",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// POST /api/v1/borrow-records/{id}/approve
pub async fn approve_borrow(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let record = load(&state, id).await?;
    ensure_borrow_transition(&record.status, BORROW_BORROWED)?;

    let asset = AssetRepo::find_by_id(&state.pool, record.asset_id)
        .await?
        .ok_or_else(|| assets::not_found(record.asset_id))?;
    ensure_borrowable(&asset.status)?;

    let record = BorrowRecordRepo::approve(&state.pool, id)
        .await?
        .ok_or_else(|| changed_concurrently(id))?;

    tracing::info!(borrow_record_id = id, asset_id = %asset.asset_id, "Borrow request approved");

    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/borrow-records/{id}/reject
pub async fn reject_borrow(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let record = load(&state, id).await?;
    ensure_borrow_transition(&record.status, BORROW_REJECTED)?;

    let record = BorrowRecordRepo::reject(&state.pool, id)
        .await?
        .ok_or_else(|| changed_concurrently(id))?;

    tracing::info!(borrow_record_id = id, "Borrow request rejected");

    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/borrow-records/{id}/return
///
/// Close a `borrowed` or `overdue` record; the asset becomes `active`.
pub async fn return_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let record = load(&state, id).await?;
    ensure_borrow_transition(&record.status, BORROW_RETURNED)?;
    let late = record.status == BORROW_OVERDUE
        || is_overdue(
            &record.status,
            record.expected_return_date,
            Utc::now().date_naive(),
        );

    let record = BorrowRecordRepo::return_asset(&state.pool, id)
        .await?
        .ok_or_else(|| changed_concurrently(id))?;

    tracing::info!(borrow_record_id = id, asset = record.asset_id, late, "Asset returned");

    Ok(Json(DataResponse { data: record }))
}

#[derive(Serialize)]
pub struct OverdueSweep {
    pub marked_overdue: u64,
}

/// POST /api/v1/borrow-records/mark-overdue
///
/// Flag every lent-out record past its expected return date.
pub async fn mark_overdue(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let today = Utc::now().date_naive();
    let marked_overdue = BorrowRecordRepo::mark_overdue(&state.pool, today).await?;

    if marked_overdue > 0 {
        tracing::info!(marked_overdue, %today, "Borrow records marked overdue");
    }

    Ok(Json(DataResponse {
        data: OverdueSweep { marked_overdue },
    }))
}
