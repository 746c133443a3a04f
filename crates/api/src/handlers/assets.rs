//! Handlers for assets.
//!
//! Creation goes through the identifier allocator; every other endpoint is
//! plain repository CRUD.

use assetdesk_core::assets::validate_asset_fields;
use assetdesk_core::error::CoreError;
use assetdesk_core::status::{ensure_direct_status_change, validate_status, STATUS_ACTIVE};
use assetdesk_core::types::DbId;
use assetdesk_db::models::asset::{AssetListParams, CreateAsset, UpdateAsset};
use assetdesk_db::repositories::{AssetCategoryRepo, AssetRepo, BorrowRecordRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

pub(crate) fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Asset", id })
}

/// GET /api/v1/assets
///
/// List/search assets, newest first.
pub async fn list_assets(
    State(state): State<AppState>,
    Query(params): Query<AssetListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = params.status.as_deref() {
        validate_status(status)?;
    }
    let assets = AssetRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: assets }))
}

/// POST /api/v1/assets
///
/// Create an asset with an allocated `asset_id`.
pub async fn create_asset(
    State(state): State<AppState>,
    Json(input): Json<CreateAsset>,
) -> AppResult<impl IntoResponse> {
    validate_asset_fields(
        Some(input.name.as_str()),
        input.status.as_deref(),
        input.purchase_price,
    )?;
    if let Some(status) = input.status.as_deref() {
        ensure_direct_status_change(None, status)?;
    }

    let categories = AssetCategoryRepo::list_all(&state.pool).await?;
    let asset = state
        .allocator
        .create_asset_with_allocated_id(input.category_id, &input, &categories)
        .await?;

    tracing::info!(
        id = asset.id,
        asset_id = %asset.asset_id,
        category_id = asset.category_id,
        "Asset registered",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// GET /api/v1/assets/{id}
pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: asset }))
}

/// PUT /api/v1/assets/{id}
///
/// Update descriptive fields and status. The identifier never changes,
/// and `borrowed`/`maintenance` are only reached through their records.
pub async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAsset>,
) -> AppResult<impl IntoResponse> {
    validate_asset_fields(
        input.name.as_deref(),
        input.status.as_deref(),
        input.purchase_price,
    )?;
    if let Some(status) = input.status.as_deref() {
        let current = AssetRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        ensure_direct_status_change(Some(current.status.as_str()), status)?;
    }

    let asset = AssetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id, asset_id = %asset.asset_id, "Asset updated");

    Ok(Json(DataResponse { data: asset }))
}

/// DELETE /api/v1/assets/{id}
///
/// The freed identifier is reused by the next allocation in the category.
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !AssetRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(id, "Asset deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct Availability {
    pub asset_id: DbId,
    pub status: String,
    pub available: bool,
    /// Borrow record id while the asset is out.
    pub borrow_record_id: Option<DbId>,
}

/// GET /api/v1/assets/{id}/availability
///
/// Whether the asset can be borrowed right now.
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let outstanding = BorrowRecordRepo::find_outstanding_for_asset(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: Availability {
            asset_id: asset.id,
            available: asset.status == STATUS_ACTIVE,
            status: asset.status,
            borrow_record_id: outstanding.map(|r| r.id),
        },
    }))
}
