//! Handlers for asset categories.
//!
//! Categories carry the prefix and watermark the allocator works from, so
//! the prefix is normalized here once and is not editable afterwards.

use assetdesk_core::categories::{
    normalize_description, normalize_name, normalize_prefix, validate_next_sequence,
};
use assetdesk_core::error::CoreError;
use assetdesk_core::types::DbId;
use assetdesk_db::models::asset_category::{CreateAssetCategory, UpdateAssetCategory};
use assetdesk_db::repositories::AssetCategoryRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "AssetCategory",
        id,
    })
}

/// GET /api/v1/asset-categories
///
/// List every category ordered by name.
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = AssetCategoryRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/asset-categories
///
/// Create a category. The prefix is trimmed and uppercased.
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateAssetCategory>,
) -> AppResult<impl IntoResponse> {
    let name = normalize_name(&input.name)?;
    let prefix = normalize_prefix(&input.prefix)?;
    let next_sequence = validate_next_sequence(input.next_sequence)?;
    let description = normalize_description(input.description.as_deref());

    let category = AssetCategoryRepo::create(
        &state.pool,
        &name,
        &prefix,
        description.as_deref(),
        next_sequence,
    )
    .await?;

    tracing::info!(
        category_id = category.id,
        prefix = %category.prefix,
        next_sequence = category.next_sequence,
        "Asset category created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/asset-categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let category = AssetCategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: category }))
}

/// PUT /api/v1/asset-categories/{id}
///
/// Rename a category or change its description. A blank description
/// clears it.
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAssetCategory>,
) -> AppResult<impl IntoResponse> {
    let name = input.name.as_deref().map(normalize_name).transpose()?;
    let description = input
        .description
        .as_deref()
        .map(|d| normalize_description(Some(d)));

    let category = AssetCategoryRepo::update(
        &state.pool,
        id,
        name.as_deref(),
        description.as_ref().map(|d| d.as_deref()),
    )
    .await?
    .ok_or_else(|| not_found(id))?;

    tracing::info!(category_id = id, "Asset category updated");

    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/asset-categories/{id}
///
/// Rejected with 409 while any asset still belongs to the category.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !AssetCategoryRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(category_id = id, "Asset category deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/asset-categories/{id}/next-asset-id
///
/// Preview the identifier and watermark the next asset would receive.
/// Nothing is reserved: a concurrent create may take the slot first.
pub async fn next_asset_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let categories = AssetCategoryRepo::list_all(&state.pool).await?;
    let allocation = state
        .allocator
        .compute_next_identifier(id, &categories)
        .await?;
    Ok(Json(DataResponse { data: allocation }))
}
