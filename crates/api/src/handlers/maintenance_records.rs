//! Handlers for maintenance work orders.

use assetdesk_core::error::CoreError;
use assetdesk_core::maintenance::{
    ensure_maintainable, validate_completion, validate_cost, validate_maintenance_type,
    MaintenanceStats, TypeTotals,
};
use assetdesk_core::types::DbId;
use assetdesk_db::models::maintenance_record::{
    CompleteMaintenance, CreateMaintenanceRecord, MaintenanceListParams, MaintenanceRecord,
    MaintenanceStatsParams, UpdateMaintenanceRecord,
};
use assetdesk_db::repositories::{AssetRepo, MaintenanceRecordRepo};
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
        entity: "MaintenanceRecord",
        id,
    })
}

async fn load(state: &AppState, id: DbId) -> AppResult<MaintenanceRecord> {
    MaintenanceRecordRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// GET /api/v1/maintenance-records
///
/// `?open=true` lists work in progress, `?open=false` the history.
pub async fn list_maintenance_records(
    State(state): State<AppState>,
    Query(params): Query<MaintenanceListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(kind) = params.maintenance_type.as_deref() {
        validate_maintenance_type(kind)?;
    }
    let records = MaintenanceRecordRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/maintenance-records/{id}
pub async fn get_maintenance_record(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let record = load(&state, id).await?;
    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/assets/{id}/maintenance
///
/// Open a work order; the asset moves to `maintenance`.
pub async fn start_maintenance(
    State(state): State<AppState>,
    Path(asset_id): Path<DbId>,
    Json(input): Json<CreateMaintenanceRecord>,
) -> AppResult<impl IntoResponse> {
    validate_maintenance_type(&input.maintenance_type)?;
    if let Some(cost) = input.cost {
        validate_cost(cost)?;
    }

    let asset = AssetRepo::find_by_id(&state.pool, asset_id)
        .await?
        .ok_or_else(|| assets::not_found(asset_id))?;
    ensure_maintainable(&asset.status)?;

    let record = MaintenanceRecordRepo::open(&state.pool, asset_id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Asset {} changed status concurrently, please retry",
                asset.asset_id
            )))
        })?;

    tracing::info!(
        maintenance_record_id = record.id,
        asset_id = %asset.asset_id,
        maintenance_type = %record.maintenance_type,
        "Maintenance started",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

#[derive(Serialize)]
pub struct CompletionResponse {
    #[serde(flatten)]
    pub record: MaintenanceRecord,
    pub remaining_open: i64,
    pub asset_status: String,
}

/// POST /api/v1/maintenance-records/{id}/complete
///
/// Close a work order. The asset returns to `active` once none remain open.
pub async fn complete_maintenance(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CompleteMaintenance>,
) -> AppResult<impl IntoResponse> {
    let record = load(&state, id).await?;
    let complete_date = input
        .complete_date
        .unwrap_or_else(|| Utc::now().date_naive());
    validate_completion(record.maintenance_date, record.complete_date, complete_date)?;

    let completed = MaintenanceRecordRepo::complete(&state.pool, id, complete_date)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Maintenance record {id} was completed concurrently"
            )))
        })?;

    tracing::info!(
        maintenance_record_id = id,
        asset = completed.record.asset_id,
        remaining_open = completed.remaining_open,
        asset_status = %completed.asset_status,
        "Maintenance completed",
    );

    Ok(Json(DataResponse {
        data: CompletionResponse {
            record: completed.record,
            remaining_open: completed.remaining_open,
            asset_status: completed.asset_status,
        },
    }))
}

/// PUT /api/v1/maintenance-records/{id}
pub async fn update_maintenance_record(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMaintenanceRecord>,
) -> AppResult<impl IntoResponse> {
    if let Some(kind) = input.maintenance_type.as_deref() {
        validate_maintenance_type(kind)?;
    }
    if let Some(cost) = input.cost {
        validate_cost(cost)?;
    }

    let record = MaintenanceRecordRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(maintenance_record_id = id, "Maintenance record updated");

    Ok(Json(DataResponse { data: record }))
}

/// DELETE /api/v1/maintenance-records/{id}
pub async fn delete_maintenance_record(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !MaintenanceRecordRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(maintenance_record_id = id, "Maintenance record deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/maintenance-records/stats
///
/// Count and cost per maintenance type, optionally for one asset.
pub async fn maintenance_stats(
    State(state): State<AppState>,
    Query(params): Query<MaintenanceStatsParams>,
) -> AppResult<impl IntoResponse> {
    let rows = MaintenanceRecordRepo::type_totals(&state.pool, params.asset_id).await?;
    let stats = MaintenanceStats::from_type_totals(rows.into_iter().map(|row| {
        (
            row.maintenance_type,
            TypeTotals {
                count: row.count,
                cost: row.cost,
            },
        )
    }));
    Ok(Json(DataResponse { data: stats }))
}
