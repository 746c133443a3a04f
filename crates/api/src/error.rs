use assetdesk_core::allocation::{AllocationError, StoreError};
use assetdesk_core::error::CoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Message shown when every allocation attempt lost its race.
pub const ALLOCATION_EXHAUSTED_MESSAGE: &str =
    "Could not allocate an asset identifier, please retry";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`AllocationError`] for domain errors and
/// `sqlx::Error` for repository failures. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `assetdesk_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An asset identifier allocation failure.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            },

            // --- Allocation errors ---
            AppError::Allocation(err) => classify_allocation_error(err),

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal_error() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify an allocation failure.
///
/// Exhaustion is reported as a retriable 503 without the raw store error.
fn classify_allocation_error(err: &AllocationError) -> (StatusCode, &'static str, String) {
    match err {
        AllocationError::CategoryNotFound(id) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("AssetCategory with id {id} not found"),
        ),
        AllocationError::InvalidCategory(msg) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        AllocationError::CategoryFull { .. } => {
            (StatusCode::CONFLICT, "CATEGORY_FULL", err.to_string())
        }
        AllocationError::Exhausted { attempts, source } => {
            tracing::warn!(attempts, error = %source, "Asset identifier allocation exhausted");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "ALLOCATION_EXHAUSTED",
                ALLOCATION_EXHAUSTED_MESSAGE.to_string(),
            )
        }
        AllocationError::Store(store) => classify_store_error(store),
    }
}

/// Classify a store error passed through the allocator unchanged.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::UniqueViolation { .. } => (StatusCode::CONFLICT, "CONFLICT", err.to_string()),
        StoreError::NotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        StoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        StoreError::Unavailable(msg) => {
            tracing::error!(error = %msg, "Store unavailable");
            internal_error()
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Foreign key violations map to 409 (the row is still referenced).
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                // PostgreSQL unique constraint violation.
                Some("23505") if constraint.starts_with("uq_") => {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
                // PostgreSQL foreign key violation.
                Some("23503") => {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Record is referenced by other records: {constraint}"),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            internal_error()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal_error()
        }
    }
}
