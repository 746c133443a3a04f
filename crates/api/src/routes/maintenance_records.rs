//! Route definitions for maintenance records.
//!
//! All routes are mounted under `/maintenance-records`. Opening a work
//! order lives under `/assets/{id}/maintenance`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::maintenance_records;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(maintenance_records::list_maintenance_records))
        .route("/stats", get(maintenance_records::maintenance_stats))
        .route(
            "/{id}",
            get(maintenance_records::get_maintenance_record)
                .put(maintenance_records::update_maintenance_record)
                .delete(maintenance_records::delete_maintenance_record),
        )
        .route(
            "/{id}/complete",
            post(maintenance_records::complete_maintenance),
        )
}
