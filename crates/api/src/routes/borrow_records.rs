//! Route definitions for borrow records.
//!
//! All routes are mounted under `/borrow-records`. Lending an asset lives
//! under `/assets/{id}/borrow`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::borrow_records;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(borrow_records::list_borrow_records))
        .route("/mark-overdue", post(borrow_records::mark_overdue))
        .route("/{id}", get(borrow_records::get_borrow_record))
        .route("/{id}/approve", post(borrow_records::approve_borrow))
        .route("/{id}/reject", post(borrow_records::reject_borrow))
        .route("/{id}/return", post(borrow_records::return_asset))
}
