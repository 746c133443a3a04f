//! Route definitions for assets.
//!
//! All routes are mounted under `/assets`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{assets, borrow_records, maintenance_records};
use crate::state::AppState;

/// Asset routes mounted at `/assets`.
///
/// ```text
/// GET    /      -> list_assets
/// POST   /      -> create_asset (allocates asset_id)
/// GET    /{id}  -> get_asset
/// PUT    /{id}  -> update_asset
/// DELETE /{id}  -> delete_asset
///
/// GET    /{id}/availability -> get_availability
/// POST   /{id}/borrow       -> borrow_asset
/// POST   /{id}/maintenance  -> start_maintenance
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list_assets).post(assets::create_asset))
        .route(
            "/{id}",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/{id}/availability", get(assets::get_availability))
        .route("/{id}/borrow", post(borrow_records::borrow_asset))
        .route(
            "/{id}/maintenance",
            post(maintenance_records::start_maintenance),
        )
}
