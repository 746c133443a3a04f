//! Route definitions for asset categories.
//!
//! All routes are mounted under `/asset-categories`.

use axum::routing::get;
use axum::Router;

use crate::handlers::asset_categories;
use crate::state::AppState;

/// Category routes mounted at `/asset-categories`.
///
/// ```text
/// GET    /                    -> list_categories
/// POST   /                    -> create_category
/// GET    /{id}                -> get_category
/// PUT    /{id}                -> update_category
/// DELETE /{id}                -> delete_category
/// GET    /{id}/next-asset-id  -> next_asset_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(asset_categories::list_categories).post(asset_categories::create_category),
        )
        .route(
            "/{id}",
            get(asset_categories::get_category)
                .put(asset_categories::update_category)
                .delete(asset_categories::delete_category),
        )
        .route("/{id}/next-asset-id", get(asset_categories::next_asset_id))
}
