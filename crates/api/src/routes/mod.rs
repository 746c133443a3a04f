pub mod asset_categories;
pub mod assets;
pub mod borrow_records;
pub mod health;
pub mod maintenance_records;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /asset-categories                      list, create
/// /asset-categories/{id}                 get, update, delete
/// /asset-categories/{id}/next-asset-id   preview next identifier
///
/// /assets                                list/search, create
/// /assets/{id}                           get, update, delete
/// /assets/{id}/availability              can it be borrowed now
/// /assets/{id}/borrow                    lend out
/// /assets/{id}/maintenance               open a work order
///
/// /borrow-records                        list
/// /borrow-records/mark-overdue           flag late records
/// /borrow-records/{id}                   get
/// /borrow-records/{id}/approve           approve a pending request
/// /borrow-records/{id}/reject            reject a pending request
/// /borrow-records/{id}/return            return the asset
///
/// /maintenance-records                   list
/// /maintenance-records/stats             cost summary
/// /maintenance-records/{id}              get, update, delete
/// /maintenance-records/{id}/complete     close a work order
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/asset-categories", asset_categories::router())
        .nest("/assets", assets::router())
        .nest("/borrow-records", borrow_records::router())
        .nest("/maintenance-records", maintenance_records::router())
}
