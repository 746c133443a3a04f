//! HTTP-level tests for the borrow/return and maintenance workflows.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, build_test_app, delete, get, post_json, put_json};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_asset(pool: &PgPool, body: Value) -> Value {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/asset-categories",
        json!({ "name": "Notebook", "prefix": "NB" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let category_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let mut body = body;
    body["category_id"] = json!(category_id);
    let response = post_json(build_test_app(pool.clone()), "/api/v1/assets", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn asset_status(pool: &PgPool, id: i64) -> String {
    let response = get(build_test_app(pool.clone()), &format!("/api/v1/assets/{id}")).await;
    body_json(response).await["data"]["status"]
        .as_str()
        .unwrap()
        .to_string()
}

fn next_week() -> String {
    (Utc::now().date_naive() + Duration::days(7)).to_string()
}

async fn borrow(pool: &PgPool, asset_id: i64) -> axum::response::Response {
    post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/assets/{asset_id}/borrow"),
        json!({ "borrower": "alice", "expected_return_date": next_week() }),
    )
    .await
}

async fn start_maintenance(pool: &PgPool, asset_id: i64, kind: &str, cost: f64) -> Value {
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/assets/{asset_id}/maintenance"),
        json!({ "maintenance_type": kind, "cost": cost, "performed_by": "helpdesk" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn complete(pool: &PgPool, record_id: i64) -> axum::response::Response {
    post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/maintenance-records/{record_id}/complete"),
        json!({}),
    )
    .await
}

// ---- borrowing -------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn borrow_and_return_cycle(pool: PgPool) {
    let asset = create_asset(&pool, json!({ "name": "X1 Carbon" })).await;
    let asset_id = asset["id"].as_i64().unwrap();

    let response = borrow(&pool, asset_id).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let record = body_json(response).await["data"].clone();
    assert_eq!(record["status"], "borrowed");
    assert_eq!(record["borrower"], "alice");
    assert_eq!(asset_status(&pool, asset_id).await, "borrowed");

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/assets/{asset_id}/availability"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["available"], false);
    assert_eq!(json["data"]["borrow_record_id"], record["id"]);

    let response = borrow(&pool, asset_id).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let record_id = record["id"].as_i64().unwrap();
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/borrow-records/{record_id}/return"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "returned");
    assert!(!json["data"]["returned_at"].is_null());
    assert_eq!(asset_status(&pool, asset_id).await, "active");

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/borrow-records/{record_id}/return"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approval_required_borrow_waits_in_pending(pool: PgPool) {
    let asset = create_asset(&pool, json!({ "name": "Projector", "requires_approval": true })).await;
    let asset_id = asset["id"].as_i64().unwrap();

    let response = borrow(&pool, asset_id).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let record = body_json(response).await["data"].clone();
    assert_eq!(record["status"], "pending");
    assert_eq!(asset_status(&pool, asset_id).await, "active");

    let record_id = record["id"].as_i64().unwrap();
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/borrow-records/{record_id}/return"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/borrow-records/{record_id}/approve"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "borrowed");
    assert_eq!(asset_status(&pool, asset_id).await, "borrowed");

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/borrow-records/{record_id}/reject"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejected_request_leaves_asset_available(pool: PgPool) {
    let asset = create_asset(&pool, json!({ "name": "Camera", "requires_approval": true })).await;
    let asset_id = asset["id"].as_i64().unwrap();

    let record = body_json(borrow(&pool, asset_id).await).await["data"].clone();
    let record_id = record["id"].as_i64().unwrap();

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/borrow-records/{record_id}/reject"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "rejected");
    assert_eq!(asset_status(&pool, asset_id).await, "active");

    let response = get(
        build_test_app(pool),
        &format!("/api/v1/borrow-records?asset_id={asset_id}&status=rejected"),
    )
    .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn borrow_request_validated(pool: PgPool) {
    let asset = create_asset(&pool, json!({ "name": "X1 Carbon" })).await;
    let asset_id = asset["id"].as_i64().unwrap();
    let uri = format!("/api/v1/assets/{asset_id}/borrow");

    let response = post_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "borrower": "  ", "expected_return_date": next_week() }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let yesterday = (Utc::now().date_naive() - Duration::days(1)).to_string();
    let response = post_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "borrower": "alice", "expected_return_date": yesterday }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = borrow(&pool, 999_999).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn overdue_sweep_flags_late_records(pool: PgPool) {
    let asset = create_asset(&pool, json!({ "name": "X1 Carbon" })).await;
    let asset_id = asset["id"].as_i64().unwrap();
    let record = body_json(borrow(&pool, asset_id).await).await["data"].clone();
    let record_id = record["id"].as_i64().unwrap();

    sqlx::query(
        "UPDATE borrow_records \
         SET borrow_date = CURRENT_DATE - 10, expected_return_date = CURRENT_DATE - 3 \
         WHERE id = $1",
    )
    .bind(record_id)
    .execute(&pool)
    .await
    .unwrap();

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/borrow-records/mark-overdue",
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["marked_overdue"], 1);

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/borrow-records/{record_id}"),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["status"], "overdue");

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/borrow-records/mark-overdue",
        json!({}),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["marked_overdue"], 0);

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/borrow-records/{record_id}/return"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(asset_status(&pool, asset_id).await, "active");
}

// ---- maintenance -----------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn asset_leaves_maintenance_after_last_order(pool: PgPool) {
    let asset = create_asset(&pool, json!({ "name": "Printer" })).await;
    let asset_id = asset["id"].as_i64().unwrap();

    let first = start_maintenance(&pool, asset_id, "corrective", 120.0).await;
    assert_eq!(asset_status(&pool, asset_id).await, "maintenance");
    let second = start_maintenance(&pool, asset_id, "inspection", 30.0).await;

    let response = complete(&pool, first["id"].as_i64().unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["remaining_open"], 1);
    assert_eq!(json["data"]["asset_status"], "maintenance");
    assert!(!json["data"]["complete_date"].is_null());
    assert_eq!(asset_status(&pool, asset_id).await, "maintenance");

    let response = complete(&pool, second["id"].as_i64().unwrap()).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["remaining_open"], 0);
    assert_eq!(json["data"]["asset_status"], "active");
    assert_eq!(asset_status(&pool, asset_id).await, "active");

    let response = complete(&pool, second["id"].as_i64().unwrap()).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn borrowed_asset_cannot_enter_maintenance(pool: PgPool) {
    let asset = create_asset(&pool, json!({ "name": "X1 Carbon" })).await;
    let asset_id = asset["id"].as_i64().unwrap();
    assert_eq!(borrow(&pool, asset_id).await.status(), StatusCode::CREATED);

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/assets/{asset_id}/maintenance"),
        json!({ "maintenance_type": "preventive" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(asset_status(&pool, asset_id).await, "borrowed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn asset_in_maintenance_cannot_be_borrowed(pool: PgPool) {
    let asset = create_asset(&pool, json!({ "name": "Printer" })).await;
    let asset_id = asset["id"].as_i64().unwrap();
    start_maintenance(&pool, asset_id, "preventive", 0.0).await;

    let response = borrow(&pool, asset_id).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/assets/{asset_id}"),
        json!({ "status": "active" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_last_open_order_releases_asset(pool: PgPool) {
    let asset = create_asset(&pool, json!({ "name": "Printer" })).await;
    let asset_id = asset["id"].as_i64().unwrap();
    let record = start_maintenance(&pool, asset_id, "corrective", 50.0).await;
    let record_id = record["id"].as_i64().unwrap();

    let response = delete(
        build_test_app(pool.clone()),
        &format!("/api/v1/maintenance-records/{record_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(asset_status(&pool, asset_id).await, "active");

    let response = delete(
        build_test_app(pool),
        &format!("/api/v1/maintenance-records/{record_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn maintenance_request_validated(pool: PgPool) {
    let asset = create_asset(&pool, json!({ "name": "Printer" })).await;
    let asset_id = asset["id"].as_i64().unwrap();
    let uri = format!("/api/v1/assets/{asset_id}/maintenance");

    let response = post_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "maintenance_type": "cosmetic" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "maintenance_type": "corrective", "cost": -5.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(asset_status(&pool, asset_id).await, "active");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stats_summarize_cost_by_type(pool: PgPool) {
    let asset = create_asset(&pool, json!({ "name": "Printer" })).await;
    let asset_id = asset["id"].as_i64().unwrap();
    start_maintenance(&pool, asset_id, "corrective", 120.0).await;
    start_maintenance(&pool, asset_id, "corrective", 80.0).await;
    start_maintenance(&pool, asset_id, "inspection", 30.0).await;

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/maintenance-records/stats?asset_id={asset_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["count"], 3);
    assert_eq!(data["total_cost"], 230.0);
    assert_eq!(data["by_type"].as_object().unwrap().len(), 3);
    assert_eq!(data["by_type"]["corrective"]["count"], 2);
    assert_eq!(data["by_type"]["corrective"]["cost"], 200.0);
    assert_eq!(data["by_type"]["preventive"]["count"], 0);

    let response = get(
        build_test_app(pool),
        "/api/v1/maintenance-records?open=true&maintenance_type=corrective",
    )
    .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);
}
