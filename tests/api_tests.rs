mod common;

use axum_test::TestServer;
use common::fixtures::create_member;
use common::{create_test_app, create_test_app_state};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let (state, _db) = create_test_app_state();
    let server = TestServer::new(create_test_app(state)).unwrap();

    let response = server.get("/api/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "200 OK");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("API is healthy"));
}

#[tokio::test]
async fn deposit_sync_returns_batch_summary() {
    let (state, _db) = create_test_app_state();
    {
        let mut conn = state.db.get().unwrap();
        create_member(&mut conn, "hong", "홍길동");
    }
    let server = TestServer::new(create_test_app(state)).unwrap();

    let response = server
        .post("/api/admin/deposits/sync")
        .json(&json!({
            "transactions": [
                { "bkcode": "B2025-1001", "bkjukyo": "홍길동", "bkinput": 50000 },
                { "bkcode": "B2025-1002", "bkjukyo": "모르는사람", "bkinput": 7000 }
            ]
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["processed"], 2);
    assert_eq!(body["credited"], 1);
    assert_eq!(body["unmatched"], 1);
    assert_eq!(body["skipped"], 0);
    assert_eq!(body["credited_member_ids"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn deposit_sync_replay_reports_skips() {
    let (state, _db) = create_test_app_state();
    {
        let mut conn = state.db.get().unwrap();
        create_member(&mut conn, "hong", "홍길동");
    }
    let server = TestServer::new(create_test_app(state)).unwrap();

    let batch = json!({
        "transactions": [
            { "bkcode": "B2025-1003", "bkjukyo": "홍길동", "bkinput": 10000 }
        ]
    });

    server
        .post("/api/admin/deposits/sync")
        .json(&batch)
        .await
        .assert_status_ok();

    let response = server.post("/api/admin/deposits/sync").json(&batch).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["processed"], 0);
    assert_eq!(body["skipped"], 1);
    assert_eq!(body["credited"], 0);
}

#[tokio::test]
async fn deposit_sync_rejects_empty_batch() {
    let (state, _db) = create_test_app_state();
    let server = TestServer::new(create_test_app(state)).unwrap();

    let response = server
        .post("/api/admin/deposits/sync")
        .json(&json!({ "transactions": [] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deposit_sync_rejects_negative_amount() {
    let (state, _db) = create_test_app_state();
    let server = TestServer::new(create_test_app(state)).unwrap();

    let response = server
        .post("/api/admin/deposits/sync")
        .json(&json!({
            "transactions": [
                { "bkcode": "B2025-1004", "bkjukyo": "홍길동", "bkinput": -500 }
            ]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bank_transactions_filter_by_status() {
    let (state, _db) = create_test_app_state();
    {
        let mut conn = state.db.get().unwrap();
        create_member(&mut conn, "hong", "홍길동");
    }
    let server = TestServer::new(create_test_app(state)).unwrap();

    server
        .post("/api/admin/deposits/sync")
        .json(&json!({
            "transactions": [
                { "bkcode": "B2025-1005", "bkjukyo": "홍길동", "bkinput": 5000 },
                { "bkcode": "B2025-1006", "bkjukyo": "모르는사람", "bkinput": 5000 }
            ]
        }))
        .await
        .assert_status_ok();

    let all: serde_json::Value = server.get("/api/admin/bank-transactions").await.json();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let unmatched_only = server
        .get("/api/admin/bank-transactions")
        .add_query_param("status", "unmatched")
        .await;
    unmatched_only.assert_status_ok();
    let body: serde_json::Value = unmatched_only.json();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["bkcode"], "B2025-1006");
    assert_eq!(rows[0]["match_status"], "unmatched");
}

#[tokio::test]
async fn bank_transactions_unknown_status_is_rejected() {
    let (state, _db) = create_test_app_state();
    let server = TestServer::new(create_test_app(state)).unwrap();

    let response = server
        .get("/api/admin/bank-transactions")
        .add_query_param("status", "resolved")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deposit_history_lists_entries_newest_first() {
    let (state, _db) = create_test_app_state();
    let hong = {
        let mut conn = state.db.get().unwrap();
        create_member(&mut conn, "hong", "홍길동")
    };
    let server = TestServer::new(create_test_app(state)).unwrap();

    server
        .post("/api/admin/deposits/sync")
        .json(&json!({
            "transactions": [
                { "bkcode": "B2025-1007", "bkjukyo": "홍길동", "bkinput": 10000 },
                { "bkcode": "B2025-1008", "bkjukyo": "홍길동", "bkinput": 20000 }
            ]
        }))
        .await
        .assert_status_ok();

    let response = server
        .get(&format!("/api/members/{}/deposit-history", hong.id))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["amount"], 20000);
    assert_eq!(entries[0]["balance_after"], 30000);
    assert_eq!(entries[1]["amount"], 10000);
}

#[tokio::test]
async fn deposit_history_unknown_member_is_not_found() {
    let (state, _db) = create_test_app_state();
    let server = TestServer::new(create_test_app(state)).unwrap();

    let response = server.get("/api/members/9999/deposit-history").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (state, _db) = create_test_app_state();
    let server = TestServer::new(create_test_app(state)).unwrap();

    let response = server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["openapi"].is_string());
    assert!(body["paths"]["/api/admin/deposits/sync"].is_object());
}

#[tokio::test]
async fn metrics_endpoint_renders() {
    let (state, _db) = create_test_app_state();
    let server = TestServer::new(create_test_app(state)).unwrap();

    // Generate at least one observation first.
    server.get("/api/health").await.assert_status_ok();

    let response = server.get("/metrics").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn malformed_body_is_rejected_without_processing() {
    let (state, _db) = create_test_app_state();
    let server = TestServer::new(create_test_app(state)).unwrap();

    let response = server
        .post("/api/admin/deposits/sync")
        .text(r#"{"transactions": not json"#)
        .content_type("application/json")
        .await;

    assert!(response.status_code().is_client_error());

    // Nothing was audited.
    let listing: serde_json::Value = server.get("/api/admin/bank-transactions").await.json();
    assert_eq!(listing.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn bkoutput_defaults_to_zero_when_omitted() {
    let (state, _db) = create_test_app_state();
    let server = TestServer::new(create_test_app(state)).unwrap();

    let response = server
        .post("/api/admin/deposits/sync")
        .json(&json!({
            "transactions": [
                { "bkcode": "B2025-1009", "bkjukyo": "모르는사람", "bkinput": 100 }
            ]
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["unmatched"], 1);
}
