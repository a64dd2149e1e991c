use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use palantir_core::config::Config;
use palantir_duckdb::DuckDbBackend;
use palantir_server::app::build_app;
use palantir_server::state::AppState;

fn test_config() -> Config {
    Config {
        port: 0,
        data_dir: "/tmp/palantir-test".to_string(),
        duckdb_memory_limit: "1GB".to_string(),
        public_url: "http://localhost:3000".to_string(),
        service_name: "palantir-test".to_string(),
        breakdown_limit: 10,
    }
}

fn setup() -> axum::Router {
    let db = DuckDbBackend::open_in_memory().expect("in-memory DuckDB");
    build_app(Arc::new(AppState::new(db, test_config())))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn json_body(response: axum::http::Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json")
}

async fn create(app: &axum::Router, name: &str, domain: &str) -> Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/websites",
            json!({ "name": name, "domain": domain }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await["data"].clone()
}

#[tokio::test]
async fn website_crud_round_trip() {
    let app = setup();

    let created = create(&app, "Docs", "docs.example.com").await;
    let id = created["id"].as_str().expect("id").to_string();
    assert!(id.starts_with("site_"));
    assert_eq!(created["domain"], "docs.example.com");

    let fetched = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/websites/{id}")))
        .await
        .expect("response");
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(json_body(fetched).await["data"]["name"], "Docs");

    let updated = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/websites/{id}"),
            json!({ "name": "Documentation" }),
        ))
        .await
        .expect("response");
    assert_eq!(updated.status(), StatusCode::OK);
    let body = json_body(updated).await;
    assert_eq!(body["data"]["name"], "Documentation");
    assert_eq!(body["data"]["domain"], "docs.example.com");

    let deleted = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/websites/{id}")))
        .await
        .expect("response");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = app
        .oneshot(empty_request("GET", &format!("/api/websites/{id}")))
        .await
        .expect("response");
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    let body = json_body(gone).await;
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn create_rejects_blank_and_oversized_fields() {
    let app = setup();

    let blank = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/websites",
            json!({ "name": "  ", "domain": "example.com" }),
        ))
        .await
        .expect("response");
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(blank).await["error"]["code"], "validation_error");

    let oversized = app
        .oneshot(json_request(
            "POST",
            "/api/websites",
            json!({ "name": "Site", "domain": "a".repeat(256) }),
        ))
        .await
        .expect("response");
    assert_eq!(oversized.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_paginates_with_cursor() {
    let app = setup();
    for i in 0..3 {
        create(&app, &format!("Site {i}"), &format!("s{i}.example.com")).await;
    }

    let first = app
        .clone()
        .oneshot(empty_request("GET", "/api/websites?limit=2"))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);
    let body = json_body(first).await;
    assert_eq!(body["data"].as_array().expect("array").len(), 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["has_more"], true);
    let cursor = body["pagination"]["cursor"]
        .as_str()
        .expect("cursor")
        .to_string();

    let second = app
        .oneshot(empty_request(
            "GET",
            &format!("/api/websites?limit=2&cursor={cursor}"),
        ))
        .await
        .expect("response");
    let body = json_body(second).await;
    assert_eq!(body["data"].as_array().expect("array").len(), 1);
    assert_eq!(body["pagination"]["has_more"], false);
    assert!(body["pagination"]["cursor"].is_null());
}

#[tokio::test]
async fn update_and_delete_missing_website_are_404() {
    let app = setup();

    let update = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/websites/site_missing",
            json!({ "domain": "x.example.com" }),
        ))
        .await
        .expect("response");
    assert_eq!(update.status(), StatusCode::NOT_FOUND);

    let delete = app
        .oneshot(empty_request("DELETE", "/api/websites/site_missing"))
        .await
        .expect("response");
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);
}
