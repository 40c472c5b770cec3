//! HTTP API Tests
//!
//! Drives the full router in-process:
//! - Create, read, update and delete through `/api/users`
//! - List envelope shape and repeated `hobbies` keys
//! - Error bodies and status codes

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use userdir::http_server::{HttpServer, HttpServerConfig};
use userdir::service::DirectoryService;
use userdir::storage::VolatileStore;

// =============================================================================
// Helper Functions
// =============================================================================

fn app() -> Router {
    let service = DirectoryService::new(Arc::new(VolatileStore::new()));
    HttpServer::new(HttpServerConfig::default(), service).router()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn payload(name: &str, email: &str, phone: &str, hobbies: &[&str]) -> Value {
    json!({
        "name": name,
        "email": email,
        "countryCode": "+1",
        "phone": phone,
        "place": "Seattle",
        "gender": "female",
        "hobbies": hobbies,
    })
}

// =============================================================================
// CRUD Tests
// =============================================================================

/// Full lifecycle of one user.
#[tokio::test]
async fn test_user_lifecycle() {
    let app = app();

    let (status, created) = send(
        &app,
        "POST",
        "/api/users",
        Some(payload("Grace", "grace@example.com", "206-555-0100", &["sailing"])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    let id = created["data"]["_id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["countryCode"], "+1");
    assert!(created["data"]["createdAt"].is_string());

    let (status, fetched) = send(&app, "GET", &format!("/api/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], created["data"]);

    let mut change = payload("Grace H", "grace@example.com", "206-555-0100", &["sailing"]);
    change["gender"] = json!("");
    let (status, body) = send(&app, "PUT", &format!("/api/users/{id}"), Some(change)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["Gender is required"]));

    let change = payload("Grace H", "grace@example.com", "206-555-0100", &["sailing", "go"]);
    let (status, updated) = send(&app, "PUT", &format!("/api/users/{id}"), Some(change)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["name"], "Grace H");
    assert_eq!(updated["data"]["_id"], id.as_str());
    assert_eq!(updated["data"]["createdAt"], created["data"]["createdAt"]);

    let (status, deleted) = send(&app, "DELETE", &format!("/api/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({"success": true, "data": {}}));

    let (status, body) = send(&app, "DELETE", &format!("/api/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

/// Duplicate email on create reports the field.
#[tokio::test]
async fn test_create_conflict() {
    let app = app();
    send(
        &app,
        "POST",
        "/api/users",
        Some(payload("A", "a@example.com", "1234567890", &["x"])),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(payload("B", "a@example.com", "0987654321", &["x"])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email is already in use");
    assert_eq!(body["field"], "email");
}

/// An empty body lists every missing field.
#[tokio::test]
async fn test_create_validation_errors() {
    let app = app();

    let (status, body) = send(&app, "POST", "/api/users", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation Error");
    assert_eq!(
        body["errors"],
        json!([
            "Name is required",
            "Email is required",
            "Phone number is required",
            "Place is required",
            "Gender is required",
            "At least one hobby is required"
        ])
    );
}

// =============================================================================
// List Tests
// =============================================================================

/// Repeated hobbies keys are OR-ed together.
#[tokio::test]
async fn test_list_with_repeated_hobbies() {
    let app = app();
    let users = [
        ("Ann", "ann@example.com", "1000000001", vec!["chess"]),
        ("Ben", "ben@example.com", "1000000002", vec!["golf"]),
        ("Cal", "cal@example.com", "1000000003", vec!["tennis"]),
    ];
    for (name, email, phone, hobbies) in &users {
        send(&app, "POST", "/api/users", Some(payload(name, email, phone, hobbies))).await;
    }

    let (status, body) = send(
        &app,
        "GET",
        "/api/users?hobbies=chess&hobbies=tennis&sort=name:desc&limit=1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["total"], 2);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["data"][0]["name"], "Cal");
}

/// Reset clears the volatile store and restarts ids.
#[tokio::test]
async fn test_reset_db() {
    let app = app();
    send(
        &app,
        "POST",
        "/api/users",
        Some(payload("A", "a@example.com", "1234567890", &["x"])),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/users/reset-db", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "In-memory database has been reset");

    let (_, list) = send(&app, "GET", "/api/users", None).await;
    assert_eq!(list["total"], 0);

    let (_, created) = send(
        &app,
        "POST",
        "/api/users",
        Some(payload("A", "a@example.com", "1234567890", &["x"])),
    )
    .await;
    assert_eq!(created["data"]["_id"], "1");
}
