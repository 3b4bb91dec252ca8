//! HTTP surface tests
//!
//! Drives the full router over the in-memory store backend, one request per
//! `oneshot`, and checks the JSON contract of each endpoint.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use loanlink_server::routes;
use loanlink_server::state::AppState;
use loanlink_server::store::MemoryStore;

fn app() -> Router {
    let state = AppState::from_store(Arc::new(MemoryStore::new()));
    Router::new()
        .merge(routes::loan_routes())
        .merge(routes::application_routes())
        .merge(routes::user_routes())
        .with_state(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_submit_and_role_scoped_views() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/loan-applications",
        Some(json!({
            "applicantEmail": "a@x.com",
            "amount": 5000,
            "status": "Approved"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert!(body["data"]["id"].is_string());

    // Client-supplied status was discarded; the record is Pending/Unpaid.
    let (status, body) = send(&app, Method::GET, "/loan-applications", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body["data"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["status"], json!("Pending"));
    assert_eq!(listed[0]["applicationFeeStatus"], json!("Unpaid"));
    assert_eq!(listed[0]["amount"], json!(5000));
    assert_eq!(listed[0]["applicantEmail"], json!("a@x.com"));

    let (_, body) = send(&app, Method::GET, "/loan-applications/status/pending", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, Method::GET, "/loan-applications?status=Approved", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (_, body) = send(&app, Method::GET, "/loan-applications/user/a@x.com", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::GET, "/loan-applications/user/nobody@x.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_requires_applicant_email() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/loan-applications",
        Some(json!({"amount": 5000})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("BAD_REQUEST"));
}

#[tokio::test]
async fn test_status_filter_is_typed_at_the_boundary() {
    let app = app();

    // Only the exact enum literals parse; a casing drift is rejected instead
    // of silently matching nothing.
    let (status, _) = send(&app, Method::GET, "/loan-applications?status=pending", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_status_query_means_no_filter() {
    let app = app();

    send(
        &app,
        Method::POST,
        "/loan-applications",
        Some(json!({"applicantEmail": "a@x.com", "amount": 5000})),
    )
    .await;

    // `?status=` with no value is the unfiltered listing, not a parse error.
    let (status, body) = send(&app, Method::GET, "/loan-applications?status=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_user_registration_lookup_and_role() {
    let app = app();

    let register = json!({
        "email": "a@x.com",
        "name": "Alice",
        "photo": "https://x.com/a.png"
    });

    let (status, body) = send(&app, Method::POST, "/users", Some(register.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["created"], json!(true));
    assert_eq!(body["data"]["user"]["role"], json!("borrower"));

    let (_, body) = send(&app, Method::POST, "/users", Some(register)).await;
    assert_eq!(body["data"]["created"], json!(false));

    let (status, body) = send(&app, Method::GET, "/users/a@x.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], json!("a@x.com"));

    // Absence is empty data with 200, not an error.
    let (status, body) = send(&app, Method::GET, "/users/nobody@x.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Null);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/users/role/a@x.com",
        Some(json!({"role": "manager"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/users/a@x.com", None).await;
    assert_eq!(body["data"]["role"], json!("manager"));

    // Role mutation succeeds without a match; it must not imply existence.
    let (status, _) = send(
        &app,
        Method::PATCH,
        "/users/role/nobody@x.com",
        Some(json!({"role": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_suspend_deletes_and_reports_not_found() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/users/{}/suspend", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!("NOT_FOUND"));

    // Ids are opaque strings to callers; a malformed one is just an id that
    // matches no record, not a request shape error.
    let (status, body) = send(
        &app,
        Method::DELETE,
        "/users/not-an-id/suspend",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!("NOT_FOUND"));

    let (_, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"email": "a@x.com", "name": "Alice"})),
    )
    .await;
    let id = body["data"]["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/users/{}/suspend", id),
        Some(json!({"reason": "policy", "feedback": "duplicate account"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], json!(true));
    assert_eq!(body["data"]["reason"], json!("policy"));
    assert_eq!(body["data"]["feedback"], json!("duplicate account"));

    let (_, body) = send(&app, Method::GET, "/users/a@x.com", None).await;
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn test_loan_catalog_endpoints() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/loans",
        Some(json!({"title": "Working capital", "interestRate": 12.5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, "/loans", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body["data"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["title"], json!("Working capital"));

    let (status, body) = send(&app, Method::GET, &format!("/loans/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], json!(id));

    // Absence is empty data, not an error.
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/loans/{}", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Null);
}
