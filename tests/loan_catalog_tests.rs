//! Loan catalog tests
//!
//! Append-only creation, lookup, and the unordered full scan.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use loanlink_server::services::LoanService;
use loanlink_server::store::MemoryStore;

fn payload(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("payload must be an object")
}

fn setup() -> LoanService {
    LoanService::new(Arc::new(MemoryStore::new()))
}

#[tokio::test]
async fn test_create_stamps_created_at_and_keeps_terms_opaque() {
    let service = setup();

    let before = Utc::now();
    let loan = service
        .create(payload(json!({
            "title": "Working capital",
            "interestRate": 12.5,
            "maxAmount": 100000,
            "id": "client-chosen",
            "createdAt": "1999-01-01T00:00:00Z",
        })))
        .await
        .unwrap();
    let after = Utc::now();

    assert!(loan.created_at >= before && loan.created_at <= after);
    assert_eq!(loan.payload["title"], json!("Working capital"));
    assert_eq!(loan.payload["interestRate"], json!(12.5));
    assert!(!loan.payload.contains_key("id"));
    assert!(!loan.payload.contains_key("createdAt"));
}

#[tokio::test]
async fn test_get_by_id_round_trip_and_absence() {
    let service = setup();

    let created = service
        .create(payload(json!({"title": "Equipment loan"})))
        .await
        .unwrap();

    let found = service.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.payload["title"], json!("Equipment loan"));

    assert!(service.get_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_returns_every_offer() {
    let service = setup();

    let a = service.create(payload(json!({"title": "A"}))).await.unwrap();
    let b = service.create(payload(json!({"title": "B"}))).await.unwrap();

    let listed = service.list().await.unwrap();
    assert_eq!(listed.len(), 2);

    let ids: Vec<Uuid> = listed.iter().map(|l| l.id).collect();
    assert!(ids.contains(&a.id));
    assert!(ids.contains(&b.id));
}
