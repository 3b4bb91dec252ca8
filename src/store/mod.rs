//! Persistent store port for LoanLink
//!
//! The marketplace keeps all state in an external document store with three
//! named collections. This module defines the store contract the services
//! consume: create / read / delete / field-update plus a filtered-sorted-list
//! primitive. Two backends implement it: [`PgStore`] (PostgreSQL, JSONB
//! document tables) and [`MemoryStore`] (in-process, for tests and local
//! development).
//!
//! The port deliberately carries an atomic [`Store::insert_unique`] so that
//! email-unique registration is a single conditional write against the store
//! rather than a racy check-then-insert round trip.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// The three collections owned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Loans,
    LoanApplications,
    Users,
}

impl Collection {
    /// Backing table name for this collection
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Loans => "loans",
            Collection::LoanApplications => "loan_applications",
            Collection::Users => "users",
        }
    }
}

/// Store operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store operation failed: {0}")]
    Query(String),

    #[error("Stored document is malformed: {0}")]
    Corrupt(String),
}

/// A stored document: store-assigned identity and creation time plus the
/// open field mapping supplied at write time.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub body: Map<String, Value>,
}

impl Document {
    /// Deserialize the document into a typed model, exposing the
    /// store-assigned `id` and `createdAt` as regular wire fields.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        let mut body = self.body;
        body.insert("id".to_string(), Value::String(self.id.to_string()));
        let created_at = serde_json::to_value(self.created_at)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        body.insert("createdAt".to_string(), created_at);

        serde_json::from_value(Value::Object(body)).map_err(|e| StoreError::Corrupt(e.to_string()))
    }
}

/// Conjunction of exact field-equality conditions against document fields
#[derive(Debug, Clone, Default)]
pub struct Filter {
    fields: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exact-match condition on a document field
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether a document body satisfies every condition. Comparison is on
    /// the textual form of the field, matching the Postgres `->>` operator.
    pub(crate) fn matches(&self, body: &Map<String, Value>) -> bool {
        self.fields.iter().all(|(name, want)| {
            body.get(name)
                .map(|have| text_of(have) == text_of(want))
                .unwrap_or(false)
        })
    }
}

/// Textual form of a JSON value, as Postgres `doc->>'field'` would render it
pub(crate) fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Ordering applied by [`Store::find`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sort {
    /// No ordering guaranteed (full-scan contract)
    #[default]
    Unordered,
    /// Most recent first; equal timestamps keep creation order
    CreatedAtDesc,
}

/// Outcome of an insert-if-absent write
#[derive(Debug)]
pub enum InsertOutcome {
    /// A new document was created
    Inserted(Document),
    /// A document with the same unique key already existed; it is returned
    /// unchanged
    AlreadyExists(Document),
}

/// The store contract consumed by every service.
///
/// Each call is one round trip; the store gives no cross-call ordering or
/// read-after-write guarantees, and nothing here is retried internally.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a document, assigning a fresh id. `created_at` defaults to the
    /// store's clock when not supplied.
    async fn insert(
        &self,
        collection: Collection,
        body: Map<String, Value>,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<Document, StoreError>;

    /// Insert a document only if no document shares its value for `key`.
    /// Atomic against concurrent inserts for the same key.
    async fn insert_unique(
        &self,
        collection: Collection,
        key: &str,
        body: Map<String, Value>,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<InsertOutcome, StoreError>;

    /// Exact lookup by store-assigned id
    async fn get(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, StoreError>;

    /// Filtered, optionally ordered scan. A fresh read on every call.
    async fn find(
        &self,
        collection: Collection,
        filter: Filter,
        sort: Sort,
    ) -> Result<Vec<Document>, StoreError>;

    /// First document matching the filter, if any
    async fn find_one(
        &self,
        collection: Collection,
        filter: Filter,
    ) -> Result<Option<Document>, StoreError>;

    /// Set one field on every document matching the filter; returns the
    /// number of documents touched (zero is not an error).
    async fn set_field(
        &self,
        collection: Collection,
        filter: Filter,
        field: &str,
        value: Value,
    ) -> Result<u64, StoreError>;

    /// Delete by id; returns whether a document existed
    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_matches_textual_form() {
        let mut body = Map::new();
        body.insert("status".to_string(), json!("Pending"));
        body.insert("amount".to_string(), json!(5000));

        assert!(Filter::new().field("status", "Pending").matches(&body));
        assert!(!Filter::new().field("status", "pending").matches(&body));
        assert!(Filter::new().field("amount", "5000").matches(&body));
        assert!(!Filter::new().field("missing", "x").matches(&body));
    }

    #[test]
    fn test_filter_conjunction() {
        let mut body = Map::new();
        body.insert("a".to_string(), json!("1"));
        body.insert("b".to_string(), json!("2"));

        assert!(Filter::new().field("a", "1").field("b", "2").matches(&body));
        assert!(!Filter::new().field("a", "1").field("b", "3").matches(&body));
        assert!(Filter::new().matches(&body));
    }

    #[test]
    fn test_document_deserialize_exposes_store_fields() {
        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Probe {
            id: Uuid,
            created_at: DateTime<Utc>,
            name: String,
        }

        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let mut body = Map::new();
        body.insert("name".to_string(), json!("loanlink"));

        let probe: Probe = Document {
            id,
            created_at,
            body,
        }
        .deserialize()
        .unwrap();

        assert_eq!(probe.id, id);
        assert_eq!(probe.created_at, created_at);
        assert_eq!(probe.name, "loanlink");
    }
}
