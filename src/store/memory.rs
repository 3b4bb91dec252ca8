//! In-memory store backend
//!
//! Backs tests and local development with the same contract as [`PgStore`].
//! The collection mutex makes `insert_unique` atomic, matching the unique
//! index the PostgreSQL backend relies on.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{text_of, Collection, Document, Filter, InsertOutcome, Sort, Store, StoreError};

#[derive(Debug, Clone)]
struct StoredDoc {
    id: Uuid,
    seq: u64,
    created_at: DateTime<Utc>,
    body: Map<String, Value>,
}

impl StoredDoc {
    fn to_document(&self) -> Document {
        Document {
            id: self.id,
            created_at: self.created_at,
            body: self.body.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    loans: Vec<StoredDoc>,
    loan_applications: Vec<StoredDoc>,
    users: Vec<StoredDoc>,
}

impl Inner {
    fn collection(&self, collection: Collection) -> &Vec<StoredDoc> {
        match collection {
            Collection::Loans => &self.loans,
            Collection::LoanApplications => &self.loan_applications,
            Collection::Users => &self.users,
        }
    }

    fn collection_mut(&mut self, collection: Collection) -> &mut Vec<StoredDoc> {
        match collection {
            Collection::Loans => &mut self.loans,
            Collection::LoanApplications => &mut self.loan_applications,
            Collection::Users => &mut self.users,
        }
    }

    fn push(
        &mut self,
        collection: Collection,
        body: Map<String, Value>,
        created_at: Option<DateTime<Utc>>,
    ) -> StoredDoc {
        self.next_seq += 1;
        let doc = StoredDoc {
            id: Uuid::new_v4(),
            seq: self.next_seq,
            created_at: created_at.unwrap_or_else(Utc::now),
            body,
        };
        self.collection_mut(collection).push(doc.clone());
        doc
    }
}

/// In-process store backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Query("store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(
        &self,
        collection: Collection,
        body: Map<String, Value>,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<Document, StoreError> {
        let mut inner = self.lock()?;
        Ok(inner.push(collection, body, created_at).to_document())
    }

    async fn insert_unique(
        &self,
        collection: Collection,
        key: &str,
        body: Map<String, Value>,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<InsertOutcome, StoreError> {
        let key_value = text_of(body.get(key).unwrap_or(&Value::Null));

        let mut inner = self.lock()?;
        if let Some(existing) = inner
            .collection(collection)
            .iter()
            .find(|d| d.body.get(key).map(text_of) == Some(key_value.clone()))
        {
            return Ok(InsertOutcome::AlreadyExists(existing.to_document()));
        }

        Ok(InsertOutcome::Inserted(
            inner.push(collection, body, created_at).to_document(),
        ))
    }

    async fn get(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .collection(collection)
            .iter()
            .find(|d| d.id == id)
            .map(StoredDoc::to_document))
    }

    async fn find(
        &self,
        collection: Collection,
        filter: Filter,
        sort: Sort,
    ) -> Result<Vec<Document>, StoreError> {
        let inner = self.lock()?;
        let mut matches: Vec<&StoredDoc> = inner
            .collection(collection)
            .iter()
            .filter(|d| filter.matches(&d.body))
            .collect();

        if sort == Sort::CreatedAtDesc {
            matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.seq.cmp(&b.seq)));
        }

        Ok(matches.into_iter().map(StoredDoc::to_document).collect())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: Filter,
    ) -> Result<Option<Document>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .collection(collection)
            .iter()
            .find(|d| filter.matches(&d.body))
            .map(StoredDoc::to_document))
    }

    async fn set_field(
        &self,
        collection: Collection,
        filter: Filter,
        field: &str,
        value: Value,
    ) -> Result<u64, StoreError> {
        let mut inner = self.lock()?;
        let mut touched = 0;
        for doc in inner.collection_mut(collection).iter_mut() {
            if filter.matches(&doc.body) {
                doc.body.insert(field.to_string(), value.clone());
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        let docs = inner.collection_mut(collection);
        let before = docs.len();
        docs.retain(|d| d.id != id);
        Ok(docs.len() < before)
    }
}
