//! Loan catalog service
//!
//! Append-only catalog of loan offers. A loan has no lifecycle: once created
//! it is an immutable entry.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::Loan;
use crate::store::{Collection, Filter, Sort, Store};

/// Service for the loan offer catalog
pub struct LoanService {
    store: Arc<dyn Store>,
}

impl LoanService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create a loan offer: stamps `createdAt`, stores the terms opaquely.
    ///
    /// Not idempotent under retry: a retried call after a timeout creates a
    /// duplicate catalog entry.
    pub async fn create(&self, mut payload: Map<String, Value>) -> Result<Loan> {
        // Identity and creation time are store-assigned.
        payload.remove("id");
        payload.remove("createdAt");

        let doc = self
            .store
            .insert(Collection::Loans, payload, None)
            .await
            .context("Failed to insert loan")?;

        tracing::info!(loan_id = %doc.id, "Loan offer created");

        Ok(doc.deserialize()?)
    }

    /// Full scan of the catalog; no ordering is guaranteed
    pub async fn list(&self) -> Result<Vec<Loan>> {
        let docs = self
            .store
            .find(Collection::Loans, Filter::new(), Sort::Unordered)
            .await
            .context("Failed to list loans")?;

        docs.into_iter()
            .map(|doc| doc.deserialize().map_err(Into::into))
            .collect()
    }

    /// Exact lookup by id; absence is a normal outcome
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Loan>> {
        let doc = self
            .store
            .get(Collection::Loans, id)
            .await
            .context("Failed to look up loan")?;

        doc.map(|d| d.deserialize().map_err(Into::into)).transpose()
    }
}
