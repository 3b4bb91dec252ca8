//! Application lifecycle and query engine
//!
//! The intake guard and the role-scoped filtered views over loan
//! applications. Every view is a fresh store read ordered most-recent-first.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::models::{ApplicationStatus, FeeStatus, LoanApplication};
use crate::store::{Collection, Filter, Sort, Store};

/// Fields only the server may write on an application document. Anything a
/// client supplies under these names is discarded, never trusted.
const SERVER_OWNED_FIELDS: [&str; 4] = ["id", "status", "applicationFeeStatus", "createdAt"];

/// Service for the loan-application lifecycle
pub struct ApplicationService {
    store: Arc<dyn Store>,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Submit a new application for the given applicant.
    ///
    /// Strips/overwrites the server-owned fields: `status` becomes `Pending`,
    /// `applicationFeeStatus` becomes `Unpaid`, `createdAt` is stamped by the
    /// store. The rest of the payload is stored opaquely.
    ///
    /// Not idempotent under retry: a retried call after a timeout creates a
    /// second application.
    pub async fn submit(
        &self,
        mut payload: Map<String, Value>,
        applicant_email: String,
    ) -> Result<LoanApplication> {
        for field in SERVER_OWNED_FIELDS {
            payload.remove(field);
        }
        payload.insert("applicantEmail".to_string(), Value::String(applicant_email));
        payload.insert(
            "status".to_string(),
            serde_json::to_value(ApplicationStatus::Pending)?,
        );
        payload.insert(
            "applicationFeeStatus".to_string(),
            serde_json::to_value(FeeStatus::Unpaid)?,
        );

        let doc = self
            .store
            .insert(Collection::LoanApplications, payload, None)
            .await
            .context("Failed to insert loan application")?;

        tracing::info!(application_id = %doc.id, "Loan application submitted");

        Ok(doc.deserialize()?)
    }

    /// List applications, optionally filtered by exact status, most recent
    /// first (stable on ties in creation order)
    pub async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<LoanApplication>> {
        let mut filter = Filter::new();
        if let Some(status) = status {
            filter = filter.field("status", serde_json::to_value(status)?);
        }

        let docs = self
            .store
            .find(Collection::LoanApplications, filter, Sort::CreatedAtDesc)
            .await
            .context("Failed to list loan applications")?;

        docs.into_iter()
            .map(|doc| doc.deserialize().map_err(Into::into))
            .collect()
    }

    /// Borrower-scoped view: the given applicant's applications, same
    /// ordering. Empty for an unknown email, never an error.
    pub async fn list_for_user(&self, email: &str) -> Result<Vec<LoanApplication>> {
        let docs = self
            .store
            .find(
                Collection::LoanApplications,
                Filter::new().field("applicantEmail", email),
                Sort::CreatedAtDesc,
            )
            .await
            .context("Failed to list loan applications for user")?;

        docs.into_iter()
            .map(|doc| doc.deserialize().map_err(Into::into))
            .collect()
    }

    /// Manager-scoped view: applications still pending review
    pub async fn list_pending(&self) -> Result<Vec<LoanApplication>> {
        self.list(Some(ApplicationStatus::Pending)).await
    }
}
