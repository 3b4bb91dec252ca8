//! Data models for the LoanLink backend
//!
//! Wire shapes are camelCase to match the documents the store holds. Loan and
//! application payloads are open field mappings captured with
//! `#[serde(flatten)]`; the core never interprets them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Lifecycle state of a loan application.
///
/// `submit` stamps `Pending` unconditionally; the read side filters on the
/// same typed literal, so write and filter can never drift apart on casing.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Allowed lifecycle transitions. No endpoint drives these yet; the
    /// table exists so a future transition operation cannot invent moves
    /// like `Approved -> Pending`.
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (ApplicationStatus::Pending, ApplicationStatus::Approved)
                | (ApplicationStatus::Pending, ApplicationStatus::Rejected)
        )
    }
}

/// Application fee state; tracked, never reconciled against a payment provider
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum FeeStatus {
    Unpaid,
    Paid,
}

/// User permission class
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Borrower,
    Manager,
    Admin,
}

/// A borrower's loan application
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    pub id: Uuid,
    pub applicant_email: String,
    pub status: ApplicationStatus,
    pub application_fee_status: FeeStatus,
    pub created_at: DateTime<Utc>,
    /// Client-supplied application fields, stored opaquely
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// A loan offer in the catalog; immutable once created
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Client-supplied offer terms, stored opaquely
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// User account record; `email` is the natural unique key
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub photo: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Registration request. `createdAt` may carry an externally assigned
/// creation time (e.g. from an upstream identity provider).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub email: String,
    pub name: Option<String>,
    pub photo: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    pub created_at: Option<DateTime<Utc>>,
}

/// Registration response: the record plus whether this call created it
#[derive(Debug, Serialize)]
pub struct RegisterUserResponse {
    pub created: bool,
    pub user: User,
}

/// Role mutation request body
#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: UserRole,
}

/// Removal request body; reason and feedback feed an external audit trail
/// and are echoed back, they do not affect the delete
#[derive(Debug, Default, Deserialize)]
pub struct SuspendUserRequest {
    pub reason: Option<String>,
    pub feedback: Option<String>,
}

/// Removal response
#[derive(Debug, Serialize)]
pub struct SuspendUserResponse {
    pub deleted: bool,
    pub reason: Option<String>,
    pub feedback: Option<String>,
}

/// Response DTO for application submission
#[derive(Debug, Serialize)]
pub struct SubmitApplicationResponse {
    pub id: Uuid,
}

/// Response DTO for loan creation
#[derive(Debug, Serialize)]
pub struct CreateLoanResponse {
    pub id: Uuid,
}

/// Query parameters for listing applications
#[derive(Debug, Deserialize)]
pub struct ListApplicationsQuery {
    #[serde(default, deserialize_with = "empty_status_as_none")]
    pub status: Option<ApplicationStatus>,
}

/// An empty `?status=` means no filter; anything non-empty must be an exact
/// status literal.
fn empty_status_as_none<'de, D>(deserializer: D) -> Result<Option<ApplicationStatus>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::IntoDeserializer;

    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => ApplicationStatus::deserialize(raw.into_deserializer()).map(Some),
    }
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}
