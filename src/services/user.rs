//! User registry service
//!
//! Identity records are unique on email. Registration is idempotent: the
//! store's insert-if-absent arbitrates concurrent registrations for the same
//! email, so exactly one record can ever win.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::{RegisterUserRequest, RegisterUserResponse, User, UserRole};
use crate::store::{Collection, Filter, InsertOutcome, Sort, Store};

/// Service for user identity records
pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Register a user, or return the existing record unchanged.
    ///
    /// `createdAt` defaults to now when omitted; registrations may carry an
    /// externally assigned creation time from an upstream identity provider.
    pub async fn register(&self, request: RegisterUserRequest) -> Result<RegisterUserResponse> {
        let mut body = Map::new();
        body.insert("email".to_string(), Value::String(request.email));
        body.insert("name".to_string(), serde_json::to_value(request.name)?);
        body.insert("photo".to_string(), serde_json::to_value(request.photo)?);
        body.insert("role".to_string(), serde_json::to_value(request.role)?);

        let outcome = self
            .store
            .insert_unique(Collection::Users, "email", body, request.created_at)
            .await
            .context("Failed to register user")?;

        match outcome {
            InsertOutcome::Inserted(doc) => {
                tracing::info!(user_id = %doc.id, "User registered");
                Ok(RegisterUserResponse {
                    created: true,
                    user: doc.deserialize()?,
                })
            }
            InsertOutcome::AlreadyExists(doc) => Ok(RegisterUserResponse {
                created: false,
                user: doc.deserialize()?,
            }),
        }
    }

    /// Exact-match lookup; absence is a normal outcome
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let doc = self
            .store
            .find_one(Collection::Users, Filter::new().field("email", email))
            .await
            .context("Failed to look up user")?;

        doc.map(|d| d.deserialize().map_err(Into::into)).transpose()
    }

    /// Full scan of the registry
    pub async fn list(&self) -> Result<Vec<User>> {
        let docs = self
            .store
            .find(Collection::Users, Filter::new(), Sort::Unordered)
            .await
            .context("Failed to list users")?;

        docs.into_iter()
            .map(|doc| doc.deserialize().map_err(Into::into))
            .collect()
    }

    /// Update the role of the matching record. A no-op when no record
    /// matches; callers must not infer existence from success.
    pub async fn set_role(&self, email: &str, role: UserRole) -> Result<()> {
        let touched = self
            .store
            .set_field(
                Collection::Users,
                Filter::new().field("email", email),
                "role",
                serde_json::to_value(role)?,
            )
            .await
            .context("Failed to update user role")?;

        tracing::debug!(email, touched, "Role update applied");

        Ok(())
    }

    /// Delete the record with the given id; returns whether it existed.
    /// Despite the external "suspend" framing this is an irreversible delete.
    pub async fn remove(&self, id: Uuid) -> Result<bool> {
        let deleted = self
            .store
            .delete(Collection::Users, id)
            .await
            .context("Failed to delete user")?;

        if deleted {
            tracing::info!(user_id = %id, "User deleted");
        }

        Ok(deleted)
    }
}
