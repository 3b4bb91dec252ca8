//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::services::{ApplicationService, LoanService, UserService};
use crate::store::Store;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub application_service: Arc<ApplicationService>,
    pub user_service: Arc<UserService>,
    pub loan_service: Arc<LoanService>,
}

impl AppState {
    pub fn new(
        application_service: Arc<ApplicationService>,
        user_service: Arc<UserService>,
        loan_service: Arc<LoanService>,
    ) -> Self {
        Self {
            application_service,
            user_service,
            loan_service,
        }
    }

    /// Build the full service stack over one store backend
    pub fn from_store(store: Arc<dyn Store>) -> Self {
        Self::new(
            Arc::new(ApplicationService::new(store.clone())),
            Arc::new(UserService::new(store.clone())),
            Arc::new(LoanService::new(store)),
        )
    }
}

impl FromRef<AppState> for Arc<ApplicationService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.application_service.clone()
    }
}

impl FromRef<AppState> for Arc<UserService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.user_service.clone()
    }
}

impl FromRef<AppState> for Arc<LoanService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.loan_service.clone()
    }
}
