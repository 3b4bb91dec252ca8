//! Loan-application route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{
    list_applications, list_applications_for_user, list_pending_applications, submit_application,
};
use crate::state::AppState;

pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/loan-applications", post(submit_application))
        .route("/loan-applications", get(list_applications))
        .route(
            "/loan-applications/user/:email",
            get(list_applications_for_user),
        )
        .route(
            "/loan-applications/status/pending",
            get(list_pending_applications),
        )
}
