//! Loan route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{create_loan, get_loan, list_loans};
use crate::state::AppState;

pub fn loan_routes() -> Router<AppState> {
    Router::new()
        .route("/loans", get(list_loans))
        .route("/loans/:id", get(get_loan))
        .route("/loans", post(create_loan))
}
