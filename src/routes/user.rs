//! User route definitions

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::handlers::{get_user_by_email, list_users, register_user, set_user_role, suspend_user};
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    // The router requires one parameter name per position: lookup captures an
    // email, suspension captures an id, both under `:user`.
    Router::new()
        .route("/users", post(register_user))
        .route("/users", get(list_users))
        .route("/users/:user", get(get_user_by_email))
        .route("/users/role/:email", patch(set_user_role))
        .route("/users/:user/suspend", delete(suspend_user))
}
