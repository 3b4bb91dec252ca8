//! API handlers for the LoanLink backend

pub mod application;
pub mod loan;
pub mod user;

pub use application::{
    list_applications, list_applications_for_user, list_pending_applications, submit_application,
};
pub use loan::{create_loan, get_loan, list_loans};
pub use user::{get_user_by_email, list_users, register_user, set_user_role, suspend_user};
