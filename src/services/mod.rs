//! Service layer for the LoanLink backend
//!
//! Each service owns the domain rules for one collection and talks to the
//! store port; no state survives between calls.

mod application;
mod loan;
mod user;

pub use application::ApplicationService;
pub use loan::LoanService;
pub use user::UserService;
