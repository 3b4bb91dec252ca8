//! Route definitions for the LoanLink API

mod application;
mod loan;
mod user;

pub use application::application_routes;
pub use loan::loan_routes;
pub use user::user_routes;
