//! LoanLink Backend Library
//!
//! Core modules for the LoanLink lending-marketplace server: the persistent
//! store port, the three domain services (applications, users, loans), and
//! the HTTP surface around them.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
