//! Praxis API server library.
//!
//! Exposes the building blocks (config, state, error filter, services,
//! routes) so integration tests and the binary entrypoint can both use them.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod query;
pub mod reporting;
pub mod response;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
