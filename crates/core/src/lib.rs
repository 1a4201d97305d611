//! Domain logic for the Praxis marketplace backend.
//!
//! Everything in this crate is pure: no database access, no HTTP. The
//! `db` and `api` crates build on the types and rules defined here.

pub mod bookmark;
pub mod context;
pub mod error;
pub mod experience;
pub mod listing;
pub mod project;
pub mod roles;
pub mod types;
pub mod validation;
