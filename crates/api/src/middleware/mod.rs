//! Request-scoped middleware and extractors.
//!
//! - [`context::request_context`] -- builds the [`RequestContext`] for every
//!   request from the request id and an optional Bearer token.
//! - [`context::Ctx`] -- extracts that context in handlers.
//! - [`auth::AuthUser`] -- requires an authenticated caller.
//!
//! [`RequestContext`]: praxis_core::context::RequestContext

pub mod auth;
pub mod context;
