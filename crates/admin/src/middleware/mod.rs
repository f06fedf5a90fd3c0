//! HTTP middleware for admin.
//!
//! Request tracing is installed on the router in [`crate::routes::app`];
//! this module holds the request extractors: the sign-in gates for protected
//! routes and the body, path and query wrappers that reject with JSON.

pub mod auth;
pub mod extract;

pub use auth::{OptionalAuth, RequireAuth};
pub use extract::{AppJson, AppPath, AppQuery};
