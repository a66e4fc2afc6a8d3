//! Request middleware
//!
//! Header injection for the authorization schemes that are applied directly
//! to the request, using sum types rather than trait objects.

pub mod auth;

pub use auth::{Auth, BasicAuth, BearerAuth};
