//! quicpulse-auth library interface
//!
//! The authorization negotiation layer of the quicpulse HTTP client: injects
//! configured and cached credentials into outgoing requests, detects 401
//! challenges, asks the user for credentials and re-dispatches the request.
//!
//! # Module Organization
//!
//! - [`canonical`] - Canonical URLs used as cache keys
//! - [`cache`] - Process-lifetime credential cache
//! - [`processors`] - Request and response authorization processors
//! - [`middleware`] - Per-scheme header injection (Basic, token)
//! - [`store`] - Credential and certificate stores
//! - [`prompt`] - Interactive credential prompts
//! - [`client`] - Transport (re-dispatch, reqwest sender)
//! - [`core`] - Pipeline driver used by the binary
//! - [`errors`] - Error types (AuthError, Result)

pub mod cache;
pub mod canonical;
pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod errors;
pub mod headers;
pub mod middleware;
pub mod models;
pub mod processors;
pub mod prompt;
pub mod signals;
pub mod status;
pub mod store;

pub use cache::CredentialCache;
pub use errors::{AuthError, Result};
pub use models::{ProcessingOutcome, RequestDescriptor, ResponseDescriptor};
pub use processors::{process_request_authorization, process_response_authorization, ExecutionContext};
