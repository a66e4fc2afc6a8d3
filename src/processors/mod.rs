//! Request and response authorization processors
//!
//! - [`process_request_authorization`] runs before a request is sent and injects
//!   configured or cached credentials.
//! - [`process_response_authorization`] runs after a response arrives and, on a
//!   supported 401 challenge, asks the user for credentials and re-dispatches
//!   the request once.
//!
//! Both receive exclusive access to the request record for the duration of the
//! call, plus the shared [`ExecutionContext`] and the request's cancellation token.

mod cached;
mod request;
mod response;

pub use cached::apply_cached_credentials;
pub use request::process_request_authorization;
pub use response::{challenge_scheme, process_response_authorization};

use std::fmt;
use std::sync::Arc;

use crate::cache::CredentialCache;
use crate::client::Transport;
use crate::prompt::AuthPrompt;
use crate::store::{CertificateStore, CredentialStore};

/// Collaborators shared by every request in flight
#[derive(Clone)]
pub struct ExecutionContext {
    pub cache: Arc<CredentialCache>,
    pub certificates: Arc<dyn CertificateStore>,
    pub credentials: Arc<dyn CredentialStore>,
    pub prompt: Arc<dyn AuthPrompt>,
    pub transport: Arc<dyn Transport>,
}

impl ExecutionContext {
    pub fn new(
        cache: Arc<CredentialCache>,
        certificates: Arc<dyn CertificateStore>,
        credentials: Arc<dyn CredentialStore>,
        prompt: Arc<dyn AuthPrompt>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            cache,
            certificates,
            credentials,
            prompt,
            transport,
        }
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
