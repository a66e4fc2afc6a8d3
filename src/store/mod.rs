//! Credential and certificate stores
//!
//! The processors only see these traits. File backed implementations are used
//! by the binary, in-memory ones by tests and when persistence is turned off.

mod file;
mod memory;

pub use file::{FileCertificateStore, FileCredentialStore};
pub use memory::{MemoryCertificateStore, MemoryCredentialStore};

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{CertificateType, Credential};

/// Certificate material returned by a [`CertificateStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCertificate {
    pub cert_type: CertificateType,
    pub cert: String,
    pub key: Option<String>,
}

/// Looks up client certificates by their opaque id
#[async_trait]
pub trait CertificateStore: Send + Sync {
    async fn resolve(&self, id: &str) -> Result<ResolvedCertificate>;
}

/// Durable credentials, keyed by canonical URL and HTTP method
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn query(&self, url: &str, method: &str) -> Result<Option<Credential>>;

    async fn update(&self, url: &str, method: &str, credential: &Credential) -> Result<()>;
}

/// Key under which a credential is saved
pub(crate) fn credential_key(url: &str, method: &str) -> String {
    format!("{} {}", method.to_uppercase(), url)
}
