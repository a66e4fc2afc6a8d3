//! In-memory stores

use async_trait::async_trait;
use dashmap::DashMap;

use super::{credential_key, CertificateStore, CredentialStore, ResolvedCertificate};
use crate::errors::{AuthError, Result};
use crate::models::Credential;

/// Credential store that lives as long as the process
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: DashMap<String, Credential>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn query(&self, url: &str, method: &str) -> Result<Option<Credential>> {
        Ok(self.entries.get(&credential_key(url, method)).map(|c| c.clone()))
    }

    async fn update(&self, url: &str, method: &str, credential: &Credential) -> Result<()> {
        self.entries.insert(credential_key(url, method), credential.clone());
        Ok(())
    }
}

/// Certificate store backed by a map of id to material
#[derive(Debug, Default)]
pub struct MemoryCertificateStore {
    certificates: DashMap<String, ResolvedCertificate>,
}

impl MemoryCertificateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: impl Into<String>, certificate: ResolvedCertificate) {
        self.certificates.insert(id.into(), certificate);
    }
}

#[async_trait]
impl CertificateStore for MemoryCertificateStore {
    async fn resolve(&self, id: &str) -> Result<ResolvedCertificate> {
        self.certificates
            .get(id)
            .map(|c| c.clone())
            .ok_or_else(|| AuthError::CertificateStore(format!("Unknown certificate: {}", id)))
    }
}
