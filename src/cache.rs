//! Process-lifetime credential cache
//!
//! Credentials confirmed by the user are kept here, keyed by scheme and
//! canonical URL, so later requests to the same endpoint are authorized
//! without prompting again. Entries never expire and the last write wins.
//!
//! The cache is an explicit component: construct one, wrap it in an `Arc` and
//! hand it to both processors. Independent instances never share entries.

use dashmap::DashMap;

use crate::canonical::canonical_url;
use crate::models::{AuthScheme, CachedCredential};

/// Thread-safe credential cache (DashMap for non-blocking concurrent access)
#[derive(Debug, Default)]
pub struct CredentialCache {
    entries: DashMap<(AuthScheme, String), CachedCredential>,
}

impl CredentialCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the cached credential for a scheme and URL
    pub fn lookup(&self, scheme: AuthScheme, url: &str) -> Option<CachedCredential> {
        if url.is_empty() {
            return None;
        }
        let key = (scheme, canonical_url(url));
        self.entries.get(&key).map(|entry| entry.clone())
    }

    /// Store a credential, replacing any previous one for the same key
    pub fn store(&self, scheme: AuthScheme, url: &str, credential: CachedCredential) {
        let key = (scheme, canonical_url(url));
        self.entries.insert(key, credential);
    }

    /// Drop every cached credential
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
