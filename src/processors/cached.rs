//! Applying credentials remembered in the credential cache

use tracing::debug;

use crate::cache::CredentialCache;
use crate::middleware::auth::BasicAuth;
use crate::models::{AuthScheme, AuthorizationEntry, AuthorizationMethod, CachedCredential, NtlmConfig, RequestDescriptor};

/// Apply a cached credential for the request URL.
///
/// Basic is tried first, then NTLM. Returns whether anything was found.
pub fn apply_cached_credentials(request: &mut RequestDescriptor, cache: &CredentialCache) -> bool {
    let cached = cache
        .lookup(AuthScheme::Basic, &request.url)
        .or_else(|| cache.lookup(AuthScheme::Ntlm, &request.url));

    match cached {
        Some(CachedCredential::Basic { hash }) => {
            debug!(request_id = %request.id, "Applying cached basic credentials");
            BasicAuth::from_hash(hash).apply(&mut request.headers);
            true
        }
        Some(CachedCredential::Ntlm { username, password, domain }) => {
            debug!(request_id = %request.id, "Applying cached NTLM credentials");
            apply_ntlm(request, username, password, domain);
            true
        }
        None => false,
    }
}

/// Merge NTLM credentials into the request's NTLM entry, creating it if needed.
///
/// A username already present on the entry is never overwritten.
fn apply_ntlm(request: &mut RequestDescriptor, username: String, password: String, domain: Option<String>) {
    let position = request
        .authorization
        .iter()
        .position(|entry| matches!(entry.method, AuthorizationMethod::Ntlm(_)));

    let entry = match position {
        Some(index) => &mut request.authorization[index],
        None => {
            request
                .authorization
                .push(AuthorizationEntry::new(AuthorizationMethod::Ntlm(None)));
            let last = request.authorization.len() - 1;
            &mut request.authorization[last]
        }
    };
    entry.enabled = true;

    let AuthorizationMethod::Ntlm(config) = &mut entry.method else {
        return;
    };
    let config = config.get_or_insert_with(NtlmConfig::default);
    if config.username.as_deref().is_some_and(|u| !u.is_empty()) {
        return;
    }
    config.username = Some(username);
    config.password = Some(password);
    config.domain = domain;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ntlm_config(request: &RequestDescriptor) -> NtlmConfig {
        request
            .authorization
            .iter()
            .find_map(|entry| match &entry.method {
                AuthorizationMethod::Ntlm(Some(config)) => Some(config.clone()),
                _ => None,
            })
            .expect("ntlm entry")
    }

    fn ntlm(username: &str) -> CachedCredential {
        CachedCredential::Ntlm {
            username: username.to_string(),
            password: "pw".to_string(),
            domain: Some("CORP".to_string()),
        }
    }

    #[test]
    fn test_nothing_cached() {
        let cache = CredentialCache::new();
        let mut request = RequestDescriptor::new("GET", "http://h/a");
        assert!(!apply_cached_credentials(&mut request, &cache));
        assert!(request.headers.is_empty());
        assert!(request.authorization.is_empty());
    }

    #[test]
    fn test_basic_preferred_over_ntlm() {
        let cache = CredentialCache::new();
        cache.store(AuthScheme::Ntlm, "http://h/a", ntlm("nt"));
        cache.store(AuthScheme::Basic, "http://h/a", CachedCredential::Basic { hash: "YTpi".into() });

        let mut request = RequestDescriptor::new("GET", "http://h/a?page=1");
        assert!(apply_cached_credentials(&mut request, &cache));
        assert_eq!(request.headers, "authorization: Basic YTpi");
        assert!(request.authorization.is_empty());
    }

    #[test]
    fn test_ntlm_creates_entry() {
        let cache = CredentialCache::new();
        cache.store(AuthScheme::Ntlm, "http://h/a", ntlm("nt"));

        let mut request = RequestDescriptor::new("GET", "http://h/a");
        apply_cached_credentials(&mut request, &cache);

        assert_eq!(request.authorization.len(), 1);
        assert!(request.authorization[0].enabled);
        let config = ntlm_config(&request);
        assert_eq!(config.username.as_deref(), Some("nt"));
        assert_eq!(config.domain.as_deref(), Some("CORP"));
    }

    #[test]
    fn test_ntlm_reenables_existing_entry() {
        let cache = CredentialCache::new();
        cache.store(AuthScheme::Ntlm, "http://h/a", ntlm("nt"));

        let mut request = RequestDescriptor::new("GET", "http://h/a")
            .with_authorization(AuthorizationEntry::new(AuthorizationMethod::Ntlm(None)).disabled());
        apply_cached_credentials(&mut request, &cache);

        assert_eq!(request.authorization.len(), 1);
        assert!(request.authorization[0].enabled);
        assert_eq!(ntlm_config(&request).username.as_deref(), Some("nt"));
    }

    #[test]
    fn test_ntlm_username_filled_once() {
        let cache = CredentialCache::new();
        cache.store(AuthScheme::Ntlm, "http://h/a", ntlm("first"));

        let mut request = RequestDescriptor::new("GET", "http://h/a");
        apply_cached_credentials(&mut request, &cache);

        cache.store(AuthScheme::Ntlm, "http://h/a", ntlm("second"));
        apply_cached_credentials(&mut request, &cache);

        assert_eq!(request.authorization.len(), 1);
        assert_eq!(ntlm_config(&request).username.as_deref(), Some("first"));
    }
}
