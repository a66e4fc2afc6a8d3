//! Credentials collected from the user and their cached forms

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::middleware::auth::BasicAuth;

/// Challenge schemes this layer can answer interactively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    Basic,
    Ntlm,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Basic => "basic",
            AuthScheme::Ntlm => "ntlm",
        }
    }

    /// Classify a `WWW-Authenticate` value (case-insensitive substring match).
    ///
    /// NTLM wins when both appear. Anything else is unsupported.
    pub fn from_challenge(value: &str) -> Option<Self> {
        let value = value.to_lowercase();
        if value.contains("ntlm") {
            Some(AuthScheme::Ntlm)
        } else if value.contains("basic") {
            Some(AuthScheme::Basic)
        } else {
            None
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Username/password (and NTLM domain) as entered by the user or saved in the store
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            domain: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

// Passwords stay out of logs and panics
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("domain", &self.domain)
            .finish()
    }
}

/// Value kept in the credential cache
#[derive(Clone, PartialEq, Eq)]
pub enum CachedCredential {
    /// Precomputed base64 of `username:password`
    Basic { hash: String },
    Ntlm {
        username: String,
        password: String,
        domain: Option<String>,
    },
}

impl CachedCredential {
    /// Build the cache value for a credential confirmed for `scheme`
    pub fn from_credential(scheme: AuthScheme, credential: &Credential) -> Self {
        match scheme {
            AuthScheme::Basic => CachedCredential::Basic {
                hash: BasicAuth::new(&credential.username, &credential.password).hash(),
            },
            AuthScheme::Ntlm => CachedCredential::Ntlm {
                username: credential.username.clone(),
                password: credential.password.clone(),
                domain: credential.domain.clone(),
            },
        }
    }
}

impl fmt::Debug for CachedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CachedCredential::Basic { .. } => f.write_str("CachedCredential::Basic([REDACTED])"),
            CachedCredential::Ntlm { username, domain, .. } => f
                .debug_struct("CachedCredential::Ntlm")
                .field("username", username)
                .field("domain", domain)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_classification() {
        assert_eq!(AuthScheme::from_challenge("Basic realm=x"), Some(AuthScheme::Basic));
        assert_eq!(AuthScheme::from_challenge("NTLM"), Some(AuthScheme::Ntlm));
        assert_eq!(AuthScheme::from_challenge("Negotiate, NTLM, Basic realm=\"corp\""), Some(AuthScheme::Ntlm));
        assert_eq!(AuthScheme::from_challenge("bAsIc"), Some(AuthScheme::Basic));
        assert_eq!(AuthScheme::from_challenge("Bearer realm=\"api\""), None);
        assert_eq!(AuthScheme::from_challenge("Digest nonce=\"abc\""), None);
    }

    #[test]
    fn test_basic_cache_value_is_hashed() {
        let cached = CachedCredential::from_credential(AuthScheme::Basic, &Credential::new("a", "b"));
        assert_eq!(cached, CachedCredential::Basic { hash: "YTpi".to_string() });
    }

    #[test]
    fn test_debug_redacts_password() {
        let credential = Credential::new("alice", "s3cret").with_domain("CORP");
        let debug = format!("{:?}", credential);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("s3cret"));
    }
}
