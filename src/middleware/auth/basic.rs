//! HTTP Basic Authentication (RFC 7617)

use base64::Engine;

use crate::headers::set_header;

/// HTTP Basic Authentication, held as its encoded `username:password` hash
#[derive(Debug, Clone)]
pub struct BasicAuth {
    hash: String,
}

impl BasicAuth {
    /// Create new Basic auth with username and password
    pub fn new(username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        let credentials = format!("{}:{}", username.as_ref(), password.as_ref());
        Self {
            hash: base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes()),
        }
    }

    /// Wrap an already encoded hash (as kept in the credential cache)
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    pub fn hash(&self) -> String {
        self.hash.clone()
    }

    pub fn header_value(&self) -> String {
        format!("Basic {}", self.hash)
    }

    /// Replace or insert the `authorization` header in a header block
    pub fn apply(&self, headers: &mut String) {
        *headers = set_header(headers, "authorization", &self.header_value());
    }
}
