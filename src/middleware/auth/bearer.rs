//! Token authentication (RFC 6750 style `<type> <token>` header)

use crate::headers::set_header;

/// Access token delivered in a request header
#[derive(Debug, Clone)]
pub struct BearerAuth {
    token_type: String,
    token: String,
    header_name: String,
}

impl BearerAuth {
    /// Create new Bearer auth delivered in the `authorization` header
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token_type: "Bearer".to_string(),
            token: token.into(),
            header_name: "authorization".to_string(),
        }
    }

    /// Override the token type prefix (e.g. `MAC`, `DPoP`)
    pub fn token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = token_type.into();
        self
    }

    /// Deliver the token in a different header
    pub fn header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    pub fn header_value(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }

    /// Replace or insert the token header in a header block
    pub fn apply(&self, headers: &mut String) {
        *headers = set_header(headers, &self.header_name, &self.header_value());
    }
}
