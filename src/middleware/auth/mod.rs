//! Header based authentication
//!
//! Provides authentication via enum variants rather than trait objects.
//! Each variant knows how to turn its configuration into a header on the
//! raw header block of a request.

mod basic;
mod bearer;

pub use basic::BasicAuth;
pub use bearer::BearerAuth;

use tracing::debug;

use crate::models::{BasicConfig, OAuth2Config};

/// Header authentication method - sum type over the supported schemes
#[derive(Debug, Clone)]
pub enum Auth {
    /// HTTP Basic Authentication (RFC 7617)
    Basic(BasicAuth),
    /// Token authentication (`<tokenType> <accessToken>`)
    Bearer(BearerAuth),
}

impl Auth {
    /// Create Basic authentication
    pub fn basic(username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        Auth::Basic(BasicAuth::new(username, password))
    }

    /// Create Bearer token authentication
    pub fn from_basic_config(config: &BasicConfig) -> Option<Self> {
        let username = config.username.as_deref().filter(|u| !u.is_empty())?;
        let password = config.password.as_deref().unwrap_or("");
        Some(Auth::basic(username, password))
    }

    /// Token auth from an entry config.
    ///
    /// Returns `None` without a token, and for any delivery method other than
    /// `header` (query parameter delivery is not supported).
    pub fn from_oauth2_config(config: &OAuth2Config) -> Option<Self> {
        let token = config.access_token.as_deref().filter(|t| !t.is_empty())?;
        if config.delivery_method != "header" {
            debug!(delivery_method = %config.delivery_method, "Unsupported OAuth 2 token delivery, skipping");
            return None;
        }
        Some(Auth::Bearer(
            BearerAuth::new(token)
                .token_type(&config.token_type)
                .header_name(&config.delivery_name),
        ))
    }

    /// Apply authentication to a raw header block
    pub fn apply(&self, headers: &mut String) {
        match self {
            Auth::Basic(auth) => auth.apply(headers),
            Auth::Bearer(auth) => auth.apply(headers),
        }
    }

    /// Authentication type name for display/debugging
    pub fn type_name(&self) -> &'static str {
        match self {
            Auth::Basic(_) => "basic",
            Auth::Bearer(_) => "bearer",
        }
    }
}
