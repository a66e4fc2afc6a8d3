//! Authorization entries attached to a request
//!
//! A request carries an ordered list of [`AuthorizationEntry`] values. Each entry
//! names a scheme and holds a scheme specific configuration, which may be missing
//! or only partially filled in while a user is still editing the request.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Basic authorization configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// NTLM authorization configuration.
///
/// The handshake itself happens on the socket, so the entry is handed to the
/// transport as-is. It is filled from the credential cache at most once per
/// request object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NtlmConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// OAuth 2.0 token application settings (token acquisition happens elsewhere)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default = "default_delivery_method")]
    pub delivery_method: String,
    #[serde(default = "default_delivery_name")]
    pub delivery_name: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn default_delivery_method() -> String {
    "header".to_string()
}

fn default_delivery_name() -> String {
    "authorization".to_string()
}

impl Default for OAuth2Config {
    fn default() -> Self {
        Self {
            access_token: None,
            token_type: default_token_type(),
            delivery_method: default_delivery_method(),
            delivery_name: default_delivery_name(),
        }
    }
}

/// Reference to a certificate held by the certificate store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCertificateConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Authorization method with its (possibly absent) configuration.
///
/// Unrecognized type names are kept as [`AuthorizationMethod::Unknown`] so that
/// requests written by newer clients still load and round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthorizationMethod {
    Basic(Option<BasicConfig>),
    Ntlm(Option<NtlmConfig>),
    OAuth2(Option<OAuth2Config>),
    ClientCertificate(Option<ClientCertificateConfig>),
    Unknown {
        kind: String,
        config: Option<JsonValue>,
    },
}

impl AuthorizationMethod {
    /// Type name used when serializing
    pub fn type_name(&self) -> &str {
        match self {
            AuthorizationMethod::Basic(_) => "basic",
            AuthorizationMethod::Ntlm(_) => "ntlm",
            AuthorizationMethod::OAuth2(_) => "oauth 2",
            AuthorizationMethod::ClientCertificate(_) => "client certificate",
            AuthorizationMethod::Unknown { kind, .. } => kind,
        }
    }

    /// Whether a configuration payload is attached
    pub fn has_config(&self) -> bool {
        match self {
            AuthorizationMethod::Basic(c) => c.is_some(),
            AuthorizationMethod::Ntlm(c) => c.is_some(),
            AuthorizationMethod::OAuth2(c) => c.is_some(),
            AuthorizationMethod::ClientCertificate(c) => c.is_some(),
            AuthorizationMethod::Unknown { config, .. } => config.is_some(),
        }
    }
}

/// One authorization entry of a request.
///
/// Loading never fails on a bad entry: a config that does not match its type
/// is dropped, so the entry is skipped without affecting its siblings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAuthorizationEntry", into = "RawAuthorizationEntry")]
pub struct AuthorizationEntry {
    pub enabled: bool,
    pub method: AuthorizationMethod,
}

impl AuthorizationEntry {
    pub fn new(method: AuthorizationMethod) -> Self {
        Self { enabled: true, method }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(AuthorizationMethod::Basic(Some(BasicConfig {
            username: Some(username.into()),
            password: Some(password.into()),
        })))
    }

    pub fn oauth2(config: OAuth2Config) -> Self {
        Self::new(AuthorizationMethod::OAuth2(Some(config)))
    }

    pub fn client_certificate(id: impl Into<String>) -> Self {
        Self::new(AuthorizationMethod::ClientCertificate(Some(ClientCertificateConfig {
            id: Some(id.into()),
        })))
    }

    /// Disable the entry (builder style)
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Wire shape: `{ "type": "...", "enabled": bool, "config": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawAuthorizationEntry {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    config: Option<JsonValue>,
}

fn typed_config<T: DeserializeOwned>(kind: &str, config: Option<JsonValue>) -> Option<T> {
    match config {
        None | Some(JsonValue::Null) => None,
        Some(value) => match serde_json::from_value(value) {
            Ok(config) => Some(config),
            Err(e) => {
                debug!(kind = %kind, error = %e, "Ignoring malformed authorization config");
                None
            }
        },
    }
}

impl From<RawAuthorizationEntry> for AuthorizationEntry {
    fn from(raw: RawAuthorizationEntry) -> Self {
        let kind = raw.kind.to_lowercase();
        let method = match kind.as_str() {
            "basic" => AuthorizationMethod::Basic(typed_config(&kind, raw.config)),
            "ntlm" => AuthorizationMethod::Ntlm(typed_config(&kind, raw.config)),
            "oauth 2" | "oauth2" => AuthorizationMethod::OAuth2(typed_config(&kind, raw.config)),
            "client certificate" | "client-certificate" => {
                AuthorizationMethod::ClientCertificate(typed_config(&kind, raw.config))
            }
            _ => AuthorizationMethod::Unknown {
                kind: raw.kind,
                config: raw.config,
            },
        };
        Self {
            enabled: raw.enabled.unwrap_or(false),
            method,
        }
    }
}

fn raw_config<T: Serialize>(config: Option<T>) -> Option<JsonValue> {
    config.and_then(|c| serde_json::to_value(c).ok())
}

impl From<AuthorizationEntry> for RawAuthorizationEntry {
    fn from(entry: AuthorizationEntry) -> Self {
        let kind = entry.method.type_name().to_string();
        let config = match entry.method {
            AuthorizationMethod::Basic(c) => raw_config(c),
            AuthorizationMethod::Ntlm(c) => raw_config(c),
            AuthorizationMethod::OAuth2(c) => raw_config(c),
            AuthorizationMethod::ClientCertificate(c) => raw_config(c),
            AuthorizationMethod::Unknown { config, .. } => config,
        };
        Self {
            kind,
            enabled: Some(entry.enabled),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: JsonValue) -> AuthorizationEntry {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_basic() {
        let entry = parse(json!({"type": "basic", "enabled": true, "config": {"username": "u", "password": "p"}}));
        assert!(entry.enabled);
        assert_eq!(entry.method, AuthorizationMethod::Basic(Some(BasicConfig {
            username: Some("u".into()),
            password: Some("p".into()),
        })));
    }

    #[test]
    fn test_type_aliases() {
        let entry = parse(json!({"type": "oauth 2", "enabled": true, "config": {"accessToken": "t"}}));
        assert!(matches!(entry.method, AuthorizationMethod::OAuth2(Some(_))));

        let entry = parse(json!({"type": "client-certificate", "enabled": true, "config": {"id": "c1"}}));
        assert!(matches!(entry.method, AuthorizationMethod::ClientCertificate(Some(_))));

        let entry = parse(json!({"type": "Client Certificate", "enabled": true}));
        assert_eq!(entry.method, AuthorizationMethod::ClientCertificate(None));
    }

    #[test]
    fn test_oauth2_defaults() {
        let entry = parse(json!({"type": "oauth2", "enabled": true, "config": {"accessToken": "t"}}));
        let AuthorizationMethod::OAuth2(Some(config)) = entry.method else {
            panic!("expected oauth2 config");
        };
        assert_eq!(config.token_type, "Bearer");
        assert_eq!(config.delivery_method, "header");
        assert_eq!(config.delivery_name, "authorization");
    }

    #[test]
    fn test_missing_config_and_enabled() {
        let entry = parse(json!({"type": "ntlm"}));
        assert!(!entry.enabled);
        assert!(!entry.method.has_config());

        let entry = parse(json!({"type": "basic", "enabled": true, "config": null}));
        assert_eq!(entry.method, AuthorizationMethod::Basic(None));
    }

    #[test]
    fn test_malformed_config_is_dropped() {
        let entry = parse(json!({"type": "oauth 2", "enabled": true, "config": {"tokenType": null}}));
        assert!(entry.enabled);
        assert_eq!(entry.method, AuthorizationMethod::OAuth2(None));

        let entry = parse(json!({"type": "client certificate", "enabled": false, "config": {"id": 42}}));
        assert_eq!(entry.method, AuthorizationMethod::ClientCertificate(None));

        let entry = parse(json!({"type": "basic", "enabled": true, "config": "u:p"}));
        assert_eq!(entry.method, AuthorizationMethod::Basic(None));
    }

    #[test]
    fn test_null_enabled_is_disabled() {
        let entry = parse(json!({"type": "ntlm", "enabled": null}));
        assert!(!entry.enabled);
    }

    #[test]
    fn test_unknown_type_is_preserved() {
        let value = json!({"type": "digest", "enabled": true, "config": {"realm": "r"}});
        let entry = parse(value.clone());
        assert_eq!(entry.method.type_name(), "digest");
        assert_eq!(serde_json::to_value(&entry).unwrap(), value);
    }
}
