//! Request and response descriptors passed through the auth pipeline

use serde::{Deserialize, Serialize};

use super::authorization::AuthorizationEntry;

/// Kind of client certificate material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateType {
    /// PEM encoded certificate (and key)
    Pem,
    /// PKCS#12 bundle, base64 encoded
    P12,
}

/// Client certificate resolved for a request.
///
/// The certificate is always a single element collection; the key is only
/// present when the store returned one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCertificate {
    #[serde(rename = "type")]
    pub cert_type: CertificateType,
    pub cert: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Vec<String>>,
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_method() -> String {
    "GET".to_string()
}

/// Request record the processors mutate in place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    /// Identifier used to correlate prompts with their owning request
    #[serde(default = "new_request_id")]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_method")]
    pub method: String,
    /// Raw header block, one `Name: value` per line
    #[serde(default)]
    pub headers: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default)]
    pub authorization: Vec<AuthorizationEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<ClientCertificate>,
}

impl RequestDescriptor {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: new_request_id(),
            url: url.into(),
            method: method.into(),
            headers: String::new(),
            payload: None,
            authorization: Vec::new(),
            client_certificate: None,
        }
    }

    pub fn with_headers(mut self, headers: impl Into<String>) -> Self {
        self.headers = headers.into();
        self
    }

    pub fn with_authorization(mut self, entry: AuthorizationEntry) -> Self {
        self.authorization.push(entry);
        self
    }
}

/// What the transport reports it actually sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutedRequest {
    pub url: String,
    pub method: String,
    #[serde(default)]
    pub headers: String,
}

impl From<&RequestDescriptor> for ExecutedRequest {
    fn from(request: &RequestDescriptor) -> Self {
        Self {
            url: request.url.clone(),
            method: request.method.clone(),
            headers: request.headers.clone(),
        }
    }
}

/// Completed response, or a transport failure when `error` is set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDescriptor {
    pub status: u16,
    #[serde(default)]
    pub status_text: String,
    #[serde(default)]
    pub headers: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseDescriptor {
    pub fn new(status: u16, headers: impl Into<String>) -> Self {
        Self {
            status,
            headers: headers.into(),
            ..Default::default()
        }
    }

    /// Response standing in for a request that failed in the transport
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of a processor run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// Keep going with the current request/response
    Continue,
    /// A new attempt was dispatched; the current one is not final
    Halt,
}
