//! HTTP request sending
//!
//! Turns a [`RequestDescriptor`] into a reqwest request and the reqwest
//! response back into a [`ResponseDescriptor`].

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Identity, Method};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::{AuthError, Result};
use crate::headers::parse_headers;
use crate::models::{AuthorizationMethod, CertificateType, ClientCertificate, RequestDescriptor, ResponseDescriptor};

pub const USER_AGENT_STRING: &str = concat!("quicpulse-auth/", env!("CARGO_PKG_VERSION"));

/// reqwest based sender for request descriptors
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpClient {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout, None)?,
            timeout,
        })
    }

    /// Send the request.
    ///
    /// Transport failures are reported as a response carrying the error flag;
    /// only a request that cannot be built (bad method, header, certificate)
    /// returns an error.
    pub async fn send(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor> {
        let client = match &request.client_certificate {
            Some(certificate) => build_client(self.timeout, Some(identity(certificate)?))?,
            None => self.client.clone(),
        };

        if request.authorization.iter().any(|entry| {
            entry.enabled && matches!(entry.method, AuthorizationMethod::Ntlm(Some(_)))
        }) {
            warn!(request_id = %request.id, "NTLM handshake is not performed by the HTTP transport");
        }

        let method = Method::from_str(&request.method.to_uppercase())
            .map_err(|e| AuthError::Argument(format!("Invalid HTTP method '{}': {}", request.method, e)))?;

        let mut builder = client
            .request(method, &request.url)
            .headers(header_map(&request.headers)?);
        if let Some(payload) = &request.payload {
            builder = builder.body(payload.clone());
        }

        debug!(request_id = %request.id, method = %request.method, url = %request.url, "Sending request");

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(request_id = %request.id, error = %e, "Request failed");
                return Ok(ResponseDescriptor::failed(e.to_string()));
            }
        };

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| format!("{}: {}", name, String::from_utf8_lossy(value.as_bytes())))
            .collect::<Vec<_>>()
            .join("\n");

        let payload = match response.text().await {
            Ok(text) => Some(text),
            Err(e) => return Ok(ResponseDescriptor::failed(e.to_string())),
        };

        Ok(ResponseDescriptor {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            payload,
            error: None,
        })
    }
}

fn build_client(timeout: Option<Duration>, identity: Option<Identity>) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT_STRING)
        .redirect(reqwest::redirect::Policy::none())
        .referer(false);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(identity) = identity {
        builder = builder.identity(identity);
    }

    Ok(builder.build()?)
}

/// Convert a raw header block into a reqwest header map
fn header_map(block: &str) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for header in parse_headers(block) {
        let name = HeaderName::from_bytes(header.name.as_bytes())
            .map_err(|e| AuthError::Argument(format!("Invalid header name '{}': {}", header.name, e)))?;
        let value = HeaderValue::from_str(&header.value)
            .map_err(|e| AuthError::Argument(format!("Invalid value for header '{}': {}", header.name, e)))?;
        map.append(name, value);
    }
    Ok(map)
}

/// Build a TLS identity from a resolved client certificate
fn identity(certificate: &ClientCertificate) -> Result<Identity> {
    match certificate.cert_type {
        CertificateType::Pem => {
            let mut combined = certificate.cert.join("\n");
            for key in certificate.key.iter().flatten() {
                combined.push('\n');
                combined.push_str(key);
            }
            Identity::from_pem(combined.as_bytes())
                .map_err(|e| AuthError::Ssl(format!("Failed to load PEM identity: {}", e)))
        }
        CertificateType::P12 => Err(AuthError::Ssl(
            "PKCS#12 client certificates are not supported with rustls; convert to PEM".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_map_keeps_duplicates() {
        let map = header_map("Accept: text/html\naccept: application/json\nX-Id: 1").unwrap();
        assert_eq!(map.get_all("accept").iter().count(), 2);
        assert_eq!(map.get("x-id").unwrap(), "1");
    }

    #[test]
    fn test_header_map_rejects_invalid_name() {
        assert!(matches!(header_map("Bad Name: x"), Err(AuthError::Argument(_))));
    }

    #[test]
    fn test_p12_identity_unsupported() {
        let certificate = ClientCertificate {
            cert_type: CertificateType::P12,
            cert: vec!["MIIB".into()],
            key: None,
        };
        assert!(matches!(identity(&certificate), Err(AuthError::Ssl(_))));
    }
}
