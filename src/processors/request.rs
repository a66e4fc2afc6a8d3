//! Request side authorization
//!
//! Walks the request's authorization entries in order and applies each enabled,
//! configured one. Entries are independent: a missing username or token simply
//! skips that entry. When no `Authorization` header ends up on the request, a
//! credential remembered for the URL is applied instead.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::cached::apply_cached_credentials;
use super::ExecutionContext;
use crate::errors::Result;
use crate::headers::has_authorization;
use crate::middleware::auth::Auth;
use crate::models::{AuthorizationMethod, ClientCertificate, ProcessingOutcome, RequestDescriptor};

/// What to do for a single authorization entry
enum EntryAction {
    Header(Auth),
    Certificate(String),
    Skip,
}

fn entry_action(method: &AuthorizationMethod) -> EntryAction {
    match method {
        AuthorizationMethod::ClientCertificate(Some(config)) => match config.id.as_deref() {
            Some(id) if !id.is_empty() => EntryAction::Certificate(id.to_string()),
            _ => EntryAction::Skip,
        },
        AuthorizationMethod::Basic(Some(config)) => {
            Auth::from_basic_config(config).map_or(EntryAction::Skip, EntryAction::Header)
        }
        AuthorizationMethod::OAuth2(Some(config)) => {
            Auth::from_oauth2_config(config).map_or(EntryAction::Skip, EntryAction::Header)
        }
        // NTLM is negotiated by the transport; unknown types are left for newer clients
        AuthorizationMethod::Ntlm(_) | AuthorizationMethod::Unknown { .. } => EntryAction::Skip,
        AuthorizationMethod::ClientCertificate(None)
        | AuthorizationMethod::Basic(None)
        | AuthorizationMethod::OAuth2(None) => EntryAction::Skip,
    }
}

/// Inject authorization data into the request.
///
/// Always resolves to [`ProcessingOutcome::Continue`]. The only error is a
/// client certificate that cannot be resolved: the request must not go out
/// without it.
pub async fn process_request_authorization(
    request: &mut RequestDescriptor,
    context: &ExecutionContext,
    signal: &CancellationToken,
) -> Result<ProcessingOutcome> {
    if request.authorization.is_empty() {
        return Ok(ProcessingOutcome::Continue);
    }

    for index in 0..request.authorization.len() {
        if signal.is_cancelled() {
            continue;
        }
        let entry = &request.authorization[index];
        if !entry.enabled || !entry.method.has_config() {
            continue;
        }

        match entry_action(&entry.method) {
            EntryAction::Header(auth) => {
                debug!(request_id = %request.id, scheme = auth.type_name(), "Applying authorization header");
                auth.apply(&mut request.headers);
            }
            EntryAction::Certificate(id) => {
                debug!(request_id = %request.id, certificate = %id, "Resolving client certificate");
                let resolved = context.certificates.resolve(&id).await?;
                request.client_certificate = Some(ClientCertificate {
                    cert_type: resolved.cert_type,
                    cert: vec![resolved.cert],
                    key: resolved.key.map(|key| vec![key]),
                });
            }
            EntryAction::Skip => {
                debug!(request_id = %request.id, kind = entry.method.type_name(), "Authorization entry skipped");
            }
        }
    }

    if !request.url.is_empty() && !has_authorization(&request.headers) {
        apply_cached_credentials(request, &context.cache);
    }

    Ok(ProcessingOutcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BasicConfig, OAuth2Config};

    #[test]
    fn test_entry_action_skips_incomplete_config() {
        assert!(matches!(entry_action(&AuthorizationMethod::Basic(Some(BasicConfig::default()))), EntryAction::Skip));
        assert!(matches!(entry_action(&AuthorizationMethod::OAuth2(Some(OAuth2Config::default()))), EntryAction::Skip));
        assert!(matches!(
            entry_action(&AuthorizationMethod::ClientCertificate(Some(Default::default()))),
            EntryAction::Skip
        ));
        assert!(matches!(
            entry_action(&AuthorizationMethod::Unknown { kind: "digest".into(), config: None }),
            EntryAction::Skip
        ));
    }

    #[test]
    fn test_entry_action_certificate() {
        let method = AuthorizationMethod::ClientCertificate(Some(crate::models::ClientCertificateConfig {
            id: Some("c1".into()),
        }));
        assert!(matches!(entry_action(&method), EntryAction::Certificate(id) if id == "c1"));
    }
}
