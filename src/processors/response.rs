//! Response side authorization
//!
//! On a `401` with a Basic or NTLM challenge the user is asked for credentials.
//! A confirmed credential is saved, cached for the URL, applied to the original
//! request and the request is re-dispatched exactly once:
//!
//! ```text
//! Idle -> ChallengeDetected -> Prompting -> Cancelled  => Continue
//!                                        -> Declined   => Continue
//!                                        -> Confirmed  => Halt (retry in flight)
//! ```
//!
//! Collaborator failures are logged and leave the 401 standing.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::cached::apply_cached_credentials;
use super::ExecutionContext;
use crate::canonical::canonical_url;
use crate::errors::Result;
use crate::headers::{header_value, parse_headers};
use crate::models::{
    AuthScheme, CachedCredential, ExecutedRequest, ProcessingOutcome, RequestDescriptor, ResponseDescriptor,
};

/// Scheme requested by a 401 response, if it is one this layer can answer.
///
/// Error responses are never challenges, whatever their status.
pub fn challenge_scheme(response: &ResponseDescriptor) -> Option<AuthScheme> {
    if response.is_error() || response.status != 401 {
        return None;
    }
    let headers = parse_headers(&response.headers);
    let challenge = header_value(&headers, "www-authenticate").filter(|v| !v.is_empty())?;
    AuthScheme::from_challenge(challenge)
}

/// Handle an authorization challenge in `response`.
///
/// Returns [`ProcessingOutcome::Halt`] when the request was re-dispatched with
/// new credentials and the current response must not be treated as final.
pub async fn process_response_authorization(
    request: &mut RequestDescriptor,
    executed: &ExecutedRequest,
    response: &ResponseDescriptor,
    context: &ExecutionContext,
    signal: &CancellationToken,
) -> ProcessingOutcome {
    let Some(scheme) = challenge_scheme(response) else {
        return ProcessingOutcome::Continue;
    };
    if signal.is_cancelled() {
        return ProcessingOutcome::Continue;
    }

    info!(request_id = %request.id, url = %executed.url, scheme = %scheme, "Authorization challenge received");

    match negotiate(request, scheme, context, signal).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(request_id = %request.id, scheme = %scheme, error = %e, "Re-authorization failed");
            ProcessingOutcome::Continue
        }
    }
}

async fn negotiate(
    request: &mut RequestDescriptor,
    scheme: AuthScheme,
    context: &ExecutionContext,
    signal: &CancellationToken,
) -> Result<ProcessingOutcome> {
    let url = canonical_url(&request.url);

    // Prefill lookup and prompt both give way to cancellation
    let prompted = async {
        let prefill = context.credentials.query(&url, &request.method).await?;
        context.prompt.open(&request.id, scheme, prefill).await
    };

    let credential = tokio::select! {
        biased;
        _ = signal.cancelled() => {
            context.prompt.close(&request.id);
            debug!(request_id = %request.id, "Credential prompt cancelled");
            return Ok(ProcessingOutcome::Continue);
        }
        result = prompted => result?,
    };

    if signal.is_cancelled() {
        return Ok(ProcessingOutcome::Continue);
    }
    let Some(credential) = credential else {
        debug!(request_id = %request.id, "Credential prompt declined");
        return Ok(ProcessingOutcome::Continue);
    };

    context.credentials.update(&url, &request.method, &credential).await?;
    context
        .cache
        .store(scheme, &url, CachedCredential::from_credential(scheme, &credential));
    apply_cached_credentials(request, &context.cache);

    info!(request_id = %request.id, url = %url, scheme = %scheme, "Credentials confirmed, re-dispatching request");
    context.transport.redispatch(request.clone());

    Ok(ProcessingOutcome::Halt)
}
