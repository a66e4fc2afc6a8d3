//! Pipeline driver
//!
//! Runs a request through the request processor, the HTTP client and the
//! response processor, following re-dispatched requests until a response is
//! final. [`run`] wires this up for the command line.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::CredentialCache;
use crate::cli::Args;
use crate::client::{ChannelTransport, HttpClient};
use crate::config::Config;
use crate::errors::{AuthError, Result};
use crate::models::{ExecutedRequest, ProcessingOutcome, RequestDescriptor, ResponseDescriptor};
use crate::processors::{process_request_authorization, process_response_authorization, ExecutionContext};
use crate::prompt::{AuthPrompt, DisabledPrompt, TerminalPrompt};
use crate::signals;
use crate::status::ExitStatus;
use crate::store::{CertificateStore, CredentialStore, FileCertificateStore, FileCredentialStore};

/// Final request/response pair of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Request as last sent, with authorization applied
    pub request: RequestDescriptor,
    pub response: ResponseDescriptor,
    /// Number of times the request was sent
    pub attempts: u32,
}

/// Request/response pipeline with re-dispatch support
pub struct Pipeline {
    context: ExecutionContext,
    client: HttpClient,
    redispatched: UnboundedReceiver<RequestDescriptor>,
    max_attempts: u32,
}

impl Pipeline {
    /// Build a pipeline; re-dispatched requests are routed back into it
    pub fn new(
        cache: Arc<CredentialCache>,
        certificates: Arc<dyn CertificateStore>,
        credentials: Arc<dyn CredentialStore>,
        prompt: Arc<dyn AuthPrompt>,
        client: HttpClient,
        max_attempts: u32,
    ) -> Self {
        let (transport, redispatched) = ChannelTransport::new();
        let context = ExecutionContext::new(cache, certificates, credentials, prompt, Arc::new(transport));
        Self {
            context,
            client,
            redispatched,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Send `request`, re-authorizing on challenges, until a response is final
    pub async fn execute(
        &mut self,
        request: RequestDescriptor,
        signal: &CancellationToken,
    ) -> Result<PipelineResult> {
        let mut request = request;
        let mut attempts = 0;

        loop {
            if signal.is_cancelled() {
                return Err(AuthError::Transport("Request cancelled".to_string()));
            }
            attempts += 1;

            process_request_authorization(&mut request, &self.context, signal).await?;
            let executed = ExecutedRequest::from(&request);
            let response = self.client.send(&request).await?;

            let outcome = process_response_authorization(
                &mut request,
                &executed,
                &response,
                &self.context,
                signal,
            )
            .await;

            if outcome == ProcessingOutcome::Continue {
                return Ok(PipelineResult { request, response, attempts });
            }
            if attempts >= self.max_attempts {
                warn!(request_id = %request.id, attempts, "Giving up on re-authorization");
                return Ok(PipelineResult { request, response, attempts });
            }

            match self.redispatched.try_recv() {
                Ok(next) => {
                    debug!(request_id = %next.id, attempt = attempts + 1, "Re-sending request");
                    request = next;
                }
                Err(_) => return Ok(PipelineResult { request, response, attempts }),
            }
        }
    }
}

/// Read a request descriptor from a JSON file
pub fn load_request(path: &Path) -> Result<RequestDescriptor> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Format a response for display (status line, headers, body)
pub fn format_response(response: &ResponseDescriptor) -> String {
    let mut out = format!("HTTP {} {}", response.status, response.status_text)
        .trim_end()
        .to_string();
    if !response.headers.is_empty() {
        out.push('\n');
        out.push_str(&response.headers);
    }
    if let Some(payload) = response.payload.as_deref().filter(|p| !p.is_empty()) {
        out.push_str("\n\n");
        out.push_str(payload);
    }
    out
}

/// Drive `future` on a fresh multi-threaded runtime.
///
/// Shutdown does not wait for blocking tasks: a terminal prompt abandoned on
/// Ctrl+C stays blocked on its read until the process exits.
pub fn block_on_detached<F>(future: F) -> ExitStatus
where
    F: Future<Output = ExitStatus>,
{
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: Failed to start runtime: {}", e);
            return ExitStatus::Error;
        }
    };
    let status = runtime.block_on(future);
    runtime.shutdown_background();
    status
}

/// Main entry point for the CLI.
pub async fn run(args: Args) -> ExitStatus {
    let signal = CancellationToken::new();
    if let Err(e) = signals::install_interrupt_handler(signal.clone()) {
        warn!(error = %e, "Failed to install Ctrl+C handler");
    }

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}", e);
            Config::default()
        }
    };

    match execute(&args, &config, &signal).await {
        Ok(result) => {
            if args.print_request {
                match serde_json::to_string_pretty(&result.request) {
                    Ok(json) => eprintln!("{}", json),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            if let Some(error) = &result.response.error {
                eprintln!("Error: {}", error);
                return ExitStatus::Error;
            }
            println!("{}", format_response(&result.response));
            if signals::was_interrupted() {
                return ExitStatus::Interrupted;
            }
            ExitStatus::Success
        }
        Err(e) => {
            if signals::was_interrupted() {
                return ExitStatus::Interrupted;
            }
            eprintln!("Error: {}", e);
            ExitStatus::Error
        }
    }
}

async fn execute(args: &Args, config: &Config, signal: &CancellationToken) -> Result<PipelineResult> {
    let request = load_request(&args.request)?;

    let credentials_path = args.credentials.clone().unwrap_or_else(|| config.credentials_path.clone());
    let certificates_dir = args.certificates.clone().unwrap_or_else(|| config.certificates_dir.clone());
    let prompt: Arc<dyn AuthPrompt> = if args.no_prompt || !config.prompt_enabled {
        Arc::new(DisabledPrompt)
    } else {
        Arc::new(TerminalPrompt::new())
    };
    let timeout = args
        .timeout
        .filter(|t| t.is_finite() && *t > 0.0)
        .map(Duration::from_secs_f64);

    let mut pipeline = Pipeline::new(
        Arc::new(CredentialCache::new()),
        Arc::new(FileCertificateStore::new(certificates_dir)),
        Arc::new(FileCredentialStore::new(credentials_path)),
        prompt,
        HttpClient::new(timeout)?,
        args.max_attempts.unwrap_or(config.max_attempts),
    );

    pipeline.execute(request, signal).await
}
