//! Common test utilities for quicpulse-auth integration tests
//!
//! This module provides shared test infrastructure including:
//! - Scripted collaborators (prompt, transport, failing credential store)
//! - A harness wiring them into an `ExecutionContext`
//! - CLI invocation helpers

#![allow(dead_code)]

use async_trait::async_trait;
use dashmap::DashMap;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

use quicpulse_auth::cache::CredentialCache;
use quicpulse_auth::client::Transport;
use quicpulse_auth::errors::{AuthError, Result};
use quicpulse_auth::models::{AuthScheme, CertificateType, Credential, RequestDescriptor};
use quicpulse_auth::processors::ExecutionContext;
use quicpulse_auth::prompt::AuthPrompt;
use quicpulse_auth::store::{CredentialStore, MemoryCertificateStore, MemoryCredentialStore, ResolvedCertificate};

/// How the scripted prompt answers
#[derive(Debug, Clone)]
pub enum PromptBehavior {
    /// User fills in the credential and confirms
    Confirm(Credential),
    /// User closes the prompt without confirming
    Decline,
    /// The prompt surface fails
    Fail,
    /// Never answers until closed
    Hang,
}

/// A prompt that was opened
#[derive(Debug, Clone)]
pub struct OpenedPrompt {
    pub owner: String,
    pub scheme: AuthScheme,
    pub prefill: Option<Credential>,
}

/// Prompt answering from a script and recording every interaction
pub struct ScriptedPrompt {
    behavior: Mutex<PromptBehavior>,
    opened: Mutex<Vec<OpenedPrompt>>,
    closed: Mutex<Vec<String>>,
    pending: DashMap<String, CancellationToken>,
}

impl ScriptedPrompt {
    pub fn new(behavior: PromptBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            opened: Mutex::new(Vec::new()),
            closed: Mutex::new(Vec::new()),
            pending: DashMap::new(),
        }
    }

    pub fn set_behavior(&self, behavior: PromptBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn opened(&self) -> Vec<OpenedPrompt> {
        self.opened.lock().unwrap().clone()
    }

    pub fn closed(&self) -> Vec<String> {
        self.closed.lock().unwrap().clone()
    }

    pub fn is_pending(&self, owner: &str) -> bool {
        self.pending.contains_key(owner)
    }
}

#[async_trait]
impl AuthPrompt for ScriptedPrompt {
    async fn open(
        &self,
        owner: &str,
        scheme: AuthScheme,
        prefill: Option<Credential>,
    ) -> Result<Option<Credential>> {
        self.opened.lock().unwrap().push(OpenedPrompt {
            owner: owner.to_string(),
            scheme,
            prefill,
        });
        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            PromptBehavior::Confirm(credential) => Ok(Some(credential)),
            PromptBehavior::Decline => Ok(None),
            PromptBehavior::Fail => Err(AuthError::Prompt("dialog crashed".to_string())),
            PromptBehavior::Hang => {
                let closed = CancellationToken::new();
                self.pending.insert(owner.to_string(), closed.clone());
                closed.cancelled().await;
                Ok(None)
            }
        }
    }

    fn close(&self, owner: &str) {
        self.closed.lock().unwrap().push(owner.to_string());
        if let Some((_, closed)) = self.pending.remove(owner) {
            closed.cancel();
        }
    }
}

/// Transport recording re-dispatched requests
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl RecordingTransport {
    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn redispatch(&self, request: RequestDescriptor) {
        self.requests.lock().unwrap().push(request);
    }
}

/// Credential store whose operations can be made to fail
#[derive(Default)]
pub struct FailingCredentialStore {
    pub fail_query: bool,
    pub fail_update: bool,
}

#[async_trait]
impl CredentialStore for FailingCredentialStore {
    async fn query(&self, _url: &str, _method: &str) -> Result<Option<Credential>> {
        if self.fail_query {
            return Err(AuthError::CredentialStore("store offline".to_string()));
        }
        Ok(None)
    }

    async fn update(&self, _url: &str, _method: &str, _credential: &Credential) -> Result<()> {
        if self.fail_update {
            return Err(AuthError::CredentialStore("disk full".to_string()));
        }
        Ok(())
    }
}

/// Collaborators for one test, wired into an ExecutionContext
pub struct Harness {
    pub cache: Arc<CredentialCache>,
    pub certificates: Arc<MemoryCertificateStore>,
    pub credentials: Arc<MemoryCredentialStore>,
    pub prompt: Arc<ScriptedPrompt>,
    pub transport: Arc<RecordingTransport>,
}

impl Harness {
    pub fn new(behavior: PromptBehavior) -> Self {
        Self {
            cache: Arc::new(CredentialCache::new()),
            certificates: Arc::new(MemoryCertificateStore::new()),
            credentials: Arc::new(MemoryCredentialStore::new()),
            prompt: Arc::new(ScriptedPrompt::new(behavior)),
            transport: Arc::new(RecordingTransport::default()),
        }
    }

    pub fn context(&self) -> ExecutionContext {
        self.context_with_credentials(self.credentials.clone())
    }

    pub fn context_with_credentials(&self, credentials: Arc<dyn CredentialStore>) -> ExecutionContext {
        ExecutionContext::new(
            self.cache.clone(),
            self.certificates.clone(),
            credentials,
            self.prompt.clone(),
            self.transport.clone(),
        )
    }

    pub fn add_pem_certificate(&self, id: &str, key: Option<&str>) {
        self.certificates.insert(id, ResolvedCertificate {
            cert_type: CertificateType::Pem,
            cert: format!("-----BEGIN CERTIFICATE-----\n{}\n-----END CERTIFICATE-----", id),
            key: key.map(String::from),
        });
    }
}

/// Result of running the CLI
#[derive(Debug)]
pub struct CliResponse {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run the CLI with an isolated config file and credential store under `dir`
pub fn run_cli(dir: &Path, args: &[&str]) -> CliResponse {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_quicpulse-auth"));
    cmd.arg("--config").arg(dir.join("config.toml"));
    cmd.arg("--credentials").arg(dir.join("credentials.json"));
    cmd.args(["--timeout", "2"]);
    cmd.args(args);
    cmd.env_remove("RUST_LOG");
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd.output().expect("Failed to run quicpulse-auth");
    CliResponse {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    }
}
