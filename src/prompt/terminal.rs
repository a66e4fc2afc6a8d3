//! Terminal credential prompt
//!
//! Reads credentials from the controlling terminal with dialoguer, writing to
//! stderr so prompts never end up in piped output.

use async_trait::async_trait;
use dashmap::DashMap;
use dialoguer::console::Term;
use dialoguer::{Input, Password};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::AuthPrompt;
use crate::errors::{AuthError, Result};
use crate::models::{AuthScheme, Credential};

/// Prompt backed by the terminal, one close handle per owning request
#[derive(Debug, Default)]
pub struct TerminalPrompt {
    open: DashMap<String, CancellationToken>,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of prompts currently waiting for input
    pub fn pending(&self) -> usize {
        self.open.len()
    }
}

/// RAII guard removing the close handle when the prompt settles or is dropped
struct OpenPromptGuard<'a> {
    open: &'a DashMap<String, CancellationToken>,
    owner: String,
}

impl Drop for OpenPromptGuard<'_> {
    fn drop(&mut self) {
        self.open.remove(&self.owner);
    }
}

#[async_trait]
impl AuthPrompt for TerminalPrompt {
    async fn open(
        &self,
        owner: &str,
        scheme: AuthScheme,
        prefill: Option<Credential>,
    ) -> Result<Option<Credential>> {
        let closed = CancellationToken::new();
        self.open.insert(owner.to_string(), closed.clone());
        let _guard = OpenPromptGuard {
            open: &self.open,
            owner: owner.to_string(),
        };

        let task = tokio::task::spawn_blocking(move || ask(scheme, prefill));

        tokio::select! {
            _ = closed.cancelled() => {
                // The blocking read cannot be interrupted; its answer is discarded
                debug!(owner = %owner, "Credential prompt closed");
                Ok(None)
            }
            joined = task => joined
                .map_err(|e| AuthError::Prompt(format!("Prompt task failed: {}", e)))?,
        }
    }

    fn close(&self, owner: &str) {
        if let Some((_, closed)) = self.open.remove(owner) {
            closed.cancel();
        }
    }
}

fn ask(scheme: AuthScheme, prefill: Option<Credential>) -> Result<Option<Credential>> {
    let term = Term::stderr();
    let prefill = prefill.unwrap_or_default();

    term.write_line(&format!("Authentication required ({})", scheme))
        .map_err(|e| AuthError::Prompt(e.to_string()))?;

    let mut username = Input::<String>::new()
        .with_prompt("Username")
        .allow_empty(true);
    if !prefill.username.is_empty() {
        username = username.default(prefill.username.clone());
    }
    let username = username
        .interact_text_on(&term)
        .map_err(|e| AuthError::Prompt(e.to_string()))?;
    if username.is_empty() {
        return Ok(None);
    }

    let password_prompt = if prefill.password.is_empty() {
        "Password"
    } else {
        "Password (empty keeps saved)"
    };
    let mut password = Password::new()
        .with_prompt(password_prompt)
        .allow_empty_password(true)
        .interact_on(&term)
        .map_err(|e| AuthError::Prompt(e.to_string()))?;
    if password.is_empty() {
        password = prefill.password.clone();
    }

    let domain = match scheme {
        AuthScheme::Basic => None,
        AuthScheme::Ntlm => {
            let mut input = Input::<String>::new()
                .with_prompt("Domain")
                .allow_empty(true);
            if let Some(domain) = prefill.domain.clone() {
                input = input.default(domain);
            }
            let domain = input
                .interact_text_on(&term)
                .map_err(|e| AuthError::Prompt(e.to_string()))?;
            Some(domain).filter(|d| !d.is_empty())
        }
    };

    Ok(Some(Credential {
        username,
        password,
        domain,
    }))
}
