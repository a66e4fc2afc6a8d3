//! Interactive credential prompts
//!
//! A prompt is opened on behalf of one request (its owner). Closing a prompt by
//! owner settles only that owner's pending prompt; prompts of other in-flight
//! requests are unaffected.

mod terminal;

pub use terminal::TerminalPrompt;

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{AuthScheme, Credential};

#[async_trait]
pub trait AuthPrompt: Send + Sync {
    /// Ask the user for credentials for `scheme`.
    ///
    /// Resolves to `None` when the user cancels or closes the prompt without
    /// confirming, or when the prompt is closed through [`AuthPrompt::close`].
    async fn open(
        &self,
        owner: &str,
        scheme: AuthScheme,
        prefill: Option<Credential>,
    ) -> Result<Option<Credential>>;

    /// Force-close any prompt opened for `owner`
    fn close(&self, owner: &str);
}

/// Prompt that never asks; every challenge is declined
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPrompt;

#[async_trait]
impl AuthPrompt for DisabledPrompt {
    async fn open(
        &self,
        _owner: &str,
        _scheme: AuthScheme,
        _prefill: Option<Credential>,
    ) -> Result<Option<Credential>> {
        Ok(None)
    }

    fn close(&self, _owner: &str) {}
}
