//! Error types for quicpulse-auth

use thiserror::Error;

/// Main error type for the authorization layer
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Certificate store error: {0}")]
    CertificateStore(String),

    #[error("Credential store error: {0}")]
    CredentialStore(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("SSL error: {0}")]
    Ssl(String),

    #[error("Invalid argument: {0}")]
    Argument(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
