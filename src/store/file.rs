//! File backed stores
//!
//! Credentials are kept in a single JSON document, certificates in one
//! directory per certificate id.

use async_trait::async_trait;
use base64::Engine;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::warn;

use super::{credential_key, CertificateStore, CredentialStore, ResolvedCertificate};
use crate::errors::{AuthError, Result};
use crate::models::{CertificateType, Credential};

type CredentialFile = BTreeMap<String, Credential>;

/// Credential store persisted as JSON
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process
    lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<CredentialFile> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CredentialFile::new()),
            Err(e) => {
                return Err(AuthError::CredentialStore(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        if content.trim().is_empty() {
            return Ok(CredentialFile::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            AuthError::CredentialStore(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    async fn save(&self, entries: &CredentialFile) -> Result<()> {
        let content = serde_json::to_string_pretty(entries)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &content))
            .await
            .map_err(|e| AuthError::CredentialStore(format!("Credential save task failed: {}", e)))?
    }
}

/// Replace `path` with `content` through a temp file in the same directory
fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(parent)
        .map_err(|e| AuthError::CredentialStore(format!("Failed to create store directory: {}", e)))?;

    let mut temp = NamedTempFile::new_in(parent)
        .map_err(|e| AuthError::CredentialStore(format!("Failed to create temp file: {}", e)))?;
    temp.write_all(content.as_bytes())
        .map_err(|e| AuthError::CredentialStore(format!("Failed to write credentials: {}", e)))?;
    temp.persist(path)
        .map_err(|e| AuthError::CredentialStore(format!("Failed to save credentials: {}", e)))?;

    // Owner-only: the file holds plain text passwords
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
            warn!(path = %path.display(), error = %e, "Failed to restrict credential file permissions");
        }
    }

    Ok(())
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn query(&self, url: &str, method: &str) -> Result<Option<Credential>> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        Ok(entries.remove(&credential_key(url, method)))
    }

    async fn update(&self, url: &str, method: &str, credential: &Credential) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(credential_key(url, method), credential.clone());
        self.save(&entries).await
    }
}

/// Certificate store reading `<dir>/<id>/cert.pem` (+ `key.pem`) or `<dir>/<id>/cert.p12`
#[derive(Debug, Clone)]
pub struct FileCertificateStore {
    dir: PathBuf,
}

impl FileCertificateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn certificate_dir(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
            return Err(AuthError::CertificateStore(format!("Invalid certificate id: {}", id)));
        }
        Ok(self.dir.join(id))
    }
}

#[async_trait]
impl CertificateStore for FileCertificateStore {
    async fn resolve(&self, id: &str) -> Result<ResolvedCertificate> {
        let dir = self.certificate_dir(id)?;

        let pem = dir.join("cert.pem");
        if tokio::fs::try_exists(&pem).await.unwrap_or(false) {
            let cert = tokio::fs::read_to_string(&pem).await.map_err(|e| {
                AuthError::CertificateStore(format!("Failed to read '{}': {}", pem.display(), e))
            })?;
            let key_path = dir.join("key.pem");
            let key = if tokio::fs::try_exists(&key_path).await.unwrap_or(false) {
                Some(tokio::fs::read_to_string(&key_path).await.map_err(|e| {
                    AuthError::CertificateStore(format!("Failed to read '{}': {}", key_path.display(), e))
                })?)
            } else {
                None
            };
            return Ok(ResolvedCertificate {
                cert_type: CertificateType::Pem,
                cert,
                key,
            });
        }

        let p12 = dir.join("cert.p12");
        if tokio::fs::try_exists(&p12).await.unwrap_or(false) {
            let data = tokio::fs::read(&p12).await.map_err(|e| {
                AuthError::CertificateStore(format!("Failed to read '{}': {}", p12.display(), e))
            })?;
            return Ok(ResolvedCertificate {
                cert_type: CertificateType::P12,
                cert: base64::engine::general_purpose::STANDARD.encode(data),
                key: None,
            });
        }

        Err(AuthError::CertificateStore(format!("Unknown certificate: {}", id)))
    }
}
