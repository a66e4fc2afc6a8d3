//! Config file handling

use std::path::{Path, PathBuf};

use crate::errors::AuthError;

/// Default number of pipeline iterations before giving up on re-authorization
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// quicpulse-auth configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub config_dir: PathBuf,
    /// JSON file backing the credential store
    pub credentials_path: PathBuf,
    /// Directory backing the certificate store
    pub certificates_dir: PathBuf,
    /// Ask for credentials on a 401 challenge
    pub prompt_enabled: bool,
    /// Upper bound on send attempts for one request
    pub max_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_config_dir(Self::default_config_dir())
    }
}

impl Config {
    fn with_config_dir(config_dir: PathBuf) -> Self {
        Self {
            credentials_path: config_dir.join("credentials.json"),
            certificates_dir: config_dir.join("certificates"),
            config_dir,
            prompt_enabled: true,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Load configuration from the default config file (TOML format)
    pub fn load() -> Result<Self, AuthError> {
        let config_dir = Self::default_config_dir();
        Self::load_from(&config_dir.join("config.toml"))
    }

    /// Load configuration from a specific file; a missing file yields defaults
    pub fn load_from(config_file: &Path) -> Result<Self, AuthError> {
        let config_dir = config_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_dir);

        if !config_file.exists() {
            return Ok(Self::with_config_dir(config_dir));
        }

        let content = std::fs::read_to_string(config_file)
            .map_err(|e| AuthError::Config(format!("Failed to read config: {}", e)))?;

        Self::parse(&content, config_dir)
    }

    /// Parse TOML config content, resolving relative paths against `config_dir`
    pub fn parse(content: &str, config_dir: PathBuf) -> Result<Self, AuthError> {
        let toml_value: toml::Value = toml::from_str(content)
            .map_err(|e| AuthError::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::with_config_dir(config_dir);

        let store = toml_value.get("store");
        if let Some(path) = store.and_then(|s| s.get("credentials")).and_then(|v| v.as_str()) {
            config.credentials_path = config.resolve_path(path);
        }
        if let Some(path) = store.and_then(|s| s.get("certificates")).and_then(|v| v.as_str()) {
            config.certificates_dir = config.resolve_path(path);
        }

        if let Some(enabled) = toml_value
            .get("prompt")
            .and_then(|p| p.get("enabled"))
            .and_then(|v| v.as_bool())
        {
            config.prompt_enabled = enabled;
        }

        if let Some(max_attempts) = toml_value
            .get("defaults")
            .and_then(|d| d.get("max_attempts"))
            .and_then(|v| v.as_integer())
        {
            if max_attempts < 1 {
                return Err(AuthError::Config("defaults.max_attempts must be at least 1".to_string()));
            }
            config.max_attempts = u32::try_from(max_attempts).unwrap_or(u32::MAX);
        }

        Ok(config)
    }

    /// Resolve relative paths against the config dir
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = PathBuf::from(path);
        if path.is_absolute() {
            path
        } else {
            self.config_dir.join(path)
        }
    }

    /// Get the default config directory
    fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("quicpulse-auth"))
            .unwrap_or_else(|| PathBuf::from(".quicpulse-auth"))
    }
}
