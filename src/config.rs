//! Console configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STORAGE_PREFIX: &str = "admin_";

const STORAGE_DIR: &str = "admin-console";
const STORAGE_FILE: &str = "storage.json";

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A numeric setting held something other than a positive integer.
    #[error("invalid value for {var}: {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    /// The base URL is not an absolute http(s) URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// No storage path was configured and the platform has no config dir.
    #[error("could not determine a storage location; set ADMIN_STORAGE_PATH")]
    NoStorageDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for RequestTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Backend root every request path is appended to, without a trailing slash.
    pub base_url: String,
    pub timeouts: RequestTimeouts,
    /// Explicit storage file; `None` means the platform default.
    pub storage_path: Option<PathBuf>,
    pub storage_prefix: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeouts: RequestTimeouts::default(),
            storage_path: None,
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_owned(),
        }
    }
}

impl ConsoleConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `ADMIN_API_BASE_URL`: default `http://127.0.0.1:3000/api`
    /// - `ADMIN_REQUEST_TIMEOUT_SECS`: default 30
    /// - `ADMIN_CONNECT_TIMEOUT_SECS`: default 10
    /// - `ADMIN_STORAGE_PATH`: default `<config dir>/admin-console/storage.json`
    /// - `ADMIN_STORAGE_PREFIX`: default `admin_`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is present but unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("ADMIN_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned());
        let timeouts = RequestTimeouts {
            request_secs: env_parse_secs("ADMIN_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse_secs("ADMIN_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let storage_path = std::env::var("ADMIN_STORAGE_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        let storage_prefix =
            std::env::var("ADMIN_STORAGE_PREFIX").unwrap_or_else(|_| DEFAULT_STORAGE_PREFIX.to_owned());

        Self { base_url, timeouts, storage_path, storage_prefix }.normalized()
    }

    /// Replace the base URL, keeping the rest of the config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for anything but an absolute http(s) URL.
    pub fn with_base_url(self, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Self { base_url: base_url.into(), ..self }.normalized()
    }

    /// Where the file-backed storage lives.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoStorageDir`] when nothing is configured and the
    /// platform exposes no config directory.
    pub fn resolved_storage_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.storage_path {
            return Ok(path.clone());
        }
        let dir = dirs::config_dir().ok_or(ConfigError::NoStorageDir)?;
        Ok(dir.join(STORAGE_DIR).join(STORAGE_FILE))
    }

    fn normalized(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_owned();
        match url::Url::parse(&trimmed) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => return Err(ConfigError::InvalidBaseUrl(self.base_url)),
        }
        self.base_url = trimmed;
        Ok(self)
    }
}

fn env_parse_secs(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    let Ok(raw) = std::env::var(var) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidNumber { var, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
