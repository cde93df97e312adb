//! Configuration for the college backend.
//!
//! Values come from a TOML file with a default for every field, then from
//! environment variables (`ADDR`, `DB_DSN`, `PROD`, `TOKEN_SIZE`, `LOG_LEVEL`).

use serde::Deserialize;
use std::path::Path;

use crate::{CollegeError, Result};

/// Smallest accepted token secret size in bytes.
pub const MIN_TOKEN_SIZE: usize = 64;

/// Largest accepted token secret size in bytes.
pub const MAX_TOKEN_SIZE: usize = 1024;

/// Longest accepted token lifetime (one year).
pub const MAX_TOKEN_LIFETIME_SECS: u64 = 365 * 24 * 60 * 60;

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Production mode. Cookies are marked `Secure` when set.
    #[serde(default)]
    pub production: bool,
    /// CORS allowed origins. Empty means permissive.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            production: false,
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/college.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Token issuance configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Number of random bytes in a token secret.
    #[serde(default = "default_token_size")]
    pub token_size: usize,
    /// Token lifetime in seconds.
    #[serde(default = "default_token_lifetime")]
    pub token_lifetime_secs: u64,
}

fn default_token_size() -> usize {
    72
}

fn default_token_lifetime() -> u64 {
    2 * 24 * 60 * 60 // 2 days
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_size: default_token_size(),
            token_lifetime_secs: default_token_lifetime(),
        }
    }
}

impl AuthConfig {
    /// Token lifetime as a chrono duration, capped at
    /// [`MAX_TOKEN_LIFETIME_SECS`].
    pub fn token_lifetime(&self) -> chrono::Duration {
        let secs = self.token_lifetime_secs.min(MAX_TOKEN_LIFETIME_SECS);
        chrono::Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX / 1000))
    }
}

/// Uploaded file storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Path to the file storage directory.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

fn default_storage_path() -> String {
    "data/files".to_string()
}

fn default_max_upload_size() -> usize {
    12 * 1024 * 1024 // 12 MiB
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional path to a log file. Console only when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// File storage configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(CollegeError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file (defaults when the file is absent)
    /// and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = if path.as_ref().exists() {
            Self::load(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CollegeError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored.
    ///
    /// - `ADDR`: `host:port` to listen on
    /// - `DB_DSN`: database path
    /// - `PROD`: `true` or `1` enables production mode
    /// - `TOKEN_SIZE`: token secret size in bytes
    /// - `LOG_LEVEL`: log level
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(addr) = get("ADDR") {
            let (host, port) = addr
                .rsplit_once(':')
                .ok_or_else(|| CollegeError::Config(format!("ADDR must be host:port, got {addr}")))?;
            self.server.port = port
                .parse()
                .map_err(|_| CollegeError::Config(format!("invalid port in ADDR: {port}")))?;
            if !host.is_empty() {
                self.server.host = host.to_string();
            }
        }
        if let Some(dsn) = get("DB_DSN") {
            let path = dsn
                .strip_prefix("sqlite://")
                .or_else(|| dsn.strip_prefix("sqlite:"))
                .unwrap_or(&dsn);
            self.database.path = path.to_string();
        }
        if let Some(prod) = get("PROD") {
            self.server.production = matches!(prod.to_lowercase().as_str(), "true" | "1");
        }
        if let Some(size) = get("TOKEN_SIZE") {
            self.auth.token_size = size
                .parse()
                .map_err(|_| CollegeError::Config(format!("invalid TOKEN_SIZE: {size}")))?;
        }
        if let Some(level) = get("LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.auth.token_size < MIN_TOKEN_SIZE {
            return Err(CollegeError::Config(format!(
                "token_size must be at least {MIN_TOKEN_SIZE} bytes, got {}",
                self.auth.token_size
            )));
        }
        if self.auth.token_size > MAX_TOKEN_SIZE {
            return Err(CollegeError::Config(format!(
                "token_size must be at most {MAX_TOKEN_SIZE} bytes, got {}",
                self.auth.token_size
            )));
        }
        if self.auth.token_lifetime_secs == 0 {
            return Err(CollegeError::Config(
                "token_lifetime_secs must be greater than zero".to_string(),
            ));
        }
        if self.auth.token_lifetime_secs > MAX_TOKEN_LIFETIME_SECS {
            return Err(CollegeError::Config(format!(
                "token_lifetime_secs must be at most {MAX_TOKEN_LIFETIME_SECS}, got {}",
                self.auth.token_lifetime_secs
            )));
        }
        if self.files.max_upload_size == 0 {
            return Err(CollegeError::Config(
                "max_upload_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Address the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
