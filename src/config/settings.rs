//! TOML-based configuration for parley.
//!
//! Supports a config file (parley.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [database]
//! path = "./board.db"
//!
//! [completion]
//! endpoint = "https://ai.hackclub.com/proxy/v1/chat/completions"
//! model = "google/gemini-3-flash-preview"
//! api_key = "${AI_API_KEY}"
//! timeout_secs = 60
//!
//! [compiler]
//! require_statement = true
//! log_sql = true
//!
//! [cache]
//! listing_ttl_ms = 60000
//!
//! [toggle]
//! mode = "auto"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::toggle::ToggleMode;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub completion: CompletionSettings,
    pub compiler: CompilerSettings,
    pub cache: CacheSettings,
    pub toggle: ToggleSettings,
}

/// Relational store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite file path (supports ${ENV_VAR} expansion); ":memory:" for an
    /// in-memory store.
    pub path: String,

    /// Enforce foreign keys.
    pub foreign_keys: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "board.db".to_string(),
            foreign_keys: true,
        }
    }
}

impl DatabaseSettings {
    /// The database path with environment variables expanded.
    pub fn resolved_path(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.path)
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

/// Completion endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompletionSettings {
    /// Chat-completions URL.
    pub endpoint: String,

    /// Model name sent with each request.
    pub model: String,

    /// Bearer token (supports ${ENV_VAR} expansion).
    pub api_key: Option<String>,

    /// Per-request deadline in seconds; 0 disables the deadline.
    pub timeout_secs: u64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://ai.hackclub.com/proxy/v1/chat/completions".to_string(),
            model: "google/gemini-3-flash-preview".to_string(),
            api_key: Some("${AI_API_KEY}".to_string()),
            timeout_secs: 60,
        }
    }
}

impl CompletionSettings {
    /// The API key with environment variables expanded.
    pub fn resolved_api_key(&self) -> Result<Option<String>, SettingsError> {
        self.api_key.as_deref().map(expand_env_vars).transpose()
    }

    /// The request deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Query compiler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Reject completions with no statement keyword before execution.
    pub require_statement: bool,

    /// Log every compiled statement.
    pub log_sql: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            require_statement: true,
            log_sql: true,
        }
    }
}

/// Listing cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Listing TTL in milliseconds.
    pub listing_ttl_ms: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            listing_ttl_ms: 60_000,
        }
    }
}

impl CacheSettings {
    pub fn listing_ttl(&self) -> Duration {
        Duration::from_millis(self.listing_ttl_ms)
    }
}

/// Toggle configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ToggleSettings {
    pub mode: ToggleMode,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `PARLEY_CONFIG`
    /// 2. `./parley.toml`
    /// 3. `~/.config/parley/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("PARLEY_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("parley.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("parley").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Reject values that parse but cannot work.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.database.path.trim().is_empty() {
            return Err(SettingsError::InvalidConfig(
                "database.path must not be empty".to_string(),
            ));
        }
        if self.completion.endpoint.trim().is_empty() {
            return Err(SettingsError::InvalidConfig(
                "completion.endpoint must not be empty".to_string(),
            ));
        }
        if self.cache.listing_ttl_ms == 0 {
            return Err(SettingsError::InvalidConfig(
                "cache.listing_ttl_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A lone `$` is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let braced = chars.next_if_eq(&'{').is_some();
        let mut var_name = String::new();
        if braced {
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
