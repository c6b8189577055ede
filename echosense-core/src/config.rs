//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/echosense/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/echosense/` (~/.config/echosense/)
//! - State/Logs: `$XDG_STATE_HOME/echosense/` (~/.local/state/echosense/)

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding `client.base_url`
pub const API_URL_ENV: &str = "ECHOSENSE_API_URL";

/// Backend address used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct Config {
    /// Backend client configuration
    #[serde(default)]
    pub client: ClientConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analytics backend client configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., `http://localhost:8000`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ClientConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(Error::Config("client.base_url must not be empty".to_string()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::Config(format!(
                "client.base_url must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "client.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Config::default()
        };

        config.apply_overrides(std::env::var(API_URL_ENV).ok());
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Apply an `ECHOSENSE_API_URL` style override; blank values are ignored
    pub fn apply_overrides(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            tracing::debug!(base_url = %url, "base URL overridden from environment");
            self.client.base_url = url.trim().to_string();
        }
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/echosense/config.toml` (~/.config/echosense/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("echosense").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/echosense/` (~/.local/state/echosense/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("echosense")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/echosense/echosense.log` (~/.local/state/echosense/echosense.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("echosense.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.client.base_url, "http://localhost:8000");
        assert_eq!(config.client.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.client.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[client]
base_url = "https://analytics.example.com"
timeout_secs = 5

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.client.base_url, "https://analytics.example.com");
        assert_eq!(config.client.timeout_secs, 5);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[client]
timeout_secs = 10
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.client.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.client.timeout_secs, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_client_config_validation() {
        let config = ClientConfig {
            base_url: "".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            base_url: "https://analytics.example.com".to_string(),
            timeout_secs: 1,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_overrides(Some(" http://10.0.0.5:9000 ".to_string()));
        assert_eq!(config.client.base_url, "http://10.0.0.5:9000");

        config.apply_overrides(Some("   ".to_string()));
        assert_eq!(config.client.base_url, "http://10.0.0.5:9000");

        config.apply_overrides(None);
        assert_eq!(config.client.base_url, "http://10.0.0.5:9000");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[client]\nbase_url = \"http://backend:8000\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.client.base_url, "http://backend:8000");

        std::fs::write(&path, "[client\nbroken").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_log_path() {
        assert!(Config::log_path().ends_with("echosense/echosense.log"));
    }
}
