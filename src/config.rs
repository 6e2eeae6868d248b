//! Application configuration.
//!
//! Configuration is stored in `.issuedesk/config.yaml` and includes:
//! - The issue API base URL and client timeouts
//! - The bind address of the reference server
//! - The default log level

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DeskError, Result};
use crate::paths::desk_root;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Keys accepted by `config get` / `config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "api.base_url",
    "api.timeout_secs",
    "api.connect_timeout_secs",
    "server.bind",
    "log.level",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Where the issue API lives and how long to wait for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Total request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds (default: 10)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .map_err(|_| DeskError::Config(format!("invalid bind address '{}'", self.bind)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        desk_root().join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// API settings with the `ISSUEDESK_API_URL` override applied
    pub fn effective_api(&self) -> ApiConfig {
        let mut api = self.api.clone();
        if let Ok(url) = env::var("ISSUEDESK_API_URL")
            && !url.is_empty()
        {
            api.base_url = url;
        }
        api
    }

    /// Read a value by dotted key
    pub fn get(&self, key: &str) -> Result<String> {
        Ok(match key {
            "api.base_url" => self.api.base_url.clone(),
            "api.timeout_secs" => self.api.timeout_secs.to_string(),
            "api.connect_timeout_secs" => self.api.connect_timeout_secs.to_string(),
            "server.bind" => self.server.bind.clone(),
            "log.level" => self.log.level.clone(),
            _ => return Err(unknown_key(key)),
        })
    }

    /// Set a value by dotted key, validating it first
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => {
                let url = url::Url::parse(value)?;
                if url.cannot_be_a_base() {
                    return Err(DeskError::Config(format!(
                        "'{value}' cannot be used as an API base URL"
                    )));
                }
                self.api.base_url = value.to_string();
            }
            "api.timeout_secs" => self.api.timeout_secs = parse_secs(key, value)?,
            "api.connect_timeout_secs" => self.api.connect_timeout_secs = parse_secs(key, value)?,
            "server.bind" => {
                let server = ServerConfig {
                    bind: value.to_string(),
                };
                server.bind_addr()?;
                self.server = server;
            }
            "log.level" => {
                tracing_subscriber::EnvFilter::try_new(value).map_err(|_| {
                    DeskError::Config(format!("invalid log level '{value}'"))
                })?;
                self.log.level = value.to_string();
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(DeskError::Config(format!(
            "{key} must be a positive number of seconds, got '{value}'"
        ))),
    }
}

fn unknown_key(key: &str) -> DeskError {
    DeskError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        CONFIG_KEYS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    /// Points ISSUEDESK_ROOT at a temp dir for the lifetime of the guard.
    struct RootGuard {
        _dir: TempDir,
    }

    impl RootGuard {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            // SAFETY: tests using this are #[serial]
            unsafe { env::set_var("ISSUEDESK_ROOT", dir.path().join(".issuedesk")) };
            Self { _dir: dir }
        }
    }

    impl Drop for RootGuard {
        fn drop(&mut self) {
            // SAFETY: tests using this are #[serial]
            unsafe { env::remove_var("ISSUEDESK_ROOT") };
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.connect_timeout_secs, 10);
        assert_eq!(config.server.bind, "127.0.0.1:8000");
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config =
            serde_yaml_ng::from_str("api:\n  base_url: http://issues.internal:9000\n").unwrap();
        assert_eq!(config.api.base_url, "http://issues.internal:9000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    #[serial]
    fn test_load_missing_file_is_default() {
        let _guard = RootGuard::new();
        assert_eq!(Config::load().unwrap(), Config::default());
    }

    #[test]
    #[serial]
    fn test_save_then_load() {
        let _guard = RootGuard::new();
        let mut config = Config::default();
        config.set("api.timeout_secs", "5").unwrap();
        config.set("server.bind", "0.0.0.0:9100").unwrap();
        config.save().unwrap();

        let loaded = Config::load().unwrap();
        assert_eq!(loaded.api.timeout_secs, 5);
        assert_eq!(loaded.server.bind, "0.0.0.0:9100");
    }

    #[test]
    #[serial]
    fn test_env_overrides_base_url() {
        let config = Config::default();
        // SAFETY: #[serial]
        unsafe { env::set_var("ISSUEDESK_API_URL", "http://10.0.0.5:8000") };
        assert_eq!(config.effective_api().base_url, "http://10.0.0.5:8000");
        unsafe { env::remove_var("ISSUEDESK_API_URL") };
        assert_eq!(config.effective_api().base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("api.base_url", "nope").is_err());
        assert!(config.set("api.timeout_secs", "0").is_err());
        assert!(config.set("api.timeout_secs", "soon").is_err());
        assert!(config.set("server.bind", "localhost").is_err());
        assert!(config.set("theme", "dark").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_get_known_and_unknown_keys() {
        let config = Config::default();
        for key in CONFIG_KEYS {
            assert!(config.get(key).is_ok(), "{key} should be readable");
        }
        assert!(config.get("auth.token").is_err());
    }
}
