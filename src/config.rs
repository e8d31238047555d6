//! Server settings.
//!
//! Settings are loaded once at startup from a JSON file (YAML when the file
//! extension is `.yaml` or `.yml`) and shared read-only afterwards.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable that overrides the default config path.
pub const CONFIG_ENV: &str = "MINIHTTP_CONFIG";

/// Config path used when neither the CLI nor the environment names one.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

fn default_ip() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_backlog() -> usize {
    5
}

fn default_packet_size() -> usize {
    1024
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_ip")]
    pub ip: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Listen backlog, also the size of the worker pool.
    #[serde(default = "default_backlog")]
    pub backlog: usize,

    pub webroot: PathBuf,

    /// Status code (e.g. `"404"`) to error page path under the web root.
    #[serde(default)]
    pub errors: HashMap<String, String>,

    /// Request path to redirect target.
    #[serde(default)]
    pub redirected: HashMap<String, String>,

    /// Receive chunk size used by the framer.
    #[serde(default = "default_packet_size")]
    pub packet_size: usize,

    /// Soft close after this many seconds, 0 or absent means never.
    #[serde(default)]
    pub close_after_secs: Option<f64>,

    /// Per-connection read deadline. Absent means a silent client holds a
    /// worker until it disconnects.
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,
}

impl ServerSettings {
    /// Settings with defaults for everything but the web root.
    pub fn new(webroot: impl Into<PathBuf>) -> Self {
        Self {
            ip: default_ip(),
            port: default_port(),
            backlog: default_backlog(),
            webroot: webroot.into(),
            errors: HashMap::new(),
            redirected: HashMap::new(),
            packet_size: default_packet_size(),
            close_after_secs: None,
            read_timeout_secs: None,
        }
    }

    /// Loads settings from `path`, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&raw),
            _ => Self::from_json(&raw),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Resolves the config path: explicit value, then `MINIHTTP_CONFIG`,
    /// then `config.json`.
    pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }

    pub fn error_page(&self, code: u16) -> Option<&str> {
        self.errors.get(&code.to_string()).map(String::as_str)
    }

    pub fn close_after(&self) -> Duration {
        self.close_after_secs
            .filter(|s| *s > 0.0)
            .and_then(|s| Duration::try_from_secs_f64(s).ok())
            .unwrap_or(Duration::ZERO)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }
}
