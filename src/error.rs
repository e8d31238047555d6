//! Error types shared across the client, server and configuration layers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of a single client request (including its redirect chain).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("request to {addr} timed out")]
    Timeout { addr: String },

    #[error("{addr} closed the connection without responding")]
    EmptyResponse { addr: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("redirect chain abandoned after {hops} hops (last location: {location})")]
    RedirectLoop { hops: usize, location: String },

    #[error("301 response without a Location header")]
    MissingLocation,

    #[error("invalid resource URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Server construction and runtime failures.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("web root {0} does not exist or is not a directory")]
    MissingWebRoot(PathBuf),

    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
