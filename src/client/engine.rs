//! GET client: one connection per request, redirects followed up to a cap.

use std::collections::HashSet;
use std::time::Duration;

use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::http::framer::receive_all;
use crate::http::parser;
use crate::http::request::request_line;
use crate::http::response::StatusCode;

/// Maximum number of 301 hops followed for a single request.
pub const MAX_REDIRECTS: usize = 10;

/// Receive chunk size used unless configured otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Where a client connects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    /// Bounds connect and the whole exchange of each request.
    pub timeout: Option<Duration>,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// A received response. Accessors parse on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    raw: Bytes,
}

impl ParsedResponse {
    pub fn new(raw: Bytes) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    pub fn status_line(&self) -> &[u8] {
        parser::status_line(&self.raw)
    }

    pub fn status_code(&self) -> Option<u16> {
        parser::status_code(&self.raw)
    }

    /// Status as one of the codes this protocol knows, `None` otherwise.
    pub fn status(&self) -> Option<StatusCode> {
        self.status_code().and_then(StatusCode::from_u16)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        parser::header_value(&self.raw, name)
    }

    /// `None` when the message has no header/body separator.
    pub fn body(&self) -> Option<&[u8]> {
        parser::body(&self.raw)
    }

    pub fn is_redirect(&self) -> bool {
        self.status() == Some(StatusCode::MovedPermanently)
    }
}

#[derive(Debug, Clone)]
pub struct WebClient {
    endpoint: Endpoint,
    chunk_size: usize,
}

impl WebClient {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn host(&self) -> &str {
        &self.endpoint.host
    }

    /// Fetches `path`, returning `None` on any failure. The failure is
    /// logged, never propagated.
    pub async fn request_get(&self, path: &str) -> Option<ParsedResponse> {
        match self.fetch(path).await {
            Ok(response) => Some(response),
            Err(e) => {
                warn!(addr = %self.endpoint.addr(), path, error = %e, "request failed");
                None
            }
        }
    }

    /// Fetches `path`, following 301 redirects.
    ///
    /// A chain longer than [`MAX_REDIRECTS`] or one that revisits a path is
    /// abandoned with [`ClientError::RedirectLoop`].
    pub async fn fetch(&self, path: &str) -> Result<ParsedResponse, ClientError> {
        let mut current = path.trim_start_matches(['/', '\\']).to_string();
        let mut visited = HashSet::new();
        visited.insert(current.clone());

        for hop in 0..=MAX_REDIRECTS {
            let response = self.exchange(&current).await?;
            if !response.is_redirect() {
                return Ok(response);
            }

            let location = response
                .header("Location")
                .ok_or(ClientError::MissingLocation)?
                .trim_start_matches(['/', '\\'])
                .to_string();
            info!(from = %current, to = %location, hop = hop + 1, "redirected");

            if !visited.insert(location.clone()) {
                return Err(ClientError::RedirectLoop {
                    hops: hop + 1,
                    location,
                });
            }
            current = location;
        }

        Err(ClientError::RedirectLoop {
            hops: MAX_REDIRECTS + 1,
            location: current,
        })
    }

    /// One request/response exchange on a fresh connection.
    async fn exchange(&self, path: &str) -> Result<ParsedResponse, ClientError> {
        let addr = self.endpoint.addr();
        let work = async {
            let mut stream = TcpStream::connect(&addr)
                .await
                .map_err(|source| ClientError::Connect {
                    addr: addr.clone(),
                    source,
                })?;

            let line = request_line(path);
            debug!(addr = %addr, request = %line, "sending");
            stream.write_all(line.as_bytes()).await?;
            // Half-close so the server's framer sees end of message even when
            // the line length is a multiple of its chunk size.
            stream.shutdown().await?;

            let raw = receive_all(&mut stream, self.chunk_size).await?;
            if raw.is_empty() {
                return Err(ClientError::EmptyResponse { addr: addr.clone() });
            }
            Ok::<_, ClientError>(ParsedResponse::new(raw))
        };

        match self.endpoint.timeout {
            Some(limit) => tokio::time::timeout(limit, work)
                .await
                .map_err(|_| ClientError::Timeout { addr: addr.clone() })?,
            None => work.await,
        }
    }
}
