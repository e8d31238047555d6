use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::config::ServerSettings;
use crate::http::framer::receive_all;
use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;
use crate::server::files::build_response;

/// One accepted client connection, handled start to finish.
pub struct Connection<S> {
    stream: S,
    peer: SocketAddr,
    settings: Arc<ServerSettings>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: SocketAddr, settings: Arc<ServerSettings>) -> Self {
        Self {
            stream,
            peer,
            settings,
            state: ConnectionState::Reading,
        }
    }

    /// Runs the connection to completion. The stream is shut down on the way
    /// out whatever happened.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.drive().await;
        let _ = self.stream.shutdown().await;
        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Some(req) => ConnectionState::Processing(req),
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = build_response(&self.settings, req.served_path()).await;
                    tracing::debug!(peer = %self.peer, status = response.status.as_u16(), "responding");
                    self.state = ConnectionState::Writing(ResponseWriter::from_response(&response));
                }

                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => break,
            }
        }

        Ok(())
    }

    /// Receives one message and parses its request line. `None` means the
    /// request is dropped without a response.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        let chunk_size = self.settings.packet_size;
        let raw = match self.settings.read_timeout() {
            Some(deadline) => {
                match tokio::time::timeout(deadline, receive_all(&mut self.stream, chunk_size)).await
                {
                    Ok(raw) => raw?,
                    Err(_) => {
                        tracing::debug!(peer = %self.peer, "read deadline expired");
                        return Ok(None);
                    }
                }
            }
            None => receive_all(&mut self.stream, chunk_size).await?,
        };

        match parse_http_request(&raw) {
            Ok(req) if req.is_servable() => {
                tracing::info!(peer = %self.peer, path = %req.served_path(), "GET");
                Ok(Some(req))
            }
            Ok(req) => {
                tracing::debug!(peer = %self.peer, method = ?req.method, "unsupported request dropped");
                Ok(None)
            }
            Err(ParseError::InvalidEncoding) => {
                tracing::warn!(peer = %self.peer, "error decoding client message");
                Ok(None)
            }
            Err(e) => {
                tracing::debug!(peer = %self.peer, error = %e, "malformed request dropped");
                Ok(None)
            }
        }
    }
}
