use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use tokio::net::{TcpListener, TcpSocket};
use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

use crate::config::ServerSettings;
use crate::error::ServerError;
use crate::http::connection::Connection;
use crate::server::files;
use crate::server::lifecycle::ShutdownHandle;

/// Static file server.
pub struct WebServer {
    settings: Arc<ServerSettings>,
    shutdown: ShutdownHandle,
}

impl WebServer {
    /// Validates `settings`. The web root must be an existing directory.
    pub fn new(settings: ServerSettings) -> Result<Self, ServerError> {
        if !settings.webroot.is_dir() {
            return Err(ServerError::MissingWebRoot(settings.webroot));
        }
        if settings.backlog == 0 {
            return Err(ServerError::InvalidSetting {
                name: "backlog",
                reason: "must be at least 1".to_string(),
            });
        }
        if settings.packet_size == 0 {
            return Err(ServerError::InvalidSetting {
                name: "packet_size",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            settings: Arc::new(settings),
            shutdown: ShutdownHandle::new(),
        })
    }

    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// Handle that stops this server from another task.
    pub fn handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Serialized response for a request path.
    pub async fn get_response(&self, path: &str) -> Bytes {
        files::get_response(&self.settings, path).await
    }

    /// Binds and listens with the configured backlog.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let addr = self.settings.listen_addr();
        let bind_err = |source: std::io::Error| ServerError::Bind {
            addr: addr.clone(),
            source,
        };

        let resolved: SocketAddr = tokio::net::lookup_host(&addr)
            .await
            .map_err(bind_err)?
            .next()
            .ok_or_else(|| {
                bind_err(std::io::Error::new(
                    std::io::ErrorKind::AddrNotAvailable,
                    "address resolved to nothing",
                ))
            })?;

        let socket = if resolved.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(bind_err)?;
        socket.set_reuseaddr(true).map_err(bind_err)?;
        socket.bind(resolved).map_err(bind_err)?;

        let backlog = u32::try_from(self.settings.backlog).unwrap_or(u32::MAX);
        let listener = socket.listen(backlog).map_err(bind_err)?;
        info!("Listening on {}", listener.local_addr()?);
        Ok(listener)
    }

    /// Binds, then serves until stopped.
    pub async fn start(&self) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.serve(listener).await;
        Ok(())
    }

    /// Accept loop. At most `backlog` connections are handled at once; the
    /// loop waits for a free worker before accepting the next one.
    pub async fn serve(&self, listener: TcpListener) {
        let workers = Arc::new(Semaphore::new(self.settings.backlog));
        let tracker = TaskTracker::new();

        loop {
            let permit = tokio::select! {
                biased;
                _ = self.shutdown.stopped() => break,
                permit = workers.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let (socket, peer) = tokio::select! {
                biased;
                _ = self.shutdown.stopped() => break,
                accepted = listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!(error = %e, "accept failed");
                        continue;
                    }
                },
            };
            info!("Accepted connection from {}", peer);

            let settings = self.settings.clone();
            tracker.spawn(async move {
                let _permit = permit;
                let mut conn = Connection::new(socket, peer, settings);
                if let Err(e) = conn.run().await {
                    error!("Connection error from {}: {}", peer, e);
                }
            });
        }

        info!("Server is closing");
        drop(listener);
        tracker.close();
        tracker.wait().await;
        info!("Server closed");
    }
}
