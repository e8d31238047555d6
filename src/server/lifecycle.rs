//! Soft shutdown of the accept loop.
//!
//! Stopping cancels a token the accept loop selects on, so a loop parked in
//! `accept` wakes up without any traffic. Handlers already running are not
//! cancelled; they finish and the server drains them.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    token: CancellationToken,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops accepting new connections.
    pub fn stop(&self) {
        if !self.token.is_cancelled() {
            info!("Stop command sent");
        }
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Calls [`stop`](Self::stop) after `after`. A zero duration never fires.
    pub fn timed_close(&self, after: Duration) -> Option<JoinHandle<()>> {
        if after.is_zero() {
            return None;
        }

        let handle = self.clone();
        Some(tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(after) => {
                    info!(after = ?after, "timed close reached");
                    handle.stop();
                }
                _ = handle.token.cancelled() => {}
            }
        }))
    }

    /// Resolves once [`stop`](Self::stop) has been called.
    pub async fn stopped(&self) {
        self.token.cancelled().await
    }
}
