//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;

use minihttp::config::ServerSettings;
use minihttp::server::{ShutdownHandle, WebServer};
use tokio::task::JoinHandle;

pub struct RunningServer {
    pub addr: SocketAddr,
    pub handle: ShutdownHandle,
    pub task: JoinHandle<()>,
}

/// Settings for a loopback server on an ephemeral port.
pub fn loopback_settings(webroot: &Path) -> ServerSettings {
    let mut settings = ServerSettings::new(webroot);
    settings.port = 0;
    settings
}

pub async fn spawn_server(settings: ServerSettings) -> RunningServer {
    let server = WebServer::new(settings).unwrap();
    let listener = server.bind().await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = server.handle();
    let task = tokio::spawn(async move { server.serve(listener).await });

    RunningServer { addr, handle, task }
}

pub fn write_file(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}
