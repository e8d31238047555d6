//! Static file server
//!
//! Binds with the configured backlog, hands each accepted connection to a
//! bounded pool of workers and stops softly through a [`ShutdownHandle`].

pub mod files;
pub mod lifecycle;
pub mod listener;

pub use lifecycle::ShutdownHandle;
pub use listener::WebServer;
