//! HTTP protocol implementation.
//!
//! This module implements the small HTTP/1.1 subset spoken by both the
//! client and the server: one GET request per connection, no keep-alive.
//!
//! # Architecture
//!
//! - **`framer`**: Reads a socket until a whole message has arrived
//! - **`parser`**: Splits raw messages into status line, headers and body
//! - **`request`**: Request line representation and methods
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`connection`**: Per-connection state machine used by the server
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Receive one message via the framer
//!        └──────┬──────┘
//!               │ Well-formed GET line
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Resolve redirects, files, error pages
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               ▼
//!            Closed          ← Always, there is no keep-alive
//! ```

pub mod connection;
pub mod framer;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;

/// Protocol version spoken on both sides.
pub const HTTP_VERSION: &str = "HTTP/1.1";
