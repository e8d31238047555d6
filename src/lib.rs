//! minihttp - a hand-rolled HTTP/1.1 subset
//!
//! Static file server with redirect and error-page tables, plus a GET client
//! that can mirror a page and its resources to disk.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod server;
