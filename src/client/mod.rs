//! GET client
//!
//! This module implements the client half: single requests with redirect
//! following, resource discovery in HTML, and full-page mirroring.

pub mod engine;
pub mod extractor;
pub mod mirror;
pub mod page;

pub use engine::{Endpoint, ParsedResponse, WebClient};
pub use extractor::{References, ResourceReference, Scope, extract_references};
pub use mirror::{MirrorJob, MirrorReport, mirror};
pub use page::{PageSummary, describe_page};
