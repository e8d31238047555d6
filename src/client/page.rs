use bytes::Bytes;

use crate::client::engine::WebClient;
use crate::client::extractor::{References, extract_references};

/// What the client prints for a single page.
#[derive(Debug, Clone)]
pub struct PageSummary {
    pub status_line: String,
    pub body: Option<Bytes>,
    pub references: References,
}

/// Fetches `path` and classifies the resources it embeds.
pub async fn describe_page(client: &WebClient, path: &str) -> Option<PageSummary> {
    let response = client.request_get(path).await?;
    let body = response
        .body()
        .map(|b| response.raw().slice_ref(b));
    let references = body
        .as_deref()
        .map(|b| extract_references(&String::from_utf8_lossy(b), client.host()))
        .unwrap_or_default();

    Some(PageSummary {
        status_line: String::from_utf8_lossy(response.status_line()).into_owned(),
        body,
        references,
    })
}
