//! Offline capture of a page and everything it embeds.
//!
//! Same-host resources are fetched through the page's own client and saved at
//! their relative path. Cross-host resources are fetched over plain HTTP with
//! a short-lived client, saved under numeric aliases (`0.js`, `1.png`, ...),
//! and the page is rewritten to point at the aliases before it is saved.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use crate::client::engine::{Endpoint, ParsedResponse, WebClient};
use crate::client::extractor::{ResourceReference, extract_references};
use crate::error::ClientError;
use crate::http::response::StatusCode;

/// Connect/IO bound for each cross-host fetch.
pub const FOREIGN_TIMEOUT: Duration = Duration::from_secs(5);

/// Port used for cross-host resources that do not name one.
pub const FOREIGN_PORT: u16 = 80;

/// Name the root document is saved under when the root path is empty.
pub const INDEX_ALIAS: &str = "index.html";

/// Outcome of a mirror job.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MirrorReport {
    /// Files written, in the order they were written.
    pub saved: Vec<PathBuf>,
    /// References that could not be mirrored.
    pub skipped: Vec<String>,
}

/// One capture of a root page into an output directory.
#[derive(Debug)]
pub struct MirrorJob {
    root_path: String,
    output_dir: PathBuf,
    alias_counter: u32,
    foreign_timeout: Duration,
}

impl MirrorJob {
    pub fn new(root_path: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            output_dir: output_dir.into(),
            alias_counter: 0,
            foreign_timeout: FOREIGN_TIMEOUT,
        }
    }

    pub fn with_foreign_timeout(mut self, timeout: Duration) -> Self {
        self.foreign_timeout = timeout;
        self
    }

    pub fn alias_counter(&self) -> u32 {
        self.alias_counter
    }

    /// Where the root document ends up, relative to the output directory.
    pub fn root_file(&self) -> &str {
        match self.root_path.trim_start_matches(['/', '\\']) {
            "" => INDEX_ALIAS,
            path => path,
        }
    }

    pub async fn run(&mut self, client: &WebClient) -> anyhow::Result<MirrorReport> {
        let mut report = MirrorReport::default();

        let Some(root) = client.request_get(&self.root_path).await else {
            return Ok(report);
        };
        let Some(body) = root.body() else {
            return Ok(report);
        };

        let mut document = match String::from_utf8(body.to_vec()) {
            Ok(text) => text,
            Err(_) => {
                warn!(path = %self.root_path, "root page is not text, saving it without resources");
                self.save(&root, self.root_file(), body, &mut report)
                    .await
                    .context("failed to save root page")?;
                return Ok(report);
            }
        };

        alias_empty_sources(&mut document);
        let refs = extract_references(&document, client.host());

        for reference in &refs.same_host {
            self.mirror_same_host(client, reference, &mut report).await;
        }

        for reference in &refs.other_host {
            match self.mirror_other_host(reference, &mut report).await {
                Ok(alias) => {
                    let local = format!("{}{}", self.alias_prefix(), alias);
                    document = document.replace(
                        &format!("src=\"{}\"", reference.url),
                        &format!("src=\"{}\"", local),
                    );
                    info!(reference = %reference.url, alias = %alias, "saved cross-host resource");
                }
                Err(e) => {
                    warn!(reference = %reference.url, error = %e, "couldn't mirror cross-host resource");
                    report.skipped.push(reference.url.clone());
                }
            }
        }

        // Saved last so it carries the rewritten references.
        self.save(&root, self.root_file(), document.as_bytes(), &mut report)
            .await
            .context("failed to save root page")?;

        Ok(report)
    }

    async fn mirror_same_host(
        &self,
        client: &WebClient,
        reference: &ResourceReference,
        report: &mut MirrorReport,
    ) {
        let request_path = same_host_path(&reference.url, client.host());
        let Some(response) = client.request_get(&request_path).await else {
            report.skipped.push(reference.url.clone());
            return;
        };

        let save_path = strip_query(&request_path);
        let body = response.body().unwrap_or_default();
        match self.save(&response, save_path, body, report).await {
            Ok(true) => {}
            Ok(false) => report.skipped.push(reference.url.clone()),
            Err(e) => {
                warn!(reference = %reference.url, error = %e, "failed to save resource");
                report.skipped.push(reference.url.clone());
            }
        }
    }

    /// Fetches and saves one cross-host resource, returning its alias.
    async fn mirror_other_host(
        &mut self,
        reference: &ResourceReference,
        report: &mut MirrorReport,
    ) -> anyhow::Result<String> {
        let target = ForeignTarget::parse(&reference.url)?;
        let client = WebClient::new(
            Endpoint::new(target.host.clone(), target.port).with_timeout(self.foreign_timeout),
        );
        let response = client.fetch(&target.path).await?;

        let alias = format!("{}{}", self.alias_counter, target.extension);
        let body = response.body().unwrap_or_default();
        if !self.save(&response, &alias, body, report).await? {
            anyhow::bail!(
                "server answered {:?}, it might require a method other than GET",
                String::from_utf8_lossy(response.status_line())
            );
        }

        self.alias_counter += 1;
        Ok(alias)
    }

    /// Writes `content` under the output directory if the response status
    /// allows it. 200 is saved, 404 is saved with a note, anything else is
    /// not saved and returns `Ok(false)`.
    async fn save(
        &self,
        response: &ParsedResponse,
        relative: &str,
        content: &[u8],
        report: &mut MirrorReport,
    ) -> anyhow::Result<bool> {
        match response.status() {
            Some(StatusCode::Ok) => {}
            Some(StatusCode::NotFound) => warn!(resource = relative, "the requested resource is the not-found page"),
            _ => return Ok(false),
        }

        let relative = safe_relative(relative)
            .with_context(|| format!("refusing to write outside the output directory: {relative}"))?;
        let path = self.output_dir.join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;

        report.saved.push(path);
        Ok(true)
    }

    /// `../` prefix that leads from the root document back to the output
    /// directory, where aliases live.
    fn alias_prefix(&self) -> String {
        let depth = Path::new(self.root_file())
            .parent()
            .map(|p| p.components().count())
            .unwrap_or(0);
        "../".repeat(depth)
    }
}

/// Runs a full mirror job of `root_path` into `output_dir`.
pub async fn mirror(
    client: &WebClient,
    root_path: &str,
    output_dir: impl Into<PathBuf>,
) -> anyhow::Result<MirrorReport> {
    MirrorJob::new(root_path, output_dir).run(client).await
}

/// An empty source (or a bare root) means the index page.
fn alias_empty_sources(document: &mut String) {
    for empty in ["src=\"\"", "src=\"/\"", "src=\"\\\""] {
        if document.contains(empty) {
            *document = document.replace(empty, &format!("src=\"{INDEX_ALIAS}\""));
        }
    }
}

/// Request path for a same-host reference, which may be relative or a full
/// URL naming our own host.
fn same_host_path(url: &str, own_host: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        if parsed.host_str().is_some() {
            let mut path = parsed.path().trim_start_matches('/').to_string();
            if let Some(query) = parsed.query() {
                path.push('?');
                path.push_str(query);
            }
            return path;
        }
    }

    match url.find(own_host) {
        Some(at) if !own_host.is_empty() && url.starts_with("//") => url[at + own_host.len()..]
            .trim_start_matches(|c: char| c == ':' || c.is_ascii_digit())
            .trim_start_matches('/')
            .to_string(),
        _ => url.trim_start_matches(['/', '\\']).to_string(),
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

/// `relative` as a path that stays inside the output directory.
fn safe_relative(relative: &str) -> Option<&Path> {
    let path = Path::new(relative);
    let ok = !relative.is_empty()
        && path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    ok.then_some(path)
}

/// Host, port and path of a cross-host reference, downgraded to plain HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ForeignTarget {
    host: String,
    port: u16,
    path: String,
    /// Original extension including the dot, or empty.
    extension: String,
}

impl ForeignTarget {
    fn parse(reference: &str) -> Result<Self, ClientError> {
        let invalid = |reason: &str| ClientError::InvalidUrl {
            url: reference.to_string(),
            reason: reason.to_string(),
        };

        let plain = if let Some(rest) = reference.strip_prefix("https://") {
            format!("http://{rest}")
        } else if reference.starts_with("//") {
            format!("http:{reference}")
        } else {
            reference.to_string()
        };

        let url = url::Url::parse(&plain).map_err(|e| invalid(&e.to_string()))?;
        if url.scheme() != "http" {
            return Err(invalid("only http resources can be fetched"));
        }
        let host = url.host_str().ok_or_else(|| invalid("missing host"))?.to_string();

        let mut path = url.path().trim_start_matches('/').to_string();
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }

        let extension = Path::new(url.path())
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();

        Ok(Self {
            host,
            port: url.port().unwrap_or(FOREIGN_PORT),
            path,
            extension,
        })
    }
}
