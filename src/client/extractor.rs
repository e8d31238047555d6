//! Discovery of embedded resources (`src="..."`) in HTML.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Relative, or names the client's own host.
    SameHost,
    OtherHost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReference {
    pub url: String,
    pub scope: Scope,
}

impl ResourceReference {
    pub fn classify(url: impl Into<String>, own_host: &str) -> Self {
        let url = url.into();
        let scope = if is_relative(&url) || (!own_host.is_empty() && url.contains(own_host)) {
            Scope::SameHost
        } else {
            Scope::OtherHost
        };
        Self { url, scope }
    }
}

/// References found in one document, split by scope, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct References {
    pub same_host: Vec<ResourceReference>,
    pub other_host: Vec<ResourceReference>,
}

impl References {
    pub fn is_empty(&self) -> bool {
        self.same_host.is_empty() && self.other_host.is_empty()
    }
}

/// Every `src="..."` value in `html`, first occurrence order, duplicates
/// dropped.
pub fn src_attributes(html: &str) -> Vec<&str> {
    let mut found: Vec<&str> = Vec::new();
    let mut rest = html;

    while let Some(start) = rest.find("src=\"") {
        rest = &rest[start + 5..];
        let Some(end) = rest.find('"') else { break };
        let value = &rest[..end];
        if !found.contains(&value) {
            found.push(value);
        }
        rest = &rest[end + 1..];
    }

    found
}

pub fn extract_references(html: &str, own_host: &str) -> References {
    let mut refs = References::default();

    for url in src_attributes(html) {
        let reference = ResourceReference::classify(url, own_host);
        match reference.scope {
            Scope::SameHost => refs.same_host.push(reference),
            Scope::OtherHost => refs.other_host.push(reference),
        }
    }

    refs
}

/// No scheme and not protocol-relative (`//host/...`).
fn is_relative(url: &str) -> bool {
    if url.starts_with("//") {
        return false;
    }
    match url::Url::parse(url) {
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => !url.contains("://"),
        Ok(_) => false,
    }
}
