//! Resolution of request paths against the redirect table and the web root.

use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use tracing::{debug, warn};

use crate::config::ServerSettings;
use crate::http::mime::guess_mime_type;
use crate::http::response::Response;
use crate::http::writer::serialize_response;

/// Served when the configured error page itself cannot be read.
pub const FALLBACK_ERROR_PAGE: &str = "<!doctype html>
<html lang=\"en\">
<head>
   <meta charset=\"utf-8\">
   <title>Server could not load the file.</title>
   <meta name=\"description\" content=\"Server Error\">
</head>
<body>Server Error
</body>
</html>";

/// Serialized response for `path`.
pub async fn get_response(settings: &ServerSettings, path: &str) -> Bytes {
    serialize_response(&build_response(settings, path).await)
}

/// Resolves `path`: redirect table first, then the web root, then the 404
/// error page, then the inline fallback page.
pub async fn build_response(settings: &ServerSettings, path: &str) -> Response {
    let path = path.trim_start_matches(['/', '\\']);

    if let Some(target) = settings.redirected.get(path) {
        debug!(path, target = %target, "redirecting");
        return Response::moved_permanently(target);
    }

    if let Some(file) = resolve(&settings.webroot, path) {
        match tokio::fs::metadata(&file).await {
            Ok(meta) if meta.is_file() => match tokio::fs::read(&file).await {
                Ok(content) => return Response::ok(guess_mime_type(path), content),
                Err(e) => warn!(path, error = %e, "file vanished or unreadable"),
            },
            _ => {}
        }
    }

    debug!(path, "not found");
    let Some(page) = settings.error_page(404) else {
        return Response::not_found("text/html", FALLBACK_ERROR_PAGE);
    };

    let content = match resolve(&settings.webroot, page) {
        Some(file) => tokio::fs::read(&file).await.ok(),
        None => None,
    };
    match content {
        Some(content) => Response::not_found(guess_mime_type(page), content),
        None => {
            warn!(page, "error page unreadable, serving fallback");
            Response::not_found("text/html", FALLBACK_ERROR_PAGE)
        }
    }
}

/// Joins `path` onto `root`, refusing anything that could leave the root.
fn resolve(root: &Path, path: &str) -> Option<PathBuf> {
    let relative = Path::new(path.trim_start_matches(['/', '\\']));
    if relative.as_os_str().is_empty() {
        return None;
    }
    if !relative.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir)) {
        return None;
    }
    Some(root.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_rejects_parent_components() {
        let root = Path::new("/srv/www");
        assert_eq!(resolve(root, "../etc/passwd"), None);
        assert_eq!(resolve(root, "a/../../b"), None);
        assert_eq!(resolve(root, ""), None);
        assert_eq!(resolve(root, "img/a.png"), Some(PathBuf::from("/srv/www/img/a.png")));
    }
}
