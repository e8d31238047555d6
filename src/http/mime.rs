//! MIME type detection based on file extensions.

use std::path::Path;

/// Fallback for unknown or missing extensions.
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Guesses the MIME type of `path` from its extension (case-insensitive).
///
/// # Example
///
/// ```
/// # use minihttp::http::mime::guess_mime_type;
/// assert_eq!(guess_mime_type("index.html"), "text/html");
/// assert_eq!(guess_mime_type("img/logo.PNG"), "image/png");
/// assert_eq!(guess_mime_type("README"), "application/octet-stream");
/// ```
pub fn guess_mime_type(path: impl AsRef<Path>) -> &'static str {
    let ext = match path.as_ref().extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return DEFAULT_MIME,
    };

    match ext.as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "xml" => "text/xml",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "wasm" => "application/wasm",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/vnd.microsoft.icon",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/x-wav",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        _ => DEFAULT_MIME,
    }
}
