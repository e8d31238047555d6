use thiserror::Error;

use crate::http::HTTP_VERSION;
use crate::http::request::{Method, Request};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed request line")]
    InvalidRequest,
    #[error("unknown method")]
    InvalidMethod,
    #[error("request target must start with '/'")]
    InvalidTarget,
    #[error("unsupported protocol version")]
    InvalidVersion,
    #[error("request is not valid UTF-8")]
    InvalidEncoding,
    #[error("empty request")]
    Incomplete,
}

/// Parses the request line of a raw request.
///
/// Only the first line is looked at; this protocol sends no request headers.
/// The method ends at the first space and the version starts after the last
/// one, so a target may itself contain spaces.
pub fn parse_http_request(buf: &[u8]) -> Result<Request, ParseError> {
    if buf.is_empty() {
        return Err(ParseError::Incomplete);
    }

    let text = std::str::from_utf8(buf).map_err(|_| ParseError::InvalidEncoding)?;
    let line = text.split("\r\n").next().ok_or(ParseError::InvalidRequest)?;

    let (method_str, rest) = line.split_once(' ').ok_or(ParseError::InvalidRequest)?;
    let (target, version) = rest.rsplit_once(' ').ok_or(ParseError::InvalidRequest)?;
    if target.is_empty() {
        return Err(ParseError::InvalidRequest);
    }

    let method = Method::from_str(method_str).ok_or(ParseError::InvalidMethod)?;
    if !target.starts_with('/') {
        return Err(ParseError::InvalidTarget);
    }
    if version != HTTP_VERSION {
        return Err(ParseError::InvalidVersion);
    }

    Ok(Request {
        method,
        target: target.to_string(),
        version: version.to_string(),
    })
}

pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// First line of a message, up to the first CRLF. A message without CRLF is
/// all status line.
pub fn status_line(msg: &[u8]) -> &[u8] {
    match msg.windows(2).position(|w| w == b"\r\n") {
        Some(end) => &msg[..end],
        None => msg,
    }
}

/// Numeric status code from a response status line.
pub fn status_code(msg: &[u8]) -> Option<u16> {
    let line = std::str::from_utf8(status_line(msg)).ok()?;
    let mut parts = line.split_whitespace();
    let version = parts.next()?;
    if !version.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}

/// Everything after the first blank line, or `None` without a separator.
pub fn body(msg: &[u8]) -> Option<&[u8]> {
    find_headers_end(msg).map(|end| &msg[end + 4..])
}

/// Case-insensitive header lookup inside the header block.
///
/// Without a blank line the whole message after the status line is treated
/// as headers, which matches what a bodiless 301 looks like on the wire.
pub fn header_value<'a>(msg: &'a [u8], name: &str) -> Option<&'a str> {
    let head = match find_headers_end(msg) {
        Some(end) => &msg[..end],
        None => msg,
    };
    let head = std::str::from_utf8(head).ok()?;

    head.split("\r\n").skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim())
    })
}

pub fn content_length(msg: &[u8]) -> Option<usize> {
    header_value(msg, "Content-Length")?.parse().ok()
}
