//! Message framing over a raw stream.
//!
//! Neither side of this protocol sends a reliable end-of-message marker, so
//! the framer reads fixed-size chunks and decides when a message is complete:
//!
//! 1. the peer closed the connection, or
//! 2. a `Content-Length` header is present and that many body bytes arrived, or
//! 3. there is no `Content-Length` and a read returned less than a full chunk.
//!
//! Rule 3 is a heuristic. A length-less message whose size is an exact
//! multiple of the chunk size looks like "more data coming", and the call
//! blocks until the peer closes or the caller's timeout fires. The client
//! avoids this for requests by half-closing after writing, the server avoids
//! it for responses by always sending `Content-Length`.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::parser;

/// Reads from `reader` until one message has arrived and returns it.
pub async fn receive_all<R>(reader: &mut R, chunk_size: usize) -> std::io::Result<Bytes>
where
    R: AsyncRead + Unpin,
{
    let chunk_size = chunk_size.max(1);
    let mut buffer = BytesMut::with_capacity(chunk_size);
    let mut chunk = vec![0u8; chunk_size];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);

        if let Some(expected) = expected_len(&buffer) {
            if buffer.len() >= expected {
                buffer.truncate(expected);
                break;
            }
            continue;
        }

        if n < chunk_size {
            break;
        }
    }

    tracing::trace!(bytes = buffer.len(), chunk_size, "message received");
    Ok(buffer.freeze())
}

/// Total message length announced by the header block, if known yet.
///
/// A length that does not fit in `usize` counts as absent, which leaves the
/// message to the short-read and peer-close rules.
fn expected_len(buf: &[u8]) -> Option<usize> {
    let headers_end = parser::find_headers_end(buf)?;
    let length = parser::content_length(buf)?;
    headers_end.checked_add(4)?.checked_add(length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_len_needs_complete_headers() {
        assert_eq!(expected_len(b"HTTP/1.1 200 OK\r\nContent-Length: 3"), None);
        assert_eq!(
            expected_len(b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\n\r\n"),
            Some(41)
        );
    }

    #[test]
    fn expected_len_overflow_is_unknown() {
        let msg = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n", usize::MAX);
        assert_eq!(expected_len(msg.as_bytes()), None);
    }

    #[test]
    fn expected_len_without_content_length() {
        assert_eq!(expected_len(b"HTTP/1.1 200 OK\r\n\r\nbody"), None);
    }
}
