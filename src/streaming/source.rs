//! Traits defining the transport seam used by the progressive fetcher.

use std::fmt;
use std::io::{ErrorKind, Read};

use super::error::StreamingError;

/// Result type for streaming operations.
pub type StreamingResult<T> = std::result::Result<T, StreamingError>;

/// Default number of bytes requested per body read.
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// Description of a request, passed through verbatim to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Target address. Not validated here.
    pub url: String,
    /// HTTP method name.
    pub method: String,
    /// Extra request headers, in insertion order.
    pub headers: Vec<(String, String)>,
    /// Optional request body.
    pub body: Option<Vec<u8>>,
}

impl FetchRequest {
    /// Creates a `GET` request for `url` with no headers and no body.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// Creates a request with an explicit method.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Appends a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Response headers relevant to the fetcher plus the body stream.
pub struct FetchResponse {
    /// Raw `Content-Length` value, if the server sent one.
    pub content_length: Option<String>,
    /// Body stream, or `None` when the transport exposes no readable body.
    pub body: Option<Box<dyn ChunkStream>>,
}

impl FetchResponse {
    /// Builds a response with a body stream.
    pub fn new(content_length: Option<String>, body: Box<dyn ChunkStream>) -> Self {
        Self {
            content_length,
            body: Some(body),
        }
    }

    /// Builds a response that has no readable body.
    pub fn without_body(content_length: Option<String>) -> Self {
        Self {
            content_length,
            body: None,
        }
    }

    /// Declared body size in bytes, or `0` when absent or not a positive integer.
    #[must_use]
    pub fn declared_total(&self) -> u64 {
        let Some(raw) = self.content_length.as_deref() else {
            return 0;
        };
        match raw.trim().parse::<u64>() {
            Ok(total) => total,
            Err(_) => {
                tracing::warn!(content_length = raw, "ignoring unparsable Content-Length");
                0
            }
        }
    }
}

impl fmt::Debug for FetchResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchResponse")
            .field("content_length", &self.content_length)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Something that can issue a request and hand back a chunked body.
pub trait FetchTransport: Send + Sync {
    /// Issues the request and returns once response headers are available.
    fn send(&self, request: &FetchRequest) -> StreamingResult<FetchResponse>;

    /// Returns an identifier for log output, such as a base URL or file path.
    fn transport_id(&self) -> &str;
}

/// A response body delivered as a sequence of byte chunks.
pub trait ChunkStream: Send {
    /// Returns the next chunk, or `None` once the body is exhausted.
    fn next_chunk(&mut self) -> StreamingResult<Option<Vec<u8>>>;
}

/// Adapts any [`Read`] into a [`ChunkStream`] with a fixed read size.
pub struct ReadChunks<R> {
    reader: R,
    chunk_size: usize,
}

impl<R: Read> ReadChunks<R> {
    /// Wraps `reader`, reading at most `chunk_size` bytes per chunk.
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk_size: chunk_size.max(1),
        }
    }
}

impl<R: Read + Send> ChunkStream for ReadChunks<R> {
    fn next_chunk(&mut self) -> StreamingResult<Option<Vec<u8>>> {
        let mut buffer = vec![0u8; self.chunk_size];
        loop {
            match self.reader.read(&mut buffer) {
                Ok(0) => return Ok(None),
                Ok(n) => {
                    buffer.truncate(n);
                    return Ok(Some(buffer));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn declared_total_parsing() {
        let total = |raw: Option<&str>| FetchResponse::without_body(raw.map(String::from)).declared_total();
        assert_eq!(total(Some("100")), 100);
        assert_eq!(total(Some(" 42 ")), 42);
        assert_eq!(total(Some("0")), 0);
        assert_eq!(total(Some("-5")), 0);
        assert_eq!(total(Some("abc")), 0);
        assert_eq!(total(None), 0);
    }

    #[test]
    fn read_chunks_splits_reader() {
        let mut chunks = ReadChunks::new(Cursor::new(b"abcdefg".to_vec()), 3);
        assert_eq!(chunks.next_chunk().unwrap(), Some(b"abc".to_vec()));
        assert_eq!(chunks.next_chunk().unwrap(), Some(b"def".to_vec()));
        assert_eq!(chunks.next_chunk().unwrap(), Some(b"g".to_vec()));
        assert_eq!(chunks.next_chunk().unwrap(), None);
    }

    #[test]
    fn request_builder_keeps_header_order() {
        let request = FetchRequest::new("POST", "https://api.example.com/x")
            .header("Accept", "application/json")
            .header("X-Trace", "1")
            .body(b"{}".to_vec());
        assert_eq!(request.method, "POST");
        assert_eq!(request.headers[0].0, "Accept");
        assert_eq!(request.headers[1].0, "X-Trace");
        assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));
    }
}
