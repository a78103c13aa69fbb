//! In-memory transport with scripted chunks and failure injection.
//!
//! Replays the same response on every call, which makes it suitable for
//! exercising progress reporting and error paths deterministically.

use std::collections::VecDeque;
use std::io;

use super::source::{ChunkStream, FetchRequest, FetchResponse, FetchTransport, StreamingResult};

/// Failure to inject while replaying the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedFailure {
    /// Number of chunks delivered before the failure.
    pub after_chunks: usize,
    /// Message carried by the resulting I/O error.
    pub message: String,
}

/// Transport that serves a fixed list of chunks.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    chunks: Vec<Vec<u8>>,
    content_length: Option<String>,
    missing_body: bool,
    failure: Option<InjectedFailure>,
}

impl MemoryTransport {
    /// Serves `chunks` in order with no `Content-Length`.
    pub fn new<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Splits `payload` into chunks of `sizes` bytes; any remainder forms a final chunk.
    pub fn split(payload: &[u8], sizes: &[usize]) -> Self {
        let mut chunks = Vec::with_capacity(sizes.len() + 1);
        let mut offset = 0;
        for &size in sizes {
            let end = (offset + size).min(payload.len());
            chunks.push(payload[offset..end].to_vec());
            offset = end;
        }
        if offset < payload.len() {
            chunks.push(payload[offset..].to_vec());
        }
        Self::new(chunks)
    }

    /// Advertises the sum of chunk lengths as `Content-Length`.
    #[must_use]
    pub fn with_exact_length(self) -> Self {
        let total: usize = self.chunks.iter().map(Vec::len).sum();
        self.with_content_length(total.to_string())
    }

    /// Advertises an arbitrary `Content-Length` value.
    #[must_use]
    pub fn with_content_length(mut self, value: impl Into<String>) -> Self {
        self.content_length = Some(value.into());
        self
    }

    /// Responds without a readable body.
    #[must_use]
    pub fn without_body(mut self) -> Self {
        self.missing_body = true;
        self
    }

    /// Fails with an I/O error after delivering `after_chunks` chunks.
    #[must_use]
    pub fn fail_after(mut self, after_chunks: usize, message: impl Into<String>) -> Self {
        self.failure = Some(InjectedFailure {
            after_chunks,
            message: message.into(),
        });
        self
    }
}

impl FetchTransport for MemoryTransport {
    fn send(&self, _request: &FetchRequest) -> StreamingResult<FetchResponse> {
        if self.missing_body {
            return Ok(FetchResponse::without_body(self.content_length.clone()));
        }
        let body = MemoryBody {
            chunks: self.chunks.iter().cloned().collect(),
            delivered: 0,
            failure: self.failure.clone(),
        };
        Ok(FetchResponse::new(self.content_length.clone(), Box::new(body)))
    }

    fn transport_id(&self) -> &str {
        "memory"
    }
}

struct MemoryBody {
    chunks: VecDeque<Vec<u8>>,
    delivered: usize,
    failure: Option<InjectedFailure>,
}

impl ChunkStream for MemoryBody {
    fn next_chunk(&mut self) -> StreamingResult<Option<Vec<u8>>> {
        if let Some(failure) = &self.failure {
            if self.delivered == failure.after_chunks {
                let err = io::Error::new(io::ErrorKind::ConnectionReset, failure.message.clone());
                return Err(err.into());
            }
        }
        let next = self.chunks.pop_front();
        if next.is_some() {
            self.delivered += 1;
        }
        Ok(next)
    }
}
