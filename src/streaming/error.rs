//! Error types for progressive fetch operations.

use thiserror::Error;

/// Errors that can occur while fetching and decoding a streamed response.
#[derive(Debug, Error)]
pub enum StreamingError {
    /// The response did not carry a readable body.
    #[error("Response body stream not available")]
    StreamUnavailable,

    /// The request description could not be turned into a transport request.
    #[error("Invalid request: {reason}")]
    InvalidRequest {
        /// Why the request was rejected
        reason: String,
    },

    /// HTTP error response from the server.
    ///
    /// Only produced when the transport is configured to reject non-success
    /// statuses.
    #[error("HTTP error: {status} - {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase
        message: String,
    },

    /// Network error during the request or while reading the body.
    #[cfg(feature = "http")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout in seconds
        timeout_secs: u64,
    },

    /// I/O error while reading body chunks.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The caller cancelled the fetch before the body was fully read.
    #[error("Fetch cancelled")]
    Cancelled,

    /// The body was received in full but is not valid JSON for the requested type.
    #[error("Failed to parse response JSON: {source}")]
    Parse {
        /// Underlying decode failure
        #[source]
        source: serde_json::Error,
    },
}

impl StreamingError {
    /// Returns true if the transfer completed but the payload could not be parsed.
    #[must_use]
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Returns true for failures raised by the transport or body stream.
    #[must_use]
    pub fn is_stream_failure(&self) -> bool {
        !self.is_parse_failure()
    }
}
