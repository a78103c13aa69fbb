//! HTTP transport implementation using reqwest.

use std::io::ErrorKind;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH};
use reqwest::Method;

use super::error::StreamingError;
use super::source::{
    ChunkStream, FetchRequest, FetchResponse, FetchTransport, ReadChunks, StreamingResult,
    DEFAULT_CHUNK_SIZE,
};

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Connect and whole-request timeout in seconds (default: 30).
    pub timeout_secs: u64,
    /// Authentication configuration.
    pub auth: Option<HttpAuthConfig>,
    /// Custom User-Agent header.
    pub user_agent: Option<String>,
    /// Bytes requested per body read (default: 16 KiB).
    pub chunk_size: usize,
    /// Fail with [`StreamingError::Http`] on non-2xx statuses instead of
    /// handing the body to the parser (default: false).
    pub reject_error_status: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            auth: None,
            user_agent: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            reject_error_status: false,
        }
    }
}

/// Authentication configuration for HTTP requests.
#[derive(Debug, Clone)]
pub enum HttpAuthConfig {
    /// Bearer token authentication.
    Bearer(String),
    /// Custom header-based authentication.
    CustomHeader {
        /// Header name (e.g., "X-API-Key")
        name: String,
        /// Header value
        value: String,
    },
}

/// Transport that issues real HTTP requests with a blocking reqwest client.
pub struct HttpTransport {
    client: Client,
    config: HttpConfig,
    id: String,
}

impl HttpTransport {
    /// Creates a transport with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built.
    pub fn new() -> StreamingResult<Self> {
        Self::with_config(HttpConfig::default())
    }

    /// Creates a transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built.
    pub fn with_config(config: HttpConfig) -> StreamingResult<Self> {
        let mut client_builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs));

        if let Some(ref ua) = config.user_agent {
            client_builder = client_builder.user_agent(ua.clone());
        } else {
            client_builder =
                client_builder.user_agent(concat!("worldsun-data/", env!("CARGO_PKG_VERSION")));
        }

        let client = client_builder.build()?;

        Ok(Self {
            client,
            config,
            id: "http".to_string(),
        })
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Applies authentication headers to a request.
    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.auth {
            Some(HttpAuthConfig::Bearer(token)) => {
                request.header(AUTHORIZATION, format!("Bearer {token}"))
            }
            Some(HttpAuthConfig::CustomHeader { name, value }) => request.header(name, value),
            None => request,
        }
    }

    fn build_request(&self, request: &FetchRequest) -> StreamingResult<RequestBuilder> {
        let method = Method::from_bytes(request.method.as_bytes()).map_err(|_| {
            StreamingError::InvalidRequest {
                reason: format!("invalid HTTP method '{}'", request.method),
            }
        })?;

        let mut builder = self.apply_auth(self.client.request(method, &request.url));
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        Ok(builder)
    }

    fn map_error(&self, err: reqwest::Error) -> StreamingError {
        if err.is_timeout() {
            StreamingError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            StreamingError::Network(err)
        }
    }
}

impl FetchTransport for HttpTransport {
    fn send(&self, request: &FetchRequest) -> StreamingResult<FetchResponse> {
        let response = self
            .build_request(request)?
            .send()
            .map_err(|e| self.map_error(e))?;
        let status = response.status();

        if self.config.reject_error_status && !status.is_success() {
            return Err(StreamingError::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown error").into(),
            });
        }

        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        tracing::debug!(
            url = %request.url,
            status = status.as_u16(),
            content_length = content_length.as_deref().unwrap_or("-"),
            "received response headers"
        );

        let body = HttpBody {
            inner: ReadChunks::new(response, self.config.chunk_size),
            timeout_secs: self.config.timeout_secs,
        };
        Ok(FetchResponse::new(content_length, Box::new(body)))
    }

    fn transport_id(&self) -> &str {
        &self.id
    }
}

/// Response body reader that reports read timeouts as [`StreamingError::Timeout`].
struct HttpBody {
    inner: ReadChunks<Response>,
    timeout_secs: u64,
}

impl ChunkStream for HttpBody {
    fn next_chunk(&mut self) -> StreamingResult<Option<Vec<u8>>> {
        match self.inner.next_chunk() {
            Err(StreamingError::Io(e)) if e.kind() == ErrorKind::TimedOut => {
                Err(StreamingError::Timeout {
                    timeout_secs: self.timeout_secs,
                })
            }
            other => other,
        }
    }
}
