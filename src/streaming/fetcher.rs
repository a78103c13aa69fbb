//! Progress-reporting fetch: drain a chunked body, then parse it as JSON.

use serde::de::DeserializeOwned;

use super::cancel::CancellationToken;
use super::error::StreamingError;
use super::source::{FetchRequest, FetchTransport, StreamingResult};

/// Fetches `request` through `transport`, reporting percentage progress, and
/// parses the full body as JSON.
///
/// `on_progress` receives `round(loaded / total * 100)` after each chunk when
/// the response declares a positive `Content-Length`, and exactly `100` once
/// the body is exhausted. Responses without a usable length only see the
/// final `100`. Values are not clamped: a server that sends more bytes than it
/// declared produces percentages above 100.
///
/// `T` is trusted as declared; no validation happens beyond deserialization.
///
/// # Errors
///
/// - [`StreamingError::StreamUnavailable`] if the response has no body
/// - any transport or read error, unchanged, if the transfer fails part way
///   (the final `100` is not reported in that case)
/// - [`StreamingError::Parse`] if the assembled body is not valid JSON for `T`
pub fn fetch_with_progress<T, Tr, P>(
    transport: &Tr,
    request: &FetchRequest,
    on_progress: P,
) -> StreamingResult<T>
where
    T: DeserializeOwned,
    Tr: FetchTransport + ?Sized,
    P: FnMut(u32),
{
    drain_and_parse(transport, request, on_progress, None)
}

/// Owns a transport and an optional cancellation token.
///
/// Every call is independent; nothing is shared between fetches apart from
/// the transport itself.
pub struct Fetcher<Tr: FetchTransport> {
    transport: Tr,
    cancel: Option<CancellationToken>,
}

impl<Tr: FetchTransport> Fetcher<Tr> {
    /// Wraps a transport.
    pub fn new(transport: Tr) -> Self {
        Self {
            transport,
            cancel: None,
        }
    }

    /// Attaches a token that aborts in-flight fetches when cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &Tr {
        &self.transport
    }

    /// Same as [`fetch_with_progress`], plus [`StreamingError::Cancelled`]
    /// when the attached token fires.
    ///
    /// # Errors
    ///
    /// See [`fetch_with_progress`].
    pub fn fetch<T, P>(&self, request: &FetchRequest, on_progress: P) -> StreamingResult<T>
    where
        T: DeserializeOwned,
        P: FnMut(u32),
    {
        drain_and_parse(&self.transport, request, on_progress, self.cancel.as_ref())
    }
}

/// Integer percentage of `loaded` over `total`, rounded half up.
///
/// `total` must be non-zero.
#[must_use]
pub fn progress_percent(loaded: u64, total: u64) -> u32 {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percent = ((loaded as f64 / total as f64) * 100.0).round() as u32;
    percent
}

fn check_cancelled(cancel: Option<&CancellationToken>) -> StreamingResult<()> {
    match cancel {
        Some(token) if token.is_cancelled() => Err(StreamingError::Cancelled),
        _ => Ok(()),
    }
}

fn drain_and_parse<T, Tr, P>(
    transport: &Tr,
    request: &FetchRequest,
    mut on_progress: P,
    cancel: Option<&CancellationToken>,
) -> StreamingResult<T>
where
    T: DeserializeOwned,
    Tr: FetchTransport + ?Sized,
    P: FnMut(u32),
{
    check_cancelled(cancel)?;
    tracing::debug!(
        transport = transport.transport_id(),
        method = %request.method,
        url = %request.url,
        "starting fetch"
    );

    let response = transport.send(request)?;
    let total = response.declared_total();
    let Some(mut body) = response.body else {
        return Err(StreamingError::StreamUnavailable);
    };

    let mut chunks: Vec<Vec<u8>> = Vec::new();
    let mut loaded: u64 = 0;

    loop {
        check_cancelled(cancel)?;
        let Some(chunk) = body.next_chunk()? else {
            break;
        };
        loaded += chunk.len() as u64;
        tracing::trace!(chunk_len = chunk.len(), loaded, total, "received chunk");
        chunks.push(chunk);
        if total > 0 {
            on_progress(progress_percent(loaded, total));
        }
    }

    on_progress(100);
    drop(body);

    let bytes = chunks.concat();
    tracing::debug!(url = %request.url, loaded, total, "fetch complete");
    decode_json(&bytes)
}

fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> StreamingResult<T> {
    // Invalid UTF-8 becomes U+FFFD; parsing decides whether that matters.
    let text = String::from_utf8_lossy(bytes);
    serde_json::from_str(&text).map_err(|source| StreamingError::Parse { source })
}
