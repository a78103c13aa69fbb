//! Progress-reporting JSON fetches over a pluggable transport.
//!
//! A fetch issues one request, drains the response body chunk by chunk while
//! reporting an integer percentage to a callback, then decodes the assembled
//! bytes as UTF-8 and parses them as JSON into the caller's type.
//!
//! # Transports
//!
//! - [`HttpTransport`]: real HTTP via a blocking reqwest client (feature `http`)
//! - [`LocalTransport`]: serves a local file, for development without network
//! - [`MemoryTransport`]: scripted chunks with failure injection, for tests
//!
//! # Example
//!
//! ```ignore
//! use worldsun_data::streaming::{fetch_with_progress, FetchRequest, HttpTransport};
//!
//! let transport = HttpTransport::new()?;
//! let value: serde_json::Value = fetch_with_progress(
//!     &transport,
//!     &FetchRequest::get("https://api.example.com/api/industry-data"),
//!     |pct| eprintln!("{pct}%"),
//! )?;
//! ```

mod cancel;
mod error;
mod fetcher;
#[cfg(feature = "http")]
mod http;
mod local;
mod memory;
mod source;

pub use cancel::CancellationToken;
pub use error::StreamingError;
pub use fetcher::{fetch_with_progress, progress_percent, Fetcher};
#[cfg(feature = "http")]
pub use http::{HttpAuthConfig, HttpConfig, HttpTransport};
pub use local::LocalTransport;
pub use memory::{InjectedFailure, MemoryTransport};
pub use source::{
    ChunkStream, FetchRequest, FetchResponse, FetchTransport, ReadChunks, StreamingResult,
    DEFAULT_CHUNK_SIZE,
};
