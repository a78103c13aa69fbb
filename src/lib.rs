//! Data access for the WorldSun member portal.
//!
//! The centrepiece is [`streaming::fetch_with_progress`], which drains a
//! response body while reporting percentage progress and then parses the
//! whole payload as JSON. [`industry`] and [`strategy`] build the dashboards on
//! top of it, and [`config`] resolves where the backends live.

pub mod config;
pub mod industry;
pub mod strategy;
pub mod streaming;

pub use config::{ClientConfig, ConfigError};
pub use streaming::{fetch_with_progress, FetchRequest, StreamingError, StreamingResult};
