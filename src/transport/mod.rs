//! Transport clients that deliver events to an analytics backend.
//!
//! The reporter talks to the backend only through [`AnalyticsClient`], so the
//! HTTP client can be compiled out and tests can substitute an in-memory one.

pub mod memory;
pub mod platform;

#[cfg(feature = "countly")]
pub mod countly;

use crate::event::Event;
use thiserror::Error;

pub use memory::{ClientCall, MemoryClient};

#[cfg(feature = "countly")]
pub use countly::{AsyncCountlyClient, CountlyClient};

/// Where a report is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Backend host, optionally with a port
    pub host: String,
    /// Application key issued by the backend
    pub app_key: String,
    /// Use HTTPS
    pub use_tls: bool,
}

impl Endpoint {
    /// Create a new HTTPS endpoint.
    pub fn new(host: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            app_key: app_key.into(),
            use_tls: true,
        }
    }

    /// Get the base URL.
    pub fn url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{scheme}://{}", self.host)
    }

    /// Get the ingest URL.
    pub fn ingest_url(&self) -> String {
        format!("{}/i", self.url())
    }
}

/// Transport error types.
#[derive(Debug, Error)]
pub enum TransportError {
    /// An event was recorded before `start`
    #[error("Analytics client not started")]
    NotStarted,
    /// Network/HTTP error
    #[error("Analytics network error: {0}")]
    Network(String),
    /// Backend returned an error response
    #[error("Analytics server error ({status}): {message}")]
    Server { status: u16, message: String },
    /// JSON serialization error
    #[error("Analytics serialization error: {0}")]
    Serialization(String),
    /// Async runtime could not be created
    #[error("Analytics runtime error: {0}")]
    Runtime(String),
}

/// A session-oriented analytics client.
///
/// A report is one session: `start`, any number of `record_event` calls,
/// then `suspend`.
pub trait AnalyticsClient: Send {
    /// Open a session against `endpoint`.
    fn start(&mut self, endpoint: &Endpoint) -> Result<(), TransportError>;

    /// Deliver one event within the open session.
    fn record_event(&mut self, event: &Event) -> Result<(), TransportError>;

    /// Close the session.
    fn suspend(&mut self) -> Result<(), TransportError>;

    /// Anonymous identifier of this machine.
    fn device_id(&self) -> String {
        platform::device_id()
    }

    /// Operating system name.
    fn os(&self) -> String {
        platform::os_name()
    }

    /// Operating system version.
    fn os_version(&self) -> String {
        platform::os_version()
    }
}
