//! Countly client for delivering reports over HTTP.
//!
//! Every call maps to one request against the backend's `/i` ingest
//! endpoint: `begin_session` on start, one `events` batch per event, and
//! `end_session` on suspend.

use super::{platform, AnalyticsClient, Endpoint, TransportError};
use crate::event::{Event, Segments};
use chrono::Utc;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

/// Session metrics sent with `begin_session`.
#[derive(Debug, Clone, Serialize)]
struct SessionMetrics {
    #[serde(rename = "_os")]
    os: String,
    #[serde(rename = "_os_version")]
    os_version: String,
    #[serde(rename = "_app_version")]
    app_version: String,
}

/// One entry of the `events` parameter.
#[derive(Debug, Clone, Serialize)]
struct EventPayload<'a> {
    key: &'a str,
    count: u32,
    segmentation: &'a Segments,
    timestamp: i64,
}

/// Async Countly client.
pub struct AsyncCountlyClient {
    client: reqwest::Client,
    device_id: String,
    os: String,
    os_version: String,
}

impl AsyncCountlyClient {
    /// Create a new client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            device_id: platform::device_id(),
            os: platform::os_name(),
            os_version: platform::os_version(),
        })
    }

    /// Open a session.
    pub async fn begin_session(&self, endpoint: &Endpoint) -> Result<(), TransportError> {
        let metrics = serde_json::to_string(&SessionMetrics {
            os: self.os.clone(),
            os_version: self.os_version.clone(),
            app_version: crate::VERSION.to_string(),
        })
        .map_err(|e| TransportError::Serialization(e.to_string()))?;

        self.post(
            endpoint,
            &[("begin_session", "1".to_string()), ("metrics", metrics)],
        )
        .await
    }

    /// Send one event.
    pub async fn send_event(&self, endpoint: &Endpoint, event: &Event) -> Result<(), TransportError> {
        let events = serde_json::to_string(&[EventPayload {
            key: event.name(),
            count: 1,
            segmentation: &event.segments,
            timestamp: Utc::now().timestamp_millis(),
        }])
        .map_err(|e| TransportError::Serialization(e.to_string()))?;

        self.post(endpoint, &[("events", events)]).await
    }

    /// Close the session.
    pub async fn end_session(&self, endpoint: &Endpoint) -> Result<(), TransportError> {
        self.post(endpoint, &[("end_session", "1".to_string())]).await
    }

    async fn post(
        &self,
        endpoint: &Endpoint,
        params: &[(&str, String)],
    ) -> Result<(), TransportError> {
        let mut form: Vec<(&str, String)> = vec![
            ("app_key", endpoint.app_key.clone()),
            ("device_id", self.device_id.clone()),
            ("timestamp", Utc::now().timestamp_millis().to_string()),
        ];
        form.extend(params.iter().cloned());

        let response = self
            .client
            .post(endpoint.ingest_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TransportError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Get the device ID.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }
}

/// Blocking Countly client for the synchronous reporter.
pub struct CountlyClient {
    inner: AsyncCountlyClient,
    /// Always `Some` until dropped
    runtime: Option<tokio::runtime::Runtime>,
    session: Option<Endpoint>,
}

impl CountlyClient {
    /// Create a new blocking client.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| TransportError::Runtime(format!("Failed to create runtime: {e}")))?;

        Ok(Self {
            inner: AsyncCountlyClient::new(timeout)?,
            runtime: Some(runtime),
            session: None,
        })
    }

    fn session(&self) -> Result<&Endpoint, TransportError> {
        self.session.as_ref().ok_or(TransportError::NotStarted)
    }

    /// Drive `request` to completion on the client's own runtime.
    ///
    /// A runtime cannot be entered from a thread that is already running
    /// one, so callers inside an async context get a scoped worker thread.
    fn block_on<F>(&self, request: F) -> Result<(), TransportError>
    where
        F: Future<Output = Result<(), TransportError>> + Send,
    {
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| TransportError::Runtime("Runtime already shut down".to_string()))?;

        if tokio::runtime::Handle::try_current().is_err() {
            return runtime.block_on(request);
        }

        std::thread::scope(|scope| {
            scope
                .spawn(|| runtime.block_on(request))
                .join()
                .unwrap_or_else(|_| {
                    Err(TransportError::Runtime(
                        "Analytics worker thread panicked".to_string(),
                    ))
                })
        })
    }
}

impl AnalyticsClient for CountlyClient {
    fn start(&mut self, endpoint: &Endpoint) -> Result<(), TransportError> {
        self.block_on(self.inner.begin_session(endpoint))?;
        self.session = Some(endpoint.clone());
        Ok(())
    }

    fn record_event(&mut self, event: &Event) -> Result<(), TransportError> {
        let endpoint = self.session()?;
        self.block_on(self.inner.send_event(endpoint, event))
    }

    fn suspend(&mut self) -> Result<(), TransportError> {
        let Some(endpoint) = self.session.take() else {
            return Ok(());
        };
        self.block_on(self.inner.end_session(&endpoint))
    }

    fn device_id(&self) -> String {
        self.inner.device_id().to_string()
    }

    fn os(&self) -> String {
        self.inner.os.clone()
    }

    fn os_version(&self) -> String {
        self.inner.os_version.clone()
    }
}

impl Drop for CountlyClient {
    // Dropping a runtime inside another runtime's context panics.
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
