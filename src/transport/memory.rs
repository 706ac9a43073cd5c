//! In-memory analytics client.
//!
//! Records every call instead of sending it anywhere. Used for previews and
//! for asserting on exactly what a report would transmit.

use super::{platform, AnalyticsClient, Endpoint, TransportError};
use crate::event::Event;
use std::sync::{Arc, Mutex};

/// A call made against a [`MemoryClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    Start { host: String, app_key: String },
    RecordEvent(Event),
    Suspend,
}

/// Client that keeps calls in memory.
///
/// Clones share the same call log, so a test can hand one clone to a
/// reporter and inspect the other. Host facts are fixed placeholders unless
/// the client is built with [`MemoryClient::with_platform`].
#[derive(Debug, Clone, Default)]
pub struct MemoryClient {
    calls: Arc<Mutex<Vec<ClientCall>>>,
    started: bool,
    fail_events: bool,
    real_host: bool,
}

impl MemoryClient {
    /// Create a new memory client.
    pub fn new() -> Self {
        Self::default()
    }

    /// A client reporting this machine's real device id and OS, so the
    /// recorded events match what a network client would send.
    pub fn with_platform() -> Self {
        Self {
            real_host: true,
            ..Self::default()
        }
    }

    /// A client whose `record_event` always fails after logging the call.
    pub fn failing() -> Self {
        Self {
            fail_events: true,
            ..Self::default()
        }
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<ClientCall> {
        self.lock().clone()
    }

    /// Events recorded so far, in order.
    pub fn events(&self) -> Vec<Event> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                ClientCall::RecordEvent(event) => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget all recorded calls.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ClientCall>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AnalyticsClient for MemoryClient {
    fn start(&mut self, endpoint: &Endpoint) -> Result<(), TransportError> {
        self.lock().push(ClientCall::Start {
            host: endpoint.host.clone(),
            app_key: endpoint.app_key.clone(),
        });
        self.started = true;
        Ok(())
    }

    fn record_event(&mut self, event: &Event) -> Result<(), TransportError> {
        if !self.started {
            return Err(TransportError::NotStarted);
        }
        self.lock().push(ClientCall::RecordEvent(event.clone()));
        if self.fail_events {
            return Err(TransportError::Network("connection refused".to_string()));
        }
        Ok(())
    }

    fn suspend(&mut self) -> Result<(), TransportError> {
        self.lock().push(ClientCall::Suspend);
        self.started = false;
        Ok(())
    }

    fn device_id(&self) -> String {
        if self.real_host {
            return platform::device_id();
        }
        "memory-device".to_string()
    }

    fn os(&self) -> String {
        if self.real_host {
            return platform::os_name();
        }
        "testos".to_string()
    }

    fn os_version(&self) -> String {
        if self.real_host {
            return platform::os_version();
        }
        "1.0".to_string()
    }
}
