//! Usage reporting.
//!
//! [`Telemetry`] is the handle the rest of the tool records observations
//! through. It has two variants: [`Reporter`], which accumulates usage and
//! sends it through an [`AnalyticsClient`], and [`NoopReporter`], which does
//! nothing at all. Which one a run gets is decided once, at startup, by
//! [`from_config`].

pub mod builders;
pub mod noop;

use crate::config::Config;
use crate::event::Event;
use crate::settings::{RuleRegistry, ToolSettings};
use crate::transport::{AnalyticsClient, Endpoint, MemoryClient, TransportError};
use crate::usage::{LanguageMode, UsageState};
use std::sync::{Arc, Mutex};

pub use noop::NoopReporter;

/// Capability for recording and reporting tool usage.
///
/// Implementations never fail and never panic on transport problems; usage
/// reporting must not change the outcome of an analysis run.
pub trait Telemetry: Send + Sync {
    /// Record a rule parameter, e.g. `"LongLine.limit" = "120"`.
    fn record_rule_configuration(&self, key: &str, value: &str);

    /// Record the language mode of one compilation unit.
    fn record_language_observed(&self, mode: LanguageMode);

    /// Send everything recorded so far.
    ///
    /// Meant to be called once after analysis finishes. Calling it again
    /// sends a fresh batch built from the same accumulated state.
    fn send(&self, settings: &ToolSettings, rules: &dyn RuleRegistry);
}

/// Thread-safe shared telemetry handle.
pub type SharedTelemetry = Arc<dyn Telemetry>;

/// Reporter backed by a transport client.
pub struct Reporter<C: AnalyticsClient> {
    usage: UsageState,
    client: Mutex<C>,
    endpoint: Endpoint,
}

impl<C: AnalyticsClient> Reporter<C> {
    /// Create a reporter that delivers to `endpoint` through `client`.
    pub fn new(client: C, endpoint: Endpoint) -> Self {
        Self {
            usage: UsageState::new(),
            client: Mutex::new(client),
            endpoint,
        }
    }

    /// Accumulated usage.
    pub fn usage(&self) -> &UsageState {
        &self.usage
    }

    /// The events `send` would deliver right now, without delivering them.
    pub fn preview(&self, settings: &ToolSettings, rules: &dyn RuleRegistry) -> Vec<Event> {
        let usage = self.usage.snapshot();
        let client = self.lock_client();
        builders::build_report(&*client, settings, rules, &usage)
    }

    fn lock_client(&self) -> std::sync::MutexGuard<'_, C> {
        self.client
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Reporter<MemoryClient> {
    /// A reporter that only records, reporting this machine's real host facts.
    ///
    /// Its [`preview`](Reporter::preview) is the batch a networked reporter
    /// would send for the same observations.
    pub fn for_preview() -> Self {
        Self::new(MemoryClient::with_platform(), Endpoint::new("preview", "preview"))
    }
}

impl<C: AnalyticsClient> Telemetry for Reporter<C> {
    fn record_rule_configuration(&self, key: &str, value: &str) {
        self.usage.record_rule_configuration(key, value);
    }

    fn record_language_observed(&self, mode: LanguageMode) {
        self.usage.record_language_observed(mode);
    }

    fn send(&self, settings: &ToolSettings, rules: &dyn RuleRegistry) {
        let usage = self.usage.snapshot();
        let mut client = self.lock_client();

        if let Err(e) = client.start(&self.endpoint) {
            tracing::warn!(host = %self.endpoint.host, error = %e, "analytics session not started, report dropped");
            return;
        }

        let events = builders::build_report(&*client, settings, rules, &usage);
        tracing::info!(host = %self.endpoint.host, events = events.len(), "sending usage report");

        for event in &events {
            match client.record_event(event) {
                Ok(()) => tracing::debug!(event = event.name(), "event sent"),
                Err(e) => tracing::warn!(event = event.name(), error = %e, "event dropped"),
            }
        }

        if let Err(e) = client.suspend() {
            tracing::warn!(error = %e, "analytics session not closed cleanly");
        }
    }
}

/// Platform-agnostic reporter type alias
#[cfg(feature = "countly")]
pub type Analytics = Reporter<crate::transport::CountlyClient>;

/// Platform-agnostic reporter type alias
#[cfg(not(feature = "countly"))]
pub type Analytics = NoopReporter;

/// Pick the reporter for `config`, building its client with `make_client`.
///
/// Returns the no-op variant when reporting is disabled, no endpoint is
/// configured, or the client cannot be created. `make_client` is only
/// called when a client is actually needed.
pub fn select<C, F>(config: &Config, make_client: F) -> SharedTelemetry
where
    C: AnalyticsClient + 'static,
    F: FnOnce() -> Result<C, TransportError>,
{
    if !config.enabled {
        tracing::debug!("usage reporting disabled by configuration");
        return Arc::new(NoopReporter::new());
    }

    let Some(endpoint) = config.endpoint() else {
        tracing::debug!("no analytics endpoint configured");
        return Arc::new(NoopReporter::new());
    };

    match make_client() {
        Ok(client) => Arc::new(Reporter::new(client, endpoint)),
        Err(e) => {
            tracing::warn!(error = %e, "analytics client unavailable, reporting disabled");
            Arc::new(NoopReporter::new())
        }
    }
}

/// Pick the reporter for this run.
#[cfg(feature = "countly")]
pub fn from_config(config: &Config) -> SharedTelemetry {
    select(config, || crate::transport::CountlyClient::new(config.timeout()))
}

/// Pick the reporter for this run.
///
/// Built without the `countly` feature, so this is always the no-op variant.
#[cfg(not(feature = "countly"))]
pub fn from_config(_config: &Config) -> SharedTelemetry {
    Arc::new(NoopReporter::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::transport::{platform, ClientCall};
    use crate::usage::Language;

    fn reporter() -> (Reporter<MemoryClient>, MemoryClient) {
        let observer = MemoryClient::new();
        let reporter = Reporter::new(observer.clone(), Endpoint::new("analytics.test", "app-key"));
        (reporter, observer)
    }

    #[test]
    fn test_send_wraps_events_in_session() {
        let (reporter, observer) = reporter();
        reporter.send(&ToolSettings::default(), &Vec::<String>::new());

        let calls = observer.calls();
        assert_eq!(
            calls.first(),
            Some(&ClientCall::Start {
                host: "analytics.test".to_string(),
                app_key: "app-key".to_string(),
            })
        );
        assert_eq!(calls.last(), Some(&ClientCall::Suspend));
        assert_eq!(calls.len(), 5);
    }

    #[test]
    fn test_failed_events_do_not_stop_report() {
        let observer = MemoryClient::failing();
        let reporter = Reporter::new(observer.clone(), Endpoint::new("analytics.test", "app-key"));
        reporter.record_rule_configuration("LongLine.limit", "100");
        reporter.send(&ToolSettings::default(), &vec!["R1"]);

        assert_eq!(observer.events().len(), 4);
        assert_eq!(observer.calls().last(), Some(&ClientCall::Suspend));
    }

    #[test]
    fn test_preview_matches_send() {
        let (reporter, observer) = reporter();
        reporter.record_language_observed(LanguageMode::empty().with(Language::ObjC));

        let rules = vec!["R1"];
        let preview = reporter.preview(&ToolSettings::default(), &rules);
        assert!(observer.calls().is_empty());

        reporter.send(&ToolSettings::default(), &rules);
        assert_eq!(observer.events(), preview);
        assert_eq!(preview.last().map(|e| e.kind), Some(EventKind::DevLanguageCount));
    }

    fn configured(enabled: bool) -> Config {
        Config {
            enabled,
            endpoint: Some(crate::config::EndpointConfig {
                host: "analytics.test".to_string(),
                app_key: "app-key".to_string(),
                use_tls: true,
            }),
            ..Config::default()
        }
    }

    #[test]
    fn test_disabled_config_yields_noop() {
        let observer = MemoryClient::new();
        let telemetry = select(&configured(false), || Ok(observer.clone()));
        telemetry.record_rule_configuration("a.b", "x");
        telemetry.record_language_observed(LanguageMode::empty().with(Language::C));
        telemetry.send(&ToolSettings::default(), &vec!["R1"]);

        assert!(observer.calls().is_empty());
    }

    #[test]
    fn test_missing_endpoint_yields_noop() {
        let observer = MemoryClient::new();
        let telemetry = select(&Config::default(), || Ok(observer.clone()));
        telemetry.send(&ToolSettings::default(), &vec!["R1"]);

        assert!(observer.calls().is_empty());
    }

    #[test]
    fn test_enabled_config_reports_through_client() {
        let observer = MemoryClient::new();
        let telemetry = select(&configured(true), || Ok(observer.clone()));
        telemetry.send(&ToolSettings::default(), &vec!["R1"]);

        assert_eq!(
            observer.calls().first(),
            Some(&ClientCall::Start {
                host: "analytics.test".to_string(),
                app_key: "app-key".to_string(),
            })
        );
        assert_eq!(observer.events().len(), 3);
    }

    #[test]
    fn test_preview_reports_real_host() {
        let reporter = Reporter::for_preview();
        let events = reporter.preview(&ToolSettings::default(), &vec!["R1"]);
        let environment = &events[0];

        assert_eq!(
            environment.segment("device_id"),
            Some(platform::device_id().as_str())
        );
        assert_eq!(
            environment.segment("os"),
            Some(platform::os_string(&platform::os_name(), &platform::os_version()).as_str())
        );
    }
}
