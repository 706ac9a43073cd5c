//! Builders for the individual events of a report.
//!
//! Each builder is a pure read of settings, the rule registry or the usage
//! snapshot. Builders with a guard return `None` when there is nothing to
//! report.

use crate::event::{flag, Event, EventKind, Segments};
use crate::identity::hashed_working_path;
use crate::settings::{RuleRegistry, ToolSettings};
use crate::transport::{platform, AnalyticsClient};
use crate::usage::UsageSnapshot;

/// Machine, project and tool identity.
///
/// Device and OS facts come from the transport client.
pub fn environment_event(client: &dyn AnalyticsClient, settings: &ToolSettings) -> Event {
    let mut segments = Segments::new();
    segments.insert("device_id".to_string(), client.device_id());
    segments.insert(
        "project_id".to_string(),
        hashed_working_path(&settings.working_path),
    );
    segments.insert("version".to_string(), settings.version.clone());
    segments.insert("bin_path".to_string(), settings.bin_path.clone());
    segments.insert(
        "os".to_string(),
        platform::os_string(&client.os(), &client.os_version()),
    );
    Event::new(EventKind::DevEnvironment, segments)
}

/// Scalar analysis settings.
pub fn configuration_event(settings: &ToolSettings) -> Event {
    let mut segments = Segments::new();
    segments.insert("report_type".to_string(), settings.report_type.clone());
    segments.insert("global_analysis".to_string(), flag(settings.global_analysis));
    segments.insert("clang_checker".to_string(), flag(settings.clang_checker));
    segments.insert(
        "allow_duplications".to_string(),
        flag(settings.allow_duplicated_violations),
    );
    segments.insert("p1_violations".to_string(), settings.max_p1.to_string());
    segments.insert("p2_violations".to_string(), settings.max_p2.to_string());
    segments.insert("p3_violations".to_string(), settings.max_p3.to_string());
    Event::new(EventKind::DevConfiguration, segments)
}

/// One segment per known rule: `"1"` if the active filter selects it.
pub fn loaded_rules_event(settings: &ToolSettings, rules: &dyn RuleRegistry) -> Event {
    let segments = rules
        .rule_identifiers()
        .into_iter()
        .map(|rule_id| {
            let enabled = flag(settings.is_rule_enabled(&rule_id));
            (rule_id, enabled)
        })
        .collect();
    Event::new(EventKind::DevLoadedRules, segments)
}

/// Recorded rule parameters, if any.
pub fn rule_configurations_event(usage: &UsageSnapshot) -> Option<Event> {
    if usage.rule_configurations.is_empty() {
        return None;
    }
    Some(Event::new(
        EventKind::DevRuleConfigurations,
        usage.rule_configurations.clone(),
    ))
}

/// Non-zero language counters, if any language was observed.
pub fn language_count_event(usage: &UsageSnapshot) -> Option<Event> {
    let segments: Segments = usage
        .nonzero_language_counts()
        .into_iter()
        .map(|(lang, count)| (lang.tag().to_string(), count.to_string()))
        .collect();

    if segments.is_empty() {
        return None;
    }
    Some(Event::new(EventKind::DevLanguageCount, segments))
}

/// Build the full report in send order.
pub fn build_report(
    client: &dyn AnalyticsClient,
    settings: &ToolSettings,
    rules: &dyn RuleRegistry,
    usage: &UsageSnapshot,
) -> Vec<Event> {
    let mut events = vec![
        environment_event(client, settings),
        configuration_event(settings),
        loaded_rules_event(settings, rules),
    ];
    events.extend(rule_configurations_event(usage));
    events.extend(language_count_event(usage));
    events
}
