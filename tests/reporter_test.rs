//! Integration tests for usage reporting

use lint_analytics::transport::ClientCall;
use lint_analytics::{
    hashed_working_path, report, Config, Endpoint, EndpointConfig, EventKind, Language,
    LanguageMode, MemoryClient, NoopReporter, Reporter, Telemetry, ToolSettings,
};

fn test_settings() -> ToolSettings {
    ToolSettings {
        working_path: "/work/project".to_string(),
        version: "1.2.3".to_string(),
        bin_path: "/opt/lint/bin/lint".to_string(),
        report_type: "xml".to_string(),
        global_analysis: false,
        clang_checker: true,
        allow_duplicated_violations: true,
        max_p1: 0,
        max_p2: 10,
        max_p3: 20,
        rule_filter: vec!["R2".to_string()],
    }
}

fn test_reporter() -> (Reporter<MemoryClient>, MemoryClient) {
    let observer = MemoryClient::new();
    let reporter = Reporter::new(
        observer.clone(),
        Endpoint::new("analytics.test", "test-app-key"),
    );
    (reporter, observer)
}

#[test]
fn test_full_report_call_sequence() {
    let (reporter, observer) = test_reporter();
    reporter.record_rule_configuration("LongLine.limit", "120");
    reporter.record_language_observed(LanguageMode::from_flags(true, true, false));

    reporter.send(&test_settings(), &vec!["R1", "R2", "R3"]);

    let calls = observer.calls();
    assert_eq!(calls.len(), 7);
    assert!(matches!(calls[0], ClientCall::Start { .. }));
    assert_eq!(calls[6], ClientCall::Suspend);

    let kinds: Vec<_> = observer.events().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, EventKind::ALL.to_vec());
}

#[test]
fn test_environment_and_configuration_events() {
    let (reporter, observer) = test_reporter();
    reporter.send(&test_settings(), &Vec::<String>::new());

    let events = observer.events();
    let environment = &events[0];
    assert_eq!(
        environment.segment("project_id"),
        Some(hashed_working_path("/work/project").as_str())
    );
    assert_eq!(environment.segment("version"), Some("1.2.3"));

    let configuration = &events[1];
    assert_eq!(configuration.segment("report_type"), Some("xml"));
    assert_eq!(configuration.segment("global_analysis"), Some("0"));
    assert_eq!(configuration.segment("clang_checker"), Some("1"));
    assert_eq!(configuration.segment("allow_duplications"), Some("1"));
    assert_eq!(configuration.segment("p3_violations"), Some("20"));
}

#[test]
fn test_loaded_rules_cover_registry() {
    let (reporter, observer) = test_reporter();
    reporter.send(&test_settings(), &vec!["R1", "R2", "R3"]);

    let loaded = observer
        .events()
        .into_iter()
        .find(|e| e.kind == EventKind::DevLoadedRules)
        .unwrap();
    assert_eq!(loaded.segments.len(), 3);
    assert_eq!(loaded.segment("R1"), Some("0"));
    assert_eq!(loaded.segment("R2"), Some("1"));
    assert_eq!(loaded.segment("R3"), Some("0"));
}

#[test]
fn test_no_observations_skip_guarded_events() {
    let (reporter, observer) = test_reporter();
    reporter.send(&test_settings(), &vec!["R1"]);

    let kinds: Vec<_> = observer.events().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::DevEnvironment,
            EventKind::DevConfiguration,
            EventKind::DevLoadedRules,
        ]
    );
}

#[test]
fn test_single_cpp_observation() {
    let (reporter, observer) = test_reporter();
    reporter.record_language_observed(LanguageMode::empty().with(Language::Cpp));
    reporter.send(&test_settings(), &vec!["R1"]);

    let counts = observer.events().pop().unwrap();
    assert_eq!(counts.kind, EventKind::DevLanguageCount);
    assert_eq!(counts.segments.len(), 1);
    assert_eq!(counts.segment("cpp"), Some("1"));
}

#[test]
fn test_repeated_observations_all_counted() {
    let (reporter, observer) = test_reporter();
    let c_unit = LanguageMode::from_flags(false, false, true);
    reporter.record_language_observed(c_unit);
    reporter.record_language_observed(c_unit);
    reporter.send(&test_settings(), &vec!["R1"]);

    let counts = observer.events().pop().unwrap();
    assert_eq!(counts.segment("c"), Some("2"));
}

#[test]
fn test_rule_configuration_overwrite() {
    let (reporter, observer) = test_reporter();
    reporter.record_rule_configuration("a.b", "x");
    reporter.record_rule_configuration("a.b", "y");
    reporter.send(&test_settings(), &vec!["R1"]);

    let configs = observer
        .events()
        .into_iter()
        .find(|e| e.kind == EventKind::DevRuleConfigurations)
        .unwrap();
    assert_eq!(configs.segments.len(), 1);
    assert_eq!(configs.segment("a.b"), Some("y"));
}

#[test]
fn test_second_send_repeats_batch() {
    let (reporter, observer) = test_reporter();
    reporter.record_rule_configuration("LongLine.limit", "100");
    reporter.record_language_observed(LanguageMode::from_flags(true, false, false));
    let rules = vec!["R1", "R2"];

    reporter.send(&test_settings(), &rules);
    let first = observer.events();
    observer.clear();

    reporter.send(&test_settings(), &rules);
    let second = observer.events();

    assert_eq!(first, second);
    assert_eq!(observer.calls().len(), first.len() + 2);
}

#[test]
fn test_transport_failure_is_silent() {
    let observer = MemoryClient::failing();
    let reporter = Reporter::new(observer.clone(), Endpoint::new("analytics.test", "key"));
    reporter.record_language_observed(LanguageMode::from_flags(false, true, false));

    reporter.send(&test_settings(), &vec!["R1"]);

    assert_eq!(observer.events().len(), 4);
    assert_eq!(observer.calls().last(), Some(&ClientCall::Suspend));
}

#[test]
fn test_noop_has_no_side_effects() {
    let telemetry: &dyn Telemetry = &NoopReporter::new();
    for _ in 0..10 {
        telemetry.record_rule_configuration("a.b", "x");
        telemetry.record_language_observed(LanguageMode::from_flags(true, true, true));
        telemetry.send(&test_settings(), &vec!["R1"]);
    }
    assert_eq!(std::mem::size_of::<NoopReporter>(), 0);
}

#[test]
fn test_disabled_reporting_never_reaches_client() {
    let config = Config {
        enabled: false,
        endpoint: Some(EndpointConfig {
            host: "analytics.test".to_string(),
            app_key: "test-app-key".to_string(),
            use_tls: true,
        }),
        ..Config::default()
    };
    let observer = MemoryClient::new();
    let telemetry = report::select(&config, || Ok(observer.clone()));

    for _ in 0..10 {
        telemetry.record_rule_configuration("a.b", "x");
        telemetry.record_language_observed(LanguageMode::from_flags(true, true, true));
        telemetry.send(&test_settings(), &vec!["R1"]);
    }

    assert!(observer.calls().is_empty());
}
