//! No-op reporter.
//!
//! Used when reporting is compiled out or turned off, so call sites can
//! record observations unconditionally.

use super::Telemetry;
use crate::settings::{RuleRegistry, ToolSettings};
use crate::usage::LanguageMode;

/// A reporter that keeps no state and sends nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl NoopReporter {
    /// Create a new noop reporter.
    pub const fn new() -> Self {
        Self
    }
}

impl Telemetry for NoopReporter {
    fn record_rule_configuration(&self, _key: &str, _value: &str) {}

    fn record_language_observed(&self, _mode: LanguageMode) {}

    fn send(&self, _settings: &ToolSettings, _rules: &dyn RuleRegistry) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_accepts_everything() {
        let reporter = NoopReporter::new();
        for _ in 0..3 {
            reporter.record_rule_configuration("a.b", "x");
            reporter.record_language_observed(LanguageMode::from_flags(true, true, true));
            reporter.send(&ToolSettings::default(), &vec!["R1"]);
        }
        assert_eq!(std::mem::size_of::<NoopReporter>(), 0);
    }
}
