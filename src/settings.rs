//! Tool settings consumed by the reporter.
//!
//! These come from the analysis tool's option system and rule loader; the
//! reporter only reads them.

use serde::{Deserialize, Serialize};

/// Snapshot of the analysis tool's configuration at report time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Directory the analysis ran in (hashed before reporting)
    pub working_path: String,
    /// Tool version identifier
    pub version: String,
    /// Path of the tool binary
    pub bin_path: String,
    /// Selected report format
    pub report_type: String,
    /// Whether cross-file analysis is enabled
    pub global_analysis: bool,
    /// Whether the compiler's native checkers are enabled
    pub clang_checker: bool,
    /// Whether duplicate violations are kept instead of suppressed
    pub allow_duplicated_violations: bool,
    /// Maximum allowed priority 1 violations
    pub max_p1: i64,
    /// Maximum allowed priority 2 violations
    pub max_p2: i64,
    /// Maximum allowed priority 3 violations
    pub max_p3: i64,
    /// Identifiers of the rules selected for this run
    pub rule_filter: Vec<String>,
}

impl ToolSettings {
    /// Check whether a rule is selected by the active filter.
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.rule_filter.iter().any(|name| name == rule_id)
    }
}

/// Registry of every rule the tool has loaded, enabled or not.
pub trait RuleRegistry {
    /// Identifiers of all known rules, in registry order.
    fn rule_identifiers(&self) -> Vec<String>;
}

impl<S: AsRef<str>> RuleRegistry for [S] {
    fn rule_identifiers(&self) -> Vec<String> {
        self.iter().map(|id| id.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>> RuleRegistry for Vec<S> {
    fn rule_identifiers(&self) -> Vec<String> {
        self.as_slice().rule_identifiers()
    }
}
