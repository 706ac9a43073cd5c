//! Usage accumulators for one process run.
//!
//! Observations are recorded incrementally while the tool analyzes files and
//! are read back once when the report is sent. Nothing is ever removed.

use super::language::{Language, LanguageMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Accumulated rule configurations and language counters.
///
/// Safe to share between analysis workers.
#[derive(Debug, Default)]
pub struct UsageState {
    /// `"<rule>.<param>"` to configured value, last write wins
    rule_configurations: Mutex<BTreeMap<String, String>>,
    /// One counter per [`Language`], indexed by `Language::index`
    language_counts: [AtomicU64; 3],
    /// Number of `record_language_observed` calls
    observations: AtomicU64,
}

impl UsageState {
    /// Create empty accumulators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rule parameter, replacing any earlier value for `key`.
    pub fn record_rule_configuration(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        tracing::debug!(%key, %value, "rule configuration recorded");
        self.configurations().insert(key, value);
    }

    /// Count one compilation unit against each language facet it enables.
    pub fn record_language_observed(&self, mode: LanguageMode) {
        self.observations.fetch_add(1, Ordering::Relaxed);
        for lang in mode.iter() {
            self.language_counts[lang.index()].fetch_add(1, Ordering::Relaxed);
        }
        tracing::debug!(?mode, "language mode observed");
    }

    /// Current counter for `lang`.
    pub fn language_count(&self, lang: Language) -> u64 {
        self.language_counts[lang.index()].load(Ordering::Relaxed)
    }

    /// Take a point-in-time copy of everything recorded so far.
    pub fn snapshot(&self) -> UsageSnapshot {
        let languages_observed = self.observations.load(Ordering::Relaxed) > 0;
        UsageSnapshot {
            rule_configurations: self.configurations().clone(),
            language_counts: languages_observed.then(|| {
                Language::ALL
                    .into_iter()
                    .map(|lang| (lang, self.language_count(lang)))
                    .collect()
            }),
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let snapshot = self.snapshot();
        let counts = snapshot.language_counts.unwrap_or_default();
        let count = |lang: Language| counts.get(&lang).copied().unwrap_or(0);
        format!(
            "Usage Statistics:\n\
             - Rule configurations recorded: {}\n\
             - C units observed: {}\n\
             - C++ units observed: {}\n\
             - Objective-C units observed: {}",
            snapshot.rule_configurations.len(),
            count(Language::C),
            count(Language::Cpp),
            count(Language::ObjC),
        )
    }

    // A panic while holding the lock cannot leave the map half-written, so a
    // poisoned lock is still safe to read.
    fn configurations(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.rule_configurations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Snapshot of the accumulators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub rule_configurations: BTreeMap<String, String>,
    /// `None` until the first language observation
    pub language_counts: Option<BTreeMap<Language, u64>>,
}

impl UsageSnapshot {
    /// Language counters greater than zero.
    pub fn nonzero_language_counts(&self) -> BTreeMap<Language, u64> {
        self.language_counts
            .iter()
            .flatten()
            .filter(|(_, count)| **count > 0)
            .map(|(lang, count)| (*lang, *count))
            .collect()
    }
}
