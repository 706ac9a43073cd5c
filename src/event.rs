//! Analytics events sent to the endpoint.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Segment name to segment value.
pub type Segments = BTreeMap<String, String>;

/// The named events a report consists of.
///
/// Names are part of the wire contract with the analytics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    DevEnvironment,
    DevConfiguration,
    DevLoadedRules,
    DevRuleConfigurations,
    DevLanguageCount,
}

impl EventKind {
    /// All event kinds, in send order.
    pub const ALL: [EventKind; 5] = [
        EventKind::DevEnvironment,
        EventKind::DevConfiguration,
        EventKind::DevLoadedRules,
        EventKind::DevRuleConfigurations,
        EventKind::DevLanguageCount,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::DevEnvironment => "DevEnvironment",
            EventKind::DevConfiguration => "DevConfiguration",
            EventKind::DevLoadedRules => "DevLoadedRules",
            EventKind::DevRuleConfigurations => "DevRuleConfigurations",
            EventKind::DevLanguageCount => "DevLanguageCount",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single named event with its segmentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub segments: Segments,
}

impl Event {
    pub fn new(kind: EventKind, segments: Segments) -> Self {
        Self { kind, segments }
    }

    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Look up a segment value.
    pub fn segment(&self, key: &str) -> Option<&str> {
        self.segments.get(key).map(String::as_str)
    }
}

/// Render a flag the way the backend expects it.
pub(crate) fn flag(value: bool) -> String {
    let rendered = if value { "1" } else { "0" };
    rendered.to_string()
}
