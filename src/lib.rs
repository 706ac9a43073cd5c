//! Lint Analytics - anonymous usage reporting for a static-analysis tool.
//!
//! The analysis tool records observations while it runs (rule parameters,
//! the language mode of each compilation unit) and sends one usage report
//! when it finishes. Reporting is best-effort: it never fails, never panics
//! on network problems, and can be compiled out entirely.
//!
//! # Privacy Guarantees
//!
//! - **No source**: File contents and file names are never reported
//! - **No paths in the clear**: The working path is hashed before it leaves the process
//! - **No host identity**: The device id is derived from, but does not reveal, the hostname
//! - **Nothing persisted**: State lives only for the current process
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Lint Analytics                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐         │
//! │  │  Telemetry  │──▶│ UsageState  │──▶│  Builders   │         │
//! │  │  (record)   │   │ (counters)  │   │  (5 events) │         │
//! │  └─────────────┘   └─────────────┘   └─────────────┘         │
//! │                                              │                │
//! │                                              ▼                │
//! │                                      ┌─────────────┐         │
//! │                                      │  Transport  │         │
//! │                                      │  (Countly)  │         │
//! │                                      └─────────────┘         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use lint_analytics::{report, Config, LanguageMode, ToolSettings};
//!
//! let telemetry = report::from_config(&Config::load().unwrap_or_default());
//!
//! telemetry.record_rule_configuration("LongLine.limit", "120");
//! telemetry.record_language_observed(LanguageMode::from_flags(false, true, false));
//!
//! let rules = vec!["LongLine", "EmptyIfStatement"];
//! telemetry.send(&ToolSettings::default(), &rules);
//! ```

pub mod config;
pub mod event;
pub mod identity;
pub mod report;
pub mod settings;
pub mod transport;
pub mod usage;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError, EndpointConfig};
pub use event::{Event, EventKind, Segments};
pub use identity::{hashed_working_path, UNKNOWN_PROJECT_ID};
pub use report::{Analytics, NoopReporter, Reporter, SharedTelemetry, Telemetry};
pub use settings::{RuleRegistry, ToolSettings};
pub use transport::{AnalyticsClient, Endpoint, MemoryClient, TransportError};
pub use usage::{Language, LanguageMode, UsageSnapshot, UsageState};

// Transport re-exports (when enabled)
#[cfg(feature = "countly")]
pub use transport::{AsyncCountlyClient, CountlyClient};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Privacy declaration that can be displayed to users.
pub const PRIVACY_DECLARATION: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║              LINT ANALYTICS - PRIVACY DECLARATION                ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║  This tool sends one anonymous usage report per analysis run.    ║
║                                                                  ║
║  ✓ WHAT WE REPORT:                                               ║
║    • Tool version, binary path and operating system              ║
║    • Report type, analysis flags and violation thresholds        ║
║    • Which rules are loaded and which are enabled                ║
║    • Rule parameters you changed                                 ║
║    • How many C, C++ and Objective-C units were analyzed         ║
║                                                                  ║
║  ✗ WHAT WE NEVER REPORT:                                         ║
║    • Source code or file names                                   ║
║    • Your project path (only a one-way hash of it)               ║
║    • Your hostname (only an id derived from it)                  ║
║    • Analysis results or violations                              ║
║                                                                  ║
║  Nothing is stored between runs. Failed sends are not retried.   ║
║                                                                  ║
║  Preview exactly what would be sent with:                        ║
║    lint-analytics preview --input run.json                       ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#;
