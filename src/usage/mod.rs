//! Usage accumulation for the analytics reporter.
//!
//! Observations recorded here are the only state carried between the start
//! of an analysis run and the final report.

pub mod language;
pub mod state;

// Re-export commonly used types
pub use language::{Language, LanguageMode};
pub use state::{UsageSnapshot, UsageState};
