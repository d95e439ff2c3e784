//! conform-core - structural conformance checking
//!
//! Validates that a repository exposes an expected set of artifacts without
//! building or parsing it:
//! - Existence checks over required relative paths
//! - Content checks testing literal substrings in named files
//! - A runner that isolates every check and reports PASS / FAIL / ERROR

pub mod check;
pub mod console;
pub mod error;
pub mod evaluate;
pub mod manifest;
pub mod outcome;
pub mod report;
pub mod runner;
pub mod telemetry;

// Re-export key types
pub use check::{Check, CheckRule, CheckSpec, ContentTarget};
pub use console::{ConsoleReporter, Severity};
pub use error::{ConformError, Result};
pub use evaluate::{evaluate_content, evaluate_existence, read_target};
pub use manifest::Manifest;
pub use outcome::{CheckOutcome, CheckStatus, Verdict};
pub use report::{
    read_report_json, write_report_json, ReportArtifact, ReportEntry, RunReport, RunSummary,
};
pub use runner::{ConformanceRunner, NoopObserver, RunObserver};
pub use telemetry::init_tracing;
