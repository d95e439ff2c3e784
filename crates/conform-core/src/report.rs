//! Run reports, summaries and the persisted JSON artifact.

use crate::outcome::{CheckOutcome, CheckStatus};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Schema version written into report artifacts.
pub const REPORT_SCHEMA_VERSION: &str = "1";

/// One recorded (check name, outcome) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportEntry {
    pub name: String,

    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

/// Ordered outcomes of one run, in execution order.
///
/// Holds exactly one entry per registered check. Contains no timestamps, so
/// two runs against an unchanged tree compare equal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunReport {
    pub title: String,
    pub root: PathBuf,
    pub manifest_digest: Option<String>,
    pub entries: Vec<ReportEntry>,
}

/// Aggregate counts for a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub total: usize,

    /// True iff every outcome is `PASS`.
    pub success: bool,
}

impl RunSummary {
    /// Process exit code: `0` iff every check passed.
    pub fn exit_code(&self) -> u8 {
        if self.success {
            0
        } else {
            1
        }
    }

    /// Number of checks that did not pass.
    pub fn not_passed(&self) -> usize {
        self.total - self.passed
    }
}

impl RunReport {
    pub fn new(title: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            root: root.into(),
            manifest_digest: None,
            entries: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, name: impl Into<String>, outcome: CheckOutcome) {
        self.entries.push(ReportEntry {
            name: name.into(),
            outcome,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Outcome recorded for `name`, if that check ran.
    pub fn outcome(&self, name: &str) -> Option<&CheckOutcome> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.outcome)
    }

    pub fn summary(&self) -> RunSummary {
        let count = |status: CheckStatus| {
            self.entries
                .iter()
                .filter(|e| e.outcome.status == status)
                .count()
        };
        let passed = count(CheckStatus::Pass);
        let total = self.entries.len();

        RunSummary {
            passed,
            failed: count(CheckStatus::Fail),
            errored: count(CheckStatus::Error),
            total,
            success: passed == total,
        }
    }

    /// One `<glyph> <name>: <STATUS>` line per check.
    pub fn render_table(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| {
                format!(
                    "{} {}: {}",
                    e.outcome.status.glyph(),
                    e.name,
                    e.outcome.status
                )
            })
            .collect()
    }

    /// Trailing aggregate line, e.g. `Overall: 7/8 tests passed`.
    pub fn render_overall(&self) -> String {
        let summary = self.summary();
        format!("Overall: {}/{} tests passed", summary.passed, summary.total)
    }
}

/// Machine-readable report written with `--report`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportArtifact {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub title: String,
    pub root: PathBuf,
    pub manifest_digest: Option<String>,
    pub summary: RunSummary,
    pub checks: Vec<ReportEntry>,
}

impl ReportArtifact {
    pub fn from_report(report: &RunReport) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            title: report.title.clone(),
            root: report.root.clone(),
            manifest_digest: report.manifest_digest.clone(),
            summary: report.summary(),
            checks: report.entries.clone(),
        }
    }
}

/// Write the report artifact as pretty JSON.
pub fn write_report_json(path: &Path, artifact: &ReportArtifact) -> Result<()> {
    let content = serde_json::to_string_pretty(artifact).context("serialize report artifact")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

/// Read a report artifact written by [`write_report_json`].
pub fn read_report_json(path: &Path) -> Result<ReportArtifact> {
    let content = std::fs::read_to_string(path).with_context(|| format!("read {:?}", path))?;
    serde_json::from_str(&content).context("parse report artifact")
}
