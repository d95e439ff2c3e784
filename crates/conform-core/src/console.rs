//! Human-readable console log for conformance runs.
//!
//! Every line is `[LEVEL] message`. The output is advisory; callers should
//! rely on the exit code.

use crate::check::Check;
use crate::outcome::{CheckOutcome, CheckStatus};
use crate::report::RunReport;
use crate::runner::RunObserver;
use std::io::Write;
use std::path::Path;

const RULE_WIDTH: usize = 50;

/// Severity tag of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
    Success,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Error => "ERROR",
            Severity::Success => "SUCCESS",
            Severity::Warning => "WARNING",
        }
    }
}

/// Writes the run log to any `Write` sink (stdout in the binary).
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write one tagged line. Write failures are ignored.
    pub fn log(&mut self, severity: Severity, message: &str) {
        writeln!(self.out, "[{}] {}", severity.as_str(), message).ok();
    }

    fn blank(&mut self) {
        writeln!(self.out).ok();
    }

    fn rule(&mut self) {
        self.log(Severity::Info, &"=".repeat(RULE_WIDTH));
    }
}

impl<W: Write> RunObserver for ConsoleReporter<W> {
    fn on_run_start(&mut self, title: &str, root: &Path) {
        self.log(Severity::Info, &format!("Starting {} Tests", title));
        self.log(Severity::Info, &format!("Repository: {}", root.display()));
        self.rule();
    }

    fn on_check_start(&mut self, name: &str) {
        self.blank();
        self.log(Severity::Info, &format!("--- Running {} Test ---", name));
    }

    fn on_check_finish(&mut self, check: &dyn Check, outcome: &CheckOutcome) {
        match outcome.status {
            CheckStatus::Pass => {
                let line = format!("{} {}", CheckStatus::Pass.glyph(), check.pass_message());
                self.log(Severity::Info, &line);
            }
            CheckStatus::Fail => {
                let line = format!(
                    "{} {}: {}",
                    CheckStatus::Fail.glyph(),
                    check.missing_label(),
                    outcome.missing.join(", ")
                );
                self.log(Severity::Error, &line);
            }
            CheckStatus::Error => {
                let line = format!(
                    "{} Test {} failed with exception: {}",
                    CheckStatus::Error.glyph(),
                    check.name(),
                    outcome.error.as_deref().unwrap_or("unknown error")
                );
                self.log(Severity::Error, &line);
            }
        }
    }

    fn on_run_finish(&mut self, report: &RunReport) {
        self.blank();
        self.rule();
        self.log(
            Severity::Info,
            &format!("{} RESULTS", report.title.to_uppercase()),
        );
        self.rule();

        for line in report.render_table() {
            self.log(Severity::Info, &line);
        }

        self.blank();
        self.log(Severity::Info, &report.render_overall());

        let summary = report.summary();
        if summary.success {
            self.log(
                Severity::Success,
                "🎉 ALL TESTS PASSED! Repository surface is conformant!",
            );
        } else {
            self.log(
                Severity::Warning,
                &format!(
                    "⚠️  {} tests failed. Review implementation.",
                    summary.not_passed()
                ),
            );
        }
        self.out.flush().ok();
    }
}
