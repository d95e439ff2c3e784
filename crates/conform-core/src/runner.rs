//! The conformance runner: executes registered checks in order and records
//! exactly one outcome per check.

use crate::check::Check;
use crate::error::{ConformError, Result};
use crate::manifest::Manifest;
use crate::outcome::{CheckOutcome, CheckStatus};
use crate::report::RunReport;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, info, warn};

/// Hooks invoked while a run progresses. All methods default to no-ops.
///
/// Observers are advisory; the returned [`RunReport`] is authoritative.
pub trait RunObserver {
    fn on_run_start(&mut self, _title: &str, _root: &Path) {}

    fn on_check_start(&mut self, _name: &str) {}

    fn on_check_finish(&mut self, _check: &dyn Check, _outcome: &CheckOutcome) {}

    fn on_run_finish(&mut self, _report: &RunReport) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Ordered registry of checks.
pub struct ConformanceRunner {
    title: String,
    manifest_digest: Option<String>,
    checks: Vec<Box<dyn Check>>,
}

impl ConformanceRunner {
    /// Create an empty runner.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            manifest_digest: None,
            checks: Vec::new(),
        }
    }

    /// Build a runner holding every check of a validated manifest.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self> {
        manifest.validate()?;

        let mut runner = Self::new(manifest.title.clone());
        runner.manifest_digest = Some(manifest.digest());
        for check in &manifest.checks {
            runner.register(check.clone())?;
        }
        Ok(runner)
    }

    /// Append a check. Names must be unique within the runner.
    pub fn register<C: Check + 'static>(&mut self, check: C) -> Result<()> {
        if self.checks.iter().any(|c| c.name() == check.name()) {
            return Err(ConformError::DuplicateCheck(check.name().to_string()));
        }
        self.checks.push(Box::new(check));
        Ok(())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Registered check names in execution order.
    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check against `root`.
    ///
    /// Never fails: a check that errors or panics is recorded as `ERROR` and
    /// the remaining checks still run.
    pub fn run(&self, root: &Path, observer: &mut dyn RunObserver) -> RunReport {
        let mut report = RunReport::new(self.title.clone(), root);
        report.manifest_digest = self.manifest_digest.clone();

        info!(title = %self.title, root = %root.display(), checks = self.checks.len(), "Starting conformance run");
        observer.on_run_start(&self.title, root);
        if self.checks.is_empty() {
            warn!(title = %self.title, "Runner has no registered checks");
        }

        for check in &self.checks {
            let name = check.name();
            debug!(check = %name, "Running check");
            observer.on_check_start(name);

            let outcome = evaluate_isolated(check.as_ref(), root);
            match outcome.status {
                CheckStatus::Pass => info!(check = %name, "Check passed"),
                CheckStatus::Fail => {
                    info!(check = %name, missing = ?outcome.missing, "Check failed")
                }
                CheckStatus::Error => {
                    info!(check = %name, error = ?outcome.error, "Check errored")
                }
            }

            observer.on_check_finish(check.as_ref(), &outcome);
            report.record(name, outcome);
        }

        let summary = report.summary();
        info!(
            passed = summary.passed,
            total = summary.total,
            success = summary.success,
            "Conformance run finished"
        );
        observer.on_run_finish(&report);

        report
    }
}

/// Evaluate one check, converting errors and panics into `ERROR` outcomes.
fn evaluate_isolated(check: &dyn Check, root: &Path) -> CheckOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| check.evaluate(root))) {
        Ok(Ok(verdict)) => CheckOutcome::from(verdict),
        Ok(Err(e)) => CheckOutcome::error(e.to_string()),
        Err(payload) => CheckOutcome::error(format!(
            "check panicked: {}",
            panic_message(payload.as_ref())
        )),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::CheckSpec;
    use crate::outcome::Verdict;
    use tempfile::tempdir;

    struct Fixed(&'static str, Verdict);

    impl Check for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn evaluate(&self, _root: &Path) -> Result<Verdict> {
            Ok(self.1.clone())
        }
    }

    struct Panics;

    impl Check for Panics {
        fn name(&self) -> &str {
            "Panics"
        }

        fn evaluate(&self, _root: &Path) -> Result<Verdict> {
            panic!("boom")
        }
    }

    #[derive(Default)]
    struct Recorder {
        started: Vec<String>,
        finished: Vec<(String, CheckStatus)>,
        runs: usize,
    }

    impl RunObserver for Recorder {
        fn on_check_start(&mut self, name: &str) {
            self.started.push(name.to_string());
        }

        fn on_check_finish(&mut self, check: &dyn Check, outcome: &CheckOutcome) {
            self.finished.push((check.name().to_string(), outcome.status));
        }

        fn on_run_finish(&mut self, _report: &RunReport) {
            self.runs += 1;
        }
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut runner = ConformanceRunner::new("T");
        runner.register(Fixed("A", Verdict::Pass)).unwrap();
        let err = runner.register(Fixed("A", Verdict::Pass)).unwrap_err();
        assert!(matches!(err, ConformError::DuplicateCheck(name) if name == "A"));
        assert_eq!(runner.len(), 1);
    }

    #[test]
    fn test_outcomes_follow_registration_order() {
        let mut runner = ConformanceRunner::new("T");
        runner.register(Fixed("B", Verdict::Pass)).unwrap();
        runner
            .register(Fixed("A", Verdict::Fail(vec!["x".to_string()])))
            .unwrap();

        let dir = tempdir().unwrap();
        let report = runner.run(dir.path(), &mut NoopObserver);

        let names: Vec<&str> = report.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(report.entries[1].outcome.missing, vec!["x".to_string()]);
    }

    #[test]
    fn test_panic_is_isolated() {
        let mut runner = ConformanceRunner::new("T");
        runner.register(Panics).unwrap();
        runner.register(Fixed("After", Verdict::Pass)).unwrap();

        let dir = tempdir().unwrap();
        let report = runner.run(dir.path(), &mut NoopObserver);

        assert_eq!(report.len(), 2);
        let panicked = report.outcome("Panics").unwrap();
        assert_eq!(panicked.status, CheckStatus::Error);
        assert!(panicked.error.as_deref().unwrap_or_default().contains("boom"));
        assert!(report.outcome("After").unwrap().passed());
    }

    #[test]
    fn test_error_does_not_stop_later_checks() {
        let mut runner = ConformanceRunner::new("T");
        runner
            .register(CheckSpec::content(
                "Needs File",
                vec![crate::check::ContentTarget::new("absent.rs", ["x"])],
            ))
            .unwrap();
        runner.register(Fixed("Later", Verdict::Pass)).unwrap();

        let dir = tempdir().unwrap();
        let mut recorder = Recorder::default();
        let report = runner.run(dir.path(), &mut recorder);

        assert_eq!(report.outcome("Needs File").unwrap().status, CheckStatus::Error);
        assert_eq!(
            recorder.finished,
            vec![
                ("Needs File".to_string(), CheckStatus::Error),
                ("Later".to_string(), CheckStatus::Pass),
            ]
        );
        assert_eq!(recorder.started, vec!["Needs File", "Later"]);
        assert_eq!(recorder.runs, 1);
    }

    #[test]
    fn test_empty_runner_produces_empty_successful_report() {
        let runner = ConformanceRunner::new("T");
        let dir = tempdir().unwrap();
        let report = runner.run(dir.path(), &mut NoopObserver);
        assert!(report.is_empty());
        assert!(report.summary().success);
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn diagnostics_at(level: tracing::Level, runner: &ConformanceRunner, root: &Path) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            runner.run(root, &mut NoopObserver);
        });
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_check_outcomes_stay_below_warn() {
        let mut runner = ConformanceRunner::new("T");
        runner
            .register(Fixed("Broken", Verdict::Fail(vec!["x".to_string()])))
            .unwrap();
        runner.register(Panics).unwrap();

        let dir = tempdir().unwrap();
        let warn_output = diagnostics_at(tracing::Level::WARN, &runner, dir.path());
        assert!(warn_output.is_empty(), "unexpected diagnostics: {warn_output}");

        let info_output = diagnostics_at(tracing::Level::INFO, &runner, dir.path());
        assert!(info_output.contains("Check failed"));
        assert!(info_output.contains("Check errored"));
    }

    #[test]
    fn test_empty_runner_warns() {
        let runner = ConformanceRunner::new("T");
        let dir = tempdir().unwrap();
        let output = diagnostics_at(tracing::Level::WARN, &runner, dir.path());
        assert!(output.contains("no registered checks"));
    }

    #[test]
    fn test_from_manifest_records_digest() {
        let manifest = Manifest::builtin();
        let runner = ConformanceRunner::from_manifest(&manifest).unwrap();
        assert_eq!(runner.len(), manifest.checks.len());
        assert_eq!(runner.title(), "NLMC Compiler Validation");

        let dir = tempdir().unwrap();
        let report = runner.run(dir.path(), &mut NoopObserver);
        assert_eq!(report.manifest_digest, Some(manifest.digest()));
    }
}
