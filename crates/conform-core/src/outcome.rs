//! Check verdicts and recorded outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a single check in a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    /// Every expected artifact was found.
    Pass,

    /// The assertion was evaluated and something expected is absent.
    Fail,

    /// The assertion could not be evaluated.
    Error,
}

impl CheckStatus {
    /// Upper-case label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Error => "ERROR",
        }
    }

    /// Leading glyph for report lines.
    pub fn glyph(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "✅",
            CheckStatus::Fail | CheckStatus::Error => "❌",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a check's predicate decided, before the runner records it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,

    /// Expected items (paths or tokens) that were not found, in manifest order.
    Fail(Vec<String>),
}

impl Verdict {
    /// `Pass` when nothing is missing, otherwise `Fail` with every missing item.
    pub fn from_missing(missing: Vec<String>) -> Self {
        if missing.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Fail(missing)
        }
    }
}

/// Recorded outcome of one check. Never mutated after the runner creates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckOutcome {
    pub status: CheckStatus,

    /// Missing paths or tokens (non-empty only for `FAIL`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,

    /// Fault description (set only for `ERROR`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckOutcome {
    pub fn pass() -> Self {
        Self {
            status: CheckStatus::Pass,
            missing: Vec::new(),
            error: None,
        }
    }

    pub fn fail(missing: Vec<String>) -> Self {
        Self {
            status: CheckStatus::Fail,
            missing,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Error,
            missing: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Pass
    }
}

impl From<Verdict> for CheckOutcome {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Pass => CheckOutcome::pass(),
            Verdict::Fail(missing) => CheckOutcome::fail(missing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_from_missing() {
        assert_eq!(Verdict::from_missing(vec![]), Verdict::Pass);
        assert_eq!(
            Verdict::from_missing(vec!["regex".to_string()]),
            Verdict::Fail(vec!["regex".to_string()])
        );
    }

    #[test]
    fn test_outcome_from_verdict() {
        let outcome = CheckOutcome::from(Verdict::Fail(vec!["uuid".to_string()]));
        assert_eq!(outcome.status, CheckStatus::Fail);
        assert_eq!(outcome.missing, vec!["uuid".to_string()]);
        assert!(outcome.error.is_none());
        assert!(!outcome.passed());

        assert!(CheckOutcome::from(Verdict::Pass).passed());
    }

    #[test]
    fn test_error_outcome_carries_message() {
        let outcome = CheckOutcome::error("file not found");
        assert_eq!(outcome.status, CheckStatus::Error);
        assert_eq!(outcome.error.as_deref(), Some("file not found"));
        assert!(outcome.missing.is_empty());
    }

    #[test]
    fn test_status_labels_and_glyphs() {
        assert_eq!(CheckStatus::Pass.to_string(), "PASS");
        assert_eq!(CheckStatus::Fail.as_str(), "FAIL");
        assert_eq!(CheckStatus::Error.as_str(), "ERROR");
        assert_eq!(CheckStatus::Pass.glyph(), "✅");
        assert_eq!(CheckStatus::Error.glyph(), "❌");
    }

    #[test]
    fn test_status_serializes_upper_case() {
        let json = serde_json::to_string(&CheckStatus::Error).unwrap();
        assert_eq!(json, "\"ERROR\"");
    }
}
