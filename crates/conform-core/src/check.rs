//! Check definitions.
//!
//! A check is anything implementing [`Check`]. The declarative [`CheckSpec`]
//! covers the two manifest patterns (path existence and content membership);
//! both delegate to the generic evaluators in [`crate::evaluate`].

use crate::error::Result;
use crate::evaluate::{evaluate_content, evaluate_existence};
use crate::outcome::Verdict;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A named conformance predicate over a repository root.
///
/// `Ok(Verdict::Fail(..))` means the assertion was evaluated and something is
/// absent; `Err(..)` means it could not be evaluated at all.
pub trait Check {
    /// Stable, human-readable name, unique within a runner.
    fn name(&self) -> &str;

    /// Evaluate the check against `root`.
    fn evaluate(&self, root: &Path) -> Result<Verdict>;

    /// Informational line logged when the check passes.
    fn pass_message(&self) -> String {
        format!("{} check passed", self.name())
    }

    /// Prefix for the line listing missing items on failure.
    fn missing_label(&self) -> String {
        "Missing items".to_string()
    }
}

/// One file inspected by a content-membership check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentTarget {
    /// Path relative to the repository root.
    pub path: String,

    /// Literal substrings that must all appear in the file.
    pub required: Vec<String>,
}

impl ContentTarget {
    pub fn new<S: Into<String>>(path: impl Into<String>, required: impl IntoIterator<Item = S>) -> Self {
        Self {
            path: path.into(),
            required: required.into_iter().map(Into::into).collect(),
        }
    }
}

/// The evaluation pattern of a declarative check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckRule {
    /// Every listed path must exist under the root.
    Existence { paths: Vec<String> },

    /// Every target file must exist and contain all of its required tokens.
    Content { targets: Vec<ContentTarget> },
}

impl CheckRule {
    pub fn kind(&self) -> &'static str {
        match self {
            CheckRule::Existence { .. } => "existence",
            CheckRule::Content { .. } => "content",
        }
    }
}

/// A declarative check loaded from a manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckSpec {
    pub name: String,

    #[serde(flatten)]
    pub rule: CheckRule,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_label: Option<String>,
}

impl CheckSpec {
    /// Existence check over `paths`.
    pub fn existence<S: Into<String>>(
        name: impl Into<String>,
        paths: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            rule: CheckRule::Existence {
                paths: paths.into_iter().map(Into::into).collect(),
            },
            pass_message: None,
            missing_label: None,
        }
    }

    /// Content-membership check over one or more files.
    pub fn content(name: impl Into<String>, targets: Vec<ContentTarget>) -> Self {
        Self {
            name: name.into(),
            rule: CheckRule::Content { targets },
            pass_message: None,
            missing_label: None,
        }
    }

    pub fn with_pass_message(mut self, message: impl Into<String>) -> Self {
        self.pass_message = Some(message.into());
        self
    }

    pub fn with_missing_label(mut self, label: impl Into<String>) -> Self {
        self.missing_label = Some(label.into());
        self
    }

    /// Every relative path this check references, in manifest order.
    pub fn paths(&self) -> Vec<&str> {
        match &self.rule {
            CheckRule::Existence { paths } => paths.iter().map(String::as_str).collect(),
            CheckRule::Content { targets } => targets.iter().map(|t| t.path.as_str()).collect(),
        }
    }
}

impl Check for CheckSpec {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, root: &Path) -> Result<Verdict> {
        match &self.rule {
            CheckRule::Existence { paths } => evaluate_existence(root, paths),
            CheckRule::Content { targets } => evaluate_content(root, targets),
        }
    }

    fn pass_message(&self) -> String {
        self.pass_message
            .clone()
            .unwrap_or_else(|| format!("{} check passed", self.name))
    }

    fn missing_label(&self) -> String {
        self.missing_label.clone().unwrap_or_else(|| match self.rule {
            CheckRule::Existence { .. } => "Missing files".to_string(),
            CheckRule::Content { .. } => "Missing elements".to_string(),
        })
    }
}
