//! Check manifests: the static tables defining what "conformant" means.
//!
//! A manifest is pure data. The built-in manifest describes the NLMC
//! compiler layout; other layouts are loaded from TOML or JSON files.

use crate::check::{CheckRule, CheckSpec, ContentTarget};
use crate::error::{ConformError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Component, Path};

/// An ordered table of checks with a display title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    /// Shown in the run banner, e.g. `Starting <title> Tests`.
    pub title: String,

    pub checks: Vec<CheckSpec>,
}

impl Manifest {
    /// The NLMC compiler checklist.
    pub fn builtin() -> Self {
        Self {
            title: "NLMC Compiler Validation".to_string(),
            checks: vec![
                CheckSpec::existence(
                    "File Structure",
                    [
                        "src/nlmc/mod.rs",
                        "src/nlmc/intent_extractor.rs",
                        "src/nlmc/semantic_analyzer.rs",
                        "src/nlmc/type_inferencer.rs",
                        "src/nlmc/flow_analyzer.rs",
                        "src/nlmc/llvm_generator.rs",
                        "src/nlmc/ambiguity_resolver.rs",
                        "src/nlmc/error_recovery.rs",
                        "src/nlmc/syscall_interface.rs",
                        "src/nlmc/hardware_layer.rs",
                        "tests/nlmc_tests.rs",
                        "examples/nlmc_samples.md",
                    ],
                )
                .with_pass_message("All required NLMC files present")
                .with_missing_label("Missing files"),
                CheckSpec::content(
                    "Cargo Dependencies",
                    vec![ContentTarget::new(
                        "Cargo.toml",
                        ["inkwell", "petgraph", "regex", "uuid", "dashmap"],
                    )],
                )
                .with_pass_message("All required dependencies present")
                .with_missing_label("Missing dependencies"),
                CheckSpec::content(
                    "Main Integration",
                    vec![ContentTarget::new(
                        "src/main.rs",
                        [
                            "use_nlmc: bool",
                            "show_monologue: bool",
                            "NLMCompiler::new",
                            "compile_with_monologue",
                            "compile_and_execute",
                        ],
                    )],
                )
                .with_pass_message("Main.rs properly integrates NLMC")
                .with_missing_label("Missing main.rs elements"),
                CheckSpec::content(
                    "Module Structure",
                    vec![
                        ContentTarget::new(
                            "src/nlmc/intent_extractor.rs",
                            ["pub struct IntentExtractor", "pub struct ProgramIntent"],
                        ),
                        ContentTarget::new(
                            "src/nlmc/semantic_analyzer.rs",
                            ["pub struct SemanticAnalyzer"],
                        ),
                        ContentTarget::new("src/nlmc/llvm_generator.rs", ["pub struct LLVMGenerator"]),
                    ],
                )
                .with_pass_message("All NLMC modules have proper structure")
                .with_missing_label("Missing module declarations"),
                CheckSpec::content(
                    "Sample Programs",
                    vec![ContentTarget::new(
                        "examples/nlmc_samples.md",
                        [
                            "Simple Variable Assignment",
                            "Function Definition and Call",
                            "Loop with Conditional",
                            "Array Processing",
                            "Machine Code:",
                            "Inner Monologue:",
                        ],
                    )],
                )
                .with_pass_message("Sample programs are comprehensive")
                .with_missing_label("Missing sample programs"),
                CheckSpec::content(
                    "Error Handling",
                    vec![ContentTarget::new(
                        "src/nlmc/error_recovery.rs",
                        ["SyntaxError", "SemanticError", "TypeError", "RuntimeError"],
                    )],
                )
                .with_pass_message("Error handling mechanisms are comprehensive")
                .with_missing_label("Missing error types"),
                CheckSpec::content(
                    "System Interfaces",
                    vec![
                        ContentTarget::new(
                            "src/nlmc/syscall_interface.rs",
                            ["sys_open", "sys_read", "sys_write", "sys_exit"],
                        ),
                        ContentTarget::new("src/nlmc/hardware_layer.rs", ["detect_cpu_features"]),
                    ],
                )
                .with_pass_message("System interfaces are properly implemented")
                .with_missing_label("Missing system interfaces"),
                CheckSpec::content(
                    "Test Suite",
                    vec![ContentTarget::new(
                        "tests/nlmc_tests.rs",
                        [
                            "intent_extraction_tests",
                            "semantic_analysis_tests",
                            "type_inference_tests",
                            "flow_analysis_tests",
                            "llvm_generation_tests",
                            "ambiguity_resolution_tests",
                            "error_recovery_tests",
                            "integration_tests",
                            "performance_tests",
                        ],
                    )],
                )
                .with_pass_message("Test suite is comprehensive")
                .with_missing_label("Missing test modules"),
            ],
        }
    }

    /// Load a manifest from disk. `.toml` files are parsed as TOML, anything
    /// else as JSON. The result is validated before it is returned.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ConformError::Manifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let manifest: Manifest = if is_toml {
            toml::from_str(&text).map_err(|e| ConformError::Manifest {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        } else {
            serde_json::from_str(&text).map_err(|e| ConformError::Manifest {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        };

        manifest.validate()?;
        Ok(manifest)
    }

    /// Reject manifests that could not produce a well-formed run.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ConformError::InvalidManifest("title must not be empty".to_string()));
        }
        if self.checks.is_empty() {
            return Err(ConformError::InvalidManifest(
                "manifest must define at least one check".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for check in &self.checks {
            if check.name.trim().is_empty() {
                return Err(ConformError::InvalidManifest(
                    "check name must not be empty".to_string(),
                ));
            }
            if !seen.insert(check.name.as_str()) {
                return Err(ConformError::DuplicateCheck(check.name.clone()));
            }

            if let CheckRule::Existence { paths } = &check.rule {
                if paths.is_empty() {
                    return Err(ConformError::InvalidManifest(format!(
                        "existence check '{}' has no paths",
                        check.name
                    )));
                }
            }

            if let CheckRule::Content { targets } = &check.rule {
                if targets.is_empty() {
                    return Err(ConformError::InvalidManifest(format!(
                        "content check '{}' has no targets",
                        check.name
                    )));
                }
                if let Some(target) = targets.iter().find(|t| t.required.is_empty()) {
                    return Err(ConformError::InvalidManifest(format!(
                        "content check '{}' target {} has no required tokens",
                        check.name, target.path
                    )));
                }
            }

            for rel in check.paths() {
                validate_relative_path(&check.name, rel)?;
            }
        }

        Ok(())
    }

    /// Names of all checks, in execution order.
    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name.as_str()).collect()
    }

    /// Deterministic SHA-256 digest of the ordered check table.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.title.as_bytes());
        hasher.update(b"\0");
        for check in &self.checks {
            hasher.update(check.name.as_bytes());
            hasher.update(b"\0");
            hasher.update(check.rule.kind().as_bytes());
            hasher.update(b"\0");
            match &check.rule {
                CheckRule::Existence { paths } => {
                    for p in paths {
                        hasher.update(p.as_bytes());
                        hasher.update(b"\0");
                    }
                }
                CheckRule::Content { targets } => {
                    for target in targets {
                        hasher.update(target.path.as_bytes());
                        hasher.update(b"\0");
                        for token in &target.required {
                            hasher.update(token.as_bytes());
                            hasher.update(b"\0");
                        }
                    }
                }
            }
        }
        hex::encode(hasher.finalize())
    }
}

/// Manifest paths must stay inside the inspected root.
fn validate_relative_path(check: &str, rel: &str) -> Result<()> {
    if rel.is_empty() {
        return Err(ConformError::InvalidManifest(format!(
            "check '{}' has an empty path",
            check
        )));
    }

    let path = Path::new(rel);
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(ConformError::InvalidManifest(format!(
            "check '{}' path {} must be relative to the repository root",
            check, rel
        )));
    }
    Ok(())
}
