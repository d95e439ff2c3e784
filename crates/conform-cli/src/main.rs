//! conform - repository conformance checker
//!
//! Checks that a repository exposes the files and markers listed in a
//! manifest, without building or executing it.
//!
//! ## Commands
//!
//! - `run` (default): evaluate every check and exit `0` iff all pass
//! - `list`: show the registered checks in execution order
//! - `manifest`: print the effective manifest as JSON

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use conform_core::{
    write_report_json, CheckRule, ConformanceRunner, ConsoleReporter, Manifest, ReportArtifact,
    RunSummary, Severity,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn, Level};

#[derive(Parser)]
#[command(name = "conform")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Structural conformance checker for source repositories", long_about = None)]
struct Cli {
    /// Enable verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted diagnostic lines
    #[arg(long, global = true)]
    json: bool,

    /// Repository root to inspect
    #[arg(short, long, global = true, env = "CONFORM_ROOT", default_value = ".")]
    root: PathBuf,

    /// Manifest file (TOML or JSON); the built-in NLMC checklist when omitted
    #[arg(short, long, global = true, env = "CONFORM_MANIFEST")]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every check and print the report
    Run {
        /// Also write a JSON report artifact to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List registered checks in execution order
    List,

    /// Print the effective manifest as JSON
    Manifest,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    conform_core::init_tracing(cli.json, level);

    let manifest = load_manifest(cli.manifest.as_deref())?;

    match cli.command.unwrap_or(Commands::Run { report: None }) {
        Commands::Run { report } => {
            let summary = cmd_run(&cli.root, &manifest, report.as_deref())?;
            Ok(ExitCode::from(summary.exit_code()))
        }
        Commands::List => {
            cmd_list(&manifest);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Manifest => {
            cmd_manifest(&manifest)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_manifest(path: Option<&Path>) -> Result<Manifest> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading manifest");
            Manifest::load(path).with_context(|| format!("Failed to load manifest {:?}", path))
        }
        None => Ok(Manifest::builtin()),
    }
}

fn cmd_run(root: &Path, manifest: &Manifest, report_path: Option<&Path>) -> Result<RunSummary> {
    run_checks(root, manifest, report_path, &mut ConsoleReporter::stdout())
}

/// Run every check, logging to `console`. A missing root is reported but
/// still runs the full table so every check records its outcome.
fn run_checks<W: Write>(
    root: &Path,
    manifest: &Manifest,
    report_path: Option<&Path>,
    console: &mut ConsoleReporter<W>,
) -> Result<RunSummary> {
    let runner = ConformanceRunner::from_manifest(manifest).context("Invalid manifest")?;

    if !root.is_dir() {
        warn!(root = %root.display(), "Repository root is not a directory");
        console.log(
            Severity::Warning,
            &format!("Repository root {} is not a directory", root.display()),
        );
    }

    let report = runner.run(root, console);
    let summary = report.summary();

    if let Some(path) = report_path {
        let artifact = ReportArtifact::from_report(&report);
        write_report_json(path, &artifact)?;
        info!(path = %path.display(), "Wrote report artifact");
    }

    Ok(summary)
}

fn cmd_list(manifest: &Manifest) {
    println!("{} ({} checks)", manifest.title, manifest.checks.len());
    for (i, check) in manifest.checks.iter().enumerate() {
        let detail = match &check.rule {
            CheckRule::Existence { paths } => format!("{} paths", paths.len()),
            CheckRule::Content { targets } => targets
                .iter()
                .map(|t| format!("{} ({} tokens)", t.path, t.required.len()))
                .collect::<Vec<_>>()
                .join(", "),
        };
        println!("  {}. {} [{}] {}", i + 1, check.name, check.rule.kind(), detail);
    }
}

fn cmd_manifest(manifest: &Manifest) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest).context("serialize manifest")?;
    println!("{}", json);
    Ok(())
}
