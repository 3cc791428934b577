//! UCA - Ubuntu Cloud Archive backport tooling
//!
//! The `uca` command validates backport target files and shows how a
//! target changed since the previous git revision.
//!
//! ## Commands
//!
//! - `schema targets`: List the available backport targets
//! - `schema validate`: Validate target files against the schema
//! - `schema diff`: Show package changes against the previous revision

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, Level};

use uca_core::{
    emit_diff_computed, load_target_file, previous_content, require_history, DiffResult,
    DiffSection, TargetDir, TargetFile, TargetSpan, UcaError, DEFAULT_BACKPORTS_DIR,
    DEFAULT_PREVIOUS_REV,
};

#[derive(Parser)]
#[command(name = "uca")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ubuntu Cloud Archive backport tooling", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Directory holding the <target>.yaml backport files
    #[arg(long, global = true, env = "UCA_BACKPORTS_DIR", default_value = DEFAULT_BACKPORTS_DIR)]
    backports_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backport schema operations
    Schema {
        #[command(subcommand)]
        action: SchemaAction,
    },
}

#[derive(Subcommand)]
enum SchemaAction {
    /// List the available backport targets
    Targets {
        /// The output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Value)]
        format: OutputFormat,
    },

    /// Validate backport files against the schema
    Validate {
        /// The target os_release-series to validate (default: all)
        #[arg(long)]
        target: Option<String>,
    },

    /// Show package differences between a backport and previous history
    Diff {
        /// Target to diff
        target: String,

        /// The output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Value)]
        format: OutputFormat,

        /// Show only updated packages
        #[arg(long)]
        updated: bool,

        /// Show only added packages
        #[arg(long)]
        added: bool,

        /// Show only removed packages
        #[arg(long)]
        removed: bool,

        /// Revision to compare the working copy against
        #[arg(long, default_value = DEFAULT_PREVIOUS_REV)]
        rev: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Value,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    uca_core::init_tracing(cli.json_logs, level);

    let targets = TargetDir::new(&cli.backports_dir);
    debug!(backports_dir = %targets.root().display(), "using backports directory");

    match cli.command {
        Commands::Schema { action } => match action {
            SchemaAction::Targets { format } => cmd_targets(&targets, format),
            SchemaAction::Validate { target } => cmd_validate(&targets, target.as_deref()),
            SchemaAction::Diff {
                target,
                format,
                updated,
                added,
                removed,
                rev,
            } => {
                let sections = selected_sections(added, removed, updated);
                cmd_diff(&targets, &target, &rev, format, &sections)
            }
        },
    }
}

// ---------------------------------------------------------------------------
// targets
// ---------------------------------------------------------------------------

fn cmd_targets(targets: &TargetDir, format: OutputFormat) -> Result<()> {
    let names = targets
        .names()
        .with_context(|| format!("Failed to list {}", targets.root().display()))?;
    print!("{}", render_targets(&names, format)?);
    Ok(())
}

/// One name per line in `value` format, so no targets prints nothing.
fn render_targets(names: &[String], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string(names)?)),
        OutputFormat::Value => Ok(names.iter().map(|name| format!("{name}\n")).collect()),
    }
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn cmd_validate(targets: &TargetDir, target: Option<&str>) -> Result<()> {
    let files = match target {
        Some(name) => match targets.path_for(name) {
            Ok(path) => vec![path],
            Err(UcaError::TargetNotFound(_)) => {
                anyhow::bail!("No backports found for target {name}")
            }
            Err(e) => return Err(e.into()),
        },
        None => targets
            .files()
            .with_context(|| format!("Failed to list {}", targets.root().display()))?,
    };

    let report = validate_files(&files);
    for line in &report.lines {
        println!("{line}");
    }

    if report.failed > 0 {
        anyhow::bail!(
            "{} of {} backport file(s) failed validation",
            report.failed,
            files.len()
        );
    }
    Ok(())
}

/// Per-file validation output, plus how many files failed.
#[derive(Debug, Default)]
struct ValidationReport {
    lines: Vec<String>,
    failed: usize,
}

fn validate_files(files: &[PathBuf]) -> ValidationReport {
    let mut report = ValidationReport::default();
    for path in files {
        report.lines.push(format!("Validating {}", path.display()));
        match load_target_file(path) {
            Ok(target) => report.lines.push(format!(
                "Target {} contains {} packages",
                target.target(),
                target.len()
            )),
            Err(e) => {
                report.failed += 1;
                let reason = match e.schema_error() {
                    Some(schema) => schema.to_string(),
                    None => e.to_string(),
                };
                report
                    .lines
                    .push(format!("Failed to validate {}: {}", path.display(), reason));
            }
        }
    }
    report
}

// ---------------------------------------------------------------------------
// diff
// ---------------------------------------------------------------------------

fn cmd_diff(
    targets: &TargetDir,
    target: &str,
    rev: &str,
    format: OutputFormat,
    sections: &[DiffSection],
) -> Result<()> {
    let diff = diff_against_history(targets, target, rev)?;
    println!("{}", render_diff(target, &diff, format, sections)?);
    Ok(())
}

/// Diff the working copy of `target` against its content at `rev`.
fn diff_against_history(targets: &TargetDir, target: &str, rev: &str) -> Result<DiffResult> {
    let _span = TargetSpan::enter(target);

    match require_history(targets.root(), 2) {
        Err(UcaError::NotEnoughHistory { .. }) => {
            anyhow::bail!("Need at least two git revisions to compare")
        }
        other => other.context("Failed to inspect git history")?,
    };

    let path = match targets.path_for(target) {
        Ok(path) => path,
        Err(UcaError::TargetNotFound(_)) => anyhow::bail!("No backport found for target {target}"),
        Err(e) => return Err(e.into()),
    };

    let current = load_target_file(&path)?;
    let previous = load_previous(target, &path, rev)?;

    let diff = previous.diff(&current);
    emit_diff_computed(
        target,
        diff.added.len(),
        diff.removed.len(),
        diff.updated.len(),
    );
    Ok(diff)
}

fn load_previous(target: &str, path: &Path, rev: &str) -> Result<TargetFile> {
    let content = previous_content(path, rev)
        .with_context(|| format!("Failed to read {} at {}", path.display(), rev))?;
    TargetFile::parse(target, &content)
        .with_context(|| format!("Failed to validate {} at {}", path.display(), rev))
}

/// Sections to show: the ones asked for, or all of them when none were.
fn selected_sections(added: bool, removed: bool, updated: bool) -> Vec<DiffSection> {
    let show_all = !(added || removed || updated);
    DiffSection::ALL
        .into_iter()
        .filter(|section| {
            show_all
                || match section {
                    DiffSection::Added => added,
                    DiffSection::Removed => removed,
                    DiffSection::Updated => updated,
                }
        })
        .collect()
}

fn render_diff(
    target: &str,
    diff: &DiffResult,
    format: OutputFormat,
    sections: &[DiffSection],
) -> Result<String> {
    match format {
        OutputFormat::Json => render_diff_json(diff, sections),
        OutputFormat::Value => Ok(render_diff_text(target, diff, sections)),
    }
}

fn render_diff_json(diff: &DiffResult, sections: &[DiffSection]) -> Result<String> {
    let mut out = serde_json::Map::new();
    if !diff.is_empty() {
        for section in sections {
            out.insert(
                section.as_str().to_string(),
                serde_json::to_value(diff.section(*section))?,
            );
        }
    }
    Ok(serde_json::to_string(&out)?)
}

fn render_diff_text(target: &str, diff: &DiffResult, sections: &[DiffSection]) -> String {
    if diff.is_empty() {
        return "No changes detected".to_string();
    }

    let mut lines = vec![format!("Diff for {target}")];
    for section in sections {
        lines.push(
            match section {
                DiffSection::Added => "Added:",
                DiffSection::Removed => "Removed:",
                DiffSection::Updated => "Updated:",
            }
            .to_string(),
        );
        for package in diff.section(*section) {
            lines.push(format!("  {}", package.package()));
        }
    }
    lines.join("\n")
}
