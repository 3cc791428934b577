//! Ubuntu Cloud Archive backport targets.
//!
//! Validates backport target files and diffs two snapshots of the same
//! target. The schema and diff modules work on text already in memory;
//! [`targets`] and [`git`] do the file-system and history reads that feed
//! them.

pub mod diff;
pub mod error;
pub mod git;
pub mod obs;
pub mod schema;
pub mod targets;
pub mod telemetry;

pub use diff::{diff_packages, DiffResult, DiffSection};
pub use error::{Result, UcaError};
pub use git::{is_git_repo, previous_content, require_history, DEFAULT_PREVIOUS_REV};
pub use obs::{
    emit_diff_computed, emit_history_missing, emit_target_invalid, emit_target_loaded, TargetSpan,
};
pub use schema::{PackageRecord, SchemaError, TargetFile, Violation, DEFAULT_SUFFIX};
pub use targets::{load_target_file, TargetDir, DEFAULT_BACKPORTS_DIR};
pub use telemetry::init_tracing;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
