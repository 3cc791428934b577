//! Structured log events for target loading and diffing.
//!
//! Events are emitted at `info!` level unless noted; filter them with
//! `RUST_LOG` (e.g. `RUST_LOG=uca_core=debug`).

use std::fmt::Display;
use std::path::Path;

use tracing::{debug, info, warn};

/// RAII guard that enters a target-scoped tracing span.
///
/// ```ignore
/// let _span = TargetSpan::enter("jammy-caracal");
/// // every event below is tagged with target = "jammy-caracal"
/// ```
pub struct TargetSpan {
    _span: tracing::span::EnteredSpan,
}

impl TargetSpan {
    pub fn enter(target: &str) -> Self {
        let span = tracing::info_span!("uca.target", target = %target);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: a target file parsed and validated.
pub fn emit_target_loaded(target: &str, packages: usize) {
    info!(event = "target.loaded", target = %target, packages = packages);
}

/// Emit event: a target file was rejected (warning level).
pub fn emit_target_invalid(target: &str, error: &dyn Display) {
    warn!(event = "target.invalid", target = %target, error = %error);
}

/// Emit event: a diff between two snapshots of a target was computed.
pub fn emit_diff_computed(target: &str, added: usize, removed: usize, updated: usize) {
    info!(
        event = "target.diffed",
        target = %target,
        added = added,
        removed = removed,
        updated = updated,
    );
}

/// Emit event: the file has no content at the requested revision (debug level).
pub fn emit_history_missing(path: &Path, rev: &str) {
    debug!(event = "history.missing", path = %path.display(), rev = %rev);
}
