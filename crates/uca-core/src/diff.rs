//! Package-level diffing between two snapshots of a backport target.

use std::collections::HashMap;

use serde::Serialize;

use crate::schema::PackageRecord;

/// One of the three change categories of a [`DiffResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffSection {
    Added,
    Removed,
    Updated,
}

impl DiffSection {
    pub const ALL: [DiffSection; 3] = [
        DiffSection::Added,
        DiffSection::Removed,
        DiffSection::Updated,
    ];

    /// Key used for this section in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffSection::Added => "added",
            DiffSection::Removed => "removed",
            DiffSection::Updated => "updated",
        }
    }
}

/// The packages that changed between an old and a new target snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    /// In the new snapshot only, in the new snapshot's order.
    pub added: Vec<PackageRecord>,
    /// In the old snapshot only, in the old snapshot's order.
    pub removed: Vec<PackageRecord>,
    /// In both with a different suffix. Holds the new record, in the old
    /// snapshot's order.
    pub updated: Vec<PackageRecord>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }

    /// Total number of changed packages.
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.updated.len()
    }

    pub fn section(&self, section: DiffSection) -> &[PackageRecord] {
        match section {
            DiffSection::Added => &self.added,
            DiffSection::Removed => &self.removed,
            DiffSection::Updated => &self.updated,
        }
    }
}

/// Diff two package lists keyed by package name.
///
/// A package present on both sides with the same suffix is not reported.
pub fn diff_packages(old: &[PackageRecord], new: &[PackageRecord]) -> DiffResult {
    let old_by_name: HashMap<&str, &PackageRecord> =
        old.iter().map(|p| (p.package(), p)).collect();
    let new_by_name: HashMap<&str, &PackageRecord> =
        new.iter().map(|p| (p.package(), p)).collect();

    let added = new
        .iter()
        .filter(|p| !old_by_name.contains_key(p.package()))
        .cloned()
        .collect();

    let removed = old
        .iter()
        .filter(|p| !new_by_name.contains_key(p.package()))
        .cloned()
        .collect();

    let updated = old
        .iter()
        .filter_map(|p| {
            new_by_name
                .get(p.package())
                .filter(|new_p| p.is_updated(new_p))
                .map(|new_p| (*new_p).clone())
        })
        .collect();

    DiffResult {
        added,
        removed,
        updated,
    }
}
