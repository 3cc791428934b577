//! The validated contents of one backport target file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use super::error::{kind_of, SchemaError, Violation};
use super::package::PackageRecord;
use crate::diff::{diff_packages, DiffResult};

/// All packages backported for one target (e.g. `jammy-caracal`).
///
/// The target name is supplied by whoever read the text; it never comes
/// from the document itself. Once built the value is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFile {
    name: String,
    path: Option<PathBuf>,
    packages: Vec<PackageRecord>,
}

impl TargetFile {
    /// Parse and validate a target document.
    ///
    /// An empty document (or one holding only comments or an explicit
    /// null) is a target with no packages. This is also how a file that
    /// did not exist at an earlier revision is represented.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, SchemaError> {
        let packages = parse_packages(text)?;
        Ok(Self {
            name: name.into(),
            path: None,
            packages,
        })
    }

    /// Build a target from records that were constructed in code.
    ///
    /// The uniqueness rule still applies.
    pub fn from_packages(
        name: impl Into<String>,
        packages: Vec<PackageRecord>,
    ) -> Result<Self, SchemaError> {
        require_unique(&packages)?;
        Ok(Self {
            name: name.into(),
            path: None,
            packages,
        })
    }

    /// Record where the document was read from.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn target(&self) -> &str {
        &self.name
    }

    /// On-disk location, if this target was loaded from a file rather than
    /// from historical content.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Packages in document order.
    pub fn packages(&self) -> &[PackageRecord] {
        &self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn get(&self, package: &str) -> Option<&PackageRecord> {
        self.packages.iter().find(|p| p.package() == package)
    }

    /// Compare this (older) target against `other` (newer).
    pub fn diff(&self, other: &TargetFile) -> DiffResult {
        diff_packages(&self.packages, &other.packages)
    }
}

fn parse_packages(text: &str) -> Result<Vec<PackageRecord>, SchemaError> {
    if is_blank_document(text) {
        return Ok(Vec::new());
    }

    let mut document: Value = serde_yaml::from_str(text)?;
    // `<<: *anchor` entries become ordinary fields before validation.
    document.apply_merge()?;

    let entries = match document {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(entries) => entries,
        other => {
            return Err(SchemaError::NotASequence {
                found: kind_of(&other),
            })
        }
    };

    let mut packages = Vec::with_capacity(entries.len());
    let mut violations = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        match PackageRecord::from_yaml(index, entry) {
            Ok(record) => packages.push(record),
            Err(mut errs) => violations.append(&mut errs),
        }
    }
    if !violations.is_empty() {
        return Err(SchemaError::Invalid { violations });
    }

    require_unique(&packages)?;
    Ok(packages)
}

/// True for documents with nothing but whitespace, comments and markers.
fn is_blank_document(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

/// Reject targets listing the same package more than once.
///
/// Each duplicated name is reported once, with every index it appears at,
/// in order of first appearance.
fn require_unique(packages: &[PackageRecord]) -> Result<(), SchemaError> {
    let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut first_seen = Vec::new();
    for (index, record) in packages.iter().enumerate() {
        let seen = positions.entry(record.package()).or_default();
        if seen.is_empty() {
            first_seen.push(record.package());
        }
        seen.push(index);
    }

    let violations: Vec<Violation> = first_seen
        .into_iter()
        .filter_map(|package| {
            let indices = &positions[package];
            (indices.len() > 1).then(|| Violation::DuplicatePackage {
                package: package.to_string(),
                indices: indices.clone(),
            })
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Invalid { violations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DEFAULT_SUFFIX;

    #[test]
    fn test_parse_keeps_document_order() {
        let target = TargetFile::parse(
            "jammy-caracal",
            "- package: nova\n- package: cinder\n  suffix: '~cloud1'\n- package: glance\n",
        )
        .unwrap();

        assert_eq!(target.target(), "jammy-caracal");
        assert_eq!(target.path(), None);
        let names: Vec<&str> = target.packages().iter().map(|p| p.package()).collect();
        assert_eq!(names, vec!["nova", "cinder", "glance"]);
        assert_eq!(target.get("cinder").unwrap().suffix(), "~cloud1");
        assert_eq!(target.get("glance").unwrap().suffix(), DEFAULT_SUFFIX);
    }

    #[test]
    fn test_empty_inputs_have_no_packages() {
        for text in ["", "   \n", "# nothing yet\n", "---\n", "null\n", "~", "[]"] {
            let target = TargetFile::parse("noble-dalmatian", text)
                .unwrap_or_else(|e| panic!("{text:?} failed: {e}"));
            assert!(target.is_empty(), "{text:?} should be empty");
        }
    }

    #[test]
    fn test_top_level_mapping_rejected() {
        let err = TargetFile::parse("t", "package: nova\n").unwrap_err();
        assert_eq!(err, SchemaError::NotASequence { found: "mapping" });
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let err = TargetFile::parse("t", "- package: [nova\n").unwrap_err();
        assert!(matches!(err, SchemaError::Syntax { .. }));
    }

    #[test]
    fn test_record_violations_collected_across_entries() {
        let err = TargetFile::parse("t", "- package: nova\n  extra: x\n- suffix: '~cloud1'\n")
            .unwrap_err();
        let violations = err.violations();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].index(), Some(0));
        assert_eq!(violations[1].index(), Some(1));
        assert!(!err.has_duplicates());
    }

    #[test]
    fn test_duplicates_reported_after_record_checks() {
        let err = TargetFile::parse(
            "t",
            "- package: nova\n- package: cinder\n- package: nova\n  suffix: '~cloud1'\n",
        )
        .unwrap_err();
        assert_eq!(
            err.violations(),
            &[Violation::DuplicatePackage {
                package: "nova".to_string(),
                indices: vec![0, 2],
            }]
        );
    }

    #[test]
    fn test_uniqueness_pass_skipped_when_records_invalid() {
        let err = TargetFile::parse("t", "- package: nova\n- package: nova\n- bogus: 1\n")
            .unwrap_err();
        assert!(!err.has_duplicates());
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn test_from_packages_enforces_uniqueness() {
        let err = TargetFile::from_packages(
            "t",
            vec![
                PackageRecord::with_default_suffix("nova"),
                PackageRecord::new("nova", "~cloud1"),
            ],
        )
        .unwrap_err();
        assert!(err.has_duplicates());
    }

    #[test]
    fn test_merge_keys_resolved_before_validation() {
        let target = TargetFile::parse(
            "t",
            concat!(
                "- &base {package: nova, reason: CVE}\n",
                "- {<<: *base, suffix: ~cloud1, package: cinder}\n",
            ),
        )
        .unwrap();

        let cinder = target.get("cinder").unwrap();
        assert_eq!(cinder.suffix(), "~cloud1");
        assert_eq!(cinder.reason(), Some("CVE"));
        assert_eq!(target.len(), 2);
    }

    #[test]
    fn test_merge_of_non_mapping_rejected() {
        let err = TargetFile::parse("t", "- {package: nova, <<: 3}\n").unwrap_err();
        assert!(matches!(err, SchemaError::Syntax { .. }));
    }

    #[test]
    fn test_with_path() {
        let target = TargetFile::parse("t", "[]")
            .unwrap()
            .with_path("/srv/backports/t.yaml");
        assert_eq!(target.path(), Some(Path::new("/srv/backports/t.yaml")));
    }
}
