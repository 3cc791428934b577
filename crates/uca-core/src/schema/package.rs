//! A single backported package entry.

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use super::error::{kind_of, Violation};

/// Suffix used when an entry does not force a rebuild.
///
/// Bumping the suffix (e.g. to `~cloud1`) forces a new backport of the same
/// package.
pub const DEFAULT_SUFFIX: &str = "~cloud0";

/// One package entry of a backport target.
///
/// Entries accept exactly the fields `package`, `suffix` and `reason`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PackageRecord {
    package: String,
    suffix: String,
    reason: Option<String>,
}

impl PackageRecord {
    /// Create a record with an explicit suffix and no reason.
    pub fn new(package: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            suffix: suffix.into(),
            reason: None,
        }
    }

    /// Create a record carrying [`DEFAULT_SUFFIX`].
    pub fn with_default_suffix(package: impl Into<String>) -> Self {
        Self::new(package, DEFAULT_SUFFIX)
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Is `other` an updated version of this same package?
    ///
    /// Only the suffix takes part in the comparison; a change of `reason`
    /// alone is not an update.
    ///
    /// # Panics
    ///
    /// Panics if the two records name different packages. Comparing
    /// unrelated packages is a caller bug, not a data error.
    pub fn is_updated(&self, other: &PackageRecord) -> bool {
        assert_eq!(
            self.package, other.package,
            "is_updated: not the same package"
        );
        self.suffix != other.suffix
    }

    /// Validate one entry of the top-level sequence.
    ///
    /// Every problem with the entry is collected; the record is only built
    /// when there are none.
    pub fn from_yaml(index: usize, value: &Value) -> Result<Self, Vec<Violation>> {
        let Some(mapping) = value.as_mapping() else {
            return Err(vec![Violation::NotAMapping {
                index,
                found: kind_of(value),
            }]);
        };
        Self::from_mapping(index, mapping)
    }

    fn from_mapping(index: usize, mapping: &Mapping) -> Result<Self, Vec<Violation>> {
        let mut violations = Vec::new();
        let mut package_seen = false;
        let mut package = None;
        let mut suffix = None;
        let mut reason = None;

        for (key, value) in mapping {
            let Some(name) = key.as_str() else {
                violations.push(Violation::UnknownField {
                    index,
                    field: describe_key(key),
                });
                continue;
            };

            match name {
                "package" => {
                    package_seen = true;
                    package = string_field(index, "package", value, &mut violations);
                    if package.as_deref() == Some("") {
                        violations.push(Violation::EmptyField {
                            index,
                            field: "package",
                        });
                    }
                }
                "suffix" => suffix = string_field(index, "suffix", value, &mut violations),
                // An explicit null reason is the same as leaving it out.
                "reason" if value.is_null() => {}
                "reason" => reason = string_field(index, "reason", value, &mut violations),
                other => violations.push(Violation::UnknownField {
                    index,
                    field: other.to_string(),
                }),
            }
        }

        if !package_seen {
            violations.push(Violation::MissingField {
                index,
                field: "package",
            });
        }

        match package {
            Some(package) if violations.is_empty() => Ok(Self {
                package,
                suffix: suffix.unwrap_or_else(|| DEFAULT_SUFFIX.to_string()),
                reason,
            }),
            _ => Err(violations),
        }
    }
}

fn string_field(
    index: usize,
    field: &'static str,
    value: &Value,
    violations: &mut Vec<Violation>,
) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        other => {
            violations.push(Violation::WrongType {
                index,
                field,
                expected: "string",
                found: kind_of(other),
            });
            None
        }
    }
}

fn describe_key(key: &Value) -> String {
    match key {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => format!("<{}>", kind_of(other)),
    }
}
