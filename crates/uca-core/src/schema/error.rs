//! Schema violations reported while loading a backport target.

use serde_yaml::Value;

/// A single problem found in a backport target document.
///
/// Record-level variants carry the zero-based index of the offending entry
/// in the top-level sequence. `DuplicatePackage` is produced by the
/// uniqueness pass, which only runs once every record is well formed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("packages[{index}]: expected a mapping, found {found}")]
    NotAMapping { index: usize, found: &'static str },

    #[error("packages[{index}]: missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("packages[{index}]: unknown field `{field}`")]
    UnknownField { index: usize, field: String },

    #[error("packages[{index}].{field}: expected {expected}, found {found}")]
    WrongType {
        index: usize,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("packages[{index}].{field}: must not be empty")]
    EmptyField { index: usize, field: &'static str },

    #[error("package `{package}` is listed more than once (entries {indices:?})")]
    DuplicatePackage { package: String, indices: Vec<usize> },
}

impl Violation {
    /// Index of the offending record, if the violation concerns a single one.
    pub fn index(&self) -> Option<usize> {
        match self {
            Violation::NotAMapping { index, .. }
            | Violation::MissingField { index, .. }
            | Violation::UnknownField { index, .. }
            | Violation::WrongType { index, .. }
            | Violation::EmptyField { index, .. } => Some(*index),
            Violation::DuplicatePackage { .. } => None,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Violation::DuplicatePackage { .. })
    }
}

/// Errors produced when a backport target document fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("invalid YAML: {message}")]
    Syntax {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    #[error("expected a sequence of packages, found {found}")]
    NotASequence { found: &'static str },

    #[error("{}", render_violations(.violations))]
    Invalid { violations: Vec<Violation> },
}

impl SchemaError {
    /// All violations carried by this error (empty for syntax/shape errors).
    pub fn violations(&self) -> &[Violation] {
        match self {
            SchemaError::Invalid { violations } => violations,
            _ => &[],
        }
    }

    /// Whether the failure comes from the package-uniqueness pass.
    pub fn has_duplicates(&self) -> bool {
        self.violations().iter().any(Violation::is_duplicate)
    }
}

impl From<serde_yaml::Error> for SchemaError {
    fn from(err: serde_yaml::Error) -> Self {
        let location = err.location();
        SchemaError::Syntax {
            message: err.to_string(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
        }
    }
}

fn render_violations(violations: &[Violation]) -> String {
    let details = violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    match violations.len() {
        1 => format!("1 validation error: {details}"),
        n => format!("{n} validation errors: {details}"),
    }
}

/// Human-readable name of a YAML node's type.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
