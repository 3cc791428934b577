//! Crate-level error taxonomy.

use crate::schema::SchemaError;

/// Errors from loading targets and reading their history.
#[derive(Debug, thiserror::Error)]
pub enum UcaError {
    #[error("failed to validate target {target}: {source}")]
    Schema { target: String, source: SchemaError },

    #[error("no backports found for target {0}")]
    TargetNotFound(String),

    #[error("git error: {0}")]
    GitError(String),

    #[error("need at least {required} git revisions to compare, found {found}")]
    NotEnoughHistory { required: u64, found: u64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl UcaError {
    /// The schema failure behind this error, if that is what it is.
    pub fn schema_error(&self) -> Option<&SchemaError> {
        match self {
            UcaError::Schema { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for crate operations.
pub type Result<T> = std::result::Result<T, UcaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display_names_target() {
        let err = UcaError::Schema {
            target: "jammy-caracal".to_string(),
            source: SchemaError::NotASequence { found: "mapping" },
        };
        let msg = err.to_string();
        assert!(msg.contains("jammy-caracal"));
        assert!(msg.contains("expected a sequence"));
        assert!(err.schema_error().is_some());
    }

    #[test]
    fn test_not_enough_history() {
        let err = UcaError::NotEnoughHistory {
            required: 2,
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "need at least 2 git revisions to compare, found 1"
        );
        assert!(err.schema_error().is_none());
    }

    #[test]
    fn test_target_not_found() {
        let err = UcaError::TargetNotFound("focal-yoga".to_string());
        assert_eq!(err.to_string(), "no backports found for target focal-yoga");
    }
}
