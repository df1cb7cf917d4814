//! Error types for registry operations
//!
//! Provides error handling for:
//! - Folder and file access
//! - Collection and document validation
//! - Pending request retrieval
//! - Number allocation and file creation

use std::path::PathBuf;
use tep_document::{PatternError, ValidationErrors};

/// Pending request source could not be read
///
/// Never treated as an empty list: allocating without the pending numbers
/// risks handing out a number already under review.
#[derive(Debug, thiserror::Error)]
#[error("pending request source {source_name} unavailable: {reason}")]
pub struct SourceUnavailable {
    /// Name of the source (URL or label)
    pub source_name: String,
    /// What went wrong
    pub reason: String,
}

impl SourceUnavailable {
    /// Create error for a named source
    pub fn new(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Main registry error type
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Folder does not exist or is not a directory
    #[error("invalid TEP folder {0}")]
    InvalidFolder(PathBuf),

    /// IO error on a path
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document or collection defects
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Pending request source failed
    #[error(transparent)]
    SourceUnavailable(#[from] SourceUnavailable),

    /// Configuration file could not be read
    #[error("invalid configuration {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Pattern configuration does not compile
    #[error("invalid patterns: {0}")]
    Pattern(#[from] PatternError),

    /// Allocated number no longer fits four digits
    #[error("TEP number {0} exceeds the four digit range")]
    NumberSpaceExhausted(u32),

    /// Refusing to overwrite an existing file
    #[error("target {0} already exists")]
    TargetExists(PathBuf),

    /// Request is missing required input
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl RegistryError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tep_document::Issue;

    #[test]
    fn source_unavailable_display() {
        let err = SourceUnavailable::new("github", "connection refused");
        assert_eq!(
            err.to_string(),
            "pending request source github unavailable: connection refused"
        );
    }

    #[test]
    fn validation_errors_convert() {
        let errors = ValidationErrors::new(vec![Issue::invalid("a.md", "title field missing in file a.md")]);
        let err: RegistryError = errors.into();
        assert!(matches!(err, RegistryError::Validation(_)));
        assert_eq!(err.to_string(), "title field missing in file a.md");
    }
}
