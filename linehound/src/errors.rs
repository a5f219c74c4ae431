use std::path::PathBuf;
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur while driving a search session
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid root directory: {0}")]
    InvalidRoot(PathBuf),
    #[error("Could not read file {path}: {source}")]
    UnreadableFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Directory traversal failed at {path}: {message}")]
    TraversalFailure { path: PathBuf, message: String },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SearchError {
    pub fn invalid_root(path: impl Into<PathBuf>) -> Self {
        Self::InvalidRoot(path.into())
    }

    pub fn unreadable_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::UnreadableFile {
            path: path.into(),
            source,
        }
    }

    pub fn traversal_failure(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::TraversalFailure {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// A non-fatal problem encountered while scanning one work unit.
///
/// Diagnostics are accumulated alongside normal results instead of being
/// raised: a single unreadable file or a failed subtree never aborts the
/// search that contains it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The path the problem was observed at
    pub path: PathBuf,
    /// Human-readable description of what went wrong
    pub message: String,
}

impl Diagnostic {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<&SearchError> for Diagnostic {
    fn from(err: &SearchError) -> Self {
        let path = match err {
            SearchError::InvalidRoot(p) => p.clone(),
            SearchError::UnreadableFile { path, .. } => path.clone(),
            SearchError::TraversalFailure { path, .. } => path.clone(),
            _ => PathBuf::new(),
        };
        Self {
            path,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_creation() {
        let path = Path::new("somewhere");
        let err = SearchError::invalid_root(path);
        assert!(matches!(err, SearchError::InvalidRoot(_)));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = SearchError::unreadable_file("locked.txt", io);
        assert!(matches!(err, SearchError::UnreadableFile { .. }));

        let err = SearchError::traversal_failure("broken", "loop detected");
        assert!(matches!(err, SearchError::TraversalFailure { .. }));
    }

    #[test]
    fn test_error_messages() {
        let err = SearchError::invalid_root("no/such/dir");
        assert_eq!(err.to_string(), "Invalid root directory: no/such/dir");

        let err = SearchError::traversal_failure("sub", "permission denied");
        assert_eq!(
            err.to_string(),
            "Directory traversal failed at sub: permission denied"
        );

        let err = SearchError::config_error("missing root_path");
        assert_eq!(err.to_string(), "Configuration error: missing root_path");
    }

    #[test]
    fn test_diagnostic_from_error() {
        let err = SearchError::traversal_failure("sub/dir", "cycle");
        let diag = Diagnostic::from(&err);
        assert_eq!(diag.path, PathBuf::from("sub/dir"));
        assert!(diag.message.contains("cycle"));
    }
}
