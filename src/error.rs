use thiserror::Error;

/// Unified error type for git-semtag operations
#[derive(Error, Debug)]
pub enum SemtagError {
    #[error("not a git repository: {0}")]
    NotARepository(String),

    #[error("no remote named '{0}' configured")]
    NoRemote(String),

    #[error("no tags found, run 'git-semtag --init' to create a seed tag first")]
    NotInitialized,

    #[error("invalid version format: {0}")]
    InvalidFormat(String),

    #[error("invalid pre-release label: {0}")]
    InvalidLabel(String),

    #[error("conflicting operations: {0}")]
    ConflictingOperation(String),

    #[error("git {operation} failed: {source}")]
    Backend {
        operation: String,
        #[source]
        source: git2::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-semtag
pub type Result<T> = std::result::Result<T, SemtagError>;

impl SemtagError {
    /// Create an invalid-format error with context
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        SemtagError::InvalidFormat(msg.into())
    }

    /// Create an invalid-label error with context
    pub fn invalid_label(msg: impl Into<String>) -> Self {
        SemtagError::InvalidLabel(msg.into())
    }

    /// Create a conflicting-operation error with context
    pub fn conflicting(msg: impl Into<String>) -> Self {
        SemtagError::ConflictingOperation(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SemtagError::Config(msg.into())
    }

    /// Wrap a git2 error, naming the backend operation that failed
    pub fn backend(operation: impl Into<String>, source: git2::Error) -> Self {
        SemtagError::Backend {
            operation: operation.into(),
            source,
        }
    }
}
