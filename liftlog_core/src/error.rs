//! Error types for the liftlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Reason a session submission was rejected before any write
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no training plan selected")]
    MissingPlan,

    #[error("no plan day selected")]
    MissingDay,

    #[error("no session date given")]
    MissingDate,

    #[error("session has no exercises to log")]
    NoExercises,
}

/// Core error type for liftlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// No user is signed in
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Submission rejected before any write
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A store call failed; the operation may be retried
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the caller may retry the operation as-is
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Persistence(_) | Error::Io(_))
    }

    /// Re-tag a store failure as a persistence error
    pub fn into_persistence(self) -> Error {
        match self {
            Error::Persistence(_) => self,
            other => Error::Persistence(other.to_string()),
        }
    }
}
