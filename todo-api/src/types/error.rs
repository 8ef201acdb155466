//! Error types for the todo service

use thiserror::Error;
use todo_storage::{IndexStoreError, ObjectStoreError};

/// Result type for todo service operations
pub type TodoResult<T> = Result<T, TodoError>;

/// Errors that can occur while creating, reading or indexing a todo
///
/// The API handler collapses every variant into the same 500 response; the variants
/// exist for logging.
#[derive(Error, Debug)]
pub enum TodoError {
    /// No index entry exists for the id
    #[error("item not found: {0}")]
    NotFound(String),

    /// The index entry has no object store key
    #[error("storage key not found for item: {0}")]
    MissingReference(String),

    /// Object store operation failed
    #[error(transparent)]
    ObjectStore(#[from] ObjectStoreError),

    /// Index store operation failed
    #[error(transparent)]
    IndexStore(#[from] IndexStoreError),

    /// Stored content is not a valid todo record
    #[error("Failed to parse stored todo: {0}")]
    Parse(#[source] serde_json::Error),

    /// Stored object holds no record with the expected id
    #[error("no record for item {id} at {storage_key}")]
    RecordMismatch {
        /// Expected todo id
        id: String,
        /// Object store key that was read
        storage_key: String,
    },

    /// Request payload is not a JSON object
    #[error("Invalid todo payload: {0}")]
    InvalidPayload(String),
}

impl TodoError {
    /// Short machine-readable name of the failure kind, used as a log field
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::MissingReference(_) => "missing_reference",
            Self::ObjectStore(_) | Self::IndexStore(_) => "storage_failure",
            Self::Parse(_) | Self::RecordMismatch { .. } => "parse_failure",
            Self::InvalidPayload(_) => "invalid_payload",
        }
    }
}

/// Errors raised while loading configuration at startup
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variable is unset or empty
    #[error("{0} environment variable not set")]
    MissingVariable(&'static str),

    /// Environment variable holds an unsupported value
    #[error("Invalid value for {name}: {value}")]
    InvalidValue {
        /// Variable name
        name: &'static str,
        /// Rejected value
        value: String,
    },
}
