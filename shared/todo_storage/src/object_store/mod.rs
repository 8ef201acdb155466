//! Object storage for serialized todo records
//!
//! The object store holds the full record body. Every write must carry an explicit
//! server-side encryption key; reads either fetch the whole object or run a restricted
//! select query against a single JSON document.

mod error;
mod s3;

use async_trait::async_trait;

pub use error::{ObjectStoreError, ObjectStoreResult};
pub use s3::S3ObjectStore;

/// Server-side encryption requested on every object write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encryption {
    /// SSE-KMS with an explicit key reference (key id or ARN)
    Kms {
        /// KMS key id or ARN
        key_id: String,
    },
}

impl Encryption {
    /// Requests SSE-KMS with the given key reference
    #[must_use]
    pub fn kms(key_id: impl Into<String>) -> Self {
        Self::Kms {
            key_id: key_id.into(),
        }
    }
}

/// Predicate for partial retrieval of a stored JSON document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectFilter {
    /// Document has a top-level string field equal to the given value
    FieldEquals {
        /// Top-level field name
        field: String,
        /// Expected string value
        value: String,
    },
}

impl SelectFilter {
    /// Filter matching documents whose `field` equals `value`
    #[must_use]
    pub fn field_equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Renders the filter as an S3 Select SQL expression
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError::InvalidInput` if the field name is not a plain identifier
    pub fn to_sql(&self) -> ObjectStoreResult<String> {
        match self {
            Self::FieldEquals { field, value } => {
                let is_identifier = !field.is_empty()
                    && field
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_');
                if !is_identifier {
                    return Err(ObjectStoreError::InvalidInput(format!(
                        "invalid select field name: {field}"
                    )));
                }

                let escaped = value.replace('\'', "''");
                Ok(format!(
                    "SELECT * FROM s3object s WHERE s.{field} = '{escaped}'"
                ))
            }
        }
    }

    /// Evaluates the filter against an already parsed document
    #[must_use]
    pub fn matches(&self, document: &serde_json::Value) -> bool {
        match self {
            Self::FieldEquals { field, value } => document
                .get(field)
                .and_then(serde_json::Value::as_str)
                .is_some_and(|v| v == value),
        }
    }
}

/// Durable blob storage addressed by key
///
/// Every operation is a single attempt; retries are left to the caller.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `body` at `key`, encrypted at rest with `encryption`
    async fn put(&self, key: &str, body: Vec<u8>, encryption: &Encryption)
        -> ObjectStoreResult<()>;

    /// Fetches the whole object at `key`
    async fn get(&self, key: &str) -> ObjectStoreResult<Vec<u8>>;

    /// Runs `filter` against the JSON document at `key` and returns the matching
    /// records as newline-delimited JSON, undecoded. No match yields an empty body.
    async fn select(&self, key: &str, filter: &SelectFilter) -> ObjectStoreResult<Vec<u8>>;
}
