//! Index storage for todo pointer records
//!
//! Each todo gets one short-lived index entry mapping its id to the object store key of
//! the full record. Entries expire through the table's native TTL attribute.

mod dynamo;
mod error;

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

pub use dynamo::DynamoIndexStore;
pub use error::{IndexStoreError, IndexStoreResult};

/// Lifetime of an index entry after creation, in seconds
pub const INDEX_TTL_SECS: i64 = 2 * 60;

/// Discriminator stored in the `Type` attribute of todo entries
pub const TODO_ENTRY_TYPE: &str = "Todo";

/// Attribute names for the index table
#[derive(Debug, Clone, Copy, Display)]
pub enum IndexAttribute {
    /// Partition key
    #[strum(serialize = "PK")]
    PartitionKey,
    /// Sort key
    #[strum(serialize = "SK")]
    SortKey,
    /// Todo id
    Id,
    /// Entry type discriminator
    Type,
    /// Object store key of the full record
    S3Key,
    /// ISO-8601 creation timestamp
    CreatedAt,
    /// TTL timestamp (Unix epoch seconds)
    #[strum(serialize = "TTL")]
    Ttl,
}

/// Pointer record stored in the index table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Partition key (`TODO#<id>`)
    #[serde(rename = "PK")]
    pub partition_key: String,
    /// Sort key (creation timestamp)
    #[serde(rename = "SK")]
    pub sort_key: String,
    /// Todo id
    #[serde(rename = "Id")]
    pub id: String,
    /// Entry type discriminator
    #[serde(rename = "Type")]
    pub entry_type: String,
    /// Object store key of the full record
    ///
    /// Absent only on entries written outside of the todo service.
    #[serde(rename = "S3Key", default, skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
    /// ISO-8601 creation timestamp
    #[serde(rename = "CreatedAt")]
    pub created_at: String,
    /// TTL timestamp (Unix epoch seconds)
    #[serde(rename = "TTL")]
    pub ttl: i64,
}

impl IndexEntry {
    /// Builds the index entry for a todo whose record lives at `storage_key`
    ///
    /// The sort key and `CreatedAt` are both the creation time; the TTL is
    /// `created_at + INDEX_TTL_SECS` in epoch seconds.
    #[must_use]
    pub fn new(id: &str, storage_key: String, created_at: DateTime<Utc>) -> Self {
        let created_at_iso = created_at.to_rfc3339_opts(SecondsFormat::Millis, true);

        Self {
            partition_key: Self::partition_key_for(id),
            sort_key: created_at_iso.clone(),
            id: id.to_string(),
            entry_type: TODO_ENTRY_TYPE.to_string(),
            storage_key: Some(storage_key),
            created_at: created_at_iso,
            ttl: (created_at + Duration::seconds(INDEX_TTL_SECS)).timestamp(),
        }
    }

    /// Partition key under which entries for `id` are stored
    #[must_use]
    pub fn partition_key_for(id: &str) -> String {
        format!("TODO#{id}")
    }

    /// Primary key of this entry
    #[must_use]
    pub fn key(&self) -> IndexKey {
        IndexKey {
            partition_key: self.partition_key.clone(),
            sort_key: self.sort_key.clone(),
        }
    }
}

/// Full primary key of an index entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey {
    /// Partition key
    pub partition_key: String,
    /// Sort key
    pub sort_key: String,
}

/// Sort key ordering of query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest first
    #[default]
    Ascending,
    /// Newest first
    Descending,
}

/// Query over a single partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexQuery {
    /// Partition key to match exactly
    pub partition_key: String,
    /// Maximum number of entries to return
    pub limit: Option<i32>,
    /// Sort key ordering
    pub order: SortOrder,
}

impl IndexQuery {
    /// Query returning only the first entry of a partition in `order`
    #[must_use]
    pub fn first(partition_key: String, order: SortOrder) -> Self {
        Self {
            partition_key,
            limit: Some(1),
            order,
        }
    }
}

/// Key-value store holding index entries
///
/// Every operation is a single attempt; retries are left to the caller.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Writes (or overwrites) an entry
    async fn put(&self, entry: &IndexEntry) -> IndexStoreResult<()>;

    /// Point lookup by full primary key
    async fn get(&self, key: &IndexKey) -> IndexStoreResult<Option<IndexEntry>>;

    /// Entries of one partition, ordered by sort key and truncated to the query limit
    async fn query(&self, query: &IndexQuery) -> IndexStoreResult<Vec<IndexEntry>>;
}
