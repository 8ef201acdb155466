//! Todo storage gateways
//!
//! This crate provides the two storage backends used by the todo service: an object store
//! holding the full serialized record and an index store holding a short-lived pointer to it.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Index store (Dynamo DB) operations
pub mod index_store;
/// Object store (S3) operations
pub mod object_store;

/// In-memory gateways for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use index_store::{
    DynamoIndexStore, IndexAttribute, IndexEntry, IndexKey, IndexQuery, IndexStore,
    IndexStoreError, IndexStoreResult, SortOrder, INDEX_TTL_SECS, TODO_ENTRY_TYPE,
};
pub use object_store::{
    Encryption, ObjectStore, ObjectStoreError, ObjectStoreResult, S3ObjectStore, SelectFilter,
};
