//! Todo application service
//!
//! Create writes the full record to the object store first and only then writes the
//! index entry pointing at it, so a reader that finds an index entry never finds a
//! dangling reference. The two writes are not atomic: a failed index write leaves an
//! orphaned object behind, which is left to the bucket's lifecycle policy.
//!
//! Read looks up the index entry by id, follows its storage key into the object store
//! and parses the record. Every step short-circuits on the first failure.

use std::sync::Arc;

use todo_storage::{
    Encryption, IndexEntry, IndexQuery, IndexStore, ObjectStore, SelectFilter, SortOrder,
};
use tracing::{debug, info, instrument, warn};

use super::model::{Todo, TodoRecord, ID_FIELD};
use super::{Clock, IdGenerator};
use crate::types::{ReadMode, TodoError, TodoResult};

/// Orchestrates todo persistence across the object store and the index store
pub struct TodoService {
    object_store: Arc<dyn ObjectStore>,
    index_store: Arc<dyn IndexStore>,
    id_generator: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    encryption: Encryption,
    read_mode: ReadMode,
}

impl TodoService {
    /// Creates a new todo service
    ///
    /// # Arguments
    ///
    /// * `object_store` - Store for the full serialized records
    /// * `index_store` - Store for the id to storage key pointers
    /// * `id_generator` - Source of fresh todo ids
    /// * `clock` - Time source for index timestamps and TTLs
    /// * `encryption` - Server-side encryption requested on every record write
    /// * `read_mode` - How records are fetched back from the object store
    #[must_use]
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        index_store: Arc<dyn IndexStore>,
        id_generator: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        encryption: Encryption,
        read_mode: ReadMode,
    ) -> Self {
        Self {
            object_store,
            index_store,
            id_generator,
            clock,
            encryption,
            read_mode,
        }
    }

    /// Stores a new todo and returns its generated id
    ///
    /// # Errors
    ///
    /// Returns `TodoError::ObjectStore` if the record write fails; no index entry is
    /// written in that case.
    /// Returns `TodoError::IndexStore` if the index write fails after the record was stored
    #[instrument(skip_all)]
    pub async fn create(&self, todo: Todo) -> TodoResult<String> {
        let id = self.id_generator.generate();
        let record = TodoRecord::new(id.clone(), todo);
        let storage_key = record.storage_key();

        self.object_store
            .put(&storage_key, record.to_body()?, &self.encryption)
            .await?;
        debug!(id = %id, storage_key = %storage_key, "Stored todo record");

        let entry = IndexEntry::new(&id, storage_key, self.clock.now());
        self.index_store.put(&entry).await.inspect_err(|e| {
            warn!(id = %id, error = %e, "Index write failed, stored record is orphaned");
        })?;

        info!(id = %id, ttl = entry.ttl, "Created todo");
        Ok(id)
    }

    /// Reads a todo by id
    ///
    /// # Errors
    ///
    /// Returns `TodoError::NotFound` if no index entry exists for `id`
    /// Returns `TodoError::MissingReference` if the index entry has no storage key
    /// Returns `TodoError::ObjectStore` / `TodoError::IndexStore` if a storage call fails
    /// Returns `TodoError::Parse` / `TodoError::RecordMismatch` if the stored content is not
    /// a valid record for `id`
    #[instrument(skip(self))]
    pub async fn read(&self, id: &str) -> TodoResult<TodoRecord> {
        if id.is_empty() {
            return Err(TodoError::NotFound(String::new()));
        }

        let entry = self
            .index_store
            .query(&IndexQuery::first(
                IndexEntry::partition_key_for(id),
                SortOrder::Ascending,
            ))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TodoError::NotFound(id.to_string()))?;

        let storage_key = entry
            .storage_key
            .ok_or_else(|| TodoError::MissingReference(id.to_string()))?;

        let record = self.fetch(&storage_key, id).await?;
        debug!(id, storage_key = %storage_key, "Read todo");
        Ok(record)
    }

    /// Indexes a record that already exists in the object store
    ///
    /// The record at `storage_key` is read and parsed before the index entry is written,
    /// so only valid records become readable.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::ObjectStore` if the record cannot be fetched
    /// Returns `TodoError::Parse` / `TodoError::RecordMismatch` if the stored content is not
    /// a valid record for `id`
    /// Returns `TodoError::IndexStore` if the index write fails
    #[instrument(skip(self))]
    pub async fn index(&self, storage_key: &str, id: &str) -> TodoResult<String> {
        let record = self.fetch(storage_key, id).await?;

        let entry = IndexEntry::new(&record.id, storage_key.to_string(), self.clock.now());
        self.index_store.put(&entry).await?;

        info!(id = %record.id, storage_key, ttl = entry.ttl, "Indexed todo");
        Ok(record.id)
    }

    async fn fetch(&self, storage_key: &str, id: &str) -> TodoResult<TodoRecord> {
        let record = match self.read_mode {
            ReadMode::Select => {
                let output = self
                    .object_store
                    .select(storage_key, &SelectFilter::field_equals(ID_FIELD, id))
                    .await?;
                TodoRecord::from_select_output(&output)?
            }
            ReadMode::Get => {
                let body = self.object_store.get(storage_key).await?;
                Some(TodoRecord::from_object(&body)?)
            }
        };

        match record {
            Some(record) if record.id == id => Ok(record),
            _ => Err(TodoError::RecordMismatch {
                id: id.to_string(),
                storage_key: storage_key.to_string(),
            }),
        }
    }
}
