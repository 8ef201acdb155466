//! In-memory gateways
//!
//! Drop-in replacements for the S3 and Dynamo DB gateways used by unit and handler tests.
//! Both support fault injection so ordering guarantees can be checked without AWS.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    Encryption, IndexEntry, IndexKey, IndexQuery, IndexStore, IndexStoreError, IndexStoreResult,
    ObjectStore, ObjectStoreError, ObjectStoreResult, SelectFilter, SortOrder,
};

/// Stored object together with the encryption it was written with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Raw object body
    pub body: Vec<u8>,
    /// Encryption requested on write
    pub encryption: Encryption,
}

/// Object store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<String, StoredObject>>,
    fail_puts: AtomicBool,
}

impl InMemoryObjectStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose `put` always fails
    #[must_use]
    pub fn failing_puts() -> Self {
        let store = Self::default();
        store.set_fail_puts(true);
        store
    }

    /// Toggles `put` failure injection
    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Returns the stored object at `key`, if any
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned
    #[must_use]
    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    /// Writes an object directly, bypassing failure injection
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned
    pub fn insert_raw(&self, key: &str, body: Vec<u8>, encryption: Encryption) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), StoredObject { body, encryption });
    }

    /// Number of stored objects
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Whether the store holds no objects
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn body(&self, key: &str) -> ObjectStoreResult<Vec<u8>> {
        self.objects
            .lock()
            .map_err(|e| ObjectStoreError::S3GetError(e.to_string()))?
            .get(key)
            .map(|object| object.body.clone())
            .ok_or_else(|| ObjectStoreError::ObjectNotFound(key.to_string()))
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        encryption: &Encryption,
    ) -> ObjectStoreResult<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(ObjectStoreError::S3PutError(format!(
                "injected put failure for {key}"
            )));
        }

        self.objects
            .lock()
            .map_err(|e| ObjectStoreError::S3PutError(e.to_string()))?
            .insert(
                key.to_string(),
                StoredObject {
                    body,
                    encryption: encryption.clone(),
                },
            );

        Ok(())
    }

    async fn get(&self, key: &str) -> ObjectStoreResult<Vec<u8>> {
        self.body(key)
    }

    async fn select(&self, key: &str, filter: &SelectFilter) -> ObjectStoreResult<Vec<u8>> {
        // Same validation the S3 gateway applies before sending the query
        filter.to_sql()?;

        let body = self.body(key)?;
        let document: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| ObjectStoreError::S3SelectError(e.to_string()))?;

        if filter.matches(&document) {
            Ok(format!("{document}\n").into_bytes())
        } else {
            Ok(Vec::new())
        }
    }
}

/// Index store backed by ordered maps, one per partition
#[derive(Debug, Default)]
pub struct InMemoryIndexStore {
    partitions: Mutex<HashMap<String, BTreeMap<String, IndexEntry>>>,
    fail_all: AtomicBool,
}

impl InMemoryIndexStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles failure injection for every operation
    pub fn set_fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    /// Every stored entry, ordered by partition then sort key
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned
    #[must_use]
    pub fn entries(&self) -> Vec<IndexEntry> {
        let partitions = self.partitions.lock().unwrap();
        let mut keys: Vec<_> = partitions.keys().collect();
        keys.sort();
        let entries = keys
            .into_iter()
            .flat_map(|pk| partitions[pk].values().cloned())
            .collect();
        entries
    }

    fn check_available(&self) -> IndexStoreResult<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(IndexStoreError::Unavailable(
                "injected index store failure".to_string(),
            ));
        }
        Ok(())
    }

    fn lock(
        &self,
    ) -> IndexStoreResult<std::sync::MutexGuard<'_, HashMap<String, BTreeMap<String, IndexEntry>>>>
    {
        self.partitions
            .lock()
            .map_err(|e| IndexStoreError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl IndexStore for InMemoryIndexStore {
    async fn put(&self, entry: &IndexEntry) -> IndexStoreResult<()> {
        self.check_available()?;

        self.lock()?
            .entry(entry.partition_key.clone())
            .or_default()
            .insert(entry.sort_key.clone(), entry.clone());

        Ok(())
    }

    async fn get(&self, key: &IndexKey) -> IndexStoreResult<Option<IndexEntry>> {
        self.check_available()?;

        Ok(self
            .lock()?
            .get(&key.partition_key)
            .and_then(|partition| partition.get(&key.sort_key))
            .cloned())
    }

    async fn query(&self, query: &IndexQuery) -> IndexStoreResult<Vec<IndexEntry>> {
        self.check_available()?;

        let partitions = self.lock()?;
        let Some(partition) = partitions.get(&query.partition_key) else {
            return Ok(Vec::new());
        };

        let limit = query
            .limit
            .and_then(|limit| usize::try_from(limit).ok())
            .unwrap_or(usize::MAX);

        let entries = partition.values().cloned();
        let entries: Vec<IndexEntry> = match query.order {
            SortOrder::Ascending => entries.take(limit).collect(),
            SortOrder::Descending => entries.rev().take(limit).collect(),
        };

        Ok(entries)
    }
}
