// Not every helper is used in every test, so we allow dead code
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use todo_api::{
    todo::{FixedClock, Todo, TodoService, UuidGenerator},
    types::ReadMode,
};
use todo_storage::{
    memory::{InMemoryIndexStore, InMemoryObjectStore},
    Encryption,
};

pub const TEST_KMS_KEY: &str = "arn:aws:kms:us-east-1:000000000000:key/test";

/// Setup test environment with tracing enabled
pub fn setup_test_env() {
    dotenvy::from_path(".env.example").ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();
}

/// Instant every test clock is frozen at
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// Todo service wired to in-memory stores
pub struct TestSetup {
    pub service: TodoService,
    pub object_store: Arc<InMemoryObjectStore>,
    pub index_store: Arc<InMemoryIndexStore>,
}

impl TestSetup {
    pub fn new() -> Self {
        Self::with_read_mode(ReadMode::Select)
    }

    pub fn with_read_mode(read_mode: ReadMode) -> Self {
        Self::with_stores(
            Arc::new(InMemoryObjectStore::new()),
            Arc::new(InMemoryIndexStore::new()),
            read_mode,
        )
    }

    pub fn with_stores(
        object_store: Arc<InMemoryObjectStore>,
        index_store: Arc<InMemoryIndexStore>,
        read_mode: ReadMode,
    ) -> Self {
        setup_test_env();

        let service = TodoService::new(
            object_store.clone(),
            index_store.clone(),
            Arc::new(UuidGenerator),
            Arc::new(FixedClock::new(test_now())),
            Encryption::kms(TEST_KMS_KEY),
            read_mode,
        );

        Self {
            service,
            object_store,
            index_store,
        }
    }
}

/// Builds a todo from a JSON object literal
pub fn todo(value: serde_json::Value) -> Todo {
    match value {
        serde_json::Value::Object(fields) => Todo::from(fields),
        other => panic!("test payload must be an object, got {other}"),
    }
}
