//! Gateway tests against LocalStack
//!
//! Start LocalStack on `localhost:4566` and run `cargo test -- --ignored`.

use std::sync::Arc;
use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType,
    ScalarAttributeType, TimeToLiveSpecification,
};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_s3::Client as S3Client;
use chrono::Utc;
use pretty_assertions::assert_eq;
use todo_storage::{
    DynamoIndexStore, Encryption, IndexAttribute, IndexEntry, IndexQuery, IndexStore,
    ObjectStore, ObjectStoreError, S3ObjectStore, SelectFilter, SortOrder,
};
use uuid::Uuid;

/// Test configuration for LocalStack
const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";
const TEST_REGION: &str = "us-east-1";

async fn localstack_config() -> aws_config::SdkConfig {
    let credentials = Credentials::from_keys("test", "test", None);
    aws_config::defaults(BehaviorVersion::latest())
        .endpoint_url(LOCALSTACK_ENDPOINT)
        .region(Region::new(TEST_REGION))
        .credentials_provider(credentials)
        .load()
        .await
}

/// Test context that cleans up the index table on drop
struct IndexContext {
    store: DynamoIndexStore,
    table_name: String,
    dynamodb_client: Arc<DynamoDbClient>,
}

impl Drop for IndexContext {
    fn drop(&mut self) {
        let client = self.dynamodb_client.clone();
        let table = self.table_name.clone();

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let _ = client.delete_table().table_name(&table).send().await;
            });
        }
    }
}

async fn setup_index() -> IndexContext {
    let table_name = format!("test-todo-index-{}", Uuid::new_v4());
    let dynamodb_client = Arc::new(DynamoDbClient::new(&localstack_config().await));

    dynamodb_client
        .create_table()
        .table_name(&table_name)
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(IndexAttribute::PartitionKey.to_string())
                .attribute_type(ScalarAttributeType::S)
                .build()
                .unwrap(),
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(IndexAttribute::SortKey.to_string())
                .attribute_type(ScalarAttributeType::S)
                .build()
                .unwrap(),
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(IndexAttribute::PartitionKey.to_string())
                .key_type(KeyType::Hash)
                .build()
                .unwrap(),
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(IndexAttribute::SortKey.to_string())
                .key_type(KeyType::Range)
                .build()
                .unwrap(),
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .expect("Failed to create test table");

    dynamodb_client
        .update_time_to_live()
        .table_name(&table_name)
        .time_to_live_specification(
            TimeToLiveSpecification::builder()
                .enabled(true)
                .attribute_name(IndexAttribute::Ttl.to_string())
                .build()
                .unwrap(),
        )
        .send()
        .await
        .expect("Failed to enable TTL");

    tokio::time::sleep(Duration::from_millis(100)).await;

    IndexContext {
        store: DynamoIndexStore::new(dynamodb_client.clone(), table_name.clone()),
        table_name,
        dynamodb_client,
    }
}

async fn setup_bucket() -> S3ObjectStore {
    let bucket_name = format!("test-todos-{}", Uuid::new_v4());
    let config = localstack_config().await;
    let s3_config = aws_sdk_s3::config::Builder::from(&config)
        .force_path_style(true)
        .build();
    let s3_client = Arc::new(S3Client::from_conf(s3_config));

    s3_client
        .create_bucket()
        .bucket(&bucket_name)
        .send()
        .await
        .expect("Failed to create test bucket");

    S3ObjectStore::new(s3_client, bucket_name)
}

#[tokio::test]
#[ignore = "requires LocalStack on localhost:4566"]
async fn test_index_put_query_and_get() {
    let context = setup_index().await;
    let id = Uuid::new_v4().to_string();
    let entry = IndexEntry::new(&id, format!("todos/{id}.json"), Utc::now());

    context.store.put(&entry).await.expect("Failed to put entry");

    let found = context
        .store
        .query(&IndexQuery::first(
            IndexEntry::partition_key_for(&id),
            SortOrder::Ascending,
        ))
        .await
        .expect("Failed to query entries");
    assert_eq!(found, vec![entry.clone()]);

    let fetched = context
        .store
        .get(&entry.key())
        .await
        .expect("Failed to get entry");
    assert_eq!(fetched, Some(entry));
}

#[tokio::test]
#[ignore = "requires LocalStack on localhost:4566"]
async fn test_index_query_unknown_partition_is_empty() {
    let context = setup_index().await;

    let found = context
        .store
        .query(&IndexQuery::first(
            IndexEntry::partition_key_for("nonexistent-id"),
            SortOrder::Ascending,
        ))
        .await
        .expect("Failed to query entries");

    assert!(found.is_empty());
}

#[tokio::test]
#[ignore = "requires LocalStack on localhost:4566"]
async fn test_index_entry_without_storage_key_reads_back_as_none() {
    let context = setup_index().await;

    context
        .dynamodb_client
        .put_item()
        .table_name(&context.table_name)
        .item("PK", AttributeValue::S("TODO#manual".to_string()))
        .item("SK", AttributeValue::S("2024-01-01T12:00:00.000Z".to_string()))
        .item("Id", AttributeValue::S("manual".to_string()))
        .item("Type", AttributeValue::S("Todo".to_string()))
        .item(
            "CreatedAt",
            AttributeValue::S("2024-01-01T12:00:00.000Z".to_string()),
        )
        .item("TTL", AttributeValue::N("4102444800".to_string()))
        .send()
        .await
        .expect("Failed to put raw item");

    let found = context
        .store
        .query(&IndexQuery::first(
            IndexEntry::partition_key_for("manual"),
            SortOrder::Ascending,
        ))
        .await
        .expect("Failed to query entries");

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].storage_key, None);
}

#[tokio::test]
#[ignore = "requires LocalStack on localhost:4566"]
async fn test_object_put_get_and_select() {
    let store = setup_bucket().await;
    let body = br#"{"id":"abc","text":"buy milk"}"#.to_vec();

    store
        .put("todos/abc.json", body.clone(), &Encryption::kms("alias/aws/s3"))
        .await
        .expect("Failed to put object");

    let fetched = store.get("todos/abc.json").await.expect("Failed to get object");
    assert_eq!(fetched, body);

    let selected = store
        .select("todos/abc.json", &SelectFilter::field_equals("id", "abc"))
        .await
        .expect("Failed to select object content");
    let record: serde_json::Value = serde_json::from_slice(&selected).unwrap();
    assert_eq!(record["text"], "buy milk");
}

#[tokio::test]
#[ignore = "requires LocalStack on localhost:4566"]
async fn test_object_get_missing_key() {
    let store = setup_bucket().await;

    let result = store.get("todos/missing.json").await;

    assert!(matches!(result, Err(ObjectStoreError::ObjectNotFound(_))));
}
