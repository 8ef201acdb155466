//! Dynamo DB backed index store

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::{types::AttributeValue, Client as DynamoDbClient};
use tracing::debug;

use super::{
    IndexAttribute, IndexEntry, IndexKey, IndexQuery, IndexStore, IndexStoreError,
    IndexStoreResult, SortOrder,
};

/// Index store client for Dynamo DB operations
pub struct DynamoIndexStore {
    dynamodb_client: Arc<DynamoDbClient>,
    table_name: String,
}

impl DynamoIndexStore {
    /// Creates a new index store client
    ///
    /// # Arguments
    ///
    /// * `dynamodb_client` - Pre-configured Dynamo DB client
    /// * `table_name` - Dynamo DB table name with `PK`/`SK` keys and `TTL` expiry
    #[must_use]
    pub const fn new(dynamodb_client: Arc<DynamoDbClient>, table_name: String) -> Self {
        Self {
            dynamodb_client,
            table_name,
        }
    }
}

#[async_trait]
impl IndexStore for DynamoIndexStore {
    async fn put(&self, entry: &IndexEntry) -> IndexStoreResult<()> {
        debug!(table = %self.table_name, pk = %entry.partition_key, "Putting index entry");

        let item = serde_dynamo::to_item(entry)
            .map_err(|e| IndexStoreError::SerializationError(e.to_string()))?;

        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await?;

        Ok(())
    }

    async fn get(&self, key: &IndexKey) -> IndexStoreResult<Option<IndexEntry>> {
        debug!(table = %self.table_name, pk = %key.partition_key, "Getting index entry");

        let response = self
            .dynamodb_client
            .get_item()
            .table_name(&self.table_name)
            .key(
                IndexAttribute::PartitionKey.to_string(),
                AttributeValue::S(key.partition_key.clone()),
            )
            .key(
                IndexAttribute::SortKey.to_string(),
                AttributeValue::S(key.sort_key.clone()),
            )
            .send()
            .await?;

        let entry = response
            .item()
            .map(|item| serde_dynamo::from_item(item.clone()))
            .transpose()
            .map_err(|e| IndexStoreError::SerializationError(e.to_string()))?;

        Ok(entry)
    }

    async fn query(&self, query: &IndexQuery) -> IndexStoreResult<Vec<IndexEntry>> {
        debug!(
            table = %self.table_name,
            pk = %query.partition_key,
            limit = ?query.limit,
            order = ?query.order,
            "Querying index entries"
        );

        let response = self
            .dynamodb_client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("#pk = :pk")
            .expression_attribute_names("#pk", IndexAttribute::PartitionKey.to_string())
            .expression_attribute_values(":pk", AttributeValue::S(query.partition_key.clone()))
            .set_limit(query.limit)
            .scan_index_forward(matches!(query.order, SortOrder::Ascending))
            .send()
            .await?;

        let items = response.items.unwrap_or_default();
        serde_dynamo::from_items::<_, IndexEntry>(items)
            .map_err(|e| IndexStoreError::SerializationError(e.to_string()))
    }
}
