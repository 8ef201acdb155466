//! S3-backed object store

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::{
    primitives::ByteStream,
    types::{
        ExpressionType, InputSerialization, JsonInput, JsonOutput, JsonType, OutputSerialization,
        SelectObjectContentEventStream, ServerSideEncryption,
    },
    Client as S3Client,
};
use tracing::debug;

use super::{Encryption, ObjectStore, ObjectStoreError, ObjectStoreResult, SelectFilter};

/// Object store client for S3 operations
pub struct S3ObjectStore {
    s3_client: Arc<S3Client>,
    bucket_name: String,
}

impl S3ObjectStore {
    /// Creates a new S3 object store
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - S3 bucket holding the todo records
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, bucket_name: String) -> Self {
        Self {
            s3_client,
            bucket_name,
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        encryption: &Encryption,
    ) -> ObjectStoreResult<()> {
        debug!(bucket = %self.bucket_name, key, "Putting object");

        let Encryption::Kms { key_id } = encryption;

        self.s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(body))
            .server_side_encryption(ServerSideEncryption::AwsKms)
            .ssekms_key_id(key_id)
            .send()
            .await?;

        Ok(())
    }

    async fn get(&self, key: &str) -> ObjectStoreResult<Vec<u8>> {
        debug!(bucket = %self.bucket_name, key, "Getting object");

        let response = self
            .s3_client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| ObjectStoreError::StreamError(e.to_string()))?
            .into_bytes();

        Ok(bytes.to_vec())
    }

    async fn select(&self, key: &str, filter: &SelectFilter) -> ObjectStoreResult<Vec<u8>> {
        let expression = filter.to_sql()?;
        debug!(bucket = %self.bucket_name, key, expression, "Selecting object content");

        let mut response = self
            .s3_client
            .select_object_content()
            .bucket(&self.bucket_name)
            .key(key)
            .expression_type(ExpressionType::Sql)
            .expression(expression)
            .input_serialization(
                InputSerialization::builder()
                    .json(JsonInput::builder().r#type(JsonType::Document).build())
                    .build(),
            )
            .output_serialization(
                OutputSerialization::builder()
                    .json(JsonOutput::builder().record_delimiter("\n").build())
                    .build(),
            )
            .send()
            .await?;

        let mut content = Vec::new();
        while let Some(event) = response
            .payload
            .recv()
            .await
            .map_err(|e| ObjectStoreError::StreamError(format!("{e:?}")))?
        {
            match event {
                SelectObjectContentEventStream::Records(records) => {
                    if let Some(payload) = records.payload() {
                        content.extend_from_slice(payload.as_ref());
                    }
                }
                SelectObjectContentEventStream::End(_) => break,
                _ => {}
            }
        }

        Ok(content)
    }
}
