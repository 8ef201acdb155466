//! Error types for index store operations

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::{
    get_item::GetItemError, put_item::PutItemError, query::QueryError,
};
use thiserror::Error;

/// Result type for index store operations
pub type IndexStoreResult<T> = Result<T, IndexStoreError>;

/// Errors that can occur during index store operations
#[derive(Error, Debug)]
pub enum IndexStoreError {
    /// Failed to put index entry into Dynamo DB
    #[error("Failed to put index entry into DynamoDB: {0}")]
    DynamoDbPutError(#[from] SdkError<PutItemError>),

    /// Failed to get index entry from Dynamo DB
    #[error("Failed to get index entry from DynamoDB: {0}")]
    DynamoDbGetError(#[from] SdkError<GetItemError>),

    /// Failed to query index entries from Dynamo DB
    #[error("Failed to query index entries from DynamoDB: {0}")]
    DynamoDbQueryError(#[from] SdkError<QueryError>),

    /// Serialization error for `serde_dynamo`
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Index store could not serve the request
    #[error("Index store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message() {
        let error = IndexStoreError::Unavailable("connection reset".to_string());
        assert_eq!(error.to_string(), "Index store unavailable: connection reset");
    }
}
