//! Error types for object store operations

use aws_sdk_s3::{
    error::SdkError,
    operation::{
        get_object::GetObjectError, put_object::PutObjectError,
        select_object_content::SelectObjectContentError,
    },
};
use thiserror::Error;

/// Result type for object store operations
pub type ObjectStoreResult<T> = Result<T, ObjectStoreError>;

/// Errors that can occur during object store operations
#[derive(Error, Debug)]
pub enum ObjectStoreError {
    /// Failed to put object into S3
    #[error("Failed to put object into S3: {0}")]
    S3PutError(String),

    /// Failed to get object from S3
    #[error("Failed to get object from S3: {0}")]
    S3GetError(String),

    /// Failed to select object content from S3
    #[error("Failed to select object content from S3: {0}")]
    S3SelectError(String),

    /// Failed to read the response body or event stream
    #[error("Failed to read object content: {0}")]
    StreamError(String),

    /// Object does not exist
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<SdkError<PutObjectError>> for ObjectStoreError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        Self::S3PutError(format!("{error:?}"))
    }
}

impl From<SdkError<GetObjectError>> for ObjectStoreError {
    fn from(error: SdkError<GetObjectError>) -> Self {
        match error {
            SdkError::ServiceError(err) if err.err().is_no_such_key() => {
                Self::ObjectNotFound(format!("{:?}", err.err()))
            }
            _ => Self::S3GetError(format!("{error:?}")),
        }
    }
}

impl From<SdkError<SelectObjectContentError>> for ObjectStoreError {
    fn from(error: SdkError<SelectObjectContentError>) -> Self {
        Self::S3SelectError(format!("{error:?}"))
    }
}
