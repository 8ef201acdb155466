//! Startup wiring shared by the Lambda binaries
//!
//! Configuration is resolved once here and passed down; nothing below this module reads
//! the process environment.

use std::sync::Arc;

use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_s3::Client as S3Client;
use todo_storage::{DynamoIndexStore, Encryption, S3ObjectStore};
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

use crate::todo::{SystemClock, TodoService, UuidGenerator};
use crate::types::{Environment, TodoConfig};

/// Installs the global tracing subscriber
///
/// JSON output for staging/production, plain output for development. `RUST_LOG` takes
/// precedence over the environment's default level.
pub fn init_tracing(environment: Environment) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(environment.tracing_level()).into())
        .from_env_lossy();

    if environment.json_logs() {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}

/// Builds the todo service backed by S3 and Dynamo DB
pub async fn todo_service(environment: Environment, config: &TodoConfig) -> TodoService {
    let aws_config = environment.aws_config().await;
    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config(&aws_config)));
    let dynamodb_client = Arc::new(DynamoDbClient::new(&aws_config));

    info!(
        bucket = %config.bucket_name,
        table = %config.table_name,
        read_mode = ?config.read_mode,
        "Initialized todo storage"
    );

    TodoService::new(
        Arc::new(S3ObjectStore::new(s3_client, config.bucket_name.clone())),
        Arc::new(DynamoIndexStore::new(dynamodb_client, config.table_name.clone())),
        Arc::new(UuidGenerator),
        Arc::new(SystemClock),
        Encryption::kms(config.kms_key_id.clone()),
        config.read_mode,
    )
}
