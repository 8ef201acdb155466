//! Environment configuration for different deployment stages

use std::env;
use std::str::FromStr;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};
use tracing::Level;

use super::ConfigError;

/// Application environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// Defaults to development when `APP_ENV` is not set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `APP_ENV` contains an unknown stage
    pub fn from_env() -> Result<Self, ConfigError> {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            _ => Err(ConfigError::InvalidValue {
                name: "APP_ENV",
                value: env,
            }),
        }
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development => Some("http://localhost:4566"),
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// AWS S3 service configuration derived from an already loaded `SdkConfig`
    #[must_use]
    pub fn s3_client_config(&self, aws_config: &aws_config::SdkConfig) -> aws_sdk_s3::Config {
        let s3_config: aws_sdk_s3::Config = aws_config.into();
        let mut builder = s3_config.to_builder();

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if matches!(self, Self::Development) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    /// Whether logs should be emitted as JSON
    #[must_use]
    pub const fn json_logs(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }

    /// Default log level, overridable with `TRACING_LEVEL`
    #[must_use]
    pub fn tracing_level(&self) -> Level {
        env::var("TRACING_LEVEL")
            .ok()
            .and_then(|val| val.parse::<Level>().ok())
            .unwrap_or(match self {
                Self::Production | Self::Staging => Level::INFO,
                Self::Development => Level::DEBUG,
            })
    }
}

/// How the service fetches a record from the object store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// S3 Select query filtered on the record id
    #[default]
    Select,
    /// Whole-object fetch
    Get,
}

impl FromStr for ReadMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "select" => Ok(Self::Select),
            "get" => Ok(Self::Get),
            other => Err(ConfigError::InvalidValue {
                name: "TODO_READ_MODE",
                value: other.to_string(),
            }),
        }
    }
}

/// Storage configuration required by the todo service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    /// S3 bucket holding the todo records (`S3_BUCKET`)
    pub bucket_name: String,
    /// Dynamo DB index table (`DYNAMODB_TABLE`)
    pub table_name: String,
    /// KMS key used for server-side encryption of records (`KMS_KEY`)
    pub kms_key_id: String,
    /// Object store read strategy (`TODO_READ_MODE`, defaults to select)
    pub read_mode: ReadMode,
}

impl TodoConfig {
    /// Loads the configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVariable` if a required variable is unset or empty
    /// Returns `ConfigError::InvalidValue` if `TODO_READ_MODE` is not `select` or `get`
    pub fn from_env() -> Result<Self, ConfigError> {
        let read_mode = match env::var("TODO_READ_MODE") {
            Ok(value) => value.parse()?,
            Err(_) => ReadMode::default(),
        };

        Ok(Self {
            bucket_name: required_var("S3_BUCKET")?,
            table_name: required_var("DYNAMODB_TABLE")?,
            kms_key_id: required_var("KMS_KEY")?,
            read_mode,
        })
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingVariable(name))
}
