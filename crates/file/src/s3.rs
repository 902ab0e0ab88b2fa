//! S3 client construction and single-object download

use crate::error::{FileError, Result};
use crate::localize::ObjectFetcher;
use crate::S3Location;
use async_trait::async_trait;
use aws_config::retry::{RetryConfig, RetryMode};
use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::{Credentials, SharedCredentialsProvider};
use std::path::Path;

/// Session label used for assumed roles unless the caller overrides it.
pub const DEFAULT_SESSION_NAME: &str = "s3-localize";

/// Default number of attempts forwarded to the SDK retry policy.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Settings forwarded to the AWS SDK when a session is constructed
///
/// Credentials resolve in this order: `role_arn` (assume-role, replacing any
/// static triple), then the static key triple, then `profile_name`, then the
/// SDK's default provider chain. The retry policy is forwarded unchanged.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Named credential profile
    pub profile_name: Option<String>,
    /// Static access key id
    pub access_key_id: Option<String>,
    /// Static secret access key
    pub secret_access_key: Option<String>,
    /// Session token accompanying the static key pair
    pub session_token: Option<String>,
    /// Target region
    pub region: Option<String>,
    /// Role to assume; when set, the static triple is ignored
    pub role_arn: Option<String>,
    /// Label for the assumed-role session
    pub session_name: String,
    /// Retry mode for failed requests
    pub retry_mode: RetryMode,
    /// Maximum number of attempts for failed requests
    pub max_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            profile_name: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            region: None,
            role_arn: None,
            session_name: DEFAULT_SESSION_NAME.to_string(),
            retry_mode: RetryMode::Standard,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// S3 client owning one SDK session
pub struct S3Client {
    client: aws_sdk_s3::Client,
}

impl S3Client {
    /// Build an SDK session from the config and wrap an S3 client around it
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let retry = RetryConfig::standard()
            .with_retry_mode(config.retry_mode)
            .with_max_attempts(config.max_attempts);

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).retry_config(retry);
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &config.profile_name {
            loader = loader.profile_name(profile);
        }
        if config.role_arn.is_none() {
            if let (Some(id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
                loader = loader.credentials_provider(Credentials::new(
                    id,
                    secret,
                    config.session_token.clone(),
                    None,
                    "static",
                ));
            }
        }

        let mut sdk_config = loader.load().await;

        if let Some(role_arn) = &config.role_arn {
            // The base config supplies the credentials and region for the
            // STS call itself.
            let provider = AssumeRoleProvider::builder(role_arn.clone())
                .session_name(config.session_name.clone())
                .configure(&sdk_config)
                .build()
                .await;
            sdk_config = sdk_config
                .to_builder()
                .credentials_provider(SharedCredentialsProvider::new(provider))
                .build();
            tracing::debug!(role_arn = %role_arn, session_name = %config.session_name, "assuming role");
        }

        Ok(Self {
            client: aws_sdk_s3::Client::new(&sdk_config),
        })
    }
}

#[async_trait]
impl ObjectFetcher for S3Client {
    /// Download the full object into `dest`, overwriting its contents
    async fn fetch(&self, location: &S3Location, dest: &Path) -> Result<()> {
        let response = self
            .client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await
            .map_err(|e| FileError::DownloadFailed {
                location: location.uri(),
                source: Box::new(e),
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| FileError::DownloadFailed {
                location: location.uri(),
                source: Box::new(e),
            })?;

        let bytes = data.into_bytes();
        tokio::fs::write(dest, &bytes).await?;

        tracing::debug!(
            uri = %location.uri(),
            size_bytes = bytes.len(),
            dest = %dest.display(),
            "downloaded S3 object"
        );

        Ok(())
    }
}
