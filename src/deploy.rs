//! Redeploy a function when a new code artifact lands in S3.

use crate::config::DeployerConfig;
use crate::error::{AppError, AppResult};
use crate::events::{ObjectKeys, UploadNotification};
use async_trait::async_trait;
use aws_sdk_lambda::error::DisplayErrorContext;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Failure reason for list elements that cannot name an S3 object
pub const NOT_A_STRING_KEY: &str = "Object key is not a string";

/// Replaces a function's code with an S3 artifact
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeDeployer: Send + Sync {
    async fn update_function_code(&self, function: &str, bucket: &str, key: &str) -> AppResult<()>;
}

/// Deployer backed by Lambda `UpdateFunctionCode`
#[derive(Clone)]
pub struct LambdaCodeDeployer {
    client: aws_sdk_lambda::Client,
}

impl LambdaCodeDeployer {
    pub fn new(client: aws_sdk_lambda::Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient AWS configuration (region, credentials)
    pub async fn from_env() -> Self {
        let sdk_config = aws_config::load_from_env().await;
        Self::new(aws_sdk_lambda::Client::new(&sdk_config))
    }
}

#[async_trait]
impl CodeDeployer for LambdaCodeDeployer {
    async fn update_function_code(&self, function: &str, bucket: &str, key: &str) -> AppResult<()> {
        self.client
            .update_function_code()
            .function_name(function)
            .s3_bucket(bucket)
            .s3_key(key)
            .publish(true)
            .send()
            .await
            .map_err(|e| AppError::Upstream(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}

/// What happened to each artifact key in one notification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeploymentReport {
    pub updated: Vec<String>,
    pub failed: BTreeMap<String, String>,
}

/// Handles upload notifications by redeploying the target function
#[derive(Clone)]
pub struct Redeployer {
    config: DeployerConfig,
    deployer: Arc<dyn CodeDeployer>,
}

impl Redeployer {
    pub fn new(config: DeployerConfig, deployer: Arc<dyn CodeDeployer>) -> Self {
        Self { config, deployer }
    }

    /// Keys to deploy for this notification
    fn keys_for(&self, event: &UploadNotification) -> ObjectKeys {
        match &self.config.fixed_artifact_key {
            Some(key) => ObjectKeys {
                valid: vec![key.clone()],
                invalid: Vec::new(),
            },
            None => event.object_keys(),
        }
    }

    /// Handle one upload notification
    pub async fn handle(&self, event: &UploadNotification) -> DeploymentReport {
        debug!(?event, "Received upload notification");

        let mut report = DeploymentReport::default();
        let ObjectKeys { valid, invalid } = self.keys_for(event);

        let bucket = match event.bucket() {
            Some(bucket) if !valid.is_empty() || !invalid.is_empty() => bucket,
            _ => {
                info!("No bucket or keys found in event detail; nothing to do");
                return report;
            }
        };

        for value in invalid {
            let key = value.to_string();
            warn!(bucket = %bucket, key = %key, "Skipping object key that is not a string");
            report.failed.insert(key, NOT_A_STRING_KEY.to_string());
        }

        let target = self.config.target_function.as_str();

        for key in valid {
            match self.deployer.update_function_code(target, bucket, &key).await {
                Ok(()) => {
                    info!(target = %target, bucket = %bucket, key = %key, "Updated function code");
                    report.updated.push(key);
                }
                Err(e) => {
                    error!(target = %target, bucket = %bucket, key = %key, error = %e, "Failed to update function code");
                    report.failed.insert(key, e.to_string());
                }
            }
        }

        report
    }
}
