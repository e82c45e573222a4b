use crate::error::{AppError, AppResult};
use std::env;

/// Redeploy-on-upload configuration
#[derive(Debug, Clone)]
pub struct DeployerConfig {
    /// Function whose code is replaced (name or ARN)
    pub target_function: String,

    /// When set, this artifact key is deployed regardless of the uploaded key
    pub fixed_artifact_key: Option<String>,
}

impl DeployerConfig {
    /// Load deployer configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build deployer configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let target_function = lookup("TARGET_LAMBDA_ARN")
            .ok_or_else(|| AppError::MissingEnvVar("TARGET_LAMBDA_ARN".to_string()))?;
        let fixed_artifact_key = lookup("ARTIFACT_KEY").filter(|key| !key.trim().is_empty());

        let config = Self {
            target_function,
            fixed_artifact_key,
        };
        config.validate()?;

        Ok(config)
    }

    /// Validate deployer configuration values
    pub fn validate(&self) -> AppResult<()> {
        if self.target_function.trim().is_empty() {
            return Err(AppError::Configuration(
                "TARGET_LAMBDA_ARN must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
