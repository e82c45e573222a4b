//! Secret accessibility probing.
//!
//! A probe only answers whether a secret can be read. The secret value is
//! dropped as soon as the call returns and never reaches a response.

use async_trait::async_trait;
use aws_sdk_secretsmanager::error::ProvideErrorMetadata;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Reason reported when a failure carries no service error code
pub const UNKNOWN_REASON: &str = "Unknown";

/// A failed probe, with the service error code when one was returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeFailure {
    pub code: Option<String>,
}

impl ProbeFailure {
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
        }
    }

    pub fn unknown() -> Self {
        Self { code: None }
    }

    pub fn reason(&self) -> &str {
        self.code.as_deref().unwrap_or(UNKNOWN_REASON)
    }
}

/// Checks whether a single secret is accessible
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretProbe: Send + Sync {
    async fn probe(&self, secret_id: &str) -> Result<(), ProbeFailure>;
}

/// Probe backed by Secrets Manager `GetSecretValue`
#[derive(Clone)]
pub struct SecretsManagerProbe {
    client: aws_sdk_secretsmanager::Client,
}

impl SecretsManagerProbe {
    pub fn new(client: aws_sdk_secretsmanager::Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient AWS configuration (region, credentials)
    pub async fn from_env() -> Self {
        let sdk_config = aws_config::load_from_env().await;
        Self::new(aws_sdk_secretsmanager::Client::new(&sdk_config))
    }
}

#[async_trait]
impl SecretProbe for SecretsManagerProbe {
    async fn probe(&self, secret_id: &str) -> Result<(), ProbeFailure> {
        match self.client.get_secret_value().secret_id(secret_id).send().await {
            Ok(_) => Ok(()),
            Err(err) => Err(match err.code() {
                Some(code) => ProbeFailure::with_code(code),
                None => ProbeFailure::unknown(),
            }),
        }
    }
}

/// Outcome of probing every configured secret
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    /// Accessible identifiers, in the order they were probed
    pub accessible: Vec<String>,

    /// Inaccessible identifiers mapped to their failure reason
    pub failed: BTreeMap<String, String>,
}

/// Probe each identifier once, in order. A failure never stops the remaining probes.
pub async fn probe_all<P>(probe: &P, secret_ids: &[String]) -> ProbeReport
where
    P: SecretProbe + ?Sized,
{
    let mut report = ProbeReport::default();
    let mut seen = HashSet::new();

    for secret_id in secret_ids {
        if !seen.insert(secret_id.as_str()) {
            continue;
        }

        match probe.probe(secret_id).await {
            Ok(()) => {
                debug!(secret_id = %secret_id, "Secret accessible");
                report.accessible.push(secret_id.clone());
            }
            Err(failure) => {
                warn!(secret_id = %secret_id, reason = failure.reason(), "Secret not accessible");
                report
                    .failed
                    .insert(secret_id.clone(), failure.reason().to_string());
            }
        }
    }

    report
}
