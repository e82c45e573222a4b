//! Lambda runtime wiring and local one-shot invocation.

use crate::config::{Config, DeployerConfig};
use crate::deploy::{LambdaCodeDeployer, Redeployer};
use crate::error::{AppError, AppResult};
use crate::events::{ApiGatewayRequest, UploadNotification};
use crate::gate::RequestGate;
use crate::probe::SecretsManagerProbe;
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};

/// Which handler a process serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HandlerKind {
    Api,
    Deployer,
}

impl FromStr for HandlerKind {
    type Err = AppError;

    /// Accepts `api`, `deployer`, or a dotted handler string ending in either
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.rsplit('.').next().unwrap_or(s).trim().to_ascii_lowercase();
        match name.as_str() {
            "api" => Ok(HandlerKind::Api),
            "deployer" => Ok(HandlerKind::Deployer),
            _ => Err(AppError::Configuration(format!("Unknown handler: {}", s))),
        }
    }
}

/// API gate backed by Secrets Manager
pub async fn api_gate(config: Config) -> RequestGate {
    let probe = SecretsManagerProbe::from_env().await;
    RequestGate::new(config.cors, config.probe, Arc::new(probe))
}

/// Redeployer backed by the Lambda API
pub async fn redeployer(config: DeployerConfig) -> Redeployer {
    let deployer = LambdaCodeDeployer::from_env().await;
    Redeployer::new(config, Arc::new(deployer))
}

/// Serve API invocations until the runtime shuts down
pub async fn run_api(gate: RequestGate) -> AppResult<()> {
    info!("Starting API handler");
    let gate = Arc::new(gate);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<ApiGatewayRequest>| {
        let gate = Arc::clone(&gate);
        async move {
            let span = info_span!("api", request_id = %event.context.request_id);
            let response = gate.handle(&event.payload).instrument(span).await;
            Ok::<_, lambda_runtime::Error>(response)
        }
    }))
    .await
    .map_err(|e| AppError::Runtime(e.to_string()))
}

/// Serve upload notifications until the runtime shuts down
pub async fn run_deployer(redeployer: Redeployer) -> AppResult<()> {
    info!("Starting deployer handler");
    let redeployer = Arc::new(redeployer);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<UploadNotification>| {
        let redeployer = Arc::clone(&redeployer);
        async move {
            let span = info_span!("deployer", request_id = %event.context.request_id);
            let report = redeployer.handle(&event.payload).instrument(span).await;
            Ok::<_, lambda_runtime::Error>(report)
        }
    }))
    .await
    .map_err(|e| AppError::Runtime(e.to_string()))
}

/// Read a JSON event from disk
pub fn read_event(path: &Path) -> AppResult<Value> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Run a single API event and return the response as JSON
pub async fn invoke_api(gate: &RequestGate, payload: Value) -> AppResult<Value> {
    let request: ApiGatewayRequest = serde_json::from_value(payload)?;
    let response = gate.handle(&request).await;
    Ok(serde_json::to_value(response)?)
}

/// Run a single upload notification and return the report as JSON
pub async fn invoke_deployer(redeployer: &Redeployer, payload: Value) -> AppResult<Value> {
    let event: UploadNotification = serde_json::from_value(payload)?;
    let report = redeployer.handle(&event).await;
    Ok(serde_json::to_value(report)?)
}
