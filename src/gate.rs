//! CORS-aware request gate for the secrets API.
//!
//! Each invocation ends in exactly one of three outcomes: rejected (403),
//! answered as a preflight (204), or probed and answered (200).

use crate::config::{CorsConfig, ProbeConfig};
use crate::events::{ApiGatewayRequest, ApiGatewayResponse};
use crate::probe::{probe_all, SecretProbe};
use http::StatusCode;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{info, warn};

pub const GREETING: &str = "Hello from the serverless API!";
pub const ORIGIN_NOT_ALLOWED: &str = "Origin not allowed";

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";

const DEFAULT_METHOD: &str = "GET";
const DEFAULT_HEADER: &str = "Content-Type";

/// Result of checking the request origin against the allow-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginDecision {
    /// Proceed, echoing this origin (if any) in `Access-Control-Allow-Origin`
    Allowed(Option<String>),
    Rejected,
}

/// Validates origins, answers preflights and runs the secret probes
#[derive(Clone)]
pub struct RequestGate {
    cors: CorsConfig,
    secret_ids: Vec<String>,
    probe: Arc<dyn SecretProbe>,
}

impl RequestGate {
    pub fn new(cors: CorsConfig, probe_config: ProbeConfig, probe: Arc<dyn SecretProbe>) -> Self {
        Self {
            cors,
            secret_ids: probe_config.secret_ids,
            probe,
        }
    }

    /// Handle one API invocation
    pub async fn handle(&self, request: &ApiGatewayRequest) -> ApiGatewayResponse {
        let method = request.method();

        if !self.cors.enabled {
            return self.respond(&method, BTreeMap::new()).await;
        }

        let origin = match self.resolve_origin(request.origin()) {
            OriginDecision::Allowed(origin) => origin,
            OriginDecision::Rejected => {
                warn!(origin = ?request.origin(), method = %method, "Rejected request from disallowed origin");
                return ApiGatewayResponse::new(
                    StatusCode::FORBIDDEN.as_u16(),
                    self.cors_headers(None),
                    json!({ "message": ORIGIN_NOT_ALLOWED }).to_string(),
                );
            }
        };

        let headers = self.cors_headers(origin.as_deref());

        if method == "OPTIONS" {
            info!(origin = ?origin, "Answered preflight request");
            return ApiGatewayResponse::new(StatusCode::NO_CONTENT.as_u16(), headers, String::new());
        }

        self.respond(&method, headers).await
    }

    /// Decide whether the request origin may proceed
    pub fn resolve_origin(&self, origin: Option<&str>) -> OriginDecision {
        if self.cors.allowed_origins.is_empty() {
            return OriginDecision::Allowed(origin.map(str::to_string));
        }

        match origin {
            Some(origin) if self.cors.allowed_origins.iter().any(|o| o == origin) => {
                OriginDecision::Allowed(Some(origin.to_string()))
            }
            _ => OriginDecision::Rejected,
        }
    }

    /// CORS response headers, with the origin header only when one was resolved
    pub fn cors_headers(&self, origin: Option<&str>) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert(
            ALLOW_METHODS.to_string(),
            join_sorted(&self.cors.allowed_methods, DEFAULT_METHOD),
        );
        headers.insert(
            ALLOW_HEADERS.to_string(),
            join_sorted(&self.cors.allowed_headers, DEFAULT_HEADER),
        );
        if let Some(origin) = origin {
            headers.insert(ALLOW_ORIGIN.to_string(), origin.to_string());
        }
        headers
    }

    async fn respond(&self, method: &str, headers: BTreeMap<String, String>) -> ApiGatewayResponse {
        let report = probe_all(self.probe.as_ref(), &self.secret_ids).await;

        info!(
            method = %method,
            accessible = report.accessible.len(),
            failed = report.failed.len(),
            "Probed configured secrets"
        );

        let body = json!({
            "message": GREETING,
            "method": method,
            "secrets_accessible": report.accessible,
            "secrets_failed": report.failed,
        });

        ApiGatewayResponse::new(StatusCode::OK.as_u16(), headers, body.to_string())
    }
}

/// Comma-join the sorted, deduplicated values, or the default when there are none
fn join_sorted(values: &[String], default: &str) -> String {
    if values.is_empty() {
        return default.to_string();
    }

    values
        .iter()
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join(",")
}
