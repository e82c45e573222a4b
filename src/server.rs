//! Local HTTP emulation of the API Gateway integration.
//!
//! Every incoming request, whatever its path, is turned into an API Gateway
//! proxy event and answered by the same [`RequestGate`] the Lambda uses.

use crate::error::{AppError, AppResult};
use crate::events::{ApiGatewayRequest, ApiGatewayResponse};
use crate::gate::RequestGate;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Method};
use axum::response::Response;
use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Create the emulation router
pub fn create_router(gate: Arc<RequestGate>) -> Router {
    Router::new()
        .fallback(handle_request)
        .layer(TraceLayer::new_for_http())
        .with_state(gate)
}

async fn handle_request(
    State(gate): State<Arc<RequestGate>>,
    method: Method,
    headers: HeaderMap,
) -> AppResult<Response> {
    let event = to_event(&method, &headers);
    let response = gate.handle(&event).await;
    into_http_response(response)
}

/// Build an API Gateway event from HTTP request parts.
///
/// Repeated headers are folded into one comma-separated value, as API
/// Gateway does for its single-value `headers` map.
pub fn to_event(method: &Method, headers: &HeaderMap) -> ApiGatewayRequest {
    let mut folded: HashMap<String, String> = HashMap::new();
    for name in headers.keys() {
        let values: Vec<&str> = headers
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        if !values.is_empty() {
            folded.insert(name.as_str().to_string(), values.join(","));
        }
    }

    ApiGatewayRequest {
        http_method: Some(method.as_str().to_string()),
        headers: Some(folded),
        request_context: None,
    }
}

/// Convert an API Gateway response into an HTTP response
pub fn into_http_response(response: ApiGatewayResponse) -> AppResult<Response> {
    let mut builder = axum::http::Response::builder().status(response.status_code);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if !response.body.is_empty() {
        builder = builder.header(axum::http::header::CONTENT_TYPE, "application/json");
    }

    builder
        .body(Body::from(response.body))
        .map_err(|e| AppError::Internal(format!("Invalid gateway response: {}", e)))
}

/// Run the emulation server until Ctrl+C or SIGTERM
pub async fn run_server(gate: RequestGate, addr: String) -> AppResult<()> {
    let app = create_router(Arc::new(gate));

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to address {}: {}", addr, e)))?;

    info!("Local API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(create_shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves when Ctrl+C (or SIGTERM on Unix) is received.
async fn create_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    ctrl_c.await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_to_event_copies_parts() {
        let mut headers = HeaderMap::new();
        headers.insert("origin", "https://good.com".parse().unwrap());

        let event = to_event(&Method::OPTIONS, &headers);

        assert_eq!(event.method(), "OPTIONS");
        assert_eq!(event.origin(), Some("https://good.com"));
    }

    #[test]
    fn test_to_event_joins_repeated_headers() {
        let mut headers = HeaderMap::new();
        headers.append("accept", "text/html".parse().unwrap());
        headers.append("accept", "application/json".parse().unwrap());
        headers.insert("origin", "https://good.com".parse().unwrap());

        let event = to_event(&Method::GET, &headers);

        assert_eq!(event.header("Accept"), Some("text/html,application/json"));
        assert_eq!(event.origin(), Some("https://good.com"));
    }

    #[test]
    fn test_into_http_response_empty_body() {
        let mut headers = BTreeMap::new();
        headers.insert("Access-Control-Allow-Methods".to_string(), "GET".to_string());

        let response = into_http_response(ApiGatewayResponse::new(204, headers, String::new())).unwrap();

        assert_eq!(response.status().as_u16(), 204);
        assert_eq!(response.headers()["access-control-allow-methods"], "GET");
        assert!(response.headers().get("content-type").is_none());
    }

    #[test]
    fn test_into_http_response_invalid_header() {
        let mut headers = BTreeMap::new();
        headers.insert("Bad Header".to_string(), "x".to_string());

        let result = into_http_response(ApiGatewayResponse::new(200, headers, "{}".to_string()));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
