//! Invocation records exchanged with the Lambda service.
//!
//! Only the fields the handlers read are modelled; anything else in the
//! incoming JSON is ignored.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// API Gateway proxy request (REST v1, with the HTTP API v2 method location as fallback)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    /// Header names arrive in whatever case the client used; may be `null`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_context: Option<RequestContext>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpContext>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl ApiGatewayRequest {
    /// Build a request from a method and header pairs
    pub fn new<I, K, V>(method: &str, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            http_method: Some(method.to_string()),
            headers: Some(
                headers
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            request_context: None,
        }
    }

    /// Upper-cased request method, `GET` when the event carries none
    pub fn method(&self) -> String {
        self.http_method
            .as_deref()
            .or_else(|| {
                self.request_context
                    .as_ref()
                    .and_then(|ctx| ctx.http.as_ref())
                    .and_then(|http| http.method.as_deref())
            })
            .unwrap_or("GET")
            .to_ascii_uppercase()
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.as_ref().and_then(|headers| {
            headers
                .get(name)
                .or_else(|| {
                    headers
                        .iter()
                        .find(|(k, _)| k.eq_ignore_ascii_case(name))
                        .map(|(_, v)| v)
                })
                .map(String::as_str)
        })
    }

    pub fn origin(&self) -> Option<&str> {
        self.header("origin")
    }
}

/// API Gateway proxy response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ApiGatewayResponse {
    pub fn new(status_code: u16, headers: BTreeMap<String, String>, body: String) -> Self {
        Self {
            status_code,
            headers,
            body,
        }
    }
}

/// EventBridge notification for an object uploaded to S3
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadNotification {
    #[serde(default)]
    pub detail: Option<UploadDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadDetail {
    #[serde(default)]
    pub bucket: Option<BucketRef>,
    #[serde(default)]
    pub object: Option<ObjectRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BucketRef {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectRef {
    #[serde(default)]
    pub key: Option<ObjectKey>,
}

/// The object key field, which sources emit either as a string or a list
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ObjectKey {
    Single(String),
    /// List elements are checked one by one; non-strings do not poison the rest
    Many(Vec<serde_json::Value>),
    /// Any other JSON shape; carries no usable keys
    Other(serde_json::Value),
}

/// Object keys split into usable strings and list elements of another type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectKeys {
    pub valid: Vec<String>,
    pub invalid: Vec<serde_json::Value>,
}

impl ObjectKey {
    pub fn into_keys(self) -> ObjectKeys {
        match self {
            ObjectKey::Single(key) => ObjectKeys {
                valid: vec![key],
                invalid: Vec::new(),
            },
            ObjectKey::Many(items) => {
                let mut keys = ObjectKeys::default();
                for item in items {
                    match item {
                        serde_json::Value::String(key) => keys.valid.push(key),
                        other => keys.invalid.push(other),
                    }
                }
                keys
            }
            ObjectKey::Other(_) => ObjectKeys::default(),
        }
    }
}

impl UploadNotification {
    /// Bucket name, if present and non-empty
    pub fn bucket(&self) -> Option<&str> {
        self.detail
            .as_ref()
            .and_then(|detail| detail.bucket.as_ref())
            .and_then(|bucket| bucket.name.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// Uploaded object keys, normalized to a list
    pub fn object_keys(&self) -> ObjectKeys {
        self.detail
            .as_ref()
            .and_then(|detail| detail.object.as_ref())
            .and_then(|object| object.key.clone())
            .map(ObjectKey::into_keys)
            .unwrap_or_default()
    }

    /// Uploaded object keys that are strings
    pub fn keys(&self) -> Vec<String> {
        self.object_keys().valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_is_upper_cased() {
        let request = ApiGatewayRequest::new("options", Vec::<(String, String)>::new());
        assert_eq!(request.method(), "OPTIONS");
    }

    #[test]
    fn test_method_defaults_to_get() {
        let request: ApiGatewayRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request.method(), "GET");
    }

    #[test]
    fn test_method_from_http_api_context() {
        let request: ApiGatewayRequest = serde_json::from_value(json!({
            "requestContext": {"http": {"method": "post"}}
        }))
        .unwrap();
        assert_eq!(request.method(), "POST");
    }

    #[test]
    fn test_origin_lookup_ignores_case() {
        let request = ApiGatewayRequest::new("GET", [("Origin", "https://good.com")]);
        assert_eq!(request.origin(), Some("https://good.com"));

        let request = ApiGatewayRequest::new("GET", [("ORIGIN", "https://good.com")]);
        assert_eq!(request.origin(), Some("https://good.com"));
    }

    #[test]
    fn test_full_proxy_event_parses() {
        let request: ApiGatewayRequest = serde_json::from_value(json!({
            "resource": "/{proxy+}",
            "path": "/hello",
            "httpMethod": "GET",
            "headers": {"Origin": "https://good.com"},
            "queryStringParameters": {"x": "1"},
            "body": null,
            "isBase64Encoded": false
        }))
        .unwrap();
        assert_eq!(request.method(), "GET");
        assert_eq!(request.origin(), Some("https://good.com"));
    }

    #[test]
    fn test_null_headers() {
        let request: ApiGatewayRequest =
            serde_json::from_value(json!({"httpMethod": "GET", "headers": null})).unwrap();
        assert!(request.origin().is_none());
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let response = ApiGatewayResponse::new(204, BTreeMap::new(), String::new());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["statusCode"], 204);
        assert_eq!(value["body"], "");
        assert!(value["headers"].is_object());
    }

    #[test]
    fn test_single_key() {
        let event: UploadNotification = serde_json::from_value(json!({
            "detail": {"bucket": {"name": "artifacts"}, "object": {"key": "build/app.zip"}}
        }))
        .unwrap();
        assert_eq!(event.bucket(), Some("artifacts"));
        assert_eq!(event.keys(), vec!["build/app.zip"]);
    }

    #[test]
    fn test_key_list() {
        let event: UploadNotification = serde_json::from_value(json!({
            "detail": {"bucket": {"name": "artifacts"}, "object": {"key": ["a.zip", "b.zip"]}}
        }))
        .unwrap();
        assert_eq!(event.keys(), vec!["a.zip", "b.zip"]);
    }

    #[test]
    fn test_key_list_with_non_strings() {
        let event: UploadNotification = serde_json::from_value(json!({
            "detail": {"bucket": {"name": "b"}, "object": {"key": ["good.zip", 5, null, "next.zip"]}}
        }))
        .unwrap();

        let keys = event.object_keys();
        assert_eq!(keys.valid, vec!["good.zip", "next.zip"]);
        assert_eq!(keys.invalid, vec![json!(5), json!(null)]);
        assert_eq!(event.keys(), vec!["good.zip", "next.zip"]);
    }

    #[test]
    fn test_unexpected_key_shape() {
        let event: UploadNotification = serde_json::from_value(json!({
            "detail": {"bucket": {"name": "artifacts"}, "object": {"key": 17}}
        }))
        .unwrap();
        assert!(event.keys().is_empty());
    }

    #[test]
    fn test_empty_event() {
        let event: UploadNotification = serde_json::from_value(json!({})).unwrap();
        assert!(event.bucket().is_none());
        assert!(event.keys().is_empty());
    }

    #[test]
    fn test_empty_bucket_name() {
        let event: UploadNotification = serde_json::from_value(json!({
            "detail": {"bucket": {"name": ""}, "object": {"key": "a.zip"}}
        }))
        .unwrap();
        assert!(event.bucket().is_none());
    }
}
