//! Configuration loading tests.
//!
//! These build configuration from in-memory lookups rather than the process
//! environment.

use serverless_api::config::{parse_list, Config, DeployerConfig, ServerConfig};
use serverless_api::error::AppError;
use std::collections::HashMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

/// Allow-list parsing
mod list_tests {
    use super::*;

    #[test]
    fn test_allow_lists_keep_order() {
        let config = Config::from_lookup(lookup(&[
            ("ALLOWED_METHODS", r#"["POST", "GET", "POST"]"#),
        ]))
        .unwrap();

        assert_eq!(config.cors.allowed_methods, vec!["POST", "GET", "POST"]);
    }

    #[test]
    fn test_malformed_values_default_to_empty() {
        for raw in ["", "[", "null", "true", r#"{"origins": []}"#, "https://good.com"] {
            assert!(parse_list(Some(raw)).is_empty(), "{:?} should parse to empty", raw);
        }
    }

    #[test]
    fn test_secret_arns() {
        let config = Config::from_lookup(lookup(&[(
            "SECRET_ARNS",
            r#"["arn:aws:secretsmanager:us-east-1:123456789012:secret:db", "api-key"]"#,
        )]))
        .unwrap();

        assert_eq!(config.probe.secret_ids.len(), 2);
        assert_eq!(config.probe.secret_ids[1], "api-key");
    }
}

/// CORS switch and server settings
mod settings_tests {
    use super::*;

    #[test]
    fn test_cors_enabled_by_default() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.cors.enabled);
    }

    #[test]
    fn test_cors_can_be_disabled() {
        let config = Config::from_lookup(lookup(&[("CORS_ENABLED", "false")])).unwrap();
        assert!(!config.cors.enabled);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("SERVER_HOST", "0.0.0.0"),
            ("SERVER_PORT", "9000"),
        ]))
        .unwrap();

        assert_eq!(config.addr(), "0.0.0.0:9000");
    }

    #[test]
    fn test_bad_server_port_only_fails_server_config() {
        let vars = [("SERVER_PORT", "not_a_port"), ("ALLOWED_ORIGINS", r#"["https://good.com"]"#)];

        let api = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(api.cors.allowed_origins, vec!["https://good.com"]);

        let server = ServerConfig::from_lookup(lookup(&vars));
        assert!(matches!(server, Err(AppError::Configuration(_))));
    }
}

/// Deployer settings
mod deployer_tests {
    use super::*;

    #[test]
    fn test_target_required() {
        let result = DeployerConfig::from_lookup(lookup(&[("ARTIFACT_KEY", "lambda.zip")]));
        assert!(matches!(result, Err(AppError::MissingEnvVar(ref name)) if name == "TARGET_LAMBDA_ARN"));
    }

    #[test]
    fn test_uploaded_keys_by_default() {
        let config =
            DeployerConfig::from_lookup(lookup(&[("TARGET_LAMBDA_ARN", "api-function")])).unwrap();
        assert!(config.fixed_artifact_key.is_none());
    }
}
