/// CORS allow-list configuration
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Whether origin validation, preflight handling and CORS headers apply
    pub enabled: bool,

    /// Origins allowed to call the API (empty means any origin)
    pub allowed_origins: Vec<String>,

    /// Methods advertised in `Access-Control-Allow-Methods`
    pub allowed_methods: Vec<String>,

    /// Headers advertised in `Access-Control-Allow-Headers`
    pub allowed_headers: Vec<String>,
}

impl CorsConfig {
    /// Allow-list configuration with CORS enforcement turned on
    pub fn new(
        allowed_origins: Vec<String>,
        allowed_methods: Vec<String>,
        allowed_headers: Vec<String>,
    ) -> Self {
        Self {
            enabled: true,
            allowed_origins,
            allowed_methods,
            allowed_headers,
        }
    }

    /// Configuration that skips CORS entirely
    pub fn disabled() -> Self {
        Self::default()
    }
}
