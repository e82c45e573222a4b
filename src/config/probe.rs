/// Secret probing configuration
#[derive(Debug, Clone, Default)]
pub struct ProbeConfig {
    /// Secret identifiers (ARNs or names) checked on every API invocation
    pub secret_ids: Vec<String>,
}
