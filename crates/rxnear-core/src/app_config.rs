use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub pharmacies_path: PathBuf,
    pub medicines_path: PathBuf,
    /// Radius applied when a request omits one, in kilometers.
    pub default_radius_km: f64,
    /// Ceiling for request radii; larger values are clamped, not rejected.
    pub max_radius_km: f64,
    /// Hard cap on returned results regardless of `max_results`.
    pub max_results_cap: usize,
    pub cache_ttl_secs: u64,
    /// Base URL of the routing table service; unset disables enrichment.
    pub routing_base_url: Option<String>,
    pub routing_timeout_secs: u64,
    pub routing_max_retries: u32,
    pub routing_backoff_base_secs: u64,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
}
