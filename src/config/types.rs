use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::storage::default_storage_path;

pub const DEVELOPMENT_API_BASE: &str = "http://192.168.1.126:8000";
pub const PRODUCTION_API_BASE: &str = "https://api.streams.app";

/// Transport default, used for login and other direct calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Deadline applied by the generic request helper.
pub const DEFAULT_HELPER_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn default_api_base(self) -> &'static str {
        match self {
            Environment::Development => DEVELOPMENT_API_BASE,
            Environment::Production => PRODUCTION_API_BASE,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Some(Environment::Development),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }
}

/// On-disk configuration file (`streams.json` / `streams.jsonc`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default)]
    pub environment: Option<Environment>,
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub storage_path: Option<String>,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeoutConfig {
    #[serde(default)]
    pub request_ms: Option<u64>,
    #[serde(default)]
    pub helper_ms: Option<u64>,
    #[serde(default)]
    pub refresh_ms: Option<u64>,
}

/// Resolved settings an [`ApiClient`](crate::client::ApiClient) is built from.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin without the `/api` suffix and without a trailing slash.
    pub api_base: String,
    pub request_timeout: Duration,
    pub helper_timeout: Duration,
    pub refresh_timeout: Duration,
    pub storage_path: PathBuf,
}

impl ClientConfig {
    pub fn new(api_base: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            helper_timeout: DEFAULT_HELPER_TIMEOUT,
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
            storage_path: default_storage_path(),
        }
    }

    pub fn for_environment(environment: Environment) -> Self {
        Self::new(environment.default_api_base())
    }

    /// `{api_base}/api`
    pub fn api_url(&self) -> String {
        format!("{}/api", self.api_base)
    }

    /// `{api_base}/api/auth/`
    pub fn auth_url(&self) -> String {
        format!("{}/api/auth/", self.api_base)
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_helper_timeout(mut self, timeout: Duration) -> Self {
        self.helper_timeout = timeout;
        self
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_client_timeouts() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.api_base, DEVELOPMENT_API_BASE);
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.helper_timeout, Duration::from_secs(60));
        assert_eq!(cfg.refresh_timeout, Duration::from_secs(10));
    }

    #[test]
    fn api_and_auth_urls() {
        let cfg = ClientConfig::new("https://example.com/");
        assert_eq!(cfg.api_base, "https://example.com");
        assert_eq!(cfg.api_url(), "https://example.com/api");
        assert_eq!(cfg.auth_url(), "https://example.com/api/auth/");
    }

    #[test]
    fn environment_parsing() {
        assert_eq!(Environment::parse("production"), Some(Environment::Production));
        assert_eq!(Environment::parse(" Prod "), Some(Environment::Production));
        assert_eq!(Environment::parse("dev"), Some(Environment::Development));
        assert_eq!(Environment::parse("staging"), None);
    }

    #[test]
    fn deserialize_full_config_file() {
        let json = r#"{
            "environment": "production",
            "apiBase": "https://streams.example.org",
            "storagePath": "/tmp/streams.json",
            "timeouts": {"requestMs": 1000, "helperMs": 2000, "refreshMs": 500}
        }"#;
        let cfg: ConfigFile = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.environment, Some(Environment::Production));
        assert_eq!(cfg.api_base.as_deref(), Some("https://streams.example.org"));
        assert_eq!(cfg.timeouts.helper_ms, Some(2000));
    }

    #[test]
    fn deserialize_minimal_config_file() {
        let cfg: ConfigFile = serde_json::from_str("{}").unwrap();
        assert!(cfg.environment.is_none());
        assert!(cfg.api_base.is_none());
        assert!(cfg.timeouts.request_ms.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{"apiBase": "http://localhost:8000", "cloudinary": {"cloudName": "x"}}"#;
        let cfg: ConfigFile = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.api_base.as_deref(), Some("http://localhost:8000"));
    }
}
