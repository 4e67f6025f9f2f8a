//! API Configuration Module
//!
//! Bind address, CORS and read cache settings for the HTTP server. Values
//! are loaded from environment variables with defaults suited to local
//! development.

use std::net::SocketAddr;
use std::time::Duration;

use roster_storage::{CacheConfig, DEFAULT_ENTRY_TTL};

use crate::error::{ApiError, ApiResult};

pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

// ============================================================================
// API CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // Server
    // ========================================================================
    pub bind_host: String,
    pub port: u16,

    /// Run the load pipeline once before serving.
    pub load_on_startup: bool,

    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins.
    pub cors_origins: Vec<String>,

    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Read Cache
    // ========================================================================
    pub cache_ttl: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            load_on_startup: true,
            cors_origins: Vec::new(),
            cors_allow_credentials: false,
            cors_max_age_secs: 86400, // 24 hours
            cache_ttl: DEFAULT_ENTRY_TTL,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `ROSTER_API_BIND`: Bind host (default: 0.0.0.0)
    /// - `PORT` or `ROSTER_API_PORT`: Bind port (default: 3000)
    /// - `ROSTER_LOAD_ON_STARTUP`: "false" skips the boot-time load (default: true)
    /// - `ROSTER_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `ROSTER_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `ROSTER_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `ROSTER_CACHE_TTL_SECS`: Read cache entry lifetime (default: 60)
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_host = lookup("ROSTER_API_BIND")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.bind_host);

        let port = match lookup("PORT").or_else(|| lookup("ROSTER_API_PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", raw)))?,
            None => defaults.port,
        };

        let load_on_startup = lookup("ROSTER_LOAD_ON_STARTUP")
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(defaults.load_on_startup);

        let cors_origins = lookup("ROSTER_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_allow_credentials = lookup("ROSTER_CORS_ALLOW_CREDENTIALS")
            .map(|s| s.to_lowercase() == "true")
            .unwrap_or(defaults.cors_allow_credentials);

        let cors_max_age_secs = lookup("ROSTER_CORS_MAX_AGE_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.cors_max_age_secs);

        let cache_ttl = lookup("ROSTER_CACHE_TTL_SECS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_ttl);

        Ok(Self {
            bind_host,
            port,
            load_on_startup,
            cors_origins,
            cors_allow_credentials,
            cors_max_age_secs,
            cache_ttl,
        })
    }

    /// Resolve the socket address to listen on.
    pub fn bind_addr(&self) -> ApiResult<SocketAddr> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>().map_err(|e| {
            ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e))
        })
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new().with_ttl(self.cache_ttl)
    }

    /// Whether origins are restricted.
    pub fn is_production(&self) -> bool {
        !self.cors_origins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::from_lookup(lookup_from(&[])).expect("config should load");
        assert_eq!(config.bind_host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert!(config.load_on_startup);
        assert!(config.cors_origins.is_empty());
        assert!(!config.cors_allow_credentials);
        assert_eq!(config.cors_max_age_secs, 86400);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_port_prefers_port_over_api_port() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("ROSTER_API_PORT", "9090"),
        ]))
        .expect("config should load");
        assert_eq!(config.port, 8080);

        let config = ApiConfig::from_lookup(lookup_from(&[("ROSTER_API_PORT", "9090")]))
            .expect("config should load");
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = ApiConfig::from_lookup(lookup_from(&[("PORT", "http")]))
            .expect_err("port should be rejected");
        assert_eq!(err.code, crate::error::ErrorCode::InvalidInput);
        assert!(err.message.contains("http"));
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            ("ROSTER_API_BIND", "127.0.0.1"),
            ("ROSTER_LOAD_ON_STARTUP", "FALSE"),
            ("ROSTER_CORS_ORIGINS", "https://a.example, ,https://b.example"),
            ("ROSTER_CORS_ALLOW_CREDENTIALS", "true"),
            ("ROSTER_CACHE_TTL_SECS", "5"),
        ]))
        .expect("config should load");

        assert!(!config.load_on_startup);
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert!(config.is_production());
        assert!(config.cors_allow_credentials);
        assert_eq!(config.cache_config().entry_ttl, Duration::from_secs(5));
        assert_eq!(
            config.bind_addr().expect("addr should parse"),
            "127.0.0.1:3000".parse::<SocketAddr>().expect("literal addr")
        );
    }

    #[test]
    fn test_bad_bind_host() {
        let config = ApiConfig {
            bind_host: "not a host".to_string(),
            ..ApiConfig::default()
        };
        assert!(config.bind_addr().is_err());
    }
}
