//! Client configuration types.

use serde::{Deserialize, Serialize};

/// Default backend request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default cache TTL in seconds for read-mostly GET responses.
const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// Top-level configuration for [`BackendClient`](crate::api::BackendClient).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backend API (e.g. `https://api.example.com`).
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Request cache settings.
    pub cache: CacheConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cache: CacheConfig::default(),
        }
    }
}

/// Request cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether cached GETs consult the cache at all.
    pub enabled: bool,
    /// Default TTL in seconds for entries stored by `cached_get`.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_defaults() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.base_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.timeout_secs, 30);
        assert!(cfg.cache.enabled);
        assert_eq!(cfg.cache.ttl_secs, 60);
    }

    #[test]
    fn test_client_config_deserialize_partial() {
        let json = r#"{"base_url": "https://api.brieflens.io"}"#;
        let cfg: ClientConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.base_url, "https://api.brieflens.io");
        assert_eq!(cfg.timeout_secs, 30); // default
        assert!(cfg.cache.enabled); // default
    }

    #[test]
    fn test_cache_config_deserialize_partial() {
        let json = r#"{"enabled": false}"#;
        let cfg: CacheConfig = serde_json::from_str(json).unwrap();
        assert!(!cfg.enabled);
        assert_eq!(cfg.ttl_secs, 60);
    }
}
