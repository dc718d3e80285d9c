//! Authenticated HTTP client for the BriefLens backend.
//!
//! All substantive computation (ingestion, retrieval, summarization, alert
//! detection) lives in the backend; this client issues bearer-authenticated
//! JSON requests against it and memoizes read-mostly GETs through an
//! injected [`RequestCache`]. Mutations invalidate the key families they
//! are known to stale.
//!
//! The cache lock is never held across a network await, so two concurrent
//! misses for the same key both hit the backend (documented stampede — the
//! GETs are idempotent and the window is one request's latency).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::cache::RequestCache;
use crate::config::ClientConfig;
use crate::error::{BriefLensError, Result};

use super::types::{Alert, ChatAnswer, Connector, Summary};

// ── Auth ─────────────────────────────────────────────────────────────────────

/// Supplies the bearer token attached to every backend request.
///
/// The embedding application implements this against its auth session
/// provider; token refresh and OAuth handshakes stay on that side of the
/// seam.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a currently valid bearer token.
    async fn bearer_token(&self) -> Result<String>;
}

/// A fixed token, for tests and single-tenant deployments.
pub struct StaticToken(pub String);

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken([REDACTED])")
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn bearer_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

// ── Client ───────────────────────────────────────────────────────────────────

/// Thin client for the backend HTTP API.
pub struct BackendClient {
    config: ClientConfig,
    base: Url,
    client: Client,
    tokens: Arc<dyn TokenProvider>,
    cache: Mutex<RequestCache<Value>>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base", &self.base.as_str())
            .finish()
    }
}

impl BackendClient {
    /// Build a client from config and a token provider.
    ///
    /// The cache instance is owned by the client — one per client, created
    /// here and cleared on [`BackendClient::clear_cache`] (logout). There is
    /// no process-global cache.
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let base = Url::parse(&config.base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build HTTP client");
        Ok(Self {
            config,
            base,
            client,
            tokens,
            cache: Mutex::new(RequestCache::new()),
        })
    }

    // ── Raw requests ─────────────────────────────────────────────────────────

    /// Resolve `path` against the configured base URL.
    fn api_url(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.api_url(path)?;
        let token = self.tokens.bearer_token().await?;
        Ok(self
            .client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", token)))
    }

    async fn send_json(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| BriefLensError::Decode(e.to_string()));
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "backend request failed");
        Err(api_error(status.as_u16(), &body))
    }

    /// Authenticated GET returning the decoded JSON body.
    pub async fn get_json(&self, path: &str) -> Result<Value> {
        debug!(path, "GET");
        let request = self.request(Method::GET, path).await?;
        self.send_json(request).await
    }

    /// Authenticated POST of a JSON body, returning the decoded response.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        debug!(path, "POST");
        let request = self.request(Method::POST, path).await?.json(body);
        self.send_json(request).await
    }

    /// Authenticated DELETE; the response body is discarded.
    pub async fn delete(&self, path: &str) -> Result<()> {
        debug!(path, "DELETE");
        let request = self.request(Method::DELETE, path).await?;
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(api_error(status.as_u16(), &body))
    }

    // ── Cached GETs ──────────────────────────────────────────────────────────

    /// GET `path`, memoized under `key` for the configured cache TTL.
    ///
    /// With caching disabled in config this is a plain [`get_json`]. The
    /// cache lock is released before the network await; see the module docs
    /// for the resulting stampede behavior.
    pub async fn cached_get(&self, key: &str, path: &str) -> Result<Value> {
        if !self.config.cache.enabled {
            return self.get_json(path).await;
        }
        if let Some(value) = self.cache.lock().await.get(key) {
            debug!(key, "cache hit");
            return Ok(value);
        }
        let value = self.get_json(path).await?;
        let ttl = Duration::from_secs(self.config.cache.ttl_secs);
        self.cache.lock().await.set(key, value.clone(), ttl);
        Ok(value)
    }

    /// Remove one cached key.
    pub async fn invalidate(&self, key: &str) {
        self.cache.lock().await.invalidate(key);
    }

    /// Remove every cached key matching `pattern`.
    pub async fn invalidate_pattern(&self, pattern: &Regex) -> usize {
        self.cache.lock().await.invalidate_pattern(pattern)
    }

    /// Drop all cached responses. Called on logout.
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    // ── Domain operations ────────────────────────────────────────────────────

    /// Ask the conversational search endpoint a question. Never cached —
    /// answers are generated per query.
    pub async fn ask(&self, question: &str) -> Result<ChatAnswer> {
        let body = json!({ "question": question });
        let value = self.post_json("/chat/query", &body).await?;
        decode(value)
    }

    /// Current alerts, cached.
    pub async fn alerts(&self) -> Result<Vec<Alert>> {
        let value = self.cached_get("alerts", "/alerts").await?;
        decode(value)
    }

    /// Latest per-stream summaries, cached.
    pub async fn summaries(&self) -> Result<Vec<Summary>> {
        let value = self.cached_get("summaries", "/summaries").await?;
        decode(value)
    }

    /// Linked connectors, cached.
    pub async fn connectors(&self) -> Result<Vec<Connector>> {
        let value = self.cached_get("connectors", "/connectors").await?;
        decode(value)
    }

    /// Unlink a connector, then drop its cached key family (`<id>-...`)
    /// along with the connector list itself.
    pub async fn disconnect_connector(&self, id: &str) -> Result<()> {
        self.delete(&format!("/connectors/{}", id)).await?;
        let pattern =
            Regex::new(&format!("^{}-", regex::escape(id))).expect("escaped id is a valid regex");
        let mut cache = self.cache.lock().await;
        cache.invalidate_pattern(&pattern);
        cache.invalidate("connectors");
        Ok(())
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Map a non-success response to [`BriefLensError::Api`], preferring the
/// backend's `error.message` field when the body parses as JSON.
fn api_error(status: u16, body: &str) -> BriefLensError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string());
    BriefLensError::Api { status, message }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| BriefLensError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> BackendClient {
        let config = ClientConfig {
            base_url: "https://api.brieflens.test".to_string(),
            ..ClientConfig::default()
        };
        BackendClient::new(config, Arc::new(StaticToken("tok".into()))).unwrap()
    }

    #[test]
    fn test_api_url_joins_path_onto_base() {
        let client = test_client();
        let url = client.api_url("/chat/query").unwrap();
        assert_eq!(url.as_str(), "https://api.brieflens.test/chat/query");
    }

    #[test]
    fn test_api_url_tolerates_missing_leading_slash() {
        let client = test_client();
        let url = client.api_url("alerts").unwrap();
        assert_eq!(url.as_str(), "https://api.brieflens.test/alerts");
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let config = ClientConfig {
            base_url: "not a url".to_string(),
            ..ClientConfig::default()
        };
        let result = BackendClient::new(config, Arc::new(StaticToken("tok".into())));
        assert!(matches!(result, Err(BriefLensError::Url(_))));
    }

    #[test]
    fn test_api_error_extracts_backend_message() {
        let body = r#"{"error": {"message": "connector not linked"}}"#;
        let err = api_error(404, body);
        match err {
            BriefLensError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "connector not linked");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        let err = api_error(502, "upstream timeout");
        match err {
            BriefLensError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream timeout");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_static_token_debug_is_redacted() {
        let token = StaticToken("super-secret".into());
        assert!(!format!("{:?}", token).contains("super-secret"));
    }

    #[tokio::test]
    async fn test_static_token_returns_its_value() {
        let token = StaticToken("tok-123".into());
        assert_eq!(token.bearer_token().await.unwrap(), "tok-123");
    }

    #[tokio::test]
    async fn test_cache_invalidation_helpers() {
        let client = test_client();
        {
            let mut cache = client.cache.lock().await;
            cache.set("quickbooks-invoices-p1", json!(1), Duration::from_secs(60));
            cache.set("quickbooks-invoices-p2", json!(2), Duration::from_secs(60));
            cache.set("gmail-threads-p1", json!(3), Duration::from_secs(60));
        }
        let re = Regex::new("^quickbooks-").unwrap();
        assert_eq!(client.invalidate_pattern(&re).await, 2);
        client.invalidate("gmail-threads-p1").await;
        assert!(client.cache.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_cache_empties_everything() {
        let client = test_client();
        client
            .cache
            .lock()
            .await
            .set("alerts", json!([]), Duration::from_secs(60));
        client.clear_cache().await;
        assert!(client.cache.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_cached_get_serves_warm_entry_without_network() {
        // Pre-seed the cache; a hit must return without touching the (fake)
        // backend host, which would otherwise fail to resolve.
        let client = test_client();
        client
            .cache
            .lock()
            .await
            .set("alerts", json!([{"cached": true}]), Duration::from_secs(60));
        let value = client.cached_get("alerts", "/alerts").await.unwrap();
        assert_eq!(value, json!([{"cached": true}]));
    }

    #[test]
    fn test_decode_reports_shape_mismatch() {
        let result: Result<Vec<Alert>> = decode(json!({"not": "a list"}));
        assert!(matches!(result, Err(BriefLensError::Decode(_))));
    }
}
