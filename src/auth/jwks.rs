// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching.
//!
//! ## Behaviour
//!
//! - [`RemoteKeySet`] fetches `https://<domain>/.well-known/jwks.json` on
//!   every call; nothing is kept between requests
//! - Fetch, status and parse failures are returned as [`KeySetError`] and are
//!   never retried here
//! - [`CachedKeySet`] is an opt-in wrapper (`JWKS_CACHE_TTL_SECS`); a key
//!   rotated out of the authority's set stops verifying within one TTL

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use url::Url;

/// Path of the discovery document under the authority's domain.
const JWKS_PATH: &str = ".well-known/jwks.json";

/// Key-set infrastructure failure.
///
/// Not an authorization decision: without keys no decision can be made, so
/// the caller answers 500.
#[derive(Debug, thiserror::Error)]
pub enum KeySetError {
    #[error("invalid trust authority domain: {0}")]
    InvalidDomain(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("failed to fetch JWKS: {0}")]
    Fetch(reqwest::Error),

    #[error("HTTP {0} from JWKS endpoint")]
    Status(reqwest::StatusCode),

    #[error("failed to parse JWKS: {0}")]
    Parse(reqwest::Error),
}

/// One public signing key published by the trust authority.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SigningKey {
    #[serde(rename = "kid")]
    pub key_id: String,
    #[serde(rename = "kty")]
    pub key_type: String,
    #[serde(rename = "use", default)]
    pub usage: String,
    #[serde(rename = "n", default)]
    pub modulus: String,
    #[serde(rename = "e", default)]
    pub exponent: String,
}

/// The authority's current keys, in published order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct KeySet {
    pub keys: Vec<SigningKey>,
}

impl KeySet {
    pub fn new(keys: Vec<SigningKey>) -> Self {
        Self { keys }
    }

    /// First key whose id equals `kid` exactly.
    pub fn find(&self, kid: &str) -> Option<&SigningKey> {
        self.keys.iter().find(|key| key.key_id == kid)
    }
}

/// Source of the signing keys used to verify tokens.
#[async_trait]
pub trait KeySetProvider: Send + Sync {
    async fn key_set(&self) -> Result<KeySet, KeySetError>;
}

/// Build the discovery URL for a trust authority domain.
pub fn jwks_url_for_domain(domain: &str) -> Result<Url, KeySetError> {
    let base = Url::parse(&format!("https://{domain}/"))?;
    Ok(base.join(JWKS_PATH)?)
}

/// Fetches the key set over HTTPS on every call.
#[derive(Clone)]
pub struct RemoteKeySet {
    /// JWKS URL
    jwks_url: Url,
    /// HTTP client
    client: reqwest::Client,
}

impl RemoteKeySet {
    /// Provider for `https://<domain>/.well-known/jwks.json`.
    pub fn for_domain(domain: &str, timeout: Duration) -> Result<Self, KeySetError> {
        Self::from_url(jwks_url_for_domain(domain)?, timeout)
    }

    /// Provider for an explicit JWKS URL.
    pub fn from_url(jwks_url: Url, timeout: Duration) -> Result<Self, KeySetError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(KeySetError::Client)?;
        Ok(Self { jwks_url, client })
    }

    /// Get the JWKS URL.
    pub fn jwks_url(&self) -> &Url {
        &self.jwks_url
    }
}

#[async_trait]
impl KeySetProvider for RemoteKeySet {
    async fn key_set(&self) -> Result<KeySet, KeySetError> {
        let response = self
            .client
            .get(self.jwks_url.clone())
            .send()
            .await
            .map_err(KeySetError::Fetch)?;

        if !response.status().is_success() {
            return Err(KeySetError::Status(response.status()));
        }

        let key_set: KeySet = response.json().await.map_err(KeySetError::Parse)?;
        tracing::debug!(url = %self.jwks_url, keys = key_set.keys.len(), "Fetched JWKS");
        Ok(key_set)
    }
}

/// Cache entry.
struct CacheEntry {
    key_set: KeySet,
    fetched_at: Instant,
}

/// Time-bounded cache in front of another provider.
#[derive(Clone)]
pub struct CachedKeySet {
    inner: Arc<dyn KeySetProvider>,
    ttl: Duration,
    cache: Arc<RwLock<Option<CacheEntry>>>,
}

impl CachedKeySet {
    pub fn new(inner: Arc<dyn KeySetProvider>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cache: Arc::new(RwLock::new(None)),
        }
    }
}

#[async_trait]
impl KeySetProvider for CachedKeySet {
    async fn key_set(&self) -> Result<KeySet, KeySetError> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = &*cache {
                if entry.fetched_at.elapsed() < self.ttl {
                    return Ok(entry.key_set.clone());
                }
            }
        }

        // A failed refresh leaves the stale entry in place but unused.
        let key_set = self.inner.key_set().await?;

        let mut cache = self.cache.write().await;
        *cache = Some(CacheEntry {
            key_set: key_set.clone(),
            fetched_at: Instant::now(),
        });

        Ok(key_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{routing::get, Json, Router};

    fn sample_key(kid: &str) -> SigningKey {
        SigningKey {
            key_id: kid.to_string(),
            key_type: "RSA".to_string(),
            usage: "sig".to_string(),
            modulus: "AQAB".to_string(),
            exponent: "AQAB".to_string(),
        }
    }

    struct CountingProvider {
        count: AtomicUsize,
    }

    #[async_trait]
    impl KeySetProvider for CountingProvider {
        async fn key_set(&self) -> Result<KeySet, KeySetError> {
            self.count.fetch_add(1, Ordering::SeqCst);
            Ok(KeySet::new(vec![sample_key("k1")]))
        }
    }

    async fn serve(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/{JWKS_PATH}")).unwrap()
    }

    #[test]
    fn jwks_url_uses_well_known_path() {
        let url = jwks_url_for_domain("example.auth0.com").unwrap();
        assert_eq!(url.as_str(), "https://example.auth0.com/.well-known/jwks.json");
    }

    #[test]
    fn jwks_url_rejects_garbage_domain() {
        assert!(matches!(
            jwks_url_for_domain("exa mple.com"),
            Err(KeySetError::InvalidDomain(_))
        ));
    }

    #[test]
    fn find_returns_first_exact_match() {
        let mut second = sample_key("k1");
        second.usage = "enc".to_string();
        let keys = KeySet::new(vec![sample_key("k0"), sample_key("k1"), second]);

        assert_eq!(keys.find("k1").unwrap().usage, "sig");
        assert!(keys.find("K1").is_none());
        assert!(keys.find("").is_none());
    }

    #[test]
    fn parses_auth0_document_ignoring_extra_fields() {
        let doc = r#"{"keys":[{"alg":"RS256","kty":"RSA","use":"sig","n":"abc","e":"AQAB",
            "kid":"key-1","x5t":"t","x5c":["c"]}]}"#;
        let keys: KeySet = serde_json::from_str(doc).unwrap();
        assert_eq!(keys.keys.len(), 1);
        assert_eq!(keys.keys[0].key_id, "key-1");
        assert_eq!(keys.keys[0].modulus, "abc");
        assert_eq!(keys.keys[0].exponent, "AQAB");
    }

    #[tokio::test]
    async fn remote_key_set_fetches_document() {
        let router = Router::new().route(
            &format!("/{JWKS_PATH}"),
            get(|| async {
                Json(serde_json::json!({
                    "keys": [{"kty": "RSA", "kid": "k1", "use": "sig", "n": "abc", "e": "AQAB"}]
                }))
            }),
        );
        let url = serve(router).await;

        let provider = RemoteKeySet::from_url(url, Duration::from_secs(5)).unwrap();
        let keys = provider.key_set().await.unwrap();
        assert_eq!(keys.keys.len(), 1);
        assert_eq!(keys.find("k1").unwrap().key_type, "RSA");
    }

    #[tokio::test]
    async fn remote_key_set_reports_http_status() {
        let url = serve(Router::new()).await;

        let provider = RemoteKeySet::from_url(url, Duration::from_secs(5)).unwrap();
        let err = provider.key_set().await.unwrap_err();
        assert!(matches!(err, KeySetError::Status(s) if s == reqwest::StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn remote_key_set_reports_unparseable_body() {
        let router = Router::new().route(&format!("/{JWKS_PATH}"), get(|| async { "not json" }));
        let url = serve(router).await;

        let provider = RemoteKeySet::from_url(url, Duration::from_secs(5)).unwrap();
        assert!(matches!(
            provider.key_set().await,
            Err(KeySetError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn remote_key_set_reports_network_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{addr}/{JWKS_PATH}")).unwrap();
        let provider = RemoteKeySet::from_url(url, Duration::from_secs(5)).unwrap();
        assert!(matches!(
            provider.key_set().await,
            Err(KeySetError::Fetch(_))
        ));
    }

    #[tokio::test]
    async fn cache_serves_within_ttl() {
        let inner = Arc::new(CountingProvider {
            count: AtomicUsize::new(0),
        });
        let cached = CachedKeySet::new(inner.clone(), Duration::from_secs(300));

        cached.key_set().await.unwrap();
        cached.key_set().await.unwrap();

        assert_eq!(inner.count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_ttl_always_refetches() {
        let inner = Arc::new(CountingProvider {
            count: AtomicUsize::new(0),
        });
        let cached = CachedKeySet::new(inner.clone(), Duration::ZERO);

        cached.key_set().await.unwrap();
        cached.key_set().await.unwrap();

        assert_eq!(inner.count.load(Ordering::SeqCst), 2);
    }
}
