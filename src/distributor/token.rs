//! OAuth client-credentials token cache for the distributor API.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::wire::value_as_i64;
use crate::error::{CatalogError, CatalogResult};

/// Lifetime assumed when the token response omits `expires_in`.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_399;

#[async_trait::async_trait]
pub trait TokenSource: Send + Sync {
    /// A bearer token valid right now.
    async fn token(&self) -> CatalogResult<String>;

    /// Drop the cached token so the next call performs a fresh exchange.
    async fn invalidate(&self);
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Number or numeric string, depending on the gateway.
    #[serde(default)]
    expires_in: serde_json::Value,
}

impl TokenResponse {
    fn ttl_secs(&self) -> u64 {
        value_as_i64(&self.expires_in)
            .and_then(|secs| u64::try_from(secs).ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS)
    }
}

/// Expiry instant for a token issued at `now`; falls back to the default
/// lifetime when `ttl` would overflow the clock.
fn expiry(now: Instant, ttl: u64) -> Instant {
    now.checked_add(Duration::from_secs(ttl))
        .or_else(|| now.checked_add(Duration::from_secs(DEFAULT_TOKEN_TTL_SECS)))
        .unwrap_or(now)
}

/// Caches one token per process. Concurrent refreshes are serialized by the
/// mutex, so at most one exchange is in flight.
pub struct TokenManager {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    cached: Arc<Mutex<Option<CachedToken>>>,
}

impl TokenManager {
    pub fn new(http: Client, token_url: &str, client_id: &str, client_secret: &str) -> Self {
        Self {
            http,
            token_url: token_url.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            cached: Arc::new(Mutex::new(None)),
        }
    }

    async fn exchange(&self) -> CatalogResult<CachedToken> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| CatalogError::Auth(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Auth(format!(
                "token endpoint returned {status}: {text}"
            )));
        }
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Auth(format!("malformed token response: {e}")))?;

        let ttl = body.ttl_secs();
        info!(target = "distributor.token", ttl_secs = ttl, "obtained access token");
        Ok(CachedToken {
            access_token: body.access_token,
            expires_at: expiry(Instant::now(), ttl),
        })
    }
}

#[async_trait::async_trait]
impl TokenSource for TokenManager {
    async fn token(&self) -> CatalogResult<String> {
        let mut guard = self.cached.lock().await;
        if let Some(token) = guard.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.access_token.clone());
            }
            debug!(target = "distributor.token", "cached token expired");
        }
        let fresh = self.exchange().await?;
        let access = fresh.access_token.clone();
        *guard = Some(fresh);
        Ok(access)
    }

    async fn invalidate(&self) {
        let mut guard = self.cached.lock().await;
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpResponse, HttpServer};
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn spawn_token_server(
        hits: Arc<AtomicUsize>,
        status: u16,
        body: serde_json::Value,
    ) -> String {
        let server = HttpServer::new(move || {
            let hits = hits.clone();
            let body = body.clone();
            App::new().route(
                "/oauth/oauth20/token",
                web::post().to(move || {
                    let hits = hits.clone();
                    let body = body.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        HttpResponse::build(
                            actix_web::http::StatusCode::from_u16(status)
                                .unwrap_or(actix_web::http::StatusCode::OK),
                        )
                        .json(body)
                    }
                }),
            )
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("bind");
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{addr}/oauth/oauth20/token")
    }

    #[actix_web::test]
    async fn token_is_cached_until_invalidated() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = spawn_token_server(
            hits.clone(),
            200,
            serde_json::json!({"access_token": "tok-1", "expires_in": 3600}),
        )
        .await;
        let mgr = TokenManager::new(Client::new(), &url, "id", "secret");

        assert_eq!(mgr.token().await.expect("token"), "tok-1");
        assert_eq!(mgr.token().await.expect("token"), "tok-1");
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        mgr.invalidate().await;
        assert_eq!(mgr.token().await.expect("token"), "tok-1");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[actix_web::test]
    async fn missing_expiry_uses_default_ttl() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = spawn_token_server(
            hits.clone(),
            200,
            serde_json::json!({"access_token": "tok-2"}),
        )
        .await;
        let mgr = TokenManager::new(Client::new(), &url, "id", "secret");
        mgr.token().await.expect("token");
        let guard = mgr.cached.lock().await;
        let cached = guard.as_ref().expect("cached");
        let remaining = cached.expires_at.saturating_duration_since(Instant::now());
        assert!(remaining > Duration::from_secs(DEFAULT_TOKEN_TTL_SECS - 60));
    }

    #[actix_web::test]
    async fn string_expiry_is_accepted() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = spawn_token_server(
            hits.clone(),
            200,
            serde_json::json!({"access_token": "tok-3", "token_type": "Bearer", "expires_in": "600"}),
        )
        .await;
        let mgr = TokenManager::new(Client::new(), &url, "id", "secret");
        assert_eq!(mgr.token().await.expect("token"), "tok-3");
        let guard = mgr.cached.lock().await;
        let remaining = guard
            .as_ref()
            .expect("cached")
            .expires_at
            .saturating_duration_since(Instant::now());
        assert!(remaining <= Duration::from_secs(600));
        assert!(remaining > Duration::from_secs(540));
    }

    #[test]
    fn unparseable_or_huge_expiry_is_tolerated() {
        let parse = |v: serde_json::Value| {
            serde_json::from_value::<TokenResponse>(serde_json::json!({"access_token": "t", "expires_in": v}))
                .expect("body")
                .ttl_secs()
        };
        assert_eq!(parse(serde_json::json!("soon")), DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(parse(serde_json::json!(-5)), DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(parse(serde_json::json!(null)), DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(parse(serde_json::json!(0)), DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(parse(serde_json::json!(" 3600 ")), 3600);

        let now = Instant::now();
        assert_eq!(
            expiry(now, u64::MAX),
            now + Duration::from_secs(DEFAULT_TOKEN_TTL_SECS)
        );
        assert_eq!(expiry(now, 60), now + Duration::from_secs(60));
    }

    #[actix_web::test]
    async fn rejected_exchange_is_an_auth_error() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = spawn_token_server(
            hits.clone(),
            401,
            serde_json::json!({"error": "invalid_client"}),
        )
        .await;
        let mgr = TokenManager::new(Client::new(), &url, "id", "bad");
        let err = mgr.token().await.expect_err("must fail");
        assert!(matches!(err, CatalogError::Auth(_)));
        assert!(err.is_fatal());
    }
}
