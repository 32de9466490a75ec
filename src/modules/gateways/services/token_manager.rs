use reqwest::{Client, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::config::Credentials;
use crate::core::{AppError, Result};

pub const TOKEN_PATH: &str = "/pl/standard/user/oauth/authorize";

/// A token is treated as expired this long before PayU's stated expiry
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(5);

/// Cached OAuth bearer token
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, issued_at: Instant, expires_in: Duration) -> Self {
        Self {
            value: value.into(),
            expires_at: issued_at + expires_in,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Expired once `now` reaches `expires_at - EXPIRY_MARGIN`
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now + EXPIRY_MARGIN >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenGrant {
    access_token: String,
    expires_in: u64,
}

/// Owns the `client_credentials` exchange and the single cached token.
///
/// The cache lock is held across the exchange, so concurrent callers that
/// find no valid token queue behind one in-flight request and all receive
/// its result. A caller dropped mid-exchange releases the lock without
/// touching the cache; the next waiter then performs the exchange itself.
pub struct TokenManager {
    http: ClientWithMiddleware,
    token_url: Url,
    client_id: String,
    client_secret: String,
    cached: Mutex<Option<AccessToken>>,
    exchanges: AtomicU64,
}

impl TokenManager {
    /// `max_retries` applies to transient failures (connect errors, 5xx, 429) only
    pub fn new(http: Client, credentials: &Credentials, max_retries: u32) -> Result<Self> {
        let token_url = credentials.base_url.join(TOKEN_PATH).map_err(|e| {
            AppError::configuration(format!("Invalid token endpoint URL: {}", e))
        })?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);
        let http = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            http,
            token_url,
            client_id: credentials.oauth_id.to_string(),
            client_secret: credentials.oauth_secret.clone(),
            cached: Mutex::new(None),
            exchanges: AtomicU64::new(0),
        })
    }

    /// Returns the cached token, exchanging credentials first when it is missing or expired
    pub async fn token(&self) -> Result<AccessToken> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.clone());
            }
            debug!("Access token expired, refreshing");
        }

        let fresh = self.authenticate().await?;
        *cached = Some(fresh.clone());
        Ok(fresh)
    }

    /// Drops the cached token if it is still `stale`.
    ///
    /// A token refreshed by another caller in the meantime is kept.
    pub async fn invalidate(&self, stale: &AccessToken) {
        let mut cached = self.cached.lock().await;
        if cached.as_ref().is_some_and(|t| t.value == stale.value) {
            debug!("Invalidating rejected access token");
            *cached = None;
        }
    }

    /// Number of credential exchanges performed so far
    pub fn exchange_count(&self) -> u64 {
        self.exchanges.load(Ordering::Relaxed)
    }

    async fn authenticate(&self) -> Result<AccessToken> {
        self.exchanges.fetch_add(1, Ordering::Relaxed);
        let issued_at = Instant::now();

        let response = self
            .http
            .post(self.token_url.clone())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "PayU token request failed");
                AppError::credentials(format!("Cannot authenticate: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "PayU rejected client credentials");
            return Err(AppError::credentials(format!(
                "Cannot authenticate: HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let grant: TokenGrant = response.json().await.map_err(|e| {
            AppError::credentials(format!("Malformed token response: {}", e))
        })?;

        info!(expires_in = grant.expires_in, "Obtained PayU access token");

        Ok(AccessToken::new(
            grant.access_token,
            issued_at,
            Duration::from_secs(grant.expires_in),
        ))
    }
}
