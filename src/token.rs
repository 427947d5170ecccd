//! Access token management for the Baidu AI API
//!
//! Handles token caching, automatic refresh, pluggable storage and
//! concurrency safety.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::client::BaiduClient;
use crate::error::BaiduError;
use crate::types::AccessToken;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 100;

fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Serialized token state, the unit a [`TokenStore`] persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    /// Expiry as seconds since the Unix epoch
    pub expires_at: u64,
}

impl StoredToken {
    fn is_expired(&self, buffer: Duration) -> bool {
        now_epoch_secs() + buffer.as_secs() >= self.expires_at
    }
}

struct CachedToken {
    token: AccessToken,
    expires_at: u64,
}

impl CachedToken {
    fn is_expired(&self, buffer: Duration) -> bool {
        now_epoch_secs() + buffer.as_secs() >= self.expires_at
    }
}

/// Pluggable persistence for token state.
///
/// The manager consults the store before hitting the network and writes
/// back after every refresh, so an external store (file, database,
/// shared cache) can carry a token across processes. Implementations
/// must be safe to call from concurrent tasks.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<StoredToken>, BaiduError>;
    fn save(&self, token: &StoredToken) -> Result<(), BaiduError>;
    fn clear(&self) -> Result<(), BaiduError>;
}

/// Default process-local store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    inner: std::sync::Mutex<Option<StoredToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<StoredToken>, BaiduError> {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    fn save(&self, token: &StoredToken) -> Result<(), BaiduError> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), BaiduError> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    expires_in: u64,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl TokenResponse {
    fn is_success(&self) -> bool {
        self.error.is_none() && !self.access_token.is_empty()
    }

    fn into_failure(self) -> BaiduError {
        let error = self.error.unwrap_or_else(|| "unknown error".to_string());
        let description = self.error_description.unwrap_or_default();
        BaiduError::Token(format!("{error}: {description}"))
    }
}

/// Manages access_token lifecycle with automatic refresh.
///
/// Refresh is serialized behind an async mutex; concurrent callers
/// coalesce on a single token exchange instead of racing.
pub struct TokenManager {
    client: BaiduClient,
    store: Arc<dyn TokenStore>,
    cache: Mutex<Option<CachedToken>>,
    refresh_buffer: Duration,
}

impl TokenManager {
    pub fn new(client: BaiduClient) -> Self {
        Self::with_store(client, Arc::new(MemoryTokenStore::new()))
    }

    pub fn with_store(client: BaiduClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            store,
            cache: Mutex::new(None),
            refresh_buffer: Duration::from_secs(5 * 60),
        }
    }

    /// Return a valid access token, refreshing it when absent or inside
    /// the expiry buffer.
    pub async fn get_token(&self) -> Result<String, BaiduError> {
        let mut cache = self.cache.lock().await;

        if let Some(ref cached) = *cache {
            if !cached.is_expired(self.refresh_buffer) {
                return Ok(cached.token.as_str().to_string());
            }
        }

        if let Some(stored) = self.store.load()? {
            if !stored.is_expired(self.refresh_buffer) {
                let token = AccessToken::new(stored.access_token).map_err(BaiduError::Token)?;
                let value = token.as_str().to_string();
                *cache = Some(CachedToken {
                    token,
                    expires_at: stored.expires_at,
                });
                return Ok(value);
            }
        }

        let response = self.fetch_token_with_retry().await?;

        let expires_at = now_epoch_secs() + response.expires_in;
        let token = AccessToken::new(response.access_token).map_err(BaiduError::Token)?;

        self.store.save(&StoredToken {
            access_token: token.as_str().to_string(),
            expires_at,
        })?;

        let value = token.as_str().to_string();
        *cache = Some(CachedToken { token, expires_at });
        Ok(value)
    }

    async fn fetch_token_with_retry(&self) -> Result<TokenResponse, BaiduError> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match self.fetch_token().await {
                Ok(response) => {
                    if response.is_success() {
                        return Ok(response);
                    }
                    return Err(response.into_failure());
                }
                Err(BaiduError::Http(e)) => {
                    last_error = Some(BaiduError::Http(e));
                    if attempt < MAX_RETRIES - 1 {
                        tokio::time::sleep(Duration::from_millis(
                            RETRY_DELAY_MS * (attempt + 1) as u64,
                        ))
                        .await;
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| BaiduError::Token("unknown error".to_string())))
    }

    async fn fetch_token(&self) -> Result<TokenResponse, BaiduError> {
        let path = "/oauth/2.0/token";
        let query = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client.api_key()),
            ("client_secret", self.client.secret_key()),
        ];

        self.client.get(path, &query).await
    }

    /// Drop the cached token and the stored state.
    pub async fn invalidate(&self) -> Result<(), BaiduError> {
        let mut cache = self.cache.lock().await;
        *cache = None;
        self.store.clear()
    }
}
