//! Baidu API trait and context
//!
//! Provides the base trait, shared context and request dispatch for all
//! Baidu API implementations.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::BaiduClient;
use crate::error::BaiduError;
use crate::token::TokenManager;

/// Context holding shared resources for Baidu API implementations.
///
/// Contains the HTTP client and token manager that API implementations
/// need to make requests, along with the two dispatch paths every
/// endpoint goes through.
#[derive(Clone)]
pub struct BaiduContext {
    /// The Baidu HTTP client for making API requests
    pub(crate) client: Arc<BaiduClient>,
    /// The token manager for access token lifecycle
    pub(crate) token_manager: Arc<TokenManager>,
}

impl std::fmt::Debug for BaiduContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaiduContext")
            .field("client", &"BaiduClient { .. }")
            .field("token_manager", &"TokenManager { .. }")
            .finish()
    }
}

impl BaiduContext {
    /// Create a new BaiduContext
    pub fn new(client: Arc<BaiduClient>, token_manager: Arc<TokenManager>) -> Self {
        Self {
            client,
            token_manager,
        }
    }

    /// Get a reference to the Baidu HTTP client.
    pub fn client(&self) -> &BaiduClient {
        &self.client
    }

    /// Get a reference to the token manager.
    pub fn token_manager(&self) -> &TokenManager {
        &self.token_manager
    }

    /// POST a JSON body to an endpoint.
    ///
    /// Ensures a valid access token (the manager may make one extra
    /// network call to refresh it), appends it as the `access_token`
    /// query parameter, sends the body and decodes the response. A
    /// non-zero envelope `error_code` surfaces as `BaiduError::Api`.
    pub async fn post_json<T, B>(&self, endpoint: &str, body: &B) -> Result<T, BaiduError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let access_token = self.token_manager.get_token().await?;
        let path = BaiduClient::append_access_token(endpoint, &access_token);
        self.client.post_json(&path, body).await
    }

    /// POST form-encoded parameters to an endpoint.
    ///
    /// Same token handling as [`post_json`](Self::post_json), except the
    /// token travels as an `access_token` form field. The response goes
    /// through the same envelope check as the JSON path.
    pub async fn post_form<T>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, BaiduError>
    where
        T: DeserializeOwned,
    {
        let access_token = self.token_manager.get_token().await?;

        let mut form: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 1);
        form.extend_from_slice(params);
        form.push(("access_token", &access_token));

        self.client.post_form(endpoint, &form).await
    }
}

/// Trait for Baidu API implementations.
///
/// All API modules should implement this trait to provide access to the
/// shared context.
pub trait BaiduApi: Send + Sync {
    /// Get a reference to the Baidu context
    fn context(&self) -> &BaiduContext;

    /// Get the name of this API for logging and error context.
    ///
    /// Implementors should override this to return a descriptive name
    /// (e.g., "ocr", "censor", "face").
    fn api_name(&self) -> &'static str {
        "unknown"
    }
}
