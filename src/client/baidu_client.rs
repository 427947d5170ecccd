//! Baidu HTTP client
//!
//! Provides the HTTP client wrapper all Baidu API calls go through.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

use crate::error::BaiduError;
use crate::types::{ApiKey, SecretKey};

pub(crate) const DEFAULT_BASE_URL: &str = "https://aip.baidubce.com";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

type MiddlewareFuture =
    Pin<Box<dyn Future<Output = Result<reqwest::Response, reqwest::Error>> + Send>>;
type MiddlewareExecutor = Arc<dyn Fn(reqwest::Request) -> MiddlewareFuture + Send + Sync>;

/// Baidu API client
///
/// Reusable HTTP client for calling Baidu AI APIs.
/// Built with reqwest for async HTTP requests.
#[derive(Clone)]
pub struct BaiduClient {
    http: Client,
    api_key: ApiKey,
    secret_key: SecretKey,
    base_url: String,
    middleware_executor: Option<MiddlewareExecutor>,
}

impl std::fmt::Debug for BaiduClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaiduClient")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .field(
                "middleware_executor",
                &self.middleware_executor.as_ref().map(|_| ".."),
            )
            .finish_non_exhaustive()
    }
}

impl BaiduClient {
    /// Create a new client builder
    pub fn builder() -> BaiduClientBuilder {
        BaiduClientBuilder::default()
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        self.api_key.as_str()
    }

    /// Get the secret key
    pub(crate) fn secret_key(&self) -> &str {
        self.secret_key.as_str()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn append_access_token(path: &str, access_token: &str) -> String {
        let encoded = utf8_percent_encode(access_token, NON_ALPHANUMERIC);

        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{path}{separator}access_token={encoded}")
    }

    /// Returns the underlying [`reqwest::Client`] for raw HTTP requests.
    ///
    /// Note: requests made through this client bypass the middleware
    /// pipeline. Use [`get`](Self::get), [`post_json`](Self::post_json)
    /// or [`post_form`](Self::post_form) for middleware-aware requests.
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn with_middleware_executor(mut self, executor: MiddlewareExecutor) -> Self {
        self.middleware_executor = Some(executor);
        self
    }

    pub(crate) async fn send_request(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        if let Some(executor) = &self.middleware_executor {
            (executor)(request).await
        } else {
            self.http.execute(request).await
        }
    }

    /// Send a built request and decode the enveloped response.
    ///
    /// Every call path funnels through here, so the envelope check is
    /// applied uniformly: an `error_code` field that is present and
    /// non-zero becomes `BaiduError::Api` before any typed decode runs.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::Request,
    ) -> Result<T, BaiduError> {
        let response = self.send_request(request).await?;

        if let Err(e) = response.error_for_status_ref() {
            return Err(e.into());
        }

        let value: serde_json::Value = response.json().await?;

        if let Some(error_code) = value.get("error_code").and_then(|v| v.as_i64()) {
            if error_code != 0 {
                let error_msg = value
                    .get("error_msg")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown error");
                return Err(BaiduError::Api {
                    code: error_code,
                    message: error_msg.to_string(),
                });
            }
        }

        serde_json::from_value(value).map_err(BaiduError::Json)
    }

    /// Make a GET request to a Baidu API
    ///
    /// # Arguments
    /// * `path` - API endpoint path (e.g., "/oauth/2.0/token")
    /// * `query` - Query parameters as key-value pairs
    ///
    /// # Errors
    /// - Returns `BaiduError::Http` for transport failures and non-2xx
    ///   HTTP status codes
    /// - Returns `BaiduError::Api` when the response envelope carries a
    ///   non-zero `error_code`
    /// - Returns `BaiduError::Json` when the body does not decode
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, BaiduError> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http.get(url).query(query).build()?;
        self.execute(request).await
    }

    /// Make a JSON POST request to a Baidu API
    ///
    /// # Arguments
    /// * `path` - API endpoint path (e.g., "/rest/2.0/face/v3/detect")
    /// * `body` - Request body to serialize as JSON
    ///
    /// # Errors
    /// Same contract as [`get`](Self::get).
    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, BaiduError>
    where
        T: DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http.post(url).json(body).build()?;
        self.execute(request).await
    }

    /// Make a form-encoded POST request to a Baidu API
    ///
    /// # Arguments
    /// * `path` - API endpoint path (e.g., "/rest/2.0/ocr/v1/general_basic")
    /// * `params` - Form fields as key-value pairs
    ///
    /// # Errors
    /// Same contract as [`get`](Self::get).
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, BaiduError> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http.post(url).form(params).build()?;
        self.execute(request).await
    }
}

impl Service<reqwest::Request> for BaiduClient {
    type Response = reqwest::Response;
    type Error = reqwest::Error;
    type Future = MiddlewareFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: reqwest::Request) -> Self::Future {
        let client = self.http.clone();
        Box::pin(async move { client.execute(req).await })
    }
}

/// Builder for BaiduClient
///
/// # Example
///
/// ```rust
/// use baidu_ai_sdk::client::BaiduClient;
/// use baidu_ai_sdk::types::{ApiKey, SecretKey};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let api_key = ApiKey::new("K9mPqA7vWb3ZnXcR5tYdE2fG")?;
///     let secret_key = SecretKey::new("Gh2jK8LmN4pQr6StUv9WxYz1AbCdEfH3")?;
///
///     let client = BaiduClient::builder()
///         .api_key(api_key)
///         .secret_key(secret_key)
///         .build()?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Default)]
pub struct BaiduClientBuilder {
    api_key: Option<ApiKey>,
    secret_key: Option<SecretKey>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl BaiduClientBuilder {
    /// Set the Baidu API key (AK)
    pub fn api_key(mut self, api_key: ApiKey) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Set the Baidu secret key (SK)
    pub fn secret_key(mut self, secret_key: SecretKey) -> Self {
        self.secret_key = Some(secret_key);
        self
    }

    /// Set the base URL for API calls
    ///
    /// Default: `<https://aip.baidubce.com>`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the total timeout for requests
    ///
    /// Default: 30 seconds
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout
    ///
    /// Default: 10 seconds
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Build the BaiduClient
    ///
    /// # Errors
    /// Returns an error if api_key or secret_key is not set
    pub fn build(self) -> Result<BaiduClient, BaiduError> {
        let api_key = self
            .api_key
            .ok_or_else(|| BaiduError::Config("api_key is required".to_string()))?;
        let secret_key = self
            .secret_key
            .ok_or_else(|| BaiduError::Config("secret_key is required".to_string()))?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let connect_timeout = self
            .connect_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(BaiduClient {
            http: client,
            api_key,
            secret_key,
            base_url,
            middleware_executor: None,
        })
    }
}
