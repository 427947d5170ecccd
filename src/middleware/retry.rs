//! Retry middleware for automatic retry on failures.
//!
//! Retries requests that are likely to succeed on a subsequent attempt:
//! HTTP 5xx responses and transient transport errors (timeouts,
//! connection failures).
//!
//! # Non-idempotent requests
//!
//! By default, POST requests are NOT retried as they may cause duplicate
//! operations. Use `with_retry_post(true)` to enable retrying POST
//! requests; the Baidu recognition endpoints are safe to repeat.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use reqwest::{Request, Response};
use tokio::time::sleep;
use tower::{Layer, Service};

use crate::error::BaiduError;

const MAX_BACKOFF_MS: u64 = 30_000;

/// Middleware that retries requests on 5xx responses and transient
/// transport errors.
#[derive(Clone)]
pub struct RetryMiddleware {
    max_attempts: usize,
    delay_ms: u64,
    retry_post: bool,
}

impl RetryMiddleware {
    /// Create a new RetryMiddleware with default settings.
    ///
    /// Default: max_attempts = 3, delay_ms = 100ms, retry_post = false
    pub fn new() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 100,
            retry_post: false,
        }
    }

    /// Set maximum number of attempts (including the first).
    pub fn with_max_attempts(mut self, max: usize) -> Self {
        self.max_attempts = max.max(1);
        self
    }

    /// Set base delay between attempts in milliseconds.
    pub fn with_delay_ms(mut self, delay: u64) -> Self {
        self.delay_ms = delay;
        self
    }

    /// Enable retrying POST requests (disabled by default).
    pub fn with_retry_post(mut self, retry: bool) -> Self {
        self.retry_post = retry;
        self
    }

    /// Check if an SDK-level error is retryable.
    ///
    /// Delegates to [`BaiduError::is_transient`] so retry classification
    /// has a single home.
    pub fn is_retryable_error(error: &BaiduError) -> bool {
        error.is_transient()
    }
}

impl Default for RetryMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for RetryMiddleware {
    type Service = RetryMiddlewareService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RetryMiddlewareService {
            inner,
            max_attempts: self.max_attempts,
            delay_ms: self.delay_ms,
            retry_post: self.retry_post,
        }
    }
}

#[derive(Clone)]
pub struct RetryMiddlewareService<S> {
    inner: S,
    pub(crate) max_attempts: usize,
    pub(crate) delay_ms: u64,
    pub(crate) retry_post: bool,
}

/// Identifies whether a request is idempotent (safe to retry).
pub trait RetryableRequest {
    /// Returns true if the request is idempotent (GET, HEAD, DELETE).
    /// POST, PUT and PATCH are not idempotent by default.
    fn is_idempotent(&self) -> bool;
}

impl RetryableRequest for Request {
    fn is_idempotent(&self) -> bool {
        !matches!(
            self.method(),
            &reqwest::Method::POST | &reqwest::Method::PUT | &reqwest::Method::PATCH
        )
    }
}

fn linear_delay(delay_ms: u64, attempt: usize) -> Duration {
    let total = delay_ms.saturating_mul(attempt as u64 + 1).min(MAX_BACKOFF_MS);
    Duration::from_millis(total)
}

fn transport_error_retryable(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect()
}

impl<S> Service<Request> for RetryMiddlewareService<S>
where
    S: Service<Request, Response = Response, Error = reqwest::Error> + Send + Clone + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = reqwest::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let mut inner = self.inner.clone();
        let max_attempts = self.max_attempts;
        let delay_ms = self.delay_ms;
        let retry_post = self.retry_post;

        Box::pin(async move {
            let allow_retry = req.is_idempotent() || retry_post;
            let mut current = req;

            for attempt in 0..max_attempts {
                let last = attempt + 1 >= max_attempts;
                // Streaming bodies cannot be cloned; treat those as
                // single-attempt requests.
                let backup = if allow_retry && !last {
                    current.try_clone()
                } else {
                    None
                };

                match inner.call(current).await {
                    Ok(response) => {
                        if response.status().is_server_error() {
                            if let Some(retry_req) = backup {
                                sleep(linear_delay(delay_ms, attempt)).await;
                                current = retry_req;
                                continue;
                            }
                        }
                        return Ok(response);
                    }
                    Err(e) => {
                        if transport_error_retryable(&e) {
                            if let Some(retry_req) = backup {
                                sleep(linear_delay(delay_ms, attempt)).await;
                                current = retry_req;
                                continue;
                            }
                        }
                        return Err(e);
                    }
                }
            }

            unreachable!("retry loop always returns within max_attempts iterations")
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::client::BaiduClient;
    use crate::types::{ApiKey, SecretKey};

    fn test_client() -> BaiduClient {
        BaiduClient::builder()
            .api_key(ApiKey::new("K9mPqA7vWb3ZnXcR5tYdE2fG").unwrap())
            .secret_key(SecretKey::new("Gh2jK8LmN4pQr6StUv9WxYz1AbCdEfH3").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_linear_delay_grows_and_caps() {
        assert_eq!(linear_delay(100, 0), Duration::from_millis(100));
        assert_eq!(linear_delay(100, 1), Duration::from_millis(200));
        assert_eq!(linear_delay(u64::MAX, 5), Duration::from_millis(MAX_BACKOFF_MS));
    }

    #[test]
    fn test_get_is_idempotent_post_is_not() {
        let client = reqwest::Client::new();
        let get = client.get("https://example.com").build().unwrap();
        assert!(get.is_idempotent());

        let post = client.post("https://example.com").build().unwrap();
        assert!(!post.is_idempotent());
    }

    #[test]
    fn test_retryable_error_classification() {
        let qps = BaiduError::Api {
            code: crate::error::ERROR_CODE_QPS_LIMIT,
            message: "Open api qps request limit reached".to_string(),
        };
        assert!(RetryMiddleware::is_retryable_error(&qps));

        let daily = BaiduError::Api {
            code: 17,
            message: "Open api daily request limit reached".to_string(),
        };
        assert!(!RetryMiddleware::is_retryable_error(&daily));

        let token = BaiduError::Token("invalid_client".to_string());
        assert!(!RetryMiddleware::is_retryable_error(&token));
    }

    #[tokio::test]
    async fn test_retries_server_errors_until_success() {
        let mock_server = MockServer::start().await;
        let hits = Arc::new(AtomicU32::new(0));
        let hits_clone = Arc::clone(&hits);

        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(move |_request: &wiremock::Request| {
                let attempt = hits_clone.fetch_add(1, Ordering::SeqCst);
                if attempt < 2 {
                    ResponseTemplate::new(502)
                } else {
                    ResponseTemplate::new(200)
                }
            })
            .mount(&mock_server)
            .await;

        let client = test_client();
        let mut service = RetryMiddleware::new()
            .with_delay_ms(1)
            .layer(client.clone());

        let url = format!("{}/flaky", mock_server.uri());
        let req = client.http().get(&url).build().unwrap();

        let response = service.call(req).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_post_not_retried_by_default() {
        let mock_server = MockServer::start().await;
        let hits = Arc::new(AtomicU32::new(0));
        let hits_clone = Arc::clone(&hits);

        Mock::given(method("POST"))
            .and(path("/unstable"))
            .respond_with(move |_request: &wiremock::Request| {
                hits_clone.fetch_add(1, Ordering::SeqCst);
                ResponseTemplate::new(503)
            })
            .mount(&mock_server)
            .await;

        let client = test_client();
        let mut service = RetryMiddleware::new()
            .with_delay_ms(1)
            .layer(client.clone());

        let url = format!("{}/unstable", mock_server.uri());
        let req = client.http().post(&url).build().unwrap();

        let response = service.call(req).await.unwrap();
        assert_eq!(response.status().as_u16(), 503);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_post_retried_when_enabled() {
        let mock_server = MockServer::start().await;
        let hits = Arc::new(AtomicU32::new(0));
        let hits_clone = Arc::clone(&hits);

        Mock::given(method("POST"))
            .and(path("/unstable"))
            .respond_with(move |_request: &wiremock::Request| {
                hits_clone.fetch_add(1, Ordering::SeqCst);
                ResponseTemplate::new(503)
            })
            .mount(&mock_server)
            .await;

        let client = test_client();
        let mut service = RetryMiddleware::new()
            .with_delay_ms(1)
            .with_retry_post(true)
            .layer(client.clone());

        let url = format!("{}/unstable", mock_server.uri());
        let req = client.http().post(&url).build().unwrap();

        let response = service.call(req).await.unwrap();
        assert_eq!(response.status().as_u16(), 503);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }
}
