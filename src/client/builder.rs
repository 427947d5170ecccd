use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Request as ReqwestRequest, Response as ReqwestResponse};
use tower::{Layer, Service};

use crate::api::BaiduContext;
use crate::error::BaiduError;
use crate::token::{TokenManager, TokenStore};
use crate::types::{ApiKey, SecretKey};

use super::baidu_client::{
    BaiduClient, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS,
};
use super::BaiduAi;

type MiddlewareFuture =
    Pin<Box<dyn Future<Output = Result<ReqwestResponse, reqwest::Error>> + Send>>;
type MiddlewareExecutor = Arc<dyn Fn(ReqwestRequest) -> MiddlewareFuture + Send + Sync>;

#[must_use]
#[derive(Default)]
pub struct BaiduAiBuilder<M = ()> {
    api_key: Option<ApiKey>,
    secret_key: Option<SecretKey>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    token_store: Option<Arc<dyn TokenStore>>,
    middleware: Option<M>,
}

impl<M> std::fmt::Debug for BaiduAiBuilder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaiduAiBuilder")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("token_store", &self.token_store.as_ref().map(|_| ".."))
            .field("middleware", &self.middleware.as_ref().map(|_| ".."))
            .finish_non_exhaustive()
    }
}

impl<M> BaiduAiBuilder<M> {
    pub fn api_key(mut self, api_key: ApiKey) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn secret_key(mut self, secret_key: SecretKey) -> Self {
        self.secret_key = Some(secret_key);
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Persist token state through a custom store instead of the
    /// process-local default.
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn with_middleware<M2>(self, middleware: M2) -> BaiduAiBuilder<M2>
    where
        M2: Layer<BaiduClient> + Clone + Send + Sync + 'static,
    {
        BaiduAiBuilder {
            api_key: self.api_key,
            secret_key: self.secret_key,
            base_url: self.base_url,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            token_store: self.token_store,
            middleware: Some(middleware),
        }
    }

    pub fn build(self) -> Result<BaiduAi, BaiduError>
    where
        M: Layer<BaiduClient> + Clone + Send + Sync + 'static,
        M::Service: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <M::Service as Service<ReqwestRequest>>::Future: Send + 'static,
    {
        let api_key = self
            .api_key
            .ok_or_else(|| BaiduError::Config("api_key is required".to_string()))?;
        let secret_key = self
            .secret_key
            .ok_or_else(|| BaiduError::Config("secret_key is required".to_string()))?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(BaiduError::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let connect_timeout = self
            .connect_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));

        let mut client = BaiduClient::builder()
            .api_key(api_key)
            .secret_key(secret_key)
            .base_url(base_url)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        if let Some(middleware) = self.middleware {
            let service = middleware.layer(client.clone());
            let executor = make_middleware_executor(service);
            client = client.with_middleware_executor(executor);
        }

        let client_arc = Arc::new(client);
        let token_manager = match self.token_store {
            Some(store) => TokenManager::with_store(BaiduClient::clone(&client_arc), store),
            None => TokenManager::new(BaiduClient::clone(&client_arc)),
        };
        let context = Arc::new(BaiduContext::new(client_arc, Arc::new(token_manager)));

        Ok(BaiduAi::from(context))
    }
}

fn make_middleware_executor<S>(service: S) -> MiddlewareExecutor
where
    S: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    let service = Arc::new(service);

    Arc::new(move |request: ReqwestRequest| {
        let mut service = (*service).clone();
        Box::pin(async move { service.call(request).await })
    })
}
