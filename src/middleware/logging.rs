use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use log::{debug, info};
use reqwest::{Request, Response};
use tower::{Layer, Service};

/// Middleware that logs request and response lines via the `log` facade.
///
/// Credentials never reach the log output: query parameters carrying the
/// access token or the app keys are redacted before formatting.
#[derive(Clone)]
pub struct LoggingMiddleware {
    verbose: bool,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for LoggingMiddleware
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Service = LoggingMiddlewareService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddlewareService {
            inner,
            verbose: self.verbose,
        }
    }
}

#[derive(Clone)]
pub struct LoggingMiddlewareService<S> {
    inner: S,
    verbose: bool,
}

const SENSITIVE_FIELDS: &[&str] = &[
    "access_token",
    "client_id",
    "client_secret",
    "token",
    "authorization",
];

impl<S> LoggingMiddlewareService<S> {
    fn redact_url(url: &str) -> String {
        let Some(idx) = url.find('?') else {
            return url.to_string();
        };

        let base = &url[..idx];
        let query = &url[idx + 1..];
        let redacted_query: String = query
            .split('&')
            .map(|param| {
                let key = param.split('=').next().unwrap_or(param);
                if SENSITIVE_FIELDS.iter().any(|s| key.eq_ignore_ascii_case(s)) {
                    format!("{key}=[REDACTED]")
                } else {
                    param.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("&");
        format!("{base}?{redacted_query}")
    }

    fn log_request(method: &str, url: &str, verbose: bool) {
        let safe_url = Self::redact_url(url);
        if verbose {
            debug!("[BaiduAi] >>> {} {}", method, safe_url);
        } else {
            info!("[BaiduAi] {} {}", method, safe_url);
        }
    }

    fn log_response(status: u16, duration: std::time::Duration, verbose: bool) {
        if verbose {
            debug!("[BaiduAi] <<< {} ({:?})", status, duration);
        } else {
            info!("[BaiduAi] {} ({:?})", status, duration);
        }
    }
}

impl<S, Error> Service<Request> for LoggingMiddlewareService<S>
where
    S: Service<Request, Response = Response, Error = Error> + Send + Clone + 'static,
    S::Future: Send,
    Error: Send + 'static,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let method = req.method().as_str().to_string();
        let url = req.url().to_string();
        let verbose = self.verbose;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            Self::log_request(&method, &url, verbose);

            let start = Instant::now();
            let response = inner.call(req).await?;
            let duration = start.elapsed();

            Self::log_response(response.status().as_u16(), duration, verbose);

            Ok(response)
        })
    }
}
