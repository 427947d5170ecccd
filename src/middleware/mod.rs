//! Middleware components for the Baidu AI SDK.
//!
//! This module provides middleware infrastructure using Tower patterns.
//! Middleware can be composed using `ServiceBuilder` to add cross-cutting
//! concerns like retry logic and logging.
//!
//! ## Middleware Types
//!
//! - [`RetryMiddleware`] - Retries on 5xx and transient transport errors
//! - [`LoggingMiddleware`] - Logs request/response information
//!
//! ## Usage
//!
//! ```ignore
//! use baidu_ai_sdk::middleware::{LoggingMiddleware, RetryMiddleware};
//!
//! let baidu = BaiduAi::builder()
//!     .api_key(api_key)
//!     .secret_key(secret_key)
//!     .with_middleware(LoggingMiddleware::new())
//!     .build()?;
//! ```

// Re-export tower types for convenience
pub use tower::{Layer, Service, ServiceBuilder};

mod logging;
mod retry;

pub use logging::LoggingMiddleware;
pub use retry::{RetryMiddleware, RetryableRequest};
