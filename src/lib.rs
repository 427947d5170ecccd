//! Baidu AI Cloud SDK for Rust
//!
//! A typed async client for the Baidu AI Cloud REST APIs
//! (`aip.baidubce.com`): OCR, content moderation, face recognition and
//! NLP, with managed `access_token` handling.
//!
//! Every Baidu AI response embeds the same envelope (`error_code`,
//! `log_id`, `error_msg`) next to the endpoint-specific fields. The SDK
//! checks that envelope after every decode, on the JSON and the
//! form-encoded path alike, so a non-zero `error_code` always surfaces
//! as [`BaiduError::Api`] instead of a half-populated result.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use baidu_ai_sdk::{BaiduAi, api::ocr::OcrRequest, types::{ApiKey, SecretKey}};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let baidu = BaiduAi::builder()
//!         .api_key(ApiKey::new("your_api_key")?)
//!         .secret_key(SecretKey::new("your_secret_key")?)
//!         .build()?;
//!
//!     let request = OcrRequest::from_url("https://example.com/receipt.png");
//!     let response = baidu.general_ocr(&request).await?;
//!     for line in &response.words_result {
//!         println!("{}", line.words);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Baidu API modules (ocr, censor, face, nlp)
//! - [`client`] - HTTP client for API calls
//! - [`error`] - Error types
//! - [`middleware`] - Tower middleware (logging, retry)
//! - [`token`] - Access token management and pluggable token storage
//! - [`types`] - Key and token newtypes
//!
//! ## Error Handling
//!
//! The SDK uses the [`BaiduError`] enum for error handling:
//!
//! ```rust,ignore
//! use baidu_ai_sdk::BaiduError;
//!
//! match result {
//!     Ok(response) => { /* handle success */ }
//!     Err(BaiduError::Api { code, message }) => {
//!         eprintln!("API error: {} - {}", code, message);
//!     }
//!     Err(BaiduError::Http(e)) => {
//!         eprintln!("HTTP error: {}", e);
//!     }
//!     Err(e) => {
//!         eprintln!("Other error: {}", e);
//!     }
//! }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod middleware;
pub mod token;
pub mod types;

pub use client::{BaiduAi, BaiduAiBuilder, BaiduClient, BaiduClientBuilder};
pub use error::BaiduError;
