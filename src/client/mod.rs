//! Baidu HTTP client module
//!
//! This module contains the BaiduClient and related types.

mod baidu_client;
pub use baidu_client::{BaiduClient, BaiduClientBuilder};

mod baidu_ai;
pub use baidu_ai::BaiduAi;

mod builder;
pub use builder::BaiduAiBuilder;
