//! Baidu AI API modules
//!
//! This module contains submodules for the wrapped Baidu AI services:
//!
//! - [`common`] - Shared envelope types and the response-check trait
//! - [`ocr`] - Text recognition (general, accurate, web image, cards)
//! - [`censor`] - Text and image content moderation
//! - [`face`] - Face detection and comparison (v3)
//! - [`nlp`] - Lexical analysis and sentiment classification
//!
//! ## Usage
//!
//! ```rust,ignore
//! use baidu_ai_sdk::{BaiduAi, types::{ApiKey, SecretKey}};
//! ```

pub mod censor;
pub mod common;
pub mod face;
pub mod nlp;
pub mod ocr;
pub mod r#trait;

pub use censor::{CensorApi, CensorHit, CensorResponse, Conclusion};
pub use common::{BaiduApiResponse, Reply, ReplyBase};
pub use face::{
    FaceApi, FaceDetectRequest, FaceDetectResult, FaceImage, FaceMatchResult, FaceResponse,
    ImageType,
};
pub use nlp::{LexerItem, LexerResponse, NlpApi, SentimentItem, SentimentResponse};
pub use ocr::{CardOcrResponse, OcrApi, OcrRequest, OcrResponse, OcrWord};
pub use r#trait::{BaiduApi, BaiduContext};
