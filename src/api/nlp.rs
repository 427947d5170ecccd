//! Natural language processing API
//!
//! Lexical analysis and sentiment classification. Both endpoints take
//! JSON bodies; the `charset=UTF-8` query parameter keeps the service
//! from defaulting to GBK.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{BaiduApi, BaiduApiResponse, BaiduContext};
use crate::error::BaiduError;

const LEXER_ENDPOINT: &str = "/rpc/2.0/nlp/v1/lexer?charset=UTF-8";
const SENTIMENT_ENDPOINT: &str = "/rpc/2.0/nlp/v2/sentiment_classify?charset=UTF-8";

#[derive(Debug, Clone, Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

/// One token produced by lexical analysis.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LexerItem {
    #[serde(default)]
    pub item: String,
    /// Part-of-speech tag; empty for named entities
    #[serde(default)]
    pub pos: String,
    /// Named entity tag; empty for ordinary words
    #[serde(default)]
    pub ne: String,
    #[serde(default)]
    pub byte_offset: u32,
    #[serde(default)]
    pub byte_length: u32,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Lexer response.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LexerResponse {
    #[serde(default)]
    pub(crate) error_code: i64,
    #[serde(default)]
    pub(crate) error_msg: String,
    #[serde(default)]
    pub log_id: u64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub items: Vec<LexerItem>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl BaiduApiResponse for LexerResponse {
    fn error_code(&self) -> i64 {
        self.error_code
    }

    fn error_msg(&self) -> &str {
        &self.error_msg
    }
}

/// One sentiment classification result.
///
/// `sentiment` is 0 negative, 1 neutral, 2 positive.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SentimentItem {
    #[serde(default)]
    pub sentiment: i32,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub positive_prob: f64,
    #[serde(default)]
    pub negative_prob: f64,
}

/// Sentiment classification response.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SentimentResponse {
    #[serde(default)]
    pub(crate) error_code: i64,
    #[serde(default)]
    pub(crate) error_msg: String,
    #[serde(default)]
    pub log_id: u64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub items: Vec<SentimentItem>,
}

impl BaiduApiResponse for SentimentResponse {
    fn error_code(&self) -> i64 {
        self.error_code
    }

    fn error_msg(&self) -> &str {
        &self.error_msg
    }
}

pub struct NlpApi {
    context: Arc<BaiduContext>,
}

impl NlpApi {
    pub fn new(context: Arc<BaiduContext>) -> Self {
        Self { context }
    }

    /// Segment text into words with part-of-speech and entity tags.
    pub async fn lexer(&self, text: &str) -> Result<LexerResponse, BaiduError> {
        let body = TextRequest { text };
        let response: LexerResponse = self.context.post_json(LEXER_ENDPOINT, &body).await?;
        response.check()?;
        Ok(response)
    }

    /// Classify the sentiment of a piece of text.
    pub async fn sentiment_classify(&self, text: &str) -> Result<SentimentResponse, BaiduError> {
        let body = TextRequest { text };
        let response: SentimentResponse = self.context.post_json(SENTIMENT_ENDPOINT, &body).await?;
        response.check()?;
        Ok(response)
    }
}

impl BaiduApi for NlpApi {
    fn context(&self) -> &BaiduContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "nlp"
    }
}
