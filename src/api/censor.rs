//! Content censor API
//!
//! Text and image moderation. Both endpoints are form-encoded and share
//! the conclusion/conclusionType result shape.

use std::collections::HashMap;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{BaiduApi, BaiduApiResponse, BaiduContext};
use crate::error::BaiduError;

const TEXT_CENSOR_ENDPOINT: &str = "/rest/2.0/solution/v1/text_censor/v2/user_defined";
const IMAGE_CENSOR_ENDPOINT: &str = "/rest/2.0/solution/v1/img_censor/v2/user_defined";

/// Moderation verdict.
///
/// Mirrors the numeric `conclusionType` field: 1 compliant, 2 violating,
/// 3 suspect, 4 review failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conclusion {
    Compliant,
    Violating,
    Suspect,
    Failed,
    Unknown(i32),
}

impl From<i32> for Conclusion {
    fn from(value: i32) -> Self {
        match value {
            1 => Conclusion::Compliant,
            2 => Conclusion::Violating,
            3 => Conclusion::Suspect,
            4 => Conclusion::Failed,
            other => Conclusion::Unknown(other),
        }
    }
}

/// One matched policy item inside a censor response.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CensorHit {
    #[serde(rename = "type", default)]
    pub hit_type: i32,
    #[serde(rename = "subType", default)]
    pub sub_type: i32,
    #[serde(default)]
    pub msg: String,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Response shared by the text and image censor endpoints.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CensorResponse {
    #[serde(default)]
    pub(crate) error_code: i64,
    #[serde(default)]
    pub(crate) error_msg: String,
    #[serde(default)]
    pub log_id: u64,
    #[serde(default)]
    pub conclusion: String,
    #[serde(rename = "conclusionType", default)]
    pub conclusion_type: i32,
    #[serde(default)]
    pub data: Vec<CensorHit>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl CensorResponse {
    /// Typed view of `conclusionType`.
    pub fn verdict(&self) -> Conclusion {
        Conclusion::from(self.conclusion_type)
    }

    /// True when the content passed moderation.
    pub fn is_compliant(&self) -> bool {
        self.verdict() == Conclusion::Compliant
    }
}

impl BaiduApiResponse for CensorResponse {
    fn error_code(&self) -> i64 {
        self.error_code
    }

    fn error_msg(&self) -> &str {
        &self.error_msg
    }
}

pub struct CensorApi {
    context: Arc<BaiduContext>,
}

impl CensorApi {
    pub fn new(context: Arc<BaiduContext>) -> Self {
        Self { context }
    }

    /// Moderate a piece of text against the default policy set.
    pub async fn text_censor(&self, text: &str) -> Result<CensorResponse, BaiduError> {
        let params = [("text", text)];
        let response: CensorResponse = self.context.post_form(TEXT_CENSOR_ENDPOINT, &params).await?;
        response.check()?;
        Ok(response)
    }

    /// Moderate raw image bytes; encoded to base64 for the `image` field.
    pub async fn image_censor(&self, image: &[u8]) -> Result<CensorResponse, BaiduError> {
        let encoded = BASE64.encode(image);
        let params = [("image", encoded.as_str())];
        let response: CensorResponse = self.context.post_form(IMAGE_CENSOR_ENDPOINT, &params).await?;
        response.check()?;
        Ok(response)
    }

    /// Moderate an image fetched by Baidu from a public URL.
    pub async fn image_censor_url(&self, img_url: &str) -> Result<CensorResponse, BaiduError> {
        let params = [("imgUrl", img_url)];
        let response: CensorResponse = self.context.post_form(IMAGE_CENSOR_ENDPOINT, &params).await?;
        response.check()?;
        Ok(response)
    }
}

impl BaiduApi for CensorApi {
    fn context(&self) -> &BaiduContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "censor"
    }
}
