//! Text recognition (OCR) API
//!
//! All OCR endpoints are form-encoded; the image travels base64-encoded
//! in the `image` field or by reference in the `url` field.

use std::collections::HashMap;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{BaiduApi, BaiduApiResponse, BaiduContext};
use crate::error::BaiduError;

/// Source image for an OCR request.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct OcrRequest {
    image: Option<String>,
    url: Option<String>,
    pub language_type: Option<String>,
    pub detect_direction: bool,
}

impl OcrRequest {
    /// Recognize raw image bytes; encoded to base64 for the `image` field.
    pub fn from_image(data: &[u8]) -> Self {
        Self {
            image: Some(BASE64.encode(data)),
            url: None,
            language_type: None,
            detect_direction: false,
        }
    }

    /// Recognize an image fetched by Baidu from a public URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            image: None,
            url: Some(url.into()),
            language_type: None,
            detect_direction: false,
        }
    }

    /// Restrict recognition to a language, e.g. `CHN_ENG` or `ENG`.
    pub fn language_type(mut self, language: impl Into<String>) -> Self {
        self.language_type = Some(language.into());
        self
    }

    /// Ask the service to detect and correct image orientation.
    pub fn detect_direction(mut self) -> Self {
        self.detect_direction = true;
        self
    }

    fn form_params(&self) -> Vec<(&str, &str)> {
        let mut params = Vec::new();
        if let Some(ref image) = self.image {
            params.push(("image", image.as_str()));
        }
        if let Some(ref url) = self.url {
            params.push(("url", url.as_str()));
        }
        if let Some(ref language) = self.language_type {
            params.push(("language_type", language.as_str()));
        }
        if self.detect_direction {
            params.push(("detect_direction", "true"));
        }
        params
    }
}

/// A single recognized line of text.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OcrWord {
    #[serde(default)]
    pub words: String,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Response shared by the general OCR endpoints.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OcrResponse {
    #[serde(default)]
    pub(crate) error_code: i64,
    #[serde(default)]
    pub(crate) error_msg: String,
    #[serde(default)]
    pub log_id: u64,
    #[serde(default)]
    pub words_result_num: u32,
    #[serde(default)]
    pub words_result: Vec<OcrWord>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl BaiduApiResponse for OcrResponse {
    fn error_code(&self) -> i64 {
        self.error_code
    }

    fn error_msg(&self) -> &str {
        &self.error_msg
    }
}

/// ID card and bank card OCR return structured fields rather than plain
/// word lines; the payload stays open-ended here.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CardOcrResponse {
    #[serde(default)]
    pub(crate) error_code: i64,
    #[serde(default)]
    pub(crate) error_msg: String,
    #[serde(default)]
    pub log_id: u64,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl BaiduApiResponse for CardOcrResponse {
    fn error_code(&self) -> i64 {
        self.error_code
    }

    fn error_msg(&self) -> &str {
        &self.error_msg
    }
}

pub struct OcrApi {
    context: Arc<BaiduContext>,
}

impl OcrApi {
    pub fn new(context: Arc<BaiduContext>) -> Self {
        Self { context }
    }

    /// General text recognition, standard accuracy.
    pub async fn general_basic(&self, request: &OcrRequest) -> Result<OcrResponse, BaiduError> {
        self.post_ocr("/rest/2.0/ocr/v1/general_basic", request).await
    }

    /// General text recognition, high accuracy. Lower quota, better
    /// results on dense or small text.
    pub async fn accurate_basic(&self, request: &OcrRequest) -> Result<OcrResponse, BaiduError> {
        self.post_ocr("/rest/2.0/ocr/v1/accurate_basic", request).await
    }

    /// Web image text recognition, tuned for screenshots and memes.
    pub async fn web_image(&self, request: &OcrRequest) -> Result<OcrResponse, BaiduError> {
        self.post_ocr("/rest/2.0/ocr/v1/webimage", request).await
    }

    /// ID card recognition.
    ///
    /// `id_card_side` is `front` for the portrait side and `back` for
    /// the issue-date side.
    pub async fn idcard(
        &self,
        request: &OcrRequest,
        id_card_side: &str,
    ) -> Result<CardOcrResponse, BaiduError> {
        let mut params = request.form_params();
        params.push(("id_card_side", id_card_side));
        let response: CardOcrResponse = self
            .context
            .post_form("/rest/2.0/ocr/v1/idcard", &params)
            .await?;
        response.check()?;
        Ok(response)
    }

    /// Bank card recognition.
    pub async fn bankcard(&self, request: &OcrRequest) -> Result<CardOcrResponse, BaiduError> {
        let params = request.form_params();
        let response: CardOcrResponse = self
            .context
            .post_form("/rest/2.0/ocr/v1/bankcard", &params)
            .await?;
        response.check()?;
        Ok(response)
    }

    async fn post_ocr(
        &self,
        endpoint: &str,
        request: &OcrRequest,
    ) -> Result<OcrResponse, BaiduError> {
        let params = request.form_params();
        let response: OcrResponse = self.context.post_form(endpoint, &params).await?;
        response.check()?;
        Ok(response)
    }
}

impl BaiduApi for OcrApi {
    fn context(&self) -> &BaiduContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "ocr"
    }
}
