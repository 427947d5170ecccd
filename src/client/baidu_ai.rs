//! Unified Baidu AI SDK client

use std::sync::Arc;

use crate::api::censor::{CensorApi, CensorResponse};
use crate::api::face::{
    FaceApi, FaceDetectRequest, FaceDetectResult, FaceImage, FaceMatchResult, FaceResponse,
};
use crate::api::nlp::{LexerResponse, NlpApi, SentimentResponse};
use crate::api::ocr::{CardOcrResponse, OcrApi, OcrRequest, OcrResponse};
use crate::api::BaiduContext;
use crate::error::BaiduError;

/// Unified Baidu AI client
///
/// This is the main entry point for the SDK. It provides access to the
/// wrapped Baidu AI services through a single handle.
///
/// # Example
///
/// ```rust,ignore
/// use baidu_ai_sdk::BaiduAi;
/// use baidu_ai_sdk::types::{ApiKey, SecretKey};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let baidu = BaiduAi::builder()
///         .api_key(ApiKey::new("your_api_key")?)
///         .secret_key(SecretKey::new("your_secret_key")?)
///         .build()?;
///
///     let request = baidu_ai_sdk::api::ocr::OcrRequest::from_url("https://example.com/receipt.png");
///     let response = baidu.general_ocr(&request).await?;
///     for line in &response.words_result {
///         println!("{}", line.words);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct BaiduAi {
    context: Arc<BaiduContext>,
}

impl BaiduAi {
    pub fn builder() -> super::builder::BaiduAiBuilder {
        super::builder::BaiduAiBuilder::default()
    }

    pub fn api_key(&self) -> &str {
        self.context.client().api_key()
    }

    pub async fn get_access_token(&self) -> Result<String, BaiduError> {
        self.context.token_manager().get_token().await
    }

    pub async fn invalidate_token(&self) -> Result<(), BaiduError> {
        self.context.token_manager().invalidate().await
    }

    // API handles

    pub fn ocr(&self) -> OcrApi {
        OcrApi::new(self.context.clone())
    }

    pub fn censor(&self) -> CensorApi {
        CensorApi::new(self.context.clone())
    }

    pub fn face(&self) -> FaceApi {
        FaceApi::new(self.context.clone())
    }

    pub fn nlp(&self) -> NlpApi {
        NlpApi::new(self.context.clone())
    }

    // OCR API

    pub async fn general_ocr(&self, request: &OcrRequest) -> Result<OcrResponse, BaiduError> {
        self.ocr().general_basic(request).await
    }

    pub async fn accurate_ocr(&self, request: &OcrRequest) -> Result<OcrResponse, BaiduError> {
        self.ocr().accurate_basic(request).await
    }

    pub async fn idcard_ocr(
        &self,
        request: &OcrRequest,
        id_card_side: &str,
    ) -> Result<CardOcrResponse, BaiduError> {
        self.ocr().idcard(request, id_card_side).await
    }

    pub async fn bankcard_ocr(&self, request: &OcrRequest) -> Result<CardOcrResponse, BaiduError> {
        self.ocr().bankcard(request).await
    }

    // Censor API

    pub async fn text_censor(&self, text: &str) -> Result<CensorResponse, BaiduError> {
        self.censor().text_censor(text).await
    }

    pub async fn image_censor(&self, image: &[u8]) -> Result<CensorResponse, BaiduError> {
        self.censor().image_censor(image).await
    }

    // Face API

    pub async fn face_detect(
        &self,
        request: &FaceDetectRequest,
    ) -> Result<FaceResponse<FaceDetectResult>, BaiduError> {
        self.face().detect(request).await
    }

    pub async fn face_match(
        &self,
        first: &FaceImage,
        second: &FaceImage,
    ) -> Result<FaceResponse<FaceMatchResult>, BaiduError> {
        self.face().face_match(first, second).await
    }

    // NLP API

    pub async fn lexer(&self, text: &str) -> Result<LexerResponse, BaiduError> {
        self.nlp().lexer(text).await
    }

    pub async fn sentiment_classify(&self, text: &str) -> Result<SentimentResponse, BaiduError> {
        self.nlp().sentiment_classify(text).await
    }
}

impl From<Arc<BaiduContext>> for BaiduAi {
    fn from(context: Arc<BaiduContext>) -> Self {
        Self { context }
    }
}

impl std::fmt::Debug for BaiduAi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaiduAi")
            .field("api_key", &self.api_key())
            .finish_non_exhaustive()
    }
}
