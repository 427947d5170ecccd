//! Face recognition API (v3)
//!
//! Unlike the OCR and censor endpoints, face v3 takes JSON bodies and
//! nests its payload under a `result` object. The envelope is always
//! present; `error_msg` is `"SUCCESS"` on success.

use std::collections::HashMap;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{BaiduApi, BaiduApiResponse, BaiduContext};
use crate::error::BaiduError;

/// How the `image` field should be interpreted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageType {
    #[serde(rename = "BASE64")]
    Base64,
    #[serde(rename = "URL")]
    Url,
    #[serde(rename = "FACE_TOKEN")]
    FaceToken,
}

/// One face image reference, used by both detect and match.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize)]
pub struct FaceImage {
    pub image: String,
    pub image_type: ImageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_control: Option<String>,
}

impl FaceImage {
    /// Reference raw image bytes; encoded to base64.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self {
            image: BASE64.encode(data),
            image_type: ImageType::Base64,
            face_type: None,
            quality_control: None,
        }
    }

    /// Reference an image by public URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            image: url.into(),
            image_type: ImageType::Url,
            face_type: None,
            quality_control: None,
        }
    }

    /// Reference a face token returned by an earlier detect call.
    pub fn from_face_token(token: impl Into<String>) -> Self {
        Self {
            image: token.into(),
            image_type: ImageType::FaceToken,
            face_type: None,
            quality_control: None,
        }
    }

    /// Set the quality filter, e.g. `LOW` or `NORMAL`.
    pub fn quality_control(mut self, level: impl Into<String>) -> Self {
        self.quality_control = Some(level.into());
        self
    }
}

/// Detect request body.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize)]
pub struct FaceDetectRequest {
    #[serde(flatten)]
    pub image: FaceImage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_face_num: Option<u32>,
}

impl FaceDetectRequest {
    pub fn new(image: FaceImage) -> Self {
        Self {
            image,
            face_field: None,
            max_face_num: None,
        }
    }

    /// Comma-separated extra attributes to compute, e.g. `age,beauty`.
    pub fn face_field(mut self, fields: impl Into<String>) -> Self {
        self.face_field = Some(fields.into());
        self
    }

    pub fn max_face_num(mut self, max: u32) -> Self {
        self.max_face_num = Some(max);
        self
    }
}

/// Payload of a detect response, nested under `result`.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FaceDetectResult {
    #[serde(default)]
    pub face_num: u32,
    #[serde(default)]
    pub face_list: Vec<Value>,
}

/// Payload of a match response, nested under `result`.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FaceMatchResult {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub face_list: Vec<Value>,
}

/// Face v3 response envelope with a typed `result` payload.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FaceResponse<R> {
    #[serde(default)]
    pub(crate) error_code: i64,
    #[serde(default)]
    pub(crate) error_msg: String,
    #[serde(default)]
    pub log_id: u64,
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    pub cached: i32,
    pub result: Option<R>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl<R> BaiduApiResponse for FaceResponse<R> {
    fn error_code(&self) -> i64 {
        self.error_code
    }

    fn error_msg(&self) -> &str {
        &self.error_msg
    }
}

pub struct FaceApi {
    context: Arc<BaiduContext>,
}

impl FaceApi {
    pub fn new(context: Arc<BaiduContext>) -> Self {
        Self { context }
    }

    /// Detect faces and their attributes in one image.
    pub async fn detect(
        &self,
        request: &FaceDetectRequest,
    ) -> Result<FaceResponse<FaceDetectResult>, BaiduError> {
        let response: FaceResponse<FaceDetectResult> = self
            .context
            .post_json("/rest/2.0/face/v3/detect", request)
            .await?;
        response.check()?;
        Ok(response)
    }

    /// Compare two faces and score their similarity.
    ///
    /// The service takes a JSON array body, one entry per image.
    pub async fn face_match(
        &self,
        first: &FaceImage,
        second: &FaceImage,
    ) -> Result<FaceResponse<FaceMatchResult>, BaiduError> {
        let body = [first, second];
        let response: FaceResponse<FaceMatchResult> = self
            .context
            .post_json("/rest/2.0/face/v3/match", &body)
            .await?;
        response.check()?;
        Ok(response)
    }
}

impl BaiduApi for FaceApi {
    fn context(&self) -> &BaiduContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "face"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_request_serializes_flattened_image() {
        let request = FaceDetectRequest::new(FaceImage::from_url("https://example.com/p.jpg"))
            .face_field("age,beauty")
            .max_face_num(3);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["image"], "https://example.com/p.jpg");
        assert_eq!(json["image_type"], "URL");
        assert_eq!(json["face_field"], "age,beauty");
        assert_eq!(json["max_face_num"], 3);
    }

    #[test]
    fn image_from_bytes_is_base64() {
        let image = FaceImage::from_bytes(b"pixels");
        assert_eq!(image.image_type, ImageType::Base64);
        assert_eq!(BASE64.decode(&image.image).unwrap(), b"pixels");
    }

    #[test]
    fn detect_response_parses_result() {
        let json = r#"{
            "error_code": 0,
            "error_msg": "SUCCESS",
            "log_id": 1234567890123,
            "timestamp": 1700000000,
            "cached": 0,
            "result": {
                "face_num": 1,
                "face_list": [{"face_token": "abcdef", "face_probability": 1.0}]
            }
        }"#;
        let response: FaceResponse<FaceDetectResult> = serde_json::from_str(json).unwrap();
        assert!(response.is_success());
        let result = response.result.unwrap();
        assert_eq!(result.face_num, 1);
        assert_eq!(result.face_list.len(), 1);
    }

    #[test]
    fn match_response_parses_score() {
        let json = r#"{
            "error_code": 0,
            "error_msg": "SUCCESS",
            "log_id": 1,
            "result": {"score": 87.3, "face_list": []}
        }"#;
        let response: FaceResponse<FaceMatchResult> = serde_json::from_str(json).unwrap();
        assert!((response.result.unwrap().score - 87.3).abs() < f64::EPSILON);
    }

    #[test]
    fn error_response_has_no_result() {
        let json = r#"{
            "error_code": 222202,
            "error_msg": "pic not has face",
            "log_id": 2,
            "result": null
        }"#;
        let response: FaceResponse<FaceDetectResult> = serde_json::from_str(json).unwrap();
        assert!(response.result.is_none());
        assert!(response.check().is_err());
    }
}
