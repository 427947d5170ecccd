//! Common API response primitives
//!
//! Shared types and traits for Baidu AI request/response patterns.
//!
//! ## Overview
//!
//! Every Baidu AI endpoint embeds the same envelope in its JSON response:
//! `error_code`, `log_id` and `error_msg`, with endpoint-specific fields
//! merged at the same level. This module provides:
//!
//! - [`BaiduApiResponse`] trait for uniform error_code/error_msg checking
//! - [`ReplyBase`] struct for envelope-only responses
//! - [`Reply`] generic wrapper pairing the envelope with a typed payload
//!
//! ## Usage
//!
//! ```rust
//! use baidu_ai_sdk::api::common::{BaiduApiResponse, ReplyBase};
//!
//! let json = r#"{"error_code": 0, "log_id": 1, "error_msg": ""}"#;
//! let reply: ReplyBase = serde_json::from_str(json).unwrap();
//! assert!(reply.check().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::BaiduError;

/// Trait for Baidu API responses that carry the `error_code` / `error_msg`
/// envelope.
///
/// Implement this on any response struct that includes the standard
/// envelope fields. `error_code == 0` is the only success state; callers
/// must [`check`](BaiduApiResponse::check) before trusting the payload.
pub trait BaiduApiResponse {
    /// Returns the envelope error code.
    ///
    /// `0` indicates success; any other value is an error.
    fn error_code(&self) -> i64;

    /// Returns the envelope error message.
    fn error_msg(&self) -> &str;

    /// Check the response for API errors.
    ///
    /// Returns `Ok(())` when `error_code == 0`, otherwise returns
    /// `BaiduError::Api` with the code and message.
    fn check(&self) -> Result<(), BaiduError> {
        BaiduError::check_api(self.error_code(), self.error_msg())
    }

    /// Returns `true` when the response indicates success.
    fn is_success(&self) -> bool {
        self.error_code() == 0
    }
}

/// Minimal response carrying only the envelope fields.
///
/// Use this for endpoints that return no data beyond success/failure, or
/// to inspect the envelope before attempting a full parse.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReplyBase {
    /// Error code (`0` = success)
    #[serde(default)]
    pub error_code: i64,
    /// Request id assigned by Baidu, for support tickets
    #[serde(default)]
    pub log_id: u64,
    /// Error message
    #[serde(default)]
    pub error_msg: String,
}

impl ReplyBase {
    /// Create a success envelope.
    pub fn success() -> Self {
        Self {
            error_code: 0,
            log_id: 0,
            error_msg: String::new(),
        }
    }

    /// Create an error envelope with the given code and message.
    pub fn error(code: i64, message: impl Into<String>) -> Self {
        Self {
            error_code: code,
            log_id: 0,
            error_msg: message.into(),
        }
    }
}

impl BaiduApiResponse for ReplyBase {
    fn error_code(&self) -> i64 {
        self.error_code
    }

    fn error_msg(&self) -> &str {
        &self.error_msg
    }
}

/// Envelope plus a typed, endpoint-specific payload.
///
/// The payload fields live at the same JSON level as the envelope, so the
/// payload is flattened rather than nested. On error responses the
/// endpoint fields are absent and `payload` is `None`.
///
/// # Example
///
/// ```rust
/// use baidu_ai_sdk::api::common::{BaiduApiResponse, Reply};
///
/// #[derive(serde::Deserialize)]
/// struct Echo {
///     result: String,
/// }
///
/// let json = r#"{"error_code": 0, "log_id": 1, "result": "ok"}"#;
/// let reply: Reply<Echo> = serde_json::from_str(json).unwrap();
/// assert!(reply.is_success());
/// assert_eq!(reply.payload.unwrap().result, "ok");
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Reply<T> {
    /// Error code (`0` = success)
    #[serde(default)]
    pub error_code: i64,
    /// Request id assigned by Baidu
    #[serde(default)]
    pub log_id: u64,
    /// Error message
    #[serde(default)]
    pub error_msg: String,
    /// Endpoint-specific fields, flattened alongside the envelope
    #[serde(flatten)]
    pub payload: Option<T>,
}

impl<T> Reply<T> {
    /// Unwrap the payload, turning a non-zero envelope or a missing
    /// payload into an error.
    pub fn into_payload(self) -> Result<T, BaiduError> {
        BaiduError::check_api(self.error_code, &self.error_msg)?;
        self.payload.ok_or_else(|| {
            BaiduError::Json(serde::de::Error::custom("response payload missing"))
        })
    }
}

impl<T> BaiduApiResponse for Reply<T> {
    fn error_code(&self) -> i64 {
        self.error_code
    }

    fn error_msg(&self) -> &str {
        &self.error_msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Echo {
        result: String,
    }

    #[test]
    fn reply_base_success_parse() {
        let json = r#"{"error_code": 0, "log_id": 123456789, "error_msg": ""}"#;
        let reply: ReplyBase = serde_json::from_str(json).unwrap();
        assert!(reply.is_success());
        assert_eq!(reply.log_id, 123456789);
    }

    #[test]
    fn reply_base_error_parse() {
        let json = r#"{"error_code": 17, "error_msg": "Open api daily request limit reached"}"#;
        let reply: ReplyBase = serde_json::from_str(json).unwrap();
        assert!(!reply.is_success());
        assert!(reply.check().is_err());
    }

    #[test]
    fn reply_base_defaults_missing_fields() {
        let reply: ReplyBase = serde_json::from_str("{}").unwrap();
        assert_eq!(reply.error_code, 0);
        assert_eq!(reply.log_id, 0);
        assert!(reply.error_msg.is_empty());
    }

    #[test]
    fn reply_flattens_payload() {
        let json = r#"{"error_code": 0, "log_id": 1, "result": "ok"}"#;
        let reply: Reply<Echo> = serde_json::from_str(json).unwrap();
        assert!(reply.is_success());
        assert_eq!(reply.payload.unwrap().result, "ok");
    }

    #[test]
    fn reply_error_has_no_payload() {
        let json = r#"{"error_code": 17, "error_msg": "quota exceeded"}"#;
        let reply: Reply<Echo> = serde_json::from_str(json).unwrap();
        assert!(reply.payload.is_none());

        let err = reply.into_payload().unwrap_err();
        match err {
            BaiduError::Api { code, message } => {
                assert_eq!(code, 17);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn into_payload_returns_typed_result() {
        let json = r#"{"error_code": 0, "log_id": 1, "result": "ok"}"#;
        let reply: Reply<Echo> = serde_json::from_str(json).unwrap();
        assert_eq!(reply.into_payload().unwrap().result, "ok");
    }
}
