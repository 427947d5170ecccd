use thiserror::Error;

/// Baidu AI SDK error types
#[derive(Debug, Error)]
pub enum BaiduError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Baidu API error (code={code}): {message}")]
    Api { code: i64, message: String },

    #[error("Access token error: {0}")]
    Token(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// API error code returned when the per-second request quota is exhausted.
pub const ERROR_CODE_QPS_LIMIT: i64 = 18;

impl BaiduError {
    /// Check an envelope error code, returning `Api` for non-zero codes.
    ///
    /// Every decoded response goes through this: `error_code == 0` is the
    /// only success state.
    pub fn check_api(code: i64, message: &str) -> Result<(), BaiduError> {
        if code == 0 {
            Ok(())
        } else {
            Err(BaiduError::Api {
                code,
                message: message.to_string(),
            })
        }
    }

    /// Whether a retry of the same request could plausibly succeed.
    ///
    /// Used by the retry middleware; the dispatch path itself never
    /// retries.
    pub fn is_transient(&self) -> bool {
        match self {
            BaiduError::Http(e) => e.is_timeout() || e.is_connect(),
            BaiduError::Api { code, .. } => *code == ERROR_CODE_QPS_LIMIT,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_api_zero_is_ok() {
        assert!(BaiduError::check_api(0, "").is_ok());
    }

    #[test]
    fn check_api_nonzero_carries_code_and_message() {
        let err = BaiduError::check_api(17, "quota exceeded").unwrap_err();
        match err {
            BaiduError::Api { code, message } => {
                assert_eq!(code, 17);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn api_error_display_includes_code() {
        let err = BaiduError::Api {
            code: 17,
            message: "quota exceeded".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("17"));
        assert!(rendered.contains("quota exceeded"));
    }

    #[test]
    fn qps_limit_is_transient() {
        let err = BaiduError::Api {
            code: ERROR_CODE_QPS_LIMIT,
            message: "Open api qps request limit reached".to_string(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn config_error_is_not_transient() {
        let err = BaiduError::Config("api_key is required".to_string());
        assert!(!err.is_transient());
    }
}
