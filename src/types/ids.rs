use serde::{Deserialize, Serialize};

/// Baidu AI Cloud API Key (AK)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, String> {
        let key = key.into();
        if key.is_empty() {
            return Err("ApiKey must not be empty".to_string());
        }
        if key.chars().any(char::is_whitespace) {
            return Err("ApiKey must not contain whitespace".to_string());
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Baidu AI Cloud Secret Key (SK)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(key: impl Into<String>) -> Result<Self, String> {
        let key = key.into();
        if key.is_empty() {
            return Err("SecretKey must not be empty".to_string());
        }
        if key.chars().any(char::is_whitespace) {
            return Err("SecretKey must not contain whitespace".to_string());
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Baidu AI Cloud Access Token
///
/// Opaque bearer credential obtained from the OAuth token endpoint.
/// Never mutated after creation; the token manager replaces the whole
/// value on refresh.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Result<Self, String> {
        let token = token.into();
        if token.is_empty() {
            return Err("AccessToken must not be empty".to_string());
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
