//! Token lifecycle tests against a mock OAuth endpoint.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use baidu_ai_sdk::token::{MemoryTokenStore, StoredToken, TokenManager, TokenStore};
use baidu_ai_sdk::types::{ApiKey, SecretKey};
use baidu_ai_sdk::{BaiduClient, BaiduError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(base_url: &str) -> BaiduClient {
    let api_key = ApiKey::new("K9mPqA7vWb3ZnXcR5tYdE2fG").unwrap();
    let secret_key = SecretKey::new("Gh2jK8LmN4pQr6StUv9WxYz1AbCdEfH3").unwrap();
    BaiduClient::builder()
        .api_key(api_key)
        .secret_key(secret_key)
        .base_url(base_url)
        .build()
        .unwrap()
}

fn now_epoch_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

#[tokio::test]
async fn test_token_fetch_sends_client_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/oauth/2.0/token"))
        .and(query_param("grant_type", "client_credentials"))
        .and(query_param("client_id", "K9mPqA7vWb3ZnXcR5tYdE2fG"))
        .and(query_param("client_secret", "Gh2jK8LmN4pQr6StUv9WxYz1AbCdEfH3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "24.fresh_token.2592000",
            "expires_in": 2592000,
            "session_key": "ignored",
            "scope": "public brain_ocr"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let manager = TokenManager::new(client);

    let token = manager.get_token().await.unwrap();
    assert_eq!(token, "24.fresh_token.2592000");
}

#[tokio::test]
async fn test_token_cached_across_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/oauth/2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "cached_token",
            "expires_in": 2592000
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let manager = TokenManager::new(client);

    let first = manager.get_token().await.unwrap();
    let second = manager.get_token().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_token_error_body_surfaces_as_token_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/oauth/2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "unknown client id"
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let manager = TokenManager::new(client);

    let err = manager.get_token().await.unwrap_err();
    match err {
        BaiduError::Token(message) => {
            assert!(message.contains("invalid_client"));
            assert!(message.contains("unknown client id"));
        }
        other => panic!("expected Token error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_concurrent_callers_fetch_once() {
    let mock_server = MockServer::start().await;

    let call_count = Arc::new(AtomicU32::new(0));
    let call_count_clone = Arc::clone(&call_count);

    Mock::given(method("GET"))
        .and(path("/oauth/2.0/token"))
        .respond_with(move |_request: &wiremock::Request| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "concurrent_test_token",
                "expires_in": 2592000
            }))
        })
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let manager = Arc::new(TokenManager::new(client));

    let manager1 = Arc::clone(&manager);
    let manager2 = Arc::clone(&manager);
    let manager3 = Arc::clone(&manager);
    let manager4 = Arc::clone(&manager);
    let manager5 = Arc::clone(&manager);

    let (r1, r2, r3, r4, r5) = tokio::join!(
        manager1.get_token(),
        manager2.get_token(),
        manager3.get_token(),
        manager4.get_token(),
        manager5.get_token()
    );

    for result in [r1, r2, r3, r4, r5] {
        assert_eq!(result.unwrap(), "concurrent_test_token");
    }

    assert_eq!(call_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_warm_store_avoids_network() {
    let mock_server = MockServer::start().await;
    // No mock mounted: any request to the token endpoint would 404 and
    // fail the fetch, so success proves the store satisfied the call.

    let store = Arc::new(MemoryTokenStore::new());
    store
        .save(&StoredToken {
            access_token: "persisted_token".to_string(),
            expires_at: now_epoch_secs() + 7200,
        })
        .unwrap();

    let client = create_test_client(&mock_server.uri());
    let manager = TokenManager::with_store(client, store);

    let token = manager.get_token().await.unwrap();
    assert_eq!(token, "persisted_token");
}

#[tokio::test]
async fn test_expired_store_entry_triggers_refresh() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/oauth/2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "refreshed_token",
            "expires_in": 2592000
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    store
        .save(&StoredToken {
            access_token: "stale_token".to_string(),
            expires_at: now_epoch_secs().saturating_sub(60),
        })
        .unwrap();

    let client = create_test_client(&mock_server.uri());
    let manager = TokenManager::with_store(client, Arc::clone(&store) as Arc<dyn TokenStore>);

    let token = manager.get_token().await.unwrap();
    assert_eq!(token, "refreshed_token");

    // Refresh writes the new state back through the store.
    let stored = store.load().unwrap().unwrap();
    assert_eq!(stored.access_token, "refreshed_token");
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let mock_server = MockServer::start().await;

    let call_count = Arc::new(AtomicU32::new(0));
    let call_count_clone = Arc::clone(&call_count);

    Mock::given(method("GET"))
        .and(path("/oauth/2.0/token"))
        .respond_with(move |_request: &wiremock::Request| {
            let n = call_count_clone.fetch_add(1, Ordering::SeqCst);
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": format!("token_{n}"),
                "expires_in": 2592000
            }))
        })
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let manager = TokenManager::new(client);

    assert_eq!(manager.get_token().await.unwrap(), "token_0");
    manager.invalidate().await.unwrap();
    assert_eq!(manager.get_token().await.unwrap(), "token_1");
    assert_eq!(call_count.load(Ordering::SeqCst), 2);
}
