//! Client behaviour against a mocked platform API

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use supermsg::{
    Client, ClientConfig, Clock, CreateMessageRequest, Error, ErrorKind, Member, MemoryCache,
    MessageContent, RequestTokenCache, SystemClock, UpdateMessageRequest,
};
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCESS_TOKEN: &str = "at-123";

fn client_for(server: &MockServer, cache: Option<Arc<MemoryCache>>) -> Client {
    let config = ClientConfig::new(ACCESS_TOKEN).with_api_host(server.uri());
    let cache = cache.map(|c| c as Arc<dyn RequestTokenCache>);
    Client::with_config(config, cache).unwrap()
}

fn member_body(open_id: &str, expired_at: i64) -> serde_json::Value {
    json!({
        "code": 0,
        "message": "",
        "data": {"channelCreator": true, "expiredAt": expired_at, "openID": open_id}
    })
}

async fn mount_verify(server: &MockServer, token: &str, body: serde_json::Value, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/user/verify"))
        .and(query_param("token", token))
        .and(query_param("accessToken", ACCESS_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn verified_token_is_cached() {
    let server = MockServer::start().await;
    let expired_at = SystemClock.now() + 3600;
    mount_verify(&server, "rt1", member_body("ou_1", expired_at), 1).await;

    let cache = Arc::new(MemoryCache::new());
    let client = client_for(&server, Some(cache.clone()));

    let first = client.verify_request_token("rt1").await.unwrap();
    assert_eq!(first.open_id, "ou_1");
    assert!(first.channel_creator);
    assert_eq!(first.expired_at, expired_at);

    let second = client.verify_request_token("rt1").await.unwrap();
    assert_eq!(second, first);
    assert_eq!(cache.get("rt1").await, Some(first));
}

#[tokio::test]
async fn near_expiry_token_is_not_cached() {
    let server = MockServer::start().await;
    mount_verify(&server, "rt1", member_body("ou_1", SystemClock.now() + 5), 2).await;

    let cache = Arc::new(MemoryCache::new());
    let client = client_for(&server, Some(cache.clone()));

    client.verify_request_token("rt1").await.unwrap();
    client.verify_request_token("rt1").await.unwrap();
    assert!(cache.is_empty());
}

#[tokio::test]
async fn anonymous_member_is_not_cached() {
    let server = MockServer::start().await;
    mount_verify(&server, "rt1", member_body("", SystemClock.now() + 3600), 1).await;

    let cache = Arc::new(MemoryCache::new());
    let client = client_for(&server, Some(cache.clone()));

    let member = client.verify_request_token("rt1").await.unwrap();
    assert!(member.open_id.is_empty());
    assert!(cache.is_empty());
}

#[tokio::test]
async fn without_cache_every_call_reaches_platform() {
    let server = MockServer::start().await;
    mount_verify(&server, "rt1", member_body("ou_1", SystemClock.now() + 3600), 2).await;

    let client = client_for(&server, None);
    client.verify_request_token("rt1").await.unwrap();
    client.verify_request_token("rt1").await.unwrap();
}

/// Cache whose writes always fail
#[derive(Debug, Default)]
struct FailingCache {
    writes: AtomicUsize,
}

#[async_trait]
impl RequestTokenCache for FailingCache {
    async fn get(&self, _token: &str) -> Option<Member> {
        None
    }

    async fn set(&self, _token: &str, _member: Member) -> supermsg::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(Error::storage("failing", "backend unavailable"))
    }

    async fn delete(&self, _token: &str) {}
}

#[tokio::test]
async fn cache_write_failure_does_not_fail_verification() {
    let server = MockServer::start().await;
    mount_verify(&server, "rt1", member_body("ou_1", SystemClock.now() + 3600), 2).await;

    let cache = Arc::new(FailingCache::default());
    let config = ClientConfig::new(ACCESS_TOKEN).with_api_host(server.uri());
    let shared: Arc<dyn RequestTokenCache> = cache.clone();
    let client = Client::with_config(config, Some(shared)).unwrap();

    let first = client.verify_request_token("rt1").await.unwrap();
    assert_eq!(first.open_id, "ou_1");
    let second = client.verify_request_token("rt1").await.unwrap();
    assert_eq!(second, first);
    assert_eq!(cache.writes.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn invalid_token_is_a_business_error() {
    let server = MockServer::start().await;
    mount_verify(
        &server,
        "bad",
        json!({"code": 10001, "message": "invalid request token"}),
        1,
    )
    .await;

    let cache = Arc::new(MemoryCache::new());
    let client = client_for(&server, Some(cache.clone()));

    let err = client.verify_request_token("bad").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Business);
    assert!(err.is_invalid_request_token());
    let api = err.api_error().unwrap();
    assert_eq!(api.code, 10001);
    assert_eq!(api.message, "invalid request token");
    assert!(cache.is_empty());
}

#[tokio::test]
async fn other_business_codes_are_not_auth_failures() {
    let server = MockServer::start().await;
    mount_verify(&server, "rt1", json!({"code": 20003, "message": "channel disabled"}), 1).await;

    let err = client_for(&server, None)
        .verify_request_token("rt1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Business);
    assert!(!err.is_invalid_request_token());
}

#[tokio::test]
async fn unexpected_status_is_infrastructure_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/user/verify"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .verify_request_token("rt1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Infrastructure);
    assert!(matches!(err, Error::UnexpectedStatus { status: 502, .. }));
}

#[tokio::test]
async fn malformed_body_is_infrastructure_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/user/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .verify_request_token("rt1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Infrastructure);
    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[tokio::test]
async fn success_without_data_is_malformed() {
    let server = MockServer::start().await;
    mount_verify(&server, "rt1", json!({"code": 0, "message": ""}), 1).await;

    let err = client_for(&server, None)
        .verify_request_token("rt1")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    let config = ClientConfig::new(ACCESS_TOKEN).with_api_host("http://127.0.0.1:9");
    let client = Client::with_config(config, None).unwrap();

    let err = client.verify_request_token("rt1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Infrastructure);
}

#[tokio::test]
async fn timeout_is_infrastructure_error_and_caches_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/user/verify"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(member_body("ou_1", SystemClock.now() + 3600))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let cache = Arc::new(MemoryCache::new());
    let client = client_for(&server, Some(cache.clone()));

    let err = client
        .verify_request_token_with_timeout("rt1", Duration::from_millis(100))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }));
    assert_eq!(err.kind(), ErrorKind::Infrastructure);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn authenticate_decodes_and_verifies() {
    let server = MockServer::start().await;
    mount_verify(&server, "rt1", member_body("ou_7", SystemClock.now() + 3600), 1).await;

    let client = client_for(&server, None);
    let auth = client
        .authenticate("rt=rt1&rte=9999999999&cid=chan1&id=12&lid=3&tid=todo&tv=2")
        .await
        .unwrap();
    assert_eq!(auth.member.open_id, "ou_7");
    assert_eq!(auth.context.channel_id, "chan1");
    assert_eq!(auth.context.message_id, 12);
}

#[tokio::test]
async fn create_message_returns_assigned_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(query_param("accessToken", ACCESS_TOKEN))
        .and(body_json(json!({
            "recipients": [],
            "toAll": true,
            "templateID": "tpl",
            "templateVersion": 1,
            "title": "Hello",
            "data": {"n": 1}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": 0, "message": "", "data": {"id": 123}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let content = MessageContent::new(" tpl ", 1, " Hello ")
        .with_data(&json!({"n": 1}))
        .unwrap();
    let id = client_for(&server, None)
        .create_message(CreateMessageRequest::to_all(content))
        .await
        .unwrap();
    assert_eq!(id, 123);
}

#[tokio::test]
async fn invalid_message_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .create_message(CreateMessageRequest::to_all(MessageContent::new("tpl", 0, "t")))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn update_message_sends_id() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({"ID": 77, "templateID": "tpl", "title": "New"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0, "message": ""})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server, None)
        .update_message(UpdateMessageRequest::new(77, MessageContent::new("tpl", 1, "New")))
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_message_passes_id_in_query() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/messages"))
        .and(query_param("id", "5"))
        .and(query_param("accessToken", ACCESS_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0, "message": ""})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server, None).delete_message(5).await.unwrap();
}

#[tokio::test]
async fn delete_message_business_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": 30004, "message": "message not found"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server, None).delete_message(5).await.unwrap_err();
    assert_eq!(err.api_error().map(|e| e.code), Some(30004));
}
