mod support;

use cardvault_client::{ClientError, RawCardIn, StorageApiClient};
use pretty_assertions::assert_eq;
use support::*;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup(server: &MockServer) -> StorageApiClient {
    StorageApiClient::new(&config(server.uri())).unwrap()
}

// --- Auth ---

#[tokio::test]
async fn login_posts_form_and_returns_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = setup(&server).await;
    let token = client.login("alice", "CorrectHorse1").await.unwrap();
    assert_eq!(token.access_token, "tok-1");
    assert_eq!(token.token_type, "bearer");
}

#[tokio::test]
async fn login_401_is_auth_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "detail": "Incorrect credentials" })),
        )
        .mount(&server)
        .await;

    let client = setup(&server).await;
    let err = client.login("alice", "nope").await.unwrap_err();
    assert!(matches!(err, ClientError::AuthFailed(_)));
}

#[tokio::test]
async fn register_posts_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/register"))
        .and(body_json(serde_json::json!({ "username": "alice", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json()))
        .mount(&server)
        .await;

    let client = setup(&server).await;
    assert_eq!(client.register("alice", "pw").await.unwrap().access_token, "tok-1");
}

#[tokio::test]
async fn register_existing_user_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "detail": "Username exists" })),
        )
        .mount(&server)
        .await;

    let client = setup(&server).await;
    assert!(matches!(client.register("alice", "pw").await, Err(ClientError::AuthFailed(_))));
}

// --- Cards ---

#[tokio::test]
async fn create_card_sends_bearer_and_envelope_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cards"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(EchoCard { id: 7 })
        .expect(1)
        .mount(&server)
        .await;

    let client = setup(&server).await;
    let body = RawCardIn {
        label: Some("work".into()),
        enc_data_b64: "Y2lwaGVy".into(),
        nonce_b64: "AAAAAAAAAAAAAAAA".into(),
    };
    let out = client.create_card("tok-1", &body).await.unwrap();

    assert_eq!(out.id, 7);
    assert_eq!(out.label.as_deref(), Some("work"));
    assert_eq!(out.enc_data_b64, body.enc_data_b64);
    assert_eq!(out.nonce_b64, body.nonce_b64);
}

#[tokio::test]
async fn list_cards_parses_array() {
    let server = MockServer::start().await;
    let key = key_for("alice", "pw");
    let cards = vec![
        stored_card(1, Some("a"), &key, &test_card()),
        stored_card(2, None, &key, &test_card()),
    ];
    Mock::given(method("GET"))
        .and(path("/cards"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&cards))
        .mount(&server)
        .await;

    let client = setup(&server).await;
    assert_eq!(client.list_cards("tok-1").await.unwrap(), cards);
}

#[tokio::test]
async fn list_cards_with_bad_token_is_auth_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = setup(&server).await;
    assert!(matches!(client.list_cards("stale").await, Err(ClientError::AuthFailed(_))));
}

#[tokio::test]
async fn get_missing_card_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = setup(&server).await;
    let err = client.get_card("tok-1", 99).await.unwrap_err();
    assert_eq!(err.to_string(), "not found: card 99");
}

#[tokio::test]
async fn delete_card_ok_and_missing() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/cards/3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "detail": "deleted" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/cards/4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = setup(&server).await;
    client.delete_card("tok-1", 3).await.unwrap();
    assert!(matches!(client.delete_card("tok-1", 4).await, Err(ClientError::NotFound(_))));
}

#[tokio::test]
async fn server_error_is_api_error_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = setup(&server).await;
    let err = client.list_cards("tok-1").await.unwrap_err();
    match err {
        ClientError::Api(msg) => {
            assert!(msg.contains("500"), "{msg}");
            assert!(msg.contains("boom"), "{msg}");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
