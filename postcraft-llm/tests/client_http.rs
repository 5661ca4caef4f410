//! HTTP behaviour of [`LlmClient`] against a mock completions server.
//!
//! The mock server runs on its own thread; the tokio runtime here only
//! drives its setup and inspection. The blocking client is always called
//! outside `block_on`.

use std::time::Duration;

use postcraft_core::config::LlmConfig;
use postcraft_core::Credential;
use postcraft_llm::{CompletionProvider, LlmClient, LlmProvider, LlmRequest, RemoteServiceError};
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "sk-or-v1-test-key-0000";

fn start(rt: &Runtime, response: ResponseTemplate) -> MockServer {
    rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("authorization", format!("Bearer {KEY}").as_str()))
            .respond_with(response)
            .mount(&server)
            .await;
        server
    })
}

fn client_for(server: &MockServer, timeout: Option<Duration>) -> LlmClient {
    LlmClient::new(
        LlmProvider::OpenAiCompatible {
            base_url: format!("{}/api/v1/", server.uri()),
            api_key: Credential::new(KEY),
        },
        timeout,
    )
    .expect("client")
}

fn request() -> LlmRequest {
    LlmRequest::new("Write a caption", "deepseek/deepseek-chat-v3-0324", 256)
}

#[test]
fn success_returns_first_choice_text() {
    let rt = Runtime::new().expect("runtime");
    let server = start(
        &rt,
        ResponseTemplate::new(200).set_body_json(json!({
            "model": "deepseek/deepseek-chat-v3-0324",
            "choices": [{"message": {"role": "assistant", "content": "1. Caption:\n   Description: Hi"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 7}
        })),
    );

    let resp = client_for(&server, None).complete(&request()).expect("completion");
    assert_eq!(resp.text, "1. Caption:\n   Description: Hi");
    assert_eq!(resp.tokens_generated, Some(7));
    assert_eq!(resp.model, "deepseek/deepseek-chat-v3-0324");

    let received = rt.block_on(server.received_requests()).expect("recording enabled");
    assert_eq!(received.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).expect("json body");
    assert_eq!(body["model"], "deepseek/deepseek-chat-v3-0324");
    assert_eq!(body["max_tokens"], 256);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "Write a caption");
    assert!(body.get("temperature").is_none());
}

#[test]
fn temperature_is_sent_when_set() {
    let rt = Runtime::new().expect("runtime");
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"temperature": 0.25})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "ok"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let client = LlmClient::new(
        LlmProvider::OpenAiCompatible {
            base_url: server.uri(),
            api_key: Credential::new(KEY),
        },
        None,
    )
    .expect("client");
    let resp = client
        .complete(&request().with_temperature(Some(0.25)))
        .expect("completion");
    assert_eq!(resp.text, "ok");
    assert_eq!(resp.tokens_generated, None);
    assert_eq!(resp.model, "deepseek/deepseek-chat-v3-0324");
}

#[test]
fn error_status_is_reported_with_body() {
    let rt = Runtime::new().expect("runtime");
    let server = start(
        &rt,
        ResponseTemplate::new(401).set_body_string("{\"error\":{\"message\":\"No auth credentials found\"}}"),
    );

    let err = client_for(&server, None).complete(&request()).expect_err("401");
    match err {
        RemoteServiceError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("No auth credentials found"));
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[test]
fn unexpected_success_body_is_malformed() {
    let rt = Runtime::new().expect("runtime");
    for body in [json!({"choices": []}), json!({"result": "text"}), json!({"choices": [{"message": {}}]})] {
        let server = start(&rt, ResponseTemplate::new(200).set_body_json(body));
        let err = client_for(&server, None).complete(&request()).expect_err("malformed");
        assert!(matches!(err, RemoteServiceError::MalformedResponse(_)), "{err:?}");
    }

    let server = start(&rt, ResponseTemplate::new(200).set_body_string("<html>gateway</html>"));
    let err = client_for(&server, None).complete(&request()).expect_err("not json");
    assert!(matches!(err, RemoteServiceError::MalformedResponse(_)));
}

#[test]
fn slow_server_times_out() {
    let rt = Runtime::new().expect("runtime");
    let server = start(
        &rt,
        ResponseTemplate::new(200)
            .set_body_json(json!({"choices": [{"message": {"content": "late"}}]}))
            .set_delay(Duration::from_secs(3)),
    );

    let err = client_for(&server, Some(Duration::from_millis(200)))
        .complete(&request())
        .expect_err("timeout");
    assert!(err.is_timeout(), "{err:?}");
}

#[test]
fn unreachable_host_is_a_request_error() {
    let client = LlmClient::new(
        LlmProvider::OpenAiCompatible {
            base_url: "http://127.0.0.1:9".into(),
            api_key: Credential::new(KEY),
        },
        Some(Duration::from_secs(2)),
    )
    .expect("client");
    let err = client.complete(&request()).expect_err("connection refused");
    assert!(matches!(err, RemoteServiceError::Request(_)));
}

#[test]
fn client_from_config_uses_base_url() {
    let rt = Runtime::new().expect("runtime");
    let server = start(
        &rt,
        ResponseTemplate::new(200).set_body_json(json!({"choices": [{"message": {"content": "from config"}}]})),
    );

    let config = LlmConfig {
        base_url: format!("{}/api/v1", server.uri()),
        request_timeout_secs: Some(5),
        ..LlmConfig::default()
    };
    let client = LlmClient::from_config(&config, Credential::new(KEY)).expect("client");
    assert_eq!(client.complete(&request()).expect("completion").text, "from config");
}
