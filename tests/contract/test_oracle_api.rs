use chokwadi::analyzer::{AnthropicBackend, OracleInvoker};
use chokwadi::analyzer::OpenAiBackend;
use chokwadi::error::ChokwadiError;
use chokwadi::models::ImageMediaType;
use chokwadi::providers::{ProviderConfig, ProviderKind, ProviderRegistry, ProviderSettings, SelectionMode};
use chokwadi::ContentAnalyzer;
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn anthropic_invoker(base_url: &str) -> OracleInvoker {
    let config = ProviderConfig::new(ProviderKind::Anthropic, Some("sk-ant-test".to_string()), "claude-test")
        .with_base_url(base_url);
    OracleInvoker::new(Duration::from_secs(10))
        .with_backend(Arc::new(AnthropicBackend::new(config, reqwest::Client::new())))
}

fn openai_invoker(base_url: &str) -> OracleInvoker {
    let config = ProviderConfig::new(ProviderKind::OpenAi, Some("sk-oai-test".to_string()), "gpt-test")
        .with_base_url(base_url);
    OracleInvoker::new(Duration::from_secs(10))
        .with_backend(Arc::new(OpenAiBackend::new(config, reqwest::Client::new())))
}

#[tokio::test]
async fn anthropic_text_request_format() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "sk-ant-test")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::PartialJson(json!({
            "model": "claude-test",
            "max_tokens": 1024,
            "system": "system prompt",
            "messages": [{ "role": "user", "content": "is this real?" }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "msg_01",
                "type": "message",
                "role": "assistant",
                "content": [
                    { "type": "text", "text": "🔍 *CHOKWADI AI*\n" },
                    { "type": "text", "text": "VERDICT: ❌ FALSE" }
                ],
                "stop_reason": "end_turn"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let text = anthropic_invoker(&server.url())
        .invoke_text(ProviderKind::Anthropic, "system prompt", "is this real?")
        .await
        .unwrap();

    assert_eq!(text, "🔍 *CHOKWADI AI*\nVERDICT: ❌ FALSE");
    mock.assert_async().await;
}

#[tokio::test]
async fn anthropic_vision_request_carries_base64_image() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/v1/messages")
        .match_body(Matcher::PartialJson(json!({
            "messages": [{
                "role": "user",
                "content": [
                    {
                        "type": "image",
                        "source": { "type": "base64", "media_type": "image/png", "data": "aGk=" }
                    },
                    { "type": "text" }
                ]
            }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "content": [{ "type": "text", "text": "image verdict" }] }).to_string())
        .create_async()
        .await;

    let text = anthropic_invoker(&server.url())
        .invoke_vision(ProviderKind::Anthropic, "system prompt", b"hi", ImageMediaType::Png)
        .await
        .unwrap();

    assert_eq!(text, "image verdict");
    mock.assert_async().await;
}

#[tokio::test]
async fn openai_text_request_format() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-oai-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-test",
            "max_tokens": 1024,
            "messages": [
                { "role": "system", "content": "system prompt" },
                { "role": "user", "content": "is this real?" }
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "chatcmpl-123",
                "object": "chat.completion",
                "model": "gpt-test",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": "VERDICT: ⚠️ MISLEADING" },
                    "finish_reason": "stop"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let text = openai_invoker(&server.url())
        .invoke_text(ProviderKind::OpenAi, "system prompt", "is this real?")
        .await
        .unwrap();

    assert_eq!(text, "VERDICT: ⚠️ MISLEADING");
    mock.assert_async().await;
}

#[tokio::test]
async fn error_status_becomes_provider_call_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body(r#"{"error":{"message":"Rate limit reached"}}"#)
        .create_async()
        .await;

    let err = openai_invoker(&server.url())
        .invoke_text(ProviderKind::OpenAi, "system prompt", "hello there")
        .await
        .unwrap_err();

    match err {
        ChokwadiError::ProviderCall { provider, reason } => {
            assert_eq!(provider, "openai");
            assert!(reason.contains("429"));
            assert!(reason.contains("Rate limit reached"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_body_becomes_provider_call_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not json")
        .create_async()
        .await;

    let err = anthropic_invoker(&server.url())
        .invoke_text(ProviderKind::Anthropic, "system prompt", "hello there")
        .await
        .unwrap_err();

    assert!(matches!(err, ChokwadiError::ProviderCall { ref provider, .. } if provider == "anthropic"));
}

#[tokio::test]
async fn analyzer_falls_back_across_real_backends() {
    let mut anthropic = Server::new_async().await;
    let mut openai = Server::new_async().await;

    let failing = anthropic
        .mock("POST", "/v1/messages")
        .with_status(529)
        .with_body(r#"{"type":"error","error":{"type":"overloaded_error"}}"#)
        .expect(1)
        .create_async()
        .await;

    let succeeding = openai
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "choices": [{ "message": { "content": "fallback verdict" } }] }).to_string())
        .expect(1)
        .create_async()
        .await;

    let mut settings = ProviderSettings::new(
        SelectionMode::Auto,
        Some("sk-ant-test".to_string()),
        Some("sk-oai-test".to_string()),
    )
    .with_timeout(10);
    settings.anthropic = settings.anthropic.clone().with_base_url(anthropic.url());
    settings.openai = settings.openai.clone().with_base_url(openai.url());

    let analyzer = ContentAnalyzer::from_registry(Arc::new(ProviderRegistry::new(settings))).unwrap();
    let verdict = analyzer
        .analyze(&chokwadi::AnalysisRequest::text("Send $5 to unlock your EcoCash prize"))
        .await;

    assert_eq!(verdict, "fallback verdict");
    failing.assert_async().await;
    succeeding.assert_async().await;
}
