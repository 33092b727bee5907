use hrdesk_core::AppError;
use hrdesk_llm::{LlmClient, LlmRequest, OllamaClient};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn complete_posts_to_generate_and_maps_usage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama3.2",
            "system": "Answer only from the context.",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "llama3.2",
            "response": "Ana Pérez works on Portal Web Corporativo.",
            "done": true,
            "prompt_eval_count": 210,
            "eval_count": 12
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::with_base_url(server.uri());
    let request = LlmRequest::new("Who works on Portal Web?", "llama3.2")
        .with_system("Answer only from the context.");

    let response = client.complete(&request).await.unwrap();

    assert_eq!(response.content, "Ana Pérez works on Portal Web Corporativo.");
    assert_eq!(response.usage.total_tokens, 222);
}

#[tokio::test]
async fn complete_surfaces_http_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let client = OllamaClient::with_base_url(server.uri());
    let err = client
        .complete(&LlmRequest::new("hola", "llama3.2"))
        .await
        .unwrap_err();

    match err {
        AppError::Llm(msg) => assert!(msg.contains("model not loaded")),
        other => panic!("unexpected error: {other}"),
    }
}
