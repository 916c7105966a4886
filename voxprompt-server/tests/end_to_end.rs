//! Full chain: orchestrator -> HTTP chat client -> proxy -> mock upstream.

use std::sync::Arc;
use voxprompt_core::{PromptStatus, messages};
use voxprompt_engine::client::HttpChatClient;
use voxprompt_engine::orchestrator::{OrchestratorConfig, PromptOrchestrator};
use voxprompt_providers::openai_compatible::UpstreamConfig;
use voxprompt_server::router;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn spawn_proxy(upstream_base_url: String) -> String {
    let upstream = UpstreamConfig {
        base_url: upstream_base_url,
        api_key: "test-key".into(),
        model: "deepseek-chat".into(),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(upstream)).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn dictated_prompt_round_trips_to_the_rendered_answer() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"choices":[{"message":{"content":"Вот краткое резюме."}}]}"#,
            "application/json",
        ))
        .mount(&upstream)
        .await;

    let proxy = spawn_proxy(upstream.uri()).await;
    let orchestrator = Arc::new(PromptOrchestrator::new(
        OrchestratorConfig::default(),
        Arc::new(HttpChatClient::new(proxy)),
    ));

    // Transcript arrives from a listening span, then the user sends.
    orchestrator.notify_listening_started().await;
    orchestrator.apply_transcript("составь резюме встречи").await;
    orchestrator.send().await.unwrap();

    let snapshot = orchestrator.snapshot().await;
    assert_eq!(snapshot.status, PromptStatus::Succeeded);
    assert_eq!(snapshot.response_text, "Вот краткое резюме.");
    assert_eq!(snapshot.progress_percent, 100);
}

#[tokio::test]
async fn upstream_rate_limit_surfaces_as_the_generic_failure() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&upstream)
        .await;

    let proxy = spawn_proxy(upstream.uri()).await;
    let orchestrator = PromptOrchestrator::new(
        OrchestratorConfig {
            initial_prompt: "Hello".into(),
            on_send: None,
        },
        Arc::new(HttpChatClient::new(proxy)),
    );

    orchestrator.send().await.unwrap();

    let snapshot = orchestrator.snapshot().await;
    assert_eq!(snapshot.status, PromptStatus::Failed);
    assert_eq!(
        snapshot.error_message.as_deref(),
        Some(messages::REQUEST_FAILED)
    );
    assert_eq!(snapshot.progress_percent, 100);
}
