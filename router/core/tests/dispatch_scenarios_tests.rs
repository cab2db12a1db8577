// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

use nexis_core::application::dispatcher::{ChatDispatcher, DispatchError};
use nexis_core::domain::chat::{ChatRequest, FileRef};
use nexis_core::domain::llm::{BackendKind, LLMError};
use nexis_core::domain::model_registry::{ModelBinding, ECHO_MODEL, UNIMPLEMENTED_MODEL};
use nexis_core::domain::router_config::RouterConfig;
use nexis_core::infrastructure::llm::gemini::NO_TEXT_PLACEHOLDER;

/// Configuration with every network backend pointed at `base_url`.
fn config_for(base_url: &str) -> RouterConfig {
    let mut config = RouterConfig::default();
    config.backends.github_models.endpoint = base_url.to_string();
    config.backends.github_models.token = Some("ghp_test".into());
    config.backends.gemini.endpoint = base_url.to_string();
    config.backends.gemini.api_key = Some("AIza-test".into());
    config.backends.tunnel.base_url = Some(base_url.to_string());
    config.timeout_seconds = 5;
    config
}

#[tokio::test]
async fn scenario_a_unmapped_key_is_rejected() {
    let dispatcher = ChatDispatcher::from_config(&config_for("http://127.0.0.1:1")).unwrap();

    let err = dispatcher
        .handle(ChatRequest::new("hello").with_model("echo-default"))
        .await
        .unwrap_err();

    assert_eq!(err, DispatchError::UnknownModel("echo-default".into()));
    assert_eq!(err.kind(), "unknown_model");
}

#[tokio::test]
async fn scenario_b_echo_counts_files() {
    let dispatcher = ChatDispatcher::from_config(&config_for("http://127.0.0.1:1")).unwrap();

    let response = dispatcher
        .handle(
            ChatRequest::new("hi")
                .with_model("tinyllama")
                .with_files(vec![FileRef::named("a.txt"), FileRef::default()]),
        )
        .await
        .unwrap();

    assert!(response.response.contains("Echo - hi"));
    assert!(response.response.contains("Files received: 2 files"));
}

#[tokio::test]
async fn scenario_c_github_models_500_carries_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .expect(1)
        .create_async()
        .await;

    let dispatcher = ChatDispatcher::from_config(&config_for(&server.url())).unwrap();
    let err = dispatcher
        .handle(ChatRequest::new("hi").with_model("gpt-4o-mini"))
        .await
        .unwrap_err();

    mock.assert_async().await;
    match err {
        DispatchError::Backend { backend, model_key, source } => {
            assert_eq!(backend, BackendKind::GithubModels);
            assert_eq!(model_key, "gpt-4o-mini");
            assert_eq!(source, LLMError::Upstream("HTTP 500: upstream exploded".into()));
        }
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn scenario_d_gemini_without_text_returns_placeholder() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/gemini-1.5-pro:generateContent")
        .with_status(200)
        .with_body(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#)
        .create_async()
        .await;

    let dispatcher = ChatDispatcher::from_config(&config_for(&server.url())).unwrap();
    let response = dispatcher
        .handle(ChatRequest::new("hi").with_model("gemini-1.5-pro"))
        .await
        .unwrap();

    assert_eq!(response.response, NO_TEXT_PLACEHOLDER);
}

#[tokio::test]
async fn scenario_e_tunnel_connection_error_is_soft() {
    let dispatcher = ChatDispatcher::from_config(&config_for("http://127.0.0.1:1")).unwrap();

    let response = dispatcher
        .handle(ChatRequest::new("hi").with_model("qwen"))
        .await
        .unwrap();

    assert!(!response.response.is_empty());
    assert!(response.response.contains("Connection error"));
}

#[tokio::test]
async fn malformed_completion_is_server_side_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"role":"assistant"}}]}"#)
        .create_async()
        .await;

    let dispatcher = ChatDispatcher::from_config(&config_for(&server.url())).unwrap();
    let err = dispatcher
        .handle(ChatRequest::new("hi").with_model("gpt-4o-mini"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "malformed_response");
    assert_eq!(err.status_code(), 502);
}

#[tokio::test]
async fn placeholder_keys_answer_without_network() {
    let mut config = config_for("http://127.0.0.1:1");
    config.models = vec![
        ModelBinding::new("tinyllama", BackendKind::Echo, ECHO_MODEL),
        ModelBinding::new("mistral", BackendKind::Echo, UNIMPLEMENTED_MODEL),
    ];

    let dispatcher = ChatDispatcher::from_config(&config).unwrap();
    let response = dispatcher
        .handle(ChatRequest::new("hi").with_model("mistral"))
        .await
        .unwrap();

    assert_eq!(response.response, "[MISTRAL]: The 'mistral' model is not implemented yet.");
}
