// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

// Tunnel Adapter
//
// Self-hosted model reached through an ephemeral public tunnel. The host is
// expected to be offline from time to time, so an unavailable tunnel degrades
// to a user-facing notice returned as a normal answer instead of an error.
// Only a reachable host that answers with the wrong body shape is a failure.

use crate::domain::chat::FileRef;
use crate::domain::llm::{
    BackendKind, GenerationOptions, GenerationRequest, GenerationResponse, LLMError, LLMProvider,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::describe_transport_error;

pub struct TunnelAdapter {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct TunnelRequest<'a> {
    text: &'a str,
    files: &'a [FileRef],
}

#[derive(Deserialize)]
struct TunnelResponse {
    response: Option<String>,
}

impl TunnelAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/generate", self.base_url.trim_end_matches('/'))
    }

    fn degraded(&self, request: &GenerationRequest, notice: String) -> GenerationResponse {
        GenerationResponse::new(notice, BackendKind::Tunnel, request.upstream_model.clone())
    }
}

#[async_trait]
impl LLMProvider for TunnelAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::Tunnel
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, LLMError> {
        let body = TunnelRequest {
            text: &request.user_input,
            files: &request.files,
        };

        let url = self.generate_url();
        debug!(model = %request.upstream_model, %url, "Calling tunnel backend");

        let response = match self
            .client
            .post(&url)
            .timeout(options.timeout)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let reason = describe_transport_error(&e, options.timeout);
                warn!(model = %request.model_key, error = %reason, "Tunnel unreachable, degrading");
                return Ok(self.degraded(
                    request,
                    format!(
                        "The {} service could not be reached ({}). Please try again later.",
                        request.model_key, reason
                    ),
                ));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(model = %request.model_key, %status, "Tunnel returned an error, degrading");
            return Ok(self.degraded(
                request,
                format!(
                    "The {} service is currently unavailable (HTTP {}). Please try again later.",
                    request.model_key,
                    status.as_u16()
                ),
            ));
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                let reason = describe_transport_error(&e, options.timeout);
                warn!(model = %request.model_key, error = %reason, "Tunnel dropped the response, degrading");
                return Ok(self.degraded(
                    request,
                    format!(
                        "The {} service could not be reached ({}). Please try again later.",
                        request.model_key, reason
                    ),
                ));
            }
        };

        let parsed: TunnelResponse = serde_json::from_str(&text)
            .map_err(|e| LLMError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

        let output = parsed.response.ok_or_else(|| {
            LLMError::MalformedResponse("Tunnel response has no 'response' field".into())
        })?;

        Ok(GenerationResponse::new(
            output,
            BackendKind::Tunnel,
            request.upstream_model.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn request() -> GenerationRequest {
        let mut attachment = FileRef::named("a.txt");
        attachment.extra.insert("size".into(), json!(12));
        GenerationRequest {
            model_key: "qwen".into(),
            upstream_model: "qwen".into(),
            prompt: "hi\n\nAttached files (1):\n- a.txt".into(),
            user_input: "hi".into(),
            files: vec![attachment],
        }
    }

    #[tokio::test]
    async fn test_sends_raw_input_and_files() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/generate")
            .match_body(Matcher::Json(json!({
                "text": "hi",
                "files": [{ "name": "a.txt", "size": 12 }]
            })))
            .with_status(200)
            .with_body(r#"{"response":"Hello from Qwen"}"#)
            .create_async()
            .await;

        let adapter = TunnelAdapter::new(reqwest::Client::new(), format!("{}/", server.url()));
        let response = adapter
            .generate(&request(), &GenerationOptions::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.text, "Hello from Qwen");
    }

    #[tokio::test]
    async fn test_error_status_degrades_softly() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/generate")
            .with_status(503)
            .with_body("tunnel offline")
            .create_async()
            .await;

        let adapter = TunnelAdapter::new(reqwest::Client::new(), server.url());
        let response = adapter
            .generate(&request(), &GenerationOptions::default())
            .await
            .unwrap();

        assert!(response.text.contains("unavailable"));
        assert!(response.text.contains("503"));
        assert!(response.text.contains("qwen"));
    }

    #[tokio::test]
    async fn test_connection_failure_degrades_softly() {
        let adapter = TunnelAdapter::new(reqwest::Client::new(), "http://127.0.0.1:1");
        let response = adapter
            .generate(&request(), &GenerationOptions::default())
            .await
            .unwrap();

        assert!(response.text.contains("could not be reached"));
        assert!(response.text.contains("Connection error"));
    }

    #[tokio::test]
    async fn test_timeout_degrades_softly() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/generate")
            .with_status(200)
            .with_body_from_request(|_| {
                std::thread::sleep(std::time::Duration::from_secs(3));
                br#"{"response":"too late"}"#.to_vec()
            })
            .create_async()
            .await;

        let options = GenerationOptions {
            timeout: std::time::Duration::from_secs(1),
            ..GenerationOptions::default()
        };
        let adapter = TunnelAdapter::new(reqwest::Client::new(), server.url());
        let response = adapter.generate(&request(), &options).await.unwrap();

        assert_eq!(
            response.text,
            "The qwen service could not be reached (Request timed out after 1s). Please try again later."
        );
    }

    #[tokio::test]
    async fn test_missing_response_field_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/generate")
            .with_status(200)
            .with_body(r#"{"output":"wrong field"}"#)
            .create_async()
            .await;

        let adapter = TunnelAdapter::new(reqwest::Client::new(), server.url());
        let err = adapter
            .generate(&request(), &GenerationOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "malformed_response");
    }
}
