// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::application::dispatcher::{ChatDispatcher, DispatchError};
use crate::domain::chat::{ChatRequest, ChatResponse};

pub const LIVENESS_MESSAGE: &str = "NEXIS AI Backend is running!";

pub struct AppState {
    pub dispatcher: Arc<ChatDispatcher>,
}

/// Routes without CORS; used directly by tests.
pub fn app(dispatcher: Arc<ChatDispatcher>) -> Router {
    let state = Arc::new(AppState { dispatcher });

    Router::new()
        .route("/", get(root))
        .route("/chat", post(chat))
        .route("/models", get(list_models))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Routes plus a CORS layer for the given browser origins.
pub fn app_with_cors(
    dispatcher: Arc<ChatDispatcher>,
    allowed_origins: &[String],
) -> anyhow::Result<Router> {
    Ok(app(dispatcher).layer(cors_layer(allowed_origins)?))
}

fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
            "detail": self.detail(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": LIVENESS_MESSAGE }))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, DispatchError> {
    state.dispatcher.handle(payload).await.map(Json)
}

async fn list_models(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "default": state.dispatcher.default_model(),
        "models": state.dispatcher.models().keys(),
    }))
}
