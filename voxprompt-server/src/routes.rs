use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use voxprompt_core::{ChatMessageBody, ChatRequest, RequestId, messages, normalized_prompt};
use voxprompt_providers::openai_compatible::{
    UpstreamConfig, assistant_exchange, build_chat_completions_request,
};
use voxprompt_providers::{parse, runtime};

use crate::error::ApiError;

#[derive(Clone)]
struct AppState {
    upstream: Arc<UpstreamConfig>,
}

pub fn router(upstream: UpstreamConfig) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .with_state(AppState {
            upstream: Arc::new(upstream),
        })
}

/// Forwards the prompt as the fixed two-message exchange and normalizes the
/// upstream outcome onto the 200/400/429/500 contract.
async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatMessageBody>, ApiError> {
    let request_id = RequestId::new();

    let Some(prompt) = normalized_prompt(&req.prompt) else {
        return Err(ApiError::InvalidPrompt);
    };

    let upstream_req =
        build_chat_completions_request(&state.upstream, &assistant_exchange(prompt));

    let resp = match runtime::execute(&upstream_req).await {
        Ok(resp) => resp,
        Err(e) => {
            log::error!("upstream call failed ({request_id}): {e:#}");
            return Err(ApiError::Upstream { details: None });
        }
    };

    if resp.status == 429 {
        log::warn!("upstream rate limited ({request_id})");
        return Err(ApiError::RateLimited);
    }

    if !resp.is_success() {
        // Full body to the log; only the status line crosses the boundary.
        log::error!(
            "upstream status {} ({request_id}): {}",
            resp.status,
            String::from_utf8_lossy(&resp.body)
        );
        return Err(ApiError::Upstream {
            details: Some(format!("upstream status {}", resp.status)),
        });
    }

    let content = match parse::completion_content(&resp.body) {
        Ok(content) => content,
        Err(e) => {
            log::error!("undecodable upstream body ({request_id}): {e:#}");
            return Err(ApiError::Upstream { details: None });
        }
    };

    // An upstream that answered with nothing is still a 200; the fixed
    // fallback keeps the contract total.
    let message = content.unwrap_or_else(|| messages::NO_UPSTREAM_CONTENT.to_string());
    log::info!(
        "completion ok ({request_id}, {} chars)",
        message.chars().count()
    );
    Ok(Json(ChatMessageBody { message }))
}
