use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use voxprompt_core::{ChatErrorBody, messages};

/// Outward error contract of `POST /api/chat`. Upstream transport internals
/// never cross this boundary beyond the bounded `details` string.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Absent or empty prompt; rejected before any upstream call.
    #[error("prompt is missing or empty")]
    InvalidPrompt,

    /// The upstream signalled a rate limit. Takes precedence over the
    /// generic failure mapping.
    #[error("upstream rate limit")]
    RateLimited,

    /// Any other upstream failure, already logged in full.
    #[error("upstream request failed")]
    Upstream { details: Option<String> },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InvalidPrompt => (
                StatusCode::BAD_REQUEST,
                ChatErrorBody {
                    error: messages::PROMPT_REQUIRED.into(),
                    details: None,
                },
            ),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                ChatErrorBody {
                    error: messages::RATE_LIMIT_EXCEEDED.into(),
                    details: None,
                },
            ),
            ApiError::Upstream { details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ChatErrorBody {
                    error: messages::UPSTREAM_FAILED.into(),
                    details,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
