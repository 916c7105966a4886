//! Chat client: issues the prompt to the proxy over HTTP and normalizes
//! transport failures.

use anyhow::Context;
use async_trait::async_trait;
use thiserror::Error;
use voxprompt_core::{ChatRequest, messages, normalized_prompt};
use voxprompt_providers::request::{Body, HttpRequest};
use voxprompt_providers::runtime;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// Non-success HTTP status from the proxy.
    #[error("chat endpoint returned status {status}")]
    Transport { status: u16 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Sends a prompt and returns the completion text.
///
/// Implementors must be `Send + Sync` so the orchestrator can hold them as
/// `Arc<dyn CompletionClient>`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ClientError>;
}

/// `CompletionClient` over the proxy's `POST /api/chat` contract.
pub struct HttpChatClient {
    base_url: String,
}

impl HttpChatClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for HttpChatClient {
    async fn complete(&self, prompt: &str) -> Result<String, ClientError> {
        // The orchestrator validates first, but a reused client must not ship
        // empty prompts on its own.
        if normalized_prompt(prompt).is_none() {
            return Err(ClientError::EmptyPrompt);
        }

        let payload = serde_json::to_string(&ChatRequest {
            prompt: prompt.into(),
        })
        .context("encode chat request")?;

        let req = HttpRequest {
            method: "POST".into(),
            url: self.endpoint(),
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: Body::Json(payload),
        };

        let resp = runtime::execute(&req).await?;
        if !resp.is_success() {
            return Err(ClientError::Transport { status: resp.status });
        }

        let body: serde_json::Value =
            serde_json::from_slice(&resp.body).context("decode chat response JSON")?;

        // A success body without a usable `message` resolves to the fixed
        // fallback, rendered as-is downstream.
        Ok(body
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .unwrap_or(messages::FALLBACK_ANSWER)
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_empty_prompt_without_network() {
        // Points at a closed port; the guard must fire before any dial.
        let client = HttpChatClient::new("http://127.0.0.1:9");
        assert!(matches!(
            client.complete("   ").await,
            Err(ClientError::EmptyPrompt)
        ));
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        assert_eq!(
            HttpChatClient::new("http://localhost:3000/").endpoint(),
            "http://localhost:3000/api/chat"
        );
        assert_eq!(
            HttpChatClient::new("http://localhost:3000").endpoint(),
            "http://localhost:3000/api/chat"
        );
    }
}
