use serde::{Deserialize, Serialize};

/// Request body of `POST /api/chat`.
///
/// `prompt` defaults to empty so an absent field is rejected by validation
/// with the contract's 400, not by the JSON decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: String,
}

/// Success body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageBody {
    pub message: String,
}

/// Error body of `POST /api/chat` (400/429/500).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
