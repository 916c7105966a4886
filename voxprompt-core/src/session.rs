use serde::{Deserialize, Serialize};

/// Lifecycle of one prompt round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStatus {
    Idle,
    Sending,
    Succeeded,
    Failed,
}

impl Default for PromptStatus {
    fn default() -> Self {
        Self::Idle
    }
}

/// Render payload for the prompt session.
///
/// `error_message` is `Some` exactly when `status` is `Failed`;
/// `progress_percent` stays within 0..=100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSnapshot {
    pub prompt_text: String,
    pub response_text: String,
    pub status: PromptStatus,
    pub error_message: Option<String>,
    pub progress_percent: u8,
}

impl PromptSnapshot {
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt_text: prompt.into(),
            ..Self::default()
        }
    }
}

impl Default for PromptSnapshot {
    fn default() -> Self {
        Self {
            prompt_text: String::new(),
            response_text: String::new(),
            status: PromptStatus::Idle,
            error_message: None,
            progress_percent: 0,
        }
    }
}

/// Render payload for the speech-capture session.
///
/// `supported` is fixed at probe time and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechSnapshot {
    pub transcript: String,
    pub listening: bool,
    pub supported: bool,
}

impl SpeechSnapshot {
    pub fn unsupported() -> Self {
        Self {
            transcript: String::new(),
            listening: false,
            supported: false,
        }
    }

    pub fn idle() -> Self {
        Self {
            transcript: String::new(),
            listening: false,
            supported: true,
        }
    }
}
