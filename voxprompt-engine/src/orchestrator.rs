//! Prompt orchestration: user input, transcript mirroring, the send
//! lifecycle and the cosmetic progress simulator.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use voxprompt_core::{
    PromptSnapshot, PromptStatus, RequestId, SpeechSnapshot, messages, normalized_prompt,
};

use crate::client::CompletionClient;

const PROGRESS_TICK: Duration = Duration::from_millis(300);
const PROGRESS_STEP: u8 = 10;

/// Invoked with the original prompt text after a successful round trip.
pub type SendCallback = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
pub struct OrchestratorConfig {
    pub initial_prompt: String,
    pub on_send: Option<SendCallback>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    /// At most one send cycle may be in flight; the caller keeps the current
    /// one and drops this request.
    #[error("a send cycle is already in flight")]
    Busy,
}

#[derive(Default)]
struct Inner {
    prompt_text: String,
    response_text: String,
    status: PromptStatus,
    error_message: Option<String>,
    progress_percent: u8,

    // Set when the user edits the prompt during the current listening span;
    // a new span clears it. While set, transcript updates do not overwrite
    // the prompt.
    manual_edit_in_span: bool,

    progress_task: Option<JoinHandle<()>>,
}

/// Central controller for one UI session. State is exposed as
/// [`PromptSnapshot`] values for the rendering layer.
pub struct PromptOrchestrator {
    inner: Arc<Mutex<Inner>>,
    client: Arc<dyn CompletionClient>,
    on_send: Option<SendCallback>,
}

impl PromptOrchestrator {
    pub fn new(config: OrchestratorConfig, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                prompt_text: config.initial_prompt,
                ..Inner::default()
            })),
            client,
            on_send: config.on_send,
        }
    }

    pub async fn snapshot(&self) -> PromptSnapshot {
        let state = self.inner.lock().await;
        PromptSnapshot {
            prompt_text: state.prompt_text.clone(),
            response_text: state.response_text.clone(),
            status: state.status,
            error_message: state.error_message.clone(),
            progress_percent: state.progress_percent,
        }
    }

    /// Manual prompt edit. Marks the current listening span as user-owned so
    /// dictation stops overwriting what was typed.
    pub async fn set_prompt(&self, text: impl Into<String>) {
        let mut state = self.inner.lock().await;
        state.prompt_text = text.into();
        state.manual_edit_in_span = true;
    }

    /// In-place edit of the rendered answer. No re-validation, no round trip.
    pub async fn set_response(&self, text: impl Into<String>) {
        self.inner.lock().await.response_text = text.into();
    }

    /// A new listening span began; transcript mirroring is re-armed.
    pub async fn notify_listening_started(&self) {
        self.inner.lock().await.manual_edit_in_span = false;
    }

    /// Mirrors the live transcript into the prompt unless the user has typed
    /// since the current span began.
    pub async fn apply_transcript(&self, transcript: &str) {
        let mut state = self.inner.lock().await;
        if state.manual_edit_in_span {
            return;
        }
        state.prompt_text = transcript.to_string();
    }

    /// Runs one send cycle: validation, in-flight state with simulated
    /// progress, network round trip, resolution.
    ///
    /// A rejected or validation-failed call never reaches the network. The
    /// outcome of an accepted cycle lands in the snapshot, not in the return
    /// value.
    pub async fn send(&self) -> Result<(), SendError> {
        let request_id = RequestId::new();

        let prompt = {
            let mut state = self.inner.lock().await;
            if state.status == PromptStatus::Sending {
                log::warn!("send rejected ({request_id}): cycle already in flight");
                return Err(SendError::Busy);
            }
            if normalized_prompt(&state.prompt_text).is_none() {
                state.status = PromptStatus::Failed;
                state.error_message = Some(messages::EMPTY_PROMPT.into());
                return Ok(());
            }

            state.status = PromptStatus::Sending;
            state.error_message = None;
            state.progress_percent = 0;
            state.progress_task = Some(tokio::spawn(simulate_progress(self.inner.clone())));
            state.prompt_text.clone()
        };

        log::info!(
            "sending prompt ({request_id}, {} chars)",
            prompt.chars().count()
        );
        let outcome = self.client.complete(&prompt).await;

        let succeeded = {
            let mut state = self.inner.lock().await;
            if let Some(task) = state.progress_task.take() {
                // The estimate is obsolete the moment the real result lands.
                task.abort();
            }

            let succeeded = match outcome {
                Ok(message) => {
                    state.response_text = message;
                    state.status = PromptStatus::Succeeded;
                    true
                }
                Err(e) => {
                    log::error!("prompt request failed ({request_id}): {e}");
                    state.status = PromptStatus::Failed;
                    state.error_message = Some(messages::REQUEST_FAILED.into());
                    false
                }
            };

            // The last observed progress of a completed cycle is always 100,
            // whether or not the simulator got there on its own.
            state.progress_percent = 100;
            succeeded
        };

        if succeeded {
            if let Some(on_send) = &self.on_send {
                on_send(&prompt);
            }
        }
        Ok(())
    }
}

/// Cosmetic progress: +10 every 300 ms, clamped at 100, self-stopping. Not
/// tied to real request completion in any way.
async fn simulate_progress(inner: Arc<Mutex<Inner>>) {
    let mut ticker = tokio::time::interval(PROGRESS_TICK);
    // An interval's first tick completes immediately; the first visible
    // increment belongs at one full tick in.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let mut state = inner.lock().await;
        state.progress_percent = state.progress_percent.saturating_add(PROGRESS_STEP).min(100);
        if state.progress_percent >= 100 {
            break;
        }
    }
}

/// Forwards capture snapshots into the orchestrator until the capture side
/// closes: span starts re-arm mirroring, transcript changes mirror into the
/// prompt. Spawn this next to the UI loop.
pub async fn run_capture_bridge(
    orchestrator: Arc<PromptOrchestrator>,
    mut updates: mpsc::Receiver<SpeechSnapshot>,
) {
    let mut was_listening = false;
    let mut last_transcript = String::new();

    while let Some(snapshot) = updates.recv().await {
        if snapshot.listening && !was_listening {
            orchestrator.notify_listening_started().await;
        }
        was_listening = snapshot.listening;

        if snapshot.transcript != last_transcript {
            orchestrator.apply_transcript(&snapshot.transcript).await;
            last_transcript = snapshot.transcript;
        }
    }
}
