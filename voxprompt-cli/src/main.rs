use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use voxprompt_core::PromptStatus;
use voxprompt_engine::capture::{
    RecognitionAlternative, RecognitionEvent, RecognitionSegment, RecognizerConfig,
    SpeechCapability, SpeechCaptureController, SpeechRecognizer,
};
use voxprompt_engine::client::HttpChatClient;
use voxprompt_engine::orchestrator::{
    OrchestratorConfig, PromptOrchestrator, run_capture_bridge,
};

/// Replays a fixed dictation through the capability interface, one growing
/// segment list per step, the way a live engine reports interim results.
struct ScriptedRecognizer {
    events: mpsc::Sender<RecognitionEvent>,
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn start(&self) -> anyhow::Result<()> {
        let events = self.events.clone();
        tokio::spawn(async move {
            let words = ["составь", " резюме", " прошедшей", " встречи"];
            let mut segments: Vec<RecognitionSegment> = Vec::new();
            for word in words {
                segments.push(RecognitionSegment {
                    alternatives: vec![RecognitionAlternative {
                        transcript: word.into(),
                        confidence: 0.9,
                    }],
                });
                let _ = events.send(RecognitionEvent::Result(segments.clone())).await;
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            let _ = events.send(RecognitionEvent::End).await;
        });
        Ok(())
    }

    fn stop(&self) {}
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Smoke run against a live proxy: scripted dictation, then one send.
    env_logger::init();

    let server_url = std::env::var("VOXPROMPT_SERVER_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:3000".into());
    log::info!("using proxy at {server_url}");

    let (events_tx, events_rx) = mpsc::channel(64);
    let (capture, updates) = SpeechCaptureController::new(SpeechCapability::Available {
        recognizer: Box::new(ScriptedRecognizer { events: events_tx }),
        events: events_rx,
        config: RecognizerConfig::default(),
    });

    let orchestrator = Arc::new(PromptOrchestrator::new(
        OrchestratorConfig {
            initial_prompt: String::new(),
            on_send: Some(Arc::new(|prompt: &str| println!("[sent] {prompt}"))),
        },
        Arc::new(HttpChatClient::new(server_url)),
    ));
    let bridge = tokio::spawn(run_capture_bridge(orchestrator.clone(), updates));

    capture.start_listening().await;
    // Let the scripted dictation play out.
    tokio::time::sleep(Duration::from_millis(400)).await;
    capture.stop_listening().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let snapshot = orchestrator.snapshot().await;
    println!("prompt: {}", snapshot.prompt_text);

    orchestrator.send().await?;

    let snapshot = orchestrator.snapshot().await;
    println!(
        "status={:?} progress={}",
        snapshot.status, snapshot.progress_percent
    );
    match snapshot.status {
        PromptStatus::Succeeded => println!("answer: {}", snapshot.response_text),
        PromptStatus::Failed => println!(
            "error: {}",
            snapshot.error_message.unwrap_or_default()
        ),
        _ => {}
    }

    drop(capture);
    bridge.abort();
    Ok(())
}
