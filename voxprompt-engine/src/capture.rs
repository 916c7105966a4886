//! Speech capture: the platform capability interface and the controller
//! that turns it into a start/stop state machine with a live transcript.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use voxprompt_core::SpeechSnapshot;

/// Delay between stopping and re-arming the recognizer. Some engines reject
/// an immediate restart of a live stream; the pause forces a clean session
/// boundary.
const RESTART_GUARD: Duration = Duration::from_millis(100);

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionAlternative {
    pub transcript: String,
    pub confidence: f32,
}

/// One recognized segment, alternatives ranked best-first.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionSegment {
    pub alternatives: Vec<RecognitionAlternative>,
}

impl RecognitionSegment {
    pub fn best(&self) -> Option<&RecognitionAlternative> {
        self.alternatives.first()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    /// Every segment reported so far in the current span, interim or final.
    /// Later events supersede earlier ones; they are never deltas.
    Result(Vec<RecognitionSegment>),
    /// Engine error code. Ends the span.
    Error(String),
    /// Natural end of the recognition stream.
    End,
}

/// Recognizer settings fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizerConfig {
    pub language: String,
    pub continuous: bool,
    pub interim_results: bool,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            language: "ru-RU".into(),
            continuous: true,
            interim_results: true,
        }
    }
}

/// Platform speech-recognition capability.
///
/// Implementations deliver `RecognitionEvent`s through the channel handed out
/// at probe time and must stop delivering after `stop()`.
pub trait SpeechRecognizer: Send + Sync {
    fn start(&self) -> anyhow::Result<()>;
    fn stop(&self);
}

/// Result of the one-time platform probe.
pub enum SpeechCapability {
    Available {
        recognizer: Box<dyn SpeechRecognizer>,
        events: mpsc::Receiver<RecognitionEvent>,
        config: RecognizerConfig,
    },
    Unavailable,
}

#[derive(Default)]
struct Inner {
    transcript: String,
    listening: bool,
}

/// Start/stop state machine over an injected speech capability.
///
/// Owns the capability exclusively for the lifetime of the session; dropping
/// the controller stops the recognizer so no recognition stream leaks.
pub struct SpeechCaptureController {
    supported: bool,
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    config: RecognizerConfig,
    inner: Arc<Mutex<Inner>>,
    updates: mpsc::Sender<SpeechSnapshot>,
    pump: Option<tokio::task::JoinHandle<()>>,
}

impl SpeechCaptureController {
    /// Builds the controller and the snapshot stream consumed by the caller.
    /// A snapshot is published on every observable change.
    ///
    /// Must run inside a tokio runtime (the event pump is spawned here).
    pub fn new(capability: SpeechCapability) -> (Self, mpsc::Receiver<SpeechSnapshot>) {
        let (updates_tx, updates_rx) = mpsc::channel(CHANNEL_CAPACITY);

        match capability {
            SpeechCapability::Unavailable => {
                log::warn!("speech recognition unavailable; capture disabled for this session");
                let controller = Self {
                    supported: false,
                    recognizer: None,
                    config: RecognizerConfig::default(),
                    inner: Arc::new(Mutex::new(Inner::default())),
                    updates: updates_tx,
                    pump: None,
                };
                (controller, updates_rx)
            }
            SpeechCapability::Available {
                recognizer,
                events,
                config,
            } => {
                let inner = Arc::new(Mutex::new(Inner::default()));
                let pump = tokio::spawn(pump_events(events, inner.clone(), updates_tx.clone()));
                let controller = Self {
                    supported: true,
                    recognizer: Some(recognizer),
                    config,
                    inner,
                    updates: updates_tx,
                    pump: Some(pump),
                };
                (controller, updates_rx)
            }
        }
    }

    pub fn supported(&self) -> bool {
        self.supported
    }

    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    pub async fn snapshot(&self) -> SpeechSnapshot {
        if !self.supported {
            return SpeechSnapshot::unsupported();
        }
        let state = self.inner.lock().await;
        SpeechSnapshot {
            transcript: state.transcript.clone(),
            listening: state.listening,
            supported: true,
        }
    }

    /// Begins a new listening span: clears the transcript, then re-arms the
    /// capability with a stop/start sequence around the guard delay.
    ///
    /// No-op when the capability is unavailable.
    pub async fn start_listening(&self) {
        let Some(recognizer) = self.recognizer.as_deref() else {
            return;
        };

        {
            let mut state = self.inner.lock().await;
            state.transcript.clear();
        }
        self.publish().await;

        recognizer.stop();
        tokio::time::sleep(RESTART_GUARD).await;

        log::debug!("re-arming speech recognition (lang {})", self.config.language);
        if let Err(e) = recognizer.start() {
            log::warn!("failed to start speech recognition: {e:#}");
            return;
        }

        {
            let mut state = self.inner.lock().await;
            state.listening = true;
        }
        self.publish().await;
    }

    pub async fn stop_listening(&self) {
        let Some(recognizer) = self.recognizer.as_deref() else {
            return;
        };

        recognizer.stop();
        {
            let mut state = self.inner.lock().await;
            state.listening = false;
        }
        self.publish().await;
    }

    async fn publish(&self) {
        let snapshot = self.snapshot().await;
        // The consumer may have gone away; capture state stays valid either way.
        let _ = self.updates.send(snapshot).await;
    }
}

impl Drop for SpeechCaptureController {
    fn drop(&mut self) {
        if let Some(recognizer) = self.recognizer.as_deref() {
            recognizer.stop();
        }
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}

async fn pump_events(
    mut events: mpsc::Receiver<RecognitionEvent>,
    inner: Arc<Mutex<Inner>>,
    updates: mpsc::Sender<SpeechSnapshot>,
) {
    while let Some(event) = events.recv().await {
        let snapshot = {
            let mut state = inner.lock().await;
            match event {
                RecognitionEvent::Result(segments) => {
                    // Rebuild the whole transcript from the best alternative
                    // of every segment; each event replaces, never appends.
                    state.transcript = segments
                        .iter()
                        .filter_map(RecognitionSegment::best)
                        .map(|alt| alt.transcript.as_str())
                        .collect();
                }
                RecognitionEvent::Error(code) => {
                    // Silent to the caller: the only observable effect is the
                    // listening indicator turning off.
                    log::warn!("speech recognition error: {code}");
                    state.listening = false;
                }
                RecognitionEvent::End => {
                    state.listening = false;
                }
            }
            SpeechSnapshot {
                transcript: state.transcript.clone(),
                listening: state.listening,
                supported: true,
            }
        };
        let _ = updates.send(snapshot).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct CallLog {
        calls: StdMutex<Vec<&'static str>>,
    }

    struct FakeRecognizer {
        log: Arc<CallLog>,
    }

    impl SpeechRecognizer for FakeRecognizer {
        fn start(&self) -> anyhow::Result<()> {
            self.log.calls.lock().unwrap().push("start");
            Ok(())
        }

        fn stop(&self) {
            self.log.calls.lock().unwrap().push("stop");
        }
    }

    fn available() -> (
        SpeechCaptureController,
        mpsc::Receiver<SpeechSnapshot>,
        mpsc::Sender<RecognitionEvent>,
        Arc<CallLog>,
    ) {
        let log = Arc::new(CallLog::default());
        let (events_tx, events_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (controller, updates_rx) = SpeechCaptureController::new(SpeechCapability::Available {
            recognizer: Box::new(FakeRecognizer { log: log.clone() }),
            events: events_rx,
            config: RecognizerConfig::default(),
        });
        (controller, updates_rx, events_tx, log)
    }

    fn segment(text: &str) -> RecognitionSegment {
        RecognitionSegment {
            alternatives: vec![RecognitionAlternative {
                transcript: text.into(),
                confidence: 0.9,
            }],
        }
    }

    #[tokio::test]
    async fn unsupported_probe_is_terminal() {
        let (controller, _updates) = SpeechCaptureController::new(SpeechCapability::Unavailable);
        assert!(!controller.supported());
        assert_eq!(controller.snapshot().await, SpeechSnapshot::unsupported());

        // start/stop on an unsupported session are no-ops.
        controller.start_listening().await;
        controller.stop_listening().await;
        assert_eq!(controller.snapshot().await, SpeechSnapshot::unsupported());
    }

    #[tokio::test]
    async fn start_listening_clears_transcript_before_rearming() {
        let (controller, mut updates, events, log) = available();

        events.send(RecognitionEvent::Result(vec![segment("старый текст")])).await.unwrap();
        assert_eq!(updates.recv().await.unwrap().transcript, "старый текст");

        controller.start_listening().await;

        // First published snapshot of the span: cleared transcript, still idle.
        let cleared = updates.recv().await.unwrap();
        assert_eq!(cleared.transcript, "");
        assert!(!cleared.listening);

        let armed = updates.recv().await.unwrap();
        assert!(armed.listening);

        // The capability saw stop before start.
        assert_eq!(*log.calls.lock().unwrap(), vec!["stop", "start"]);
    }

    #[tokio::test]
    async fn result_events_replace_the_whole_transcript() {
        let (controller, mut updates, events, _log) = available();
        controller.start_listening().await;
        updates.recv().await.unwrap();
        updates.recv().await.unwrap();

        events.send(RecognitionEvent::Result(vec![segment("привет")])).await.unwrap();
        assert_eq!(updates.recv().await.unwrap().transcript, "привет");

        events
            .send(RecognitionEvent::Result(vec![segment("привет"), segment(" мир")]))
            .await
            .unwrap();
        assert_eq!(updates.recv().await.unwrap().transcript, "привет мир");
    }

    #[tokio::test]
    async fn best_ranked_alternative_wins() {
        let (_controller, mut updates, events, _log) = available();

        let seg = RecognitionSegment {
            alternatives: vec![
                RecognitionAlternative {
                    transcript: "высокая".into(),
                    confidence: 0.95,
                },
                RecognitionAlternative {
                    transcript: "низкая".into(),
                    confidence: 0.4,
                },
            ],
        };
        events.send(RecognitionEvent::Result(vec![seg])).await.unwrap();
        assert_eq!(updates.recv().await.unwrap().transcript, "высокая");
    }

    #[tokio::test]
    async fn capability_error_stops_listening_silently() {
        let (controller, mut updates, events, _log) = available();
        controller.start_listening().await;
        updates.recv().await.unwrap();
        assert!(updates.recv().await.unwrap().listening);

        events.send(RecognitionEvent::Error("no-speech".into())).await.unwrap();
        let after = updates.recv().await.unwrap();
        assert!(!after.listening);
        assert!(!controller.snapshot().await.listening);
    }

    #[tokio::test]
    async fn natural_end_stops_listening() {
        let (controller, mut updates, events, _log) = available();
        controller.start_listening().await;
        updates.recv().await.unwrap();
        updates.recv().await.unwrap();

        events.send(RecognitionEvent::End).await.unwrap();
        assert!(!updates.recv().await.unwrap().listening);
        assert!(!controller.snapshot().await.listening);
    }

    #[tokio::test]
    async fn stop_listening_stops_the_capability() {
        let (controller, mut updates, _events, log) = available();
        controller.start_listening().await;
        updates.recv().await.unwrap();
        updates.recv().await.unwrap();

        controller.stop_listening().await;
        assert!(!updates.recv().await.unwrap().listening);
        assert_eq!(*log.calls.lock().unwrap(), vec!["stop", "start", "stop"]);
    }

    #[tokio::test]
    async fn drop_releases_the_capability() {
        let (controller, _updates, _events, log) = available();
        drop(controller);
        assert_eq!(*log.calls.lock().unwrap(), vec!["stop"]);
    }
}
