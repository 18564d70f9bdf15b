//! Voice command session use case
//!
//! Drives the full command/response cycle: accumulate microphone chunks,
//! upload the recording on stop, interpret the structured reply, play the
//! synthesized answer, and deliver the parsed command to the registered
//! callback.

use std::sync::{Arc, Mutex as StdMutex};

use base64::Engine;
use thiserror::Error;

use crate::domain::voice::{
    AudioPayload, CaptureSession, InvalidStateTransition, SessionState, VoiceCommand,
};

use super::ports::{AudioCapture, CaptureError, CommandGateway, ResponsePlayer, TransmissionError};

/// Errors from the voice session use case
#[derive(Debug, Error)]
pub enum VoiceSessionError {
    /// Construction-time device failure, or the device was released
    #[error("Microphone unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Capture failed: {0}")]
    Capture(String),

    /// Upload or response decoding failed. The session is back in idle state
    /// and a new capture may be started.
    #[error(transparent)]
    Transmission(#[from] TransmissionError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),
}

impl From<CaptureError> for VoiceSessionError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::DeviceUnavailable(msg) => Self::DeviceUnavailable(msg),
            CaptureError::StartFailed(msg) | CaptureError::StreamFailed(msg) => Self::Capture(msg),
        }
    }
}

/// Callback receiving the parsed command once per completed cycle
pub type CommandCallback = Arc<dyn Fn(VoiceCommand) + Send + Sync>;

/// Outcome of one completed command/response cycle
#[derive(Debug, Clone)]
pub struct VoiceCycleOutput {
    /// The parsed command, as also delivered to the callback
    pub command: VoiceCommand,
    /// Whether a synthesized reply was played
    pub audio_played: bool,
    /// Set when response audio was present but could not be decoded or
    /// played. Never suppresses the textual result.
    pub playback_warning: Option<String>,
    /// Uploaded recording size, human readable
    pub upload_size: String,
}

/// Voice command session.
///
/// Owns the capture device (through its port), the ordered chunk buffer, and
/// the zero-or-one registered callback. All methods take `&self`; state lives
/// behind short-lived mutexes since every mutation happens on the caller's
/// cooperative turn sequence.
pub struct VoiceCommandSession {
    capture: Arc<dyn AudioCapture>,
    gateway: Arc<dyn CommandGateway>,
    player: Arc<dyn ResponsePlayer>,
    state: Arc<StdMutex<CaptureSession>>,
    chunks: Arc<StdMutex<Vec<Vec<u8>>>>,
    callback: Arc<StdMutex<Option<CommandCallback>>>,
}

impl VoiceCommandSession {
    /// Create a new session over an already-acquired capture device.
    ///
    /// Device acquisition happens when constructing the capture adapter, so a
    /// missing microphone never yields a partially usable session.
    pub fn new(
        capture: Arc<dyn AudioCapture>,
        gateway: Arc<dyn CommandGateway>,
        player: Arc<dyn ResponsePlayer>,
    ) -> Self {
        Self {
            capture,
            gateway,
            player,
            state: Arc::new(StdMutex::new(CaptureSession::new())),
            chunks: Arc::new(StdMutex::new(Vec::new())),
            callback: Arc::new(StdMutex::new(None)),
        }
    }

    /// Register the command callback, replacing any existing registration.
    pub fn register_callback(&self, callback: CommandCallback) {
        *self.callback.lock().unwrap() = Some(callback);
    }

    /// Get the current session state
    pub fn state(&self) -> SessionState {
        self.state.lock().unwrap().state()
    }

    /// Check whether a capture is in progress
    pub fn is_recording(&self) -> bool {
        self.state.lock().unwrap().is_recording()
    }

    /// Start a new capture.
    ///
    /// Clears any previously buffered chunks first, so two recordings never
    /// interleave. Fails with a state error while already recording or while
    /// an upload is still in flight, and with `DeviceUnavailable` when the
    /// device has been released.
    pub async fn start_listening(&self) -> Result<(), VoiceSessionError> {
        self.state.lock().unwrap().begin_capture()?;
        self.chunks.lock().unwrap().clear();

        let chunks = Arc::clone(&self.chunks);
        let sink: super::ports::ChunkSink = Arc::new(move |chunk: Vec<u8>| {
            chunks.lock().unwrap().push(chunk);
        });

        if let Err(e) = self.capture.start(sink).await {
            // Nothing was captured; roll straight back to idle.
            let _ = self.state.lock().unwrap().cancel();
            return Err(e.into());
        }

        Ok(())
    }

    /// Stop the capture and run the upload/response cycle.
    ///
    /// A no-op returning `Ok(None)` when not recording, and when the capture
    /// produced no chunks. On upload failure the error propagates, the
    /// callback is not invoked, and the session returns to idle so the next
    /// `start_listening` succeeds.
    pub async fn stop_listening(&self) -> Result<Option<VoiceCycleOutput>, VoiceSessionError> {
        {
            let mut state = self.state.lock().unwrap();
            if !state.is_recording() {
                return Ok(None);
            }
            state.finish_capture()?;
        }

        // The upload must not begin until the device has acknowledged the
        // stop and flushed its final chunk.
        if let Err(e) = self.capture.stop().await {
            self.finish_cycle();
            return Err(e.into());
        }

        let chunks = std::mem::take(&mut *self.chunks.lock().unwrap());
        if chunks.is_empty() {
            self.finish_cycle();
            return Ok(None);
        }

        let payload = AudioPayload::from_chunks(&chunks, self.capture.format());
        let upload_size = payload.human_readable_size();

        let reply = match self.gateway.send(&payload).await {
            Ok(reply) => reply,
            Err(e) => {
                self.finish_cycle();
                return Err(e.into());
            }
        };

        // Play the synthesized reply when present. Decode or playback
        // failures are surfaced as a warning, never as a rejected cycle.
        let mut audio_played = false;
        let mut playback_warning = None;
        if let Some(encoded) = reply.response_audio.as_deref() {
            match base64::engine::general_purpose::STANDARD.decode(encoded) {
                Ok(bytes) => match self.player.play(bytes).await {
                    Ok(()) => audio_played = true,
                    Err(e) => playback_warning = Some(e.to_string()),
                },
                Err(e) => {
                    playback_warning = Some(format!("Undecodable response audio: {}", e));
                }
            }
        }

        let command = VoiceCommand::new(
            reply.transcription,
            reply.command_type,
            reply.command_parameters,
            reply.response_text,
        );

        // Clone the callback out of the lock before invoking it, so a
        // callback that re-registers does not deadlock.
        let callback = self.callback.lock().unwrap().clone();
        if let Some(cb) = callback {
            cb(command.clone());
        }

        self.finish_cycle();

        Ok(Some(VoiceCycleOutput {
            command,
            audio_played,
            playback_warning,
            upload_size,
        }))
    }

    /// Release the capture device. The session is unusable afterwards.
    pub async fn close(&self) -> Result<(), VoiceSessionError> {
        self.capture.close().await?;
        Ok(())
    }

    /// Processing is done, successfully or not; the session is reusable.
    fn finish_cycle(&self) {
        let _ = self.state.lock().unwrap().complete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{CaptureError, ChunkSink, CommandReply, PlaybackError};
    use crate::domain::voice::AudioFormat;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Capture mock that delivers fixed chunks between start and stop
    struct ScriptedCapture {
        chunks: Vec<Vec<u8>>,
        sink: StdMutex<Option<ChunkSink>>,
        active: AtomicBool,
    }

    impl ScriptedCapture {
        fn new(chunks: Vec<Vec<u8>>) -> Self {
            Self {
                chunks,
                sink: StdMutex::new(None),
                active: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl AudioCapture for ScriptedCapture {
        async fn start(&self, sink: ChunkSink) -> Result<(), CaptureError> {
            *self.sink.lock().unwrap() = Some(sink);
            self.active.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn stop(&self) -> Result<(), CaptureError> {
            if let Some(sink) = self.sink.lock().unwrap().take() {
                for chunk in &self.chunks {
                    sink(chunk.clone());
                }
            }
            self.active.store(false, Ordering::SeqCst);
            Ok(())
        }

        fn is_active(&self) -> bool {
            self.active.load(Ordering::SeqCst)
        }

        fn format(&self) -> AudioFormat {
            AudioFormat::Wav
        }

        async fn close(&self) -> Result<(), CaptureError> {
            Ok(())
        }
    }

    struct MockGateway {
        reply: CommandReply,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CommandGateway for MockGateway {
        async fn send(&self, _payload: &AudioPayload) -> Result<CommandReply, TransmissionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    struct MockPlayer {
        plays: AtomicUsize,
    }

    #[async_trait]
    impl ResponsePlayer for MockPlayer {
        async fn play(&self, _audio: Vec<u8>) -> Result<(), PlaybackError> {
            self.plays.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn reply_without_audio() -> CommandReply {
        CommandReply {
            transcription: "next exercise".to_string(),
            command_type: "navigation".to_string(),
            command_parameters: json!({"action": "next"}),
            response_text: "Moving to the next exercise".to_string(),
            response_audio: None,
        }
    }

    fn make_session(
        chunks: Vec<Vec<u8>>,
        reply: CommandReply,
    ) -> (VoiceCommandSession, Arc<MockGateway>, Arc<MockPlayer>) {
        let gateway = Arc::new(MockGateway {
            reply,
            calls: AtomicUsize::new(0),
        });
        let player = Arc::new(MockPlayer {
            plays: AtomicUsize::new(0),
        });
        let session = VoiceCommandSession::new(
            Arc::new(ScriptedCapture::new(chunks)),
            Arc::clone(&gateway) as Arc<dyn CommandGateway>,
            Arc::clone(&player) as Arc<dyn ResponsePlayer>,
        );
        (session, gateway, player)
    }

    #[tokio::test]
    async fn full_cycle_delivers_command() {
        let (session, gateway, _) = make_session(vec![vec![1, 2], vec![3]], reply_without_audio());

        session.start_listening().await.unwrap();
        assert!(session.is_recording());

        let output = session.stop_listening().await.unwrap().unwrap();
        assert_eq!(output.command.kind, "navigation");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert!(!session.is_recording());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn stop_while_idle_is_noop() {
        let (session, gateway, _) = make_session(vec![vec![1]], reply_without_audio());

        let output = session.stop_listening().await.unwrap();
        assert!(output.is_none());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn empty_capture_short_circuits() {
        let (session, gateway, _) = make_session(vec![], reply_without_audio());

        session.start_listening().await.unwrap();
        let output = session.stop_listening().await.unwrap();

        assert!(output.is_none());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn start_while_recording_is_rejected() {
        let (session, _, _) = make_session(vec![vec![1]], reply_without_audio());

        session.start_listening().await.unwrap();
        let err = session.start_listening().await.unwrap_err();
        assert!(matches!(err, VoiceSessionError::InvalidState(_)));

        // Still recording; the original capture is unaffected
        assert!(session.is_recording());
    }

    #[tokio::test]
    async fn no_playback_when_response_audio_absent() {
        let (session, _, player) = make_session(vec![vec![1]], reply_without_audio());

        session.start_listening().await.unwrap();
        let output = session.stop_listening().await.unwrap().unwrap();

        assert!(!output.audio_played);
        assert!(output.playback_warning.is_none());
        assert_eq!(player.plays.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_base64_audio_does_not_block_delivery() {
        let reply = CommandReply {
            response_audio: Some("!!not-base64!!".to_string()),
            ..reply_without_audio()
        };
        let (session, _, player) = make_session(vec![vec![1]], reply);

        let delivered = Arc::new(AtomicUsize::new(0));
        let delivered_clone = Arc::clone(&delivered);
        session.register_callback(Arc::new(move |_| {
            delivered_clone.fetch_add(1, Ordering::SeqCst);
        }));

        session.start_listening().await.unwrap();
        let output = session.stop_listening().await.unwrap().unwrap();

        assert!(!output.audio_played);
        assert!(output.playback_warning.is_some());
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
        assert_eq!(player.plays.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn last_callback_registration_wins() {
        let (session, _, _) = make_session(vec![vec![1]], reply_without_audio());

        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let first_clone = Arc::clone(&first);
        session.register_callback(Arc::new(move |_| {
            first_clone.fetch_add(1, Ordering::SeqCst);
        }));
        let second_clone = Arc::clone(&second);
        session.register_callback(Arc::new(move |_| {
            second_clone.fetch_add(1, Ordering::SeqCst);
        }));

        session.start_listening().await.unwrap();
        session.stop_listening().await.unwrap();

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }
}
