//! Response audio playback port

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while playing a synthesized response
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    /// The response audio bytes could not be decoded
    #[error("Failed to decode response audio: {0}")]
    DecodeFailed(String),

    /// No audio output device available
    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Playback itself failed
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// Port for playing a synthesized voice response once
#[async_trait]
pub trait ResponsePlayer: Send + Sync {
    /// Decode and play the given audio bytes to completion.
    async fn play(&self, audio: Vec<u8>) -> Result<(), PlaybackError>;
}
