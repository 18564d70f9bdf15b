//! No-op playback adapter
//!
//! Used when response playback is disabled (`listen --mute`).

use async_trait::async_trait;

use crate::application::ports::{PlaybackError, ResponsePlayer};

/// Discards response audio without playing it
pub struct NoOpPlayer;

impl NoOpPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponsePlayer for NoOpPlayer {
    async fn play(&self, _audio: Vec<u8>) -> Result<(), PlaybackError> {
        Ok(())
    }
}
