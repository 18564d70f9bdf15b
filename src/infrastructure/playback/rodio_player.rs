//! Rodio-based playback of synthesized responses

use std::io::Cursor;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::application::ports::{PlaybackError, ResponsePlayer};

/// Plays the backend's synthesized audio reply once on the default output
pub struct RodioPlayer;

impl RodioPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponsePlayer for RodioPlayer {
    async fn play(&self, audio: Vec<u8>) -> Result<(), PlaybackError> {
        // Run playback on a blocking thread to avoid stalling the async runtime
        tokio::task::spawn_blocking(move || play_sync(audio))
            .await
            .map_err(|e| PlaybackError::PlaybackFailed(format!("Task join error: {}", e)))?
    }
}

/// Decode the bytes into a source; malformed audio is a `DecodeFailed`
fn decode(audio: Vec<u8>) -> Result<Decoder<Cursor<Vec<u8>>>, PlaybackError> {
    Decoder::new(Cursor::new(audio)).map_err(|e| PlaybackError::DecodeFailed(e.to_string()))
}

/// Play synchronously (called from spawn_blocking).
/// Decodes before opening the output device so undecodable audio is reported
/// as such even on machines without audio hardware.
fn play_sync(audio: Vec<u8>) -> Result<(), PlaybackError> {
    let source = decode(audio)?;

    let (_stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;
    let sink =
        Sink::try_new(&stream_handle).map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;

    sink.append(source.convert_samples::<f32>());
    sink.sleep_until_end();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal valid WAV: 44-byte header plus a handful of silent samples
    fn tiny_wav() -> Vec<u8> {
        let samples = 8u32;
        let data_len = samples * 2;
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&16000u32.to_le_bytes());
        wav.extend_from_slice(&32000u32.to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.extend(std::iter::repeat(0u8).take(data_len as usize));
        wav
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = match decode(vec![0u8; 32]) {
            Err(e) => e,
            Ok(_) => panic!("expected decode to fail"),
        };
        assert!(matches!(err, PlaybackError::DecodeFailed(_)));
    }

    #[test]
    fn decode_accepts_wav() {
        assert!(decode(tiny_wav()).is_ok());
    }

    #[tokio::test]
    #[ignore = "Requires audio hardware"]
    async fn plays_valid_wav() {
        let player = RodioPlayer::new();
        let result = player.play(tiny_wav()).await;
        assert!(result.is_ok());
    }
}
