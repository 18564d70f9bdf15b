//! Voice command gateway port interface

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::voice::AudioPayload;

/// Transmission errors
#[derive(Debug, Clone, Error)]
pub enum TransmissionError {
    #[error("Not authenticated. Run 'repvox login' first.")]
    Unauthorized,

    #[error("Upload failed: {0}")]
    RequestFailed(String),

    #[error("Backend error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse backend response: {0}")]
    ParseError(String),
}

/// Structured reply from the voice command endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CommandReply {
    pub transcription: String,
    pub command_type: String,
    #[serde(default)]
    pub command_parameters: Value,
    pub response_text: String,
    /// Base64-encoded synthesized speech, when the backend produced one
    #[serde(default)]
    pub response_audio: Option<String>,
}

/// Port for sending a recorded command to the backend
#[async_trait]
pub trait CommandGateway: Send + Sync {
    /// Upload the recording and await the parsed command/response.
    async fn send(&self, payload: &AudioPayload) -> Result<CommandReply, TransmissionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_parses_full_response() {
        let json = r#"{
            "transcription": "squat one hundred kilos for five",
            "command_type": "log_set",
            "command_parameters": {"weight": 100, "reps": 5},
            "response_text": "Logged 100kg x 5",
            "response_audio": "AAAA"
        }"#;

        let reply: CommandReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.command_type, "log_set");
        assert_eq!(reply.command_parameters["weight"], 100);
        assert_eq!(reply.response_audio.as_deref(), Some("AAAA"));
    }

    #[test]
    fn reply_parses_without_audio_or_parameters() {
        let json = r#"{
            "transcription": "next exercise",
            "command_type": "navigation",
            "response_text": "Moving on"
        }"#;

        let reply: CommandReply = serde_json::from_str(json).unwrap();
        assert!(reply.response_audio.is_none());
        assert!(reply.command_parameters.is_null());
    }
}
