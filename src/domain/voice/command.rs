//! Parsed voice command value object

use serde_json::Value;

/// One parsed command/response cycle as delivered to the registered callback.
///
/// Immutable once constructed; the session delivers it exactly once per
/// completed upload.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceCommand {
    /// What the backend heard
    pub transcription: String,
    /// Command kind, e.g. "log_set" or "navigation"
    pub kind: String,
    /// Structured command parameters, opaque to the client
    pub parameters: Value,
    /// Textual reply for the user
    pub response: String,
}

impl VoiceCommand {
    pub fn new(
        transcription: impl Into<String>,
        kind: impl Into<String>,
        parameters: Value,
        response: impl Into<String>,
    ) -> Self {
        Self {
            transcription: transcription.into(),
            kind: kind.into(),
            parameters,
            response: response.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn carries_all_fields() {
        let command = VoiceCommand::new(
            "bench press 80 kilos for 5",
            "log_set",
            json!({"weight": 80, "reps": 5}),
            "Logged 80kg x 5 on bench press",
        );

        assert_eq!(command.transcription, "bench press 80 kilos for 5");
        assert_eq!(command.kind, "log_set");
        assert_eq!(command.parameters["reps"], 5);
        assert!(command.response.contains("Logged"));
    }
}
