//! Voice command domain types

mod audio_payload;
mod command;
mod session_state;

pub use audio_payload::{AudioFormat, AudioPayload};
pub use command::VoiceCommand;
pub use session_state::{CaptureSession, InvalidStateTransition, SessionState};
