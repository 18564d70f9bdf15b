//! Application layer - Use cases and port interfaces

pub mod context;
pub mod ports;
pub mod preferences;
pub mod voice_session;

pub use context::AppContext;
pub use preferences::Preference;
pub use voice_session::{CommandCallback, VoiceCommandSession, VoiceCycleOutput, VoiceSessionError};
