//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod preferences;
pub mod voice;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use preferences::{Language, Theme, Units};
pub use voice::{AudioFormat, AudioPayload, CaptureSession, SessionState, VoiceCommand};
