//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod credentials;
pub mod gateway;
pub mod playback;

// Re-export common types
pub use capture::{AudioCapture, CaptureError, ChunkSink};
pub use config::ConfigStore;
pub use credentials::{CredentialError, CredentialStore};
pub use gateway::{CommandGateway, CommandReply, TransmissionError};
pub use playback::{PlaybackError, ResponsePlayer};
