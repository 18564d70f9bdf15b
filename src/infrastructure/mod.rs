//! Infrastructure layer - Adapter implementations

pub mod capture;
pub mod config;
pub mod credentials;
pub mod http;
pub mod playback;

// Re-export common types
pub use capture::CpalCapture;
pub use config::XdgConfigStore;
pub use credentials::FileCredentialStore;
pub use http::{ApiClient, ApiError, HttpCommandGateway};
pub use playback::{NoOpPlayer, RodioPlayer};
