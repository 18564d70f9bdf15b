//! Credential store port interface

use async_trait::async_trait;
use thiserror::Error;

/// Credential storage errors
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    #[error("Failed to read stored credentials: {0}")]
    ReadError(String),

    #[error("Failed to write credentials: {0}")]
    WriteError(String),
}

/// Port for bearer-token storage.
///
/// The backend owns token issuance; this store only keeps, hands out, and
/// discards the token. The HTTP layer consults it on every request and clears
/// it when the backend answers 401.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Get the stored token, if any
    async fn token(&self) -> Option<String>;

    /// Persist a token, replacing any existing one
    async fn store(&self, token: &str) -> Result<(), CredentialError>;

    /// Discard the stored token. Idempotent.
    async fn clear(&self) -> Result<(), CredentialError>;

    /// Check whether a token is currently stored
    async fn is_authenticated(&self) -> bool {
        self.token().await.is_some()
    }
}
