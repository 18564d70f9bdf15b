//! File-backed credential store
//!
//! Keeps the bearer token in a single file under the user config directory.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{CredentialError, CredentialStore};

/// Token file store under the XDG config directory
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store at the default location
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("repvox");

        Self {
            path: config_dir.join("token"),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the token file path
    pub fn path(&self) -> PathBuf {
        self.path.clone()
    }
}

impl Default for FileCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn token(&self) -> Option<String> {
        let content = fs::read_to_string(&self.path).await.ok()?;
        let token = content.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    async fn store(&self, token: &str) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CredentialError::WriteError(e.to_string()))?;
        }

        fs::write(&self.path, token)
            .await
            .map_err(|e| CredentialError::WriteError(e.to_string()))?;

        // The token grants account access; keep it private to the user
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(|e| CredentialError::WriteError(e.to_string()))?;
        }

        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CredentialError::WriteError(e.to_string())),
        }
    }
}
