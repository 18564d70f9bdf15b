//! Authenticated HTTP client
//!
//! Thin wrapper over reqwest: every outgoing request gets the stored bearer
//! token attached, and a 401 response invalidates the stored credentials
//! before surfacing a typed `Unauthorized` error.

use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::{RequestBuilder, Response, StatusCode};
use thiserror::Error;

use crate::application::ports::CredentialStore;

/// HTTP layer errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The backend rejected the token. Credentials have been cleared.
    #[error("Not authenticated. Run 'repvox login' first.")]
    Unauthorized,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Backend error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Client for the workout backend's REST API
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiClient {
    /// Create a client for the given base URL
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Full URL for an API path
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a path
    pub async fn get(&self, path: &str) -> Result<Response, ApiError> {
        let builder = self.client.get(self.url(path));
        self.execute(builder).await
    }

    /// POST a multipart form to a path
    pub async fn post_multipart(&self, path: &str, form: Form) -> Result<Response, ApiError> {
        let builder = self.client.post(self.url(path)).multipart(form);
        self.execute(builder).await
    }

    /// Attach the bearer token, send, and apply the 401 invalidation rule
    async fn execute(&self, mut builder: RequestBuilder) -> Result<Response, ApiError> {
        if let Some(token) = self.credentials.token().await {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // Token is no longer valid; discard it so the next run goes
            // through login instead of retrying a dead session.
            let _ = self.credentials.clear().await;
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}
