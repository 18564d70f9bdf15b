//! HTTP adapter for the voice command endpoint

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::application::ports::{CommandGateway, CommandReply, TransmissionError};
use crate::domain::voice::AudioPayload;

use super::client::{ApiClient, ApiError};

/// Endpoint path, relative to the API base URL
const VOICE_COMMAND_PATH: &str = "/workouts/voice/command";

/// Multipart field name the backend reads the recording from
const AUDIO_FIELD: &str = "audio_file";

impl From<ApiError> for TransmissionError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => Self::Unauthorized,
            ApiError::RequestFailed(msg) => Self::RequestFailed(msg),
            ApiError::Server { status, message } => Self::ApiError { status, message },
            ApiError::ParseError(msg) => Self::ParseError(msg),
        }
    }
}

/// Gateway posting recorded commands to the backend
pub struct HttpCommandGateway {
    api: ApiClient,
}

impl HttpCommandGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CommandGateway for HttpCommandGateway {
    async fn send(&self, payload: &AudioPayload) -> Result<CommandReply, TransmissionError> {
        let format = payload.format();
        let part = Part::bytes(payload.data().to_vec())
            .file_name(format.upload_filename())
            .mime_str(format.mime_type())
            .map_err(|e| TransmissionError::RequestFailed(e.to_string()))?;
        let form = Form::new().part(AUDIO_FIELD, part);

        let response = self.api.post_multipart(VOICE_COMMAND_PATH, form).await?;

        response
            .json::<CommandReply>()
            .await
            .map_err(|e| TransmissionError::ParseError(e.to_string()))
    }
}
