use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tracing::{debug, warn};

use super::messages::{ErrorBody, ExchangeResponse};

/// Request header carrying the authentication token
pub const TOKEN_HEADER: &str = "X-CSRFToken";

const AUDIO_FIELD: &str = "audio";
const AUDIO_FILENAME: &str = "audio.webm";
const AUDIO_MIME: &str = "audio/webm";
const FALLBACK_SERVER_ERROR: &str = "Erro desconhecido no servidor.";

#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Non-success status; carries the server's human-readable message
    #[error("{0}")]
    Server(String),

    /// Network-level failure
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The success body could not be decoded as the expected JSON
    #[error("resposta inválida do servidor: {0}")]
    Malformed(String),
}

/// HTTP client for the upload/response exchange.
///
/// One multipart POST per finalized recording. Nothing is retried and no
/// timeout is configured beyond the transport default.
pub struct ExchangeClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl ExchangeClient {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Self {
        if token.is_none() {
            warn!("No authentication token available; uploads will carry no token header");
        }

        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Uploads one finalized recording and decodes the reply.
    pub async fn send(&self, audio: Vec<u8>) -> Result<ExchangeResponse, ExchangeError> {
        let audio_len = audio.len();
        let part = Part::bytes(audio)
            .file_name(AUDIO_FILENAME)
            .mime_str(AUDIO_MIME)?;
        let form = Form::new().part(AUDIO_FIELD, part);

        debug!("Uploading {} bytes to {}", audio_len, self.endpoint);

        let mut request = self.http.post(&self.endpoint).multipart(form);
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| FALLBACK_SERVER_ERROR.to_string());

            warn!("Upload rejected with status {}: {}", status, message);
            return Err(ExchangeError::Server(message));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ExchangeError::Malformed(e.to_string()))
    }
}
