use base64::Engine;
use serde::Deserialize;
use tracing::warn;

/// MIME tag carried by synthesized speech replies
pub const SPEECH_MIME: &str = "audio/mp3";

/// Successful exchange payload returned by the server
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeResponse {
    /// What the server heard in the uploaded recording
    pub transcription: Option<String>,
    /// The tutor's textual reply
    pub ai_response: Option<String>,
    /// Base64-encoded MP3 of the spoken reply
    pub audio_base64: Option<String>,
}

/// Error payload returned on non-success responses
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

/// Decoded synthesized speech, ready for playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechClip {
    pub bytes: Vec<u8>,
}

impl SpeechClip {
    pub fn mime(&self) -> &'static str {
        SPEECH_MIME
    }

    /// Embeddable form of the clip, `data:audio/mp3;base64,...`
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            SPEECH_MIME,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

impl ExchangeResponse {
    /// Decodes the speech payload, if the server sent one. A payload that
    /// fails to decode is logged and treated as absent.
    pub fn speech(&self) -> Option<SpeechClip> {
        let encoded = self.audio_base64.as_deref()?;

        match base64::engine::general_purpose::STANDARD.decode(encoded) {
            Ok(bytes) => Some(SpeechClip { bytes }),
            Err(e) => {
                warn!("Failed to decode speech payload: {}", e);
                None
            }
        }
    }
}
