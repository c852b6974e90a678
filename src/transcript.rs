use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Who produced a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Ai,
}

/// One rendered entry in the visible chat log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// The ordered, user-visible log of exchanged messages.
///
/// Grows only through successful exchanges, or is cleared atomically by an
/// explicit reset; it never ends up holding half an exchange.
#[derive(Default)]
pub struct Transcript {
    entries: Mutex<Vec<ChatMessage>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the user/assistant pair of one successful exchange under a
    /// single lock.
    pub async fn append_exchange(&self, transcription: &str, ai_response: &str) {
        let now = Utc::now();
        let mut entries = self.entries.lock().await;

        entries.push(ChatMessage {
            speaker: Speaker::User,
            text: format!("Você: {}", transcription),
            timestamp: now,
        });
        entries.push(ChatMessage {
            speaker: Speaker::Ai,
            text: format!("Professor: {}", ai_response),
            timestamp: now,
        });
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn entries(&self) -> Vec<ChatMessage> {
        self.entries.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
