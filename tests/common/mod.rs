// Shared fixtures for integration tests: a stub backend that captures the
// multipart upload and replies with canned JSON, plus scripted/recording
// implementations of the controller's injected boundaries.

#![allow(dead_code)]

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use voz_tutor::{CaptureSource, ConfirmPrompt, Fragment, Notify, SpeechClip, SpeechPlayer};

/// One observed upload request
#[derive(Debug, Default, Clone)]
pub struct CapturedUpload {
    pub audio: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub token_header: Option<String>,
}

#[derive(Clone)]
struct StubState {
    reply_status: StatusCode,
    reply_body: serde_json::Value,
    captured: Arc<Mutex<Vec<CapturedUpload>>>,
}

/// Spawns a stub backend on an ephemeral port. Returns the upload URL and
/// the requests it has seen.
pub async fn spawn_stub(
    status: StatusCode,
    body: serde_json::Value,
) -> (String, Arc<Mutex<Vec<CapturedUpload>>>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        reply_status: status,
        reply_body: body,
        captured: Arc::clone(&captured),
    };

    let app = Router::new()
        .route("/process_audio/", post(handle_upload))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });

    (format!("http://{}/process_audio/", addr), captured)
}

async fn handle_upload(
    State(state): State<StubState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut upload = CapturedUpload {
        token_header: headers
            .get("X-CSRFToken")
            .and_then(|value| value.to_str().ok())
            .map(String::from),
        ..Default::default()
    };

    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        if field.name() == Some("audio") {
            upload.file_name = field.file_name().map(String::from);
            upload.content_type = field.content_type().map(String::from);
            upload.audio = field.bytes().await.expect("field bytes").to_vec();
        }
    }

    state.captured.lock().unwrap().push(upload);

    (state.reply_status, axum::Json(state.reply_body.clone()))
}

/// Notifier that records every alert and status line
#[derive(Default)]
pub struct RecordingNotifier {
    pub alerts: Mutex<Vec<String>>,
    pub statuses: Mutex<Vec<String>>,
}

impl Notify for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn status(&self, message: &str) {
        self.statuses.lock().unwrap().push(message.to_string());
    }
}

/// Confirmation prompt with a scripted answer
pub struct ScriptedConfirm(pub bool);

impl ConfirmPrompt for ScriptedConfirm {
    fn confirm(&self, _question: &str) -> bool {
        self.0
    }
}

/// Player that stores every clip it is asked to play
#[derive(Default)]
pub struct RecordingPlayer {
    pub clips: Mutex<Vec<SpeechClip>>,
}

impl SpeechPlayer for RecordingPlayer {
    fn play(&self, clip: SpeechClip) {
        self.clips.lock().unwrap().push(clip);
    }
}

/// Capture source that emits preset fragments on start and holds the
/// channel open until stop, like a live recording.
pub struct ScriptedCaptureSource {
    fragments: Vec<Vec<u8>>,
    shutdown: Option<oneshot::Sender<()>>,
    capturing: bool,
}

impl ScriptedCaptureSource {
    pub fn new(fragments: Vec<Vec<u8>>) -> Self {
        Self {
            fragments,
            shutdown: None,
            capturing: false,
        }
    }
}

#[async_trait::async_trait]
impl CaptureSource for ScriptedCaptureSource {
    async fn start(&mut self) -> anyhow::Result<mpsc::Receiver<Fragment>> {
        let (tx, rx) = mpsc::channel(64);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let fragments = self.fragments.clone();

        tokio::spawn(async move {
            for (sequence, data) in fragments.into_iter().enumerate() {
                if tx.send(Fragment { data, sequence }).await.is_err() {
                    return;
                }
            }
            let _ = shutdown_rx.await;
        });

        self.shutdown = Some(shutdown_tx);
        self.capturing = true;

        Ok(rx)
    }

    async fn stop(&mut self) -> anyhow::Result<()> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.capturing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
