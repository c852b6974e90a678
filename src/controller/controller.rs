use crate::capture::{CaptureConfig, CaptureSource, CaptureSourceFactory, Fragment};
use crate::exchange::{ExchangeClient, ExchangeError, ExchangeResponse};
use crate::playback::SpeechPlayer;
use crate::transcript::Transcript;
use crate::ui::{ConfirmPrompt, Notify};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Recorder half of the controller's state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// No active capture; start is the only meaningful action
    Idle,
    /// Fragments are accumulating from the capture source
    Recording,
    /// The finalized recording is being concatenated and sent
    Uploading,
}

/// The voice interaction controller.
///
/// Owns the capture session state machine, the chat transcript, and the
/// one-exchange-per-recording upload flow. Methods take `&self`; shared
/// state lives behind `Arc` so the per-session collector task can finish
/// after the caller has moved on.
pub struct VoiceController {
    /// Capture capability; stays `None` when initialization failed
    source: Arc<Mutex<Option<Box<dyn CaptureSource>>>>,

    state: Arc<Mutex<RecorderState>>,

    /// Bumped on every start; a finished upload compares against it so a
    /// stale session never touches the state machine (last response wins)
    generation: Arc<AtomicU64>,

    /// Collector task of the most recent session
    collector: Arc<Mutex<Option<JoinHandle<()>>>>,

    client: Arc<ExchangeClient>,
    transcript: Arc<Transcript>,
    notifier: Arc<dyn Notify>,
    confirm: Arc<dyn ConfirmPrompt>,
    player: Arc<dyn SpeechPlayer>,
}

impl VoiceController {
    pub fn new(
        client: ExchangeClient,
        notifier: Arc<dyn Notify>,
        confirm: Arc<dyn ConfirmPrompt>,
        player: Arc<dyn SpeechPlayer>,
    ) -> Self {
        Self {
            source: Arc::new(Mutex::new(None)),
            state: Arc::new(Mutex::new(RecorderState::Idle)),
            generation: Arc::new(AtomicU64::new(0)),
            collector: Arc::new(Mutex::new(None)),
            client: Arc::new(client),
            transcript: Arc::new(Transcript::new()),
            notifier,
            confirm,
            player,
        }
    }

    /// Requests the capture capability. On failure the controller reports a
    /// fatal alert and stays usable for everything except recording.
    pub async fn initialize(&self, config: &CaptureConfig) {
        match CaptureSourceFactory::create(config) {
            Ok(source) => {
                info!("Capture source ready: {}", source.name());
                *self.source.lock().await = Some(source);
            }
            Err(e) => {
                warn!("Capture capability unavailable: {:#}", e);
                self.notifier
                    .alert(&format!("Erro ao acessar o microfone: {:#}", e));
            }
        }
    }

    /// Attaches an already-built capture source (tests, alternate front-ends).
    pub async fn attach_source(&self, source: Box<dyn CaptureSource>) {
        *self.source.lock().await = Some(source);
    }

    /// Starts a new capture session.
    ///
    /// Rejected with an alert when no capture source exists or a session is
    /// already recording; an in-flight upload does not block a new start.
    pub async fn start(&self) {
        let mut source_guard = self.source.lock().await;
        let source = match source_guard.as_mut() {
            Some(source) => source,
            None => {
                self.notifier.alert("Gravador não está disponível.");
                return;
            }
        };

        let mut state = self.state.lock().await;
        if *state == RecorderState::Recording {
            self.notifier.alert("Gravação já está em andamento.");
            return;
        }

        let rx = match source.start().await {
            Ok(rx) => rx,
            Err(e) => {
                warn!("Failed to start capture: {:#}", e);
                self.notifier
                    .alert(&format!("Erro ao acessar o microfone: {:#}", e));
                return;
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *state = RecorderState::Recording;
        drop(state);
        drop(source_guard);

        let handle = tokio::spawn(Self::collect_and_exchange(
            rx,
            generation,
            Arc::clone(&self.state),
            Arc::clone(&self.generation),
            Arc::clone(&self.client),
            Arc::clone(&self.transcript),
            Arc::clone(&self.notifier),
            Arc::clone(&self.player),
        ));

        // Replacing the handle detaches a still-running upload from an
        // earlier session; its display updates land in completion order.
        *self.collector.lock().await = Some(handle);

        info!("Recording started (session {})", generation);
        self.notifier.status("Gravação iniciada...");
    }

    /// Finalizes the active capture session and hands off to the upload.
    pub async fn stop(&self) {
        let mut source_guard = self.source.lock().await;
        let mut state = self.state.lock().await;

        if *state != RecorderState::Recording {
            self.notifier.alert("Gravador não está gravando.");
            return;
        }

        if let Some(source) = source_guard.as_mut() {
            if let Err(e) = source.stop().await {
                warn!("Failed to finalize capture: {:#}", e);
            }
        }

        *state = RecorderState::Uploading;
        drop(state);
        drop(source_guard);

        self.notifier.status("Gravação parada. Processando...");
    }

    /// Clears the conversation after user confirmation.
    pub async fn reset(&self) {
        if !self
            .confirm
            .confirm("Tem certeza de que deseja resetar a conversa?")
        {
            return;
        }

        self.transcript.clear().await;
        info!("Transcript cleared");
        self.notifier.alert("Conversa resetada com sucesso.");
    }

    pub async fn state(&self) -> RecorderState {
        *self.state.lock().await
    }

    pub fn transcript(&self) -> Arc<Transcript> {
        Arc::clone(&self.transcript)
    }

    /// Waits for the most recent upload to finish. Used on shutdown and by
    /// tests; recording flows never block on this.
    pub async fn wait_idle(&self) {
        let handle = self.collector.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("Upload task panicked: {}", e);
            }
        }
    }

    /// Per-session collector: drains the fragment channel (the close is the
    /// finalize signal and always follows the last fragment), concatenates,
    /// performs the exchange, and applies the outcome to the display layer.
    #[allow(clippy::too_many_arguments)]
    async fn collect_and_exchange(
        mut rx: mpsc::Receiver<Fragment>,
        generation: u64,
        state: Arc<Mutex<RecorderState>>,
        current_generation: Arc<AtomicU64>,
        client: Arc<ExchangeClient>,
        transcript: Arc<Transcript>,
        notifier: Arc<dyn Notify>,
        player: Arc<dyn SpeechPlayer>,
    ) {
        let mut fragments: Vec<Vec<u8>> = Vec::new();
        while let Some(fragment) = rx.recv().await {
            fragments.push(fragment.data);
        }

        let audio = fragments.concat();
        info!(
            "Capture session {} finalized: {} fragments, {} bytes",
            generation,
            fragments.len(),
            audio.len()
        );

        notifier.status("Enviando áudio para o servidor...");

        let outcome = client.send(audio).await;
        Self::apply_exchange_outcome(outcome, &transcript, notifier.as_ref(), player.as_ref())
            .await;

        // Last response wins: only the newest session returns the state
        // machine to Idle.
        if current_generation.load(Ordering::SeqCst) == generation {
            let mut state = state.lock().await;
            if *state == RecorderState::Uploading {
                *state = RecorderState::Idle;
            }
        }
    }

    /// Applies one exchange outcome. The transcript changes only when both
    /// required fields are present; every error path leaves it untouched.
    async fn apply_exchange_outcome(
        outcome: Result<ExchangeResponse, ExchangeError>,
        transcript: &Transcript,
        notifier: &dyn Notify,
        player: &dyn SpeechPlayer,
    ) {
        match outcome {
            Ok(response) => match (&response.transcription, &response.ai_response) {
                (Some(transcription), Some(ai_response)) => {
                    transcript.append_exchange(transcription, ai_response).await;
                    notifier.status("");

                    if let Some(clip) = response.speech() {
                        player.play(clip);
                    }
                }
                _ => {
                    warn!("Exchange response missing required fields");
                    notifier.status("Erro: Resposta inválida do servidor.");
                }
            },
            Err(e) => {
                warn!("Exchange failed: {}", e);
                notifier.status(&format!("Erro ao processar solicitação: {}", e));
            }
        }
    }
}
