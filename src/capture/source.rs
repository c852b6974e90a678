use anyhow::Result;
use serde::Deserialize;
use tokio::sync::mpsc;

/// One chunk of encoded audio emitted while a recording is in progress
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Raw encoded audio bytes (opaque to the client)
    pub data: Vec<u8>,
    /// Position in the capture stream, starting at 0
    pub sequence: usize,
}

/// Which capture implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureKind {
    /// External recorder process streaming encoded audio on stdout
    Command,
    /// Pre-encoded audio file (demos, tests)
    File,
}

/// Configuration for a capture source
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureConfig {
    pub kind: CaptureKind,
    /// Recorder binary for the command source
    pub recorder_command: String,
    pub recorder_args: Vec<String>,
    /// Upper bound on the size of a single fragment
    pub fragment_bytes: usize,
    /// Input path for the file source
    pub input_file: Option<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            kind: CaptureKind::Command,
            recorder_command: "ffmpeg".to_string(),
            recorder_args: [
                "-loglevel", "quiet", "-f", "alsa", "-i", "default", "-c:a", "libopus", "-f",
                "webm", "-",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            fragment_bytes: 4096,
            input_file: None,
        }
    }
}

/// Audio capture source trait
///
/// Implementations:
/// - Command: external recorder process (microphone path)
/// - File: pre-encoded audio file (demos, batch testing)
#[async_trait::async_trait]
pub trait CaptureSource: Send + Sync {
    /// Begin capturing audio
    ///
    /// Returns a channel receiver that yields fragments in capture order.
    /// The channel closes only after the final fragment of the session has
    /// been delivered; the close is the finalize signal.
    async fn start(&mut self) -> Result<mpsc::Receiver<Fragment>>;

    /// Finalize the capture, letting any buffered fragments flush
    async fn stop(&mut self) -> Result<()>;

    /// Check if the source is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get source name for logging
    fn name(&self) -> &str;
}

/// Capture source factory
pub struct CaptureSourceFactory;

impl CaptureSourceFactory {
    /// Create a capture source based on configuration
    pub fn create(config: &CaptureConfig) -> Result<Box<dyn CaptureSource>> {
        match config.kind {
            CaptureKind::Command => {
                let source = super::command::CommandCaptureSource::new(config.clone())?;
                Ok(Box::new(source))
            }
            CaptureKind::File => {
                let path = config.input_file.clone().ok_or_else(|| {
                    anyhow::anyhow!("capture.input_file is required for the file capture source")
                })?;
                Ok(Box::new(super::file::FileCaptureSource::new(
                    path,
                    config.fragment_bytes,
                )))
            }
        }
    }
}
