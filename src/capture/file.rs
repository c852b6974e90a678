use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use super::source::{CaptureSource, Fragment};

/// Capture source backed by a pre-encoded audio file.
///
/// The file is emitted as ordered fragments as soon as capture starts, but
/// the channel stays open until `stop` so the session behaves like a live
/// recording: the close still arrives after the last fragment.
pub struct FileCaptureSource {
    path: PathBuf,
    fragment_bytes: usize,
    shutdown: Option<oneshot::Sender<()>>,
    capturing: bool,
}

impl FileCaptureSource {
    pub fn new(path: impl AsRef<Path>, fragment_bytes: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            fragment_bytes,
            shutdown: None,
            capturing: false,
        }
    }
}

#[async_trait::async_trait]
impl CaptureSource for FileCaptureSource {
    async fn start(&mut self) -> Result<mpsc::Receiver<Fragment>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read audio file: {}", self.path.display()))?;

        info!(
            "File capture source started: {} ({} bytes)",
            self.path.display(),
            bytes.len()
        );

        let (tx, rx) = mpsc::channel(64);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let fragment_bytes = self.fragment_bytes.max(1);

        tokio::spawn(async move {
            for (sequence, chunk) in bytes.chunks(fragment_bytes).enumerate() {
                let fragment = Fragment {
                    data: chunk.to_vec(),
                    sequence,
                };

                if tx.send(fragment).await.is_err() {
                    return;
                }
            }

            // Hold the channel open until stop; closing it is the finalize
            // signal for the session.
            let _ = shutdown_rx.await;
        });

        self.shutdown = Some(shutdown_tx);
        self.capturing = true;

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
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
        "file"
    }
}
