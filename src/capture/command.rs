use anyhow::{Context, Result};
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::source::{CaptureConfig, CaptureSource, Fragment};

/// Captures microphone audio by running an external recorder process and
/// streaming its stdout in fixed-size fragments.
pub struct CommandCaptureSource {
    config: CaptureConfig,
    child: Option<Child>,
    capturing: bool,
}

impl CommandCaptureSource {
    pub fn new(config: CaptureConfig) -> Result<Self> {
        if config.recorder_command.trim().is_empty() {
            anyhow::bail!("recorder command is not configured");
        }

        Ok(Self {
            config,
            child: None,
            capturing: false,
        })
    }
}

#[async_trait::async_trait]
impl CaptureSource for CommandCaptureSource {
    async fn start(&mut self) -> Result<mpsc::Receiver<Fragment>> {
        let mut child = Command::new(&self.config.recorder_command)
            .args(&self.config.recorder_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| {
                format!("Failed to spawn recorder: {}", self.config.recorder_command)
            })?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("Recorder stdout unavailable"))?;

        let (tx, rx) = mpsc::channel(64);
        let fragment_bytes = self.config.fragment_bytes.max(1);

        // Reader drains stdout to EOF after the recorder exits, so the
        // channel closes only once every fragment has been delivered.
        tokio::spawn(async move {
            let mut sequence = 0usize;
            let mut buf = vec![0u8; fragment_bytes];

            loop {
                match stdout.read(&mut buf).await {
                    Ok(0) => break,
                    Ok(n) => {
                        let fragment = Fragment {
                            data: buf[..n].to_vec(),
                            sequence,
                        };
                        sequence += 1;

                        if tx.send(fragment).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Recorder read failed: {}", e);
                        break;
                    }
                }
            }

            debug!("Recorder stream closed after {} fragments", sequence);
        });

        info!("Recorder started: {}", self.config.recorder_command);

        self.child = Some(child);
        self.capturing = true;

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            child.start_kill().context("Failed to stop recorder")?;

            if let Err(e) = child.wait().await {
                warn!("Failed to reap recorder process: {}", e);
            }

            info!("Recorder stopped");
        }

        self.capturing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "command"
    }
}
