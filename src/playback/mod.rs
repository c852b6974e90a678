use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error};

use crate::exchange::SpeechClip;

/// Plays synthesized speech replies. Playback is fire-and-forget; failures
/// are logged, never surfaced to the user.
pub trait SpeechPlayer: Send + Sync {
    fn play(&self, clip: SpeechClip);
}

/// Pipes MP3 bytes into an external player process (e.g. `mpg123 -q -`).
pub struct CommandSpeechPlayer {
    command: String,
    args: Vec<String>,
}

impl CommandSpeechPlayer {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }
}

impl SpeechPlayer for CommandSpeechPlayer {
    fn play(&self, clip: SpeechClip) {
        let command = self.command.clone();
        let args = self.args.clone();

        tokio::spawn(async move {
            debug!(
                "Playing speech reply ({} bytes) via {}",
                clip.bytes.len(),
                command
            );

            let result = async {
                let mut child = Command::new(&command)
                    .args(&args)
                    .stdin(Stdio::piped())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn()?;

                let mut stdin = child.stdin.take().ok_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::Other, "player stdin unavailable")
                })?;
                stdin.write_all(&clip.bytes).await?;
                drop(stdin);

                let status = child.wait().await?;
                if !status.success() {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        format!("player exited with {}", status),
                    ));
                }

                Ok::<_, std::io::Error>(())
            }
            .await;

            if let Err(e) = result {
                error!("Falha ao reproduzir áudio: {}", e);
            }
        });
    }
}

/// Discards clips; used when playback is disabled.
pub struct NullPlayer;

impl SpeechPlayer for NullPlayer {
    fn play(&self, _clip: SpeechClip) {}
}
