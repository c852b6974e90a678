use anyhow::Result;
use serde::Deserialize;

use crate::capture::CaptureConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub server: ServerConfig,
    pub capture: CaptureConfig,
    pub playback: PlaybackConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub base_url: String,
    pub upload_path: String,
    /// File holding the browser-style cookie string with the auth token
    pub cookie_file: String,
    pub cookie_name: String,
}

impl ServerConfig {
    pub fn upload_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.upload_path)
    }
}

#[derive(Debug, Deserialize)]
pub struct PlaybackConfig {
    pub enabled: bool,
    pub command: String,
    pub args: Vec<String>,
}

impl Config {
    /// Loads configuration from an optional TOML file layered over built-in
    /// defaults, so the binary runs without a config file present.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "voz-tutor")?
            .set_default("server.base_url", "http://127.0.0.1:8000")?
            .set_default("server.upload_path", "/process_audio/")?
            .set_default("server.cookie_file", "cookies.txt")?
            .set_default("server.cookie_name", "csrftoken")?
            .set_default("capture.kind", "command")?
            .set_default("capture.recorder_command", "ffmpeg")?
            .set_default(
                "capture.recorder_args",
                vec![
                    "-loglevel", "quiet", "-f", "alsa", "-i", "default", "-c:a", "libopus",
                    "-f", "webm", "-",
                ],
            )?
            .set_default("capture.fragment_bytes", 4096)?
            .set_default("playback.enabled", true)?
            .set_default("playback.command", "mpg123")?
            .set_default("playback.args", vec!["-q", "-"])?
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
