pub mod auth;
pub mod capture;
pub mod config;
pub mod controller;
pub mod exchange;
pub mod playback;
pub mod transcript;
pub mod ui;

pub use capture::{
    CaptureConfig, CaptureKind, CaptureSource, CaptureSourceFactory, CommandCaptureSource,
    FileCaptureSource, Fragment,
};
pub use config::Config;
pub use controller::{RecorderState, VoiceController};
pub use exchange::{ExchangeClient, ExchangeError, ExchangeResponse, SpeechClip};
pub use playback::{CommandSpeechPlayer, NullPlayer, SpeechPlayer};
pub use transcript::{ChatMessage, Speaker, Transcript};
pub use ui::{ConfirmPrompt, ConsoleNotifier, Notify, StdinConfirm};
