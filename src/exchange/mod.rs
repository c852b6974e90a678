//! One request/response exchange per finalized recording: the multipart
//! upload, the decoded transcription/reply pair, and the optional
//! synthesized speech payload.

pub mod client;
pub mod messages;

pub use client::{ExchangeClient, ExchangeError, TOKEN_HEADER};
pub use messages::{ErrorBody, ExchangeResponse, SpeechClip, SPEECH_MIME};
