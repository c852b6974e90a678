//! The voice interaction controller: a three-state recording session
//! (Idle, Recording, Uploading) over a pluggable capture source, with one
//! upload/response exchange per finalized recording.

mod controller;

pub use controller::{RecorderState, VoiceController};
