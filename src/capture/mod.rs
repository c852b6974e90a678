pub mod command;
pub mod file;
pub mod source;

pub use command::CommandCaptureSource;
pub use file::FileCaptureSource;
pub use source::{CaptureConfig, CaptureKind, CaptureSource, CaptureSourceFactory, Fragment};
