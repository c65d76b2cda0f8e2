//! Capture-process invocation building and progress monitoring.

mod command;
mod monitor;

pub use command::{RecordCommand, build_record_command};
pub use monitor::monitor_progress;

/// The external capture engine driving every recording.
pub const CAPTURE_ENGINE: &str = "ffmpeg";
