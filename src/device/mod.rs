//! Capture-device resolution: screen/window geometry and audio endpoints.
//!
//! Geometry comes from the X11 query tools (`xdpyinfo`, `xprop`,
//! `xwininfo`); audio endpoints come from the PulseAudio sink listing.
//! Everything here is a read-only query with no side effects.

mod audio;
mod geometry;

pub use audio::{AudioEndpoints, DEFAULT_RECORD_SOURCE, resolve_audio};
pub use geometry::{CaptureGeometry, active_window_geometry, screen_geometry};

use std::process::{Command, Stdio};

use thiserror::Error;

/// Errors from querying the display or audio device state.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to launch {0}: {1}")]
    Launch(&'static str, #[source] std::io::Error),

    #[error("{0} exited with failure: {1}")]
    ToolFailed(&'static str, String),

    #[error("unexpected {0} output: {1}")]
    Parse(&'static str, String),

    #[error("DISPLAY is not set")]
    DisplayUnset,
}

/// Run a query tool and return its stdout as text.
fn run_tool(tool: &'static str, args: &[&str]) -> Result<String, DeviceError> {
    let output = Command::new(tool)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| DeviceError::Launch(tool, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DeviceError::ToolFailed(tool, stderr.trim().to_string()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
