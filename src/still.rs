//! Still-capture dispatch to the external screenshot tool.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

/// Tool invoked for still captures.
pub const SCREENSHOT_TOOL: &str = "gnome-screenshot";

/// Which part of the screen a still capture grabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StillMode {
    FullScreen,
    ActiveWindow,
    Area,
}

/// Errors from taking a still capture.
#[derive(Debug, Error)]
pub enum StillError {
    #[error("failed to launch {SCREENSHOT_TOOL}: {0}")]
    Launch(#[source] std::io::Error),

    #[error("{SCREENSHOT_TOOL} exited with status {0}")]
    Failed(i32),
}

/// Argument list for the screenshot tool. `-B` drops the window border so
/// stills match the recording pipeline's raw grab.
pub fn screenshot_args(mode: StillMode, output: &Path) -> Vec<String> {
    let mut args = vec![
        "-B".to_string(),
        "-f".to_string(),
        output.to_string_lossy().into_owned(),
    ];
    match mode {
        StillMode::FullScreen => {}
        StillMode::ActiveWindow => args.push("-w".to_string()),
        StillMode::Area => args.push("-a".to_string()),
    }
    args
}

/// Take a still capture to `output`.
pub fn capture_still(mode: StillMode, output: &Path) -> Result<(), StillError> {
    log::debug!("still capture {mode:?} to {}", output.display());

    let status = Command::new(SCREENSHOT_TOOL)
        .args(screenshot_args(mode, output))
        .status()
        .map_err(StillError::Launch)?;

    if !status.success() {
        return Err(StillError::Failed(status.code().unwrap_or(-1)));
    }

    Ok(())
}
