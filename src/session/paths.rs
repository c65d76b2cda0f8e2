//! Locations of the persisted session artifacts.

use std::path::PathBuf;

/// Per-user directory holding the pidfile, log file, and start lock.
#[derive(Debug, Clone)]
pub struct SessionPaths {
    pub base_dir: PathBuf,
}

impl SessionPaths {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Runtime directory of the current user, with a temp-dir fallback for
    /// sessions without XDG_RUNTIME_DIR.
    pub fn system() -> Self {
        Self::new(dirs::runtime_dir().unwrap_or_else(std::env::temp_dir))
    }

    /// Existence of this file means a recording may be active.
    pub fn pid_file(&self) -> PathBuf {
        self.base_dir.join("capgrab.pid")
    }

    /// First line: output path. Remaining lines: latest progress text.
    pub fn log_file(&self) -> PathBuf {
        self.base_dir.join("capgrab.log")
    }

    /// Lock taken across the start transition's check-then-create window.
    pub fn lock_file(&self) -> PathBuf {
        self.base_dir.join("capgrab.lock")
    }
}
