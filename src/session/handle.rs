//! Persisted session handle: the pidfile/logfile pair tracking a recording.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use super::paths::SessionPaths;

/// Record of an active (or formerly active) recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub pid: i32,
    pub output_path: PathBuf,
    /// Last progress line the monitor wrote, if any.
    pub last_status: Option<String>,
}

impl SessionHandle {
    /// Persist a freshly started recording: the pidfile, plus a log file
    /// whose first line is the output path.
    pub fn save(&self, paths: &SessionPaths) -> io::Result<()> {
        fs::write(paths.pid_file(), format!("{}\n", self.pid))?;
        fs::write(
            paths.log_file(),
            format!("{}\n", self.output_path.display()),
        )?;
        Ok(())
    }

    /// Load the handle a previous start left behind, if any.
    ///
    /// An unreadable pid counts as no handle; the stale files are swept by
    /// the next [`SessionHandle::delete`].
    pub fn load(paths: &SessionPaths) -> io::Result<Option<SessionHandle>> {
        let pid_text = match fs::read_to_string(paths.pid_file()) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let Ok(pid) = pid_text.trim().parse::<i32>() else {
            log::warn!("pidfile is corrupt; treating session as inactive");
            return Ok(None);
        };

        let log_text = fs::read_to_string(paths.log_file()).unwrap_or_default();
        let mut lines = log_text.lines();
        let output_path = PathBuf::from(lines.next().unwrap_or_default());
        let last_status = lines
            .next_back()
            .map(str::to_owned)
            .filter(|line| !line.is_empty());

        Ok(Some(SessionHandle {
            pid,
            output_path,
            last_status,
        }))
    }

    /// Rewrite the log file with the output path and the latest progress
    /// line, replacing whatever progress was there before.
    pub fn record_progress(
        paths: &SessionPaths,
        output_path: &Path,
        latest: &str,
    ) -> io::Result<()> {
        fs::write(
            paths.log_file(),
            format!("{}\n{latest}\n", output_path.display()),
        )
    }

    /// Remove both artifacts. Already-missing files are not an error.
    pub fn delete(paths: &SessionPaths) -> io::Result<()> {
        remove_if_exists(&paths.pid_file())?;
        remove_if_exists(&paths.log_file())?;
        Ok(())
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
