//! Trait seams between the session controller and the operating system.
//! Each component can be mocked in tests.

use std::fs;
use std::io;
use std::process::{Command, Stdio};

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

use crate::record::{CAPTURE_ENGINE, RecordCommand};

/// Abstraction over signalling and inspecting the tracked capture process.
pub trait ProcessControl {
    /// True when `pid` is alive and still runs the expected capture
    /// engine. Guards against pid reuse: a recycled id must not be
    /// mistaken for our recording.
    fn is_expected_process(&self, pid: i32) -> bool;

    /// Deliver SIGTERM to `pid`.
    fn terminate(&self, pid: i32) -> io::Result<()>;
}

/// Abstraction over spawning the long-lived capture process.
pub trait RecorderSpawner {
    fn spawn(&self, command: &RecordCommand) -> io::Result<RecordingProcess>;
}

/// A spawned capture process: its id and its progress stream.
pub struct RecordingProcess {
    pub pid: i32,
    pub progress: Box<dyn io::Read + Send>,
}

/// Bundle of OS dependencies used by the session controller.
pub struct SessionDependencies {
    pub process: Box<dyn ProcessControl>,
    pub spawner: Box<dyn RecorderSpawner>,
}

impl Default for SessionDependencies {
    fn default() -> Self {
        Self {
            process: Box::new(SystemProcessControl),
            spawner: Box::new(SystemRecorderSpawner),
        }
    }
}

struct SystemProcessControl;
struct SystemRecorderSpawner;

impl ProcessControl for SystemProcessControl {
    fn is_expected_process(&self, pid: i32) -> bool {
        if kill(Pid::from_raw(pid), None).is_err() {
            return false;
        }
        match fs::read_to_string(format!("/proc/{pid}/comm")) {
            Ok(comm) => comm.trim() == CAPTURE_ENGINE,
            Err(_) => false,
        }
    }

    fn terminate(&self, pid: i32) -> io::Result<()> {
        kill(Pid::from_raw(pid), Signal::SIGTERM).map_err(io::Error::from)
    }
}

impl RecorderSpawner for SystemRecorderSpawner {
    fn spawn(&self, command: &RecordCommand) -> io::Result<RecordingProcess> {
        let mut child = Command::new(CAPTURE_ENGINE)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let progress = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("capture process has no progress stream"))?;

        // The child is left to run past this invocation; a later stop
        // invocation ends it with a signal.
        Ok(RecordingProcess {
            pid: child.id() as i32,
            progress: Box::new(progress),
        })
    }
}
