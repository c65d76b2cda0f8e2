//! The start/stop state machine for recording sessions.

use std::fs::File;
use std::path::PathBuf;

use fs2::FileExt;
use thiserror::Error;

use super::dependencies::SessionDependencies;
use super::handle::SessionHandle;
use super::paths::SessionPaths;
use crate::codec::SelectedCodecs;
use crate::device::{AudioEndpoints, CaptureGeometry};
use crate::output;
use crate::record::{build_record_command, monitor_progress};

/// Errors from toggling the recording session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no usable video or audio encoder is available")]
    CodecsUnavailable,

    #[error("another recording was started concurrently")]
    AlreadyRecording,

    #[error("failed to launch capture process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("session state error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a start transition needs, resolved ahead of time.
pub struct StartRequest {
    pub codecs: SelectedCodecs,
    pub geometry: CaptureGeometry,
    pub audio: AudioEndpoints,
    /// Caller-supplied output path; auto-generated when absent.
    pub explicit_output: Option<PathBuf>,
    /// Directory for auto-generated recordings.
    pub video_dir: PathBuf,
    pub framerate: u32,
    pub threads: usize,
}

/// What one toggle invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A recording ran to completion; returned once the capture process
    /// has exited (normally because a later invocation stopped it).
    Started { output_path: PathBuf },
    /// A running recording was signalled and its artifacts removed.
    Stopped { output_path: PathBuf },
}

/// Owns the recording lifecycle. At most one session exists per user; the
/// start branch is only reached after the stop check found nothing live.
pub struct SessionController {
    paths: SessionPaths,
    deps: SessionDependencies,
}

impl SessionController {
    pub fn new(paths: SessionPaths) -> Self {
        Self::with_dependencies(paths, SessionDependencies::default())
    }

    /// Controller with custom OS dependencies (useful for testing).
    pub fn with_dependencies(paths: SessionPaths, deps: SessionDependencies) -> Self {
        Self { paths, deps }
    }

    /// Stop the tracked recording when one is live, otherwise start one.
    pub fn toggle(&self, request: &StartRequest) -> Result<ToggleOutcome, SessionError> {
        if let Some(outcome) = self.try_stop()? {
            return Ok(outcome);
        }
        self.start(request)
    }

    /// Stop transition. `Ok(None)` means no live session was found; a
    /// stale or unsignallable handle is swept so it cannot block future
    /// recordings.
    fn try_stop(&self) -> Result<Option<ToggleOutcome>, SessionError> {
        let Some(handle) = SessionHandle::load(&self.paths)? else {
            return Ok(None);
        };

        if !self.deps.process.is_expected_process(handle.pid) {
            log::warn!(
                "stale session handle (pid {}); starting a fresh recording",
                handle.pid
            );
            SessionHandle::delete(&self.paths)?;
            return Ok(None);
        }

        if let Some(status) = &handle.last_status {
            log::debug!("last recorded progress: {status}");
        }

        // The liveness probe can race process exit, so a failed signal
        // still means "no session" rather than an error.
        if let Err(err) = self.deps.process.terminate(handle.pid) {
            log::warn!("could not signal recording process {}: {err}", handle.pid);
            SessionHandle::delete(&self.paths)?;
            return Ok(None);
        }

        log::info!("stopped recording {}", handle.output_path.display());
        SessionHandle::delete(&self.paths)?;

        Ok(Some(ToggleOutcome::Stopped {
            output_path: handle.output_path,
        }))
    }

    /// Start transition: codec check, then spawn-and-persist under the
    /// start lock, then block monitoring progress until the process ends.
    fn start(&self, request: &StartRequest) -> Result<ToggleOutcome, SessionError> {
        let (Some(video), Some(audio_codec)) = (&request.codecs.video, &request.codecs.audio)
        else {
            // Refused before any file is created or process launched.
            return Err(SessionError::CodecsUnavailable);
        };

        let lock_file = File::create(self.paths.lock_file())?;
        lock_file.lock_exclusive()?;

        // Re-check under the lock: a racing invocation may have started
        // between our stop check and here.
        if let Some(existing) = SessionHandle::load(&self.paths)? {
            if self.deps.process.is_expected_process(existing.pid) {
                let _ = FileExt::unlock(&lock_file);
                return Err(SessionError::AlreadyRecording);
            }
        }

        let output_path =
            output::resolve_video_target(request.explicit_output.as_deref(), &request.video_dir)?;

        let command = build_record_command(
            video,
            audio_codec,
            &request.geometry,
            &request.audio,
            &output_path,
            request.framerate,
            request.threads,
        );
        log::debug!("capture invocation: {:?}", command.args);

        let process = self
            .deps
            .spawner
            .spawn(&command)
            .map_err(SessionError::Spawn)?;

        let handle = SessionHandle {
            pid: process.pid,
            output_path: output_path.clone(),
            last_status: None,
        };
        handle.save(&self.paths)?;

        FileExt::unlock(&lock_file)
            .unwrap_or_else(|err| log::warn!("failed to release start lock: {err}"));

        log::info!(
            "recording to {} (pid {})",
            output_path.display(),
            process.pid
        );

        // Block until the capture process exits; the artifacts stay behind
        // for the stop invocation (or stale-sweep) to clean up.
        monitor_progress(process.progress, |line| {
            if let Err(err) = SessionHandle::record_progress(&self.paths, &output_path, line) {
                log::warn!("failed to update session log: {err}");
            }
        })?;

        Ok(ToggleOutcome::Started { output_path })
    }
}
