use std::fs;
use std::io::{self, Cursor};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use super::controller::{SessionController, SessionError, StartRequest, ToggleOutcome};
use super::dependencies::{
    ProcessControl, RecorderSpawner, RecordingProcess, SessionDependencies,
};
use super::handle::SessionHandle;
use super::paths::SessionPaths;
use crate::codec::{AudioCodec, SelectedCodecs, VideoCodec};
use crate::device::{AudioEndpoints, CaptureGeometry};
use crate::record::RecordCommand;

struct MockProcessControl {
    alive: bool,
    terminate_ok: bool,
    terminated: Arc<Mutex<Vec<i32>>>,
}

impl MockProcessControl {
    fn new(alive: bool, terminate_ok: bool) -> Self {
        Self {
            alive,
            terminate_ok,
            terminated: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ProcessControl for MockProcessControl {
    fn is_expected_process(&self, _pid: i32) -> bool {
        self.alive
    }

    fn terminate(&self, pid: i32) -> io::Result<()> {
        if self.terminate_ok {
            self.terminated.lock().unwrap().push(pid);
            Ok(())
        } else {
            Err(io::Error::other("no such process"))
        }
    }
}

struct MockSpawner {
    pid: i32,
    progress: &'static str,
    spawned: Arc<Mutex<Vec<RecordCommand>>>,
}

impl MockSpawner {
    fn new(pid: i32, progress: &'static str) -> Self {
        Self {
            pid,
            progress,
            spawned: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl RecorderSpawner for MockSpawner {
    fn spawn(&self, command: &RecordCommand) -> io::Result<RecordingProcess> {
        self.spawned.lock().unwrap().push(command.clone());
        Ok(RecordingProcess {
            pid: self.pid,
            progress: Box::new(Cursor::new(self.progress.as_bytes())),
        })
    }
}

fn available_codecs() -> SelectedCodecs {
    SelectedCodecs {
        video: Some(VideoCodec {
            encoder: "libx264".to_string(),
            quality_args: vec!["-crf".to_string(), "16".to_string()],
        }),
        audio: Some(AudioCodec {
            encoder: "aac".to_string(),
            bitrate: "256k",
        }),
    }
}

fn request(temp: &TempDir, codecs: SelectedCodecs) -> StartRequest {
    StartRequest {
        codecs,
        geometry: CaptureGeometry {
            width: 1920,
            height: 1080,
            offset_x: 0,
            offset_y: 0,
            display: ":0.0".to_string(),
        },
        audio: AudioEndpoints {
            monitor_source: None,
            record_source: "default".to_string(),
        },
        explicit_output: None,
        video_dir: temp.path().join("videos"),
        framerate: 30,
        threads: 4,
    }
}

fn controller(
    temp: &TempDir,
    process: MockProcessControl,
    spawner: MockSpawner,
) -> SessionController {
    SessionController::with_dependencies(
        SessionPaths::new(temp.path().to_path_buf()),
        SessionDependencies {
            process: Box::new(process),
            spawner: Box::new(spawner),
        },
    )
}

#[test]
fn start_when_idle_persists_pid_and_output_path() {
    let temp = TempDir::new().unwrap();
    let paths = SessionPaths::new(temp.path().to_path_buf());
    let spawner = MockSpawner::new(4242, "frame=1 fps=30\rframe=2 fps=30\n");
    let spawned = spawner.spawned.clone();

    let outcome = controller(&temp, MockProcessControl::new(false, false), spawner)
        .toggle(&request(&temp, available_codecs()))
        .unwrap();

    let ToggleOutcome::Started { output_path } = outcome else {
        panic!("expected a start");
    };
    assert_eq!(spawned.lock().unwrap().len(), 1);

    let pid_text = fs::read_to_string(paths.pid_file()).unwrap();
    assert_eq!(pid_text.trim(), "4242");

    let log_text = fs::read_to_string(paths.log_file()).unwrap();
    let mut lines = log_text.lines();
    assert_eq!(lines.next(), Some(output_path.to_str().unwrap()));
    // The monitor replaced the progress line as the stream advanced.
    assert_eq!(lines.next(), Some("frame=2 fps=30"));
}

#[test]
fn stop_when_recording_removes_artifacts_and_reports_path() {
    let temp = TempDir::new().unwrap();
    let paths = SessionPaths::new(temp.path().to_path_buf());
    let recorded = PathBuf::from("/videos/host.2026-08-29.mkv");
    SessionHandle {
        pid: 777,
        output_path: recorded.clone(),
        last_status: None,
    }
    .save(&paths)
    .unwrap();

    let process = MockProcessControl::new(true, true);
    let terminated = process.terminated.clone();
    let spawner = MockSpawner::new(1, "");
    let spawned = spawner.spawned.clone();

    let outcome = controller(&temp, process, spawner)
        .toggle(&request(&temp, available_codecs()))
        .unwrap();

    assert_eq!(
        outcome,
        ToggleOutcome::Stopped {
            output_path: recorded
        }
    );
    assert_eq!(terminated.lock().unwrap().as_slice(), &[777]);
    assert!(spawned.lock().unwrap().is_empty());
    assert!(!paths.pid_file().exists());
    assert!(!paths.log_file().exists());
}

#[test]
fn stop_reports_first_line_regardless_of_progress_text() {
    let temp = TempDir::new().unwrap();
    let paths = SessionPaths::new(temp.path().to_path_buf());
    fs::write(paths.pid_file(), "55\n").unwrap();
    fs::write(
        paths.log_file(),
        "/videos/clip.mkv\nframe=9000 fps=30 time=00:05:00\n",
    )
    .unwrap();

    let outcome = controller(
        &temp,
        MockProcessControl::new(true, true),
        MockSpawner::new(1, ""),
    )
    .toggle(&request(&temp, available_codecs()))
    .unwrap();

    assert_eq!(
        outcome,
        ToggleOutcome::Stopped {
            output_path: PathBuf::from("/videos/clip.mkv")
        }
    );
}

#[test]
fn start_without_codecs_fails_with_zero_side_effects() {
    let temp = TempDir::new().unwrap();
    let spawner = MockSpawner::new(1, "");
    let spawned = spawner.spawned.clone();

    let result = controller(&temp, MockProcessControl::new(false, false), spawner)
        .toggle(&request(&temp, SelectedCodecs::default()));

    assert!(matches!(result, Err(SessionError::CodecsUnavailable)));
    assert!(spawned.lock().unwrap().is_empty());
    // No pidfile, no log file, no lock file, no output directory.
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn stale_pid_falls_through_to_a_fresh_start() {
    let temp = TempDir::new().unwrap();
    let paths = SessionPaths::new(temp.path().to_path_buf());
    SessionHandle {
        pid: 999,
        output_path: PathBuf::from("/videos/old.mkv"),
        last_status: None,
    }
    .save(&paths)
    .unwrap();

    // Dead process: the handle must not block a new recording.
    let spawner = MockSpawner::new(1234, "");
    let spawned = spawner.spawned.clone();
    let outcome = controller(&temp, MockProcessControl::new(false, false), spawner)
        .toggle(&request(&temp, available_codecs()))
        .unwrap();

    assert!(matches!(outcome, ToggleOutcome::Started { .. }));
    assert_eq!(spawned.lock().unwrap().len(), 1);
    assert_eq!(
        fs::read_to_string(paths.pid_file()).unwrap().trim(),
        "1234"
    );
}

#[test]
fn failed_signal_also_falls_through_to_start() {
    let temp = TempDir::new().unwrap();
    let paths = SessionPaths::new(temp.path().to_path_buf());
    SessionHandle {
        pid: 31,
        output_path: PathBuf::from("/videos/old.mkv"),
        last_status: None,
    }
    .save(&paths)
    .unwrap();

    // Alive per the probe, but the signal fails (exited in between).
    let outcome = controller(
        &temp,
        MockProcessControl::new(true, false),
        MockSpawner::new(32, ""),
    )
    .toggle(&request(&temp, available_codecs()))
    .unwrap();

    assert!(matches!(outcome, ToggleOutcome::Started { .. }));
    assert_eq!(
        fs::read_to_string(paths.pid_file()).unwrap().trim(),
        "32"
    );
}

#[test]
fn corrupt_pidfile_is_treated_as_idle() {
    let temp = TempDir::new().unwrap();
    let paths = SessionPaths::new(temp.path().to_path_buf());
    fs::write(paths.pid_file(), "not-a-pid\n").unwrap();

    let outcome = controller(
        &temp,
        MockProcessControl::new(true, true),
        MockSpawner::new(7, ""),
    )
    .toggle(&request(&temp, available_codecs()))
    .unwrap();

    assert!(matches!(outcome, ToggleOutcome::Started { .. }));
}

#[test]
fn explicit_output_path_is_used_verbatim() {
    let temp = TempDir::new().unwrap();
    let wanted = temp.path().join("take.mkv");

    let mut req = request(&temp, available_codecs());
    req.explicit_output = Some(wanted.clone());

    let outcome = controller(
        &temp,
        MockProcessControl::new(false, false),
        MockSpawner::new(5, ""),
    )
    .toggle(&req)
    .unwrap();

    assert_eq!(
        outcome,
        ToggleOutcome::Started {
            output_path: wanted.clone()
        }
    );
    let paths = SessionPaths::new(temp.path().to_path_buf());
    let log_text = fs::read_to_string(paths.log_file()).unwrap();
    assert_eq!(log_text.lines().next(), wanted.to_str());
}

#[test]
fn handle_round_trips_through_the_artifacts() {
    let temp = TempDir::new().unwrap();
    let paths = SessionPaths::new(temp.path().to_path_buf());
    let handle = SessionHandle {
        pid: 808,
        output_path: PathBuf::from("/videos/take.mkv"),
        last_status: None,
    };
    handle.save(&paths).unwrap();

    assert_eq!(SessionHandle::load(&paths).unwrap(), Some(handle));

    SessionHandle::record_progress(&paths, &PathBuf::from("/videos/take.mkv"), "frame=42")
        .unwrap();
    let reloaded = SessionHandle::load(&paths).unwrap().unwrap();
    assert_eq!(reloaded.last_status.as_deref(), Some("frame=42"));

    SessionHandle::delete(&paths).unwrap();
    assert_eq!(SessionHandle::load(&paths).unwrap(), None);
    // Deleting again is fine.
    SessionHandle::delete(&paths).unwrap();
}
