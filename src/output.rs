//! Output-target resolution for captures.
//!
//! Generated names are `<host>.<timestamp>.<ext>` under the configured
//! capture directory, which is created on demand. Explicit paths are taken
//! as-is; only their parent directory is created.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d.%H%M.%S";

/// Resolve the target for a still capture (PNG).
pub fn resolve_still_target(
    explicit: Option<&Path>,
    pictures_dir: &Path,
) -> io::Result<PathBuf> {
    resolve(explicit, pictures_dir, "png")
}

/// Resolve the target for a recording (Matroska).
pub fn resolve_video_target(explicit: Option<&Path>, videos_dir: &Path) -> io::Result<PathBuf> {
    resolve(explicit, videos_dir, "mkv")
}

fn resolve(explicit: Option<&Path>, dir: &Path, extension: &str) -> io::Result<PathBuf> {
    if let Some(path) = explicit {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        return Ok(path.to_path_buf());
    }

    fs::create_dir_all(dir)?;
    Ok(dir.join(generated_filename(extension)))
}

/// `<host>.<timestamp>.<ext>`, using only the first label of the host name.
pub(crate) fn generated_filename(extension: &str) -> String {
    format!(
        "{}.{}.{}",
        short_hostname(),
        Local::now().format(TIMESTAMP_FORMAT),
        extension
    )
}

fn short_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|host| host.into_string().ok())
        .and_then(|host| host.split('.').next().map(str::to_owned))
        .unwrap_or_else(|| "localhost".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn generated_filename_has_host_timestamp_and_extension() {
        let name = generated_filename("mkv");
        assert!(name.ends_with(".mkv"));
        // host + date + time + seconds + extension
        assert!(name.split('.').count() >= 5, "unexpected name: {name}");
        assert!(!name.starts_with('.'));
    }

    #[test]
    fn auto_target_creates_the_capture_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("Videos").join("Screenshot");

        let target = resolve_video_target(None, &dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(target.parent(), Some(dir.as_path()));
        assert_eq!(target.extension().and_then(|e| e.to_str()), Some("mkv"));
    }

    #[test]
    fn explicit_target_is_passed_through() {
        let temp = TempDir::new().unwrap();
        let wanted = temp.path().join("clips").join("demo.mkv");

        let target = resolve_video_target(Some(&wanted), temp.path()).unwrap();
        assert_eq!(target, wanted);
        // Parent is created, the generated directory is not touched.
        assert!(wanted.parent().unwrap().is_dir());
    }

    #[test]
    fn still_target_uses_png() {
        let temp = TempDir::new().unwrap();
        let target = resolve_still_target(None, temp.path()).unwrap();
        assert_eq!(target.extension().and_then(|e| e.to_str()), Some("png"));
    }
}
