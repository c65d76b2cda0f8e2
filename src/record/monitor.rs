//! Blocking reader for the capture engine's progress stream.

use std::io::{ErrorKind, Read};

/// Read the progress stream until it closes, invoking `on_update` with the
/// latest status line each time the engine rewrites it.
///
/// The engine redraws its status in place with carriage returns, so the
/// stream is split on `\r` as well as `\n`.
pub fn monitor_progress<R: Read>(
    mut progress: R,
    mut on_update: impl FnMut(&str),
) -> std::io::Result<()> {
    let mut buf = [0u8; 4096];
    let mut pending = String::new();

    loop {
        let read = match progress.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        pending.push_str(&String::from_utf8_lossy(&buf[..read]));

        while let Some(end) = pending.find(['\r', '\n']) {
            let line = pending[..end].trim().to_string();
            pending.drain(..=end);
            if !line.is_empty() {
                on_update(&line);
            }
        }
    }

    let tail = pending.trim();
    if !tail.is_empty() {
        on_update(tail);
    }

    Ok(())
}
