//! Pure assembly of the capture-engine argument list.

use std::path::Path;

use crate::codec::{AudioCodec, VideoCodec};
use crate::device::{AudioEndpoints, CaptureGeometry};

/// A fully resolved capture invocation: a structured argument list handed
/// directly to process spawning, never a shell string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCommand {
    pub args: Vec<String>,
}

/// Build the recording invocation.
///
/// Inputs are numbered: 0 is the screen grab, 1 the playback monitor when
/// present, and the last one the live record source. Every audio input is
/// mapped into the matroska output as its own stream. An explicit output
/// path is passed through untouched.
pub fn build_record_command(
    video: &VideoCodec,
    audio_codec: &AudioCodec,
    geometry: &CaptureGeometry,
    audio: &AudioEndpoints,
    output: &Path,
    framerate: u32,
    threads: usize,
) -> RecordCommand {
    let mut args: Vec<String> = Vec::new();

    let mut push = |values: &[&str]| {
        args.extend(values.iter().map(|s| s.to_string()));
    };

    push(&["-hide_banner", "-threads", &threads.to_string(), "-y"]);

    // Screen grab input, cursor included.
    push(&[
        "-f",
        "x11grab",
        "-draw_mouse",
        "1",
        "-framerate",
        &framerate.to_string(),
        "-video_size",
        &geometry.video_size(),
        "-i",
        &geometry.grab_input(),
    ]);

    if let Some(monitor) = &audio.monitor_source {
        push(&["-f", "pulse", "-i", monitor]);
    }
    push(&["-f", "pulse", "-i", &audio.record_source]);

    push(&["-f", "matroska", "-map", "0:v", "-c:v", &video.encoder]);
    args.extend(video.quality_args.iter().cloned());

    let audio_inputs = if audio.monitor_source.is_some() { 2 } else { 1 };
    for input in 1..=audio_inputs {
        args.push("-map".to_string());
        args.push(format!("{input}:a"));
    }
    args.extend([
        "-c:a".to_string(),
        audio_codec.encoder.clone(),
        "-b:a".to_string(),
        audio_codec.bitrate.to_string(),
    ]);

    args.push(output.to_string_lossy().into_owned());

    RecordCommand { args }
}
