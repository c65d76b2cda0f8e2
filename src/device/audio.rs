//! PulseAudio endpoint discovery.

use serde_json::Value;

use super::{DeviceError, run_tool};

/// Source used for live (microphone) recording.
pub const DEFAULT_RECORD_SOURCE: &str = "default";

/// Audio inputs for a recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioEndpoints {
    /// Monitor of the first running playback sink, absent when nothing is
    /// playing. The recording then carries microphone audio only.
    pub monitor_source: Option<String>,
    /// Live input source; the system default device.
    pub record_source: String,
}

/// Enumerate sinks and derive the monitor source of the first running one.
pub fn resolve_audio() -> Result<AudioEndpoints, DeviceError> {
    let listing = run_tool("pactl", &["-f", "json", "list", "sinks"])?;
    let monitor_source = running_monitor_source(&listing)?;

    if monitor_source.is_none() {
        log::warn!("no audio sink is running; recording without playback audio");
    }

    Ok(AudioEndpoints {
        monitor_source,
        record_source: DEFAULT_RECORD_SOURCE.to_string(),
    })
}

/// Monitor source name of the first sink in RUNNING state, if any.
pub(crate) fn running_monitor_source(listing: &str) -> Result<Option<String>, DeviceError> {
    let sinks: Value = serde_json::from_str(listing)
        .map_err(|e| DeviceError::Parse("pactl", e.to_string()))?;

    let sinks = sinks
        .as_array()
        .ok_or_else(|| DeviceError::Parse("pactl", "sink listing is not an array".to_string()))?;

    for sink in sinks {
        if sink.get("state").and_then(Value::as_str) != Some("RUNNING") {
            continue;
        }
        if let Some(monitor) = sink.get("monitor_source").and_then(Value::as_str) {
            return Ok(Some(monitor.to_string()));
        }
        // Older pactl versions omit the monitor field; derive it.
        if let Some(name) = sink.get("name").and_then(Value::as_str) {
            return Ok(Some(format!("{name}.monitor")));
        }
    }

    Ok(None)
}
