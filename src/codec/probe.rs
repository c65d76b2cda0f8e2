//! Queries ffmpeg for its codec listing and parses it into capability sets.

use std::collections::{HashMap, HashSet};
use std::process::{Command, Stdio};

use thiserror::Error;

use crate::record::CAPTURE_ENGINE;

/// Errors that can occur while probing encoder capabilities.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to launch {CAPTURE_ENGINE}: {0}")]
    Launch(#[source] std::io::Error),

    #[error("{CAPTURE_ENGINE} could not list codecs: {0}")]
    ListingFailed(String),
}

/// Encoder names reported by the capture engine, keyed by codec family.
///
/// A family (e.g. `h264`) is independent of the encoder implementations
/// that provide it (e.g. `libx264`); the listing's parenthesized
/// `(encoders: ...)` suffix carries the implementations.
#[derive(Debug, Clone, Default)]
pub struct CodecCapabilities {
    encoders: HashMap<String, HashSet<String>>,
}

impl CodecCapabilities {
    /// Probe the installed capture engine. Run once per invocation.
    pub fn probe() -> Result<Self, CodecError> {
        let output = Command::new(CAPTURE_ENGINE)
            .args(["-hide_banner", "-codecs"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(CodecError::Launch)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CodecError::ListingFailed(stderr.trim().to_string()));
        }

        Ok(Self::from_listing(&String::from_utf8_lossy(&output.stdout)))
    }

    /// Parse a `ffmpeg -codecs` listing.
    pub fn from_listing(listing: &str) -> Self {
        let mut encoders: HashMap<String, HashSet<String>> = HashMap::new();

        for line in listing.lines() {
            if let Some((family, names)) = parse_codec_line(line) {
                encoders.entry(family).or_default().extend(names);
            }
        }

        Self { encoders }
    }

    /// True when `encoder` is listed for the codec family `family`.
    pub fn has_encoder(&self, family: &str, encoder: &str) -> bool {
        self.encoders
            .get(family)
            .is_some_and(|names| names.contains(encoder))
    }

    /// True when the family can be encoded at all, by any encoder.
    pub fn can_encode_family(&self, family: &str) -> bool {
        self.encoders.get(family).is_some_and(|n| !n.is_empty())
    }
}

/// Parse one codec line into its family and encoder names.
///
/// Listing lines look like:
/// ` DEV.LS h264  H.264 / AVC (decoders: h264 ) (encoders: libx264 h264_nvenc )`
///
/// Families without an `(encoders: ...)` suffix use a same-named encoder,
/// which the listing leaves implicit.
fn parse_codec_line(line: &str) -> Option<(String, HashSet<String>)> {
    let line = line.trim();
    let mut parts = line.split_whitespace();

    let flags = parts.next()?;
    // Capability flags are a fixed six-character column; the second
    // position marks encoding support. Header and legend lines fail this.
    if flags.len() != 6 || flags.as_bytes()[1] != b'E' {
        return None;
    }

    let family = parts.next()?;
    if family == "=" {
        return None;
    }

    let mut encoders = parenthesized_list(line, "(encoders:");
    if encoders.is_empty() {
        encoders.insert(family.to_string());
    }

    Some((family.to_string(), encoders))
}

fn parenthesized_list(line: &str, marker: &str) -> HashSet<String> {
    let Some(start) = line.find(marker) else {
        return HashSet::new();
    };
    let rest = &line[start + marker.len()..];
    let Some(end) = rest.find(')') else {
        return HashSet::new();
    };
    rest[..end]
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}
