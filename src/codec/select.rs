//! Preference-ordered codec selection.

use super::probe::CodecCapabilities;

/// Ordered (family, encoder) preferences for video. First one present wins.
const VIDEO_PREFERENCES: &[(&str, &str)] = &[
    ("h264", "libx264"),
    ("vp9", "libvpx-vp9"),
    ("vp8", "libvpx"),
];

/// One audio preference entry, with the bitrate applied when it wins.
struct AudioPreference {
    family: &'static str,
    /// Specific encoder to look for; `None` accepts any encoder of the family.
    probe: Option<&'static str>,
    /// Encoder actually put on the command line when this entry wins.
    encoder: &'static str,
    bitrate: &'static str,
}

/// Audio preferences in priority order. The `ac3` entry deliberately
/// selects the MP3 encoder: the tool has always substituted `libmp3lame`
/// whenever the ac3 family probes as encodable, and that behaviour is kept
/// pending product-owner confirmation that it can change.
const AUDIO_PREFERENCES: &[AudioPreference] = &[
    AudioPreference {
        family: "aac",
        probe: Some("libfdk_aac"),
        encoder: "libfdk_aac",
        bitrate: "256k",
    },
    AudioPreference {
        family: "aac",
        probe: Some("aac"),
        encoder: "aac",
        bitrate: "256k",
    },
    AudioPreference {
        family: "ac3",
        probe: None,
        encoder: "libmp3lame",
        bitrate: "256k",
    },
    AudioPreference {
        family: "mp3",
        probe: Some("libmp3lame"),
        encoder: "libmp3lame",
        bitrate: "320k",
    },
];

/// The video encoder to use, with its constant-quality arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCodec {
    pub encoder: String,
    pub quality_args: Vec<String>,
}

/// The audio encoder to use, with its fixed bitrate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioCodec {
    pub encoder: String,
    pub bitrate: &'static str,
}

/// Outcome of codec selection. `None` means no encoder of that family set
/// is installed; the session controller must check this before starting.
#[derive(Debug, Clone, Default)]
pub struct SelectedCodecs {
    pub video: Option<VideoCodec>,
    pub audio: Option<AudioCodec>,
}

impl SelectedCodecs {
    /// True when a recording can be started at all.
    pub fn recordable(&self) -> bool {
        self.video.is_some() && self.audio.is_some()
    }
}

/// Pick the best available video and audio encoder.
///
/// `quality` is a constant-quality value (lower is better) applied
/// uniformly to whichever video encoder is chosen.
pub fn select_codecs(capabilities: &CodecCapabilities, quality: u32) -> SelectedCodecs {
    SelectedCodecs {
        video: select_video(capabilities, quality),
        audio: select_audio(capabilities),
    }
}

fn select_video(capabilities: &CodecCapabilities, quality: u32) -> Option<VideoCodec> {
    first_available(VIDEO_PREFERENCES, capabilities).map(|encoder| VideoCodec {
        encoder: encoder.to_string(),
        quality_args: vec!["-crf".to_string(), quality.to_string()],
    })
}

fn select_audio(capabilities: &CodecCapabilities) -> Option<AudioCodec> {
    for preference in AUDIO_PREFERENCES {
        let present = match preference.probe {
            Some(encoder) => capabilities.has_encoder(preference.family, encoder),
            None => capabilities.can_encode_family(preference.family),
        };
        if present {
            return Some(AudioCodec {
                encoder: preference.encoder.to_string(),
                bitrate: preference.bitrate,
            });
        }
    }
    None
}

/// First (family, encoder) entry of `preferences` present in
/// `capabilities`, or `None` when none are. No scoring beyond ordinal
/// preference.
fn first_available<'a>(
    preferences: &'a [(&'a str, &'a str)],
    capabilities: &CodecCapabilities,
) -> Option<&'a str> {
    preferences
        .iter()
        .find(|(family, encoder)| capabilities.has_encoder(family, encoder))
        .map(|(_, encoder)| *encoder)
}
