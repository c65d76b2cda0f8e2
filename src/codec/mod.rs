//! Encoder capability probing and codec selection.
//!
//! The capture engine is queried once per invocation for its full codec
//! listing; the best available video and audio encoder is then picked by
//! fixed preference order. Capabilities are never cached across runs, so a
//! newly installed encoder is picked up on the next invocation.

mod probe;
mod select;

pub use probe::{CodecCapabilities, CodecError};
pub use select::{AudioCodec, SelectedCodecs, VideoCodec, select_codecs};
