//! Video Decoder Port
//!
//! Decode-order access to the frames of one video.

use std::path::Path;

use image::RgbImage;

use crate::error::WalkmeshResult;

/// Opens videos for decoding
pub trait VideoDecoder {
    type Stream: FrameStream;

    /// Open `path`; fails with `UnreadableVideo` when it cannot be decoded
    fn open(&self, path: &Path) -> WalkmeshResult<Self::Stream>;
}

/// Frames of one opened video in decode order
pub trait FrameStream {
    /// Frame rate reported by the container (0 when unknown)
    fn frame_rate(&self) -> f64;

    /// Next decoded frame, `None` at end of stream
    fn next_frame(&mut self) -> WalkmeshResult<Option<RgbImage>>;
}
