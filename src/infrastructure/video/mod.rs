//! Video decoding adapters

mod ffmpeg;

pub use ffmpeg::{parse_frame_rate, FfmpegDecoder, FfmpegFrameStream, VideoProbe};
