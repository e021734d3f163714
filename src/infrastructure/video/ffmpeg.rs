//! ffprobe/ffmpeg Video Decoder
//!
//! `ffprobe` reports resolution, frame rate and display rotation as JSON;
//! `ffmpeg` then pipes raw RGB24 frames on stdout in decode order. ffmpeg
//! applies the display rotation itself, so a quarter-turned stream arrives
//! with width and height swapped. No native libraries are linked.

use std::ffi::OsString;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread;

use image::RgbImage;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::ports::{FrameStream, VideoDecoder};
use crate::error::{WalkmeshError, WalkmeshResult};

/// Displayed resolution and frame rate of the first video stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoProbe {
    /// Width after rotation, which is the width ffmpeg emits
    pub width: u32,
    pub height: u32,
    /// Frames per second; 0 when the container does not say
    pub frame_rate: f64,
    /// Display rotation in degrees, normalised to 0, 90, 180 or 270
    pub rotation: u32,
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    #[serde(default)]
    side_data_list: Vec<FfprobeSideData>,
    #[serde(default)]
    tags: FfprobeTags,
}

#[derive(Debug, Deserialize)]
struct FfprobeSideData {
    rotation: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeTags {
    rotate: Option<String>,
}

impl FfprobeStream {
    /// Display-matrix side data wins over the legacy `rotate` tag
    fn rotation(&self) -> u32 {
        let degrees = self
            .side_data_list
            .iter()
            .find_map(|side| side.rotation)
            .or_else(|| self.tags.rotate.as_deref()?.trim().parse::<f64>().ok())
            .filter(|deg| deg.is_finite())
            .unwrap_or(0.0);
        // snap to the nearest quarter turn
        ((degrees / 90.0).round() as i64).rem_euclid(4) as u32 * 90
    }
}

impl VideoProbe {
    /// Parse `ffprobe -of json` output
    pub fn from_json(json: &str) -> Option<Self> {
        let parsed: FfprobeOutput = serde_json::from_str(json).ok()?;
        let stream = parsed.streams.into_iter().next()?;
        let coded_width = stream.width.filter(|w| *w > 0)?;
        let coded_height = stream.height.filter(|h| *h > 0)?;
        let rotation = stream.rotation();
        let (width, height) = if rotation % 180 == 90 {
            (coded_height, coded_width)
        } else {
            (coded_width, coded_height)
        };
        let frame_rate = stream
            .avg_frame_rate
            .as_deref()
            .and_then(parse_frame_rate)
            .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_frame_rate))
            .unwrap_or(0.0);
        Some(Self {
            width,
            height,
            frame_rate,
            rotation,
        })
    }
}

/// Parse "30000/1001" or "25" into frames per second
///
/// Returns `None` for zero, negative or malformed rates ("0/0").
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let fps = match rate.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok()?;
            let den = den.trim().parse::<f64>().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.trim().parse::<f64>().ok()?,
    };
    (fps.is_finite() && fps > 0.0).then_some(fps)
}

/// Decoder backed by the ffmpeg command-line tools
#[derive(Debug, Clone)]
pub struct FfmpegDecoder {
    ffmpeg: OsString,
    ffprobe: OsString,
}

impl Default for FfmpegDecoder {
    fn default() -> Self {
        Self::new("ffmpeg", "ffprobe")
    }
}

impl FfmpegDecoder {
    pub fn new(ffmpeg: impl Into<OsString>, ffprobe: impl Into<OsString>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Probe the first video stream of `path`
    pub fn probe(&self, path: &Path) -> WalkmeshResult<VideoProbe> {
        let unreadable = |reason: String| WalkmeshError::UnreadableVideo {
            path: path.to_path_buf(),
            reason,
        };

        let output = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height,avg_frame_rate,r_frame_rate\
                 :stream_side_data=rotation:stream_tags=rotate",
                "-of",
                "json",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| unreadable(format!("failed to run ffprobe: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(unreadable(stderr.trim().to_string()));
        }

        let json = String::from_utf8_lossy(&output.stdout);
        let probe = VideoProbe::from_json(&json)
            .ok_or_else(|| unreadable("no decodable video stream".to_string()))?;
        debug!(?probe, "probed video");
        Ok(probe)
    }
}

impl VideoDecoder for FfmpegDecoder {
    type Stream = FfmpegFrameStream;

    fn open(&self, path: &Path) -> WalkmeshResult<Self::Stream> {
        if !path.is_file() {
            return Err(WalkmeshError::UnreadableVideo {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }

        let probe = self.probe(path)?;

        let mut child = Command::new(&self.ffmpeg)
            .args(["-hide_banner", "-loglevel", "error", "-i"])
            .arg(path)
            .args([
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgb24",
                "-vsync",
                "passthrough",
                "-",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| WalkmeshError::UnreadableVideo {
                path: path.to_path_buf(),
                reason: format!("failed to run ffmpeg: {e}"),
            })?;

        let stdout = child.stdout.take().ok_or_else(|| WalkmeshError::UnreadableVideo {
            path: path.to_path_buf(),
            reason: "ffmpeg stdout unavailable".to_string(),
        })?;
        let stderr = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut text = String::new();
                let _ = pipe.read_to_string(&mut text);
                text
            })
        });

        Ok(FfmpegFrameStream {
            path: path.to_path_buf(),
            probe,
            child: Some(child),
            stdout,
            stderr,
            frames_read: 0,
        })
    }
}

/// Raw RGB24 frames read from a running ffmpeg
///
/// The child is killed when the stream is dropped early.
pub struct FfmpegFrameStream {
    path: std::path::PathBuf,
    probe: VideoProbe,
    child: Option<Child>,
    stdout: ChildStdout,
    stderr: Option<thread::JoinHandle<String>>,
    frames_read: usize,
}

impl FfmpegFrameStream {
    fn frame_len(&self) -> usize {
        self.probe.width as usize * self.probe.height as usize * 3
    }

    /// Reap ffmpeg at end of stream; a run that decoded nothing and failed
    /// means the input was not a readable video
    fn finish(&mut self) -> WalkmeshResult<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child.wait()?;
        let stderr = self
            .stderr
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if !status.success() {
            if self.frames_read == 0 {
                return Err(WalkmeshError::UnreadableVideo {
                    path: self.path.clone(),
                    reason: stderr.trim().to_string(),
                });
            }
            warn!(status = %status, stderr = %stderr.trim(), "ffmpeg ended with an error");
        }
        Ok(())
    }
}

impl FrameStream for FfmpegFrameStream {
    fn frame_rate(&self) -> f64 {
        self.probe.frame_rate
    }

    fn next_frame(&mut self) -> WalkmeshResult<Option<RgbImage>> {
        if self.child.is_none() {
            return Ok(None);
        }

        let mut buf = vec![0u8; self.frame_len()];
        let mut filled = 0;
        while filled < buf.len() {
            match self.stdout.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        if filled < buf.len() {
            if filled > 0 {
                warn!(bytes = filled, "dropping truncated final frame");
            }
            self.finish()?;
            return Ok(None);
        }

        self.frames_read += 1;
        Ok(RgbImage::from_raw(self.probe.width, self.probe.height, buf))
    }
}

impl Drop for FfmpegFrameStream {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rational_and_plain_rates() {
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert_eq!(parse_frame_rate("25"), Some(25.0));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("abc"), None);
    }

    #[test]
    fn probe_prefers_average_rate() {
        let json = r#"{
            "programs": [],
            "streams": [
                { "width": 1920, "height": 1080, "avg_frame_rate": "60000/1001", "r_frame_rate": "60/1" }
            ]
        }"#;
        let probe = VideoProbe::from_json(json).unwrap();
        assert_eq!((probe.width, probe.height), (1920, 1080));
        assert!((probe.frame_rate - 59.94).abs() < 0.01);
    }

    #[test]
    fn probe_with_unknown_rate_reports_zero() {
        let json = r#"{"streams":[{"width":640,"height":480,"avg_frame_rate":"0/0","r_frame_rate":"0/0"}]}"#;
        assert_eq!(VideoProbe::from_json(json).unwrap().frame_rate, 0.0);
    }

    #[test]
    fn portrait_side_data_swaps_dimensions() {
        let json = r#"{"streams":[{
            "width": 1920, "height": 1080, "avg_frame_rate": "30/1",
            "side_data_list": [{ "side_data_type": "Display Matrix", "rotation": -90 }]
        }]}"#;
        let probe = VideoProbe::from_json(json).unwrap();
        assert_eq!((probe.width, probe.height), (1080, 1920));
        assert_eq!(probe.rotation, 270);
    }

    #[test]
    fn legacy_rotate_tag_swaps_dimensions() {
        let json = r#"{"streams":[{
            "width": 1920, "height": 1080, "avg_frame_rate": "30/1",
            "tags": { "rotate": "90" }
        }]}"#;
        let probe = VideoProbe::from_json(json).unwrap();
        assert_eq!((probe.width, probe.height), (1080, 1920));
        assert_eq!(probe.rotation, 90);
    }

    #[test]
    fn upside_down_keeps_dimensions() {
        let json = r#"{"streams":[{
            "width": 1920, "height": 1080, "avg_frame_rate": "30/1",
            "side_data_list": [{ "side_data_type": "Display Matrix", "rotation": 180.0 }]
        }]}"#;
        let probe = VideoProbe::from_json(json).unwrap();
        assert_eq!((probe.width, probe.height), (1920, 1080));
        assert_eq!(probe.rotation, 180);
    }

    #[test]
    fn probe_without_video_stream_is_none() {
        assert_eq!(VideoProbe::from_json(r#"{"streams":[]}"#), None);
        assert_eq!(VideoProbe::from_json("not json"), None);
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = FfmpegDecoder::default()
            .open(Path::new("/nonexistent/walk.mp4"))
            .err()
            .unwrap();
        assert!(matches!(err, WalkmeshError::UnreadableVideo { .. }));
    }

    #[test]
    fn missing_ffprobe_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("walk.mp4");
        std::fs::write(&video, b"not really a video").unwrap();

        let err = FfmpegDecoder::new("/nonexistent/ffmpeg", "/nonexistent/ffprobe")
            .open(&video)
            .err()
            .unwrap();
        match err {
            WalkmeshError::UnreadableVideo { reason, .. } => {
                assert!(reason.starts_with("failed to run ffprobe"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
