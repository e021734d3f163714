//! Sample Use Case
//!
//! Decimates a video into an ordered directory of JPEG stills named
//! `frame_000001.jpg`, `frame_000002.jpg`, ... so that lexical order equals
//! temporal order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use tracing::debug;

use crate::domain::ports::{FrameStream, PipelineEvent, PipelineEventSink, VideoDecoder};
use crate::domain::value_objects::{effective_source_fps, frame_file_name, SamplingOptions};
use crate::error::WalkmeshResult;

/// Default JPEG quality for written frames
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Outcome of one sampling run
#[derive(Debug, Clone, PartialEq)]
pub struct SampleResult {
    pub output_dir: PathBuf,
    pub frames_written: usize,
    pub frames_decoded: usize,
    pub stride: usize,
    pub source_fps: f64,
}

/// Frame sampler, generic over the video decoder
pub struct FrameSampler<D>
where
    D: VideoDecoder,
{
    decoder: D,
    jpeg_quality: u8,
}

impl<D> FrameSampler<D>
where
    D: VideoDecoder,
{
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Sample `video` into `output_dir`
    ///
    /// Keeps one frame every `stride` decoded frames and stops once
    /// `max_frames` have been written. Creates `output_dir` if absent.
    pub fn sample(
        &self,
        video: &Path,
        output_dir: &Path,
        options: &SamplingOptions,
        events: &dyn PipelineEventSink,
    ) -> WalkmeshResult<SampleResult> {
        std::fs::create_dir_all(output_dir)?;

        let mut stream = self.decoder.open(video)?;
        let reported_fps = stream.frame_rate();
        let source_fps = effective_source_fps(reported_fps);
        let stride = options.stride(reported_fps);
        debug!(reported_fps, source_fps, stride, "sampling video");

        events.on_event(PipelineEvent::SamplingStarted {
            video: video.to_path_buf(),
            source_fps,
            stride,
        });

        let mut decoded = 0usize;
        let mut written = 0usize;
        while let Some(frame) = stream.next_frame()? {
            let index = decoded;
            decoded += 1;
            if index % stride != 0 {
                continue;
            }

            written += 1;
            self.write_frame(&frame, &output_dir.join(frame_file_name(written)))?;

            if options.max_frames().is_some_and(|max| written >= max) {
                break;
            }
        }

        events.on_event(PipelineEvent::SamplingFinished {
            output_dir: output_dir.to_path_buf(),
            frames: written,
        });

        Ok(SampleResult {
            output_dir: output_dir.to_path_buf(),
            frames_written: written,
            frames_decoded: decoded,
            stride,
            source_fps,
        })
    }

    fn write_frame(&self, frame: &RgbImage, path: &Path) -> WalkmeshResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        frame.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, self.jpeg_quality))?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::RecordingEventSink;
    use crate::domain::entities::FrameSet;
    use crate::error::WalkmeshError;
    use tempfile::tempdir;

    /// Synthetic video: `frames` solid-colour frames at `fps`
    struct SyntheticVideo {
        fps: f64,
        frames: usize,
    }

    struct SyntheticStream {
        fps: f64,
        remaining: usize,
        produced: usize,
    }

    impl VideoDecoder for SyntheticVideo {
        type Stream = SyntheticStream;

        fn open(&self, path: &Path) -> WalkmeshResult<Self::Stream> {
            if path.extension().is_some_and(|e| e == "broken") {
                return Err(WalkmeshError::UnreadableVideo {
                    path: path.to_path_buf(),
                    reason: "moov atom not found".to_string(),
                });
            }
            Ok(SyntheticStream {
                fps: self.fps,
                remaining: self.frames,
                produced: 0,
            })
        }
    }

    impl FrameStream for SyntheticStream {
        fn frame_rate(&self) -> f64 {
            self.fps
        }

        fn next_frame(&mut self) -> WalkmeshResult<Option<RgbImage>> {
            if self.remaining == 0 {
                return Ok(None);
            }
            self.remaining -= 1;
            let shade = (self.produced % 256) as u8;
            self.produced += 1;
            Ok(Some(RgbImage::from_pixel(8, 6, image::Rgb([shade, 0, 255]))))
        }
    }

    fn run(
        video: SyntheticVideo,
        fps: Option<f64>,
        max: Option<usize>,
    ) -> (tempfile::TempDir, SampleResult) {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested/frames");
        let options = SamplingOptions::new(fps, max).unwrap();
        let result = FrameSampler::new(video)
            .sample(
                Path::new("walk.mp4"),
                &out,
                &options,
                &RecordingEventSink::new(),
            )
            .unwrap();
        (dir, result)
    }

    #[test]
    fn keeps_one_frame_per_stride() {
        // 10 s at 30 fps sampled at 2 fps
        let (_dir, result) = run(
            SyntheticVideo {
                fps: 30.0,
                frames: 300,
            },
            Some(2.0),
            None,
        );
        assert_eq!(result.stride, 15);
        assert_eq!(result.frames_written, 20);
        assert_eq!(result.frames_decoded, 300);
    }

    #[test]
    fn stops_at_max_frames() {
        let (_dir, result) = run(
            SyntheticVideo {
                fps: 30.0,
                frames: 300,
            },
            Some(2.0),
            Some(7),
        );
        assert_eq!(result.frames_written, 7);
        // stops decoding right after the 7th kept frame (index 90)
        assert_eq!(result.frames_decoded, 91);
    }

    #[test]
    fn target_above_source_keeps_every_frame() {
        let (_dir, result) = run(
            SyntheticVideo {
                fps: 10.0,
                frames: 12,
            },
            Some(60.0),
            None,
        );
        assert_eq!(result.stride, 1);
        assert_eq!(result.frames_written, 12);
    }

    #[test]
    fn unknown_source_rate_falls_back_to_thirty() {
        let (_dir, result) = run(
            SyntheticVideo {
                fps: 0.0,
                frames: 60,
            },
            Some(2.0),
            None,
        );
        assert_eq!(result.source_fps, 30.0);
        assert_eq!(result.stride, 15);
        assert_eq!(result.frames_written, 4);
    }

    #[test]
    fn frames_are_numbered_contiguously_from_one() {
        let (_dir, result) = run(
            SyntheticVideo {
                fps: 24.0,
                frames: 50,
            },
            Some(4.0),
            None,
        );
        let set = FrameSet::scan(&result.output_dir).unwrap();
        let names: Vec<String> = set
            .frames()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        let expected: Vec<String> = (1..=result.frames_written).map(frame_file_name).collect();
        assert_eq!(names, expected);
        assert_eq!(names[0], "frame_000001.jpg");

        let decoded = image::open(&set.frames()[0]).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
    }

    #[test]
    fn unreadable_video_fails_after_creating_output_dir() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("frames");
        let err = FrameSampler::new(SyntheticVideo {
            fps: 30.0,
            frames: 1,
        })
        .sample(
            Path::new("walk.broken"),
            &out,
            &SamplingOptions::every_frame(),
            &RecordingEventSink::new(),
        )
        .unwrap_err();

        assert!(matches!(err, WalkmeshError::UnreadableVideo { .. }));
        assert!(out.is_dir());
    }

    #[test]
    fn reports_start_and_finish() {
        let dir = tempdir().unwrap();
        let sink = RecordingEventSink::new();
        FrameSampler::new(SyntheticVideo {
            fps: 30.0,
            frames: 30,
        })
        .sample(
            Path::new("walk.mp4"),
            dir.path(),
            &SamplingOptions::new(Some(10.0), None).unwrap(),
            &sink,
        )
        .unwrap();

        let events = sink.events();
        assert!(matches!(
            events.first(),
            Some(PipelineEvent::SamplingStarted { stride: 3, .. })
        ));
        assert!(matches!(
            events.last(),
            Some(PipelineEvent::SamplingFinished { frames: 10, .. })
        ));
    }
}
