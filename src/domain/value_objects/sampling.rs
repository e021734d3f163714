//! Frame Sampling Value Objects

use crate::error::{WalkmeshError, WalkmeshResult};

/// Frame rate assumed when the container does not report one
pub const FALLBACK_SOURCE_FPS: f64 = 30.0;

/// Width of the zero-padded frame index
pub const FRAME_INDEX_WIDTH: usize = 6;

/// Validated sampling request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingOptions {
    target_fps: Option<f64>,
    max_frames: Option<usize>,
}

impl SamplingOptions {
    /// Validate and build sampling options
    ///
    /// Both values, when present, must be strictly positive.
    pub fn new(target_fps: Option<f64>, max_frames: Option<usize>) -> WalkmeshResult<Self> {
        if let Some(fps) = target_fps {
            if !fps.is_finite() || fps <= 0.0 {
                return Err(WalkmeshError::InvalidSamplingOption {
                    name: "fps",
                    value: fps.to_string(),
                });
            }
        }
        if max_frames == Some(0) {
            return Err(WalkmeshError::InvalidSamplingOption {
                name: "max_frames",
                value: "0".to_string(),
            });
        }
        Ok(Self {
            target_fps,
            max_frames,
        })
    }

    /// Keep every decoded frame, no limit
    pub fn every_frame() -> Self {
        Self {
            target_fps: None,
            max_frames: None,
        }
    }

    pub fn target_fps(&self) -> Option<f64> {
        self.target_fps
    }

    pub fn max_frames(&self) -> Option<usize> {
        self.max_frames
    }

    /// Decimation stride for a source frame rate; never below 1
    pub fn stride(&self, source_fps: f64) -> usize {
        let source_fps = effective_source_fps(source_fps);
        match self.target_fps {
            Some(target) => {
                let ratio = (source_fps / target).round();
                if ratio.is_finite() && ratio >= 1.0 {
                    ratio as usize
                } else {
                    1
                }
            }
            None => 1,
        }
    }
}

/// Source frame rate with the fallback applied to missing/garbage values
pub fn effective_source_fps(reported: f64) -> f64 {
    if reported.is_finite() && reported > 0.0 {
        reported
    } else {
        FALLBACK_SOURCE_FPS
    }
}

/// File name for the `index`-th kept frame (1-based)
pub fn frame_file_name(index: usize) -> String {
    format!("frame_{:0width$}.jpg", index, width = FRAME_INDEX_WIDTH)
}
