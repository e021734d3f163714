//! Reconstruction Stage Value Object
//!
//! The fixed, ordered list of external reconstruction stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One external reconstruction stage
///
/// Stages run strictly in declaration order. Fusion and meshing share the
/// sixth step slot in progress output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    FeatureExtraction,
    ExhaustiveMatching,
    Mapping,
    Undistortion,
    DenseStereo,
    Fusion,
    Meshing,
}

impl Stage {
    /// Total number of numbered steps shown to the operator
    pub const STEP_COUNT: usize = 6;

    /// All stages in execution order
    pub const ALL: [Stage; 7] = [
        Stage::FeatureExtraction,
        Stage::ExhaustiveMatching,
        Stage::Mapping,
        Stage::Undistortion,
        Stage::DenseStereo,
        Stage::Fusion,
        Stage::Meshing,
    ];

    /// Engine subcommand that implements this stage
    pub fn tool(&self) -> &'static str {
        match self {
            Stage::FeatureExtraction => "feature_extractor",
            Stage::ExhaustiveMatching => "exhaustive_matcher",
            Stage::Mapping => "mapper",
            Stage::Undistortion => "image_undistorter",
            Stage::DenseStereo => "patch_match_stereo",
            Stage::Fusion => "stereo_fusion",
            Stage::Meshing => "poisson_mesher",
        }
    }

    /// Short operator-facing description
    pub fn description(&self) -> &'static str {
        match self {
            Stage::FeatureExtraction => "extract features",
            Stage::ExhaustiveMatching => "match features",
            Stage::Mapping => "sparse SfM",
            Stage::Undistortion => "prepare dense workspace",
            Stage::DenseStereo => "dense depth",
            Stage::Fusion => "fused point cloud",
            Stage::Meshing => "mesh",
        }
    }

    /// 1-based step number (fusion and meshing are both step 6)
    pub fn step(&self) -> usize {
        match self {
            Stage::FeatureExtraction => 1,
            Stage::ExhaustiveMatching => 2,
            Stage::Mapping => 3,
            Stage::Undistortion => 4,
            Stage::DenseStereo => 5,
            Stage::Fusion | Stage::Meshing => 6,
        }
    }

    /// Progress label like `[3/6] mapper`
    pub fn label(&self) -> String {
        format!("[{}/{}] {}", self.step(), Self::STEP_COUNT, self.tool())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool())
    }
}
