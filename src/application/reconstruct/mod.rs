//! Reconstruct Module
//!
//! Drives the external reconstruction engine over a frame directory.
//!
//! ## Structure
//!
//! - `options` - Engine settings (`EngineOptions`)
//! - `commands` - Command line for each stage
//! - `use_case` - Stage sequencing and artifact checks (`ReconstructUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use walkmesh::application::reconstruct::{EngineOptions, ReconstructUseCase};
//!
//! let use_case = ReconstructUseCase::new(runner, EngineOptions::default());
//! let manifest = use_case.execute(&frames_dir, &work, &events)?;
//! ```

mod commands;
mod options;
mod use_case;

pub use commands::stage_command;
pub use options::EngineOptions;
pub use use_case::ReconstructUseCase;
