//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//! - Output formatting (text/JSON)
//!
//! ## Structure
//!
//! - `cli` - Argument definitions
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//! - `output` - Final report, warnings and summaries
//!
//! ## Usage
//!
//! ```ignore
//! use walkmesh::presentation::factory;
//!
//! let use_case = factory::create_reconstruct_use_case(&config);
//! let manifest = use_case.execute(&frames, &work, &*sink)?;
//! ```

pub mod cli;
pub mod factory;
pub mod output;

pub use cli::{Cli, ColorWhen, Commands};
pub use output::RunReport;
