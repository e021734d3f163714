//! Common test utilities for walkmesh CLI tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated test environment with a temp project directory
//! - Fixtures: scripted stand-ins for colmap, ffmpeg and ffprobe

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
