//! External Viewer
//!
//! Hands the artifact path to a desktop viewer program (`f3d` by default)
//! and waits for it to close.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::domain::ports::{Geometry, GeometryDisplay};
use crate::error::{WalkmeshError, WalkmeshResult};

pub const DEFAULT_VIEWER: &str = "f3d";

/// Opens geometry files in an external program
#[derive(Debug, Clone)]
pub struct ExternalViewer {
    program: OsString,
}

impl Default for ExternalViewer {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWER)
    }
}

impl ExternalViewer {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }

    fn command_line(&self, path: &Path) -> String {
        format!("{} {}", self.program.to_string_lossy(), path.display())
    }
}

impl GeometryDisplay for ExternalViewer {
    fn show(&self, path: &Path, geometry: &Geometry) -> WalkmeshResult<()> {
        let command = self.command_line(path);
        debug!(command = %command, kind = geometry.kind(), "opening viewer");

        let status = Command::new(&self.program)
            .arg(path)
            .status()
            .map_err(|source| WalkmeshError::LaunchFailed {
                command: command.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(WalkmeshError::ExternalStageFailed {
                stage: self.program.to_string_lossy().into_owned(),
                command,
                exit_code: status.code(),
                output: String::new(),
            })
        }
    }
}
