//! Test environment for isolated walkmesh runs.
//!
//! Every run gets its own project directory as working directory and its own
//! `XDG_CONFIG_HOME`, and never inherits `WALKMESH_*` from the caller.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Environment variables the binary reads
const WALKMESH_VARS: [&str; 7] = [
    "WALKMESH_COLMAP",
    "WALKMESH_FFMPEG",
    "WALKMESH_FFPROBE",
    "WALKMESH_VIEWER",
    "WALKMESH_FPS",
    "WALKMESH_MAX_FRAMES",
    "WALKMESH_VERBOSITY",
];

/// Result of running the walkmesh CLI
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated project directory plus helpers to run the binary in it
pub struct TestEnv {
    pub project_root: TempDir,
    config_home: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: TempDir::new().expect("Failed to create project dir"),
            config_home: TempDir::new().expect("Failed to create config dir"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_walkmesh")),
        }
    }

    /// Get path relative to project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    /// Write a file to the project directory
    pub fn write_project_file(&self, relative: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.project_path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Write an executable script to the project directory
    #[cfg(unix)]
    pub fn write_script(&self, relative: &str, content: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.write_project_file(relative, content);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make script executable");
        path
    }

    /// Create `count` placeholder frames under `relative`
    pub fn write_frames(&self, relative: &str, count: usize) -> PathBuf {
        let dir = self.project_path(relative);
        std::fs::create_dir_all(&dir).expect("Failed to create frames dir");
        for i in 1..=count {
            std::fs::write(dir.join(format!("frame_{i:06}.jpg")), b"jpg")
                .expect("Failed to write frame");
        }
        dir
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &Path)]) -> TestResult {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(self.project_root.path())
            .args(args)
            .env("XDG_CONFIG_HOME", self.config_home.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        for var in WALKMESH_VARS {
            cmd.env_remove(var);
        }
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute walkmesh");
        Self::output_to_result(output)
    }

    fn output_to_result(output: Output) -> TestResult {
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}
