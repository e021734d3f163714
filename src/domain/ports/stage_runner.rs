//! Stage Runner Port
//!
//! Capability for launching one external program, streaming its combined
//! output line by line, and reporting how it exited. The orchestrator only
//! talks to this trait, so tests substitute a fake that never spawns a
//! process.

use std::ffi::{OsStr, OsString};
use std::path::Path;

use crate::error::{WalkmeshError, WalkmeshResult};

/// Program plus arguments for one external invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append a `--flag value` pair where the value is a path
    pub fn path_arg(self, flag: &str, path: &Path) -> Self {
        self.arg(flag).arg(path)
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Value following `flag`, if present
    pub fn value_of(&self, flag: &str) -> Option<&OsStr> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(|v| v.as_os_str())
    }

    /// Human-readable command line (lossy for non-UTF-8 parts)
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| {
                let s = part.to_string_lossy();
                if s.is_empty() || s.contains(char::is_whitespace) {
                    format!("'{}'", s.replace('\'', "'\\''"))
                } else {
                    s.into_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How an external process ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Exit code; `None` when terminated by a signal
    pub exit_code: Option<i32>,
    /// Combined stdout + stderr, in arrival order
    pub output: String,
}

impl ProcessOutcome {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            output: output.into(),
        }
    }

    pub fn failure(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            output: output.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs external programs to completion
///
/// Implementations:
/// - `ProcessStageRunner` - real child processes
/// - test fakes that record invocations and fabricate artifacts
pub trait StageRunner {
    /// Run `command`, calling `on_line` for every output line as it arrives
    ///
    /// Blocks until the process exits. Only a failure to launch is an error;
    /// a non-zero exit is reported through the outcome.
    fn run_external(
        &self,
        command: &ExternalCommand,
        on_line: &mut dyn FnMut(&str),
    ) -> WalkmeshResult<ProcessOutcome>;

    /// Run `command` and turn a non-zero exit into `ExternalStageFailed`
    ///
    /// Returns the captured output on success.
    fn run(
        &self,
        stage: &str,
        command: &ExternalCommand,
        on_line: &mut dyn FnMut(&str),
    ) -> WalkmeshResult<String> {
        let outcome = self.run_external(command, on_line)?;
        if outcome.is_success() {
            Ok(outcome.output)
        } else {
            Err(WalkmeshError::ExternalStageFailed {
                stage: stage.to_string(),
                command: command.display(),
                exit_code: outcome.exit_code,
                output: outcome.output,
            })
        }
    }
}

impl<T: StageRunner + ?Sized> StageRunner for &T {
    fn run_external(
        &self,
        command: &ExternalCommand,
        on_line: &mut dyn FnMut(&str),
    ) -> WalkmeshResult<ProcessOutcome> {
        (**self).run_external(command, on_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct Scripted(ProcessOutcome);

    impl StageRunner for Scripted {
        fn run_external(
            &self,
            _command: &ExternalCommand,
            on_line: &mut dyn FnMut(&str),
        ) -> WalkmeshResult<ProcessOutcome> {
            for line in self.0.output.lines() {
                on_line(line);
            }
            Ok(self.0.clone())
        }
    }

    #[test]
    fn command_display_quotes_spaces() {
        let cmd = ExternalCommand::new("colmap")
            .arg("mapper")
            .path_arg("--image_path", &PathBuf::from("/my frames"));
        assert_eq!(cmd.display(), "colmap mapper --image_path '/my frames'");
    }

    #[test]
    fn value_of_finds_flag_value() {
        let cmd = ExternalCommand::new("colmap")
            .arg("stereo_fusion")
            .path_arg("--output_path", &PathBuf::from("/w/dense/fused.ply"));
        assert_eq!(
            cmd.value_of("--output_path"),
            Some(OsStr::new("/w/dense/fused.ply"))
        );
        assert_eq!(cmd.value_of("--input_path"), None);
    }

    #[test]
    fn run_returns_output_on_success() {
        let runner = Scripted(ProcessOutcome::success("a\nb\n"));
        let mut lines = Vec::new();
        let out = runner
            .run("mapper", &ExternalCommand::new("colmap"), &mut |l: &str| {
                lines.push(l.to_string())
            })
            .unwrap();
        assert_eq!(out, "a\nb\n");
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn run_converts_non_zero_exit() {
        let runner = Scripted(ProcessOutcome::failure(3, "boom\n"));
        let err = runner
            .run("mapper", &ExternalCommand::new("colmap").arg("mapper"), &mut |_| {})
            .unwrap_err();
        match err {
            WalkmeshError::ExternalStageFailed {
                stage,
                command,
                exit_code,
                output,
            } => {
                assert_eq!(stage, "mapper");
                assert_eq!(command, "colmap mapper");
                assert_eq!(exit_code, Some(3));
                assert_eq!(output, "boom\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
