//! Process Stage Runner
//!
//! Spawns a child whose stdout and stderr share one pipe, the way a shell's
//! `2>&1` does. Lines are read in the order the child wrote them and reach
//! the caller while the child is still running.

use std::io::{self, BufRead, BufReader};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::domain::ports::{ExternalCommand, ProcessOutcome, StageRunner};
use crate::error::{WalkmeshError, WalkmeshResult};

/// Runs external commands as child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessStageRunner;

impl ProcessStageRunner {
    pub fn new() -> Self {
        Self
    }
}

impl StageRunner for ProcessStageRunner {
    fn run_external(
        &self,
        command: &ExternalCommand,
        on_line: &mut dyn FnMut(&str),
    ) -> WalkmeshResult<ProcessOutcome> {
        debug!(command = %command.display(), "spawning");

        let launch_failed = |source: io::Error| WalkmeshError::LaunchFailed {
            command: command.display(),
            source,
        };
        let (reader, writer) = io::pipe().map_err(launch_failed)?;
        let stderr = writer.try_clone().map_err(launch_failed)?;

        // the temporary Command owns the parent's copies of the write end and
        // drops them here, so the reader sees EOF once the child exits
        let mut child = Command::new(command.program())
            .args(command.get_args())
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(stderr)
            .spawn()
            .map_err(launch_failed)?;

        let output = read_lines(reader, on_line);

        let status = child.wait()?;
        debug!(status = %status, "process exited");

        Ok(ProcessOutcome {
            exit_code: status.code(),
            output,
        })
    }
}

/// Forward every line to `on_line` and return them all, newline-terminated
fn read_lines(pipe: io::PipeReader, on_line: &mut dyn FnMut(&str)) -> String {
    let mut reader = BufReader::new(pipe);
    let mut output = String::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']);
                on_line(line);
                output.push_str(line);
                output.push('\n');
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!(error = %e, "stopped reading process output");
                break;
            }
        }
    }
    output
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> ExternalCommand {
        ExternalCommand::new("sh").arg("-c").arg(script)
    }

    #[test]
    fn streams_stdout_and_stderr_and_reports_success() {
        let mut lines = Vec::new();
        let outcome = ProcessStageRunner
            .run_external(&sh("echo out; echo err 1>&2"), &mut |l: &str| {
                lines.push(l.to_string())
            })
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(lines, vec!["out", "err"]);
        assert_eq!(outcome.output, "out\nerr\n");
    }

    #[test]
    fn interleaved_streams_keep_write_order() {
        let script = "for i in 1 2 3 4 5; do echo out$i; echo err$i 1>&2; done";
        let mut lines = Vec::new();
        let outcome = ProcessStageRunner
            .run_external(&sh(script), &mut |l: &str| lines.push(l.to_string()))
            .unwrap();

        let expected: Vec<String> = (1..=5)
            .flat_map(|i| [format!("out{i}"), format!("err{i}")])
            .collect();
        assert_eq!(lines, expected);
        assert_eq!(outcome.output, expected.join("\n") + "\n");
    }

    #[test]
    fn non_zero_exit_is_an_outcome_not_an_error() {
        let outcome = ProcessStageRunner
            .run_external(&sh("echo 'no images found' 1>&2; exit 3"), &mut |_| {})
            .unwrap();

        assert_eq!(outcome.exit_code, Some(3));
        assert_eq!(outcome.output, "no images found\n");
    }

    #[test]
    fn run_maps_failure_to_stage_error() {
        let err = ProcessStageRunner
            .run("mapper", &sh("echo boom; exit 1"), &mut |_| {})
            .unwrap_err();

        match err {
            WalkmeshError::ExternalStageFailed { stage, output, .. } => {
                assert_eq!(stage, "mapper");
                assert_eq!(output, "boom\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_program_is_launch_failure() {
        let err = ProcessStageRunner
            .run_external(
                &ExternalCommand::new("/nonexistent/walkmesh-colmap"),
                &mut |_| {},
            )
            .unwrap_err();

        assert!(matches!(err, WalkmeshError::LaunchFailed { .. }));
    }

    #[test]
    fn partial_last_line_is_kept() {
        let outcome = ProcessStageRunner
            .run_external(&sh("printf 'a\\nb'"), &mut |_| {})
            .unwrap();

        assert_eq!(outcome.output, "a\nb\n");
    }
}
