use crate::error::RunnerError;

use super::CommandSpec;

// ============================================================================
// ProcessRunner Trait - Secure Process Execution Interface
// ============================================================================

/// Output from a process execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Standard output from the process
    pub stdout: Vec<u8>,
    /// Standard error from the process
    pub stderr: Vec<u8>,
    /// Exit code from the process (None if terminated by signal)
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    /// Create a new `ProcessOutput` with the given values.
    #[must_use]
    pub fn new(stdout: Vec<u8>, stderr: Vec<u8>, exit_code: Option<i32>) -> Self {
        Self {
            stdout,
            stderr,
            exit_code,
        }
    }

    /// Get stdout as a UTF-8 string, lossy conversion.
    #[must_use]
    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    /// Get stderr as a UTF-8 string, lossy conversion.
    #[must_use]
    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }

    /// Return code as seen by callers; `-1` when the process was killed by a signal.
    #[must_use]
    pub fn rc(&self) -> i32 {
        self.exit_code.unwrap_or(-1)
    }

    /// Check if the process exited successfully (exit code 0).
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Trait for process execution.
///
/// Implementations MUST use argv-style APIs only (no shell string evaluation).
/// This trait provides a synchronous interface: `run` blocks until the
/// process has exited.
///
/// # Example
///
/// ```rust
/// use cmdrunner_process::{CommandSpec, ProcessOutput, ProcessRunner, RunnerError};
///
/// struct CannedRunner;
///
/// impl ProcessRunner for CannedRunner {
///     fn run(&self, _cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
///         Ok(ProcessOutput::new(b"ok".to_vec(), Vec::new(), Some(3)))
///     }
/// }
///
/// let cmd = CommandSpec::new("anything");
/// assert!(CannedRunner.run_checked(&cmd, false).is_ok());
/// assert!(CannedRunner.run_checked(&cmd, true).is_err());
/// ```
pub trait ProcessRunner: Send + Sync {
    /// Execute a command to completion.
    ///
    /// Returns `Ok` for any exit status, including non-zero ones.
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError>;

    /// Execute a command and, when `check_rc` is set, turn a non-zero exit
    /// into [`RunnerError::NonZeroExit`] carrying the captured output.
    fn run_checked(&self, cmd: &CommandSpec, check_rc: bool) -> Result<ProcessOutput, RunnerError> {
        let output = self.run(cmd)?;
        if check_rc && !output.success() {
            return Err(RunnerError::NonZeroExit {
                cmd: cmd.argv_lossy(),
                code: output.rc(),
                stdout: output.stdout_string(),
                stderr: output.stderr_string(),
            });
        }
        Ok(output)
    }
}

impl<T: ProcessRunner + ?Sized> ProcessRunner for std::sync::Arc<T> {
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
        (**self).run(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // ProcessOutput Tests
    // ============================================================================

    #[test]
    fn test_process_output_strings() {
        let output = ProcessOutput::new(b"out".to_vec(), b"err".to_vec(), Some(0));
        assert_eq!(output.stdout_string(), "out");
        assert_eq!(output.stderr_string(), "err");
        assert_eq!(output.rc(), 0);
    }

    #[test]
    fn test_process_output_success() {
        assert!(ProcessOutput::new(Vec::new(), Vec::new(), Some(0)).success());
        assert!(!ProcessOutput::new(Vec::new(), Vec::new(), Some(1)).success());

        let killed = ProcessOutput::new(Vec::new(), Vec::new(), None);
        assert!(!killed.success());
        assert_eq!(killed.rc(), -1);
    }

    #[test]
    fn test_process_output_lossy_utf8() {
        let invalid_utf8 = vec![0xff, 0xfe, 0x00, 0x01];
        let output = ProcessOutput::new(invalid_utf8.clone(), invalid_utf8, Some(0));
        assert!(!output.stdout_string().is_empty());
        assert!(!output.stderr_string().is_empty());
    }

    // ============================================================================
    // ProcessRunner Trait Tests
    // ============================================================================

    struct MockRunner {
        expected_output: ProcessOutput,
    }

    impl ProcessRunner for MockRunner {
        fn run(&self, _cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
            Ok(self.expected_output.clone())
        }
    }

    #[test]
    fn test_run_checked_passes_success_through() {
        let mock = MockRunner {
            expected_output: ProcessOutput::new(b"fine".to_vec(), Vec::new(), Some(0)),
        };
        let output = mock.run_checked(&CommandSpec::new("x"), true).unwrap();
        assert_eq!(output.stdout_string(), "fine");
    }

    #[test]
    fn test_run_checked_rejects_non_zero() {
        let mock = MockRunner {
            expected_output: ProcessOutput::new(b"o".to_vec(), b"e".to_vec(), Some(4)),
        };
        let cmd = CommandSpec::new("/bin/tool").arg("--flag");
        match mock.run_checked(&cmd, true) {
            Err(RunnerError::NonZeroExit {
                cmd,
                code,
                stdout,
                stderr,
            }) => {
                assert_eq!(cmd, vec!["/bin/tool", "--flag"]);
                assert_eq!(code, 4);
                assert_eq!(stdout, "o");
                assert_eq!(stderr, "e");
            }
            other => panic!("Expected NonZeroExit, got {other:?}"),
        }
    }

    #[test]
    fn test_run_checked_unchecked_returns_failure_output() {
        let mock = MockRunner {
            expected_output: ProcessOutput::new(Vec::new(), Vec::new(), Some(2)),
        };
        let output = mock.run_checked(&CommandSpec::new("x"), false).unwrap();
        assert_eq!(output.exit_code, Some(2));
    }

    #[test]
    fn test_arc_runner_delegates() {
        let mock = std::sync::Arc::new(MockRunner {
            expected_output: ProcessOutput::new(Vec::new(), Vec::new(), Some(0)),
        });
        assert!(mock.run(&CommandSpec::new("x")).unwrap().success());
    }
}
