use crate::error::RunnerError;
use std::process::Stdio;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CommandSpec, ProcessOutput, ProcessRunner};

// ============================================================================
// NativeRunner - Secure Native Process Execution
// ============================================================================

/// Native process runner using `std::process::Command`.
///
/// `NativeRunner` is the production implementation of [`ProcessRunner`]:
/// - Uses `Command::new().args()` only, no shell string evaluation
/// - stdin is closed, stdout and stderr are captured in full
/// - Honours [`CommandSpec::timeout`] by killing the child when it expires
///
/// # Example
///
/// ```rust,no_run
/// use cmdrunner_process::{CommandSpec, NativeRunner, ProcessRunner};
///
/// let output = NativeRunner::new()
///     .run(&CommandSpec::new("echo").arg("hello"))
///     .unwrap();
/// assert!(output.success());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRunner;

impl NativeRunner {
    /// Create a new `NativeRunner`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessRunner for NativeRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
        use std::sync::mpsc;
        use std::thread;

        let program = cmd.program.to_string_lossy().into_owned();

        let mut command = cmd.to_command();
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = command.spawn().map_err(|e| RunnerError::SpawnFailed {
            program: program.clone(),
            reason: e.to_string(),
        })?;

        let Some(timeout) = cmd.timeout else {
            let output = child
                .wait_with_output()
                .map_err(|e| RunnerError::SpawnFailed {
                    program,
                    reason: format!("Failed to wait for process: {e}"),
                })?;
            return Ok(ProcessOutput::new(
                output.stdout,
                output.stderr,
                output.status.code(),
            ));
        };

        let (tx, rx) = mpsc::channel();
        let child_id = child.id();

        let handle = thread::spawn(move || {
            let output = child.wait_with_output();
            let _ = tx.send(output);
        });

        match rx.recv_timeout(timeout) {
            Ok(output_result) => {
                let _ = handle.join();

                let output = output_result.map_err(|e| RunnerError::SpawnFailed {
                    program,
                    reason: format!("Failed to wait for process: {e}"),
                })?;

                Ok(ProcessOutput::new(
                    output.stdout,
                    output.stderr,
                    output.status.code(),
                ))
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!(program = %program, pid = child_id, "Process timed out, terminating");
                Self::terminate_process(child_id);
                let _ = handle.join();

                Err(RunnerError::Timeout {
                    timeout_seconds: timeout.as_secs(),
                })
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(RunnerError::SpawnFailed {
                program,
                reason: "Process monitoring thread terminated unexpectedly".to_string(),
            }),
        }
    }
}

impl NativeRunner {
    /// Terminate a process by its PID.
    ///
    /// On Unix, sends SIGKILL to the process.
    /// On Windows, uses TerminateProcess.
    fn terminate_process(pid: u32) {
        debug!(pid, "Sending kill to child process");

        #[cfg(unix)]
        {
            unsafe {
                libc::kill(pid as i32, libc::SIGKILL);
            }
        }

        #[cfg(windows)]
        {
            use windows::Win32::Foundation::CloseHandle;
            use windows::Win32::System::Threading::{
                OpenProcess, PROCESS_TERMINATE, TerminateProcess,
            };

            unsafe {
                if let Ok(handle) = OpenProcess(PROCESS_TERMINATE, false, pid) {
                    let _ = TerminateProcess(handle, 1);
                    let _ = CloseHandle(handle);
                }
            }
        }

        #[cfg(not(any(unix, windows)))]
        {
            let _ = pid;
        }
    }
}
