//! Error types for process execution and path resolution

use thiserror::Error;

/// Failures raised by the process collaborators.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Binary '{program}' not found (searched: {searched})")]
    BinaryNotFound { program: String, searched: String },

    #[error("Failed to spawn process '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("Command {cmd:?} exited with code {code}: {}", stderr.trim())]
    NonZeroExit {
        cmd: Vec<String>,
        code: i32,
        stdout: String,
        stderr: String,
    },

    #[error("Execution timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },
}

impl RunnerError {
    /// True when the error comes from locating the binary rather than running it.
    #[must_use]
    pub const fn is_resolution(&self) -> bool {
        matches!(self, Self::BinaryNotFound { .. })
    }
}
