//! Process exit codes for the `cmdrunner` binary.

use cmdrunner_engine::ErrorCategory;

/// Newtype over the numeric exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error, output processing failure, or unexpected I/O failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// Invalid configuration, unknown parameter, or unrenderable value
    pub const CONFIG: ExitCode = ExitCode(2);

    /// The runner's binary could not be found
    pub const RESOLUTION: ExitCode = ExitCode(3);

    /// The external command failed to run or exited non-zero
    pub const EXECUTION: ExitCode = ExitCode(70);

    /// Wrap the child's own return code (`--passthrough-rc`).
    #[must_use]
    pub const fn from_rc(rc: i32) -> Self {
        Self(rc)
    }

    #[must_use]
    pub const fn from_category(category: ErrorCategory) -> Self {
        match category {
            ErrorCategory::Configuration => Self::CONFIG,
            ErrorCategory::Resolution => Self::RESOLUTION,
            ErrorCategory::Execution => Self::EXECUTION,
            ErrorCategory::PostProcess => Self::INTERNAL,
        }
    }

    /// Use this with `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}
