//! Error types for runner configuration and invocation

use cmdrunner_format::FormatError;
use cmdrunner_process::RunnerError;
use thiserror::Error;

/// Broad failure classes, used to tell "the integration is set up wrong"
/// apart from "the external tool failed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Unknown or duplicate names, bad formatter arguments, missing values,
    /// values a formatter cannot render
    Configuration,
    /// The command's binary could not be located
    Resolution,
    /// The process could not be run, timed out, or exited non-zero under
    /// the check policy
    Execution,
    /// The caller's output processor failed
    PostProcess,
}

impl ErrorCategory {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Resolution => "resolution",
            Self::Execution => "execution",
            Self::PostProcess => "post-process",
        }
    }
}

#[derive(Error, Debug)]
pub enum CmdRunnerError {
    #[error("Invalid runner configuration: {reason}")]
    Config { reason: String },

    #[error("Argument '{name}' is declared more than once")]
    DuplicateArgument { name: String },

    #[error("Unknown argument '{name}' (known: {known})")]
    UnknownArgument { name: String, known: String },

    #[error("Invalid formatter for argument '{name}': {source}")]
    InvalidFormatter {
        name: String,
        #[source]
        source: FormatError,
    },

    #[error("No value supplied for argument '{name}'")]
    MissingValue { name: String },

    #[error("Failed to format argument '{name}' with value {value}: {source}")]
    Format {
        name: String,
        value: String,
        #[source]
        source: FormatError,
    },

    #[error("Binary resolution failed: {0}")]
    Resolution(#[source] RunnerError),

    #[error("Command execution failed: {0}")]
    Execution(#[source] RunnerError),

    #[error(transparent)]
    OutputProcess(anyhow::Error),
}

impl CmdRunnerError {
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Config { .. }
            | Self::DuplicateArgument { .. }
            | Self::UnknownArgument { .. }
            | Self::InvalidFormatter { .. }
            | Self::MissingValue { .. }
            | Self::Format { .. } => ErrorCategory::Configuration,
            Self::Resolution(_) => ErrorCategory::Resolution,
            Self::Execution(_) => ErrorCategory::Execution,
            Self::OutputProcess(_) => ErrorCategory::PostProcess,
        }
    }

    /// Return code of the failed process, when the failure was a non-zero exit.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Execution(RunnerError::NonZeroExit { code, .. }) => Some(*code),
            _ => None,
        }
    }
}

impl From<RunnerError> for CmdRunnerError {
    fn from(err: RunnerError) -> Self {
        if err.is_resolution() {
            Self::Resolution(err)
        } else {
            Self::Execution(err)
        }
    }
}
