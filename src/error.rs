//! Errors surfaced by the `cmdrunner` binary.

use cmdrunner_config::ConfigError;
use cmdrunner_engine::CmdRunnerError;
use thiserror::Error;

use crate::exit_codes::ExitCode;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Runner(#[from] CmdRunnerError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(ConfigError::InvalidRunner { source, .. }) => {
                ExitCode::from_category(source.category())
            }
            Self::Config(ConfigError::Io { .. }) | Self::Io(_) => ExitCode::INTERNAL,
            Self::Config(_) => ExitCode::CONFIG,
            Self::Runner(err) => ExitCode::from_category(err.category()),
        }
    }

    /// Short label for the failure class, used as the report prefix.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration",
            Self::Runner(err) => err.category().as_str(),
            Self::Io(_) => "io",
        }
    }
}
