use std::path::PathBuf;

use cmdrunner_engine::CmdRunnerError;
use thiserror::Error;

/// Failures while locating, reading or validating a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Unknown runner '{name}' (configured: {known})")]
    UnknownRunner { name: String, known: String },

    #[error("Runner '{runner}' is invalid: {source}")]
    InvalidRunner {
        runner: String,
        #[source]
        source: CmdRunnerError,
    },
}
