//! cmdrunner - declarative, deterministic invocation of external tools
//!
//! A [`CmdRunner`] binds parameter names to [`Formatter`]s once. Each call
//! then opens an [`InvocationContext`] naming which parameters appear and in
//! what order, renders their values into an argv, resolves the binary and
//! runs it with a controlled environment.
//!
//! ```rust,no_run
//! use cmdrunner::{CmdRunner, fmt};
//! use serde_json::json;
//!
//! let runner = CmdRunner::builder("zpool")
//!     .arg("subcommand", fmt::literal())
//!     .arg("force", fmt::flag_if_true("-f"))
//!     .arg("name", fmt::literal())
//!     .path_prefix(["/usr/sbin"])
//!     .build()?;
//!
//! let params = json!({"force": true, "name": "tank"});
//! let output = runner
//!     .context_with("subcommand force name")?
//!     .params(&params)
//!     .run_with([("subcommand", json!("destroy"))])?;
//! println!("rc={}", output.rc());
//! # Ok::<(), cmdrunner::CmdRunnerError>(())
//! ```
//!
//! Runners can also be declared in `.cmdrunner/config.toml` and driven from
//! the `cmdrunner` binary; see [`Config`].

pub mod cli;
pub mod error;
pub mod exit_codes;
pub mod logging;

pub use cmdrunner_config::{ArgDef, Config, ConfigError, ConfigSource, ForceLang, FormatterSpec, RunnerDef};
pub use cmdrunner_engine::{
    ArgsOrder, CmdRunner, CmdRunnerBuilder, CmdRunnerError, DEFAULT_FORCE_LANG, Environment,
    ErrorCategory, FnProcessor, InvocationContext, OutputProcess, ParamSource, RawOutput, RunInfo,
};
pub use cmdrunner_format::{FormatError, Formatter, Value, ValueKind, fmt, is_truthy, render};
pub use cmdrunner_process::{
    CommandSpec, NativeRunner, PathResolver, ProcessOutput, ProcessRunner, RunnerError,
    WhichResolver,
};
pub use error::CliError;
pub use exit_codes::ExitCode;
