//! Declarative command invocation.
//!
//! A [`CmdRunner`] is configured once per action: the command to run, a
//! [`Formatter`](cmdrunner_format::Formatter) per named parameter, and the
//! call-wide policy (default order, return-code check, locale forcing, extra
//! search path, environment overrides). Each call then opens an
//! [`InvocationContext`] that picks which parameters take part and in which
//! order, and runs the command exactly once.
//!
//! ```rust,no_run
//! use cmdrunner_engine::CmdRunner;
//! use cmdrunner_format::fmt;
//! use serde_json::json;
//!
//! let zpool = CmdRunner::builder("zpool")
//!     .arg("subcommand", fmt::list())
//!     .arg("scripted", fmt::flag_if_true("-H"))
//!     .arg("name", fmt::literal())
//!     .build()?;
//!
//! let mut ctx = zpool.context_with("subcommand scripted name")?;
//! let output = ctx.run_with([
//!     ("subcommand", json!("list")),
//!     ("scripted", json!(true)),
//!     ("name", json!("tank")),
//! ])?;
//! println!("{}", output.stdout_string());
//! # Ok::<(), cmdrunner_engine::CmdRunnerError>(())
//! ```

pub mod context;
pub mod env;
pub mod error;
pub mod params;
pub mod runner;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use context::{FnProcessor, InvocationContext, OutputProcess, RawOutput, RunInfo};
pub use env::{DEFAULT_FORCE_LANG, Environment};
pub use error::{CmdRunnerError, ErrorCategory};
pub use params::{ArgsOrder, ParamSource};
pub use runner::{CmdRunner, CmdRunnerBuilder};
