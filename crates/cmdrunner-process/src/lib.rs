//! Process collaborators for the command runner.
//!
//! Provides the argv-only command description ([`CommandSpec`]), the executor
//! seam ([`ProcessRunner`]) with its native implementation ([`NativeRunner`]),
//! and binary path resolution ([`PathResolver`], [`WhichResolver`]).
//!
//! # Security Model
//!
//! All process execution goes through [`CommandSpec`] to ensure argv-style invocation.
//! This prevents shell injection attacks by ensuring arguments are passed as discrete
//! elements rather than shell strings.

pub mod command_spec;
pub mod error;
pub mod native;
pub mod process;
pub mod resolve;

pub use command_spec::CommandSpec;
pub use error::RunnerError;
pub use native::NativeRunner;
pub use process::{ProcessOutput, ProcessRunner};
pub use resolve::{PathResolver, WhichResolver};
