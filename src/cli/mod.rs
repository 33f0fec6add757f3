//! Command-line interface
//!
//! - `args`: clap definitions
//! - `run`: entry point, logging setup and error reporting
//! - `commands`: subcommand handlers

mod args;
mod commands;
mod run;

pub use args::{Cli, Commands, parse_env_pair, parse_param};
pub use commands::{RunOptions, format_argv, list_runners, print_runner, run_runner};
pub use run::run;

#[cfg(test)]
mod tests;
