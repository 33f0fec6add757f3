//! CLI argument definitions

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

/// cmdrunner - run configured command-line tools with declarative arguments
#[derive(Parser, Debug)]
#[command(name = "cmdrunner")]
#[command(about = "Run external tools from declarative argument definitions")]
#[command(long_about = r#"
cmdrunner renders named parameter values into a command line using the
formatters declared for a runner, then executes the tool with a controlled
environment (forced C locale by default).

EXAMPLES:
  # Show the argv without running anything
  cmdrunner run zpool --order "subcommand force name" \
      --set subcommand=destroy --set force=true --set name=tank --print

  # Run and exit with the tool's own return code
  cmdrunner run ls --set all=true --passthrough-rc

  # List configured runners
  cmdrunner list

CONFIGURATION:
  Runners are declared under [runners.NAME] in .cmdrunner/config.toml,
  discovered by searching upward from the working directory. CMDRUNNER_CONFIG
  or --config name a file explicitly.
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render and execute a configured runner
    Run {
        /// Runner name from the configuration
        runner: String,

        /// Parameter names to render, in order (defaults to the runner's
        /// `default_order`)
        #[arg(long)]
        order: Option<String>,

        /// Parameter value; parsed as JSON, falling back to a plain string
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_param)]
        set: Vec<(String, Value)>,

        /// Extra environment variable for this call
        #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
        env: Vec<(String, String)>,

        /// Render formatters for null values instead of skipping them
        #[arg(long)]
        no_skip_absent: bool,

        /// Print the argv instead of executing
        #[arg(long)]
        print: bool,

        /// Exit with the child's return code
        #[arg(long)]
        passthrough_rc: bool,
    },

    /// List configured runners and their parameters
    List,
}

/// Parse `name=value`, reading `value` as JSON when it is valid JSON.
///
/// # Errors
/// Fails when `=` is missing or the name is empty.
pub fn parse_param(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = split_pair(raw)?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

/// Parse `KEY=VALUE`.
///
/// # Errors
/// Fails when `=` is missing or the key is empty.
pub fn parse_env_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = split_pair(raw)?;
    Ok((key.to_string(), value.to_string()))
}

fn split_pair(raw: &str) -> Result<(&str, &str), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name, value)),
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}
