//! Subcommand handlers
//!
//! Handlers write to the sinks they are given so they can be exercised
//! without touching the real stdout/stderr.

use std::io::Write;

use cmdrunner_config::Config;
use cmdrunner_engine::{CmdRunner, CmdRunnerError, InvocationContext};
use cmdrunner_process::RunnerError;
use serde_json::{Map, Value};

use crate::error::CliError;
use crate::exit_codes::ExitCode;

/// Per-call settings collected from `cmdrunner run`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub order: Option<String>,
    /// `--set` values; names the runner does not declare are rejected
    pub params: Map<String, Value>,
    pub env: Vec<(String, String)>,
    pub skip_absent: bool,
    pub passthrough_rc: bool,
}

/// Every declared parameter, unset. `--set` values are passed as per-call
/// overrides on top of it, so undeclared names are rejected.
fn absent_store(runner: &CmdRunner) -> Map<String, Value> {
    runner
        .arg_names()
        .map(|name| (name.to_string(), Value::Null))
        .collect()
}

fn open<'r>(
    runner: &'r CmdRunner,
    options: &RunOptions,
    store: &'r Map<String, Value>,
) -> Result<InvocationContext<'r>, CmdRunnerError> {
    let ctx = match options.order.as_deref() {
        Some(order) => runner.context_with(order)?,
        None => runner.context(),
    };
    let ctx = options
        .env
        .iter()
        .fold(ctx, |ctx, (key, value)| ctx.env(key, value));
    Ok(ctx.skip_absent(options.skip_absent).params(store))
}

fn overrides(options: &RunOptions) -> impl Iterator<Item = (String, Value)> + '_ {
    options
        .params
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
}

/// `cmdrunner run --print`: render the argv and print it, shell-quoted.
///
/// # Errors
/// Configuration and resolution errors from rendering.
pub fn print_runner(
    runner: &CmdRunner,
    options: &RunOptions,
    out: &mut impl Write,
) -> Result<ExitCode, CliError> {
    let store = absent_store(runner);
    let argv = open(runner, options, &store)?.preview(overrides(options))?;
    writeln!(out, "{}", format_argv(&argv))?;
    Ok(ExitCode::SUCCESS)
}

/// `cmdrunner run`: execute once and echo the child's output.
///
/// With `passthrough_rc` the child's return code becomes the exit code, even
/// when the check policy rejected it.
///
/// # Errors
/// Any invocation error, except a non-zero exit under `passthrough_rc`.
pub fn run_runner(
    runner: &CmdRunner,
    options: &RunOptions,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<ExitCode, CliError> {
    let store = absent_store(runner);
    match open(runner, options, &store)?.run_with(overrides(options)) {
        Ok(output) => {
            out.write_all(&output.stdout)?;
            err.write_all(&output.stderr)?;
            Ok(if options.passthrough_rc {
                ExitCode::from_rc(output.rc())
            } else {
                ExitCode::SUCCESS
            })
        }
        Err(CmdRunnerError::Execution(RunnerError::NonZeroExit {
            cmd,
            code,
            stdout,
            stderr,
        })) => {
            out.write_all(stdout.as_bytes())?;
            err.write_all(stderr.as_bytes())?;
            if options.passthrough_rc {
                Ok(ExitCode::from_rc(code))
            } else {
                Err(CmdRunnerError::Execution(RunnerError::NonZeroExit {
                    cmd,
                    code,
                    stdout: String::new(),
                    stderr: String::new(),
                })
                .into())
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// `cmdrunner list`
///
/// # Errors
/// Write failures, or a runner that no longer builds.
pub fn list_runners(config: &Config, out: &mut impl Write) -> Result<(), CliError> {
    if config.runners.is_empty() {
        writeln!(out, "no runners configured ({})", config.source())?;
        return Ok(());
    }
    for name in config.runner_names() {
        let runner = config.build_runner(name)?;
        let mut head = vec![runner.command().to_string()];
        head.extend(runner.command_args().iter().cloned());
        writeln!(out, "{name}: {}", format_argv(&head))?;
        if !runner.default_order().is_empty() {
            writeln!(out, "  order: {}", runner.default_order())?;
        }
        for arg in runner.arg_names() {
            if let Some(formatter) = runner.formatter(arg) {
                writeln!(out, "  {arg}: {}", formatter.kind())?;
            }
        }
    }
    Ok(())
}

/// Join tokens for display, quoting any that a POSIX shell would split or
/// expand.
#[must_use]
pub fn format_argv(argv: &[String]) -> String {
    shell_words::join(argv)
}
