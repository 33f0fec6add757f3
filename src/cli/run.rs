//! CLI entry point and dispatch

use clap::Parser;
use cmdrunner_config::Config;

use super::args::{Cli, Commands};
use super::commands::{self, RunOptions};
use crate::error::CliError;
use crate::exit_codes::ExitCode;
use crate::logging;

/// Main CLI execution function.
///
/// Handles all output, errors included. main.rs only maps the returned code
/// to the process exit status.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose) {
        eprintln!("warning: failed to initialise logging: {e}");
    }

    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            report(&err);
            err.to_exit_code()
        }
    };

    if code == ExitCode::SUCCESS {
        Ok(())
    } else {
        Err(code)
    }
}

fn dispatch(cli: Cli) -> Result<ExitCode, CliError> {
    let config = Config::discover(cli.config.as_deref())?;
    tracing::debug!(source = %config.source(), "configuration loaded");

    match cli.command {
        Commands::Run {
            runner,
            order,
            set,
            env,
            no_skip_absent,
            print,
            passthrough_rc,
        } => {
            let options = RunOptions {
                order,
                params: set.into_iter().collect(),
                env,
                skip_absent: !no_skip_absent,
                passthrough_rc,
            };
            let runner = config.build_runner(&runner)?;
            let mut stdout = std::io::stdout().lock();
            if print {
                commands::print_runner(&runner, &options, &mut stdout)
            } else {
                let mut stderr = std::io::stderr().lock();
                commands::run_runner(&runner, &options, &mut stdout, &mut stderr)
            }
        }
        Commands::List => {
            commands::list_runners(&config, &mut std::io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn report(err: &CliError) {
    eprintln!("✗ {} error: {err}", err.kind());
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}
