use std::collections::BTreeMap;
use std::time::Instant;

use cmdrunner_format::render;
use cmdrunner_process::{CommandSpec, ProcessOutput};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::env::Environment;
use crate::error::CmdRunnerError;
use crate::params::{ArgsOrder, ParamSource};
use crate::runner::CmdRunner;

static ABSENT: Value = Value::Null;

// ============================================================================
// Output processing
// ============================================================================

/// Reduces the captured process output to the value `run()` returns.
pub trait OutputProcess {
    type Output;

    /// # Errors
    /// Whatever the processor reports; it reaches the caller unchanged.
    fn process(&self, output: ProcessOutput) -> anyhow::Result<Self::Output>;
}

/// Returns the captured output as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawOutput;

impl OutputProcess for RawOutput {
    type Output = ProcessOutput;

    fn process(&self, output: ProcessOutput) -> anyhow::Result<ProcessOutput> {
        Ok(output)
    }
}

/// Adapts a `(rc, stdout, stderr)` closure.
#[derive(Debug, Clone, Copy)]
pub struct FnProcessor<F>(F);

impl<F, T> OutputProcess for FnProcessor<F>
where
    F: Fn(i32, &str, &str) -> anyhow::Result<T>,
{
    type Output = T;

    fn process(&self, output: ProcessOutput) -> anyhow::Result<T> {
        (self.0)(output.rc(), &output.stdout_string(), &output.stderr_string())
    }
}

// ============================================================================
// RunInfo
// ============================================================================

/// What was actually executed by the last `run()` of a context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunInfo {
    /// Resolved binary path followed by every rendered token
    pub cmd: Vec<String>,
    /// Complete environment handed to the process
    pub environ: BTreeMap<String, String>,
    /// Order the tokens were rendered in
    pub args_order: ArgsOrder,
    /// Return-code policy in effect, after any context override
    pub check_rc: bool,
}

// ============================================================================
// InvocationContext
// ============================================================================

/// One prepared call of a [`CmdRunner`].
///
/// Opening a context does no I/O. Each [`run`](Self::run) executes the
/// command exactly once; dropping the context never does.
pub struct InvocationContext<'r, P = RawOutput> {
    runner: &'r CmdRunner,
    order: ArgsOrder,
    skip_absent: bool,
    check_rc: Option<bool>,
    params: Option<&'r dyn ParamSource>,
    environ_update: BTreeMap<String, String>,
    processor: P,
    run_info: Option<RunInfo>,
}

impl<P> std::fmt::Debug for InvocationContext<'_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationContext")
            .field("runner", &self.runner)
            .field("order", &self.order)
            .field("skip_absent", &self.skip_absent)
            .field("check_rc", &self.check_rc)
            .field("environ_update", &self.environ_update.keys().collect::<Vec<_>>())
            .field("run_info", &self.run_info)
            .finish_non_exhaustive()
    }
}

impl<'r> InvocationContext<'r, RawOutput> {
    pub(crate) fn open(runner: &'r CmdRunner, order: ArgsOrder) -> Self {
        debug!(command = %runner.command(), args_order = %order, "Opened invocation context");
        Self {
            runner,
            order,
            skip_absent: true,
            check_rc: None,
            params: None,
            environ_update: BTreeMap::new(),
            processor: RawOutput,
            run_info: None,
        }
    }
}

impl<'r, P: OutputProcess> InvocationContext<'r, P> {
    /// Reduce the output with `f(rc, stdout, stderr)`; `run()` then returns
    /// whatever `f` returns.
    #[must_use]
    pub fn output_process<F, T>(self, f: F) -> InvocationContext<'r, FnProcessor<F>>
    where
        F: Fn(i32, &str, &str) -> anyhow::Result<T>,
    {
        self.with_processor(FnProcessor(f))
    }

    #[must_use]
    pub fn with_processor<Q: OutputProcess>(self, processor: Q) -> InvocationContext<'r, Q> {
        InvocationContext {
            runner: self.runner,
            order: self.order,
            skip_absent: self.skip_absent,
            check_rc: self.check_rc,
            params: self.params,
            environ_update: self.environ_update,
            processor,
            run_info: self.run_info,
        }
    }

    /// When set (the default), absent values contribute no tokens unless the
    /// formatter always renders.
    #[must_use]
    pub fn skip_absent(mut self, skip: bool) -> Self {
        self.skip_absent = skip;
        self
    }

    /// Override the runner's return-code policy for this context.
    #[must_use]
    pub fn check_rc(mut self, check_rc: bool) -> Self {
        self.check_rc = Some(check_rc);
        self
    }

    /// Store consulted for values not given to `run_with`.
    #[must_use]
    pub fn params(mut self, params: &'r dyn ParamSource) -> Self {
        self.params = Some(params);
        self
    }

    /// Environment override for this call only.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environ_update.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn args_order(&self) -> &ArgsOrder {
        &self.order
    }

    /// Details of the last `run()`, if any.
    #[must_use]
    pub fn run_info(&self) -> Option<&RunInfo> {
        self.run_info.as_ref()
    }

    /// Run with values from the parameter store only.
    ///
    /// # Errors
    /// See [`run_with`](Self::run_with).
    pub fn run(&mut self) -> Result<P::Output, CmdRunnerError> {
        self.run_with(std::iter::empty::<(String, Value)>())
    }

    /// Run once, with `overrides` taking precedence over the parameter store.
    ///
    /// # Errors
    /// - configuration errors for unknown override names, missing values and
    ///   values a formatter rejects
    /// - [`CmdRunnerError::Resolution`] when the binary cannot be found
    /// - [`CmdRunnerError::Execution`] when the process cannot be run or, under
    ///   the check policy, exits non-zero
    /// - [`CmdRunnerError::OutputProcess`] carrying the processor's own error
    pub fn run_with<I, K, V>(&mut self, overrides: I) -> Result<P::Output, CmdRunnerError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let overrides = self.collect_overrides(overrides)?;
        let cmd = self.assemble(&overrides)?;

        let base = match self.runner.inherited_env() {
            Some(vars) => Environment::from_vars(vars.clone()),
            None => Environment::from_system(),
        };
        let environ = base
            .force_locale(self.runner.force_lang())
            .overlay(self.runner.environ_update().clone())
            .overlay(self.environ_update.clone())
            .into_vars();

        let check_rc = self.check_rc.unwrap_or_else(|| self.runner.check_rc());
        let spec = CommandSpec::new(&cmd[0])
            .args(&cmd[1..])
            .envs(environ.iter())
            .env_clear();

        self.run_info = Some(RunInfo {
            cmd: cmd.clone(),
            environ,
            args_order: self.order.clone(),
            check_rc,
        });

        info!(
            command = %self.runner.command(),
            argv = ?cmd,
            env_keys = ?self.environ_update.keys().collect::<Vec<_>>(),
            "Running command"
        );
        let started = Instant::now();
        let output = match self.runner.executor().run_checked(&spec, check_rc) {
            Ok(output) => output,
            Err(err) => {
                warn!(command = %self.runner.command(), error = %err, "Command failed");
                return Err(err.into());
            }
        };
        debug!(
            command = %self.runner.command(),
            rc = output.rc(),
            elapsed = ?started.elapsed(),
            "Command completed"
        );

        self.processor
            .process(output)
            .map_err(CmdRunnerError::OutputProcess)
    }

    /// Argv `run_with(overrides)` would execute, without executing it.
    ///
    /// Resolves the binary path but records no [`RunInfo`].
    ///
    /// # Errors
    /// Same configuration and resolution errors as `run_with`.
    pub fn preview<I, K, V>(&self, overrides: I) -> Result<Vec<String>, CmdRunnerError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let overrides = self.collect_overrides(overrides)?;
        self.assemble(&overrides)
    }

    fn collect_overrides<I, K, V>(
        &self,
        overrides: I,
    ) -> Result<BTreeMap<String, Value>, CmdRunnerError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut collected = BTreeMap::new();
        for (name, value) in overrides {
            let name = name.into();
            self.runner.require_formatter(&name)?;
            collected.insert(name, value.into());
        }
        Ok(collected)
    }

    fn assemble(&self, overrides: &BTreeMap<String, Value>) -> Result<Vec<String>, CmdRunnerError> {
        let binary = self.runner.binary_path()?;
        let mut cmd = vec![binary.to_string_lossy().into_owned()];
        cmd.extend(self.runner.command_args().iter().cloned());

        for name in &self.order {
            let formatter = self.runner.require_formatter(name)?;
            let value = overrides
                .get(name)
                .or_else(|| self.params.and_then(|params| params.get(name)));

            let value = match value {
                Some(value) => value,
                None if formatter.always_renders() => &ABSENT,
                None => {
                    return Err(CmdRunnerError::MissingValue { name: name.clone() });
                }
            };

            if value.is_null() && self.skip_absent && !formatter.always_renders() {
                continue;
            }

            let tokens = formatter
                .format(value)
                .map_err(|source| CmdRunnerError::Format {
                    name: name.clone(),
                    value: render(value),
                    source,
                })?;
            cmd.extend(tokens);
        }

        debug!(command = %self.runner.command(), argv = ?cmd, "Assembled argv");
        Ok(cmd)
    }
}
