use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cmdrunner_format::Formatter;
use cmdrunner_process::{NativeRunner, PathResolver, ProcessRunner, WhichResolver};
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::context::{InvocationContext, RawOutput};
use crate::env::DEFAULT_FORCE_LANG;
use crate::error::CmdRunnerError;
use crate::params::ArgsOrder;

// ============================================================================
// CmdRunner - Per-action command configuration
// ============================================================================

/// Configuration for one external command, built once per action.
///
/// Immutable after [`CmdRunnerBuilder::build`] apart from the binary path,
/// which is resolved on first use and then reused by every context.
pub struct CmdRunner {
    command: String,
    command_args: Vec<String>,
    formats: BTreeMap<String, Formatter>,
    default_order: ArgsOrder,
    check_rc: bool,
    force_lang: Option<String>,
    path_prefix: Vec<PathBuf>,
    environ_update: BTreeMap<String, String>,
    inherited_env: Option<BTreeMap<String, String>>,
    executor: Arc<dyn ProcessRunner>,
    resolver: Arc<dyn PathResolver>,
    binary: OnceCell<PathBuf>,
}

impl CmdRunner {
    #[must_use]
    pub fn builder(command: impl Into<String>) -> CmdRunnerBuilder {
        CmdRunnerBuilder::new(command)
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Fixed arguments placed right after the binary on every call.
    #[must_use]
    pub fn command_args(&self) -> &[String] {
        &self.command_args
    }

    #[must_use]
    pub fn default_order(&self) -> &ArgsOrder {
        &self.default_order
    }

    #[must_use]
    pub const fn check_rc(&self) -> bool {
        self.check_rc
    }

    #[must_use]
    pub fn force_lang(&self) -> Option<&str> {
        self.force_lang.as_deref()
    }

    #[must_use]
    pub fn path_prefix(&self) -> &[PathBuf] {
        &self.path_prefix
    }

    #[must_use]
    pub fn environ_update(&self) -> &BTreeMap<String, String> {
        &self.environ_update
    }

    pub(crate) fn inherited_env(&self) -> Option<&BTreeMap<String, String>> {
        self.inherited_env.as_ref()
    }

    pub(crate) fn executor(&self) -> &dyn ProcessRunner {
        self.executor.as_ref()
    }

    /// Declared parameter names, sorted.
    pub fn arg_names(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    #[must_use]
    pub fn formatter(&self, name: &str) -> Option<&Formatter> {
        self.formats.get(name)
    }

    pub(crate) fn require_formatter(&self, name: &str) -> Result<&Formatter, CmdRunnerError> {
        self.formats
            .get(name)
            .ok_or_else(|| CmdRunnerError::UnknownArgument {
                name: name.to_string(),
                known: self.formats.keys().cloned().collect::<Vec<_>>().join(", "),
            })
    }

    pub(crate) fn check_order(&self, order: &ArgsOrder) -> Result<(), CmdRunnerError> {
        for name in order {
            self.require_formatter(name)?;
        }
        Ok(())
    }

    /// Absolute path of the command's binary.
    ///
    /// Resolved at most once per runner, even when called from several threads.
    ///
    /// # Errors
    /// Returns [`CmdRunnerError::Resolution`] when the binary cannot be found.
    pub fn binary_path(&self) -> Result<&Path, CmdRunnerError> {
        self.binary
            .get_or_try_init(|| {
                let path = self.resolver.resolve(&self.command, &self.path_prefix)?;
                debug!(command = %self.command, path = %path.display(), "Resolved binary");
                Ok::<_, CmdRunnerError>(path)
            })
            .map(PathBuf::as_path)
    }

    /// Open a context using the default order.
    #[must_use]
    pub fn context(&self) -> InvocationContext<'_, RawOutput> {
        InvocationContext::open(self, self.default_order.clone())
    }

    /// Open a context with an explicit order.
    ///
    /// # Errors
    /// Returns [`CmdRunnerError::UnknownArgument`] when the order names a
    /// parameter this runner does not declare.
    pub fn context_with(
        &self,
        order: impl Into<ArgsOrder>,
    ) -> Result<InvocationContext<'_, RawOutput>, CmdRunnerError> {
        let order = order.into();
        self.check_order(&order)?;
        Ok(InvocationContext::open(self, order))
    }
}

impl fmt::Debug for CmdRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CmdRunner")
            .field("command", &self.command)
            .field("command_args", &self.command_args)
            .field("formats", &self.formats)
            .field("default_order", &self.default_order)
            .field("check_rc", &self.check_rc)
            .field("force_lang", &self.force_lang)
            .field("path_prefix", &self.path_prefix)
            .field("environ_update", &self.environ_update.keys().collect::<Vec<_>>())
            .field("binary", &self.binary.get())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// CmdRunnerBuilder
// ============================================================================

/// Builder for [`CmdRunner`].
///
/// Defaults: [`NativeRunner`] executor, [`WhichResolver`] resolver, empty
/// default order, return codes checked, locale forced to `"C"`.
pub struct CmdRunnerBuilder {
    command: String,
    command_args: Vec<String>,
    args: Vec<(String, Formatter)>,
    default_order: ArgsOrder,
    check_rc: bool,
    force_lang: Option<String>,
    path_prefix: Vec<PathBuf>,
    environ_update: BTreeMap<String, String>,
    inherited_env: Option<BTreeMap<String, String>>,
    executor: Option<Arc<dyn ProcessRunner>>,
    resolver: Option<Arc<dyn PathResolver>>,
}

impl CmdRunnerBuilder {
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            command_args: Vec::new(),
            args: Vec::new(),
            default_order: ArgsOrder::new(),
            check_rc: true,
            force_lang: Some(DEFAULT_FORCE_LANG.to_string()),
            path_prefix: Vec::new(),
            environ_update: BTreeMap::new(),
            inherited_env: None,
            executor: None,
            resolver: None,
        }
    }

    /// Bind `name` to `formatter`.
    #[must_use]
    pub fn arg(mut self, name: impl Into<String>, formatter: Formatter) -> Self {
        self.args.push((name.into(), formatter));
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = (S, Formatter)>,
        S: Into<String>,
    {
        self.args
            .extend(args.into_iter().map(|(name, f)| (name.into(), f)));
        self
    }

    /// Arguments placed right after the binary on every call
    /// (`["pool"]` for a `zpool`-style front end, for example).
    #[must_use]
    pub fn command_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command_args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn default_order(mut self, order: impl Into<ArgsOrder>) -> Self {
        self.default_order = order.into();
        self
    }

    #[must_use]
    pub fn check_rc(mut self, check_rc: bool) -> Self {
        self.check_rc = check_rc;
        self
    }

    /// Locale forced on the child through `LANGUAGE` and `LC_ALL`; `None`
    /// disables forcing.
    #[must_use]
    pub fn force_lang(mut self, lang: Option<&str>) -> Self {
        self.force_lang = lang.map(str::to_string);
        self
    }

    /// Directories searched before `PATH` when resolving the binary.
    #[must_use]
    pub fn path_prefix<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.path_prefix = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Environment override applied to every call.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environ_update.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.environ_update
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Environment the child starts from instead of the current process
    /// environment.
    #[must_use]
    pub fn inherited_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.inherited_env = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    #[must_use]
    pub fn executor(mut self, executor: Arc<dyn ProcessRunner>) -> Self {
        self.executor = Some(executor);
        self
    }

    #[must_use]
    pub fn resolver(mut self, resolver: Arc<dyn PathResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// Performs no process execution and no path lookup.
    ///
    /// # Errors
    /// Returns a configuration error for an empty command, duplicate
    /// parameter names, malformed formatters, or a default order naming an
    /// undeclared parameter.
    pub fn build(self) -> Result<CmdRunner, CmdRunnerError> {
        if self.command.trim().is_empty() {
            return Err(CmdRunnerError::Config {
                reason: "command must not be empty".to_string(),
            });
        }
        if self.force_lang.as_deref() == Some("") {
            return Err(CmdRunnerError::Config {
                reason: "force_lang must not be empty; use None to disable".to_string(),
            });
        }

        let mut formats = BTreeMap::new();
        for (name, formatter) in self.args {
            if name.is_empty() {
                return Err(CmdRunnerError::Config {
                    reason: "argument names must not be empty".to_string(),
                });
            }
            formatter
                .validate()
                .map_err(|source| CmdRunnerError::InvalidFormatter {
                    name: name.clone(),
                    source,
                })?;
            if formats.contains_key(&name) {
                return Err(CmdRunnerError::DuplicateArgument { name });
            }
            formats.insert(name, formatter);
        }

        let runner = CmdRunner {
            command: self.command,
            command_args: self.command_args,
            formats,
            default_order: self.default_order,
            check_rc: self.check_rc,
            force_lang: self.force_lang,
            path_prefix: self.path_prefix,
            environ_update: self.environ_update,
            inherited_env: self.inherited_env,
            executor: self
                .executor
                .unwrap_or_else(|| Arc::new(NativeRunner::new())),
            resolver: self
                .resolver
                .unwrap_or_else(|| Arc::new(WhichResolver::new())),
            binary: OnceCell::new(),
        };
        runner.check_order(&runner.default_order)?;

        debug!(
            command = %runner.command,
            args = runner.formats.len(),
            default_order = %runner.default_order,
            "Built command runner"
        );
        Ok(runner)
    }
}
