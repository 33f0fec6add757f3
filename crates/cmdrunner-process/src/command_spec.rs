use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

// ============================================================================
// CommandSpec - Secure Process Execution Specification
// ============================================================================

/// Specification for a command to execute.
///
/// All process execution goes through this type to ensure argv-style invocation.
/// This prevents shell injection attacks by ensuring arguments are passed as
/// discrete elements rather than shell strings.
///
/// # Security
///
/// `CommandSpec` enforces that:
/// - Arguments are `Vec<OsString>`, NOT shell strings
/// - No shell string evaluation (`sh -c`, `cmd /C`) is used
/// - Arguments cross trust boundaries as discrete elements
///
/// # Example
///
/// ```rust
/// use cmdrunner_process::CommandSpec;
/// use std::ffi::OsString;
///
/// let cmd = CommandSpec::new("/usr/sbin/zpool")
///     .arg("list")
///     .arg("-H")
///     .env("LC_ALL", "C");
///
/// assert_eq!(cmd.program, OsString::from("/usr/sbin/zpool"));
/// assert_eq!(cmd.args.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    /// The program to execute
    pub program: OsString,
    /// Arguments as discrete elements (NOT shell strings)
    pub args: Vec<OsString>,
    /// Optional working directory
    pub cwd: Option<PathBuf>,
    /// Optional environment overrides
    pub env: Option<BTreeMap<OsString, OsString>>,
    /// When set, the child starts from an empty environment and sees only `env`
    pub env_clear: bool,
    /// Optional limit enforced by executors that support it
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    /// Create a new `CommandSpec` with the given program.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Add a single argument to the command.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments to the command.
    ///
    /// ```rust
    /// use cmdrunner_process::CommandSpec;
    ///
    /// let cmd = CommandSpec::new("zfs").args(["get", "-H", "all"]);
    /// assert_eq!(cmd.args.len(), 3);
    /// ```
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory for the command.
    #[must_use]
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Set an environment variable for the command.
    #[must_use]
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set multiple environment variables for the command.
    #[must_use]
    pub fn envs<I, K, V>(mut self, envs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let env_map = self.env.get_or_insert_with(BTreeMap::new);
        for (key, value) in envs {
            env_map.insert(key.into(), value.into());
        }
        self
    }

    /// Start the child from an empty environment instead of inheriting ours.
    ///
    /// Used when `env` already holds the complete environment.
    #[must_use]
    pub fn env_clear(mut self) -> Self {
        self.env_clear = true;
        self
    }

    /// Ask the executor to stop waiting after `timeout`.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Program followed by its arguments, lossily converted for display and errors.
    #[must_use]
    pub fn argv_lossy(&self) -> Vec<String> {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    }

    /// Convert this `CommandSpec` into a `std::process::Command`.
    ///
    /// The resulting `Command` uses argv-style argument passing, ensuring no
    /// shell injection is possible.
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        if self.env_clear {
            cmd.env_clear();
        }

        if let Some(ref env) = self.env {
            cmd.envs(env);
        }

        cmd
    }
}
