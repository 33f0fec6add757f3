//! Locating the configuration file.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::model::Config;

/// Environment variable naming a configuration file explicitly.
pub const CONFIG_ENV_VAR: &str = "CMDRUNNER_CONFIG";
/// Directory searched for upward from the working directory.
pub const CONFIG_DIR: &str = ".cmdrunner";
pub const CONFIG_FILE: &str = "config.toml";

/// Where a loaded [`Config`] came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config PATH`, or [`Config::load`].
    Cli(PathBuf),
    /// The `CMDRUNNER_CONFIG` environment variable.
    Env(PathBuf),
    /// Found by the upward search.
    Discovered(PathBuf),
    /// Parsed from a string.
    Inline,
    /// Nothing found; no runners configured.
    #[default]
    Default,
}

impl ConfigSource {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Cli(p) | Self::Env(p) | Self::Discovered(p) => Some(p),
            Self::Inline | Self::Default => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli(p) => write!(f, "cli:{}", p.display()),
            Self::Env(p) => write!(f, "env:{}", p.display()),
            Self::Discovered(p) => write!(f, "file:{}", p.display()),
            Self::Inline => f.write_str("inline"),
            Self::Default => f.write_str("default"),
        }
    }
}

impl Config {
    /// Load configuration with precedence: `explicit` path, then
    /// `CMDRUNNER_CONFIG`, then the upward search from the working directory.
    ///
    /// # Errors
    /// An explicitly named file that is missing is an error; finding nothing
    /// during the upward search is not.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_as(path, ConfigSource::Cli(path.to_path_buf()));
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
            let path = PathBuf::from(path);
            return Self::load_as(&path, ConfigSource::Env(path.clone()));
        }
        let start_dir = std::env::current_dir().map_err(|source| ConfigError::Io {
            path: PathBuf::from("."),
            source,
        })?;
        Self::discover_from(&start_dir)
    }

    /// Upward search only, starting at `start_dir`. Does not consult the
    /// environment.
    ///
    /// # Errors
    /// Returns an error if a discovered file cannot be read or is invalid.
    pub fn discover_from(start_dir: &Path) -> Result<Self, ConfigError> {
        match Self::discover_config_file_from(start_dir) {
            Some(path) => Self::load_as(&path, ConfigSource::Discovered(path.clone())),
            None => {
                tracing::debug!(start = %start_dir.display(), "no runner configuration found");
                Ok(Self::default().with_source(ConfigSource::Default))
            }
        }
    }

    /// Walks up from `start_dir` looking for `.cmdrunner/config.toml`,
    /// stopping at a repository root (`.git`, `.hg`, `.svn`) or the
    /// filesystem root.
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        for dir in start_dir.ancestors() {
            let candidate = dir.join(CONFIG_DIR).join(CONFIG_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }
            if [".git", ".hg", ".svn"].iter().any(|m| dir.join(m).exists()) {
                break;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ECHO: &str = "[runners.echo]\ncommand = \"echo\"\n";

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let config_dir = dir.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        let path = config_dir.join(CONFIG_FILE);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_discovers_config_in_parent() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), ECHO);
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Config::discover_from(&nested).unwrap();
        assert_eq!(config.source(), &ConfigSource::Discovered(path));
        assert_eq!(config.runner_names().collect::<Vec<_>>(), ["echo"]);
    }

    #[test]
    fn test_search_stops_at_repository_root() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), ECHO);
        let repo = temp.path().join("repo");
        std::fs::create_dir_all(repo.join(".git")).unwrap();

        let config = Config::discover_from(&repo).unwrap();
        assert_eq!(config.source(), &ConfigSource::Default);
        assert!(config.runners.is_empty());
    }

    #[test]
    fn test_explicit_path_wins() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        std::fs::write(&path, "[runners.ls]\ncommand = \"ls\"\n").unwrap();

        let config = Config::discover(Some(&path)).unwrap();
        assert_eq!(config.source(), &ConfigSource::Cli(path.clone()));
        assert_eq!(config.source().path(), Some(path.as_path()));
        assert!(config.runners.contains_key("ls"));
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = Config::load(&temp.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "[runners.x]\ncommand = 3\n");
        let err = Config::discover_from(temp.path()).unwrap_err();
        match err {
            ConfigError::Parse { origin, .. } => assert_eq!(origin, path.display().to_string()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
