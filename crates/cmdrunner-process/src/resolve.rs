//! Binary path resolution.
//!
//! Resolution searches an optional list of extra directories first, then the
//! directories on `PATH`. Absolute paths that exist are returned unchanged.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::RunnerError;

/// Maps a program name to an absolute path.
pub trait PathResolver: Send + Sync {
    /// Resolve `program`, searching `extra_dirs` before `PATH`.
    ///
    /// # Errors
    /// Returns [`RunnerError::BinaryNotFound`] when no executable matches.
    fn resolve(&self, program: &str, extra_dirs: &[PathBuf]) -> Result<PathBuf, RunnerError>;
}

/// `PATH` lookup backed by the `which` crate.
#[derive(Debug, Clone, Default)]
pub struct WhichResolver {
    path_override: Option<OsString>,
}

impl WhichResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Search `path` instead of the process `PATH`.
    #[must_use]
    pub fn with_path(path: impl Into<OsString>) -> Self {
        Self {
            path_override: Some(path.into()),
        }
    }

    fn search_path(&self, extra_dirs: &[PathBuf]) -> Option<OsString> {
        let base = self
            .path_override
            .clone()
            .or_else(|| std::env::var_os("PATH"));

        let mut dirs: Vec<PathBuf> = extra_dirs.to_vec();
        if let Some(base) = base {
            dirs.extend(std::env::split_paths(&base));
        }
        std::env::join_paths(dirs).ok()
    }
}

impl PathResolver for WhichResolver {
    fn resolve(&self, program: &str, extra_dirs: &[PathBuf]) -> Result<PathBuf, RunnerError> {
        let candidate = Path::new(program);
        if candidate.is_absolute() {
            return if candidate.is_file() {
                Ok(candidate.to_path_buf())
            } else {
                Err(RunnerError::BinaryNotFound {
                    program: program.to_string(),
                    searched: program.to_string(),
                })
            };
        }

        let search = self.search_path(extra_dirs);
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        which::which_in(program, search.as_ref(), cwd).map_err(|e| {
            RunnerError::BinaryNotFound {
                program: program.to_string(),
                searched: format!(
                    "{} ({e})",
                    search
                        .as_ref()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default()
                ),
            }
        })
    }
}
