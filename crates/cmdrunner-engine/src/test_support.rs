//! Test doubles for the process collaborators.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use cmdrunner_process::{CommandSpec, PathResolver, ProcessOutput, ProcessRunner, RunnerError};

/// Executor that records every command and answers with a canned output.
#[derive(Debug)]
pub struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    response: ProcessOutput,
}

impl RecordingRunner {
    /// Succeeds with empty output.
    #[must_use]
    pub fn new() -> Self {
        Self::returning(0, "", "")
    }

    #[must_use]
    pub fn returning(rc: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response: ProcessOutput::new(
                stdout.as_bytes().to_vec(),
                stderr.as_bytes().to_vec(),
                Some(rc),
            ),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock poisoned").len()
    }

    pub fn last_call(&self) -> Option<CommandSpec> {
        self.calls.lock().expect("calls lock poisoned").last().cloned()
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(cmd.clone());
        Ok(self.response.clone())
    }
}

/// Resolver that places every program under one directory and counts lookups.
#[derive(Debug)]
pub struct FixedResolver {
    dir: PathBuf,
    resolved: AtomicUsize,
}

impl FixedResolver {
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            resolved: AtomicUsize::new(0),
        }
    }

    pub fn resolve_count(&self) -> usize {
        self.resolved.load(Ordering::SeqCst)
    }
}

impl PathResolver for FixedResolver {
    fn resolve(&self, program: &str, _extra_dirs: &[PathBuf]) -> Result<PathBuf, RunnerError> {
        self.resolved.fetch_add(1, Ordering::SeqCst);
        Ok(self.dir.join(program))
    }
}

/// Resolver that never finds anything.
#[derive(Debug, Default)]
pub struct MissingResolver;

impl PathResolver for MissingResolver {
    fn resolve(&self, program: &str, extra_dirs: &[PathBuf]) -> Result<PathBuf, RunnerError> {
        Err(RunnerError::BinaryNotFound {
            program: program.to_string(),
            searched: extra_dirs
                .iter()
                .map(|d| d.display().to_string())
                .collect::<Vec<_>>()
                .join(":"),
        })
    }
}
