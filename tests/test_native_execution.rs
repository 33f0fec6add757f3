//! Real process execution through the default executor and resolver

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use cmdrunner::{CmdRunner, ErrorCategory, fmt};
use serde_json::json;
use tempfile::TempDir;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn test_path_prefix_takes_precedence_over_path() {
    let temp = TempDir::new().unwrap();
    // Shadows the system `ls`.
    let script = write_script(temp.path(), "ls", r#"printf '%s\n' "$@""#);

    let runner = CmdRunner::builder("ls")
        .path_prefix([temp.path()])
        .arg("all", fmt::flag_if_true("-a"))
        .arg("dirs", fmt::list())
        .default_order("all dirs")
        .build()
        .unwrap();

    assert_eq!(runner.binary_path().unwrap(), script.as_path());

    let lines = runner
        .context()
        .output_process(|rc, out, _| {
            Ok((rc, out.lines().map(str::to_string).collect::<Vec<_>>()))
        })
        .run_with([("all", json!(true)), ("dirs", json!(["a b", "$HOME", "*"]))])
        .unwrap();
    assert_eq!(lines, (0, vec!["-a".into(), "a b".into(), "$HOME".into(), "*".into()]));
}

#[test]
fn test_environment_reaches_child() {
    let temp = TempDir::new().unwrap();
    write_script(
        temp.path(),
        "show-env",
        r#"echo "$LANGUAGE|$LC_ALL|$RUNNER_VAR|$CALL_VAR""#,
    );

    let runner = CmdRunner::builder("show-env")
        .path_prefix([temp.path()])
        .env("RUNNER_VAR", "r")
        .env("CALL_VAR", "overridden")
        .build()
        .unwrap();

    let output = runner.context().env("CALL_VAR", "c").run().unwrap();
    assert_eq!(output.stdout_string(), "C|C|r|c\n");
}

#[test]
fn test_nonzero_exit_carries_output() {
    let temp = TempDir::new().unwrap();
    write_script(temp.path(), "fails", "echo partial; echo bad input >&2; exit 4");

    let runner = CmdRunner::builder("fails")
        .path_prefix([temp.path()])
        .build()
        .unwrap();
    let err = runner.context().run().unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Execution);
    assert_eq!(err.exit_code(), Some(4));
    assert!(err.to_string().contains("bad input"), "{err}");
}

#[test]
fn test_unknown_binary_is_resolution_error() {
    let temp = TempDir::new().unwrap();
    let runner = CmdRunner::builder("cmdrunner-definitely-missing-7e2a")
        .path_prefix([temp.path()])
        .build()
        .unwrap();

    let err = runner.context().run().unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Resolution);
}

#[test]
fn test_runner_shared_across_threads() {
    let temp = TempDir::new().unwrap();
    write_script(temp.path(), "echo-arg", r#"echo "$1""#);

    let runner = CmdRunner::builder("echo-arg")
        .path_prefix([temp.path()])
        .arg("word", fmt::literal())
        .default_order("word")
        .build()
        .unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let runner = &runner;
                scope.spawn(move || {
                    runner
                        .context()
                        .run_with([("word", json!(i))])
                        .unwrap()
                        .stdout_string()
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("{i}\n"));
        }
    });
}
