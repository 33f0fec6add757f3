use std::sync::Arc;

use clap::Parser;
use cmdrunner_config::Config;
use cmdrunner_engine::CmdRunner;
use cmdrunner_engine::test_support::{FixedResolver, MissingResolver, RecordingRunner};
use serde_json::json;

use super::*;
use crate::exit_codes::ExitCode;

const CONFIG: &str = r#"
[runners.zpool]
command = "zpool"
default_order = "subcommand force name"

[runners.zpool.args]
subcommand = { format = "literal" }
force = { format = "flag-if-true", flag = "-f" }
name = { format = "literal" }
props = { format = "each", inner = { format = "split", prefix = "-o" } }

[runners.lenient]
command = "lenient"
check_rc = false
"#;

fn runner(name: &str, executor: Arc<RecordingRunner>) -> CmdRunner {
    Config::from_toml_str(CONFIG)
        .unwrap()
        .builder(name)
        .unwrap()
        .executor(executor)
        .resolver(Arc::new(FixedResolver::new("/sbin")))
        .build()
        .unwrap()
}

fn options(params: serde_json::Value) -> RunOptions {
    RunOptions {
        params: params.as_object().cloned().unwrap_or_default(),
        skip_absent: true,
        ..RunOptions::default()
    }
}

#[test]
fn test_parse_param_json_and_string() {
    assert_eq!(parse_param("force=true").unwrap(), ("force".to_string(), json!(true)));
    assert_eq!(parse_param("n=3").unwrap(), ("n".to_string(), json!(3)));
    assert_eq!(parse_param("name=tank").unwrap(), ("name".to_string(), json!("tank")));
    assert_eq!(
        parse_param("props=[\"a=1\"]").unwrap(),
        ("props".to_string(), json!(["a=1"]))
    );
    assert_eq!(parse_param("expr=a=b").unwrap(), ("expr".to_string(), json!("a=b")));
    assert!(parse_param("novalue").is_err());
    assert!(parse_param("=x").is_err());
}

#[test]
fn test_parse_env_pair() {
    assert_eq!(
        parse_env_pair("LC_ALL=C.UTF-8").unwrap(),
        ("LC_ALL".to_string(), "C.UTF-8".to_string())
    );
    assert!(parse_env_pair("LC_ALL").is_err());
}

#[test]
fn test_cli_parses_run_flags() {
    let cli = Cli::try_parse_from([
        "cmdrunner",
        "--verbose",
        "run",
        "zpool",
        "--order",
        "subcommand name",
        "--set",
        "name=tank",
        "--set",
        "subcommand=list",
        "--env",
        "A=1",
        "--print",
    ])
    .unwrap();
    assert!(cli.verbose);
    match cli.command {
        Commands::Run {
            runner,
            order,
            set,
            env,
            print,
            no_skip_absent,
            passthrough_rc,
        } => {
            assert_eq!(runner, "zpool");
            assert_eq!(order.as_deref(), Some("subcommand name"));
            assert_eq!(set.len(), 2);
            assert_eq!(env, vec![("A".to_string(), "1".to_string())]);
            assert!(print);
            assert!(!no_skip_absent);
            assert!(!passthrough_rc);
        }
        Commands::List => panic!("expected run"),
    }
}

#[test]
fn test_format_argv_quotes_when_needed() {
    let argv = ["/sbin/zpool", "create", "-o", "comment=my pool", "", "it's"]
        .map(String::from)
        .to_vec();
    assert_eq!(
        format_argv(&argv),
        r#"/sbin/zpool create -o 'comment=my pool' '' 'it'\''s'"#
    );
}

#[test]
fn test_print_does_not_execute() {
    let executor = Arc::new(RecordingRunner::new());
    let runner = runner("zpool", executor.clone());
    let opts = options(json!({"subcommand": "destroy", "force": true, "name": "tank"}));

    let mut out = Vec::new();
    let code = print_runner(&runner, &opts, &mut out).unwrap();

    assert_eq!(code, ExitCode::SUCCESS);
    assert_eq!(String::from_utf8(out).unwrap(), "/sbin/zpool destroy -f tank\n");
    assert_eq!(executor.call_count(), 0);
}

#[test]
fn test_explicit_order_and_env() {
    let executor = Arc::new(RecordingRunner::returning(0, "ok\n", ""));
    let runner = runner("zpool", executor.clone());
    let mut opts = options(json!({"subcommand": "set", "props": ["a=1", "b=2"], "name": "tank"}));
    opts.order = Some("subcommand props name".to_string());
    opts.env = vec![("ZPOOL_VDEV_NAME_PATH".to_string(), "1".to_string())];

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let code = run_runner(&runner, &opts, &mut out, &mut err).unwrap();

    assert_eq!(code, ExitCode::SUCCESS);
    assert_eq!(out, b"ok\n");
    let call = executor.last_call().unwrap();
    assert_eq!(
        call.argv_lossy(),
        ["/sbin/zpool", "set", "-o", "a=1", "-o", "b=2", "tank"]
    );
    let env = call.env.unwrap();
    assert_eq!(
        env.get(std::ffi::OsStr::new("ZPOOL_VDEV_NAME_PATH")),
        Some(&std::ffi::OsString::from("1"))
    );
}

#[test]
fn test_nonzero_exit_under_check_policy() {
    let executor = Arc::new(RecordingRunner::returning(1, "partial\n", "cannot open 'tank'\n"));
    let runner = runner("zpool", executor.clone());
    let opts = options(json!({"subcommand": "status", "force": false, "name": "tank"}));

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let failure = run_runner(&runner, &opts, &mut out, &mut err).unwrap_err();

    assert_eq!(failure.to_exit_code(), ExitCode::EXECUTION);
    assert_eq!(out, b"partial\n");
    assert_eq!(err, b"cannot open 'tank'\n");
    assert_eq!(executor.call_count(), 1);
}

#[test]
fn test_passthrough_rc() {
    let executor = Arc::new(RecordingRunner::returning(4, "", ""));
    let mut opts = options(json!({"subcommand": "status", "force": false, "name": "tank"}));
    opts.passthrough_rc = true;

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let checked = runner("zpool", executor.clone());
    assert_eq!(
        run_runner(&checked, &opts, &mut out, &mut err).unwrap(),
        ExitCode::from_rc(4)
    );

    let lenient = runner("lenient", executor);
    let opts = RunOptions {
        passthrough_rc: true,
        ..RunOptions::default()
    };
    assert_eq!(
        run_runner(&lenient, &opts, &mut out, &mut err).unwrap(),
        ExitCode::from_rc(4)
    );
}

#[test]
fn test_omitted_parameters_are_skipped() {
    let executor = Arc::new(RecordingRunner::new());
    let runner = runner("zpool", executor.clone());
    let opts = options(json!({"subcommand": "destroy", "name": "tank"}));

    let mut out = Vec::new();
    print_runner(&runner, &opts, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "/sbin/zpool destroy tank\n");

    let (mut out, mut err) = (Vec::new(), Vec::new());
    run_runner(&runner, &opts, &mut out, &mut err).unwrap();
    assert_eq!(executor.last_call().unwrap().argv_lossy(), ["/sbin/zpool", "destroy", "tank"]);
}

#[test]
fn test_omitted_parameters_render_null_without_skip() {
    let executor = Arc::new(RecordingRunner::new());
    let runner = runner("zpool", executor.clone());
    let mut opts = options(json!({"subcommand": "list"}));
    opts.skip_absent = false;

    let mut out = Vec::new();
    print_runner(&runner, &opts, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "/sbin/zpool list null\n");
}

#[test]
fn test_undeclared_set_name_maps_to_config_exit() {
    let executor = Arc::new(RecordingRunner::new());
    let runner = runner("zpool", executor.clone());
    let opts = options(json!({"subcommand": "destroy", "name": "tank", "forse": true}));

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let failure = run_runner(&runner, &opts, &mut out, &mut err).unwrap_err();
    assert_eq!(failure.to_exit_code(), ExitCode::CONFIG);
    assert!(failure.to_string().contains("forse"), "{failure}");
    assert_eq!(executor.call_count(), 0);

    let mut out = Vec::new();
    let failure = print_runner(&runner, &opts, &mut out).unwrap_err();
    assert_eq!(failure.to_exit_code(), ExitCode::CONFIG);
    assert!(out.is_empty());
}

#[test]
fn test_unresolvable_binary_maps_to_resolution_exit() {
    let runner = Config::from_toml_str(CONFIG)
        .unwrap()
        .builder("lenient")
        .unwrap()
        .executor(Arc::new(RecordingRunner::new()))
        .resolver(Arc::new(MissingResolver))
        .build()
        .unwrap();

    let mut out = Vec::new();
    let failure = print_runner(&runner, &RunOptions::default(), &mut out).unwrap_err();
    assert_eq!(failure.to_exit_code(), ExitCode::RESOLUTION);
}

#[test]
fn test_list_runners() {
    let config = Config::from_toml_str(CONFIG).unwrap();
    let mut out = Vec::new();
    list_runners(&config, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("zpool: zpool\n"), "{text}");
    assert!(text.contains("  order: subcommand force name\n"), "{text}");
    assert!(text.contains("  force: flag-if-true\n"), "{text}");
    assert!(text.contains("  props: each\n"), "{text}");
    assert!(text.contains("lenient: lenient\n"), "{text}");
}

#[test]
fn test_list_empty_config() {
    let mut out = Vec::new();
    list_runners(&Config::default(), &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "no runners configured (default)\n");
}
