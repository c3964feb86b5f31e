mod common;

use common::cli::{Workspace, run_dectest, run_dectest_with_env};
use serde_json::Value;

const FIXED_SCRIPT: &str = "\
-- arithmetic smoke test
version: 2.59
precision: 9
rounding: half_even
add001 add '1' '2' -> '3'
add002 add '1' '2' -> '4'
rounding: floor
add003 add '1' '2' -> '3'
";

fn error_json(stderr: &str) -> Value {
    serde_json::from_str(stderr.trim()).expect("stderr should hold a JSON error")
}

#[test]
fn e2e_fixed_run_prints_summary_and_failures() {
    let _log = common::test_log("e2e_fixed_run_prints_summary_and_failures");
    let workspace = Workspace::new();
    workspace.script("smoke.dectest", FIXED_SCRIPT);

    let run = run_dectest(&workspace, ["smoke.dectest"], "fixed_summary");
    assert_eq!(run.code(), Some(0), "failing tests still exit 0: {}", run.stderr);
    assert_eq!(
        run.stdout.trim(),
        "3 tests. 1 successful, 1 failed, 1 skipped"
    );
    assert!(
        run.stderr.contains(
            "failed test: add002 add '1' '2' -> '4', 3 != 4, precision: 9, rounding mode: half_even"
        ),
        "stderr: {}",
        run.stderr
    );
}

#[test]
fn e2e_json_report() {
    let _log = common::test_log("e2e_json_report");
    let workspace = Workspace::new();
    workspace.script("smoke.dectest", FIXED_SCRIPT);

    let run = run_dectest(&workspace, ["--json", "smoke.dectest"], "json_report");
    assert_eq!(run.code(), Some(0));
    let report: Value = serde_json::from_str(&run.stdout).expect("report json");
    assert_eq!(report["total"], 3);
    assert_eq!(report["succeeded"], 1);
    assert_eq!(report["failed"], 1);
    assert_eq!(report["skipped"], 1);
    assert_eq!(report["failures"][0]["name"], "add002");
    assert_eq!(report["failures"][0]["computed"], "3");
    assert_eq!(report["failures"][0]["expected"], "4");
}

#[test]
fn e2e_no_inputs_is_config_error() {
    let _log = common::test_log("e2e_no_inputs_is_config_error");
    let workspace = Workspace::new();

    let run = run_dectest(&workspace, std::iter::empty::<&str>(), "no_inputs");
    assert_eq!(run.code(), Some(4));
    assert_eq!(error_json(&run.stderr)["error"]["code"], "NO_INPUTS");
}

#[test]
fn e2e_missing_file_is_io_error() {
    let _log = common::test_log("e2e_missing_file_is_io_error");
    let workspace = Workspace::new();

    let run = run_dectest(&workspace, ["absent.dectest"], "missing_file");
    assert_eq!(run.code(), Some(2));
    assert_eq!(error_json(&run.stderr)["error"]["code"], "SOURCE_UNREADABLE");
}

#[test]
fn e2e_invalid_precision_aborts_with_location() {
    let _log = common::test_log("e2e_invalid_precision_aborts_with_location");
    let workspace = Workspace::new();
    workspace.script(
        "bad.dectest",
        "precision: 9\nt1 add '1' '1' -> '2'\nprecision: lots\nt2 add '1' '1' -> '2'\n",
    );

    let run = run_dectest(&workspace, ["bad.dectest"], "invalid_precision");
    assert_eq!(run.code(), Some(3));
    assert!(run.stdout.is_empty(), "no summary after a fatal error");
    let err = error_json(&run.stderr);
    assert_eq!(err["error"]["code"], "INVALID_PRECISION");
    assert!(
        err["error"]["message"]
            .as_str()
            .is_some_and(|m| m.contains("bad.dectest:3")),
        "stderr: {}",
        run.stderr
    );
}

#[test]
fn e2e_unknown_operator_is_fatal_in_fixed_dialect() {
    let _log = common::test_log("e2e_unknown_operator_is_fatal_in_fixed_dialect");
    let workspace = Workspace::new();
    workspace.script("op.dectest", "precision: 9\nt1 frobnicate '1' '2' -> '3'\n");

    let fixed = run_dectest(&workspace, ["op.dectest"], "unknown_op_fixed");
    assert_eq!(fixed.code(), Some(3));
    assert_eq!(error_json(&fixed.stderr)["error"]["code"], "UNKNOWN_OPERATOR");

    let variable = run_dectest(
        &workspace,
        ["--dialect", "variable", "op.dectest"],
        "unknown_op_variable",
    );
    assert_eq!(variable.code(), Some(0));
    assert_eq!(
        variable.stdout.trim(),
        "1 tests. 0 successful, 0 failed, 1 skipped"
    );
}

#[test]
fn e2e_variable_dialect_examples() {
    let _log = common::test_log("e2e_variable_dialect_examples");
    let workspace = Workspace::new();
    workspace.script(
        "var.dectest",
        "\
precision: 16
rounding: half_even
sqrt1 squareroot '4' -> '2'
qm1 add '1' '2' -> '?'
hash1 add '#' '2' -> '3'
sci1 tosci '1' -> '1'
rounding: zero
trunc1 divide '2' '3' -> '0.6666666666666666'
",
    );

    let run = run_dectest(
        &workspace,
        ["--dialect", "variable", "var.dectest"],
        "variable_examples",
    );
    assert_eq!(run.code(), Some(0), "stderr: {}", run.stderr);
    assert_eq!(
        run.stdout.trim(),
        "5 tests. 2 successful, 0 failed, 3 skipped"
    );
}

#[test]
fn e2e_file_flag_runs_before_positionals() {
    let _log = common::test_log("e2e_file_flag_runs_before_positionals");
    let workspace = Workspace::new();
    workspace.script("setup.dectest", "precision: 2\nrounding: down\n");
    workspace.script("cases.dectest", "t1 add '1.29' '0' -> '1.2'\n");

    let run = run_dectest(
        &workspace,
        ["cases.dectest", "-f", "setup.dectest"],
        "file_flag_order",
    );
    assert_eq!(run.code(), Some(0));
    assert_eq!(
        run.stdout.trim(),
        "1 tests. 1 successful, 0 failed, 0 skipped"
    );
}

#[test]
fn e2e_config_file_and_env_seed_the_session() {
    let _log = common::test_log("e2e_config_file_and_env_seed_the_session");
    let workspace = Workspace::new();
    workspace.script("dectest.yaml", "precision: 2\nrounding: half_even\n");
    workspace.script("cases.dectest", "t1 add '1.23' '0' -> '1.2'\n");

    let from_file = run_dectest(&workspace, ["cases.dectest"], "config_file");
    assert_eq!(from_file.code(), Some(0), "stderr: {}", from_file.stderr);
    assert_eq!(
        from_file.stdout.trim(),
        "1 tests. 1 successful, 0 failed, 0 skipped"
    );

    let from_env = run_dectest_with_env(
        &workspace,
        ["cases.dectest"],
        [("DECTEST_PRECISION", "3")],
        "config_env",
    );
    assert_eq!(
        from_env.stdout.trim(),
        "1 tests. 0 successful, 1 failed, 0 skipped"
    );
    assert!(from_env.stderr.contains("1.23 != 1.2"), "stderr: {}", from_env.stderr);
}

#[test]
fn e2e_invalid_config_exits_with_config_code() {
    let _log = common::test_log("e2e_invalid_config_exits_with_config_code");
    let workspace = Workspace::new();
    workspace.script("cases.dectest", "precision: 9\n");

    let run = run_dectest(
        &workspace,
        ["--dialect", "sideways", "cases.dectest"],
        "bad_dialect",
    );
    assert_eq!(run.code(), Some(2), "clap rejects the value itself");

    let run = run_dectest(
        &workspace,
        ["--config", "nowhere.yaml", "cases.dectest"],
        "missing_config",
    );
    assert_eq!(run.code(), Some(4));
    assert_eq!(error_json(&run.stderr)["error"]["code"], "CONFIG_ERROR");
}

#[test]
fn e2e_runs_are_idempotent() {
    let _log = common::test_log("e2e_runs_are_idempotent");
    let workspace = Workspace::new();
    workspace.script("smoke.dectest", FIXED_SCRIPT);

    let first = run_dectest(&workspace, ["--json", "smoke.dectest"], "idempotent_1");
    let second = run_dectest(&workspace, ["--json", "smoke.dectest"], "idempotent_2");
    assert_eq!(first.code(), Some(0));
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn e2e_help_and_version() {
    use assert_cmd::Command;
    use predicates::prelude::*;

    let _log = common::test_log("e2e_help_and_version");
    Command::new(assert_cmd::cargo::cargo_bin!("dectest"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dialect").and(predicate::str::contains("--internal-precision")));

    Command::new(assert_cmd::cargo::cargo_bin!("dectest"))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("dectest "));
}

#[test]
fn e2e_log_file_receives_json_lines() {
    let _log = common::test_log("e2e_log_file_receives_json_lines");
    let workspace = Workspace::new();
    workspace.script("smoke.dectest", FIXED_SCRIPT);

    let run = run_dectest(
        &workspace,
        ["-v", "--log-file", "run.log", "smoke.dectest"],
        "log_file",
    );
    assert_eq!(run.code(), Some(0));
    assert!(!run.stderr.contains("Starting run"), "logs stay out of stderr");

    let log = std::fs::read_to_string(workspace.root.join("run.log")).expect("log file");
    assert!(log.contains("Starting run"));
    for line in log.lines() {
        serde_json::from_str::<Value>(line).expect("each log line is JSON");
    }
}
