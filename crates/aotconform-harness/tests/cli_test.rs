//! Integration test: the `harness` binary.
//!
//! Run: cargo test -p aotconform-harness --test cli_test

use std::path::PathBuf;
use std::process::Command;

use aotconform_harness::structured_log::validate_log_file;

fn harness() -> Command {
    Command::new(env!("CARGO_BIN_EXE_harness"))
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("aotconform-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn full_run_exits_zero_and_writes_artifacts() {
    let dir = scratch_dir("full");
    let report = dir.join("report.md");
    let log = dir.join("run.jsonl");

    let output = harness()
        .arg("--report")
        .arg(&report)
        .arg("--log")
        .arg(&log)
        .output()
        .expect("harness should execute");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout:\n{stdout}");

    // Nothing failed, so the only line is the tally.
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "{stdout}");
    let (passed, total) = lines[0].split_once('/').unwrap();
    assert_eq!(passed, total);

    assert!(std::fs::read_to_string(&report).unwrap().contains("| PASS |"));
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("report.json")).unwrap()).unwrap();
    assert_eq!(json["summary"]["failed"], 0);

    let (entries, errors) = validate_log_file(&log).unwrap();
    assert!(entries > 0);
    assert!(errors.is_empty(), "{errors:?}");

    let index: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.join("report.artifacts.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(index["artifacts"].as_array().unwrap().len(), 3);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn list_prints_registry_with_signatures() {
    let output = harness().arg("--list").output().expect("harness should execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().next().unwrap().starts_with("integer_arithmetic."));
    assert!(stdout.contains(
        "objects.instance_of_x_object\tClasses.isInstance\t(Ljava/lang/Object;Ljava/lang/Class;)Z"
    ));
    assert!(stdout.lines().last().unwrap().starts_with("local_handles."));
}

#[test]
fn invalid_arguments_exit_two() {
    let zero = harness()
        .args(["--local-capacity", "0"])
        .output()
        .expect("harness should execute");
    assert_eq!(zero.status.code(), Some(2));

    let unknown = harness().arg("--bogus").output().expect("harness should execute");
    assert_eq!(unknown.status.code(), Some(2));

    let policy = harness()
        .args(["--overflow", "bogus"])
        .output()
        .expect("harness should execute");
    assert_eq!(policy.status.code(), Some(2));
    assert!(policy.stdout.is_empty());
    assert!(String::from_utf8_lossy(&policy.stderr).contains("bogus"));
}

#[test]
fn overflow_policy_names_are_accepted() {
    let output = harness()
        .args(["--overflow", "GROW", "--list"])
        .output()
        .expect("harness should execute");
    assert!(output.status.success());
}

#[test]
fn unwritable_log_exits_two_without_running() {
    let dir = scratch_dir("unwritable");
    let log = dir.join("missing").join("run.jsonl");
    let output = harness()
        .arg("--log")
        .arg(&log)
        .output()
        .expect("harness should execute");
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("harness: io:"), "{stderr}");
    std::fs::remove_dir_all(&dir).ok();
}
