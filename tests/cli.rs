use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

const DRILL: &str = "start; tick 40s; pause Shock; tick 10s; resume; end";

fn ccf(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ccf").unwrap();
    cmd.env("CCF_HOME", home);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn replay_inline_script_prints_ccf() {
    let tmp = tempdir().unwrap();
    ccf(tmp.path())
        .args(["replay", "-e", DRILL])
        .assert()
        .success()
        .stdout(predicate::str::contains("CCF"))
        .stdout(predicate::str::contains("80%"))
        .stdout(predicate::str::contains("Shock"));
}

#[test]
fn replay_from_file() {
    let tmp = tempdir().unwrap();
    let script = tmp.path().join("drill.ccf");
    std::fs::write(
        &script,
        "# two minute drill\nstart\ntick 1m\npause Rhythm/Analysis, Shock\ntick 15s\nresume\ntick 45s\nend\n",
    )
    .unwrap();

    ccf(tmp.path())
        .arg("replay")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rhythm/Analysis"));
}

#[test]
fn replay_from_stdin() {
    let tmp = tempdir().unwrap();
    ccf(tmp.path())
        .args(["replay", "-o", "json"])
        .write_stdin("start\ntick 30s\nend\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ccf_percent\": 100"));
}

#[test]
fn invalid_transition_names_the_line() {
    let tmp = tempdir().unwrap();
    ccf(tmp.path())
        .args(["replay", "-e", "start; end; resume"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"))
        .stderr(predicate::str::contains("cannot resume while Ended"));
}

#[test]
fn lenient_replay_skips_bad_steps() {
    let tmp = tempdir().unwrap();
    ccf(tmp.path())
        .args(["replay", "--lenient", "-e", "pause; start; tick 5s; end"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped lines: 1"));
}

#[test]
fn saved_replay_shows_up_in_history() {
    let tmp = tempdir().unwrap();
    ccf(tmp.path())
        .args(["replay", "--save", "-e", DRILL])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session #1"));

    ccf(tmp.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sessions (1)"))
        .stdout(predicate::str::contains("#1"));

    ccf(tmp.path())
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pause log"))
        .stdout(predicate::str::contains("Shock"));

    ccf(tmp.path())
        .args(["report", "-p", "today", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"session_count\": 1"));
}

#[test]
fn show_missing_session_fails() {
    let tmp = tempdir().unwrap();
    ccf(tmp.path())
        .args(["show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found: Session 42"));
}

#[test]
fn clear_requires_force() {
    let tmp = tempdir().unwrap();
    ccf(tmp.path())
        .args(["replay", "--save", "-e", DRILL])
        .assert()
        .success();

    ccf(tmp.path())
        .arg("clear")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    ccf(tmp.path())
        .args(["clear", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 sessions"));
}

#[test]
fn reasons_lists_default_vocabulary() {
    let tmp = tempdir().unwrap();
    ccf(tmp.path())
        .arg("reasons")
        .assert()
        .success()
        .stdout(predicate::str::contains("[1] Rhythm/Analysis"))
        .stdout(predicate::str::contains("Move/Transport"));
}

#[test]
fn reasons_follow_config_file() {
    let tmp = tempdir().unwrap();
    std::fs::write(
        tmp.path().join("config.yaml"),
        "reasons:\n  - Defib Pads\n  - Shock\n",
    )
    .unwrap();

    ccf(tmp.path())
        .arg("reasons")
        .assert()
        .success()
        .stdout(predicate::str::contains("[1] Defib Pads"))
        .stdout(predicate::str::contains("Rhythm/Analysis").not());
}

#[test]
fn config_default_output_applies() {
    let tmp = tempdir().unwrap();
    std::fs::write(
        tmp.path().join("config.yaml"),
        "general:\n  default_output: json\n",
    )
    .unwrap();

    ccf(tmp.path())
        .arg("reasons")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 8"));
}

#[test]
fn config_init_and_path() {
    let tmp = tempdir().unwrap();
    ccf(tmp.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yaml"));
    assert!(tmp.path().join("config.yaml").exists());

    ccf(tmp.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    ccf(tmp.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yaml"));
}

#[test]
fn completions_bash() {
    let tmp = tempdir().unwrap();
    ccf(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_ccf"));
}

#[test]
fn unknown_report_period_fails() {
    let tmp = tempdir().unwrap();
    ccf(tmp.path())
        .args(["report", "-p", "fortnight"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown report period"));
}
